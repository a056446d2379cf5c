//! Political life: party, campaign and office.
//!
//! A run for office moves through three phases. Out of office the player
//! joins a party and does grassroots work, which is what earns political
//! years. A declared candidacy opens a campaign chest that rallies and
//! lobbyists draw on until election day. In office the seat becomes a
//! pseudo-career and [`office::process_office_year`] takes over the
//! yearly bookkeeping.

pub mod coups;
pub mod election;
pub mod office;

use rand::Rng;

pub use election::{
    calculate_win_probability, is_eligible_for_position, position_eligibility, resolve_election,
};
pub use office::enact_policy;

use super::actions::{ActionDef, ActionDomain, charge, check_basics};
use super::context::TickContext;
use super::registry::Registries;
use super::system::LifeStage;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{
    Campaign, HistoryCategory, Party, PoliticalPosition, ShadowMode, StatKind, WorldState,
};

// --- Pre-office ---
const PARTY_MIN_AGE: u32 = 16;
const GRASSROOTS_SUPPORT: f64 = 2.0;

// --- Campaign ---
const CANDIDACY_TIME_COST: u32 = 1;
const FUND_TIME_COST: u32 = 1;
const RALLY_COST: i64 = 2_000;
const LOBBYIST_DONATION: i64 = 10_000;
const LOBBYIST_CORRUPTION: f64 = 8.0;
const ENDORSEMENT_BASE: f64 = 0.3;
const RIGGING_COST: i64 = 5_000;

// --- Office ---
const MILITARY_COURTSHIP: f64 = 8.0;
const MEDIA_GRAB: f64 = 10.0;
const MEDIA_MIN_LEVEL: u32 = 3;
const ANTI_CORRUPTION_CUT: f64 = 15.0;
const EMBEZZLE_CORRUPTION: f64 = 15.0;
const EMBEZZLE_PER_LEVEL: i64 = 5_000;

/// Seats the player could declare for right now.
pub fn eligible_positions<'r>(state: &WorldState, registries: &'r Registries) -> Vec<&'r PoliticalPosition> {
    registries
        .positions
        .iter()
        .filter(|p| p.electable)
        .filter(|p| state.politics.current_position.as_deref() != Some(p.id.as_str()))
        .filter(|p| is_eligible_for_position(state, p))
        .collect()
}

pub fn join_party(ctx: &mut TickContext, party: Party) -> ActionResult {
    check_basics(ctx.state, PARTY_MIN_AGE, 1, 0)?;
    if ctx.state.politics.party == Some(party) {
        return Err(ineligible(format!("you are already with the {party}")));
    }
    charge(ctx.state, 1, 0)?;
    let politics = &mut ctx.state.politics;
    politics.party = Some(party);
    politics.party_support = party.base_support() * 100.0;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, format!("You joined the {party}."));
    Ok(format!("Welcome to the {party}."))
}

pub fn declare_candidacy(ctx: &mut TickContext, position_id: &str) -> ActionResult {
    let registries = ctx.registries;
    let Some(position) = registries.position(position_id) else {
        return Err(ActionError::UnknownPosition(position_id.to_string()));
    };
    check_basics(ctx.state, position.min_age, CANDIDACY_TIME_COST, position.filing_fee)?;
    let politics = &ctx.state.politics;
    if politics.in_campaign() {
        return Err(ineligible("you are already running"));
    }
    if ctx.state.serial_killer.mode == ShadowMode::FullTime {
        return Err(ineligible("you live in the shadows now"));
    }
    if !position.electable {
        return Err(ineligible(format!("nobody is elected {}", position.title)));
    }
    if politics.current_position.as_deref() == Some(position.id.as_str()) {
        return Err(ineligible("you already hold that seat"));
    }
    position_eligibility(ctx.state, position)?;
    charge(ctx.state, CANDIDACY_TIME_COST, position.filing_fee)?;

    let year = ctx.state.year;
    ctx.state.politics.campaign = Some(Campaign {
        position_id: position.id.clone(),
        funds: 0,
        rallies: 0,
        endorsements: 0,
        rigged: false,
        lobbyist_donations: 0,
        declared_year: year,
    });
    ctx.log(
        HistoryCategory::Politics,
        format!("You declared your candidacy for {}.", position.title),
    );
    Ok(format!("You are running for {}.", position.title))
}

/// Move personal cash into the campaign chest.
pub fn fund_campaign(ctx: &mut TickContext, amount: i64) -> ActionResult {
    check_basics(ctx.state, 0, FUND_TIME_COST, amount.max(0))?;
    if amount <= 0 {
        return Err(ineligible("pledge a positive amount"));
    }
    if !ctx.state.politics.in_campaign() {
        return Err(ineligible("you are not running for anything"));
    }
    charge(ctx.state, FUND_TIME_COST, amount)?;
    if let Some(campaign) = ctx.state.politics.campaign.as_mut() {
        campaign.funds += amount;
    }
    ctx.log(
        HistoryCategory::Politics,
        format!("You put ${amount} into your campaign."),
    );
    Ok(format!("Your campaign has ${amount} more to spend."))
}

pub fn process_political_year(ctx: &mut TickContext) {
    if ctx.state.politics.in_office() {
        office::process_office_year(ctx);
        return;
    }
    let politics = &mut ctx.state.politics;
    if politics.grassroots_this_year {
        politics.total_political_years += 1;
    }
    politics.grassroots_this_year = false;
}

pub struct PoliticsStage;

impl LifeStage for PoliticsStage {
    fn name(&self) -> &str {
        "politics"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        if !ctx.state.is_alive {
            return;
        }
        process_political_year(ctx);
    }
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

fn out_of_office(state: &WorldState, _: &Registries) -> Result<(), ActionError> {
    if state.politics.in_office() {
        return Err(ineligible("you already hold office"));
    }
    if state.politics.grassroots_this_year {
        return Err(ineligible("you already organized this year"));
    }
    Ok(())
}

fn campaigning(state: &WorldState, _: &Registries) -> Result<(), ActionError> {
    if !state.politics.in_campaign() {
        return Err(ineligible("you are not running for anything"));
    }
    Ok(())
}

fn can_rally(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    campaigning(state, registries)?;
    if state.politics.campaign.as_ref().is_some_and(|c| c.funds < RALLY_COST) {
        return Err(ineligible(format!("a rally costs ${RALLY_COST} of campaign money")));
    }
    Ok(())
}

fn can_rig(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    campaigning(state, registries)?;
    if state.politics.campaign.as_ref().is_some_and(|c| c.rigged) {
        return Err(ineligible("the fix is already in"));
    }
    Ok(())
}

fn can_run_election(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    let Some(campaign) = &state.politics.campaign else {
        return Err(ineligible("you are not running for anything"));
    };
    if state.serial_killer.mode == ShadowMode::FullTime {
        return Err(ineligible("your nights are spoken for"));
    }
    if registries.position(&campaign.position_id).is_none() {
        return Err(ActionError::UnknownPosition(campaign.position_id.clone()));
    }
    Ok(())
}

fn in_office(state: &WorldState, _: &Registries) -> Result<(), ActionError> {
    if !state.politics.in_office() {
        return Err(ineligible("you are not in office"));
    }
    Ok(())
}

fn can_control_media(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    in_office(state, registries)?;
    if state.politics.position_level < MEDIA_MIN_LEVEL {
        return Err(ineligible("the press does not answer to you yet"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Performs
// ---------------------------------------------------------------------------

fn grassroots(ctx: &mut TickContext) -> ActionResult {
    let politics = &mut ctx.state.politics;
    politics.grassroots_this_year = true;
    politics.party_support += GRASSROOTS_SUPPORT;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You knocked on doors for the cause.");
    Ok("You organized your neighborhood.".to_string())
}

fn hold_rally(ctx: &mut TickContext) -> ActionResult {
    let bump = ctx.rng.random_range(2.0..=5.0);
    let politics = &mut ctx.state.politics;
    if let Some(campaign) = politics.campaign.as_mut() {
        campaign.funds -= RALLY_COST;
        campaign.rallies += 1;
    }
    politics.approval += bump;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You held a rally.");
    Ok("The crowd roared.".to_string())
}

fn accept_lobbyist(ctx: &mut TickContext) -> ActionResult {
    let politics = &mut ctx.state.politics;
    if let Some(campaign) = politics.campaign.as_mut() {
        campaign.funds += LOBBYIST_DONATION;
        campaign.lobbyist_donations += 1;
    }
    politics.corruption += LOBBYIST_CORRUPTION;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You took money from a lobbyist.");
    Ok(format!("${LOBBYIST_DONATION} landed in your war chest."))
}

/// Chance a notable figure backs the campaign.
pub fn endorsement_chance(state: &WorldState) -> f64 {
    let p = &state.politics;
    (ENDORSEMENT_BASE + p.party_support / 200.0 + p.approval / 400.0).clamp(0.0, 1.0)
}

fn seek_endorsement(ctx: &mut TickContext) -> ActionResult {
    let chance = endorsement_chance(ctx.state);
    if ctx.roll() >= chance {
        return Ok("Nobody wanted to be seen with you.".to_string());
    }
    if let Some(campaign) = ctx.state.politics.campaign.as_mut() {
        campaign.endorsements += 1;
    }
    ctx.log(HistoryCategory::Politics, "You picked up an endorsement.");
    Ok("You got the endorsement.".to_string())
}

fn rig_election(ctx: &mut TickContext) -> ActionResult {
    if let Some(campaign) = ctx.state.politics.campaign.as_mut() {
        campaign.rigged = true;
    }
    ctx.adjust_stat(StatKind::Karma, -10);
    ctx.log(HistoryCategory::Politics, "You arranged for the count to go your way.");
    Ok("The ballots will say what you need.".to_string())
}

fn withdraw(ctx: &mut TickContext) -> ActionResult {
    let Some(campaign) = ctx.state.politics.campaign.take() else {
        return Err(ineligible("you are not running for anything"));
    };
    ctx.state.finances.cash += campaign.funds.max(0);
    ctx.log(HistoryCategory::Politics, "You dropped out of the race.");
    Ok("You withdrew from the race.".to_string())
}

fn give_speech(ctx: &mut TickContext) -> ActionResult {
    let bump = ctx.rng.random_range(1.0..=4.0);
    let politics = &mut ctx.state.politics;
    politics.approval += bump;
    politics.clamp();
    Ok("The speech went over well.".to_string())
}

fn court_military(ctx: &mut TickContext) -> ActionResult {
    let politics = &mut ctx.state.politics;
    politics.military_control += MILITARY_COURTSHIP;
    politics.authoritarian_score += MILITARY_COURTSHIP / 2.0;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You dined with the generals.");
    Ok("The army likes you a little more.".to_string())
}

fn control_media(ctx: &mut TickContext) -> ActionResult {
    let politics = &mut ctx.state.politics;
    politics.media_control += MEDIA_GRAB;
    politics.authoritarian_score += MEDIA_GRAB / 2.0;
    politics.approval -= 2.0;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You leaned on the newspapers.");
    Ok("The headlines are friendlier now.".to_string())
}

fn anti_corruption_drive(ctx: &mut TickContext) -> ActionResult {
    let politics = &mut ctx.state.politics;
    politics.corruption -= ANTI_CORRUPTION_CUT;
    politics.approval += 3.0;
    politics.opposition_strength -= 5.0;
    politics.clamp();
    ctx.log(HistoryCategory::Politics, "You launched an anti-corruption drive.");
    Ok("Heads rolled, none of them yours.".to_string())
}

fn embezzle(ctx: &mut TickContext) -> ActionResult {
    let take = EMBEZZLE_PER_LEVEL * ctx.state.politics.position_level.max(1) as i64;
    ctx.state.finances.cash += take;
    let politics = &mut ctx.state.politics;
    politics.corruption += EMBEZZLE_CORRUPTION;
    politics.clamp();
    ctx.adjust_stat(StatKind::Karma, -8);
    Ok(format!("You skimmed ${take} from the treasury."))
}

fn resign(ctx: &mut TickContext) -> ActionResult {
    let title = ctx.state.politics.title.clone().unwrap_or_default();
    office::leave_office(ctx);
    ctx.log(HistoryCategory::Politics, format!("You resigned as {title}."));
    Ok("You resigned.".to_string())
}

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "grassroots",
            label: "Do grassroots organizing",
            domain: ActionDomain::Politics,
            min_age: PARTY_MIN_AGE,
            time_cost: 2,
            cost: 0,
            location: None,
            check: out_of_office,
            perform: grassroots,
        },
        ActionDef {
            id: "hold_rally",
            label: "Hold a rally",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_rally,
            perform: hold_rally,
        },
        ActionDef {
            id: "accept_lobbyist",
            label: "Accept lobbyist money",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: campaigning,
            perform: accept_lobbyist,
        },
        ActionDef {
            id: "seek_endorsement",
            label: "Seek an endorsement",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: campaigning,
            perform: seek_endorsement,
        },
        ActionDef {
            id: "rig_election",
            label: "Rig the election",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: RIGGING_COST,
            location: None,
            check: can_rig,
            perform: rig_election,
        },
        ActionDef {
            id: "run_election",
            label: "Go to election day",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_run_election,
            perform: resolve_election,
        },
        ActionDef {
            id: "withdraw",
            label: "Withdraw from the race",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: campaigning,
            perform: withdraw,
        },
        ActionDef {
            id: "give_speech",
            label: "Give a speech",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: in_office,
            perform: give_speech,
        },
        ActionDef {
            id: "court_military",
            label: "Court the military",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 2,
            cost: 0,
            location: None,
            check: in_office,
            perform: court_military,
        },
        ActionDef {
            id: "control_media",
            label: "Control the media",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 2,
            cost: 0,
            location: None,
            check: can_control_media,
            perform: control_media,
        },
        ActionDef {
            id: "anti_corruption_drive",
            label: "Launch an anti-corruption drive",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 2,
            cost: 0,
            location: None,
            check: in_office,
            perform: anti_corruption_drive,
        },
        ActionDef {
            id: "embezzle",
            label: "Embezzle",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: in_office,
            perform: embezzle,
        },
        ActionDef {
            id: "resign",
            label: "Resign",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: in_office,
            perform: resign,
        },
        ActionDef {
            id: "stage_coup",
            label: "Stage a coup",
            domain: ActionDomain::Politics,
            min_age: 18,
            time_cost: 3,
            cost: 0,
            location: None,
            check: coups::can_stage_coup,
            perform: coups::stage_coup,
        },
    ]
}
