use rand::{Rng, RngCore};

use super::office::take_office;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{
    Campaign, HistoryCategory, PoliticalPosition, ShadowMode, StatKind, WorldState,
};
use crate::sim::context::TickContext;
use crate::sim::signal::SignalKind;

// --- Win probability weights ---
const APPROVAL_WEIGHT: f64 = 0.35;
const FUNDING_WEIGHT: f64 = 0.20;
const PARTY_WEIGHT: f64 = 0.15;
const ENDORSEMENT_WEIGHT: f64 = 0.10;
const ENDORSEMENT_CAP: u32 = 3;
const STATS_WEIGHT: f64 = 0.10;
const INCUMBENCY_BONUS: f64 = 0.05;
const POLISCI_BONUS: f64 = 0.10;
const POLISCI_MAJOR: &str = "Political Science";
const NOISE: f64 = 0.05;
const SCANDAL_PENALTY: f64 = 0.15;
const LOW_APPROVAL: f64 = 30.0;
const LOW_APPROVAL_PENALTY: f64 = 0.10;
const RIGGING_BONUS: f64 = 0.25;
const WIN_MIN: f64 = 0.05;
const WIN_MAX: f64 = 0.95;

// --- Resolution ---
const RIGGING_CORRUPTION: f64 = 30.0;
const WIN_APPROVAL_MIN: f64 = 55.0;
const WIN_APPROVAL_MAX: f64 = 65.0;
const LOSS_HAPPINESS_HIT: i32 = 10;

/// Why the player cannot stand for `position`.
pub fn position_eligibility(state: &WorldState, position: &PoliticalPosition) -> Result<(), ActionError> {
    if state.age < position.min_age {
        return Err(ActionError::TooYoung {
            min_age: position.min_age,
        });
    }
    if state.education.level < position.min_education {
        return Err(ineligible(format!(
            "requires {} education",
            position.min_education
        )));
    }
    if state.stats.smarts < position.min_smarts {
        return Err(ineligible(format!(
            "requires smarts of at least {}",
            position.min_smarts
        )));
    }
    if state.stats.looks < position.min_looks {
        return Err(ineligible(format!(
            "requires looks of at least {}",
            position.min_looks
        )));
    }
    let politics = &state.politics;
    if politics.total_political_years < position.min_political_years {
        return Err(ineligible(format!(
            "requires {} years in politics",
            position.min_political_years
        )));
    }
    if let Some(major) = &position.required_major
        && !state.education.has_major(major)
    {
        return Err(ineligible(format!("requires a degree in {major}")));
    }
    if let Some(flag) = &position.required_flag
        && !state.flags.is_set(flag)
    {
        return Err(ineligible(format!("requires {flag}")));
    }
    if let Some(min) = position.min_authoritarian
        && politics.authoritarian_score < min as f64
    {
        return Err(ineligible("not ruthless enough"));
    }
    if let Some(min) = position.min_military_control
        && politics.military_control < min as f64
    {
        return Err(ineligible("the army does not back you"));
    }
    if !position.allowed_governments.is_empty()
        && !position.allowed_governments.contains(&politics.government_type)
    {
        return Err(ineligible(format!(
            "not available under a {}",
            politics.government_type
        )));
    }
    if let Some(limit) = position.term_limit
        && politics.terms_served.get(&position.id).copied().unwrap_or(0) >= limit
    {
        return Err(ineligible("you have served the maximum number of terms"));
    }
    Ok(())
}

pub fn is_eligible_for_position(state: &WorldState, position: &PoliticalPosition) -> bool {
    position_eligibility(state, position).is_ok()
}

/// Chance of winning `position` with `campaign` behind you. Always within
/// [0.05, 0.95].
pub fn calculate_win_probability(
    state: &WorldState,
    position: &PoliticalPosition,
    campaign: &Campaign,
    rng: &mut dyn RngCore,
) -> f64 {
    let politics = &state.politics;
    let stats = &state.stats;

    let approval = politics.approval.clamp(0.0, 100.0) / 100.0;
    let opponent = position.base_campaign_cost.max(1) as f64 * rng.random_range(0.5..1.5);
    let funds = campaign.funds.max(0) as f64;
    let funding = funds / (funds + opponent);
    let party = politics.party.map(|p| p.base_support()).unwrap_or(0.0);
    let endorsements = campaign.endorsements.min(ENDORSEMENT_CAP) as f64 / ENDORSEMENT_CAP as f64;
    let composite = (stats.smarts + stats.looks + stats.willpower) as f64 / 300.0;

    let mut p = approval * APPROVAL_WEIGHT
        + funding * FUNDING_WEIGHT
        + party * PARTY_WEIGHT
        + endorsements * ENDORSEMENT_WEIGHT
        + composite * STATS_WEIGHT;
    if politics.in_office() {
        p += INCUMBENCY_BONUS;
    }
    if state.education.has_major(POLISCI_MAJOR) {
        p += POLISCI_BONUS;
    }
    p += rng.random_range(-NOISE..=NOISE);
    if !politics.scandals.is_empty() {
        p -= SCANDAL_PENALTY;
    }
    if politics.approval < LOW_APPROVAL {
        p -= LOW_APPROVAL_PENALTY;
    }
    if campaign.rigged {
        p += RIGGING_BONUS;
    }
    if !p.is_finite() {
        return WIN_MIN;
    }
    p.clamp(WIN_MIN, WIN_MAX)
}

/// Election day. Campaign money is spent win or lose; anything above the
/// seat's campaign cost goes back to the candidate.
pub fn resolve_election(ctx: &mut TickContext) -> ActionResult {
    let Some(campaign) = ctx.state.politics.campaign.clone() else {
        return Err(ineligible("you are not running for anything"));
    };
    if ctx.state.serial_killer.mode == ShadowMode::FullTime {
        return Err(ineligible("your nights are spoken for"));
    }
    let registries = ctx.registries;
    let Some(position) = registries.position(&campaign.position_id) else {
        return Err(ActionError::UnknownPosition(campaign.position_id));
    };

    let probability = calculate_win_probability(ctx.state, position, &campaign, ctx.rng);
    let spent = campaign.funds.min(position.base_campaign_cost);
    ctx.state.finances.cash += campaign.funds - spent;
    ctx.state.politics.campaign = None;
    if campaign.rigged {
        ctx.state.politics.corruption += RIGGING_CORRUPTION;
        ctx.state.politics.clamp();
    }

    let roll = ctx.roll();
    tracing::debug!(position = %position.id, probability, roll, "election");
    if roll < probability {
        take_office(ctx, position);
        let approval = ctx.rng.random_range(WIN_APPROVAL_MIN..=WIN_APPROVAL_MAX);
        ctx.state.politics.approval = approval;
        ctx.log(
            HistoryCategory::Politics,
            format!("You were elected {}.", position.title),
        );
        ctx.emit(SignalKind::PoliticalElectionWon {
            position_id: position.id.clone(),
        });
        Ok(format!("You won! You are now {}.", position.title))
    } else {
        ctx.state.politics.has_lost_election = true;
        ctx.adjust_stat(StatKind::Happiness, -LOSS_HAPPINESS_HIT);
        ctx.log(
            HistoryCategory::Politics,
            format!("You lost the race for {}.", position.title),
        );
        ctx.emit(SignalKind::PoliticalElectionLost {
            position_id: position.id.clone(),
        });
        Ok(format!("You lost the race for {}.", position.title))
    }
}
