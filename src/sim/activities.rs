use rand::Rng;

use super::actions::{ActionDef, ActionDomain, always};
use super::context::TickContext;
use super::registry::Registries;
use super::relationships::seed_location;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{HistoryCategory, Location, StatKind, WorldState};

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------
/// Home months spent getting anywhere.
pub const TRAVEL_COST: u32 = 1;
/// Months available at a location after arriving.
pub const AWAY_TIME_BUDGET: u32 = 3;
const TRAVEL_MIN_AGE: u32 = 5;
const NIGHTCLUB_MIN_AGE: u32 = 18;

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------
const GYM_FEE: i64 = 50;
const DOCTOR_FEE: i64 = 200;
const PARTY_COST: i64 = 80;
const SURGERY_COST: i64 = 5_000;
const LOAN_AMOUNT: i64 = 5_000;
const MAX_DEBT: i64 = 50_000;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------
const SURGERY_BOTCH_CHANCE: f64 = 0.08;
const PARTY_HANGOVER_CHANCE: f64 = 0.3;

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "gym",
            label: "Work out at the gym",
            domain: ActionDomain::Activity,
            min_age: 12,
            time_cost: 1,
            cost: GYM_FEE,
            location: Some(Location::Gym),
            check: always,
            perform: gym,
        },
        ActionDef {
            id: "meditate",
            label: "Meditate",
            domain: ActionDomain::Activity,
            min_age: 8,
            time_cost: 1,
            cost: 0,
            location: None,
            check: always,
            perform: meditate,
        },
        ActionDef {
            id: "read_book",
            label: "Read a book",
            domain: ActionDomain::Activity,
            min_age: 5,
            time_cost: 1,
            cost: 0,
            location: None,
            check: always,
            perform: read_book,
        },
        ActionDef {
            id: "visit_doctor",
            label: "See a doctor",
            domain: ActionDomain::Activity,
            min_age: 0,
            time_cost: 1,
            cost: DOCTOR_FEE,
            location: Some(Location::Hospital),
            check: always,
            perform: visit_doctor,
        },
        ActionDef {
            id: "party",
            label: "Go out partying",
            domain: ActionDomain::Activity,
            min_age: 18,
            time_cost: 1,
            cost: PARTY_COST,
            location: Some(Location::Nightclub),
            check: always,
            perform: party,
        },
        ActionDef {
            id: "volunteer",
            label: "Volunteer",
            domain: ActionDomain::Activity,
            min_age: 12,
            time_cost: 1,
            cost: 0,
            location: None,
            check: always,
            perform: volunteer,
        },
        ActionDef {
            id: "cosmetic_surgery",
            label: "Get cosmetic surgery",
            domain: ActionDomain::Activity,
            min_age: 18,
            time_cost: 1,
            cost: SURGERY_COST,
            location: Some(Location::Hospital),
            check: always,
            perform: cosmetic_surgery,
        },
        ActionDef {
            id: "take_loan",
            label: "Take out a loan",
            domain: ActionDomain::Activity,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_borrow,
            perform: take_loan,
        },
        ActionDef {
            id: "repay_debt",
            label: "Repay debt",
            domain: ActionDomain::Activity,
            min_age: 18,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_repay,
            perform: repay_debt,
        },
    ]
}

fn gym(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(2..=5);
    let health = ctx.rng.random_range(1..=3);
    ctx.adjust_stat(StatKind::Athleticism, gain);
    ctx.adjust_stat(StatKind::Health, health);
    ctx.adjust_stat(StatKind::Looks, 1);
    Ok("You worked up a sweat at the gym.".to_string())
}

fn meditate(ctx: &mut TickContext) -> ActionResult {
    let calm = ctx.rng.random_range(2..=5);
    ctx.adjust_stat(StatKind::Happiness, calm);
    ctx.adjust_stat(StatKind::Willpower, 2);
    ctx.adjust_stat(StatKind::Craziness, -2);
    Ok("You cleared your mind.".to_string())
}

fn read_book(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(1..=4);
    ctx.adjust_stat(StatKind::Smarts, gain);
    Ok("You finished a book.".to_string())
}

fn visit_doctor(ctx: &mut TickContext) -> ActionResult {
    let health = ctx.state.stats.health;
    let gain = if health < 40 {
        ctx.rng.random_range(10..=20)
    } else {
        ctx.rng.random_range(3..=8)
    };
    ctx.adjust_stat(StatKind::Health, gain);
    ctx.log(HistoryCategory::Health, "You saw a doctor.");
    Ok("The doctor patched you up.".to_string())
}

fn party(ctx: &mut TickContext) -> ActionResult {
    let fun = ctx.rng.random_range(3..=8);
    ctx.adjust_stat(StatKind::Happiness, fun);
    ctx.adjust_stat(StatKind::Craziness, 1);
    if ctx.rng.random_bool(PARTY_HANGOVER_CHANCE) {
        ctx.adjust_stat(StatKind::Health, -3);
        return Ok("Great night. Brutal hangover.".to_string());
    }
    Ok("You partied until sunrise.".to_string())
}

fn volunteer(ctx: &mut TickContext) -> ActionResult {
    let karma = ctx.rng.random_range(2..=5);
    ctx.adjust_stat(StatKind::Karma, karma);
    ctx.adjust_stat(StatKind::Happiness, 2);
    Ok("You gave your time to a good cause.".to_string())
}

fn cosmetic_surgery(ctx: &mut TickContext) -> ActionResult {
    if ctx.rng.random_bool(SURGERY_BOTCH_CHANCE) {
        ctx.adjust_stat(StatKind::Looks, -10);
        ctx.adjust_stat(StatKind::Health, -5);
        ctx.log(HistoryCategory::Health, "Your cosmetic surgery was botched.");
        return Ok("The surgery went badly.".to_string());
    }
    let gain = ctx.rng.random_range(5..=15);
    ctx.adjust_stat(StatKind::Looks, gain);
    ctx.log(HistoryCategory::Health, "You had cosmetic surgery.");
    Ok("You look fantastic.".to_string())
}

fn can_borrow(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if state.finances.debt + LOAN_AMOUNT > MAX_DEBT {
        return Err(ineligible("the bank will not lend you any more"));
    }
    Ok(())
}

fn take_loan(ctx: &mut TickContext) -> ActionResult {
    ctx.state.finances.cash += LOAN_AMOUNT;
    ctx.state.finances.debt += LOAN_AMOUNT;
    ctx.log(HistoryCategory::Finance, format!("You borrowed ${LOAN_AMOUNT}."));
    Ok(format!("The bank lent you ${LOAN_AMOUNT}."))
}

fn can_repay(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if state.finances.debt <= 0 {
        return Err(ineligible("you have no debt"));
    }
    if state.finances.cash <= 0 {
        return Err(ActionError::NotEnoughMoney {
            needed: 1,
            available: state.finances.cash,
        });
    }
    Ok(())
}

fn repay_debt(ctx: &mut TickContext) -> ActionResult {
    let amount = ctx.state.finances.cash.min(ctx.state.finances.debt);
    ctx.state.finances.cash -= amount;
    ctx.state.finances.debt -= amount;
    ctx.log(HistoryCategory::Finance, format!("You repaid ${amount} of debt."));
    Ok(format!("You paid back ${amount}."))
}

/// Youngest age allowed to leave home for `destination`.
fn min_travel_age(destination: Location) -> u32 {
    match destination {
        Location::Home | Location::Hospital => 0,
        Location::Nightclub => NIGHTCLUB_MIN_AGE,
        _ => TRAVEL_MIN_AGE,
    }
}

/// Leave home for `destination`. Costs one home month and opens a short away
/// budget; people at the destination are seeded on arrival.
pub fn travel_to(ctx: &mut TickContext, destination: Location) -> ActionResult {
    if !ctx.state.is_alive {
        return Err(ActionError::NotAlive);
    }
    ctx.state.check_free()?;
    if destination.is_home() {
        return Err(ineligible("you are already on your way home"));
    }
    if !ctx.state.is_home() {
        return Err(ActionError::NotAtHome);
    }
    let min_age = min_travel_age(destination);
    if ctx.state.age < min_age {
        return Err(ActionError::TooYoung { min_age });
    }
    ctx.state.spend_time(TRAVEL_COST)?;
    ctx.state.current_location = destination;
    ctx.state.location_time = AWAY_TIME_BUDGET;
    seed_location(ctx, destination);
    Ok(format!("You headed to the {destination}."))
}

/// Come home. Free; any unused away time is lost.
pub fn return_home(ctx: &mut TickContext) -> ActionResult {
    if !ctx.state.is_alive {
        return Err(ActionError::NotAlive);
    }
    if ctx.state.is_home() {
        return Err(ineligible("you are already home"));
    }
    ctx.state.current_location = Location::Home;
    ctx.state.location_time = 0;
    Ok("You went home.".to_string())
}
