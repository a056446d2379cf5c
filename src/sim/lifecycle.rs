//! Stages of the annual tick that belong to no single subsystem: the
//! calendar, the body, money, bounds, the birthday line, the year's random
//! event and the final mortality check.

use rand::Rng;

use super::context::TickContext;
use super::events::trigger_event;
use super::signal::SignalKind;
use super::system::LifeStage;
use crate::model::world::HOME_TIME_BUDGET;
use crate::model::{HistoryCategory, StatKind};

// ---------------------------------------------------------------------------
// Passive drift
// ---------------------------------------------------------------------------
const HEALTH_DECLINE_AGE: u32 = 50;
const HEALTH_DECLINE_RATE: f64 = 0.02;
const LOOKS_DECLINE_AGE: u32 = 35;
const LOOKS_DECLINE_CHANCE: f64 = 0.3;
const SMARTS_CREEP_MAX_AGE: u32 = 25;
const SMARTS_CREEP_CHANCE: f64 = 0.3;

// ---------------------------------------------------------------------------
// Wellbeing feedback
// ---------------------------------------------------------------------------
const HAPPY_THRESHOLD: i32 = 80;
const MISERABLE_THRESHOLD: i32 = 20;

// ---------------------------------------------------------------------------
// Finances
// ---------------------------------------------------------------------------
const DEBT_INTEREST: f64 = 0.05;

// ---------------------------------------------------------------------------
// Mortality
// ---------------------------------------------------------------------------
const OLD_AGE_START: u32 = 75;
/// Nobody lives past this.
const MAX_AGE: u32 = 122;
const MIN_OLD_AGE_CHANCE: f64 = 0.01;

pub const CAUSE_OLD_AGE: &str = "Old age";
pub const CAUSE_POOR_HEALTH: &str = "Poor health";

pub struct CalendarStage;

impl LifeStage for CalendarStage {
    fn name(&self) -> &str {
        "calendar"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let state = &mut *ctx.state;
        state.age += 1;
        state.year += 1;
        state.time_budget = HOME_TIME_BUDGET;
        state.location_time = 0;

        let crime = &mut state.flags.crime;
        if crime.prison_years > 0 {
            crime.prison_years -= 1;
            if crime.prison_years == 0 {
                state.log(HistoryCategory::Shadow, "You were released from prison.");
            }
        }
    }
}

pub struct PassiveStatsStage;

impl LifeStage for PassiveStatsStage {
    fn name(&self) -> &str {
        "passive_stats"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let age = ctx.state.age;
        if age > HEALTH_DECLINE_AGE {
            let chance = ((age - HEALTH_DECLINE_AGE) as f64 * HEALTH_DECLINE_RATE).min(1.0);
            if ctx.rng.random_bool(chance) {
                let loss = ctx.rng.random_range(1..=4);
                ctx.adjust_stat(StatKind::Health, -loss);
            }
        }
        if age > LOOKS_DECLINE_AGE && ctx.rng.random_bool(LOOKS_DECLINE_CHANCE) {
            let loss = ctx.rng.random_range(1..=2);
            ctx.adjust_stat(StatKind::Looks, -loss);
        }
        if age <= SMARTS_CREEP_MAX_AGE && ctx.rng.random_bool(SMARTS_CREEP_CHANCE) {
            ctx.adjust_stat(StatKind::Smarts, 1);
        }
    }
}

/// High spirits heal, misery wears the body down.
pub struct WellbeingStage;

impl LifeStage for WellbeingStage {
    fn name(&self) -> &str {
        "wellbeing"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let happiness = ctx.state.stats.happiness;
        if happiness >= HAPPY_THRESHOLD {
            let gain = ctx.rng.random_range(1..=2);
            ctx.adjust_stat(StatKind::Health, gain);
        } else if happiness <= MISERABLE_THRESHOLD {
            let loss = ctx.rng.random_range(1..=3);
            ctx.adjust_stat(StatKind::Health, -loss);
        }
    }
}

/// Interest first, then the year's net income.
pub struct FinancesStage;

impl LifeStage for FinancesStage {
    fn name(&self) -> &str {
        "finances"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let finances = &mut ctx.state.finances;
        if finances.debt > 0 {
            finances.debt += (finances.debt as f64 * DEBT_INTEREST).round() as i64;
        }
        finances.cash += finances.salary - finances.expenses;
    }
}

pub struct ClampStage;

impl LifeStage for ClampStage {
    fn name(&self) -> &str {
        "clamp"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let state = &mut *ctx.state;
        state.stats.clamp_all();
        state.politics.clamp();
        state.serial_killer.clamp();
        if let Some(profile) = state.flags.wrestling.as_mut() {
            profile.clamp();
        }
        for npc in state.relationships.iter_mut() {
            npc.relationship = npc.relationship.clamp(0, 100);
            npc.familiarity = npc.familiarity.clamp(0, 100);
        }
    }
}

pub struct BirthdayStage;

impl LifeStage for BirthdayStage {
    fn name(&self) -> &str {
        "birthday"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        let age = ctx.state.age;
        ctx.log(HistoryCategory::Milestone, format!("You are now {age} years old."));
        ctx.emit(SignalKind::AgeUp { age });
    }
}

pub struct RandomEventStage;

impl LifeStage for RandomEventStage {
    fn name(&self) -> &str {
        "random_event"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        if !ctx.state.is_alive {
            return;
        }
        let registries = ctx.registries;
        match registries.events.select_random_event(ctx.state, ctx.rng) {
            Some(event) => trigger_event(ctx, event),
            None => ctx.log(HistoryCategory::General, "Nothing eventful happened this year."),
        }
    }
}

/// Chance of dying of old age this year. Zero below 75.
pub fn old_age_chance(age: u32, health: i32) -> f64 {
    if age < OLD_AGE_START {
        return 0.0;
    }
    let raw = (age - OLD_AGE_START) as f64 / 100.0 - health as f64 / 100.0 * 0.1;
    raw.max(MIN_OLD_AGE_CHANCE)
}

/// At most one cause per year, first match wins: failed health, then the
/// hard age cap, then the old-age curve.
pub struct MortalityStage;

impl LifeStage for MortalityStage {
    fn name(&self) -> &str {
        "mortality"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        if !ctx.state.is_alive {
            return;
        }
        let age = ctx.state.age;
        let health = ctx.state.stats.health;
        if health <= 0 {
            ctx.kill_player(CAUSE_POOR_HEALTH);
        } else if age >= MAX_AGE {
            ctx.kill_player(CAUSE_OLD_AGE);
        } else if age >= OLD_AGE_START && ctx.roll() < old_age_chance(age, health) {
            ctx.kill_player(CAUSE_OLD_AGE);
        }
    }
}
