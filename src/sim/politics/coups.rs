use rand::Rng;

use super::office::{leave_office, office_career_id};
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::career::POLITICS_FIELD;
use crate::model::politics::SUPREME_LEADER_ID;
use crate::model::{GovernmentType, HistoryCategory, StatKind, WorldState};
use crate::sim::context::TickContext;
use crate::sim::registry::Registries;
use crate::sim::signal::SignalKind;

// --- Coups ---
const COUP_MIN_LEVEL: u32 = 2;
const COUP_MILITARY_GATE: f64 = 50.0;
const COUP_CRAZINESS_GATE: i32 = 40;
const COUP_MILITARY_WEIGHT: f64 = 0.5;
const COUP_OPPOSITION_WEIGHT: f64 = 0.3;
const COUP_NOISE_WEIGHT: f64 = 0.2;
const COUP_SUCCESS_MAX: f64 = 0.85;
const SUPREME_LEVEL: u32 = 5;
const SUPREME_TITLE: &str = "Supreme Leader";
const COUP_AUTHORITARIAN_GAIN: f64 = 30.0;
const FAILED_COUP_EXECUTION_CHANCE: f64 = 0.5;
const FAILED_COUP_PRISON_YEARS: u32 = 10;
pub const CAUSE_EXECUTED: &str = "Executed for treason";

pub fn can_stage_coup(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    let politics = &state.politics;
    if !politics.in_office() || politics.position_level < COUP_MIN_LEVEL {
        return Err(ineligible("you need a real seat of power first"));
    }
    if politics.position_level >= SUPREME_LEVEL {
        return Err(ineligible("there is nobody left to overthrow"));
    }
    if politics.military_control < COUP_MILITARY_GATE && state.stats.craziness < COUP_CRAZINESS_GATE {
        return Err(ineligible("the generals will not follow you"));
    }
    Ok(())
}

/// Chance a coup succeeds given a uniform `noise` draw in [0, 1).
pub fn coup_success_chance(state: &WorldState, noise: f64) -> f64 {
    let politics = &state.politics;
    let military = politics.military_control.clamp(0.0, 100.0) / 100.0;
    let opposition = politics.opposition_strength.clamp(0.0, 100.0) / 100.0;
    (military * COUP_MILITARY_WEIGHT
        + (1.0 - opposition) * COUP_OPPOSITION_WEIGHT
        + noise * COUP_NOISE_WEIGHT)
        .min(COUP_SUCCESS_MAX)
}

fn seize_power(ctx: &mut TickContext) {
    let registries = ctx.registries;
    let seat = registries.position(SUPREME_LEADER_ID);
    let title = seat.map_or(SUPREME_TITLE.to_string(), |p| p.title.clone());
    let level = seat.map_or(SUPREME_LEVEL, |p| p.level);

    let politics = &mut ctx.state.politics;
    politics.vacate_office();
    politics.current_position = Some(SUPREME_LEADER_ID.to_string());
    politics.position_level = level;
    politics.title = Some(title.clone());
    politics.government_type = GovernmentType::Dictatorship;
    politics.authoritarian_score += COUP_AUTHORITARIAN_GAIN;
    politics.campaign = None;
    politics.clamp();

    let career = &mut ctx.state.career;
    career.id = Some(office_career_id(SUPREME_LEADER_ID));
    career.title = title.clone();
    career.field = POLITICS_FIELD.to_string();
    career.level = level;
    if let Some(seat) = seat {
        ctx.state.finances.salary = seat.salary;
    }
    ctx.log(
        HistoryCategory::Politics,
        format!("The coup succeeded. You are now {title}."),
    );
}

/// Gamble everything on the army.
pub fn stage_coup(ctx: &mut TickContext) -> ActionResult {
    let noise = ctx.rng.random::<f64>();
    let chance = coup_success_chance(ctx.state, noise);
    let roll = ctx.roll();
    tracing::info!(chance, roll, "coup attempt");

    if roll < chance {
        seize_power(ctx);
        ctx.emit(SignalKind::PoliticalCoup { success: true });
        return Ok("The palace is yours.".to_string());
    }

    leave_office(ctx);
    ctx.adjust_stat(StatKind::Happiness, -20);
    ctx.log(HistoryCategory::Politics, "Your coup failed.");
    ctx.emit(SignalKind::PoliticalCoup { success: false });
    if ctx.roll() < FAILED_COUP_EXECUTION_CHANCE {
        ctx.kill_player(CAUSE_EXECUTED);
        Ok("The coup failed. You were executed.".to_string())
    } else {
        ctx.state.flags.crime.prison_years = FAILED_COUP_PRISON_YEARS;
        ctx.log(
            HistoryCategory::Politics,
            format!("You were sentenced to {FAILED_COUP_PRISON_YEARS} years in prison."),
        );
        Ok("The coup failed. You are going to prison.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;

    fn governor() -> WorldState {
        let mut s = WorldState::new("Test", 2040);
        s.age = 50;
        s.politics.current_position = Some("governor".to_string());
        s.politics.position_level = 3;
        s.career.id = Some(office_career_id("governor"));
        s
    }

    fn run(state: &mut WorldState, rng: &mut dyn rand::RngCore) -> ActionResult {
        let registries = Registries::new();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries: &registries,
            rng,
            signals: &mut signals,
        };
        stage_coup(&mut ctx)
    }

    #[test]
    fn gate_needs_army_or_madness() {
        let registries = Registries::new();
        let mut state = governor();
        state.stats.craziness = 10;
        assert!(can_stage_coup(&state, &registries).is_err());
        state.politics.military_control = 60.0;
        assert!(can_stage_coup(&state, &registries).is_ok());
        state.politics.military_control = 0.0;
        state.stats.craziness = 45;
        assert!(can_stage_coup(&state, &registries).is_ok());
        state.politics.position_level = 1;
        assert!(can_stage_coup(&state, &registries).is_err());
    }

    #[test]
    fn success_chance_is_capped() {
        let mut state = governor();
        state.politics.military_control = 100.0;
        state.politics.opposition_strength = 0.0;
        assert_eq!(coup_success_chance(&state, 0.99), COUP_SUCCESS_MAX);
    }

    #[test]
    fn successful_coup_installs_dictatorship() {
        let mut state = governor();
        state.politics.military_control = 90.0;
        state.politics.opposition_strength = 10.0;
        run(&mut state, &mut FixedRng::low()).unwrap();
        assert_eq!(state.politics.current_position.as_deref(), Some(SUPREME_LEADER_ID));
        assert_eq!(state.politics.position_level, 5);
        assert_eq!(state.politics.government_type, GovernmentType::Dictatorship);
    }

    #[test]
    fn failed_coup_ends_in_prison_or_death() {
        let mut state = governor();
        state.politics.opposition_strength = 100.0;
        run(&mut state, &mut FixedRng::high()).unwrap();
        assert!(!state.politics.in_office());
        assert!(state.career.id.is_none());
        assert!(state.is_alive);
        assert_eq!(state.flags.crime.prison_years, FAILED_COUP_PRISON_YEARS);
    }
}
