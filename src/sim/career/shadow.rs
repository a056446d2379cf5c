//! The double life. Heat pulls toward capture, notoriety unlocks better
//! contracts; the two rise together and only heat cools off.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::leave_job;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{HistoryCategory, SerialContract, ShadowMode, StatKind, WorldState};
use crate::sim::actions::{ActionDef, ActionDomain, charge, check_basics};
use crate::sim::context::TickContext;
use crate::sim::registry::Registries;
use crate::sim::signal::SignalKind;

// ---------------------------------------------------------------------------
// Unlock gate
// ---------------------------------------------------------------------------
const UNLOCK_MIN_AGE: u32 = 18;
const UNLOCK_MIN_CRAZINESS: i32 = 70;
const UNLOCK_MAX_WILLPOWER: i32 = 55;

// ---------------------------------------------------------------------------
// Yearly cooling
// ---------------------------------------------------------------------------
const HEAT_DECAY_DOUBLE_LIFE: i32 = 7;
const HEAT_DECAY_FULL_TIME: i32 = 12;
const NOTORIETY_DECAY: i32 = 2;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------
const CAPTURE_HEAT: i32 = 70;
const CAPTURE_SPAN: f64 = 130.0;
const CAPTURE_HAPPINESS_HIT: i32 = 40;
const CAPTURE_KARMA_HIT: i32 = 30;
const CAPTURE_SENTENCE_YEARS: u32 = 40;

const CONTRACT_WEIGHT_FLOOR: i32 = 5;
const MODE_SWITCH_TIME: u32 = 1;

const ALIASES: &[&str] = &[
    "The Whisper",
    "The Lamplighter",
    "Nightjar",
    "The Quiet Neighbor",
    "Velvet",
];

pub fn can_unlock(state: &WorldState) -> bool {
    state.age >= UNLOCK_MIN_AGE
        && state.stats.craziness >= UNLOCK_MIN_CRAZINESS
        && state.stats.willpower <= UNLOCK_MAX_WILLPOWER
}

/// Capture chance for a given heat. Zero below the threshold.
pub fn capture_chance(heat: i32) -> f64 {
    if heat < CAPTURE_HEAT {
        return 0.0;
    }
    (heat - CAPTURE_HEAT) as f64 / CAPTURE_SPAN
}

/// Contracts the player's notoriety has earned access to.
pub fn open_contracts<'a>(state: &WorldState, registries: &'a Registries) -> Vec<&'a SerialContract> {
    registries
        .serial_contracts
        .iter()
        .filter(|c| c.min_notoriety <= state.serial_killer.notoriety)
        .collect()
}

fn capture(ctx: &mut TickContext) {
    let sk = &mut ctx.state.serial_killer;
    sk.mode = ShadowMode::None;
    sk.caught = true;
    let alias = sk.alias.clone().unwrap_or_else(|| "the killer".to_string());
    leave_job(ctx.state);
    ctx.state.politics.vacate_office();
    ctx.state.flags.crime.prison_years = CAPTURE_SENTENCE_YEARS;
    ctx.adjust_stat(StatKind::Happiness, -CAPTURE_HAPPINESS_HIT);
    ctx.adjust_stat(StatKind::Karma, -CAPTURE_KARMA_HIT);
    ctx.log(
        HistoryCategory::Shadow,
        format!("You were unmasked as {alias} and sentenced to {CAPTURE_SENTENCE_YEARS} years."),
    );
    tracing::info!(age = ctx.state.age, "shadow identity captured");
    ctx.emit(SignalKind::ShadowCaptured);
}

/// Heat and notoriety cool off, then the law may catch up.
pub fn process_shadow_year(ctx: &mut TickContext) {
    let year = ctx.state.year;
    let sk = &mut ctx.state.serial_killer;
    if !sk.unlocked || sk.caught {
        return;
    }
    sk.heat -= match sk.mode {
        ShadowMode::DoubleLife => HEAT_DECAY_DOUBLE_LIFE,
        ShadowMode::FullTime | ShadowMode::None => HEAT_DECAY_FULL_TIME,
    };
    if sk.last_kill_year != Some(year - 1) {
        sk.notoriety -= NOTORIETY_DECAY;
    }
    sk.clamp();

    let chance = capture_chance(sk.heat);
    if chance > 0.0 && ctx.roll() < chance {
        capture(ctx);
    }
}

/// Switch between dormant, double life and full time. Going full time means
/// quitting whatever job you hold.
pub fn set_shadow_mode(ctx: &mut TickContext, mode: ShadowMode) -> ActionResult {
    check_basics(ctx.state, UNLOCK_MIN_AGE, MODE_SWITCH_TIME, 0)?;
    let sk = &ctx.state.serial_killer;
    if !sk.unlocked || sk.caught {
        return Err(ineligible("that life is not open to you"));
    }
    if sk.mode == mode {
        return Err(ineligible("nothing would change"));
    }
    if mode == ShadowMode::FullTime && ctx.state.politics.in_office() {
        return Err(ineligible("you cannot disappear while holding office"));
    }
    if mode == ShadowMode::FullTime && ctx.state.politics.in_campaign() {
        return Err(ineligible("you cannot disappear in the middle of a campaign"));
    }
    charge(ctx.state, MODE_SWITCH_TIME, 0)?;

    ctx.state.serial_killer.mode = mode;
    let line = match mode {
        ShadowMode::FullTime => {
            leave_job(ctx.state);
            "You gave up your day job for the shadows."
        }
        ShadowMode::DoubleLife => "You went back to leading a double life.",
        ShadowMode::None => "You put the old life behind you. For now.",
    };
    ctx.log(HistoryCategory::Shadow, line);
    Ok(line.to_string())
}

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "embrace_darkness",
            label: "Embrace the darkness",
            domain: ActionDomain::Shadow,
            min_age: UNLOCK_MIN_AGE,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_embrace,
            perform: embrace_darkness,
        },
        ActionDef {
            id: "serial_contract",
            label: "Take a contract",
            domain: ActionDomain::Shadow,
            min_age: UNLOCK_MIN_AGE,
            time_cost: 2,
            cost: 0,
            location: None,
            check: can_take_contract,
            perform: serial_contract,
        },
        ActionDef {
            id: "lay_low",
            label: "Lay low",
            domain: ActionDomain::Shadow,
            min_age: UNLOCK_MIN_AGE,
            time_cost: 2,
            cost: 0,
            location: None,
            check: is_unlocked,
            perform: lay_low,
        },
    ]
}

fn can_embrace(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if state.serial_killer.unlocked || state.serial_killer.caught {
        return Err(ineligible("there is no going back"));
    }
    if !can_unlock(state) {
        return Err(ineligible("you are not that kind of person"));
    }
    Ok(())
}

fn embrace_darkness(ctx: &mut TickContext) -> ActionResult {
    let alias = ALIASES.choose(ctx.rng).copied().unwrap_or("The Whisper");
    let sk = &mut ctx.state.serial_killer;
    sk.unlocked = true;
    sk.mode = ShadowMode::DoubleLife;
    sk.alias = Some(alias.to_string());
    ctx.adjust_stat(StatKind::Karma, -5);
    ctx.log(
        HistoryCategory::Shadow,
        format!("Something inside you changed. They will call you {alias}."),
    );
    Ok(format!("You embraced the darkness as {alias}."))
}

fn is_unlocked(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if !state.serial_killer.unlocked || state.serial_killer.caught {
        return Err(ineligible("you have nothing to hide"));
    }
    Ok(())
}

fn can_take_contract(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    if !state.serial_killer.is_active() {
        return Err(ineligible("you are not active"));
    }
    if open_contracts(state, registries).is_empty() {
        return Err(ineligible("nobody is hiring someone with your reputation"));
    }
    Ok(())
}

/// Weighted toward the contracts that need the most notoriety.
fn pick_contract<'a>(contracts: &[&'a SerialContract], roll: f64) -> Option<&'a SerialContract> {
    let weight = |c: &SerialContract| (c.min_notoriety + CONTRACT_WEIGHT_FLOOR).max(1) as f64;
    let total: f64 = contracts.iter().map(|&c| weight(c)).sum();
    let pick = roll * total;
    let mut cumulative = 0.0;
    for &contract in contracts {
        cumulative += weight(contract);
        if pick < cumulative {
            return Some(contract);
        }
    }
    contracts.last().copied()
}

fn serial_contract(ctx: &mut TickContext) -> ActionResult {
    let registries = ctx.registries;
    let contracts = open_contracts(ctx.state, registries);
    let pick = ctx.roll();
    let Some(contract) = pick_contract(&contracts, pick) else {
        return Err(ineligible("nobody is hiring someone with your reputation"));
    };
    let botched = ctx.roll() < contract.risk;
    let year = ctx.state.year;
    let sk = &mut ctx.state.serial_killer;
    sk.last_contract_year = Some(year);

    if botched {
        sk.heat += contract.heat / 2;
        sk.notoriety += contract.notoriety / 2;
        sk.clamp();
        ctx.adjust_stat(StatKind::Happiness, -5);
        ctx.log(
            HistoryCategory::Shadow,
            format!("The {} job went wrong.", contract.title),
        );
        return Ok(format!("You botched the {} job.", contract.title));
    }

    sk.heat += contract.heat;
    sk.notoriety += contract.notoriety;
    sk.kills += 1;
    sk.contracts_completed += 1;
    sk.last_kill_year = Some(year);
    sk.clamp();
    ctx.state.finances.cash += contract.payout;
    ctx.adjust_stat(StatKind::Happiness, 5);
    ctx.adjust_stat(StatKind::Karma, -10);
    ctx.log(
        HistoryCategory::Shadow,
        format!("You completed the {} job.", contract.title),
    );
    Ok(format!(
        "The {} job is done. ${} richer.",
        contract.title, contract.payout
    ))
}

fn lay_low(ctx: &mut TickContext) -> ActionResult {
    let cooling = ctx.rng.random_range(10..=15);
    let sk = &mut ctx.state.serial_killer;
    sk.heat -= cooling;
    sk.clamp();
    ctx.adjust_stat(StatKind::Happiness, -2);
    Ok("You kept your head down and your hands clean.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;
    use crate::sim::actions::perform_action;

    fn contracts() -> Vec<SerialContract> {
        serde_json::from_value(serde_json::json!([
            {"id": "alley", "title": "Back-alley", "risk": 0.1, "payout": 5000,
             "heat": 20, "notoriety": 10},
            {"id": "senator", "title": "Senator", "risk": 0.5, "payout": 100000,
             "heat": 50, "notoriety": 30, "min_notoriety": 40}
        ]))
        .unwrap()
    }

    fn dark() -> WorldState {
        let mut s = WorldState::new("Test", 2020);
        s.age = 30;
        s.stats.craziness = 80;
        s.stats.willpower = 40;
        s
    }

    fn run<R>(
        state: &mut WorldState,
        rng: &mut dyn rand::RngCore,
        f: impl FnOnce(&mut TickContext) -> R,
    ) -> R {
        let mut registries = Registries::new();
        registries.register_serial_contracts(contracts());
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries: &registries,
            rng,
            signals: &mut signals,
        };
        f(&mut ctx)
    }

    #[test]
    fn unlock_gate() {
        let mut state = dark();
        assert!(can_unlock(&state));
        state.stats.willpower = 60;
        assert!(!can_unlock(&state));
        state.stats.willpower = 40;
        state.age = 17;
        assert!(!can_unlock(&state));
    }

    #[test]
    fn embracing_starts_a_double_life() {
        let mut state = dark();
        run(&mut state, &mut FixedRng::low(), |ctx| {
            perform_action(ctx, "embrace_darkness")
        })
        .unwrap();
        assert!(state.serial_killer.is_active());
        assert_eq!(state.serial_killer.mode, ShadowMode::DoubleLife);
        assert!(state.serial_killer.alias.is_some());
    }

    #[test]
    fn full_time_clears_the_career() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::DoubleLife;
        state.career.id = Some("clerk".to_string());
        state.finances.salary = 30_000;
        run(&mut state, &mut FixedRng::low(), |ctx| {
            set_shadow_mode(ctx, ShadowMode::FullTime)
        })
        .unwrap();
        assert_eq!(state.serial_killer.mode, ShadowMode::FullTime);
        assert!(state.career.id.is_none());
        assert_eq!(state.finances.salary, 0);
    }

    #[test]
    fn open_campaign_blocks_full_time() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::DoubleLife;
        state.politics.campaign = Some(crate::model::Campaign {
            position_id: "mayor".to_string(),
            funds: 0,
            rallies: 0,
            endorsements: 0,
            rigged: false,
            lobbyist_donations: 0,
            declared_year: 2020,
        });
        let before = state.clone();
        let result = run(&mut state, &mut FixedRng::low(), |ctx| {
            set_shadow_mode(ctx, ShadowMode::FullTime)
        });
        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn capture_curve() {
        assert_eq!(capture_chance(69), 0.0);
        assert_eq!(capture_chance(70), 0.0);
        assert!((capture_chance(100) - 30.0 / 130.0).abs() < 1e-12);
    }

    #[test]
    fn heat_decays_by_mode() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::DoubleLife;
        state.serial_killer.heat = 50;
        state.serial_killer.notoriety = 10;
        run(&mut state, &mut FixedRng::high(), process_shadow_year);
        assert_eq!(state.serial_killer.heat, 43);
        assert_eq!(state.serial_killer.notoriety, 8);

        state.serial_killer.mode = ShadowMode::FullTime;
        state.serial_killer.last_kill_year = Some(state.year - 1);
        run(&mut state, &mut FixedRng::high(), process_shadow_year);
        assert_eq!(state.serial_killer.heat, 31);
        assert_eq!(state.serial_killer.notoriety, 8);
    }

    #[test]
    fn hot_killer_gets_caught() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::FullTime;
        state.serial_killer.heat = 100;
        run(&mut state, &mut FixedRng::low(), process_shadow_year);
        let sk = &state.serial_killer;
        assert!(sk.caught);
        assert_eq!(sk.mode, ShadowMode::None);
        assert!(state.flags.is_set("in_prison"));
        assert!(state.stats.karma < 50);
    }

    #[test]
    fn contract_choice_respects_notoriety() {
        let state = dark();
        let mut registries = Registries::new();
        registries.register_serial_contracts(contracts());
        let open = open_contracts(&state, &registries);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "alley");
    }

    #[test]
    fn completed_contract_pays_and_heats_up() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::DoubleLife;
        run(&mut state, &mut FixedRng::high(), |ctx| {
            perform_action(ctx, "serial_contract")
        })
        .unwrap();
        let sk = &state.serial_killer;
        assert_eq!(sk.kills, 1);
        assert_eq!(sk.heat, 20);
        assert_eq!(state.finances.cash, 5_000);
    }

    #[test]
    fn botched_contract_pays_nothing() {
        let mut state = dark();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::DoubleLife;
        run(&mut state, &mut FixedRng::low(), |ctx| {
            perform_action(ctx, "serial_contract")
        })
        .unwrap();
        let sk = &state.serial_killer;
        assert_eq!(sk.kills, 0);
        assert_eq!(sk.heat, 10);
        assert_eq!(state.finances.cash, 0);
    }
}
