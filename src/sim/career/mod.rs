//! Jobs: eligibility, hiring, the yearly review and the day-to-day actions.
//!
//! Wrestling and shadow-crime careers hang off this module as their own
//! submodules; [`CareerStage`] drives all three each year.

pub mod shadow;
pub mod wrestling;

use rand::Rng;

use super::actions::{ActionDef, ActionDomain, charge, check_basics};
use super::context::TickContext;
use super::registry::Registries;
use super::relationships::random_name;
use super::signal::SignalKind;
use super::system::LifeStage;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::career::{ENGINEERING_FOUNDER_ID, LAW_FIELD, WrestlingContract};
use crate::model::{
    Affiliation, CareerDefinition, EducationLevel, HistoryCategory, Npc, NpcKind, ShadowMode,
    StatKind, WorldState,
};

// ---------------------------------------------------------------------------
// Hiring
// ---------------------------------------------------------------------------
const APPLY_TIME_COST: u32 = 1;
const HIRE_BASELINE: f64 = 0.5;
const HIRE_SMARTS_WEIGHT: f64 = 0.01;
const HIRE_WILLPOWER_WEIGHT: f64 = 0.007;
const HIRE_GPA_WEIGHT: f64 = 0.12;
const HIRE_GPA_PIVOT: f64 = 2.5;
const HIRE_DIFFICULTY_WEIGHT: f64 = 0.25;
const HIRE_MIN: f64 = 0.15;
const HIRE_MAX: f64 = 0.95;
const STARTING_PERFORMANCE: i32 = 55;

// ---------------------------------------------------------------------------
// Yearly review
// ---------------------------------------------------------------------------
const PERFORMANCE_DRIFT: i32 = 4;
const RAISE_THRESHOLD: i32 = 72;
const PROMOTION_THRESHOLD: i32 = 80;
const PROMOTION_CHANCE: f64 = 0.55;
const FIRING_THRESHOLD: i32 = 25;
const FIRING_CHANCE: f64 = 0.25;

// ---------------------------------------------------------------------------
// Startup founders
// ---------------------------------------------------------------------------
const FOUNDER_MIN_AGE: u32 = 21;
const FOUNDER_MIN_SMARTS: i32 = 65;
const FOUNDER_SEED_MONEY: i64 = 10_000;
const FOUNDER_START_SALARY: i64 = 30_000;
const FOUNDER_SETBACK_CHANCE: f64 = 0.2;
const FOUNDER_MAJORS: &[&str] = &["Computer Science", "Engineering"];

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------
const RAISE_ASK_FLAG: &str = "career_raise_asked_year";
const RAISE_ASK_MIN_PERFORMANCE: i32 = 65;
const RAISE_ASK_CHANCE: f64 = 0.5;
const RETIREMENT_AGE: u32 = 55;

/// Career ids of this shape belong to an elected office, not the catalog.
pub const POLITICS_CAREER_PREFIX: &str = "politics:";

/// Why `def` is out of reach, checking the cheap gates first.
pub fn career_eligibility(state: &WorldState, def: &CareerDefinition) -> Result<(), ActionError> {
    if state.age < def.min_age {
        return Err(ActionError::TooYoung {
            min_age: def.min_age,
        });
    }
    if state.education.level < def.required_education {
        return Err(ineligible(format!(
            "requires {} education",
            def.required_education
        )));
    }
    let stats = &state.stats;
    let floors = [
        (StatKind::Smarts, stats.smarts, def.min_smarts),
        (StatKind::Willpower, stats.willpower, def.min_willpower),
        (StatKind::Looks, stats.looks, def.min_looks),
        (StatKind::Athleticism, stats.athleticism, def.min_athleticism),
    ];
    for (kind, have, need) in floors {
        if have < need {
            return Err(ineligible(format!("requires {kind} of at least {need}")));
        }
    }
    if !def.required_majors.is_empty()
        && !def.required_majors.iter().any(|m| state.education.has_major(m))
    {
        return Err(ineligible(format!(
            "requires a degree in {}",
            def.required_majors.join(" or ")
        )));
    }
    if let Some(flag) = def.required_flags.iter().find(|f| !state.flags.is_set(f)) {
        return Err(ineligible(format!("requires {flag}")));
    }
    let experience = &state.career.experience;
    let years = [
        (def.min_years_experience, experience.total_years, "years of experience"),
        (def.min_law_years, experience.law_years, "years in law"),
        (
            def.min_licensed_law_years,
            experience.licensed_law_years,
            "years as a licensed lawyer",
        ),
    ];
    for (need, have, what) in years {
        if let Some(need) = need
            && have < need
        {
            return Err(ineligible(format!("requires {need} {what}")));
        }
    }
    Ok(())
}

pub fn can_apply(state: &WorldState, def: &CareerDefinition) -> bool {
    career_eligibility(state, def).is_ok()
}

pub fn eligible_careers<'a>(state: &WorldState, registries: &'a Registries) -> Vec<&'a CareerDefinition> {
    registries
        .careers
        .iter()
        .filter(|def| can_apply(state, def))
        .collect()
}

/// Chance an application to `def` succeeds.
pub fn hire_chance(state: &WorldState, def: &CareerDefinition) -> f64 {
    let stats = &state.stats;
    let raw = (stats.smarts - def.min_smarts) as f64 * HIRE_SMARTS_WEIGHT
        + (stats.willpower - def.min_willpower) as f64 * HIRE_WILLPOWER_WEIGHT
        + (state.education.gpa - HIRE_GPA_PIVOT) * HIRE_GPA_WEIGHT
        + HIRE_BASELINE
        - def.difficulty * HIRE_DIFFICULTY_WEIGHT;
    raw.clamp(HIRE_MIN, HIRE_MAX)
}

/// True for catalog jobs and startups, false for political office.
pub fn has_regular_job(state: &WorldState) -> bool {
    state
        .career
        .id
        .as_deref()
        .is_some_and(|id| !id.starts_with(POLITICS_CAREER_PREFIX))
}

/// Walk away from whatever job is held. Lifetime experience stays.
pub fn leave_job(state: &mut WorldState) {
    state.career.clear_job();
    state.finances.salary = 0;
    state.wrestling_contract = None;
}

fn take_job(ctx: &mut TickContext, def: &CareerDefinition) {
    leave_job(ctx.state);
    let career = &mut ctx.state.career;
    career.id = Some(def.id.clone());
    career.title = def.title.clone();
    career.field = def.field.clone();
    career.specialization = def.specialization.clone();
    career.level = 1;
    career.performance = STARTING_PERFORMANCE;
    career.retired = false;
    ctx.state.finances.salary = def.start_salary;

    if def.is_wrestling() {
        let promotion_id = def
            .promotion_id
            .clone()
            .unwrap_or_else(|| wrestling::INDIE_PROMOTION.to_string());
        ctx.state.wrestling_contract = Some(WrestlingContract {
            promotion_name: wrestling::promotion_name(&promotion_id),
            promotion_id,
            years_remaining: wrestling::CONTRACT_YEARS,
            salary: def.start_salary,
        });
        let profile = wrestling::ensure_wrestling_profile(ctx.state);
        profile.free_agent = false;
    }
}

/// Apply for a catalog job. A rejection still costs the time.
pub fn apply_for_career(ctx: &mut TickContext, career_id: &str) -> ActionResult {
    let registries = ctx.registries;
    let Some(def) = registries.career(career_id) else {
        return Err(ActionError::UnknownCareer(career_id.to_string()));
    };
    check_basics(ctx.state, def.min_age, APPLY_TIME_COST, 0)?;
    if ctx.state.serial_killer.mode == ShadowMode::FullTime {
        return Err(ineligible("your nights are spoken for"));
    }
    if ctx.state.career.id.as_deref() == Some(def.id.as_str()) {
        return Err(ineligible(format!("you already work as a {}", def.title)));
    }
    if ctx.state.politics.in_office() {
        return Err(ineligible("you hold public office"));
    }
    career_eligibility(ctx.state, def)?;
    charge(ctx.state, APPLY_TIME_COST, 0)?;

    let chance = hire_chance(ctx.state, def);
    let roll = ctx.roll();
    tracing::debug!(career = %def.id, chance, roll, "job application");
    if roll < chance {
        take_job(ctx, def);
        ctx.log(
            HistoryCategory::Career,
            format!("You were hired as a {}.", def.title),
        );
        ctx.emit(SignalKind::CareerHired {
            career_id: def.id.clone(),
        });
        Ok(format!("You got the job! You are now a {}.", def.title))
    } else {
        ctx.state.career.rejections += 1;
        ctx.adjust_stat(StatKind::Happiness, -2);
        Ok(format!("Your application for {} was rejected.", def.title))
    }
}

fn fire(ctx: &mut TickContext, reason: &str) {
    let Some(career_id) = ctx.state.career.id.clone() else {
        return;
    };
    let title = ctx.state.career.title.clone();
    leave_job(ctx.state);
    ctx.adjust_stat(StatKind::Happiness, -10);
    ctx.log(
        HistoryCategory::Career,
        format!("You were fired from your job as {title}: {reason}."),
    );
    ctx.emit(SignalKind::CareerFired { career_id });
}

fn accrue_experience(state: &mut WorldState) {
    let licensed = state.flags.law.license_bar;
    let career = &mut state.career;
    career.years_in_role += 1;
    career.years_in_field += 1;
    career.experience.total_years += 1;
    if career.field == LAW_FIELD {
        career.experience.law_years += 1;
        if licensed {
            career.experience.licensed_law_years += 1;
        }
    }
}

fn promotion_chance(state: &WorldState, def: &CareerDefinition) -> Option<f64> {
    let career = &state.career;
    if career.level == 0
        || career.performance < PROMOTION_THRESHOLD
        || career.years_in_role < (career.level * 2).max(2)
        || career.level as usize > def.promotion_titles.len()
    {
        return None;
    }
    if def.is_wrestling() {
        return wrestling::push_promotion_chance(state);
    }
    Some(PROMOTION_CHANCE)
}

fn promote(ctx: &mut TickContext, def: &CareerDefinition) {
    let Some(idx) = (ctx.state.career.level as usize).checked_sub(1) else {
        return;
    };
    let Some(title) = def.promotion_titles.get(idx).cloned() else {
        return;
    };
    let career = &mut ctx.state.career;
    career.level += 1;
    career.years_in_role = 0;
    career.title = title.clone();
    let salary = &mut ctx.state.finances.salary;
    *salary += (*salary as f64 * def.promotion_raise).round() as i64;
    ctx.adjust_stat(StatKind::Happiness, 5);
    ctx.log(
        HistoryCategory::Career,
        format!("You were promoted to {title}."),
    );
    ctx.emit(SignalKind::CareerPromoted { title });
}

/// A self-made company: no catalog entry, no boss, lumpy income.
fn process_founder_year(ctx: &mut TickContext) {
    if ctx.roll() < FOUNDER_SETBACK_CHANCE {
        let salary = &mut ctx.state.finances.salary;
        *salary = (*salary as f64 * 0.7).round() as i64;
        ctx.state.career.adjust_performance(-10);
        ctx.adjust_stat(StatKind::Happiness, -5);
        ctx.log(HistoryCategory::Career, "Your startup hit a rough patch.");
    } else {
        let growth = ctx.rng.random_range(0.05..=0.35);
        let salary = &mut ctx.state.finances.salary;
        *salary += (*salary as f64 * growth).round() as i64;
        ctx.state.career.adjust_performance(5);
    }
}

/// One year on the job: experience, drift, raise, promotion, then firing.
pub fn process_career_year(ctx: &mut TickContext) {
    let Some(career_id) = ctx.state.career.id.clone() else {
        return;
    };
    if career_id.starts_with(POLITICS_CAREER_PREFIX) {
        return;
    }
    accrue_experience(ctx.state);

    if career_id == ENGINEERING_FOUNDER_ID {
        process_founder_year(ctx);
        return;
    }
    let registries = ctx.registries;
    let Some(def) = registries.career(&career_id) else {
        tracing::warn!(career = %career_id, "career not in catalog, skipping review");
        return;
    };

    let drift = ctx.rng.random_range(-PERFORMANCE_DRIFT..=PERFORMANCE_DRIFT);
    ctx.state.career.adjust_performance(drift);

    if def.is_wrestling() {
        wrestling::process_wrestling_year(ctx, def);
        if ctx.state.career.id.as_deref() != Some(career_id.as_str()) {
            return;
        }
    }

    if ctx.state.career.performance >= RAISE_THRESHOLD {
        let salary = &mut ctx.state.finances.salary;
        *salary += (*salary as f64 * def.annual_raise).round() as i64;
        if let Some(contract) = ctx.state.wrestling_contract.as_mut() {
            contract.salary = ctx.state.finances.salary;
        }
    }

    if let Some(chance) = promotion_chance(ctx.state, def)
        && ctx.roll() < chance
    {
        promote(ctx, def);
    }

    if ctx.state.career.performance <= FIRING_THRESHOLD && ctx.roll() < FIRING_CHANCE {
        fire(ctx, "poor performance");
    }
}

pub struct CareerStage;

impl LifeStage for CareerStage {
    fn name(&self) -> &str {
        "career"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        if !ctx.state.is_alive {
            return;
        }
        process_career_year(ctx);
        shadow::process_shadow_year(ctx);
    }
}

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "work_hard",
            label: "Work hard",
            domain: ActionDomain::Career,
            min_age: 14,
            time_cost: 2,
            cost: 0,
            location: None,
            check: needs_job,
            perform: work_hard,
        },
        ActionDef {
            id: "slack_off",
            label: "Slack off",
            domain: ActionDomain::Career,
            min_age: 14,
            time_cost: 1,
            cost: 0,
            location: None,
            check: needs_job,
            perform: slack_off,
        },
        ActionDef {
            id: "ask_for_raise",
            label: "Ask for a raise",
            domain: ActionDomain::Career,
            min_age: 14,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_ask_for_raise,
            perform: ask_for_raise,
        },
        ActionDef {
            id: "quit_job",
            label: "Quit your job",
            domain: ActionDomain::Career,
            min_age: 14,
            time_cost: 1,
            cost: 0,
            location: None,
            check: needs_job,
            perform: quit_job,
        },
        ActionDef {
            id: "network",
            label: "Network",
            domain: ActionDomain::Career,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: super::actions::always,
            perform: network,
        },
        ActionDef {
            id: "found_startup",
            label: "Found a startup",
            domain: ActionDomain::Career,
            min_age: FOUNDER_MIN_AGE,
            time_cost: 3,
            cost: FOUNDER_SEED_MONEY,
            location: None,
            check: can_found_startup,
            perform: found_startup,
        },
        ActionDef {
            id: "retire",
            label: "Retire",
            domain: ActionDomain::Career,
            min_age: RETIREMENT_AGE,
            time_cost: 1,
            cost: 0,
            location: None,
            check: needs_job,
            perform: retire,
        },
    ]
}

fn needs_job(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if !has_regular_job(state) {
        return Err(ineligible("you don't have a job"));
    }
    Ok(())
}

fn work_hard(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(4..=10);
    ctx.state.career.adjust_performance(gain);
    ctx.adjust_stat(StatKind::Happiness, -2);
    ctx.adjust_stat(StatKind::Health, -1);
    Ok("You put in long hours at work.".to_string())
}

fn slack_off(ctx: &mut TickContext) -> ActionResult {
    let loss = ctx.rng.random_range(5..=10);
    ctx.state.career.adjust_performance(-loss);
    ctx.adjust_stat(StatKind::Happiness, 3);
    Ok("You coasted. It felt great.".to_string())
}

fn raise_asked_this_year(state: &WorldState) -> bool {
    state
        .flags
        .get(RAISE_ASK_FLAG)
        .and_then(|v| v.as_number())
        .is_some_and(|y| y as i32 == state.year)
}

fn can_ask_for_raise(state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
    needs_job(state, registries)?;
    if state.career.id.as_deref() == Some(ENGINEERING_FOUNDER_ID) {
        return Err(ineligible("you are your own boss"));
    }
    if raise_asked_this_year(state) {
        return Err(ineligible("you already asked this year"));
    }
    Ok(())
}

fn ask_for_raise(ctx: &mut TickContext) -> ActionResult {
    let year = ctx.state.year;
    ctx.state.flags.set(RAISE_ASK_FLAG, (year as f64).into());
    if ctx.state.career.performance >= RAISE_ASK_MIN_PERFORMANCE && ctx.roll() < RAISE_ASK_CHANCE {
        let pct = ctx.rng.random_range(0.05..=0.10);
        let salary = &mut ctx.state.finances.salary;
        let bump = (*salary as f64 * pct).round() as i64;
        *salary += bump;
        ctx.adjust_stat(StatKind::Happiness, 4);
        ctx.log(
            HistoryCategory::Career,
            format!("Your boss gave you a ${bump} raise."),
        );
        return Ok(format!("You got a ${bump} raise!"));
    }
    ctx.state.career.adjust_performance(-3);
    ctx.adjust_stat(StatKind::Happiness, -2);
    Ok("Your boss turned you down.".to_string())
}

fn quit_job(ctx: &mut TickContext) -> ActionResult {
    let title = ctx.state.career.title.clone();
    leave_job(ctx.state);
    ctx.log(HistoryCategory::Career, format!("You quit your job as {title}."));
    Ok(format!("You quit your job as {title}."))
}

fn network(ctx: &mut TickContext) -> ActionResult {
    if has_regular_job(ctx.state) {
        ctx.state.career.adjust_performance(2);
    }
    let name = random_name(ctx.rng);
    let age = ctx.rng.random_range(22..=60);
    let mut npc = Npc::new(0, name.clone(), NpcKind::Acquaintance, age);
    npc.relationship = 30;
    npc.familiarity = 25;
    npc.location = ctx.state.current_location;
    if has_regular_job(ctx.state) {
        npc.affiliation = Some(Affiliation::Work);
    }
    ctx.state.add_npc(npc);
    Ok(format!("You swapped business cards with {name}."))
}

fn can_found_startup(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if state.career.is_employed() {
        return Err(ineligible("quit your current job first"));
    }
    if state.serial_killer.mode == ShadowMode::FullTime {
        return Err(ineligible("your nights are spoken for"));
    }
    if state.education.level < EducationLevel::Bachelor
        || !FOUNDER_MAJORS.iter().any(|m| state.education.has_major(m))
    {
        return Err(ineligible("requires an engineering or computer science degree"));
    }
    if state.stats.smarts < FOUNDER_MIN_SMARTS {
        return Err(ineligible(format!(
            "requires smarts of at least {FOUNDER_MIN_SMARTS}"
        )));
    }
    Ok(())
}

fn found_startup(ctx: &mut TickContext) -> ActionResult {
    let career = &mut ctx.state.career;
    career.id = Some(ENGINEERING_FOUNDER_ID.to_string());
    career.title = "Founder & CEO".to_string();
    career.field = "Engineering".to_string();
    career.specialization = "Startup".to_string();
    career.level = 1;
    career.performance = 60;
    career.retired = false;
    ctx.state.finances.salary = FOUNDER_START_SALARY;
    ctx.log(HistoryCategory::Career, "You founded a tech startup.");
    ctx.emit(SignalKind::CareerHired {
        career_id: ENGINEERING_FOUNDER_ID.to_string(),
    });
    Ok("You founded your own engineering company.".to_string())
}

fn retire(ctx: &mut TickContext) -> ActionResult {
    if let Some(profile) = ctx.state.flags.wrestling.as_mut()
        && ctx.state.career.is_wrestling()
    {
        profile.retired = true;
    }
    leave_job(ctx.state);
    ctx.state.career.retired = true;
    ctx.adjust_stat(StatKind::Happiness, 5);
    ctx.log(HistoryCategory::Career, "You retired.");
    Ok("You retired. Enjoy the quiet.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::career::Experience;
    use crate::rng::FixedRng;
    use crate::sim::actions::perform_action;

    fn clerk() -> CareerDefinition {
        serde_json::from_value(serde_json::json!({
            "id": "clerk",
            "title": "Clerk",
            "field": "Retail",
            "start_salary": 30000,
            "min_smarts": 30,
            "min_willpower": 30,
            "difficulty": 0.1,
            "promotion_titles": ["Senior Clerk"]
        }))
        .unwrap()
    }

    fn paralegal() -> CareerDefinition {
        serde_json::from_value(serde_json::json!({
            "id": "partner",
            "title": "Partner",
            "field": "Law",
            "start_salary": 200000,
            "required_flags": ["license_bar"],
            "min_licensed_law_years": 3
        }))
        .unwrap()
    }

    fn registries() -> Registries {
        let mut r = Registries::new();
        r.register_careers(vec![clerk(), paralegal()]);
        r
    }

    fn adult() -> WorldState {
        let mut s = WorldState::new("Test", 2020);
        s.age = 25;
        s.education.level = EducationLevel::HighSchool;
        s.stats.smarts = 85;
        s.stats.willpower = 80;
        s
    }

    fn run<R>(
        state: &mut WorldState,
        registries: &Registries,
        rng: &mut dyn rand::RngCore,
        f: impl FnOnce(&mut TickContext) -> R,
    ) -> R {
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries,
            rng,
            signals: &mut signals,
        };
        f(&mut ctx)
    }

    #[test]
    fn hire_chance_is_clamped() {
        let def = clerk();
        let mut state = adult();
        assert_eq!(hire_chance(&state, &def), HIRE_MAX);
        state.stats.smarts = 0;
        state.stats.willpower = 0;
        state.education.gpa = 0.0;
        assert_eq!(hire_chance(&state, &def), HIRE_MIN);
    }

    #[test]
    fn gated_experience_needs_licence_years() {
        let mut state = adult();
        let def = paralegal();
        assert!(!can_apply(&state, &def));
        state.flags.law.license_bar = true;
        state.career.experience = Experience {
            total_years: 5,
            law_years: 5,
            licensed_law_years: 2,
        };
        assert!(!can_apply(&state, &def));
        state.career.experience.licensed_law_years = 3;
        assert!(can_apply(&state, &def));
    }

    #[test]
    fn successful_application_sets_up_the_job() {
        let registries = registries();
        let mut state = adult();
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "clerk")
        })
        .unwrap();
        assert_eq!(state.career.id.as_deref(), Some("clerk"));
        assert_eq!(state.career.level, 1);
        assert_eq!(state.career.performance, STARTING_PERFORMANCE);
        assert_eq!(state.finances.salary, 30_000);
    }

    #[test]
    fn levelless_job_is_never_promoted() {
        let registries = registries();
        let mut state = adult();
        state.career.id = Some("clerk".to_string());
        state.career.title = "Clerk".to_string();
        state.career.performance = 95;
        state.career.years_in_role = 6;
        assert_eq!(state.career.level, 0);
        run(&mut state, &registries, &mut FixedRng::low(), process_career_year);
        assert_eq!(state.career.level, 0);
        assert_eq!(state.career.title, "Clerk");
    }

    #[test]
    fn rejection_counts_and_charges_time() {
        let registries = registries();
        let mut state = adult();
        run(&mut state, &registries, &mut FixedRng::high(), |ctx| {
            apply_for_career(ctx, "clerk")
        })
        .unwrap();
        assert!(!state.career.is_employed());
        assert_eq!(state.career.rejections, 1);
        assert_eq!(state.time_budget, 11);
    }

    #[test]
    fn full_time_shadow_blocks_hiring() {
        let registries = registries();
        let mut state = adult();
        state.serial_killer.unlocked = true;
        state.serial_killer.mode = ShadowMode::FullTime;
        let before = state.clone();
        let res = run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "clerk")
        });
        assert!(matches!(res, Err(ActionError::Ineligible(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn unknown_career_is_named() {
        let registries = registries();
        let mut state = adult();
        let res = run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "astronaut")
        });
        assert_eq!(res, Err(ActionError::UnknownCareer("astronaut".to_string())));
    }

    #[test]
    fn strong_year_brings_raise_and_promotion() {
        let registries = registries();
        let mut state = adult();
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "clerk")
        })
        .unwrap();
        state.career.performance = 90;
        state.career.years_in_role = 1;
        run(&mut state, &registries, &mut FixedRng::low(), process_career_year);
        assert_eq!(state.career.level, 2);
        assert_eq!(state.career.title, "Senior Clerk");
        assert_eq!(state.career.years_in_role, 0);
        assert!(state.finances.salary > 30_000);
        assert_eq!(state.career.experience.total_years, 1);
    }

    #[test]
    fn poor_performer_gets_fired_but_keeps_experience() {
        let registries = registries();
        let mut state = adult();
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "clerk")
        })
        .unwrap();
        state.career.performance = 10;
        run(&mut state, &registries, &mut FixedRng::low(), process_career_year);
        assert!(!state.career.is_employed());
        assert_eq!(state.finances.salary, 0);
        assert_eq!(state.career.experience.total_years, 1);
    }

    #[test]
    fn political_office_is_not_reviewed() {
        let registries = registries();
        let mut state = adult();
        state.career.id = Some(format!("{POLITICS_CAREER_PREFIX}mayor"));
        state.career.performance = 0;
        run(&mut state, &registries, &mut FixedRng::low(), process_career_year);
        assert!(state.career.is_employed());
        assert_eq!(state.career.experience.total_years, 0);
    }

    #[test]
    fn raise_can_be_asked_once_a_year() {
        let registries = registries();
        let mut state = adult();
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            apply_for_career(ctx, "clerk")
        })
        .unwrap();
        state.career.performance = 80;
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            perform_action(ctx, "ask_for_raise")
        })
        .unwrap();
        assert_eq!(state.finances.salary, 31_500);
        let again = run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            perform_action(ctx, "ask_for_raise")
        });
        assert!(again.is_err());
    }

    #[test]
    fn founder_needs_the_right_degree() {
        let registries = registries();
        let mut state = adult();
        state.finances.cash = 20_000;
        state.education.level = EducationLevel::Bachelor;
        state.education.majors = vec!["History".to_string()];
        assert!(
            run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
                perform_action(ctx, "found_startup")
            })
            .is_err()
        );
        state.education.majors.push("Computer Science".to_string());
        run(&mut state, &registries, &mut FixedRng::low(), |ctx| {
            perform_action(ctx, "found_startup")
        })
        .unwrap();
        assert_eq!(state.career.id.as_deref(), Some(ENGINEERING_FOUNDER_ID));
        assert_eq!(state.finances.cash, 10_000);
    }
}
