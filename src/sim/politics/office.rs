//! Holding office: taking and leaving a seat, policies, and the yearly
//! reckoning of approval, scandals, impeachment and unrest.

use rand::Rng;

use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::career::POLITICS_FIELD;
use crate::model::{GovernmentType, HistoryCategory, PoliticalPosition, PoliticsState, StatKind};
use crate::sim::actions::{charge, check_basics};
use crate::sim::career::{POLITICS_CAREER_PREFIX, leave_job};
use crate::sim::context::TickContext;
use crate::sim::signal::SignalKind;

// --- Approval ---
const APPROVAL_DECAY: f64 = 2.0;
const CHARISMA_HIGH: i32 = 70;
const CHARISMA_LOW: i32 = 30;
const CHARISMA_SWING: f64 = 2.0;
const STRONG_ECONOMY_CHANCE: f64 = 0.25;
const WEAK_ECONOMY_CHANCE: f64 = 0.20;
const POLICY_BONUS_EACH: f64 = 2.0;
const POLICY_BONUS_CAP: f64 = 10.0;

// --- Scandals ---
const SCANDAL_CORRUPTION_WEIGHT: f64 = 0.5;
const SCANDAL_MEDIA_WEIGHT: f64 = 0.2;
const SCANDAL_OPPOSITION_WEIGHT: f64 = 0.3;
const SCANDAL_SCALE: f64 = 0.4;

// --- Impeachment ---
const IMPEACH_SCANDAL_COUNT: usize = 3;
const IMPEACH_CORRUPTION: f64 = 60.0;
const IMPEACH_RISK_STEP: f64 = 20.0;
const IMPEACH_RISK_COOLING: f64 = 5.0;
const IMPEACH_RISK_THRESHOLD: f64 = 70.0;
const IMPEACH_CHANCE: f64 = 0.3;

// --- Revolution ---
const REVOLUTION_LEVEL: u32 = 5;
const REVOLUTION_THREAT: f64 = 60.0;

const POLICY_TIME_COST: u32 = 2;

pub fn office_career_id(position_id: &str) -> String {
    format!("{POLITICS_CAREER_PREFIX}{position_id}")
}

/// Install the player in `position`. Any previous job or seat is given up.
pub(crate) fn take_office(ctx: &mut TickContext, position: &PoliticalPosition) {
    leave_job(ctx.state);
    let politics = &mut ctx.state.politics;
    politics.vacate_office();
    politics.current_position = Some(position.id.clone());
    politics.position_level = position.level;
    politics.title = Some(position.title.clone());
    politics.years_in_term = 0;
    *politics.terms_served.entry(position.id.clone()).or_insert(0) += 1;

    let career = &mut ctx.state.career;
    career.id = Some(office_career_id(&position.id));
    career.title = position.title.clone();
    career.field = POLITICS_FIELD.to_string();
    career.level = position.level;
    ctx.state.finances.salary = position.salary;
}

/// Step down from office. The record (scandals, corruption, ...) stays.
pub(crate) fn leave_office(ctx: &mut TickContext) {
    ctx.state.politics.vacate_office();
    let holds_seat = ctx
        .state
        .career
        .id
        .as_deref()
        .is_some_and(|id| id.starts_with(POLITICS_CAREER_PREFIX));
    if holds_seat {
        leave_job(ctx.state);
    }
}

pub fn enact_policy(ctx: &mut TickContext, policy_id: &str) -> ActionResult {
    let registries = ctx.registries;
    let Some(policy) = registries.policy(policy_id) else {
        return Err(ActionError::UnknownPolicy(policy_id.to_string()));
    };
    check_basics(ctx.state, 18, POLICY_TIME_COST, policy.cost)?;
    let politics = &ctx.state.politics;
    if !politics.in_office() {
        return Err(ineligible("you are not in office"));
    }
    if politics.position_level < policy.min_level {
        return Err(ineligible("your office is too junior for that"));
    }
    if politics.enacted_policies.contains(&policy.id) {
        return Err(ineligible("already enacted"));
    }
    if let Some(required) = policy.requires_government
        && required != politics.government_type
    {
        return Err(ineligible(format!("only possible under a {required}")));
    }
    charge(ctx.state, POLICY_TIME_COST, policy.cost)?;

    let politics = &mut ctx.state.politics;
    politics.approval += policy.approval;
    politics.corruption += policy.corruption;
    politics.opposition_strength += policy.opposition;
    politics.media_control += policy.media_control;
    politics.military_control += policy.military_control;
    politics.authoritarian_score += policy.authoritarian;
    politics.enacted_policies.push(policy.id.clone());
    politics.clamp();
    ctx.log(
        HistoryCategory::Politics,
        format!("You enacted {}.", policy.name),
    );
    Ok(format!("{} is now law.", policy.name))
}

fn drift_approval(ctx: &mut TickContext) {
    let looks = ctx.state.stats.looks;
    let economy_roll = ctx.roll();
    let strong = ctx.rng.random_range(3.0..=8.0);
    let weak = ctx.rng.random_range(5.0..=15.0);
    let politics = &mut ctx.state.politics;

    let mut delta = -APPROVAL_DECAY;
    if looks >= CHARISMA_HIGH {
        delta += CHARISMA_SWING;
    } else if looks <= CHARISMA_LOW {
        delta -= CHARISMA_SWING;
    }
    if economy_roll < STRONG_ECONOMY_CHANCE {
        delta += strong;
    } else if economy_roll < STRONG_ECONOMY_CHANCE + WEAK_ECONOMY_CHANCE {
        delta -= weak;
    }
    delta += (politics.enacted_policies.len() as f64 * POLICY_BONUS_EACH).min(POLICY_BONUS_CAP);
    politics.approval += delta;
    politics.clamp();
}

/// Yearly chance that something comes out.
pub fn scandal_chance(p: &PoliticsState) -> f64 {
    let blend = p.corruption * SCANDAL_CORRUPTION_WEIGHT
        + (100.0 - p.media_control) * SCANDAL_MEDIA_WEIGHT
        + p.opposition_strength * SCANDAL_OPPOSITION_WEIGHT;
    (blend / 100.0 * SCANDAL_SCALE).clamp(0.0, 1.0)
}

fn maybe_scandal(ctx: &mut TickContext) {
    let chance = scandal_chance(&ctx.state.politics);
    if ctx.roll() >= chance {
        return;
    }
    let registries = ctx.registries;
    let politics = &ctx.state.politics;
    let open: Vec<_> = registries
        .scandals
        .iter()
        .filter(|s| s.min_corruption <= politics.corruption && !politics.scandals.contains(&s.id))
        .collect();
    if open.is_empty() {
        return;
    }
    let scandal = open[ctx.rng.random_range(0..open.len())];
    let politics = &mut ctx.state.politics;
    politics.approval -= scandal.approval_hit;
    politics.opposition_strength += scandal.opposition_gain;
    politics.scandals.push(scandal.id.clone());
    politics.clamp();
    ctx.log(
        HistoryCategory::Politics,
        format!("Scandal! {}", scandal.title),
    );
    ctx.emit(SignalKind::PoliticalScandal {
        scandal_id: scandal.id.clone(),
    });
}

/// Returns true if the player was removed from office.
fn check_impeachment(ctx: &mut TickContext) -> bool {
    let politics = &mut ctx.state.politics;
    if politics.scandals.len() >= IMPEACH_SCANDAL_COUNT || politics.corruption > IMPEACH_CORRUPTION {
        politics.impeachment_risk += IMPEACH_RISK_STEP;
    } else {
        politics.impeachment_risk -= IMPEACH_RISK_COOLING;
    }
    politics.clamp();
    if politics.impeachment_risk <= IMPEACH_RISK_THRESHOLD
        || politics.government_type != GovernmentType::Democracy
    {
        return false;
    }
    if ctx.roll() >= IMPEACH_CHANCE {
        return false;
    }
    let position_id = ctx.state.politics.current_position.clone().unwrap_or_default();
    leave_office(ctx);
    ctx.adjust_stat(StatKind::Happiness, -15);
    ctx.log(HistoryCategory::Politics, "You were impeached and removed from office.");
    ctx.emit(SignalKind::PoliticalImpeached { position_id });
    true
}

/// Unrest only threatens the top seat, and only ever as a warning.
fn check_revolution(ctx: &mut TickContext) {
    let politics = &mut ctx.state.politics;
    if politics.position_level < REVOLUTION_LEVEL {
        politics.revolution_risk = 0.0;
        return;
    }
    let risk = (politics.authoritarian_score * 0.4
        + (100.0 - politics.approval) * 0.4
        + politics.opposition_strength * 0.2)
        .clamp(0.0, 100.0);
    politics.revolution_risk = risk;
    if risk > REVOLUTION_THREAT {
        ctx.log(
            HistoryCategory::Politics,
            "Crowds are gathering in the capital. Revolution is in the air.",
        );
        ctx.emit(SignalKind::PoliticalRevolutionThreat { risk });
    }
}

fn check_term_end(ctx: &mut TickContext) {
    let Some(position_id) = ctx.state.politics.current_position.clone() else {
        return;
    };
    let registries = ctx.registries;
    let term_length = registries
        .position(&position_id)
        .map(|p| p.term_length)
        .unwrap_or(0);
    if term_length == 0 || ctx.state.politics.years_in_term < term_length {
        return;
    }
    let title = ctx.state.politics.title.clone().unwrap_or_default();
    leave_office(ctx);
    ctx.log(
        HistoryCategory::Politics,
        format!("Your term as {title} came to an end."),
    );
    ctx.emit(SignalKind::PoliticalTermEnded { position_id });
}

/// One year in office.
pub fn process_office_year(ctx: &mut TickContext) {
    let politics = &mut ctx.state.politics;
    politics.years_in_term += 1;
    politics.total_political_years += 1;

    drift_approval(ctx);
    maybe_scandal(ctx);
    if check_impeachment(ctx) {
        return;
    }
    check_revolution(ctx);
    check_term_end(ctx);
}
