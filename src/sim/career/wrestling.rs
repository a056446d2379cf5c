use rand::Rng;

use super::{has_regular_job, leave_job};
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::flags::{Alignment, RivalOffer};
use crate::model::{CareerDefinition, HistoryCategory, StatKind, WorldState, WrestlingProfile};
use crate::sim::actions::{ActionDef, ActionDomain};
use crate::sim::context::TickContext;
use crate::sim::registry::Registries;
use crate::sim::signal::SignalKind;

pub const INDIE_PROMOTION: &str = "indie";
pub const CONTRACT_YEARS: u32 = 5;

/// Known promotions: id, display name.
const PROMOTIONS: &[(&str, &str)] = &[
    ("indie", "Independent Circuit"),
    ("gwf", "Global Wrestling Federation"),
    ("apex", "Apex Pro Wrestling"),
    ("lucha_nacional", "Lucha Nacional"),
];

// --- Push & promotion ---
const PUSH_PROMOTION_GATE: i32 = 60;
const PUSH_PROMOTION_SCALE: f64 = 0.8;

// --- Injuries ---
const INJURY_BASE_CHANCE: f64 = 0.08;
const HARDCORE_INJURY_MULTIPLIER: f64 = 1.8;
const LUCHA_INJURY_MULTIPLIER: f64 = 1.35;
const TAG_INJURY_MULTIPLIER: f64 = 0.92;

// --- Income ---
const MERCH_PER_FAN_POINT: i64 = 150;
const APPEARANCE_FEE: i64 = 250;

// --- Rival offers ---
const RIVAL_OFFER_MIN_FANS: i32 = 30;
const RIVAL_OFFER_BASE_CHANCE: f64 = 0.15;
const RIVAL_OFFER_YEARS: u32 = 3;

// --- Release ---
const COLD_STREAK_MOMENTUM: i32 = 15;
const COLD_STREAK_PERFORMANCE: i32 = 35;
const COLD_STREAK_RELEASE_CHANCE: f64 = 0.3;

const BACKSTAGE_ROLES: &[&str] = &["booker", "writer", "producer"];

pub fn promotion_name(promotion_id: &str) -> String {
    PROMOTIONS
        .iter()
        .find(|(id, _)| *id == promotion_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| promotion_id.to_string())
}

/// The wrestling profile, created on first need.
pub fn ensure_wrestling_profile(state: &mut WorldState) -> &mut WrestlingProfile {
    let surname = state.name.rsplit(' ').next().unwrap_or("Doe");
    let ring_name = format!("\"The Iron\" {surname}");
    state.flags.wrestling.get_or_insert_with(|| WrestlingProfile {
        ring_name,
        ..WrestlingProfile::default()
    })
}

/// Bookers, writers and producers never step into the ring.
pub fn is_backstage(def: &CareerDefinition) -> bool {
    let specialization = def.specialization.to_lowercase();
    let title = def.title.to_lowercase();
    BACKSTAGE_ROLES
        .iter()
        .any(|role| specialization.contains(role) || title.contains(role))
}

pub fn injury_multiplier(def: &CareerDefinition) -> f64 {
    let specialization = def.specialization.to_lowercase();
    if specialization.contains("deathmatch") || specialization.contains("hardcore") {
        HARDCORE_INJURY_MULTIPLIER
    } else if specialization.contains("lucha") {
        LUCHA_INJURY_MULTIPLIER
    } else if specialization.contains("tag") {
        TAG_INJURY_MULTIPLIER
    } else {
        1.0
    }
}

/// `None` below the push gate; above it the chance scales with push.
pub fn push_promotion_chance(state: &WorldState) -> Option<f64> {
    let push = state.flags.wrestling.as_ref()?.push;
    if push < PUSH_PROMOTION_GATE {
        return None;
    }
    Some(push as f64 / 100.0 * PUSH_PROMOTION_SCALE)
}

fn release(ctx: &mut TickContext, reason: &str) {
    let career_id = ctx.state.career.id.clone().unwrap_or_default();
    let promotion = ctx
        .state
        .wrestling_contract
        .as_ref()
        .map(|c| c.promotion_name.clone())
        .unwrap_or_default();
    leave_job(ctx.state);
    if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
        profile.free_agent = true;
        profile.push = profile.push.min(20);
    }
    ctx.log(
        HistoryCategory::Wrestling,
        format!("You left {promotion}: {reason}. You are now a free agent."),
    );
    ctx.emit(SignalKind::CareerFired { career_id });
}

fn maybe_rival_offer(ctx: &mut TickContext) {
    let Some(fan_base) = ctx.state.flags.wrestling.as_ref().map(|p| p.fan_base) else {
        return;
    };
    let has_offer = ctx
        .state
        .flags
        .wrestling
        .as_ref()
        .is_some_and(|p| p.pending_offer.is_some());
    if has_offer || fan_base < RIVAL_OFFER_MIN_FANS {
        return;
    }
    let chance = RIVAL_OFFER_BASE_CHANCE + fan_base as f64 / 400.0;
    if ctx.roll() >= chance {
        return;
    }
    let current = ctx
        .state
        .wrestling_contract
        .as_ref()
        .map(|c| c.promotion_id.clone())
        .unwrap_or_default();
    let rivals: Vec<&(&str, &str)> = PROMOTIONS
        .iter()
        .filter(|(id, _)| *id != current && *id != INDIE_PROMOTION)
        .collect();
    if rivals.is_empty() {
        return;
    }
    let idx = ctx.rng.random_range(0..rivals.len());
    let (promotion_id, promotion_name) = *rivals[idx];
    let salary = (ctx.state.finances.salary as f64 * (1.1 + fan_base as f64 / 200.0)).round() as i64;
    let year = ctx.state.year;
    if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
        profile.pending_offer = Some(RivalOffer {
            promotion_id: promotion_id.to_string(),
            promotion_name: promotion_name.to_string(),
            salary,
            years: RIVAL_OFFER_YEARS,
            year_offered: year,
        });
    }
    ctx.log(
        HistoryCategory::Wrestling,
        format!("{promotion_name} offered you ${salary} a year to jump ship."),
    );
}

fn process_backstage_year(ctx: &mut TickContext) {
    let creative = ctx.rng.random_range(1..=3);
    let bonus = ctx.rng.random_range(0..=3);
    if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
        profile.promo_skill += creative;
        profile.clamp();
    }
    ctx.state.career.adjust_performance(bonus);
}

fn process_ring_year(ctx: &mut TickContext, def: &CareerDefinition) {
    let injured = ctx
        .state
        .flags
        .wrestling
        .as_ref()
        .is_some_and(|p| p.injury_years > 0);
    if injured {
        let mut recovered = false;
        if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
            profile.injury_years -= 1;
            profile.momentum -= 5;
            profile.matches_this_year = 0;
            profile.clamp();
            recovered = profile.injury_years == 0;
        }
        if recovered {
            ctx.log(HistoryCategory::Wrestling, "You were cleared to wrestle again.");
        }
        return;
    }

    let chance = INJURY_BASE_CHANCE * injury_multiplier(def);
    if ctx.roll() < chance {
        let years = ctx.rng.random_range(1..=2);
        let damage = ctx.rng.random_range(5..=15);
        if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
            profile.injury_years = years;
            profile.momentum -= 10;
            profile.matches_this_year = 0;
            profile.clamp();
        }
        ctx.adjust_stat(StatKind::Health, -damage);
        ctx.log(
            HistoryCategory::Wrestling,
            format!("You were injured in the ring and will be out for {years} year(s)."),
        );
        return;
    }

    let matches = ctx.rng.random_range(8..=20);
    let swing = ctx.rng.random_range(-5..=5);
    let fan_base = match ctx.state.flags.wrestling.as_mut() {
        Some(profile) => {
            profile.matches_this_year = matches;
            profile.momentum += swing;
            if profile.momentum >= 60 {
                profile.fan_base += 2;
            } else if profile.momentum < 30 {
                profile.fan_base -= 1;
            }
            profile.clamp();
            profile.fan_base
        }
        None => 0,
    };
    let income = fan_base as i64 * MERCH_PER_FAN_POINT + matches as i64 * APPEARANCE_FEE;
    ctx.state.finances.cash += income;
}

/// Contract clock, offers, injuries, income and the cold-streak release.
pub fn process_wrestling_year(ctx: &mut TickContext, def: &CareerDefinition) {
    ensure_wrestling_profile(ctx.state);
    let year = ctx.state.year;
    if let Some(profile) = ctx.state.flags.wrestling.as_mut()
        && profile
            .pending_offer
            .as_ref()
            .is_some_and(|o| o.year_offered < year)
    {
        profile.pending_offer = None;
    }

    let expired = match ctx.state.wrestling_contract.as_mut() {
        Some(contract) => {
            contract.years_remaining = contract.years_remaining.saturating_sub(1);
            contract.years_remaining == 0
        }
        None => false,
    };
    if expired {
        release(ctx, "your contract expired");
        return;
    }

    if is_backstage(def) {
        process_backstage_year(ctx);
        return;
    }
    process_ring_year(ctx, def);
    maybe_rival_offer(ctx);

    let cold = ctx
        .state
        .flags
        .wrestling
        .as_ref()
        .is_some_and(|p| p.momentum <= COLD_STREAK_MOMENTUM);
    if cold
        && ctx.state.career.performance <= COLD_STREAK_PERFORMANCE
        && ctx.roll() < COLD_STREAK_RELEASE_CHANCE
    {
        release(ctx, "management lost faith in you");
    }
}

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "cut_promo",
            label: "Cut a promo",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: needs_wrestler,
            perform: cut_promo,
        },
        ActionDef {
            id: "train_in_ring",
            label: "Train in the ring",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 2,
            cost: 0,
            location: None,
            check: needs_healthy_wrestler,
            perform: train_in_ring,
        },
        ActionDef {
            id: "turn_heel",
            label: "Turn heel",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_turn_heel,
            perform: turn_heel,
        },
        ActionDef {
            id: "turn_face",
            label: "Turn face",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_turn_face,
            perform: turn_face,
        },
        ActionDef {
            id: "request_push",
            label: "Ask management for a push",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: needs_wrestler,
            perform: request_push,
        },
        ActionDef {
            id: "accept_rival_offer",
            label: "Accept the rival offer",
            domain: ActionDomain::Wrestling,
            min_age: 16,
            time_cost: 1,
            cost: 0,
            location: None,
            check: has_rival_offer,
            perform: accept_rival_offer,
        },
    ]
}

fn profile(state: &WorldState) -> Result<&WrestlingProfile, ActionError> {
    if !(has_regular_job(state) && state.career.is_wrestling()) {
        return Err(ineligible("you are not a wrestler"));
    }
    state
        .flags
        .wrestling
        .as_ref()
        .ok_or_else(|| ineligible("you are not a wrestler"))
}

fn needs_wrestler(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    profile(state).map(|_| ())
}

fn needs_healthy_wrestler(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if profile(state)?.injury_years > 0 {
        return Err(ineligible("you are injured"));
    }
    Ok(())
}

fn can_turn_heel(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if profile(state)?.alignment == Alignment::Heel {
        return Err(ineligible("you are already a heel"));
    }
    Ok(())
}

fn can_turn_face(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if profile(state)?.alignment == Alignment::Face {
        return Err(ineligible("you are already a face"));
    }
    Ok(())
}

fn has_rival_offer(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if profile(state)?.pending_offer.is_none() {
        return Err(ineligible("nobody has made you an offer"));
    }
    Ok(())
}

fn cut_promo(ctx: &mut TickContext) -> ActionResult {
    let practice = ctx.rng.random_range(2..=5);
    let roll = ctx.roll();
    let up = ctx.rng.random_range(3..=8);
    let down = ctx.rng.random_range(2..=5);
    let Some(profile) = ctx.state.flags.wrestling.as_mut() else {
        return Err(ineligible("you are not a wrestler"));
    };
    let landed = roll < profile.promo_skill as f64 / 100.0 + 0.2;
    profile.promo_skill += practice;
    profile.momentum += if landed { up } else { -down };
    profile.clamp();
    if landed {
        Ok("The crowd hung on every word.".to_string())
    } else {
        Ok("Your promo fell flat.".to_string())
    }
}

fn train_in_ring(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(1..=3);
    ctx.adjust_stat(StatKind::Athleticism, gain);
    ctx.state.career.adjust_performance(2);
    Ok("You drilled your moves until they were second nature.".to_string())
}

fn turn(ctx: &mut TickContext, alignment: Alignment) -> ActionResult {
    let Some(profile) = ctx.state.flags.wrestling.as_mut() else {
        return Err(ineligible("you are not a wrestler"));
    };
    profile.alignment = alignment;
    profile.momentum += 10;
    profile.fan_base -= 3;
    profile.clamp();
    let line = match alignment {
        Alignment::Heel => "You turned heel. The boos were deafening.",
        Alignment::Face => "You turned face. The crowd welcomed you back.",
    };
    ctx.log(HistoryCategory::Wrestling, line);
    Ok(line.to_string())
}

fn turn_heel(ctx: &mut TickContext) -> ActionResult {
    ctx.adjust_stat(StatKind::Karma, -2);
    turn(ctx, Alignment::Heel)
}

fn turn_face(ctx: &mut TickContext) -> ActionResult {
    turn(ctx, Alignment::Face)
}

fn request_push(ctx: &mut TickContext) -> ActionResult {
    let roll = ctx.roll();
    let gain = ctx.rng.random_range(10..=20);
    let performance = ctx.state.career.performance;
    let Some(profile) = ctx.state.flags.wrestling.as_mut() else {
        return Err(ineligible("you are not a wrestler"));
    };
    let granted = performance >= 60 && profile.momentum >= 50 && roll < 0.5;
    if granted {
        profile.push += gain;
    } else {
        profile.push -= 5;
    }
    profile.clamp();
    if granted {
        Ok("Management agreed to push you.".to_string())
    } else {
        ctx.state.career.adjust_performance(-3);
        Ok("Management did not appreciate the request.".to_string())
    }
}

fn accept_rival_offer(ctx: &mut TickContext) -> ActionResult {
    let Some(offer) = ctx
        .state
        .flags
        .wrestling
        .as_mut()
        .and_then(|p| p.pending_offer.take())
    else {
        return Err(ineligible("nobody has made you an offer"));
    };
    let registries = ctx.registries;
    let current_spec = ctx.state.career.specialization.clone();
    let target = registries
        .careers
        .iter()
        .filter(|c| c.is_wrestling() && c.promotion_id.as_deref() == Some(offer.promotion_id.as_str()))
        .max_by_key(|c| c.specialization == current_spec);
    if let Some(def) = target {
        let career = &mut ctx.state.career;
        career.id = Some(def.id.clone());
        career.title = def.title.clone();
        career.specialization = def.specialization.clone();
        career.level = 1;
        career.years_in_role = 0;
    }
    ctx.state.wrestling_contract = Some(crate::model::WrestlingContract {
        promotion_id: offer.promotion_id.clone(),
        promotion_name: offer.promotion_name.clone(),
        years_remaining: offer.years,
        salary: offer.salary,
    });
    ctx.state.finances.salary = offer.salary;
    if let Some(profile) = ctx.state.flags.wrestling.as_mut() {
        profile.free_agent = false;
        profile.momentum += 5;
        profile.clamp();
    }
    ctx.log(
        HistoryCategory::Wrestling,
        format!("You signed with {}.", offer.promotion_name),
    );
    Ok(format!(
        "You jumped to {} for ${} a year.",
        offer.promotion_name, offer.salary
    ))
}
