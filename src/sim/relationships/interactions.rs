use rand::Rng;

use super::visible_relationships;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{HistoryCategory, Location, Npc, NpcKind, StatKind, WorldState};
use crate::sim::context::TickContext;
use crate::sim::signal::SignalKind;

// ---------------------------------------------------------------------------
// Romance
// ---------------------------------------------------------------------------
const ROMANCE_MIN_AGE: u32 = 13;
const MARRIAGE_MIN_AGE: u32 = 18;

// ---------------------------------------------------------------------------
// Lethal
// ---------------------------------------------------------------------------
const PLOT_BONUS: f64 = 0.2;
const ATTEMPT_BASE_CHANCE: f64 = 0.25;
const ATTEMPT_MIN_CHANCE: f64 = 0.05;
const ATTEMPT_MAX_CHANCE: f64 = 0.9;
const HITMAN_FEE: i64 = 20_000;
const HITMAN_BASE_CHANCE: f64 = 0.6;
const KILL_KARMA_PENALTY: i32 = 20;
const KILL_HEAT: i32 = 15;
const KILL_NOTORIETY: i32 = 5;
const KILL_WITNESS_EXPOSURE: i32 = 20;
const FAILED_ATTEMPT_EXPOSURE: i32 = 10;
const FAILED_HIT_EXPOSURE: i32 = 15;

const GIFT_COST: i64 = 100;

/// A thing the player can do with one specific NPC.
pub struct Interaction {
    pub id: &'static str,
    pub label: &'static str,
    pub min_age: u32,
    pub cost: i64,
    pub time_cost: u32,
    pub min_relationship: i32,
    /// `None` means any kind of NPC.
    pub allowed_kinds: Option<&'static [NpcKind]>,
    /// Remote interactions (calls, texts, some romance) set this to false.
    pub requires_same_location: bool,
    pub is_available: fn(&WorldState, &Npc) -> bool,
    pub perform: fn(&mut TickContext, u64) -> ActionResult,
}

fn any(_state: &WorldState, _npc: &Npc) -> bool {
    true
}

const PARENTS: &[NpcKind] = &[NpcKind::Father, NpcKind::Mother];
const PETS: &[NpcKind] = &[NpcKind::Pet];
const PARTNERS: &[NpcKind] = &[NpcKind::Partner, NpcKind::Spouse];

pub static INTERACTIONS: &[Interaction] = &[
    Interaction {
        id: "spend_time",
        label: "Spend time together",
        min_age: 0,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: not_pet,
        perform: spend_time,
    },
    Interaction {
        id: "conversation",
        label: "Have a conversation",
        min_age: 3,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: not_pet,
        perform: conversation,
    },
    Interaction {
        id: "call_message",
        label: "Call or message",
        min_age: 8,
        cost: 0,
        time_cost: 1,
        min_relationship: 10,
        allowed_kinds: None,
        requires_same_location: false,
        is_available: not_pet,
        perform: call_message,
    },
    Interaction {
        id: "give_gift",
        label: "Give a gift",
        min_age: 6,
        cost: GIFT_COST,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: any,
        perform: give_gift,
    },
    Interaction {
        id: "compliment",
        label: "Compliment",
        min_age: 4,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: not_pet,
        perform: compliment,
    },
    Interaction {
        id: "insult",
        label: "Insult",
        min_age: 4,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: not_pet,
        perform: insult,
    },
    Interaction {
        id: "ask_for_money",
        label: "Ask for money",
        min_age: 12,
        cost: 0,
        time_cost: 1,
        min_relationship: 50,
        allowed_kinds: Some(PARENTS),
        requires_same_location: true,
        is_available: any,
        perform: ask_for_money,
    },
    Interaction {
        id: "play_with_pet",
        label: "Play with pet",
        min_age: 2,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: Some(PETS),
        requires_same_location: true,
        is_available: any,
        perform: play_with_pet,
    },
    Interaction {
        id: "ask_out",
        label: "Ask out",
        min_age: ROMANCE_MIN_AGE,
        cost: 0,
        time_cost: 1,
        min_relationship: 40,
        allowed_kinds: None,
        requires_same_location: false,
        is_available: can_ask_out,
        perform: ask_out,
    },
    Interaction {
        id: "propose",
        label: "Propose",
        min_age: MARRIAGE_MIN_AGE,
        cost: 0,
        time_cost: 1,
        min_relationship: 60,
        allowed_kinds: Some(&[NpcKind::Partner]),
        requires_same_location: false,
        is_available: can_propose,
        perform: propose,
    },
    Interaction {
        id: "break_up",
        label: "Break up",
        min_age: ROMANCE_MIN_AGE,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: Some(PARTNERS),
        requires_same_location: true,
        is_available: any,
        perform: break_up,
    },
    Interaction {
        id: "try_for_baby",
        label: "Try for a baby",
        min_age: MARRIAGE_MIN_AGE,
        cost: 0,
        time_cost: 1,
        min_relationship: 50,
        allowed_kinds: Some(PARTNERS),
        requires_same_location: true,
        is_available: any,
        perform: try_for_baby,
    },
    Interaction {
        id: "plot_to_kill",
        label: "Plot to kill",
        min_age: 16,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: false,
        is_available: not_plotted,
        perform: plot_to_kill,
    },
    Interaction {
        id: "attempt_kill",
        label: "Attempt to kill",
        min_age: 16,
        cost: 0,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: true,
        is_available: any,
        perform: attempt_kill,
    },
    Interaction {
        id: "hire_hitman",
        label: "Hire a hitman",
        min_age: 18,
        cost: HITMAN_FEE,
        time_cost: 1,
        min_relationship: 0,
        allowed_kinds: None,
        requires_same_location: false,
        is_available: any,
        perform: hire_hitman,
    },
];

pub fn interaction(id: &str) -> Option<&'static Interaction> {
    INTERACTIONS.iter().find(|i| i.id == id)
}

fn not_pet(_state: &WorldState, npc: &Npc) -> bool {
    npc.kind != NpcKind::Pet
}

fn not_plotted(state: &WorldState, npc: &Npc) -> bool {
    !state.flags.crime.has_plot(npc.id, state.year)
}

fn is_single(state: &WorldState) -> bool {
    let romance = &state.flags.romance;
    romance.partner_id.is_none() && romance.spouse_id.is_none() && !romance.married
}

fn can_ask_out(state: &WorldState, npc: &Npc) -> bool {
    npc.kind.is_romanceable()
        && !matches!(npc.kind, NpcKind::Partner | NpcKind::Spouse)
        && npc.age >= ROMANCE_MIN_AGE
        && is_single(state)
}

fn can_propose(state: &WorldState, npc: &Npc) -> bool {
    state.flags.romance.partner_id == Some(npc.id) && npc.age >= MARRIAGE_MIN_AGE
}

/// Every gate for `interaction` against `npc`. Never mutates.
pub fn validate_interaction(
    state: &WorldState,
    interaction: &Interaction,
    npc: &Npc,
) -> Result<(), ActionError> {
    if !state.is_alive {
        return Err(ActionError::NotAlive);
    }
    state.check_free()?;
    if state.age < interaction.min_age {
        return Err(ActionError::TooYoung {
            min_age: interaction.min_age,
        });
    }
    if !npc.is_alive {
        return Err(ineligible(format!("{} is no longer alive", npc.name)));
    }
    if npc.relationship < interaction.min_relationship {
        return Err(ineligible(format!("{} is not close enough to you", npc.name)));
    }
    if let Some(kinds) = interaction.allowed_kinds
        && !kinds.contains(&npc.kind)
    {
        return Err(ineligible(format!(
            "you can't do that with your {}",
            npc.kind.to_string().to_lowercase()
        )));
    }
    if interaction.requires_same_location
        && !visible_relationships(state).iter().any(|n| n.id == npc.id)
    {
        return Err(ineligible(format!("{} is not here", npc.name)));
    }
    if !(interaction.is_available)(state, npc) {
        return Err(ineligible(format!("{} isn't possible right now", interaction.label)));
    }
    state.check_time(interaction.time_cost)?;
    state.check_cash(interaction.cost)?;
    Ok(())
}

/// Interactions currently possible with `npc_id`.
pub fn available_interactions(state: &WorldState, npc_id: u64) -> Vec<&'static Interaction> {
    let Some(npc) = state.npc(npc_id) else {
        return Vec::new();
    };
    INTERACTIONS
        .iter()
        .filter(|i| validate_interaction(state, i, npc).is_ok())
        .collect()
}

pub fn perform_interaction(ctx: &mut TickContext, npc_id: u64, interaction_id: &str) -> ActionResult {
    let Some(def) = interaction(interaction_id) else {
        return Err(ActionError::UnknownInteraction(interaction_id.to_string()));
    };
    let Some(npc) = ctx.state.npc(npc_id) else {
        return Err(ActionError::UnknownNpc(npc_id));
    };
    validate_interaction(ctx.state, def, npc)?;
    ctx.state.spend_time(def.time_cost)?;
    ctx.state.spend_cash(def.cost)?;
    tracing::debug!(interaction = def.id, npc_id, "performing interaction");
    (def.perform)(ctx, npc_id)
}

/// Borrow the target NPC. Only called after validation found it.
fn target<'a>(ctx: &'a mut TickContext<'_>, npc_id: u64) -> Result<&'a mut Npc, ActionError> {
    ctx.state.npc_mut(npc_id).ok_or(ActionError::UnknownNpc(npc_id))
}

fn spend_time(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let bond = ctx.rng.random_range(3..=8);
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(bond);
    npc.adjust_familiarity(15);
    let name = npc.name.clone();
    ctx.adjust_stat(StatKind::Happiness, 2);
    Ok(format!("You spent quality time with {name}."))
}

fn conversation(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let bond = ctx.rng.random_range(1..=4);
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(bond);
    npc.adjust_familiarity(10);
    Ok(format!("You had a nice chat with {}.", npc.name))
}

fn call_message(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(2);
    npc.adjust_familiarity(8);
    Ok(format!("You caught up with {}.", npc.name))
}

fn give_gift(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let bond = ctx.rng.random_range(5..=10);
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(bond);
    npc.adjust_familiarity(5);
    Ok(format!("{} loved the gift.", npc.name))
}

fn compliment(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(3);
    npc.adjust_familiarity(3);
    Ok(format!("{} smiled.", npc.name))
}

fn insult(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let hurt = ctx.rng.random_range(8..=15);
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(-hurt);
    npc.adjust_familiarity(3);
    let name = npc.name.clone();
    ctx.adjust_stat(StatKind::Karma, -2);
    Ok(format!("You insulted {name}."))
}

fn ask_for_money(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let roll = ctx.roll();
    let amount = ctx.rng.random_range(50..=500);
    let npc = target(ctx, npc_id)?;
    let generosity = npc.relationship as f64 / 100.0;
    if roll < generosity {
        let name = npc.name.clone();
        ctx.state.finances.cash += amount;
        return Ok(format!("{name} gave you ${amount}."));
    }
    npc.adjust_relationship(-5);
    Ok(format!("{} said no.", npc.name))
}

fn play_with_pet(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let npc = target(ctx, npc_id)?;
    npc.adjust_relationship(5);
    npc.adjust_familiarity(10);
    let name = npc.name.clone();
    ctx.adjust_stat(StatKind::Happiness, 5);
    Ok(format!("You played with {name}."))
}

fn ask_out(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let roll = ctx.roll();
    let looks = ctx.state.stats.looks;
    let npc = target(ctx, npc_id)?;
    let chance = ((npc.relationship as f64 + looks as f64 / 2.0) / 150.0).clamp(0.05, 0.95);
    if roll < chance {
        npc.kind = NpcKind::Partner;
        npc.adjust_relationship(10);
        let name = npc.name.clone();
        ctx.state.flags.romance.partner_id = Some(npc_id);
        ctx.adjust_stat(StatKind::Happiness, 8);
        ctx.log(HistoryCategory::Relationship, format!("You started dating {name}."));
        return Ok(format!("{name} said yes!"));
    }
    npc.adjust_relationship(-5);
    let name = npc.name.clone();
    ctx.adjust_stat(StatKind::Happiness, -5);
    Ok(format!("{name} turned you down."))
}

fn propose(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let roll = ctx.roll();
    let npc = target(ctx, npc_id)?;
    if roll < npc.relationship as f64 / 100.0 {
        npc.kind = NpcKind::Spouse;
        let name = npc.name.clone();
        let romance = &mut ctx.state.flags.romance;
        romance.partner_id = None;
        romance.engaged = false;
        romance.spouse_id = Some(npc_id);
        romance.married = true;
        ctx.adjust_stat(StatKind::Happiness, 15);
        ctx.log(HistoryCategory::Milestone, format!("You married {name}."));
        return Ok(format!("{name} said yes! You are now married."));
    }
    npc.adjust_relationship(-15);
    let name = npc.name.clone();
    ctx.adjust_stat(StatKind::Happiness, -10);
    Ok(format!("{name} said no."))
}

fn break_up(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let npc = target(ctx, npc_id)?;
    let was_spouse = npc.kind == NpcKind::Spouse;
    npc.kind = NpcKind::Acquaintance;
    npc.adjust_relationship(-30);
    let name = npc.name.clone();
    ctx.state.flags.romance.forget(npc_id);
    ctx.adjust_stat(StatKind::Happiness, -5);
    let text = if was_spouse {
        format!("You divorced {name}.")
    } else {
        format!("You broke up with {name}.")
    };
    ctx.log(HistoryCategory::Relationship, text.clone());
    Ok(text)
}

fn try_for_baby(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let chance = ctx.state.stats.fertility as f64 / 100.0 * 0.5;
    if !ctx.rng.random_bool(chance) {
        return Ok("No luck this time.".to_string());
    }
    let name = super::random_name(ctx.rng);
    let mut child = Npc::new(0, name.clone(), NpcKind::Child, 0);
    child.relationship = 80;
    child.familiarity = 80;
    child.location = Location::Home;
    ctx.state.add_npc(child);
    if let Some(partner) = ctx.state.npc_mut(npc_id) {
        partner.adjust_relationship(5);
    }
    ctx.adjust_stat(StatKind::Happiness, 10);
    ctx.log(HistoryCategory::Milestone, format!("Your child {name} was born."));
    Ok(format!("It's a baby! Welcome, {name}."))
}

fn plot_to_kill(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let year = ctx.state.year;
    let name = target(ctx, npc_id)?.name.clone();
    ctx.state.flags.crime.add_plot(npc_id, year);
    ctx.adjust_stat(StatKind::Craziness, 2);
    ctx.adjust_stat(StatKind::Karma, -3);
    Ok(format!("You began plotting against {name}."))
}

fn plot_bonus(state: &WorldState, npc_id: u64) -> f64 {
    if state.flags.crime.has_plot(npc_id, state.year) {
        PLOT_BONUS
    } else {
        0.0
    }
}

fn attempt_kill(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let stats = &ctx.state.stats;
    let chance = (ATTEMPT_BASE_CHANCE
        + (stats.craziness - 50) as f64 / 200.0
        + stats.athleticism as f64 / 400.0
        + plot_bonus(ctx.state, npc_id))
    .clamp(ATTEMPT_MIN_CHANCE, ATTEMPT_MAX_CHANCE);

    if ctx.roll() < chance {
        let name = target(ctx, npc_id)?.name.clone();
        mark_npc_killed_by_player(ctx, npc_id);
        return Ok(format!("You killed {name}."));
    }
    let npc = target(ctx, npc_id)?;
    npc.relationship = 0;
    let name = npc.name.clone();
    ctx.state.flags.crime.witness_exposure += FAILED_ATTEMPT_EXPOSURE;
    ctx.adjust_stat(StatKind::Karma, -10);
    ctx.log(HistoryCategory::Shadow, format!("You tried to kill {name} and failed."));
    Ok(format!("{name} fought you off."))
}

fn hire_hitman(ctx: &mut TickContext, npc_id: u64) -> ActionResult {
    let chance = (HITMAN_BASE_CHANCE + plot_bonus(ctx.state, npc_id)).min(ATTEMPT_MAX_CHANCE);
    let name = target(ctx, npc_id)?.name.clone();
    if ctx.roll() < chance {
        mark_npc_killed_by_player(ctx, npc_id);
        return Ok(format!("The job on {name} is done."));
    }
    ctx.state.flags.crime.witness_exposure += FAILED_HIT_EXPOSURE;
    ctx.adjust_stat(StatKind::Karma, -5);
    Ok("The hitman took your money and vanished.".to_string())
}

/// The player killed `npc_id`, directly or by proxy.
///
/// Soft-deletes the NPC and clears any romance or plot references. What
/// follows depends on whether the shadow path is open: an unlocked killer
/// gains a kill with heat and notoriety, anyone else gets a violent record
/// and witness exposure.
pub fn mark_npc_killed_by_player(ctx: &mut TickContext, npc_id: u64) {
    let Some(npc) = ctx.state.npc_mut(npc_id) else {
        return;
    };
    if !npc.is_alive {
        return;
    }
    npc.is_alive = false;
    npc.death_cause = Some("Murdered".to_string());
    let name = npc.name.clone();

    let year = ctx.state.year;
    ctx.state.flags.romance.forget(npc_id);
    ctx.state.flags.crime.clear_plots_for(npc_id);

    if ctx.state.serial_killer.unlocked {
        let sk = &mut ctx.state.serial_killer;
        sk.kills += 1;
        sk.heat += KILL_HEAT;
        sk.notoriety += KILL_NOTORIETY;
        sk.last_kill_year = Some(year);
        sk.clamp();
    } else {
        ctx.state.flags.crime.violent_record = true;
        ctx.state.flags.crime.witness_exposure += KILL_WITNESS_EXPOSURE;
    }
    ctx.adjust_stat(StatKind::Karma, -KILL_KARMA_PENALTY);
    ctx.log(HistoryCategory::Shadow, format!("You killed {name}."));
    ctx.emit(SignalKind::NpcDied {
        npc_id,
        cause: "Murdered".to_string(),
    });
}
