//! People in the player's life: family at birth, strangers met while
//! travelling, who can be seen from where, and the yearly drift of every
//! living NPC.

pub mod interactions;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::context::TickContext;
use super::signal::SignalKind;
use super::system::LifeStage;
use crate::model::{Affiliation, HistoryCategory, Location, Npc, NpcKind, StatKind, WorldState};

pub use interactions::{
    INTERACTIONS, Interaction, available_interactions, mark_npc_killed_by_player,
    perform_interaction,
};

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------
/// Relationship above which an NPC is reachable from Home wherever they are.
const CLOSE_BOND: i32 = 80;

// ---------------------------------------------------------------------------
// Yearly drift
// ---------------------------------------------------------------------------
const FAMILIARITY_DECAY_MIN: i32 = 5;
const FAMILIARITY_DECAY_MAX: i32 = 20;
const NPC_OLD_AGE: u32 = 60;
const NPC_DEATH_RATE_PER_YEAR: f64 = 0.02;
const MOURNING_BOND: i32 = 60;

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------
const SEED_MIN: usize = 1;
const SEED_MAX: usize = 3;
/// No more strangers once a place already has this many known faces.
const SEED_CAP: usize = 6;
const SEED_FAMILIARITY: i32 = 10;
const SIBLING_CHANCE: f64 = 0.5;
const INDIE_PROMOTION_ID: &str = "indie";

const FIRST_NAMES: &[&str] = &[
    "Ava", "Ben", "Carla", "Dev", "Elena", "Farid", "Grace", "Hugo", "Iris", "Jonah", "Kira",
    "Leo", "Maya", "Nikhil", "Olive", "Pablo", "Quinn", "Rosa", "Sam", "Tariq", "Uma", "Victor",
    "Wen", "Yusuf", "Zoe",
];
const LAST_NAMES: &[&str] = &[
    "Alvarez", "Brooks", "Chen", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ito",
    "Johansson", "Kowalski", "Lopez", "Murphy", "Nakamura", "Okafor", "Patel", "Rossi",
    "Schmidt", "Tanaka", "Walsh",
];
const PET_NAMES: &[&str] = &["Biscuit", "Pepper", "Rex", "Mochi", "Luna", "Ziggy"];

pub fn random_name(rng: &mut dyn rand::RngCore) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Sam");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{first} {last}")
}

pub fn random_pet_name(rng: &mut dyn rand::RngCore) -> String {
    PET_NAMES.choose(rng).copied().unwrap_or("Rex").to_string()
}

/// Parents and sometimes a sibling, all at Home and fond of the newborn.
pub fn init_family(ctx: &mut TickContext) {
    let surname = ctx
        .state
        .name
        .rsplit(' ')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("Doe")
        .to_string();

    for kind in [NpcKind::Father, NpcKind::Mother] {
        let age = ctx.rng.random_range(22..=40);
        let first = FIRST_NAMES.choose(ctx.rng).copied().unwrap_or("Sam");
        let relationship = ctx.rng.random_range(70..=95);
        let mut npc = Npc::new(0, format!("{first} {surname}"), kind, age);
        npc.relationship = relationship;
        npc.familiarity = 80;
        ctx.state.add_npc(npc);
    }

    if ctx.rng.random_bool(SIBLING_CHANCE) {
        let age = ctx.rng.random_range(1..=8);
        let first = FIRST_NAMES.choose(ctx.rng).copied().unwrap_or("Sam");
        let relationship = ctx.rng.random_range(40..=80);
        let mut npc = Npc::new(0, format!("{first} {surname}"), NpcKind::Sibling, age);
        npc.relationship = relationship;
        npc.familiarity = 70;
        ctx.state.add_npc(npc);
    }
}

/// Who you would meet at `location`, and what they are to you.
fn local_kind(state: &WorldState, location: Location) -> Option<(NpcKind, Option<Affiliation>)> {
    match location {
        Location::Home => None,
        Location::School => Some((NpcKind::Classmate, Some(Affiliation::School))),
        Location::Office => Some((NpcKind::Coworker, Some(Affiliation::Work))),
        Location::Arena => {
            let promotion_id = state
                .wrestling_contract
                .as_ref()
                .map(|c| c.promotion_id.clone())
                .unwrap_or_else(|| INDIE_PROMOTION_ID.to_string());
            Some((NpcKind::Wrestler, Some(Affiliation::Wrestling { promotion_id })))
        }
        Location::CityHall => Some((NpcKind::Politician, Some(Affiliation::Politics))),
        Location::Gym
        | Location::Library
        | Location::Hospital
        | Location::Nightclub
        | Location::Park => Some((NpcKind::Acquaintance, None)),
    }
}

/// Populate a location with a few new faces on arrival.
pub fn seed_location(ctx: &mut TickContext, location: Location) {
    let Some((kind, affiliation)) = local_kind(ctx.state, location) else {
        return;
    };
    let present = ctx
        .state
        .living_npcs()
        .filter(|n| n.location == location)
        .count();
    if present >= SEED_CAP {
        return;
    }
    let count = ctx.rng.random_range(SEED_MIN..=SEED_MAX).min(SEED_CAP - present);
    let player_age = ctx.state.age;

    for i in 0..count {
        // Schools also have teachers.
        let (kind, age) = if kind == NpcKind::Classmate && i == 0 && count > 1 {
            (NpcKind::Teacher, ctx.rng.random_range(25..=60))
        } else if kind == NpcKind::Classmate {
            let lo = player_age.saturating_sub(1);
            (kind, ctx.rng.random_range(lo..=player_age + 1))
        } else {
            let lo = player_age.saturating_sub(10).max(16);
            (kind, ctx.rng.random_range(lo..=lo + 25))
        };
        let name = random_name(ctx.rng);
        let relationship = ctx.rng.random_range(20..=50);
        let looks = ctx.rng.random_range(20..=90);
        let smarts = ctx.rng.random_range(20..=90);
        let mut npc = Npc::new(0, name, kind, age);
        npc.relationship = relationship;
        npc.familiarity = SEED_FAMILIARITY;
        npc.looks = looks;
        npc.smarts = smarts;
        npc.location = location;
        npc.affiliation = affiliation.clone();
        ctx.state.add_npc(npc);
    }
}

/// NPCs the player can see from where they stand.
///
/// Only living, known NPCs appear. Home also shows close bonds wherever they
/// are; School shows everyone affiliated with school; the Arena hides
/// wrestlers from other promotions while the player is under contract.
pub fn visible_relationships(state: &WorldState) -> Vec<&Npc> {
    let here = state.current_location;
    let promotion = state
        .wrestling_contract
        .as_ref()
        .filter(|_| state.career.is_wrestling())
        .map(|c| c.promotion_id.as_str());

    state
        .living_npcs()
        .filter(|n| n.is_known())
        .filter(|n| match here {
            Location::Home => n.location.is_home() || n.relationship > CLOSE_BOND,
            Location::School => n.is_school_affiliated() || n.location == Location::School,
            Location::Arena => {
                if n.location != Location::Arena {
                    return false;
                }
                match (promotion, n.wrestling_promotion()) {
                    (Some(mine), Some(theirs)) => mine == theirs,
                    _ => true,
                }
            }
            other => n.location == other,
        })
        .collect()
}

/// Kill an NPC from natural causes. Soft delete: the record stays.
fn npc_dies(ctx: &mut TickContext, idx: usize, cause: &str) {
    let npc = &mut ctx.state.relationships[idx];
    npc.is_alive = false;
    npc.death_cause = Some(cause.to_string());
    let (id, name, kind, bond) = (npc.id, npc.name.clone(), npc.kind, npc.relationship);

    ctx.state.flags.romance.forget(id);
    ctx.log(
        HistoryCategory::Relationship,
        format!("Your {} {name} died. Cause: {cause}.", kind.to_string().to_lowercase()),
    );
    if kind.is_family() || bond >= MOURNING_BOND {
        let grief = ctx.rng.random_range(5..=15);
        ctx.adjust_stat(StatKind::Happiness, -grief);
    }
    ctx.emit(SignalKind::NpcDied {
        npc_id: id,
        cause: cause.to_string(),
    });
}

/// Age every living NPC, let familiarity fade, and roll old-age deaths.
pub fn process_relationships_year(ctx: &mut TickContext) {
    for idx in 0..ctx.state.relationships.len() {
        if !ctx.state.relationships[idx].is_alive {
            continue;
        }
        let decay = ctx
            .rng
            .random_range(FAMILIARITY_DECAY_MIN..=FAMILIARITY_DECAY_MAX);
        let npc = &mut ctx.state.relationships[idx];
        npc.age += 1;
        npc.adjust_familiarity(-decay);
        let age = npc.age;

        if age > NPC_OLD_AGE {
            let chance = ((age - NPC_OLD_AGE) as f64 * NPC_DEATH_RATE_PER_YEAR).min(1.0);
            if ctx.rng.random_bool(chance) {
                npc_dies(ctx, idx, "Old age");
            }
        }
    }
}

pub struct RelationshipsStage;

impl LifeStage for RelationshipsStage {
    fn name(&self) -> &str {
        "relationships"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        process_relationships_year(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WrestlingContract;
    use crate::model::career::WRESTLING_FIELD;
    use crate::rng::FixedRng;
    use crate::sim::registry::Registries;

    fn with_ctx<R>(
        state: &mut WorldState,
        rng: &mut dyn rand::RngCore,
        f: impl FnOnce(&mut TickContext) -> R,
    ) -> R {
        let registries = Registries::new();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries: &registries,
            rng,
            signals: &mut signals,
        };
        f(&mut ctx)
    }

    fn npc(state: &mut WorldState, kind: NpcKind, location: Location, relationship: i32) -> u64 {
        let mut n = Npc::new(0, "Someone", kind, 30);
        n.location = location;
        n.relationship = relationship;
        state.add_npc(n)
    }

    #[test]
    fn family_has_two_parents_at_home() {
        let mut state = WorldState::new("Alex Doe", 2000);
        with_ctx(&mut state, &mut FixedRng::low(), init_family);
        let parents: Vec<&Npc> = state
            .relationships
            .iter()
            .filter(|n| n.kind.is_parent())
            .collect();
        assert_eq!(parents.len(), 2);
        assert!(parents.iter().all(|p| p.location.is_home()));
        assert!(parents.iter().all(|p| p.name.ends_with("Doe")));
    }

    #[test]
    fn home_shows_local_and_close_bonds() {
        let mut state = WorldState::new("Test", 2000);
        let mom = npc(&mut state, NpcKind::Mother, Location::Home, 60);
        let bestie = npc(&mut state, NpcKind::Friend, Location::Park, 90);
        let stranger = npc(&mut state, NpcKind::Acquaintance, Location::Park, 30);
        let ids: Vec<u64> = visible_relationships(&state).iter().map(|n| n.id).collect();
        assert!(ids.contains(&mom));
        assert!(ids.contains(&bestie));
        assert!(!ids.contains(&stranger));
    }

    #[test]
    fn unknown_and_dead_are_hidden() {
        let mut state = WorldState::new("Test", 2000);
        let ghost = npc(&mut state, NpcKind::Friend, Location::Home, 50);
        state.npc_mut(ghost).unwrap().is_alive = false;
        let mut unknown = Npc::new(0, "Nobody", NpcKind::Acquaintance, 30);
        unknown.relationship = 0;
        unknown.familiarity = 0;
        state.add_npc(unknown);
        assert!(visible_relationships(&state).is_empty());
    }

    #[test]
    fn school_shows_affiliated_anywhere() {
        let mut state = WorldState::new("Test", 2000);
        state.current_location = Location::School;
        let id = npc(&mut state, NpcKind::Classmate, Location::Park, 30);
        state.npc_mut(id).unwrap().affiliation = Some(Affiliation::School);
        assert_eq!(visible_relationships(&state).len(), 1);
    }

    #[test]
    fn arena_filters_other_promotions_under_contract() {
        let mut state = WorldState::new("Test", 2000);
        state.current_location = Location::Arena;
        state.career.id = Some("wrestler".to_string());
        state.career.field = WRESTLING_FIELD.to_string();
        state.wrestling_contract = Some(WrestlingContract {
            promotion_id: "apex".to_string(),
            promotion_name: "Apex".to_string(),
            years_remaining: 3,
            salary: 40_000,
        });
        let mate = npc(&mut state, NpcKind::Wrestler, Location::Arena, 40);
        state.npc_mut(mate).unwrap().affiliation = Some(Affiliation::Wrestling {
            promotion_id: "apex".to_string(),
        });
        let rival = npc(&mut state, NpcKind::Wrestler, Location::Arena, 40);
        state.npc_mut(rival).unwrap().affiliation = Some(Affiliation::Wrestling {
            promotion_id: "titan".to_string(),
        });
        let ids: Vec<u64> = visible_relationships(&state).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![mate]);
    }

    #[test]
    fn seeding_respects_cap_and_tags_affiliation() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 25;
        with_ctx(&mut state, &mut FixedRng::low(), |ctx| {
            seed_location(ctx, Location::Office)
        });
        assert_eq!(state.relationships.len(), SEED_MIN);
        assert!(state
            .relationships
            .iter()
            .all(|n| n.kind == NpcKind::Coworker && n.affiliation == Some(Affiliation::Work)));

        for _ in 0..10 {
            with_ctx(&mut state, &mut FixedRng::high(), |ctx| {
                seed_location(ctx, Location::Office)
            });
        }
        assert_eq!(state.relationships.len(), SEED_CAP);
    }

    #[test]
    fn familiarity_decays_and_age_increments() {
        let mut state = WorldState::new("Test", 2000);
        let id = npc(&mut state, NpcKind::Friend, Location::Home, 50);
        with_ctx(&mut state, &mut FixedRng::low(), process_relationships_year);
        let n = state.npc(id).unwrap();
        assert_eq!(n.age, 31);
        assert_eq!(n.familiarity, 50 - FAMILIARITY_DECAY_MIN);
    }

    #[test]
    fn elderly_npc_can_die_and_player_mourns() {
        let mut state = WorldState::new("Test", 2000);
        let id = npc(&mut state, NpcKind::Father, Location::Home, 90);
        state.npc_mut(id).unwrap().age = 85;
        with_ctx(&mut state, &mut FixedRng::low(), process_relationships_year);
        let dad = state.npc(id).unwrap();
        assert!(!dad.is_alive);
        assert_eq!(dad.death_cause.as_deref(), Some("Old age"));
        assert_eq!(state.stats.happiness, 45);
        assert_eq!(state.relationships.len(), 1);
    }

    #[test]
    fn young_npc_never_dies_of_age() {
        let mut state = WorldState::new("Test", 2000);
        let id = npc(&mut state, NpcKind::Friend, Location::Home, 50);
        state.npc_mut(id).unwrap().age = 40;
        with_ctx(&mut state, &mut FixedRng::low(), process_relationships_year);
        assert!(state.npc(id).unwrap().is_alive);
    }
}
