use rand::RngCore;

use crate::config::GameConfig;
use crate::model::career::POLITICS_FIELD;
use crate::model::*;
use crate::save::SAVE_VERSION;
use crate::sim::career::POLITICS_CAREER_PREFIX;
use crate::sim::{Engine, Registries};

// -- Builder-style ref types --

/// Typed reference to an NPC in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::npc`]. Call [`.id()`](NpcRef::id) to terminate the
/// chain and extract the NPC id.
pub struct NpcRef<'a> {
    scenario: &'a mut Scenario,
    id: u64,
}

impl<'a> NpcRef<'a> {
    fn npc_mut(&mut self) -> &mut Npc {
        self.scenario
            .state
            .npc_mut(self.id)
            .expect("NpcRef always points at an NPC it created")
    }

    pub fn relationship(mut self, v: i32) -> Self {
        self.npc_mut().relationship = v;
        self
    }

    pub fn familiarity(mut self, v: i32) -> Self {
        self.npc_mut().familiarity = v;
        self
    }

    pub fn location(mut self, v: Location) -> Self {
        self.npc_mut().location = v;
        self
    }

    pub fn affiliation(mut self, v: Affiliation) -> Self {
        self.npc_mut().affiliation = Some(v);
        self
    }

    pub fn health(mut self, v: i32) -> Self {
        self.npc_mut().health = v;
        self
    }

    /// Escape hatch: apply an arbitrary closure to the NPC.
    pub fn with(mut self, f: impl FnOnce(&mut Npc)) -> Self {
        f(self.npc_mut());
        self
    }

    /// Terminate the chain and return the NPC id.
    pub fn id(self) -> u64 {
        self.id
    }
}

/// Builder for [`WorldState`] fixtures: a life already in progress, without
/// ticking through the years that led there.
pub struct Scenario {
    state: WorldState,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// A newborn in the year 2000.
    pub fn new() -> Self {
        Self::at_year(2000)
    }

    pub fn at_year(year: i32) -> Self {
        let mut state = WorldState::new("Robin Vale", year);
        state.version = SAVE_VERSION;
        Self { state }
    }

    // -- Player --

    pub fn named(mut self, name: &str) -> Self {
        self.state.name = name.to_string();
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.state.age = age;
        self
    }

    pub fn stat(mut self, kind: StatKind, value: i32) -> Self {
        self.state.stats.set(kind, value);
        self
    }

    pub fn cash(mut self, cash: i64) -> Self {
        self.state.finances.cash = cash;
        self
    }

    pub fn at(mut self, location: Location, months: u32) -> Self {
        self.state.current_location = location;
        self.state.location_time = months;
        self
    }

    pub fn flag(mut self, key: &str, value: impl Into<FlagValue>) -> Self {
        self.state.flags.set(key, value.into());
        self
    }

    // -- Education --

    pub fn education(mut self, level: EducationLevel) -> Self {
        self.state.education.level = level;
        self
    }

    pub fn major(mut self, major: &str) -> Self {
        self.state.education.majors.push(major.to_string());
        self
    }

    pub fn gpa(mut self, gpa: f64) -> Self {
        self.state.education.gpa = gpa;
        self
    }

    pub fn law_degree(mut self) -> Self {
        self.state.education.level = self.state.education.level.max(EducationLevel::Doctorate);
        self.state.education.law_degree = true;
        self
    }

    // -- Work --

    /// Already employed at `def`, `years` into the role.
    pub fn employed_as(mut self, def: &CareerDefinition, years: u32) -> Self {
        let career = &mut self.state.career;
        career.id = Some(def.id.clone());
        career.title = def.title.clone();
        career.field = def.field.clone();
        career.specialization = def.specialization.clone();
        career.level = 1;
        career.performance = 55;
        career.years_in_role = years;
        career.years_in_field = years;
        career.experience.total_years += years;
        self.state.finances.salary = def.start_salary;
        self
    }

    pub fn experience(mut self, total: u32, law: u32, licensed_law: u32) -> Self {
        self.state.career.experience = Experience {
            total_years: total,
            law_years: law,
            licensed_law_years: licensed_law,
        };
        self
    }

    pub fn shadow(mut self, mode: ShadowMode) -> Self {
        let sk = &mut self.state.serial_killer;
        sk.unlocked = true;
        sk.mode = mode;
        self
    }

    // -- Politics --

    pub fn party(mut self, party: Party) -> Self {
        self.state.politics.party = Some(party);
        self.state.politics.party_support = party.base_support() * 100.0;
        self
    }

    pub fn political_years(mut self, years: u32) -> Self {
        self.state.politics.total_political_years = years;
        self
    }

    /// Already holding `position`, with the matching pseudo-career.
    pub fn in_office(mut self, position: &PoliticalPosition) -> Self {
        let politics = &mut self.state.politics;
        politics.current_position = Some(position.id.clone());
        politics.position_level = position.level;
        politics.title = Some(position.title.clone());
        *politics.terms_served.entry(position.id.clone()).or_insert(0) += 1;

        let career = &mut self.state.career;
        career.id = Some(format!("{POLITICS_CAREER_PREFIX}{}", position.id));
        career.title = position.title.clone();
        career.field = POLITICS_FIELD.to_string();
        career.level = position.level;
        self.state.finances.salary = position.salary;
        self
    }

    pub fn politics(mut self, f: impl FnOnce(&mut PoliticsState)) -> Self {
        f(&mut self.state.politics);
        self
    }

    // -- People --

    /// Add an NPC and return a builder for further tweaks.
    pub fn npc(&mut self, name: &str, kind: NpcKind, age: u32) -> NpcRef<'_> {
        let id = self.state.add_npc(Npc::new(0, name, kind, age));
        NpcRef { scenario: self, id }
    }

    /// Escape hatch: apply an arbitrary closure to the whole state.
    pub fn with(mut self, f: impl FnOnce(&mut WorldState)) -> Self {
        f(&mut self.state);
        self
    }

    // -- Finishing --

    pub fn build(self) -> WorldState {
        self.state
    }

    /// Hand the built life to an engine drawing from `rng`.
    pub fn engine(self, registries: Registries, rng: Box<dyn RngCore>) -> Engine {
        let config = GameConfig {
            generate_family: false,
            ..GameConfig::default()
        };
        let mut engine = Engine::with_rng(config, registries, rng);
        engine.load_state(self.state);
        engine
    }

    /// Borrow the state for inspection.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Borrow the state mutably for additional modifications.
    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }
}
