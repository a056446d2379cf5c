use serde::{Deserialize, Serialize};

use super::career::{Career, SerialKillerState, WrestlingContract};
use super::education::Education;
use super::flags::Flags;
use super::history::{HistoryCategory, HistoryEntry};
use super::npc::{Location, Npc};
use super::politics::PoliticsState;
use super::stats::Stats;
use crate::error::ActionError;
use crate::id::NpcIds;

/// Months of home time available each year.
pub const HOME_TIME_BUDGET: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finances {
    pub cash: i64,
    pub salary: i64,
    pub expenses: i64,
    pub debt: i64,
}

/// The whole life being simulated. Owned by the engine and mutated in place
/// by every stage and action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    pub version: u32,
    pub name: String,
    pub age: u32,
    pub year: i32,
    pub is_alive: bool,
    pub death_cause: Option<String>,
    pub stats: Stats,
    pub flags: Flags,
    pub finances: Finances,
    pub history: Vec<HistoryEntry>,
    pub relationships: Vec<Npc>,
    pub education: Education,
    pub career: Career,
    pub serial_killer: SerialKillerState,
    pub politics: PoliticsState,
    pub wrestling_contract: Option<WrestlingContract>,
    pub current_location: Location,
    pub time_budget: u32,
    pub location_time: u32,
    /// Event triggered by the last tick and still waiting for a choice.
    pub pending_event: Option<String>,
    pub npc_ids: NpcIds,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            version: 0,
            name: String::new(),
            age: 0,
            year: 2000,
            is_alive: true,
            death_cause: None,
            stats: Stats::default(),
            flags: Flags::default(),
            finances: Finances::default(),
            history: Vec::new(),
            relationships: Vec::new(),
            education: Education::default(),
            career: Career::default(),
            serial_killer: SerialKillerState::default(),
            politics: PoliticsState::default(),
            wrestling_contract: None,
            current_location: Location::Home,
            time_budget: HOME_TIME_BUDGET,
            location_time: 0,
            pending_event: None,
            npc_ids: NpcIds::new(),
        }
    }
}

impl WorldState {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
            ..Self::default()
        }
    }

    pub fn log(&mut self, category: HistoryCategory, text: impl Into<String>) {
        self.history.push(HistoryEntry {
            age: self.age,
            year: self.year,
            text: text.into(),
            category,
        });
    }

    pub fn is_home(&self) -> bool {
        self.current_location.is_home()
    }

    /// Time left in whichever budget is active at the current location.
    pub fn available_time(&self) -> u32 {
        if self.is_home() {
            self.time_budget
        } else {
            self.location_time
        }
    }

    pub fn in_prison(&self) -> bool {
        self.flags.crime.prison_years > 0
    }

    /// Refuse anything a prisoner cannot do.
    pub fn check_free(&self) -> Result<(), ActionError> {
        let years = self.flags.crime.prison_years;
        if years > 0 {
            return Err(ActionError::Ineligible(format!(
                "you have {years} year(s) left to serve in prison"
            )));
        }
        Ok(())
    }

    pub fn check_time(&self, months: u32) -> Result<(), ActionError> {
        let available = self.available_time();
        if available < months {
            return Err(ActionError::NotEnoughTime {
                needed: months,
                available,
            });
        }
        Ok(())
    }

    /// Deduct from the active budget only.
    pub fn spend_time(&mut self, months: u32) -> Result<(), ActionError> {
        self.check_time(months)?;
        if self.is_home() {
            self.time_budget -= months;
        } else {
            self.location_time -= months;
        }
        Ok(())
    }

    pub fn check_cash(&self, amount: i64) -> Result<(), ActionError> {
        if amount > 0 && self.finances.cash < amount {
            return Err(ActionError::NotEnoughMoney {
                needed: amount,
                available: self.finances.cash,
            });
        }
        Ok(())
    }

    pub fn spend_cash(&mut self, amount: i64) -> Result<(), ActionError> {
        self.check_cash(amount)?;
        self.finances.cash -= amount;
        Ok(())
    }

    pub fn npc(&self, id: u64) -> Option<&Npc> {
        self.relationships.iter().find(|n| n.id == id)
    }

    pub fn npc_mut(&mut self, id: u64) -> Option<&mut Npc> {
        self.relationships.iter_mut().find(|n| n.id == id)
    }

    pub fn living_npcs(&self) -> impl Iterator<Item = &Npc> {
        self.relationships.iter().filter(|n| n.is_alive)
    }

    pub fn add_npc(&mut self, mut npc: Npc) -> u64 {
        npc.id = self.npc_ids.next_id();
        let id = npc.id;
        self.relationships.push(npc);
        id
    }

    /// Mark the player dead. Returns false if already dead.
    pub fn die(&mut self, cause: impl Into<String>) -> bool {
        if !self.is_alive {
            return false;
        }
        let cause = cause.into();
        self.is_alive = false;
        self.log(HistoryCategory::Death, format!("You died. Cause: {cause}."));
        tracing::info!(age = self.age, cause = %cause, "player died");
        self.death_cause = Some(cause);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prisoners_are_not_free() {
        let mut s = WorldState::new("Test", 2000);
        assert!(s.check_free().is_ok());
        s.flags.crime.prison_years = 3;
        assert!(s.in_prison());
        assert!(matches!(s.check_free(), Err(ActionError::Ineligible(_))));
    }

    #[test]
    fn spend_time_uses_home_budget_at_home() {
        let mut s = WorldState::new("Test", 2000);
        s.location_time = 3;
        s.spend_time(2).unwrap();
        assert_eq!(s.time_budget, 10);
        assert_eq!(s.location_time, 3);
    }

    #[test]
    fn spend_time_uses_location_budget_away() {
        let mut s = WorldState::new("Test", 2000);
        s.current_location = Location::Gym;
        s.location_time = 3;
        s.spend_time(2).unwrap();
        assert_eq!(s.time_budget, 12);
        assert_eq!(s.location_time, 1);
    }

    #[test]
    fn spend_time_rejects_without_mutation() {
        let mut s = WorldState::new("Test", 2000);
        s.current_location = Location::Gym;
        s.location_time = 1;
        let before = s.clone();
        let err = s.spend_time(2).unwrap_err();
        assert_eq!(
            err,
            ActionError::NotEnoughTime {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn spend_cash_blocks_overdraft() {
        let mut s = WorldState::new("Test", 2000);
        s.finances.cash = 50;
        assert!(s.spend_cash(60).is_err());
        assert_eq!(s.finances.cash, 50);
        s.spend_cash(50).unwrap();
        assert_eq!(s.finances.cash, 0);
    }

    #[test]
    fn die_is_idempotent() {
        let mut s = WorldState::new("Test", 2000);
        assert!(s.die("Old age"));
        assert!(!s.die("Shark"));
        assert_eq!(s.death_cause.as_deref(), Some("Old age"));
        assert_eq!(s.history.len(), 1);
    }
}
