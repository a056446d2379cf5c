use std::fmt;

use serde::{Deserialize, Serialize};

/// Places the player can be. Home is special: it is the only place the year
/// can advance from, and it spends the home time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Home,
    School,
    Office,
    Arena,
    Gym,
    Library,
    Hospital,
    Nightclub,
    Park,
    CityHall,
}

impl Location {
    pub const ALL: [Location; 10] = [
        Location::Home,
        Location::School,
        Location::Office,
        Location::Arena,
        Location::Gym,
        Location::Library,
        Location::Hospital,
        Location::Nightclub,
        Location::Park,
        Location::CityHall,
    ];

    pub fn is_home(self) -> bool {
        self == Location::Home
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Location::Home => "Home",
            Location::School => "School",
            Location::Office => "Office",
            Location::Arena => "Arena",
            Location::Gym => "Gym",
            Location::Library => "Library",
            Location::Hospital => "Hospital",
            Location::Nightclub => "Nightclub",
            Location::Park => "Park",
            Location::CityHall => "City Hall",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcKind {
    Father,
    Mother,
    Sibling,
    Partner,
    Spouse,
    Child,
    Pet,
    Friend,
    Classmate,
    Teacher,
    #[serde(rename = "Co-worker")]
    Coworker,
    Wrestler,
    Politician,
    Acquaintance,
}

impl NpcKind {
    pub fn is_family(self) -> bool {
        matches!(
            self,
            NpcKind::Father | NpcKind::Mother | NpcKind::Sibling | NpcKind::Child
        )
    }

    pub fn is_parent(self) -> bool {
        matches!(self, NpcKind::Father | NpcKind::Mother)
    }

    /// Family, pets and teachers are never romance candidates.
    pub fn is_romanceable(self) -> bool {
        !self.is_family() && !matches!(self, NpcKind::Pet | NpcKind::Teacher)
    }
}

impl fmt::Display for NpcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NpcKind::Father => "Father",
            NpcKind::Mother => "Mother",
            NpcKind::Sibling => "Sibling",
            NpcKind::Partner => "Partner",
            NpcKind::Spouse => "Spouse",
            NpcKind::Child => "Child",
            NpcKind::Pet => "Pet",
            NpcKind::Friend => "Friend",
            NpcKind::Classmate => "Classmate",
            NpcKind::Teacher => "Teacher",
            NpcKind::Coworker => "Co-worker",
            NpcKind::Wrestler => "Wrestler",
            NpcKind::Politician => "Politician",
            NpcKind::Acquaintance => "Acquaintance",
        };
        f.write_str(s)
    }
}

/// Which institution an NPC belongs to, used by location-scoped visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Affiliation {
    School,
    Work,
    Wrestling { promotion_id: String },
    Politics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: u64,
    pub name: String,
    pub kind: NpcKind,
    pub age: u32,
    #[serde(default = "default_npc_stat")]
    pub health: i32,
    #[serde(default = "default_npc_stat")]
    pub happiness: i32,
    #[serde(default = "default_npc_stat")]
    pub looks: i32,
    #[serde(default = "default_npc_stat")]
    pub smarts: i32,
    /// How much the NPC likes the player, [0, 100].
    pub relationship: i32,
    /// How recently the player has been in touch, [0, 100].
    pub familiarity: i32,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub affiliation: Option<Affiliation>,
    #[serde(default = "default_true")]
    pub is_alive: bool,
    #[serde(default)]
    pub death_cause: Option<String>,
}

fn default_npc_stat() -> i32 {
    50
}

fn default_true() -> bool {
    true
}

impl Npc {
    pub fn new(id: u64, name: impl Into<String>, kind: NpcKind, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            age,
            health: 80,
            happiness: 50,
            looks: 50,
            smarts: 50,
            relationship: 50,
            familiarity: 50,
            location: Location::Home,
            affiliation: None,
            is_alive: true,
            death_cause: None,
        }
    }

    /// Known NPCs have some history with the player.
    pub fn is_known(&self) -> bool {
        self.familiarity > 0 || self.relationship > 0
    }

    pub fn adjust_relationship(&mut self, delta: i32) {
        self.relationship = (self.relationship + delta).clamp(0, 100);
    }

    pub fn adjust_familiarity(&mut self, delta: i32) {
        self.familiarity = (self.familiarity + delta).clamp(0, 100);
    }

    pub fn is_school_affiliated(&self) -> bool {
        matches!(self.affiliation, Some(Affiliation::School))
    }

    pub fn wrestling_promotion(&self) -> Option<&str> {
        match &self.affiliation {
            Some(Affiliation::Wrestling { promotion_id }) => Some(promotion_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn romance_excludes_family_pets_teachers() {
        assert!(!NpcKind::Mother.is_romanceable());
        assert!(!NpcKind::Child.is_romanceable());
        assert!(!NpcKind::Pet.is_romanceable());
        assert!(!NpcKind::Teacher.is_romanceable());
        assert!(NpcKind::Classmate.is_romanceable());
        assert!(NpcKind::Coworker.is_romanceable());
    }

    #[test]
    fn adjustments_clamp() {
        let mut npc = Npc::new(1, "Ada", NpcKind::Friend, 30);
        npc.adjust_relationship(500);
        npc.adjust_familiarity(-500);
        assert_eq!(npc.relationship, 100);
        assert_eq!(npc.familiarity, 0);
        assert!(npc.is_known());
    }

    #[test]
    fn coworker_tag_round_trips() {
        let json = serde_json::to_value(NpcKind::Coworker).unwrap();
        assert_eq!(json, "Co-worker");
    }

    #[test]
    fn partial_npc_record_fills_defaults() {
        let npc: Npc = serde_json::from_str(
            r#"{"id":3,"name":"Rex","kind":"Pet","age":2,"relationship":90,"familiarity":80}"#,
        )
        .unwrap();
        assert!(npc.is_alive);
        assert_eq!(npc.location, Location::Home);
        assert_eq!(npc.health, 50);
    }
}
