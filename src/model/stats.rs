use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Health,
    Happiness,
    Smarts,
    Looks,
    Karma,
    Athleticism,
    Craziness,
    Willpower,
    Fertility,
}

impl StatKind {
    pub const ALL: [StatKind; 9] = [
        StatKind::Health,
        StatKind::Happiness,
        StatKind::Smarts,
        StatKind::Looks,
        StatKind::Karma,
        StatKind::Athleticism,
        StatKind::Craziness,
        StatKind::Willpower,
        StatKind::Fertility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::Happiness => "happiness",
            StatKind::Smarts => "smarts",
            StatKind::Looks => "looks",
            StatKind::Karma => "karma",
            StatKind::Athleticism => "athleticism",
            StatKind::Craziness => "craziness",
            StatKind::Willpower => "willpower",
            StatKind::Fertility => "fertility",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown stat '{s}'"))
    }
}

/// The player's bounded attributes. Every mutator clamps to [0, 100].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub health: i32,
    pub happiness: i32,
    pub smarts: i32,
    pub looks: i32,
    pub karma: i32,
    pub athleticism: i32,
    pub craziness: i32,
    pub willpower: i32,
    pub fertility: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100,
            happiness: 50,
            smarts: 50,
            looks: 50,
            karma: 50,
            athleticism: 50,
            craziness: 20,
            willpower: 50,
            fertility: 50,
        }
    }
}

pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

impl Stats {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::Happiness => self.happiness,
            StatKind::Smarts => self.smarts,
            StatKind::Looks => self.looks,
            StatKind::Karma => self.karma,
            StatKind::Athleticism => self.athleticism,
            StatKind::Craziness => self.craziness,
            StatKind::Willpower => self.willpower,
            StatKind::Fertility => self.fertility,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::Happiness => &mut self.happiness,
            StatKind::Smarts => &mut self.smarts,
            StatKind::Looks => &mut self.looks,
            StatKind::Karma => &mut self.karma,
            StatKind::Athleticism => &mut self.athleticism,
            StatKind::Craziness => &mut self.craziness,
            StatKind::Willpower => &mut self.willpower,
            StatKind::Fertility => &mut self.fertility,
        }
    }

    /// Set a stat, clamped. Returns the value actually stored.
    pub fn set(&mut self, kind: StatKind, value: i32) -> i32 {
        let slot = self.slot(kind);
        *slot = clamp_stat(value);
        *slot
    }

    /// Add `delta` to a stat, clamped. Returns the value actually stored.
    pub fn add(&mut self, kind: StatKind, delta: i32) -> i32 {
        let current = self.get(kind);
        self.set(kind, current.saturating_add(delta))
    }

    pub fn clamp_all(&mut self) {
        for kind in StatKind::ALL {
            let v = self.get(kind);
            self.set(kind, v);
        }
    }

    pub fn in_bounds(&self) -> bool {
        StatKind::ALL
            .iter()
            .all(|k| (STAT_MIN..=STAT_MAX).contains(&self.get(*k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clamps_both_ends() {
        let mut s = Stats::default();
        assert_eq!(s.add(StatKind::Health, 50), 100);
        assert_eq!(s.add(StatKind::Karma, -500), 0);
        assert_eq!(s.add(StatKind::Smarts, i32::MAX), 100);
    }

    #[test]
    fn clamp_all_repairs_direct_writes() {
        let mut s = Stats {
            health: 140,
            craziness: -3,
            ..Stats::default()
        };
        assert!(!s.in_bounds());
        s.clamp_all();
        assert_eq!(s.health, 100);
        assert_eq!(s.craziness, 0);
        assert!(s.in_bounds());
    }

    #[test]
    fn parses_names() {
        assert_eq!("willpower".parse::<StatKind>(), Ok(StatKind::Willpower));
        assert!("charisma".parse::<StatKind>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_value(StatKind::Athleticism).unwrap();
        assert_eq!(json, "athleticism");
    }
}
