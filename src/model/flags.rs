//! Typed extension state.
//!
//! Subsystems keep their ad-hoc state in named blocks instead of one shared
//! string-keyed bag. Declarative content still addresses flags by name, so
//! [`Flags::get`], [`Flags::set`] and [`Flags::clear`] route the well-known
//! keys onto the typed blocks and keep everything else in `story`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FlagValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Number(n) => *n != 0.0,
            FlagValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FlagValue::Number(n) => Some(*n),
            FlagValue::Text(s) => s.parse().ok(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        FlagValue::Bool(b)
    }
}

impl From<f64> for FlagValue {
    fn from(n: f64) -> Self {
        FlagValue::Number(n)
    }
}

impl From<i32> for FlagValue {
    fn from(n: i32) -> Self {
        FlagValue::Number(n as f64)
    }
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawFlags {
    pub license_bar: bool,
    pub bar_exam_last_attempt_year: Option<i32>,
    pub bar_exam_attempts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomanceFlags {
    pub partner_id: Option<u64>,
    pub spouse_id: Option<u64>,
    pub engaged: bool,
    pub married: bool,
}

impl RomanceFlags {
    /// Drop every reference to `npc_id`. Returns true if anything changed.
    pub fn forget(&mut self, npc_id: u64) -> bool {
        let mut changed = false;
        if self.partner_id == Some(npc_id) {
            self.partner_id = None;
            self.engaged = false;
            changed = true;
        }
        if self.spouse_id == Some(npc_id) {
            self.spouse_id = None;
            self.married = false;
            changed = true;
        }
        changed
    }
}

/// A "plot to kill" mark against one NPC, valid for the year it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotMark {
    pub target_id: u64,
    pub year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrimeRecord {
    pub violent_record: bool,
    pub witness_exposure: i32,
    pub plots: Vec<PlotMark>,
    pub prison_years: u32,
}

impl CrimeRecord {
    pub fn has_plot(&self, target_id: u64, year: i32) -> bool {
        self.plots
            .iter()
            .any(|p| p.target_id == target_id && p.year == year)
    }

    pub fn add_plot(&mut self, target_id: u64, year: i32) {
        if !self.has_plot(target_id, year) {
            self.plots.push(PlotMark { target_id, year });
        }
    }

    pub fn clear_plots_for(&mut self, target_id: u64) {
        self.plots.retain(|p| p.target_id != target_id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Face,
    Heel,
}

/// A competing promotion's offer, open until the next year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalOffer {
    pub promotion_id: String,
    pub promotion_name: String,
    pub salary: i64,
    pub years: u32,
    pub year_offered: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrestlingProfile {
    pub ring_name: String,
    pub fan_base: i32,
    pub momentum: i32,
    pub promo_skill: i32,
    pub alignment: Alignment,
    pub push: i32,
    pub injury_years: u32,
    pub retired: bool,
    pub free_agent: bool,
    pub matches_this_year: u32,
    pub pending_offer: Option<RivalOffer>,
}

impl Default for WrestlingProfile {
    fn default() -> Self {
        Self {
            ring_name: String::new(),
            fan_base: 5,
            momentum: 30,
            promo_skill: 20,
            alignment: Alignment::Face,
            push: 10,
            injury_years: 0,
            retired: false,
            free_agent: false,
            matches_this_year: 0,
            pending_offer: None,
        }
    }
}

impl WrestlingProfile {
    pub fn clamp(&mut self) {
        self.fan_base = self.fan_base.clamp(0, 100);
        self.momentum = self.momentum.clamp(0, 100);
        self.promo_skill = self.promo_skill.clamp(0, 100);
        self.push = self.push.clamp(0, 100);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub law: LawFlags,
    pub romance: RomanceFlags,
    pub crime: CrimeRecord,
    pub wrestling: Option<WrestlingProfile>,
    /// Content-authored narrative flags (event markers and the like).
    pub story: BTreeMap<String, FlagValue>,
}

fn number(value: &FlagValue) -> f64 {
    value.as_number().unwrap_or_else(|| {
        tracing::warn!("flag value {value:?} is not numeric, using 0");
        0.0
    })
}

impl Flags {
    pub fn get(&self, key: &str) -> Option<FlagValue> {
        let wrestling = self.wrestling.as_ref();
        match key {
            "married" => Some(self.romance.married.into()),
            "engaged" => Some(self.romance.engaged.into()),
            "license_bar" => Some(self.law.license_bar.into()),
            "bar_exam_last_attempt_year" => self
                .law
                .bar_exam_last_attempt_year
                .map(|y| FlagValue::Number(y as f64)),
            "violent_record" => Some(self.crime.violent_record.into()),
            "witness_exposure" => Some(self.crime.witness_exposure.into()),
            "in_prison" => Some((self.crime.prison_years > 0).into()),
            "wrestling_momentum" => wrestling.map(|w| w.momentum.into()),
            "wrestling_fan_base" => wrestling.map(|w| w.fan_base.into()),
            "wrestling_push" => wrestling.map(|w| w.push.into()),
            "wrestling_promo_skill" => wrestling.map(|w| w.promo_skill.into()),
            "wrestling_heel" => wrestling.map(|w| (w.alignment == Alignment::Heel).into()),
            "wrestling_retired" => wrestling.map(|w| w.retired.into()),
            _ => self.story.get(key).cloned(),
        }
    }

    /// A flag is "set" when present and truthy.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.is_truthy())
    }

    pub fn set(&mut self, key: &str, value: FlagValue) {
        match key {
            "married" => self.romance.married = value.is_truthy(),
            "engaged" => self.romance.engaged = value.is_truthy(),
            "license_bar" => self.law.license_bar = value.is_truthy(),
            "bar_exam_last_attempt_year" => {
                self.law.bar_exam_last_attempt_year = Some(number(&value) as i32)
            }
            "violent_record" => self.crime.violent_record = value.is_truthy(),
            "witness_exposure" => self.crime.witness_exposure = number(&value) as i32,
            "wrestling_momentum" => self.wrestling_mut().momentum = number(&value) as i32,
            "wrestling_fan_base" => self.wrestling_mut().fan_base = number(&value) as i32,
            "wrestling_push" => self.wrestling_mut().push = number(&value) as i32,
            "wrestling_promo_skill" => self.wrestling_mut().promo_skill = number(&value) as i32,
            "wrestling_heel" => {
                self.wrestling_mut().alignment = if value.is_truthy() {
                    Alignment::Heel
                } else {
                    Alignment::Face
                }
            }
            "wrestling_retired" => self.wrestling_mut().retired = value.is_truthy(),
            _ => {
                self.story.insert(key.to_string(), value);
            }
        }
        if let Some(w) = self.wrestling.as_mut() {
            w.clamp();
        }
    }

    pub fn clear(&mut self, key: &str) {
        match key {
            "married" => self.romance.married = false,
            "engaged" => self.romance.engaged = false,
            "license_bar" => self.law.license_bar = false,
            "bar_exam_last_attempt_year" => self.law.bar_exam_last_attempt_year = None,
            "violent_record" => self.crime.violent_record = false,
            "witness_exposure" => self.crime.witness_exposure = 0,
            "wrestling_heel" => {
                if let Some(w) = self.wrestling.as_mut() {
                    w.alignment = Alignment::Face;
                }
            }
            "wrestling_retired" => {
                if let Some(w) = self.wrestling.as_mut() {
                    w.retired = false;
                }
            }
            _ => {
                self.story.remove(key);
            }
        }
    }

    pub fn toggle(&mut self, key: &str) {
        let next = !self.is_set(key);
        self.set(key, FlagValue::Bool(next));
    }

    fn wrestling_mut(&mut self) -> &mut WrestlingProfile {
        self.wrestling.get_or_insert_with(WrestlingProfile::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_route_to_typed_blocks() {
        let mut flags = Flags::default();
        flags.set("license_bar", true.into());
        flags.set("married", FlagValue::Number(1.0));
        assert!(flags.law.license_bar);
        assert!(flags.romance.married);
        assert!(flags.story.is_empty());
        assert!(flags.is_set("license_bar"));
    }

    #[test]
    fn unknown_keys_land_in_story() {
        let mut flags = Flags::default();
        flags.set("event_lottery_triggered", true.into());
        assert_eq!(
            flags.story.get("event_lottery_triggered"),
            Some(&FlagValue::Bool(true))
        );
        flags.clear("event_lottery_triggered");
        assert!(flags.get("event_lottery_triggered").is_none());
    }

    #[test]
    fn toggle_flips_truthiness() {
        let mut flags = Flags::default();
        flags.toggle("likes_jazz");
        assert!(flags.is_set("likes_jazz"));
        flags.toggle("likes_jazz");
        assert!(!flags.is_set("likes_jazz"));
    }

    #[test]
    fn wrestling_keys_create_profile_and_clamp() {
        let mut flags = Flags::default();
        assert!(flags.get("wrestling_momentum").is_none());
        flags.set("wrestling_momentum", FlagValue::Number(250.0));
        assert_eq!(flags.wrestling.as_ref().unwrap().momentum, 100);
        assert_eq!(
            flags.get("wrestling_momentum").and_then(|v| v.as_number()),
            Some(100.0)
        );
    }

    #[test]
    fn romance_forget_clears_matching_refs_only() {
        let mut r = RomanceFlags {
            partner_id: Some(4),
            spouse_id: Some(9),
            engaged: true,
            married: true,
        };
        assert!(r.forget(4));
        assert_eq!(r.partner_id, None);
        assert!(!r.engaged);
        assert!(r.married);
        assert!(!r.forget(4));
    }

    #[test]
    fn plots_are_per_target_per_year() {
        let mut crime = CrimeRecord::default();
        crime.add_plot(7, 2030);
        crime.add_plot(7, 2030);
        assert_eq!(crime.plots.len(), 1);
        assert!(crime.has_plot(7, 2030));
        assert!(!crime.has_plot(7, 2031));
        assert!(!crime.has_plot(8, 2030));
    }
}
