//! Declarative records interpreted against the world state: conditions,
//! effects, and the narrative events built from them.
//!
//! Each record is an internally tagged enum keyed by `"type"`. Types this
//! build does not know deserialize into an explicit `Unknown` arm so that
//! newer content still loads; the evaluators treat `Unknown` as pass / no-op.

use serde::{Deserialize, Serialize};

use super::flags::FlagValue;
use super::stats::StatKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "==", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[default]
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
    #[serde(rename = "has")]
    Has,
    #[serde(rename = "not_has")]
    NotHas,
}

impl Comparator {
    /// Numeric comparison. `Has`/`NotHas` make no sense on numbers and
    /// compare as "non-zero" / "zero".
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Eq => (lhs - rhs).abs() < f64::EPSILON,
            Comparator::Ne => (lhs - rhs).abs() >= f64::EPSILON,
            Comparator::Gt => lhs > rhs,
            Comparator::Gte => lhs >= rhs,
            Comparator::Lt => lhs < rhs,
            Comparator::Lte => lhs <= rhs,
            Comparator::Has => lhs != 0.0,
            Comparator::NotHas => lhs == 0.0,
        }
    }
}

fn default_has() -> Comparator {
    Comparator::Has
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Stat {
        target: StatKind,
        #[serde(default)]
        operator: Comparator,
        value: f64,
    },
    Flag {
        target: String,
        #[serde(default = "default_has")]
        operator: Comparator,
        #[serde(default)]
        value: Option<FlagValue>,
    },
    Age {
        #[serde(default)]
        operator: Comparator,
        value: f64,
    },
    /// Passes when a fresh uniform draw is `<= value`.
    Random { value: f64 },
    /// A condition type this build does not understand. Evaluates to true.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericOp {
    #[default]
    Add,
    Set,
    Multiply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagOp {
    #[default]
    Set,
    Clear,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalOp {
    #[default]
    Add,
    Set,
    Multiply,
    /// Only valid for set-typed fields.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalField {
    Approval,
    Corruption,
    MediaControl,
    OppositionStrength,
    MilitaryControl,
    AuthoritarianScore,
    PartySupport,
    EnactedPolicies,
    Scandals,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Stat {
        target: StatKind,
        #[serde(default)]
        operator: NumericOp,
        value: f64,
    },
    Flag {
        target: String,
        #[serde(default)]
        operator: FlagOp,
        #[serde(default)]
        value: Option<FlagValue>,
    },
    Money {
        #[serde(default)]
        operator: NumericOp,
        value: f64,
    },
    Death {
        #[serde(default)]
        cause: Option<String>,
    },
    Political {
        target: PoliticalField,
        #[serde(default)]
        operator: PoliticalOp,
        value: FlagValue,
    },
    /// An effect type this build does not understand. Applying it is a no-op.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub chance: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// A weighted, age-gated narrative event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub min_age: u32,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Minimum years between two firings.
    #[serde(default)]
    pub cooldown: Option<u32>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

fn default_max_age() -> u32 {
    200
}

fn default_weight() -> f64 {
    1.0
}

impl GameEvent {
    pub fn triggered_flag(&self) -> String {
        triggered_flag(&self.id)
    }

    pub fn last_year_flag(&self) -> String {
        format!("event_{}_last_year", self.id)
    }
}

pub fn triggered_flag(event_id: &str) -> String {
    format!("event_{event_id}_triggered")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_condition_type_deserializes() {
        let c: Condition =
            serde_json::from_str(r#"{"type":"moon_phase","value":"full"}"#).unwrap();
        assert_eq!(c, Condition::Unknown);
    }

    #[test]
    fn unknown_effect_type_deserializes() {
        let e: Effect = serde_json::from_str(r#"{"type":"teleport","target":"mars"}"#).unwrap();
        assert_eq!(e, Effect::Unknown);
    }

    #[test]
    fn comparator_symbols() {
        let c: Condition = serde_json::from_str(
            r#"{"type":"stat","target":"smarts","operator":"<","value":30}"#,
        )
        .unwrap();
        assert_eq!(
            c,
            Condition::Stat {
                target: StatKind::Smarts,
                operator: Comparator::Lt,
                value: 30.0
            }
        );
    }

    #[test]
    fn flag_condition_defaults_to_has() {
        let c: Condition = serde_json::from_str(r#"{"type":"flag","target":"married"}"#).unwrap();
        assert!(matches!(
            c,
            Condition::Flag {
                operator: Comparator::Has,
                value: None,
                ..
            }
        ));
    }

    #[test]
    fn event_defaults() {
        let ev: GameEvent = serde_json::from_str(
            r#"{"id":"stray_cat","title":"A stray cat","choices":[{"text":"Adopt it"}]}"#,
        )
        .unwrap();
        assert_eq!(ev.max_age, 200);
        assert_eq!(ev.weight, 1.0);
        assert!(!ev.unique);
        assert_eq!(ev.triggered_flag(), "event_stray_cat_triggered");
    }

    #[test]
    fn political_append_effect() {
        let e: Effect = serde_json::from_str(
            r#"{"type":"political","target":"enacted_policies","operator":"append","value":"green_deal"}"#,
        )
        .unwrap();
        assert_eq!(
            e,
            Effect::Political {
                target: PoliticalField::EnactedPolicies,
                operator: PoliticalOp::Append,
                value: FlagValue::Text("green_deal".to_string())
            }
        );
    }
}
