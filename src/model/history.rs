use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCategory {
    #[default]
    General,
    Milestone,
    Event,
    Education,
    Career,
    Wrestling,
    Shadow,
    Relationship,
    Politics,
    Finance,
    Health,
    Death,
}

/// One line of the life story. The simulation only ever appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub age: u32,
    pub year: i32,
    pub text: String,
    #[serde(default)]
    pub category: HistoryCategory,
}
