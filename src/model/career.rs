use serde::{Deserialize, Serialize};

use super::education::EducationLevel;

pub const WRESTLING_FIELD: &str = "Wrestling";
pub const LAW_FIELD: &str = "Law";
pub const POLITICS_FIELD: &str = "Politics";
/// Career id for a self-founded engineering company. Never in the catalog.
pub const ENGINEERING_FOUNDER_ID: &str = "engineering_founder";

/// A hireable job as supplied by the content catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerDefinition {
    pub id: String,
    pub title: String,
    pub field: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default)]
    pub required_education: EducationLevel,
    /// Any one of these majors qualifies. Empty means no requirement.
    #[serde(default)]
    pub required_majors: Vec<String>,
    /// Every flag listed must be set.
    #[serde(default)]
    pub required_flags: Vec<String>,
    #[serde(default)]
    pub min_smarts: i32,
    #[serde(default)]
    pub min_willpower: i32,
    #[serde(default)]
    pub min_looks: i32,
    #[serde(default)]
    pub min_athleticism: i32,
    #[serde(default)]
    pub min_years_experience: Option<u32>,
    #[serde(default)]
    pub min_law_years: Option<u32>,
    #[serde(default)]
    pub min_licensed_law_years: Option<u32>,
    pub start_salary: i64,
    /// Fractional raise, e.g. 0.03 for 3%.
    #[serde(default = "default_annual_raise")]
    pub annual_raise: f64,
    /// Titles for levels 2, 3, ... in order.
    #[serde(default)]
    pub promotion_titles: Vec<String>,
    #[serde(default = "default_promotion_raise")]
    pub promotion_raise: f64,
    /// 0.0 (anyone gets in) to 1.0 (very selective).
    #[serde(default)]
    pub difficulty: f64,
    /// Wrestling promotion this job belongs to, if any.
    #[serde(default)]
    pub promotion_id: Option<String>,
}

fn default_min_age() -> u32 {
    18
}

fn default_annual_raise() -> f64 {
    0.03
}

fn default_promotion_raise() -> f64 {
    0.2
}

impl CareerDefinition {
    pub fn is_wrestling(&self) -> bool {
        self.field == WRESTLING_FIELD
    }
}

/// Years of work that outlive any single job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub total_years: u32,
    pub law_years: u32,
    /// Only accrues once the bar licence is held.
    pub licensed_law_years: u32,
}

/// The player's current job. `id == None` is the unemployed baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Career {
    pub id: Option<String>,
    pub title: String,
    pub field: String,
    pub specialization: String,
    pub level: u32,
    pub performance: i32,
    pub years_in_role: u32,
    pub years_in_field: u32,
    pub rejections: u32,
    pub retired: bool,
    pub experience: Experience,
}

impl Default for Career {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            field: String::new(),
            specialization: String::new(),
            level: 0,
            performance: 0,
            years_in_role: 0,
            years_in_field: 0,
            rejections: 0,
            retired: false,
            experience: Experience::default(),
        }
    }
}

impl Career {
    pub fn is_employed(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_wrestling(&self) -> bool {
        self.is_employed() && self.field == WRESTLING_FIELD
    }

    /// Reset the job to the unemployed baseline. Lifetime experience,
    /// rejection count and retirement status are kept.
    pub fn clear_job(&mut self) {
        let experience = std::mem::take(&mut self.experience);
        let rejections = self.rejections;
        let retired = self.retired;
        *self = Career {
            experience,
            rejections,
            retired,
            ..Career::default()
        };
    }

    pub fn adjust_performance(&mut self, delta: i32) {
        self.performance = (self.performance + delta).clamp(0, 100);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrestlingContract {
    pub promotion_id: String,
    pub promotion_name: String,
    pub years_remaining: u32,
    pub salary: i64,
}

/// A shadow-crime job as supplied by the content catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialContract {
    pub id: String,
    pub title: String,
    /// Chance in [0, 1] that the job is botched.
    pub risk: f64,
    pub payout: i64,
    pub heat: i32,
    pub notoriety: i32,
    #[serde(default)]
    pub min_notoriety: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMode {
    #[default]
    None,
    DoubleLife,
    FullTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialKillerState {
    pub unlocked: bool,
    pub caught: bool,
    pub mode: ShadowMode,
    pub alias: Option<String>,
    pub kills: u32,
    pub contracts_completed: u32,
    pub notoriety: i32,
    pub heat: i32,
    pub last_kill_year: Option<i32>,
    pub last_contract_year: Option<i32>,
}

impl SerialKillerState {
    pub fn is_active(&self) -> bool {
        self.unlocked && !self.caught && self.mode != ShadowMode::None
    }

    pub fn clamp(&mut self) {
        self.heat = self.heat.clamp(0, 100);
        self.notoriety = self.notoriety.clamp(0, 100);
    }
}
