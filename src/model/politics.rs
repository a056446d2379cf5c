use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::education::EducationLevel;

pub const SUPREME_LEADER_ID: &str = "supreme_leader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentType {
    #[default]
    Democracy,
    Oligarchy,
    Dictatorship,
}

impl fmt::Display for GovernmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GovernmentType::Democracy => "democracy",
            GovernmentType::Oligarchy => "oligarchy",
            GovernmentType::Dictatorship => "dictatorship",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Progressive,
    Conservative,
    Green,
    Libertarian,
    Independent,
}

impl Party {
    /// Share of the electorate a party brings with it, in [0, 1].
    pub fn base_support(self) -> f64 {
        match self {
            Party::Progressive | Party::Conservative => 0.45,
            Party::Green | Party::Libertarian => 0.2,
            Party::Independent => 0.1,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Party::Progressive => "Progressive Party",
            Party::Conservative => "Conservative Party",
            Party::Green => "Green Party",
            Party::Libertarian => "Libertarian Party",
            Party::Independent => "Independent",
        };
        f.write_str(s)
    }
}

/// An office in the political catalog, ranked by `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalPosition {
    pub id: String,
    pub title: String,
    pub level: u32,
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default)]
    pub min_education: EducationLevel,
    #[serde(default)]
    pub min_smarts: i32,
    #[serde(default)]
    pub min_looks: i32,
    #[serde(default)]
    pub min_political_years: u32,
    #[serde(default)]
    pub required_major: Option<String>,
    #[serde(default)]
    pub required_flag: Option<String>,
    #[serde(default)]
    pub min_authoritarian: Option<i32>,
    #[serde(default)]
    pub min_military_control: Option<i32>,
    /// Empty means any government type.
    #[serde(default)]
    pub allowed_governments: Vec<GovernmentType>,
    #[serde(default = "default_true")]
    pub electable: bool,
    /// Years per term; 0 means the office has no fixed term.
    #[serde(default = "default_term_length")]
    pub term_length: u32,
    #[serde(default)]
    pub term_limit: Option<u32>,
    pub salary: i64,
    #[serde(default)]
    pub filing_fee: i64,
    #[serde(default)]
    pub base_campaign_cost: i64,
}

fn default_min_age() -> u32 {
    18
}

fn default_true() -> bool {
    true
}

fn default_term_length() -> u32 {
    4
}

/// A governance policy the player can enact while in office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_min_level")]
    pub min_level: u32,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub approval: f64,
    #[serde(default)]
    pub corruption: f64,
    #[serde(default)]
    pub opposition: f64,
    #[serde(default)]
    pub media_control: f64,
    #[serde(default)]
    pub military_control: f64,
    #[serde(default)]
    pub authoritarian: f64,
    #[serde(default)]
    pub requires_government: Option<GovernmentType>,
}

fn default_min_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScandalDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Corruption needed before this scandal can surface.
    #[serde(default)]
    pub min_corruption: f64,
    pub approval_hit: f64,
    #[serde(default)]
    pub opposition_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub position_id: String,
    pub funds: i64,
    #[serde(default)]
    pub rallies: u32,
    #[serde(default)]
    pub endorsements: u32,
    #[serde(default)]
    pub rigged: bool,
    #[serde(default)]
    pub lobbyist_donations: u32,
    pub declared_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliticsState {
    pub party: Option<Party>,
    pub total_political_years: u32,
    pub grassroots_this_year: bool,
    pub campaign: Option<Campaign>,
    pub current_position: Option<String>,
    pub position_level: u32,
    pub title: Option<String>,
    pub years_in_term: u32,
    /// Terms won, per seat.
    pub terms_served: BTreeMap<String, u32>,
    pub approval: f64,
    pub corruption: f64,
    pub media_control: f64,
    pub opposition_strength: f64,
    pub military_control: f64,
    pub authoritarian_score: f64,
    pub party_support: f64,
    pub impeachment_risk: f64,
    pub revolution_risk: f64,
    pub enacted_policies: Vec<String>,
    pub scandals: Vec<String>,
    pub has_lost_election: bool,
    pub government_type: GovernmentType,
}

impl Default for PoliticsState {
    fn default() -> Self {
        Self {
            party: None,
            total_political_years: 0,
            grassroots_this_year: false,
            campaign: None,
            current_position: None,
            position_level: 0,
            title: None,
            years_in_term: 0,
            terms_served: BTreeMap::new(),
            approval: 50.0,
            corruption: 0.0,
            media_control: 10.0,
            opposition_strength: 50.0,
            military_control: 0.0,
            authoritarian_score: 0.0,
            party_support: 0.0,
            impeachment_risk: 0.0,
            revolution_risk: 0.0,
            enacted_policies: Vec::new(),
            scandals: Vec::new(),
            has_lost_election: false,
            government_type: GovernmentType::Democracy,
        }
    }
}

impl PoliticsState {
    pub fn in_office(&self) -> bool {
        self.current_position.is_some()
    }

    pub fn in_campaign(&self) -> bool {
        self.campaign.is_some()
    }

    /// Leave office. Record fields (scandals, corruption, ...) persist.
    pub fn vacate_office(&mut self) {
        self.current_position = None;
        self.position_level = 0;
        self.title = None;
        self.years_in_term = 0;
        self.impeachment_risk = 0.0;
        self.revolution_risk = 0.0;
    }

    pub fn clamp(&mut self) {
        for v in [
            &mut self.approval,
            &mut self.corruption,
            &mut self.media_control,
            &mut self.opposition_strength,
            &mut self.military_control,
            &mut self.authoritarian_score,
            &mut self.party_support,
            &mut self.impeachment_risk,
            &mut self.revolution_risk,
        ] {
            *v = v.clamp(0.0, 100.0);
        }
    }
}
