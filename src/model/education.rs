use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed seven-step education scale. Ordering is the rank comparison used by
/// every eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum EducationLevel {
    #[default]
    None,
    Elementary,
    #[serde(rename = "Middle School")]
    MiddleSchool,
    #[serde(rename = "High School")]
    HighSchool,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EducationLevel::None => "None",
            EducationLevel::Elementary => "Elementary",
            EducationLevel::MiddleSchool => "Middle School",
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::Doctorate => "Doctorate",
        };
        f.write_str(s)
    }
}

/// What the player is currently enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolStage {
    Elementary,
    MiddleSchool,
    HighSchool,
    College,
    GradSchool,
    LawSchool,
}

impl SchoolStage {
    /// Level awarded on graduation.
    pub fn completes(self) -> EducationLevel {
        match self {
            SchoolStage::Elementary => EducationLevel::Elementary,
            SchoolStage::MiddleSchool => EducationLevel::MiddleSchool,
            SchoolStage::HighSchool => EducationLevel::HighSchool,
            SchoolStage::College => EducationLevel::Bachelor,
            SchoolStage::GradSchool => EducationLevel::Master,
            SchoolStage::LawSchool => EducationLevel::Doctorate,
        }
    }

    pub fn length_years(self) -> u32 {
        match self {
            SchoolStage::Elementary => 6,
            SchoolStage::MiddleSchool => 3,
            SchoolStage::HighSchool => 4,
            SchoolStage::College => 4,
            SchoolStage::GradSchool => 2,
            SchoolStage::LawSchool => 3,
        }
    }

    pub fn is_compulsory(self) -> bool {
        matches!(
            self,
            SchoolStage::Elementary | SchoolStage::MiddleSchool | SchoolStage::HighSchool
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub stage: SchoolStage,
    pub years_remaining: u32,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub studied_this_year: bool,
    #[serde(default)]
    pub skipped_this_year: bool,
}

impl Enrollment {
    pub fn new(stage: SchoolStage, major: Option<String>) -> Self {
        Self {
            stage,
            years_remaining: stage.length_years(),
            major,
            studied_this_year: false,
            skipped_this_year: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub level: EducationLevel,
    pub enrolled: Option<Enrollment>,
    /// Grade point average on a 0.0 – 4.0 scale.
    pub gpa: f64,
    pub majors: Vec<String>,
    pub dropped_out: bool,
    pub law_degree: bool,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            level: EducationLevel::None,
            enrolled: None,
            gpa: 2.5,
            majors: Vec::new(),
            dropped_out: false,
            law_degree: false,
        }
    }
}

impl Education {
    pub fn is_enrolled(&self) -> bool {
        self.enrolled.is_some()
    }

    pub fn has_major(&self, major: &str) -> bool {
        self.majors.iter().any(|m| m.eq_ignore_ascii_case(major))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_ordered() {
        assert!(EducationLevel::None < EducationLevel::Elementary);
        assert!(EducationLevel::HighSchool < EducationLevel::Bachelor);
        assert!(EducationLevel::Master < EducationLevel::Doctorate);
        assert_eq!(EducationLevel::Doctorate.rank(), 6);
    }

    #[test]
    fn serde_names_match_catalog_strings() {
        let lvl: EducationLevel = serde_json::from_str("\"High School\"").unwrap();
        assert_eq!(lvl, EducationLevel::HighSchool);
        assert_eq!(lvl.to_string(), "High School");
    }

    #[test]
    fn majors_compare_case_insensitively() {
        let edu = Education {
            majors: vec!["Political Science".to_string()],
            ..Education::default()
        };
        assert!(edu.has_major("political science"));
        assert!(!edu.has_major("Law"));
    }
}
