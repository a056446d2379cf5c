use rand::Rng;

use super::actions::{ActionDef, ActionDomain, always, charge, check_basics};
use super::context::TickContext;
use super::registry::Registries;
use super::system::LifeStage;
use crate::error::{ActionError, ActionResult, ineligible};
use crate::model::{
    EducationLevel, Enrollment, HistoryCategory, SchoolStage, StatKind, WorldState,
};

// ---------------------------------------------------------------------------
// Compulsory schooling
// ---------------------------------------------------------------------------
const ELEMENTARY_AGE: u32 = 5;
const MIDDLE_SCHOOL_AGE: u32 = 11;
const HIGH_SCHOOL_AGE: u32 = 14;
const DROP_OUT_MIN_AGE: u32 = 16;

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------
const GPA_MAX: f64 = 4.0;
const GPA_PULL: f64 = 0.3;
const GPA_NOISE: f64 = 0.1;
const STUDY_GPA_BONUS: f64 = 0.3;
const SKIP_GPA_PENALTY: f64 = 0.4;

// ---------------------------------------------------------------------------
// Higher education
// ---------------------------------------------------------------------------
const COLLEGE_MIN_AGE: u32 = 17;
const GRAD_SCHOOL_MIN_AGE: u32 = 21;
const COLLEGE_TUITION: i64 = 40_000;
const GRAD_TUITION: i64 = 30_000;
const LAW_TUITION: i64 = 60_000;
const LAW_MAJOR: &str = "Law";

// ---------------------------------------------------------------------------
// Bar exam
// ---------------------------------------------------------------------------
const BAR_EXAM_FEE: i64 = 500;
const BAR_PASS_THRESHOLD: f64 = 55.0;
const BAR_RETAKE_EASING: f64 = 2.0;
const BAR_PASS_FLOOR: f64 = 49.0;

pub fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef {
            id: "study_hard",
            label: "Study hard",
            domain: ActionDomain::Education,
            min_age: ELEMENTARY_AGE,
            time_cost: 1,
            cost: 0,
            location: None,
            check: is_enrolled,
            perform: study_hard,
        },
        ActionDef {
            id: "skip_class",
            label: "Skip class",
            domain: ActionDomain::Education,
            min_age: 8,
            time_cost: 1,
            cost: 0,
            location: None,
            check: is_enrolled,
            perform: skip_class,
        },
        ActionDef {
            id: "drop_out",
            label: "Drop out",
            domain: ActionDomain::Education,
            min_age: DROP_OUT_MIN_AGE,
            time_cost: 1,
            cost: 0,
            location: None,
            check: is_enrolled,
            perform: drop_out,
        },
        ActionDef {
            id: "enroll_law_school",
            label: "Enroll in law school",
            domain: ActionDomain::Education,
            min_age: GRAD_SCHOOL_MIN_AGE,
            time_cost: 1,
            cost: 0,
            location: None,
            check: can_enroll_law_school,
            perform: enroll_law_school,
        },
        ActionDef {
            id: "take_bar_exam",
            label: "Take the bar exam",
            domain: ActionDomain::Education,
            min_age: GRAD_SCHOOL_MIN_AGE,
            time_cost: 1,
            cost: BAR_EXAM_FEE,
            location: None,
            check: can_take_bar_exam,
            perform: take_bar_exam,
        },
        ActionDef {
            id: "library_study",
            label: "Study at the library",
            domain: ActionDomain::Education,
            min_age: ELEMENTARY_AGE,
            time_cost: 1,
            cost: 0,
            location: Some(crate::model::Location::Library),
            check: always,
            perform: library_study,
        },
    ]
}

fn is_enrolled(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if !state.education.is_enrolled() {
        return Err(ineligible("you are not enrolled anywhere"));
    }
    Ok(())
}

fn study_hard(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(1..=3);
    ctx.adjust_stat(StatKind::Smarts, gain);
    ctx.adjust_stat(StatKind::Happiness, -1);
    if let Some(enrollment) = ctx.state.education.enrolled.as_mut() {
        enrollment.studied_this_year = true;
    }
    Ok("You hit the books.".to_string())
}

fn skip_class(ctx: &mut TickContext) -> ActionResult {
    ctx.adjust_stat(StatKind::Happiness, 3);
    if let Some(enrollment) = ctx.state.education.enrolled.as_mut() {
        enrollment.skipped_this_year = true;
    }
    Ok("You skipped class. Nobody noticed. Yet.".to_string())
}

fn drop_out(ctx: &mut TickContext) -> ActionResult {
    let Some(enrollment) = ctx.state.education.enrolled.take() else {
        return Err(ineligible("you are not enrolled anywhere"));
    };
    ctx.state.education.dropped_out = true;
    let stage = stage_name(enrollment.stage);
    ctx.log(HistoryCategory::Education, format!("You dropped out of {stage}."));
    Ok(format!("You dropped out of {stage}."))
}

fn library_study(ctx: &mut TickContext) -> ActionResult {
    let gain = ctx.rng.random_range(2..=4);
    ctx.adjust_stat(StatKind::Smarts, gain);
    if let Some(enrollment) = ctx.state.education.enrolled.as_mut() {
        enrollment.studied_this_year = true;
    }
    Ok("A quiet afternoon among the stacks.".to_string())
}

fn stage_name(stage: SchoolStage) -> &'static str {
    match stage {
        SchoolStage::Elementary => "elementary school",
        SchoolStage::MiddleSchool => "middle school",
        SchoolStage::HighSchool => "high school",
        SchoolStage::College => "college",
        SchoolStage::GradSchool => "graduate school",
        SchoolStage::LawSchool => "law school",
    }
}

fn can_enroll_higher(
    state: &WorldState,
    needed: EducationLevel,
    min_age: u32,
) -> Result<(), ActionError> {
    check_basics(state, min_age, 1, 0)?;
    if state.education.is_enrolled() {
        return Err(ineligible("you are already enrolled"));
    }
    if state.education.level < needed {
        return Err(ineligible(format!("you need a {needed} education first")));
    }
    Ok(())
}

fn enroll(ctx: &mut TickContext, stage: SchoolStage, major: Option<String>, tuition: i64) {
    let what = match &major {
        Some(m) => format!("{} ({m})", stage_name(stage)),
        None => stage_name(stage).to_string(),
    };
    ctx.state.education.enrolled = Some(Enrollment::new(stage, major));
    ctx.state.finances.debt += tuition;
    ctx.log(HistoryCategory::Education, format!("You enrolled in {what}."));
}

/// Start a four-year degree. Tuition goes on student debt.
pub fn enroll_college(ctx: &mut TickContext, major: &str) -> ActionResult {
    can_enroll_higher(ctx.state, EducationLevel::HighSchool, COLLEGE_MIN_AGE)?;
    charge(ctx.state, 1, 0)?;
    enroll(ctx, SchoolStage::College, Some(major.to_string()), COLLEGE_TUITION);
    Ok(format!("You enrolled in college to study {major}."))
}

pub fn enroll_grad_school(ctx: &mut TickContext, major: &str) -> ActionResult {
    can_enroll_higher(ctx.state, EducationLevel::Bachelor, GRAD_SCHOOL_MIN_AGE)?;
    charge(ctx.state, 1, 0)?;
    enroll(ctx, SchoolStage::GradSchool, Some(major.to_string()), GRAD_TUITION);
    Ok(format!("You enrolled in graduate school to study {major}."))
}

fn can_enroll_law_school(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if state.education.law_degree {
        return Err(ineligible("you already have a law degree"));
    }
    can_enroll_higher(state, EducationLevel::Bachelor, GRAD_SCHOOL_MIN_AGE)
}

fn enroll_law_school(ctx: &mut TickContext) -> ActionResult {
    enroll(
        ctx,
        SchoolStage::LawSchool,
        Some(LAW_MAJOR.to_string()),
        LAW_TUITION,
    );
    Ok("You enrolled in law school.".to_string())
}

fn can_take_bar_exam(state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    if !state.education.law_degree {
        return Err(ineligible("you need a law degree"));
    }
    if state.flags.law.license_bar {
        return Err(ineligible("you are already licensed"));
    }
    if state.flags.law.bar_exam_last_attempt_year == Some(state.year) {
        return Err(ineligible("you already sat the bar exam this year"));
    }
    Ok(())
}

/// Score needed to pass after `prior_attempts` failures.
pub fn bar_pass_threshold(prior_attempts: u32) -> f64 {
    (BAR_PASS_THRESHOLD - BAR_RETAKE_EASING * prior_attempts as f64).max(BAR_PASS_FLOOR)
}

/// A low draw is a good day.
pub fn bar_exam_score(state: &WorldState, roll: f64) -> f64 {
    state.stats.smarts as f64 * 0.5
        + state.stats.willpower as f64 * 0.2
        + state.education.gpa * 5.0
        + (1.0 - roll) * 20.0
}

fn take_bar_exam(ctx: &mut TickContext) -> ActionResult {
    let roll = ctx.roll();
    let score = bar_exam_score(ctx.state, roll);
    let year = ctx.state.year;
    let law = &mut ctx.state.flags.law;
    let threshold = bar_pass_threshold(law.bar_exam_attempts);
    law.bar_exam_attempts += 1;
    law.bar_exam_last_attempt_year = Some(year);
    tracing::debug!(score, threshold, "bar exam");

    if score > threshold {
        law.license_bar = true;
        ctx.adjust_stat(StatKind::Happiness, 10);
        ctx.log(HistoryCategory::Education, "You passed the bar exam.");
        return Ok("You passed the bar! You can now practise law.".to_string());
    }
    ctx.adjust_stat(StatKind::Happiness, -5);
    ctx.log(HistoryCategory::Education, "You failed the bar exam.");
    Ok("You failed the bar exam. Try again next year.".to_string())
}

fn graduate(ctx: &mut TickContext, enrollment: Enrollment) {
    let education = &mut ctx.state.education;
    education.level = education.level.max(enrollment.stage.completes());
    if let Some(major) = enrollment.major
        && !education.has_major(&major)
    {
        education.majors.push(major);
    }
    if enrollment.stage == SchoolStage::LawSchool {
        education.law_degree = true;
    }
    let stage = stage_name(enrollment.stage);
    ctx.log(HistoryCategory::Education, format!("You graduated from {stage}."));
    tracing::info!(stage, age = ctx.state.age, "graduated");
}

/// The compulsory stage a child of this age and level should be in.
fn compulsory_stage(age: u32, level: EducationLevel) -> Option<SchoolStage> {
    match level {
        EducationLevel::None if age >= ELEMENTARY_AGE => Some(SchoolStage::Elementary),
        EducationLevel::Elementary if age >= MIDDLE_SCHOOL_AGE => Some(SchoolStage::MiddleSchool),
        EducationLevel::MiddleSchool if age >= HIGH_SCHOOL_AGE => Some(SchoolStage::HighSchool),
        _ => None,
    }
}

/// Grades, progress, graduation, then compulsory enrolment.
pub fn process_education_year(ctx: &mut TickContext) {
    if let Some(mut enrollment) = ctx.state.education.enrolled.take() {
        let target = ctx.state.stats.smarts as f64 / 100.0 * GPA_MAX;
        let noise = ctx.rng.random_range(-GPA_NOISE..=GPA_NOISE);
        let education = &mut ctx.state.education;
        let mut gpa = education.gpa + (target - education.gpa) * GPA_PULL + noise;
        if enrollment.studied_this_year {
            gpa += STUDY_GPA_BONUS;
        }
        if enrollment.skipped_this_year {
            gpa -= SKIP_GPA_PENALTY;
        }
        education.gpa = gpa.clamp(0.0, GPA_MAX);
        enrollment.studied_this_year = false;
        enrollment.skipped_this_year = false;

        enrollment.years_remaining = enrollment.years_remaining.saturating_sub(1);
        if enrollment.years_remaining == 0 {
            graduate(ctx, enrollment);
        } else {
            ctx.state.education.enrolled = Some(enrollment);
        }
    }

    let education = &ctx.state.education;
    if !education.is_enrolled()
        && !education.dropped_out
        && let Some(stage) = compulsory_stage(ctx.state.age, education.level)
    {
        enroll(ctx, stage, None, 0);
    }
}

pub struct EducationStage;

impl LifeStage for EducationStage {
    fn name(&self) -> &str {
        "education"
    }

    fn run(&mut self, ctx: &mut TickContext) {
        if ctx.state.is_alive {
            process_education_year(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;
    use crate::sim::actions::perform_action;

    fn with_ctx<R>(state: &mut WorldState, f: impl FnOnce(&mut TickContext) -> R) -> R {
        let registries = Registries::new();
        let mut rng = FixedRng::low();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries: &registries,
            rng: &mut rng,
            signals: &mut signals,
        };
        f(&mut ctx)
    }

    fn law_grad() -> WorldState {
        let mut s = WorldState::new("Test", 2030);
        s.age = 25;
        s.finances.cash = 5_000;
        s.education.level = EducationLevel::Doctorate;
        s.education.law_degree = true;
        s.education.gpa = 3.0;
        s.stats.smarts = 70;
        s
    }

    #[test]
    fn child_moves_through_compulsory_school() {
        let mut state = WorldState::new("Test", 2000);
        for age in 1..=18 {
            state.age = age;
            with_ctx(&mut state, process_education_year);
        }
        assert_eq!(state.education.level, EducationLevel::HighSchool);
        assert!(!state.education.is_enrolled());
    }

    #[test]
    fn studying_lifts_gpa() {
        let mut a = WorldState::new("Test", 2000);
        a.age = 8;
        a.education.enrolled = Some(Enrollment::new(SchoolStage::Elementary, None));
        let mut b = a.clone();
        b.education.enrolled.as_mut().unwrap().studied_this_year = true;
        with_ctx(&mut a, process_education_year);
        with_ctx(&mut b, process_education_year);
        assert!(b.education.gpa > a.education.gpa);
    }

    #[test]
    fn college_needs_high_school_and_adds_major_on_graduation() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 18;
        assert!(with_ctx(&mut state, |ctx| enroll_college(ctx, "Biology")).is_err());
        state.education.level = EducationLevel::HighSchool;
        with_ctx(&mut state, |ctx| enroll_college(ctx, "Biology")).unwrap();
        assert_eq!(state.finances.debt, COLLEGE_TUITION);
        for _ in 0..4 {
            with_ctx(&mut state, process_education_year);
        }
        assert_eq!(state.education.level, EducationLevel::Bachelor);
        assert!(state.education.has_major("biology"));
    }

    #[test]
    fn drop_out_stops_compulsory_reenrolment() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 16;
        state.education.level = EducationLevel::MiddleSchool;
        state.education.enrolled = Some(Enrollment::new(SchoolStage::HighSchool, None));
        with_ctx(&mut state, |ctx| perform_action(ctx, "drop_out")).unwrap();
        with_ctx(&mut state, process_education_year);
        assert!(!state.education.is_enrolled());
        assert!(state.education.dropped_out);
    }

    #[test]
    fn bar_threshold_eases_to_floor() {
        assert_eq!(bar_pass_threshold(0), 55.0);
        assert_eq!(bar_pass_threshold(2), 51.0);
        assert_eq!(bar_pass_threshold(10), BAR_PASS_FLOOR);
    }

    #[test]
    fn passing_bar_sets_licence_and_blocks_retake_this_year() {
        let mut state = law_grad();
        with_ctx(&mut state, |ctx| perform_action(ctx, "take_bar_exam")).unwrap();
        assert!(state.flags.law.license_bar);
        assert!(state.flags.is_set("license_bar"));
        assert_eq!(state.flags.law.bar_exam_last_attempt_year, Some(2030));
    }

    #[test]
    fn failed_bar_blocks_until_next_year() {
        let mut state = law_grad();
        state.stats.smarts = 10;
        state.stats.willpower = 10;
        state.education.gpa = 0.5;
        let registries = Registries::new();
        let mut rng = FixedRng::high();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state: &mut state,
            registries: &registries,
            rng: &mut rng,
            signals: &mut signals,
        };
        perform_action(&mut ctx, "take_bar_exam").unwrap();
        assert!(!ctx.state.flags.law.license_bar);
        let before = ctx.state.clone();
        assert!(perform_action(&mut ctx, "take_bar_exam").is_err());
        assert_eq!(*ctx.state, before);
        ctx.state.year += 1;
        assert!(registries.actions.get("take_bar_exam").unwrap().validate(ctx.state, &registries).is_ok());
    }
}
