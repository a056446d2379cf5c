mod common;

use life_sim::model::{EducationLevel, GovernmentType};
use life_sim::rng::FixedRng;
use life_sim::scenario::Scenario;
use life_sim::sim::lifecycle::CAUSE_OLD_AGE;
use life_sim::{CareerDefinition, Location, NpcKind, StatKind};

fn warehouse_associate() -> CareerDefinition {
    serde_json::from_str(
        r#"{
            "id": "warehouse_associate",
            "title": "Warehouse Associate",
            "field": "Logistics",
            "required_education": "High School",
            "min_smarts": 30,
            "min_willpower": 30,
            "difficulty": 0.1,
            "start_salary": 32000
        }"#,
    )
    .unwrap()
}

#[test]
fn qualified_applicant_is_hired() {
    let mut registries = common::registries();
    registries.register_careers(vec![warehouse_associate()]);
    let mut engine = Scenario::at_year(2030)
        .age(22)
        .stat(StatKind::Smarts, 85)
        .stat(StatKind::Willpower, 80)
        .education(EducationLevel::HighSchool)
        .engine(registries, Box::new(FixedRng::low()));

    engine.apply_for_career("warehouse_associate").unwrap();

    let state = engine.state();
    assert_eq!(state.career.id.as_deref(), Some("warehouse_associate"));
    assert_eq!(state.finances.salary, 32_000);
    assert_eq!(state.time_budget, 11);
    let names = common::signal_names(&engine.drain_signals());
    assert!(names.contains(&"career_hired"), "signals: {names:?}");
}

#[test]
fn nobody_outlives_the_age_cap() {
    for low in [true, false] {
        let scenario = Scenario::at_year(2100).age(122).stat(StatKind::Health, 100);
        let mut engine = if low {
            common::low_engine(scenario)
        } else {
            common::high_engine(scenario)
        };

        engine.age_up().unwrap();

        let state = engine.state();
        assert!(!state.is_alive, "still alive with low rng = {low}");
        assert_eq!(state.death_cause.as_deref(), Some(CAUSE_OLD_AGE));
        assert!(engine.age_up().is_err());
    }
}

#[test]
fn passing_the_bar_licenses_and_retires_the_exam() {
    let mut engine = common::low_engine(
        Scenario::at_year(2030)
            .age(26)
            .cash(2_000)
            .gpa(3.4)
            .law_degree(),
    );

    assert!(engine.available_actions().iter().any(|a| a.id == "take_bar_exam"));
    engine.perform_action("take_bar_exam").unwrap();

    let state = engine.state();
    assert!(state.flags.law.license_bar);
    assert_eq!(state.finances.cash, 1_500);
    assert!(!engine.available_actions().iter().any(|a| a.id == "take_bar_exam"));
}

#[test]
fn failing_the_bar_waits_for_next_year() {
    let mut engine = common::high_engine(
        Scenario::at_year(2030)
            .age(26)
            .cash(2_000)
            .stat(StatKind::Smarts, 10)
            .stat(StatKind::Willpower, 10)
            .gpa(0.5)
            .law_degree(),
    );

    engine.perform_action("take_bar_exam").unwrap();
    assert!(!engine.state().flags.law.license_bar);

    let before = engine.state().clone();
    assert!(engine.perform_action("take_bar_exam").is_err());
    assert_eq!(*engine.state(), before);

    engine.age_up().unwrap();
    assert!(engine.available_actions().iter().any(|a| a.id == "take_bar_exam"));
}

#[test]
fn governor_with_the_army_seizes_power() {
    let governor = common::position("governor");
    let mut engine = common::low_engine(
        Scenario::at_year(2040)
            .age(50)
            .education(EducationLevel::Bachelor)
            .political_years(10)
            .in_office(&governor)
            .politics(|p| {
                p.military_control = 90.0;
                p.opposition_strength = 10.0;
            }),
    );

    engine.perform_action("stage_coup").unwrap();

    let politics = &engine.state().politics;
    assert_eq!(politics.current_position.as_deref(), Some("supreme_leader"));
    assert_eq!(politics.position_level, 5);
    assert_eq!(politics.government_type, GovernmentType::Dictatorship);
    assert_eq!(
        engine.state().career.id.as_deref(),
        Some("politics:supreme_leader")
    );
    let names = common::signal_names(&engine.drain_signals());
    assert!(names.contains(&"political_coup"));
}

#[test]
fn plotted_attack_kills_the_target() {
    let mut scenario = Scenario::at_year(2030)
        .age(30)
        .stat(StatKind::Craziness, 90);
    let target = scenario
        .npc("Jordan Lee", NpcKind::Coworker, 35)
        .relationship(70)
        .location(Location::Home)
        .id();
    let mut engine = common::low_engine(scenario);
    let karma = engine.state().stats.karma;

    assert!(engine.visible_relationships().iter().any(|n| n.id == target));
    engine.perform_interaction(target, "plot_to_kill").unwrap();
    engine.perform_interaction(target, "attempt_kill").unwrap();

    let state = engine.state();
    let npc = state.npc(target).unwrap();
    assert!(!npc.is_alive);
    assert!(state.stats.karma < karma);
    let names = common::signal_names(&engine.drain_signals());
    assert!(names.contains(&"npc_died"));
}
