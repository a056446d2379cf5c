mod common;

use std::cell::RefCell;
use std::rc::Rc;

use life_sim::model::HistoryCategory;
use life_sim::{Engine, GameConfig, save};

fn live_out(engine: &mut Engine, max_years: u32) {
    for _ in 0..max_years {
        if engine.age_up().is_err() {
            break;
        }
        if let Some(event_id) = engine.state().pending_event.clone() {
            engine.handle_choice(&event_id, 0).unwrap();
        }
    }
}

#[test]
fn a_quiet_life_ends_and_is_recorded() {
    let mut engine = Engine::new(GameConfig::new("Robin Vale", 1990, 2024), common::registries());
    let deaths = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&deaths);
    engine.subscribe(move |signal| {
        if signal.kind.name() == "death" {
            *sink.borrow_mut() += 1;
        }
    });

    live_out(&mut engine, 200);

    let state = engine.state();
    assert!(!state.is_alive);
    assert!(state.age <= 123);
    assert!(state.death_cause.is_some());
    assert_eq!(*deaths.borrow(), 1);
    assert!(state.history.iter().any(|h| h.category == HistoryCategory::Death));
    assert!(state.stats.in_bounds());
}

#[test]
fn a_saved_life_resumes_identically() {
    let config = || GameConfig::new("Robin Vale", 1990, 99);
    let mut original = Engine::new(config(), common::registries());
    live_out(&mut original, 30);

    let json = save::to_json(original.state()).unwrap();
    let restored = save::from_json(&json).unwrap();
    assert_eq!(&restored, original.state());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robin.json");
    save::write_to_path(original.state(), &path).unwrap();
    let mut resumed = Engine::new(config(), common::registries());
    resumed.load_state(save::read_from_path(&path).unwrap());
    assert_eq!(resumed.state(), original.state());
    assert!(resumed.drain_signals().is_empty());
}

#[test]
fn a_partial_save_with_a_job_keeps_ticking() {
    let state = save::from_json(
        r#"{
            "name": "Robin Vale",
            "age": 30,
            "year": 2030,
            "career": {"id": "retail_clerk", "performance": 95, "years_in_role": 6}
        }"#,
    )
    .unwrap();
    let mut engine = common::low_engine(life_sim::scenario::Scenario::new());
    engine.load_state(state);

    engine.age_up().unwrap();

    let career = &engine.state().career;
    assert_eq!(career.id.as_deref(), Some("retail_clerk"));
    assert!(career.level >= 1);
}
