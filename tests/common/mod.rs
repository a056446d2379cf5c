#![allow(dead_code)]

use life_sim::model::PoliticalPosition;
use life_sim::rng::FixedRng;
use life_sim::scenario::Scenario;
use life_sim::{CareerDefinition, Engine, Registries, Signal};

pub fn registries() -> Registries {
    Registries::with_defaults()
}

pub fn career(id: &str) -> CareerDefinition {
    registries()
        .career(id)
        .cloned()
        .unwrap_or_else(|| panic!("bundled career '{id}' missing"))
}

pub fn position(id: &str) -> PoliticalPosition {
    registries()
        .position(id)
        .cloned()
        .unwrap_or_else(|| panic!("bundled position '{id}' missing"))
}

pub fn low_engine(scenario: Scenario) -> Engine {
    scenario.engine(registries(), Box::new(FixedRng::low()))
}

pub fn high_engine(scenario: Scenario) -> Engine {
    scenario.engine(registries(), Box::new(FixedRng::high()))
}

pub fn signal_names(signals: &[Signal]) -> Vec<&'static str> {
    signals.iter().map(|s| s.kind.name()).collect()
}
