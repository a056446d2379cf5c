//! Built-in content catalogs.
//!
//! Catalogs are JSON arrays, the same shape a host application would load
//! from its own files and hand to the `Registries::register_*` calls.

use serde::de::DeserializeOwned;

use crate::model::{
    CareerDefinition, GameEvent, PolicyDefinition, PoliticalPosition, ScandalDefinition,
    SerialContract,
};

const CAREERS_JSON: &str = include_str!("careers.json");
const CONTRACTS_JSON: &str = include_str!("contracts.json");
const EVENTS_JSON: &str = include_str!("events.json");
const POLICIES_JSON: &str = include_str!("policies.json");
const POSITIONS_JSON: &str = include_str!("positions.json");
const SCANDALS_JSON: &str = include_str!("scandals.json");

/// Parse a catalog: a JSON array of records of one kind.
pub fn catalog_from_json<T: DeserializeOwned>(json: &str) -> serde_json::Result<Vec<T>> {
    serde_json::from_str(json)
}

fn bundled<T: DeserializeOwned>(name: &str, json: &str) -> Vec<T> {
    catalog_from_json(json).unwrap_or_else(|err| {
        tracing::error!(catalog = name, %err, "bundled catalog is malformed, skipping");
        Vec::new()
    })
}

pub fn default_careers() -> Vec<CareerDefinition> {
    bundled("careers", CAREERS_JSON)
}

pub fn default_serial_contracts() -> Vec<SerialContract> {
    bundled("contracts", CONTRACTS_JSON)
}

pub fn default_events() -> Vec<GameEvent> {
    bundled("events", EVENTS_JSON)
}

pub fn default_policies() -> Vec<PolicyDefinition> {
    bundled("policies", POLICIES_JSON)
}

pub fn default_positions() -> Vec<PoliticalPosition> {
    bundled("positions", POSITIONS_JSON)
}

pub fn default_scandals() -> Vec<ScandalDefinition> {
    bundled("scandals", SCANDALS_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::{Condition, Effect};
    use crate::model::politics::SUPREME_LEADER_ID;
    use crate::sim::career::wrestling::promotion_name;

    #[test]
    fn every_bundled_catalog_parses() {
        assert!(catalog_from_json::<CareerDefinition>(CAREERS_JSON).is_ok());
        assert!(catalog_from_json::<SerialContract>(CONTRACTS_JSON).is_ok());
        assert!(catalog_from_json::<GameEvent>(EVENTS_JSON).is_ok());
        assert!(catalog_from_json::<PolicyDefinition>(POLICIES_JSON).is_ok());
        assert!(catalog_from_json::<PoliticalPosition>(POSITIONS_JSON).is_ok());
        assert!(catalog_from_json::<ScandalDefinition>(SCANDALS_JSON).is_ok());
    }

    #[test]
    fn bundled_content_has_no_unknown_records() {
        for event in default_events() {
            assert!(
                !event.conditions.iter().any(|c| matches!(c, Condition::Unknown)),
                "{}",
                event.id
            );
            for choice in &event.choices {
                let effects = choice
                    .effects
                    .iter()
                    .chain(choice.outcomes.iter().flat_map(|o| o.effects.iter()));
                for effect in effects {
                    assert!(!matches!(effect, Effect::Unknown), "{}", event.id);
                }
            }
        }
    }

    #[test]
    fn wrestling_careers_name_known_promotions() {
        let careers = default_careers();
        let wrestling: Vec<_> = careers.iter().filter(|c| c.is_wrestling()).collect();
        assert!(!wrestling.is_empty());
        for def in wrestling {
            let promotion = def.promotion_id.as_deref().unwrap();
            assert_ne!(promotion_name(promotion), promotion, "{}", def.id);
        }
    }

    #[test]
    fn supreme_leader_is_bundled_and_unelectable() {
        let positions = default_positions();
        let seat = positions.iter().find(|p| p.id == SUPREME_LEADER_ID).unwrap();
        assert_eq!(seat.level, 5);
        assert!(!seat.electable);
        assert_eq!(seat.term_length, 0);
    }

    #[test]
    fn ids_are_unique_within_each_catalog() {
        fn unique(ids: Vec<String>) -> bool {
            let total = ids.len();
            let mut ids = ids;
            ids.sort();
            ids.dedup();
            ids.len() == total
        }
        assert!(unique(default_careers().into_iter().map(|c| c.id).collect()));
        assert!(unique(default_events().into_iter().map(|e| e.id).collect()));
        assert!(unique(default_positions().into_iter().map(|p| p.id).collect()));
        assert!(unique(default_policies().into_iter().map(|p| p.id).collect()));
        assert!(unique(default_scandals().into_iter().map(|s| s.id).collect()));
        assert!(unique(default_serial_contracts().into_iter().map(|c| c.id).collect()));
    }
}
