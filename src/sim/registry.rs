use super::actions::ActionRegistry;
use super::events::EventRegistry;
use crate::model::{
    CareerDefinition, GameEvent, PolicyDefinition, PoliticalPosition, ScandalDefinition,
    SerialContract,
};

/// Every catalog the simulation reads. Owned by the engine and passed down by
/// shared reference; nothing in here changes during a tick.
#[derive(Clone)]
pub struct Registries {
    pub events: EventRegistry,
    pub careers: Vec<CareerDefinition>,
    pub serial_contracts: Vec<SerialContract>,
    pub positions: Vec<PoliticalPosition>,
    pub policies: Vec<PolicyDefinition>,
    pub scandals: Vec<ScandalDefinition>,
    pub actions: ActionRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert-or-replace by id, keeping first-registration order.
fn upsert<T>(list: &mut Vec<T>, items: Vec<T>, id: impl Fn(&T) -> &str) {
    for item in items {
        match list.iter().position(|existing| id(existing) == id(&item)) {
            Some(idx) => list[idx] = item,
            None => list.push(item),
        }
    }
}

impl Registries {
    /// Built-in actions, empty content catalogs.
    pub fn new() -> Self {
        Self {
            events: EventRegistry::new(),
            careers: Vec::new(),
            serial_contracts: Vec::new(),
            positions: Vec::new(),
            policies: Vec::new(),
            scandals: Vec::new(),
            actions: ActionRegistry::standard(),
        }
    }

    /// Built-in actions plus the bundled content catalogs.
    pub fn with_defaults() -> Self {
        let mut registries = Self::new();
        registries.register_events(crate::content::default_events());
        registries.register_careers(crate::content::default_careers());
        registries.register_serial_contracts(crate::content::default_serial_contracts());
        registries.register_positions(crate::content::default_positions());
        registries.register_policies(crate::content::default_policies());
        registries.register_scandals(crate::content::default_scandals());
        registries
    }

    pub fn register_events(&mut self, events: Vec<GameEvent>) {
        self.events.register(events);
    }

    pub fn register_careers(&mut self, careers: Vec<CareerDefinition>) {
        upsert(&mut self.careers, careers, |c| &c.id);
    }

    pub fn register_serial_contracts(&mut self, contracts: Vec<SerialContract>) {
        upsert(&mut self.serial_contracts, contracts, |c| &c.id);
    }

    pub fn register_positions(&mut self, positions: Vec<PoliticalPosition>) {
        upsert(&mut self.positions, positions, |p| &p.id);
        self.positions.sort_by_key(|p| p.level);
    }

    pub fn register_policies(&mut self, policies: Vec<PolicyDefinition>) {
        upsert(&mut self.policies, policies, |p| &p.id);
    }

    pub fn register_scandals(&mut self, scandals: Vec<ScandalDefinition>) {
        upsert(&mut self.scandals, scandals, |s| &s.id);
    }

    pub fn career(&self, id: &str) -> Option<&CareerDefinition> {
        self.careers.iter().find(|c| c.id == id)
    }

    pub fn serial_contract(&self, id: &str) -> Option<&SerialContract> {
        self.serial_contracts.iter().find(|c| c.id == id)
    }

    pub fn position(&self, id: &str) -> Option<&PoliticalPosition> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn policy(&self, id: &str) -> Option<&PolicyDefinition> {
        self.policies.iter().find(|p| p.id == id)
    }

    pub fn scandal(&self, id: &str) -> Option<&ScandalDefinition> {
        self.scandals.iter().find(|s| s.id == id)
    }
}
