use std::fmt;

use super::context::TickContext;
use super::registry::Registries;
use crate::error::{ActionError, ActionResult};
use crate::model::{Location, WorldState};

/// Extra gate beyond the generic ones (alive, age, place, time, money).
/// Must not mutate; returning `Err` keeps the action out of the menu.
pub type CheckFn = fn(&WorldState, &Registries) -> Result<(), ActionError>;

/// Runs after the generic gates passed and the time and cost were charged.
pub type PerformFn = fn(&mut TickContext) -> ActionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionDomain {
    Activity,
    Education,
    Career,
    Wrestling,
    Shadow,
    Politics,
}

impl fmt::Display for ActionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionDomain::Activity => "activity",
            ActionDomain::Education => "education",
            ActionDomain::Career => "career",
            ActionDomain::Wrestling => "wrestling",
            ActionDomain::Shadow => "shadow",
            ActionDomain::Politics => "politics",
        };
        f.write_str(s)
    }
}

/// A parameterless player action.
#[derive(Clone, Copy)]
pub struct ActionDef {
    pub id: &'static str,
    pub label: &'static str,
    pub domain: ActionDomain,
    pub min_age: u32,
    /// Months taken from the active time budget.
    pub time_cost: u32,
    pub cost: i64,
    /// `None` means the action can be taken anywhere.
    pub location: Option<Location>,
    pub check: CheckFn,
    pub perform: PerformFn,
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("id", &self.id)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// For actions with no gate of their own.
pub fn always(_state: &WorldState, _registries: &Registries) -> Result<(), ActionError> {
    Ok(())
}

impl ActionDef {
    /// Every gate, in the order a player would want to hear about them.
    pub fn validate(&self, state: &WorldState, registries: &Registries) -> Result<(), ActionError> {
        if !state.is_alive {
            return Err(ActionError::NotAlive);
        }
        state.check_free()?;
        if state.age < self.min_age {
            return Err(ActionError::TooYoung {
                min_age: self.min_age,
            });
        }
        if let Some(required) = self.location
            && state.current_location != required
        {
            return Err(ActionError::WrongLocation { required });
        }
        (self.check)(state, registries)?;
        state.check_time(self.time_cost)?;
        state.check_cash(self.cost)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<ActionDef>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in action.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(super::activities::actions());
        registry.register(super::education::actions());
        registry.register(super::career::actions());
        registry.register(super::career::wrestling::actions());
        registry.register(super::career::shadow::actions());
        registry.register(super::politics::actions());
        registry
    }

    pub fn register(&mut self, actions: Vec<ActionDef>) {
        for action in actions {
            match self.actions.iter().position(|a| a.id == action.id) {
                Some(idx) => self.actions[idx] = action,
                None => self.actions.push(action),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.iter()
    }

    /// Actions whose every gate currently passes.
    pub fn available(&self, state: &WorldState, registries: &Registries) -> Vec<&ActionDef> {
        self.actions
            .iter()
            .filter(|a| a.validate(state, registries).is_ok())
            .collect()
    }
}

/// The generic gates for entry points that take arguments and so live
/// outside the registry (apply for a job, enrol in a major, run for a seat).
pub fn check_basics(
    state: &WorldState,
    min_age: u32,
    time_cost: u32,
    cost: i64,
) -> Result<(), ActionError> {
    if !state.is_alive {
        return Err(ActionError::NotAlive);
    }
    state.check_free()?;
    if state.age < min_age {
        return Err(ActionError::TooYoung { min_age });
    }
    state.check_time(time_cost)?;
    state.check_cash(cost)?;
    Ok(())
}

/// Charge an already-validated action.
pub fn charge(state: &mut WorldState, time_cost: u32, cost: i64) -> Result<(), ActionError> {
    state.spend_time(time_cost)?;
    state.spend_cash(cost)
}

/// Validate, charge time and money, then run the action.
///
/// Nothing is touched when a gate fails.
pub fn perform_action(ctx: &mut TickContext, id: &str) -> ActionResult {
    let Some(action) = ctx.registries.actions.get(id).copied() else {
        return Err(ActionError::UnknownAction(id.to_string()));
    };
    action.validate(ctx.state, ctx.registries)?;
    charge(ctx.state, action.time_cost, action.cost)?;
    tracing::debug!(action = action.id, age = ctx.state.age, "performing action");
    (action.perform)(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;

    fn ctx_run(state: &mut WorldState, id: &str) -> ActionResult {
        let registries = Registries::new();
        let mut rng = FixedRng::low();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state,
            registries: &registries,
            rng: &mut rng,
            signals: &mut signals,
        };
        perform_action(&mut ctx, id)
    }

    #[test]
    fn standard_ids_are_unique() {
        let registry = ActionRegistry::standard();
        let mut ids: Vec<&str> = registry.iter().map(|a| a.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut state = WorldState::new("Test", 2000);
        assert_eq!(
            ctx_run(&mut state, "levitate"),
            Err(ActionError::UnknownAction("levitate".to_string()))
        );
    }

    #[test]
    fn dead_player_cannot_act() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 30;
        state.is_alive = false;
        let before = state.clone();
        assert_eq!(ctx_run(&mut state, "meditate"), Err(ActionError::NotAlive));
        assert_eq!(state, before);
    }

    #[test]
    fn failed_gate_leaves_state_untouched() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 30;
        state.time_budget = 0;
        let before = state.clone();
        assert!(matches!(
            ctx_run(&mut state, "meditate"),
            Err(ActionError::NotEnoughTime { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn success_charges_the_active_budget() {
        let mut state = WorldState::new("Test", 2000);
        state.age = 30;
        ctx_run(&mut state, "meditate").unwrap();
        assert_eq!(state.time_budget, 11);
    }

    #[test]
    fn available_filters_by_age_and_location() {
        let registries = Registries::new();
        let mut state = WorldState::new("Test", 2000);
        state.age = 3;
        let ids: Vec<&str> = registries
            .actions
            .available(&state, &registries)
            .iter()
            .map(|a| a.id)
            .collect();
        assert!(!ids.contains(&"party"));
        assert!(!ids.contains(&"gym"));

        state.age = 25;
        state.current_location = Location::Gym;
        state.location_time = 3;
        let ids: Vec<&str> = registries
            .actions
            .available(&state, &registries)
            .iter()
            .map(|a| a.id)
            .collect();
        assert!(ids.contains(&"gym"));
        assert!(!ids.contains(&"party"));
    }
}
