use rand::RngCore;

use super::conditions::evaluate_conditions;
use super::context::TickContext;
use super::effects::apply_effects;
use super::signal::SignalKind;
use crate::model::content::{GameEvent, Outcome};
use crate::model::{FlagValue, HistoryCategory, WorldState};
use crate::rng;

/// Narrative events keyed by id. Registering an id twice replaces the first
/// definition in place.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<GameEvent>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match self.events.iter().position(|e| e.id == event.id) {
                Some(idx) => self.events[idx] = event,
                None => self.events.push(event),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&GameEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Events that could fire this year, in registration order.
    ///
    /// `random` conditions draw from `rng`, so two calls with different
    /// sources can disagree.
    pub fn eligible_events(&self, state: &WorldState, rng: &mut dyn RngCore) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| is_eligible(state, e, rng))
            .collect()
    }

    /// Weighted pick among the eligible events. `None` when nothing is
    /// eligible or every weight is zero.
    pub fn select_random_event(
        &self,
        state: &WorldState,
        rng: &mut dyn RngCore,
    ) -> Option<&GameEvent> {
        let weighted: Vec<&GameEvent> = self
            .eligible_events(state, rng)
            .into_iter()
            .filter(|e| e.weight > 0.0)
            .collect();
        let total: f64 = weighted.iter().map(|e| e.weight).sum();
        if total <= 0.0 {
            return None;
        }
        let pick = rng::roll(rng) * total;
        let mut cumulative = 0.0;
        for &event in &weighted {
            cumulative += event.weight;
            if pick <= cumulative {
                return Some(event);
            }
        }
        weighted.last().copied()
    }
}

fn is_eligible(state: &WorldState, event: &GameEvent, rng: &mut dyn RngCore) -> bool {
    if state.age < event.min_age || state.age > event.max_age {
        return false;
    }
    if event.unique && state.flags.is_set(&event.triggered_flag()) {
        return false;
    }
    if let Some(cooldown) = event.cooldown
        && let Some(last) = state
            .flags
            .get(&event.last_year_flag())
            .and_then(|v| v.as_number())
        && ((state.year as f64) - last) < cooldown as f64
    {
        return false;
    }
    evaluate_conditions(state, &event.conditions, rng)
}

/// Pick at most one outcome by walking cumulative chances against a single
/// draw. Chances are not normalised: if they sum below the draw, the last
/// outcome is taken anyway.
pub fn resolve_outcome<'a>(outcomes: &'a [Outcome], rng: &mut dyn RngCore) -> Option<&'a Outcome> {
    let pick = rng::roll(rng);
    let mut cumulative = 0.0;
    for outcome in outcomes {
        cumulative += outcome.chance;
        if pick <= cumulative {
            return Some(outcome);
        }
    }
    outcomes.last()
}

/// Record that `event` fired this year: the unique marker, the cooldown
/// anchor, the pending choice and the `event_triggered` signal.
pub fn trigger_event(ctx: &mut TickContext, event: &GameEvent) {
    let year = ctx.state.year;
    ctx.state.flags.set(&event.triggered_flag(), FlagValue::Bool(true));
    ctx.state
        .flags
        .set(&event.last_year_flag(), FlagValue::Number(year as f64));
    ctx.state.pending_event = Some(event.id.clone());
    ctx.log(HistoryCategory::Event, event.title.clone());
    ctx.emit(SignalKind::EventTriggered {
        event_id: event.id.clone(),
    });
}

/// Apply the player's choice: base effects, then at most one outcome.
/// An out-of-range index does nothing.
pub fn apply_choice(ctx: &mut TickContext, event: &GameEvent, choice_index: usize) {
    let Some(choice) = event.choices.get(choice_index) else {
        return;
    };
    apply_effects(ctx, &choice.effects);
    ctx.log(HistoryCategory::Event, format!("{}: {}", event.title, choice.text));
    if let Some(outcome) = resolve_outcome(&choice.outcomes, ctx.rng) {
        apply_effects(ctx, &outcome.effects);
        if !outcome.description.is_empty() {
            ctx.log(HistoryCategory::Event, outcome.description.clone());
        }
    }
    if ctx.state.pending_event.as_deref() == Some(event.id.as_str()) {
        ctx.state.pending_event = None;
    }
    ctx.emit(SignalKind::ChoiceMade {
        event_id: event.id.clone(),
        choice_index,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::{Choice, Comparator, Condition, Effect, NumericOp};
    use crate::model::StatKind;
    use crate::rng::FixedRng;

    fn event(id: &str, weight: f64) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: String::new(),
            min_age: 0,
            max_age: 200,
            weight,
            cooldown: None,
            unique: false,
            conditions: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn adult() -> WorldState {
        let mut s = WorldState::new("Test", 2000);
        s.age = 30;
        s
    }

    #[test]
    fn age_window_and_conditions_filter() {
        let mut registry = EventRegistry::new();
        let mut teen = event("teen", 1.0);
        teen.min_age = 13;
        teen.max_age = 19;
        let mut smart = event("smart", 1.0);
        smart.conditions.push(Condition::Stat {
            target: StatKind::Smarts,
            operator: Comparator::Gte,
            value: 90.0,
        });
        registry.register(vec![teen, smart, event("any", 1.0)]);

        let state = adult();
        let ids: Vec<&str> = registry
            .eligible_events(&state, &mut FixedRng::low())
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["any"]);
    }

    #[test]
    fn unique_event_fires_once() {
        let mut registry = EventRegistry::new();
        let mut once = event("lottery", 1.0);
        once.unique = true;
        registry.register(vec![once]);
        let mut state = adult();
        assert_eq!(registry.eligible_events(&state, &mut FixedRng::low()).len(), 1);
        state.flags.set("event_lottery_triggered", FlagValue::Bool(true));
        assert!(registry.eligible_events(&state, &mut FixedRng::low()).is_empty());
    }

    #[test]
    fn cooldown_blocks_until_elapsed() {
        let mut registry = EventRegistry::new();
        let mut flu = event("flu", 1.0);
        flu.cooldown = Some(3);
        registry.register(vec![flu]);
        let mut state = adult();
        state.flags.set("event_flu_last_year", FlagValue::Number(1998.0));
        assert!(registry.eligible_events(&state, &mut FixedRng::low()).is_empty());
        state.year = 2001;
        assert_eq!(registry.eligible_events(&state, &mut FixedRng::low()).len(), 1);
    }

    #[test]
    fn weighted_walk_respects_order_and_weight() {
        let mut registry = EventRegistry::new();
        registry.register(vec![event("zero", 0.0), event("a", 1.0), event("b", 3.0)]);
        let state = adult();
        assert_eq!(
            registry
                .select_random_event(&state, &mut FixedRng::low())
                .map(|e| e.id.as_str()),
            Some("a")
        );
        assert_eq!(
            registry
                .select_random_event(&state, &mut FixedRng::high())
                .map(|e| e.id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn zero_weight_events_are_never_chosen() {
        let mut registry = EventRegistry::new();
        registry.register(vec![event("zero", 0.0), event("a", 1.0), event("tail", 0.0)]);
        for mut rng in [FixedRng::low(), FixedRng::high()] {
            assert_eq!(
                registry.select_random_event(&adult(), &mut rng).map(|e| e.id.as_str()),
                Some("a")
            );
        }
    }

    #[test]
    fn select_none_when_total_weight_zero() {
        let mut registry = EventRegistry::new();
        registry.register(vec![event("zero", 0.0)]);
        assert!(registry
            .select_random_event(&adult(), &mut FixedRng::low())
            .is_none());
        assert!(EventRegistry::new()
            .select_random_event(&adult(), &mut FixedRng::low())
            .is_none());
    }

    #[test]
    fn register_replaces_existing_id() {
        let mut registry = EventRegistry::new();
        registry.register(vec![event("a", 1.0)]);
        registry.register(vec![event("a", 5.0)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().weight, 5.0);
    }

    #[test]
    fn outcome_walk_falls_through_to_last() {
        let outcomes = vec![
            Outcome {
                chance: 0.1,
                description: "lucky".to_string(),
                effects: Vec::new(),
            },
            Outcome {
                chance: 0.2,
                description: "meh".to_string(),
                effects: Vec::new(),
            },
        ];
        let low = resolve_outcome(&outcomes, &mut FixedRng::low()).unwrap();
        assert_eq!(low.description, "lucky");
        let high = resolve_outcome(&outcomes, &mut FixedRng::high()).unwrap();
        assert_eq!(high.description, "meh");
        assert!(resolve_outcome(&[], &mut FixedRng::low()).is_none());
    }

    #[test]
    fn choice_applies_base_then_one_outcome() {
        let mut ev = event("dog", 1.0);
        ev.choices.push(Choice {
            text: "Pet the dog".to_string(),
            effects: vec![Effect::Stat {
                target: StatKind::Happiness,
                operator: NumericOp::Add,
                value: 5.0,
            }],
            outcomes: vec![
                Outcome {
                    chance: 0.5,
                    description: "It licks you.".to_string(),
                    effects: vec![Effect::Stat {
                        target: StatKind::Happiness,
                        operator: NumericOp::Add,
                        value: 5.0,
                    }],
                },
                Outcome {
                    chance: 0.5,
                    description: "It bites you.".to_string(),
                    effects: vec![Effect::Stat {
                        target: StatKind::Health,
                        operator: NumericOp::Add,
                        value: -10.0,
                    }],
                },
            ],
        });

        let mut state = adult();
        state.pending_event = Some("dog".to_string());
        let registries = crate::sim::registry::Registries::new();
        let mut rng = FixedRng::low();
        let mut signals = Vec::new();
        let mut ctx = TickContext {
            state: &mut state,
            registries: &registries,
            rng: &mut rng,
            signals: &mut signals,
        };
        apply_choice(&mut ctx, &ev, 0);

        assert_eq!(state.stats.happiness, 60);
        assert_eq!(state.stats.health, 100);
        assert!(state.pending_event.is_none());
        assert!(matches!(
            signals.last().map(|s| &s.kind),
            Some(SignalKind::ChoiceMade { choice_index: 0, .. })
        ));
    }
}
