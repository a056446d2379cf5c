//! The session facade. Owns the life, the catalogs, the random source and
//! the yearly pipeline, and delivers signals to subscribers once each call
//! has finished mutating.

use rand::RngCore;

use super::actions::{self, ActionDef};
use super::context::TickContext;
use super::pipeline::AnnualPipeline;
use super::registry::Registries;
use super::relationships::{self, init_family};
use super::signal::Signal;
use super::{activities, career, education, events, politics};
use crate::config::GameConfig;
use crate::error::{ActionError, ActionResult};
use crate::model::{HistoryCategory, Location, Party, ShadowMode, WorldState};
use crate::rng;
use crate::save;

type Subscriber = Box<dyn FnMut(&Signal)>;

pub struct Engine {
    state: WorldState,
    registries: Registries,
    rng: Box<dyn RngCore>,
    pipeline: AnnualPipeline,
    subscribers: Vec<Subscriber>,
    outbox: Vec<Signal>,
}

impl Engine {
    /// A newborn, seeded from `config.seed`.
    pub fn new(config: GameConfig, registries: Registries) -> Self {
        let rng = Box::new(rng::seeded(config.seed));
        Self::with_rng(config, registries, rng)
    }

    /// A newborn drawing from the given random source.
    pub fn with_rng(config: GameConfig, registries: Registries, rng: Box<dyn RngCore>) -> Self {
        let mut state = WorldState::new(config.player_name, config.start_year);
        state.version = save::SAVE_VERSION;
        state.finances.cash = config.starting_cash;
        state.log(HistoryCategory::Milestone, "You were born.");

        let mut engine = Self {
            state,
            registries,
            rng,
            pipeline: AnnualPipeline::standard(),
            subscribers: Vec::new(),
            outbox: Vec::new(),
        };
        if config.generate_family {
            engine.with_ctx(init_family);
        }
        engine
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Replace the current life with a saved one, migrating it first.
    pub fn load_state(&mut self, mut state: WorldState) {
        save::migrate(&mut state);
        self.state = state;
        self.outbox.clear();
    }

    pub fn pipeline_mut(&mut self) -> &mut AnnualPipeline {
        &mut self.pipeline
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Signal) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Everything emitted since the last drain, oldest first.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.outbox)
    }

    fn publish(&mut self, signals: Vec<Signal>) {
        for signal in signals {
            for subscriber in self.subscribers.iter_mut() {
                subscriber(&signal);
            }
            self.outbox.push(signal);
        }
    }

    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut TickContext) -> R) -> R {
        let mut signals = Vec::new();
        let result = {
            let mut ctx = TickContext {
                state: &mut self.state,
                registries: &self.registries,
                rng: self.rng.as_mut(),
                signals: &mut signals,
            };
            f(&mut ctx)
        };
        self.publish(signals);
        result
    }

    /// Advance one year.
    ///
    /// Refused while dead or away from home; the refusal is written to the
    /// history but no stat moves.
    pub fn age_up(&mut self) -> Result<(), ActionError> {
        if !self.state.is_alive {
            self.state
                .log(HistoryCategory::General, "The dead do not grow older.");
            return Err(ActionError::NotAlive);
        }
        if !self.state.is_home() {
            self.state.log(
                HistoryCategory::General,
                "You need to go home before the year can end.",
            );
            return Err(ActionError::NotAtHome);
        }

        let mut signals = Vec::new();
        {
            let mut ctx = TickContext {
                state: &mut self.state,
                registries: &self.registries,
                rng: self.rng.as_mut(),
                signals: &mut signals,
            };
            self.pipeline.run(&mut ctx);
        }
        tracing::debug!(
            age = self.state.age,
            signals = signals.len(),
            "year complete"
        );
        self.publish(signals);
        Ok(())
    }

    /// Answer an event. An out-of-range choice is ignored.
    pub fn handle_choice(&mut self, event_id: &str, choice_index: usize) -> Result<(), ActionError> {
        let mut signals = Vec::new();
        {
            let Some(event) = self.registries.events.get(event_id) else {
                return Err(ActionError::UnknownEvent(event_id.to_string()));
            };
            let mut ctx = TickContext {
                state: &mut self.state,
                registries: &self.registries,
                rng: self.rng.as_mut(),
                signals: &mut signals,
            };
            events::apply_choice(&mut ctx, event, choice_index);
        }
        self.publish(signals);
        Ok(())
    }

    /// Registry actions whose every gate passes right now.
    pub fn available_actions(&self) -> Vec<&ActionDef> {
        self.registries
            .actions
            .available(&self.state, &self.registries)
    }

    pub fn perform_action(&mut self, id: &str) -> ActionResult {
        self.with_ctx(|ctx| actions::perform_action(ctx, id))
    }

    pub fn eligible_careers(&self) -> Vec<&crate::model::CareerDefinition> {
        career::eligible_careers(&self.state, &self.registries)
    }

    pub fn eligible_positions(&self) -> Vec<&crate::model::PoliticalPosition> {
        politics::eligible_positions(&self.state, &self.registries)
    }

    pub fn visible_relationships(&self) -> Vec<&crate::model::Npc> {
        relationships::visible_relationships(&self.state)
    }

    pub fn available_interactions(&self, npc_id: u64) -> Vec<&'static relationships::Interaction> {
        relationships::available_interactions(&self.state, npc_id)
    }

    pub fn apply_for_career(&mut self, career_id: &str) -> ActionResult {
        self.with_ctx(|ctx| career::apply_for_career(ctx, career_id))
    }

    pub fn enroll_college(&mut self, major: &str) -> ActionResult {
        self.with_ctx(|ctx| education::enroll_college(ctx, major))
    }

    pub fn enroll_grad_school(&mut self, major: &str) -> ActionResult {
        self.with_ctx(|ctx| education::enroll_grad_school(ctx, major))
    }

    pub fn set_shadow_mode(&mut self, mode: ShadowMode) -> ActionResult {
        self.with_ctx(|ctx| career::shadow::set_shadow_mode(ctx, mode))
    }

    pub fn travel_to(&mut self, destination: Location) -> ActionResult {
        self.with_ctx(|ctx| activities::travel_to(ctx, destination))
    }

    pub fn return_home(&mut self) -> ActionResult {
        self.with_ctx(activities::return_home)
    }

    pub fn perform_interaction(&mut self, npc_id: u64, interaction_id: &str) -> ActionResult {
        self.with_ctx(|ctx| relationships::perform_interaction(ctx, npc_id, interaction_id))
    }

    pub fn join_party(&mut self, party: Party) -> ActionResult {
        self.with_ctx(|ctx| politics::join_party(ctx, party))
    }

    pub fn declare_candidacy(&mut self, position_id: &str) -> ActionResult {
        self.with_ctx(|ctx| politics::declare_candidacy(ctx, position_id))
    }

    pub fn fund_campaign(&mut self, amount: i64) -> ActionResult {
        self.with_ctx(|ctx| politics::fund_campaign(ctx, amount))
    }

    pub fn enact_policy(&mut self, policy_id: &str) -> ActionResult {
        self.with_ctx(|ctx| politics::enact_policy(ctx, policy_id))
    }
}
