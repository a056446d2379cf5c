use super::context::TickContext;
use super::system::LifeStage;

/// The annual tick as an ordered list of named stages.
///
/// Stages run strictly in registration order with the same context, so a
/// later stage always observes what earlier ones wrote. Signals pile up in
/// `ctx.signals` and are delivered by the engine after the whole tick; no
/// stage reacts to another stage's signals within the same year.
pub struct AnnualPipeline {
    stages: Vec<Box<dyn LifeStage>>,
}

impl AnnualPipeline {
    pub fn new(stages: Vec<Box<dyn LifeStage>>) -> Self {
        Self { stages }
    }

    /// The full yearly life cycle in its canonical order.
    pub fn standard() -> Self {
        use super::career::CareerStage;
        use super::education::EducationStage;
        use super::lifecycle::{
            BirthdayStage, CalendarStage, ClampStage, FinancesStage, MortalityStage,
            PassiveStatsStage, RandomEventStage, WellbeingStage,
        };
        use super::politics::PoliticsStage;
        use super::relationships::RelationshipsStage;

        Self::new(vec![
            Box::new(CalendarStage),
            Box::new(PassiveStatsStage),
            Box::new(EducationStage),
            Box::new(CareerStage),
            Box::new(PoliticsStage),
            Box::new(RelationshipsStage),
            Box::new(WellbeingStage),
            Box::new(FinancesStage),
            Box::new(ClampStage),
            Box::new(BirthdayStage),
            Box::new(RandomEventStage),
            Box::new(MortalityStage),
        ])
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&mut self, ctx: &mut TickContext) {
        for stage in self.stages.iter_mut() {
            tracing::debug!(stage = stage.name(), age = ctx.state.age, "running stage");
            stage.run(ctx);
        }
    }
}
