use super::context::TickContext;

/// One named step of the annual tick.
///
/// Object-safe so stages can be stored as `Box<dyn LifeStage>` in an
/// [`AnnualPipeline`](super::pipeline::AnnualPipeline). Stages must not fail:
/// anything a stage cannot do this year it simply skips.
pub trait LifeStage {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &mut TickContext);
}
