pub mod actions;
pub mod activities;
pub mod career;
pub mod conditions;
pub mod context;
pub mod education;
pub mod effects;
pub mod engine;
pub mod events;
pub mod lifecycle;
pub mod pipeline;
pub mod politics;
pub mod registry;
pub mod relationships;
pub mod signal;
pub mod system;

pub use actions::{ActionDef, ActionDomain, ActionRegistry};
pub use context::TickContext;
pub use engine::Engine;
pub use events::EventRegistry;
pub use pipeline::AnnualPipeline;
pub use registry::Registries;
pub use signal::{Signal, SignalKind};
pub use system::LifeStage;
