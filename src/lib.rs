pub mod config;
pub mod content;
pub mod error;
pub mod id;
pub mod model;
pub mod rng;
pub mod save;
pub mod scenario;
pub mod sim;

pub use config::GameConfig;
pub use error::{ActionError, ActionResult};
pub use id::NpcIds;
pub use model::{
    CareerDefinition, GameEvent, Location, Npc, NpcKind, Party, PoliticalPosition, ShadowMode,
    StatKind, WorldState,
};
pub use sim::{Engine, Registries, Signal, SignalKind};
