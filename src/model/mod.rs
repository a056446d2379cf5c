pub mod career;
pub mod content;
pub mod education;
pub mod flags;
pub mod history;
pub mod npc;
pub mod politics;
pub mod stats;
pub mod world;

pub use career::{
    Career, CareerDefinition, Experience, SerialContract, SerialKillerState, ShadowMode,
    WrestlingContract,
};
pub use content::{Choice, Condition, Effect, GameEvent, Outcome};
pub use education::{Education, EducationLevel, Enrollment, SchoolStage};
pub use flags::{FlagValue, Flags, WrestlingProfile};
pub use history::{HistoryCategory, HistoryEntry};
pub use npc::{Affiliation, Location, Npc, NpcKind};
pub use politics::{
    Campaign, GovernmentType, Party, PolicyDefinition, PoliticalPosition, PoliticsState,
    ScandalDefinition,
};
pub use stats::{StatKind, Stats};
pub use world::{Finances, WorldState};
