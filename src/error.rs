use std::fmt;

use crate::model::Location;

/// Why a player action or tick could not proceed.
///
/// Returned before any state is touched: callers can rely on the world
/// being unchanged when they receive one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    NotAlive,
    NotAtHome,
    WrongLocation { required: Location },
    NotEnoughTime { needed: u32, available: u32 },
    NotEnoughMoney { needed: i64, available: i64 },
    TooYoung { min_age: u32 },
    Ineligible(String),
    UnknownAction(String),
    UnknownCareer(String),
    UnknownEvent(String),
    UnknownNpc(u64),
    UnknownPosition(String),
    UnknownPolicy(String),
    UnknownScandal(String),
    UnknownInteraction(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotAlive => write!(f, "you are no longer alive"),
            ActionError::NotAtHome => write!(f, "you must return home first"),
            ActionError::WrongLocation { required } => {
                write!(f, "you need to be at the {required}")
            }
            ActionError::NotEnoughTime { needed, available } => write!(
                f,
                "not enough time: needs {needed} month(s), {available} left"
            ),
            ActionError::NotEnoughMoney { needed, available } => {
                write!(f, "not enough money: needs ${needed}, you have ${available}")
            }
            ActionError::TooYoung { min_age } => write!(f, "you must be at least {min_age}"),
            ActionError::Ineligible(reason) => write!(f, "{reason}"),
            ActionError::UnknownAction(id) => write!(f, "unknown action '{id}'"),
            ActionError::UnknownCareer(id) => write!(f, "unknown career '{id}'"),
            ActionError::UnknownEvent(id) => write!(f, "unknown event '{id}'"),
            ActionError::UnknownNpc(id) => write!(f, "unknown person #{id}"),
            ActionError::UnknownPosition(id) => write!(f, "unknown position '{id}'"),
            ActionError::UnknownPolicy(id) => write!(f, "unknown policy '{id}'"),
            ActionError::UnknownScandal(id) => write!(f, "unknown scandal '{id}'"),
            ActionError::UnknownInteraction(id) => write!(f, "unknown interaction '{id}'"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result of a player-invocable action. `Ok` carries the message shown to
/// the player.
pub type ActionResult = Result<String, ActionError>;

pub(crate) fn ineligible(reason: impl Into<String>) -> ActionError {
    ActionError::Ineligible(reason.into())
}
