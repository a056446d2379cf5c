use rand::RngCore;

use crate::model::content::{Comparator, Condition};
use crate::model::{FlagValue, WorldState};
use crate::rng;

/// Evaluate one declarative condition against the state.
///
/// `Condition::Unknown` passes: content written for a newer build should not
/// lock events away on an older one.
pub fn evaluate_condition(state: &WorldState, condition: &Condition, rng: &mut dyn RngCore) -> bool {
    match condition {
        Condition::Stat {
            target,
            operator,
            value,
        } => operator.compare(state.stats.get(*target) as f64, *value),
        Condition::Flag {
            target,
            operator,
            value,
        } => evaluate_flag(state, target, *operator, value.as_ref()),
        Condition::Age { operator, value } => operator.compare(state.age as f64, *value),
        Condition::Random { value } => rng::roll(rng) <= *value,
        Condition::Unknown => {
            tracing::warn!("unknown condition type, treating as satisfied");
            true
        }
    }
}

/// True iff every condition holds. An empty list always holds.
/// Stops at the first failure, so later `random` conditions do not draw.
pub fn evaluate_conditions(
    state: &WorldState,
    conditions: &[Condition],
    rng: &mut dyn RngCore,
) -> bool {
    conditions
        .iter()
        .all(|c| evaluate_condition(state, c, rng))
}

fn evaluate_flag(
    state: &WorldState,
    key: &str,
    operator: Comparator,
    expected: Option<&FlagValue>,
) -> bool {
    let current = state.flags.get(key);
    match operator {
        Comparator::Has => current.is_some_and(|v| v.is_truthy()),
        Comparator::NotHas => !current.is_some_and(|v| v.is_truthy()),
        _ => {
            let Some(current) = current else {
                return operator == Comparator::Ne;
            };
            let Some(expected) = expected else {
                // No operand: compare truthiness against "set".
                return operator.compare(current.is_truthy() as i32 as f64, 1.0);
            };
            match (current.as_number(), expected.as_number()) {
                (Some(lhs), Some(rhs)) => operator.compare(lhs, rhs),
                _ => match operator {
                    Comparator::Eq => current == *expected,
                    Comparator::Ne => current != *expected,
                    _ => false,
                },
            }
        }
    }
}
