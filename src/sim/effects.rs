use super::context::TickContext;
use crate::model::content::{Effect, FlagOp, NumericOp, PoliticalField, PoliticalOp};
use crate::model::{FlagValue, PoliticsState};

fn numeric(op: NumericOp, current: f64, value: f64) -> f64 {
    match op {
        NumericOp::Add => current + value,
        NumericOp::Set => value,
        NumericOp::Multiply => current * value,
    }
}

/// Apply one effect. Effects never fail; malformed ones are logged and skipped.
pub fn apply_effect(ctx: &mut TickContext, effect: &Effect) {
    match effect {
        Effect::Stat {
            target,
            operator,
            value,
        } => {
            let current = ctx.state.stats.get(*target) as f64;
            let next = numeric(*operator, current, *value).round() as i32;
            ctx.set_stat(*target, next);
        }
        Effect::Flag {
            target,
            operator,
            value,
        } => match operator {
            FlagOp::Set => {
                let value = value.clone().unwrap_or(FlagValue::Bool(true));
                ctx.state.flags.set(target, value);
            }
            FlagOp::Clear => ctx.state.flags.clear(target),
            FlagOp::Toggle => ctx.state.flags.toggle(target),
        },
        Effect::Money { operator, value } => {
            let cash = &mut ctx.state.finances.cash;
            *cash = numeric(*operator, *cash as f64, *value).round() as i64;
        }
        Effect::Death { cause } => {
            let cause = cause.as_deref().unwrap_or("Unknown causes");
            ctx.kill_player(cause);
        }
        Effect::Political {
            target,
            operator,
            value,
        } => apply_political(&mut ctx.state.politics, *target, *operator, value),
        Effect::Unknown => {
            tracing::warn!("unknown effect type, skipping");
        }
    }
}

/// Apply effects in order. There is no rollback: an effect that kills the
/// player does not undo the ones before it.
pub fn apply_effects(ctx: &mut TickContext, effects: &[Effect]) {
    for effect in effects {
        apply_effect(ctx, effect);
    }
}

fn apply_political(
    politics: &mut PoliticsState,
    field: PoliticalField,
    op: PoliticalOp,
    value: &FlagValue,
) {
    let list = match field {
        PoliticalField::EnactedPolicies => Some(&mut politics.enacted_policies),
        PoliticalField::Scandals => Some(&mut politics.scandals),
        _ => None,
    };
    if let Some(list) = list {
        let FlagValue::Text(item) = value else {
            tracing::warn!(?field, ?value, "political list effect needs a text value");
            return;
        };
        if !list.contains(item) {
            list.push(item.clone());
        }
        return;
    }

    let slot = match field {
        PoliticalField::Approval => &mut politics.approval,
        PoliticalField::Corruption => &mut politics.corruption,
        PoliticalField::MediaControl => &mut politics.media_control,
        PoliticalField::OppositionStrength => &mut politics.opposition_strength,
        PoliticalField::MilitaryControl => &mut politics.military_control,
        PoliticalField::AuthoritarianScore => &mut politics.authoritarian_score,
        PoliticalField::PartySupport => &mut politics.party_support,
        _ => {
            tracing::warn!(?field, "unknown political field, skipping");
            return;
        }
    };
    let Some(amount) = value.as_number() else {
        tracing::warn!(?field, ?value, "political effect needs a numeric value");
        return;
    };
    let next = match op {
        PoliticalOp::Add => *slot + amount,
        PoliticalOp::Set => amount,
        PoliticalOp::Multiply => *slot * amount,
        PoliticalOp::Append => {
            tracing::warn!(?field, "append is only valid for list fields");
            return;
        }
    };
    *slot = next.clamp(0.0, 100.0);
}
