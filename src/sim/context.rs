use rand::RngCore;

use super::registry::Registries;
use super::signal::{Signal, SignalKind};
use crate::model::{HistoryCategory, StatKind, WorldState};
use crate::rng;

/// Everything a stage or action needs: the state it mutates, the read-only
/// catalogs, the injected random source and the outgoing signal buffer.
///
/// Bundled so we can add fields later without touching every signature.
pub struct TickContext<'a> {
    pub state: &'a mut WorldState,
    pub registries: &'a Registries,
    pub rng: &'a mut dyn RngCore,
    pub signals: &'a mut Vec<Signal>,
}

impl TickContext<'_> {
    pub fn emit(&mut self, kind: SignalKind) {
        self.signals.push(Signal {
            year: self.state.year,
            kind,
        });
    }

    /// Uniform draw in [0, 1).
    pub fn roll(&mut self) -> f64 {
        rng::roll(self.rng)
    }

    /// Add to a stat (clamped) and emit `stat_changed` if it moved.
    pub fn adjust_stat(&mut self, stat: StatKind, delta: i32) -> i32 {
        let old = self.state.stats.get(stat);
        let new = self.state.stats.add(stat, delta);
        if new != old {
            self.emit(SignalKind::StatChanged { stat, old, new });
        }
        new
    }

    pub fn set_stat(&mut self, stat: StatKind, value: i32) -> i32 {
        let old = self.state.stats.get(stat);
        let new = self.state.stats.set(stat, value);
        if new != old {
            self.emit(SignalKind::StatChanged { stat, old, new });
        }
        new
    }

    pub fn log(&mut self, category: HistoryCategory, text: impl Into<String>) {
        self.state.log(category, text);
    }

    /// Kill the player and emit `death`. No-op if already dead.
    pub fn kill_player(&mut self, cause: &str) {
        if self.state.die(cause) {
            self.emit(SignalKind::Death {
                cause: cause.to_string(),
            });
        }
    }
}
