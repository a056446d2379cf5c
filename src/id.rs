use serde::{Deserialize, Serialize};

/// Hands out NPC ids for one life. An id is never reissued, not even after
/// its NPC dies, so history entries and plots can keep pointing at it.
///
/// Serialized as the bare next id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcIds(u64);

impl NpcIds {
    const FIRST: u64 = 1;

    pub fn new() -> Self {
        Self(Self::FIRST)
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }

    /// The id the next NPC will get.
    pub fn peek(&self) -> u64 {
        self.0
    }

    /// Skip past an id already in use, e.g. one read from an old save.
    pub fn bump_past(&mut self, seen: u64) {
        self.0 = self.0.max(seen + 1);
    }
}

impl Default for NpcIds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_never_repeat() {
        let mut ids = NpcIds::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn bump_only_moves_forward() {
        let mut ids = NpcIds::new();
        ids.bump_past(41);
        assert_eq!(ids.next_id(), 42);
        ids.bump_past(10);
        assert_eq!(ids.next_id(), 43);
    }

    #[test]
    fn saves_as_a_plain_number() {
        let mut ids = NpcIds::new();
        ids.bump_past(6);
        assert_eq!(serde_json::to_string(&ids).unwrap(), "7");
        assert_eq!(serde_json::from_str::<NpcIds>("7").unwrap(), ids);
    }
}
