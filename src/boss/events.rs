//! Encounter event log
//!
//! A flat record of what happened during a fight, drained by the caller each
//! frame. Serializable so a run can be dumped as JSON lines.

use serde::Serialize;

use crate::collab::LootDrop;
use crate::pools::SubEntityKind;

/// Something that happened during an encounter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EncounterEvent {
    PhaseEntered { at: f32, from: &'static str, to: &'static str },
    BossDamaged { at: f32, amount: f32, health: f32 },
    BossHealed { at: f32, amount: f32, health: f32 },
    /// A hit landed while the flash window was already running
    HitSuppressed { at: f32 },
    Spawned { at: f32, kind: SubEntityKind },
    Removed { at: f32, kind: SubEntityKind },
    PlayerHit { at: f32, amount: f32, source: &'static str },
    LootDropped { at: f32, drop: LootDrop },
    Finished { at: f32 },
}

/// Events recorded since the last drain
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EncounterEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EncounterEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EncounterEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncounterEvent> {
        self.events.iter()
    }

    pub fn count(&self, matches: impl Fn(&EncounterEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.push(EncounterEvent::Finished { at: 1.0 });
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let event = EncounterEvent::PhaseEntered { at: 0.5, from: "inactive", to: "tentacles" };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"phase_entered\""));
        assert!(json.contains("\"to\":\"tentacles\""));
    }
}
