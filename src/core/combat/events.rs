//! Combat log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEventKind {
    CombatStarted,
    TurnStarted,
    TurnSkipped,
    Stalled,
    Attack,
    Action,
    Damage,
    Healing,
    Defeated,
    Joined,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEvent {
    pub round: u32,
    /// Cumulative turn count when the event was recorded.
    pub turn: u32,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub kind: CombatEventKind,
    pub description: String,
}

/// Append-only event list.
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        round: u32,
        turn: u32,
        actor: impl Into<String>,
        kind: CombatEventKind,
        description: impl Into<String>,
    ) {
        self.events.push(CombatEvent {
            round,
            turn,
            timestamp: Utc::now(),
            actor: actor.into(),
            kind,
            description: description.into(),
        });
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Most recent `n` events, oldest first.
    pub fn recent(&self, n: usize) -> &[CombatEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
