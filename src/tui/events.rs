use crate::core::bestiary::{MonsterDetail, MonsterSummary};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Background fetch of the monster list finished.
    MonsterListLoaded(Result<Vec<MonsterSummary>, String>),
    /// Background fetch of one stat block finished. `count` is how many
    /// copies the pending add-monster form asked for.
    MonsterDetailLoaded {
        index: String,
        count: usize,
        result: Result<MonsterDetail, String>,
    },
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
