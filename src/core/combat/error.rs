//! Combat error types.

use thiserror::Error;

/// Result type for combat operations.
pub type Result<T> = std::result::Result<T, CombatError>;

/// Broad failure classes. Every class leaves state unchanged and is shown
/// to the user as a transient message; none is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input or a missing required field.
    Validation,
    /// Unknown participant, monster or action.
    Lookup,
    /// Fetch failure or unreadable response.
    Network,
    /// The operation is not allowed in the current combat state.
    Precondition,
}

/// Errors that can occur while managing an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("Participant is missing an id")]
    MissingId,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Participant with id {0} already exists")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("{0} is not a monster")]
    NotAMonster(String),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Monster index must not be empty")]
    EmptyMonsterKey,

    #[error("Hit points {current} exceed maximum {max}")]
    HitPointsOutOfRange { current: u32, max: u32 },

    #[error("Action not available")]
    ActionNotAvailable { monster: String, action_index: usize },

    #[error("No targets available")]
    NoTargets,

    #[error("Add at least one PC and one monster to start combat ({count} participant(s) so far)")]
    NotEnoughParticipants { count: usize },

    #[error("Combat has not started")]
    CombatNotStarted,
}

impl CombatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingId
            | Self::EmptyName
            | Self::DuplicateParticipant(_)
            | Self::InvalidAmount(_)
            | Self::EmptyMonsterKey
            | Self::HitPointsOutOfRange { .. } => ErrorCategory::Validation,
            Self::ParticipantNotFound(_)
            | Self::NotAMonster(_)
            | Self::ActionNotAvailable { .. }
            | Self::NoTargets => ErrorCategory::Lookup,
            Self::NotEnoughParticipants { .. } | Self::CombatNotStarted => {
                ErrorCategory::Precondition
            }
        }
    }
}
