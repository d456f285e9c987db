//! Error kinds
//!
//! Player-facing conditions (`InvalidCastTarget`, `DoubleCastAttempt`,
//! `StaleTimerFire`) are absorbed by the state machine. `UnknownFishKind`
//! indicates a catalog/ledger mismatch and is treated as a defect.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FishingError {
    #[error("cast ray does not hit the water")]
    InvalidCastTarget,
    #[error("a cast is already in flight")]
    DoubleCastAttempt,
    #[error("unknown fish kind: {0}")]
    UnknownFishKind(String),
    #[error("timer fired after it was cancelled or replaced")]
    StaleTimerFire,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
