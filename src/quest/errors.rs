use thiserror::Error;

/// Errors that can arise in the quest engine's storage layer and admin
/// surface. Player-driven paths (events, turn-in) never surface these;
/// they degrade to logged warnings per the best-effort persistence rules.
#[derive(Debug, Error)]
pub enum QuestError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Admin referenced an objective slot the current quest does not have.
    #[error("objective index {index} out of range for {period} quest")]
    ObjectiveIndexOutOfRange { period: &'static str, index: usize },
}
