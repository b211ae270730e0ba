use ulid::Ulid;

/// Every variant is a recoverable, caller-visible outcome. Storage-layer
/// failures surface only as `Wal`.
#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    AlreadyExists(Ulid),
    /// The stay overlaps an existing booking; carries the blocking
    /// booking's id.
    AlreadyBooked(Ulid),
    /// An entity invariant failed; nothing was persisted.
    Validation {
        field: &'static str,
        reason: String,
    },
    /// A filter criterion could not be coerced to its expected type.
    BadFilter {
        criterion: &'static str,
        value: String,
    },
    LimitExceeded(&'static str),
    Wal(String),
}

impl EngineError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn bad_filter(criterion: &'static str, value: impl Into<String>) -> Self {
        EngineError::BadFilter {
            criterion,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::AlreadyBooked(id) => {
                write!(f, "stay overlaps existing booking: {id}")
            }
            EngineError::Validation { field, reason } => {
                write!(f, "validation failed on {field}: {reason}")
            }
            EngineError::BadFilter { criterion, value } => {
                write!(f, "bad filter value for {criterion}: {value:?}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Wal(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
