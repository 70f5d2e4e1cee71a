// Domain-level errors for arena workflows.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    // Malformed or impossible action parameters, rejected at submission.
    Validation(String),
    // Caller lacks the admin capability for the requested operation.
    Authorization,
    NotFound { entity: &'static str, id: String },
    // Round is resolving or already closed; retry next round.
    Concurrency(String),
    // A state-store read or batch write failed.
    FatalStore(String),
}

impl ArenaError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ArenaError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::Validation(reason) => write!(f, "invalid action: {reason}"),
            ArenaError::Authorization => write!(f, "admin capability required"),
            ArenaError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            ArenaError::Concurrency(reason) => write!(f, "round unavailable: {reason}"),
            ArenaError::FatalStore(reason) => write!(f, "state store failure: {reason}"),
        }
    }
}

impl std::error::Error for ArenaError {}
