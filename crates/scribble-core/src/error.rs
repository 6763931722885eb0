use thiserror::Error;

use crate::scribble::ScribbleId;
use crate::session::SessionId;

pub type Result<T> = std::result::Result<T, ScribbleError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScribbleError {
    /// No session holds an item with this id. The caller asked to act on a
    /// gesture that is not live.
    #[error("scribble with id {id} not found")]
    NotFound { id: ScribbleId },

    #[error("{session} not found")]
    SessionNotFound { session: SessionId },
}

impl ScribbleError {
    #[must_use]
    pub fn not_found(id: ScribbleId) -> Self {
        Self::NotFound { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_id() {
        let error = ScribbleError::not_found(ScribbleId::new(9));
        assert_eq!(
            error,
            ScribbleError::NotFound {
                id: ScribbleId::new(9)
            }
        );
        assert_eq!(error.to_string(), "scribble with id scribble:9 not found");
    }

    #[test]
    fn session_not_found_message() {
        let error = ScribbleError::SessionNotFound {
            session: SessionId::new(3),
        };
        assert_eq!(error.to_string(), "session:3 not found");
    }
}
