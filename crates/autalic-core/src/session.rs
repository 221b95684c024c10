//! Keyed conversation sessions.
//!
//! Replaces a single process-wide history list with an explicit store keyed
//! by a caller-supplied session id, so concurrent users no longer interleave
//! turns. Histories are append-only within a turn and cleared wholesale on
//! reset; the system prompt is never stored here.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core_types::Message;
use crate::errors::AgentError;

/// Session id used when the caller does not supply one.
pub const DEFAULT_SESSION: &str = "default";

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, session_id: &str, message: Message) -> Result<(), AgentError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AgentError::InternalError("session store lock poisoned".to_string()))?;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    /// Cloned snapshot of a session's history; unknown sessions are empty.
    pub fn history(&self, session_id: &str) -> Result<Vec<Message>, AgentError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AgentError::InternalError("session store lock poisoned".to_string()))?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    pub fn reset(&self, session_id: &str) -> Result<(), AgentError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AgentError::InternalError("session store lock poisoned".to_string()))?;
        sessions.remove(session_id);
        Ok(())
    }
}
