//! Session State Machine
//!
//! ```text
//! Created
//!   ↓ registered
//! Active
//!   ↓ unloaded
//! Removed
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Decoded and initialized, not yet visible in the registry
    Created,
    /// Registered; the only state that accepts extraction
    Active,
    /// Unloaded. Terminal.
    Removed,
}

impl SessionState {
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Created, SessionState::Active)
                | (SessionState::Active, SessionState::Removed)
        )
    }

    pub fn accepts_extraction(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Created => "created",
            SessionState::Active => "active",
            SessionState::Removed => "removed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(SessionState::Created),
            "active" => Ok(SessionState::Active),
            "removed" => Ok(SessionState::Removed),
            _ => Err(format!("Unknown session state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(SessionState::Created.can_transition_to(SessionState::Active));
        assert!(SessionState::Active.can_transition_to(SessionState::Removed));
    }

    #[test]
    fn test_removed_is_terminal() {
        assert!(!SessionState::Removed.can_transition_to(SessionState::Active));
        assert!(!SessionState::Removed.can_transition_to(SessionState::Created));
        assert!(!SessionState::Removed.can_transition_to(SessionState::Removed));
    }

    #[test]
    fn test_no_shortcuts() {
        assert!(!SessionState::Created.can_transition_to(SessionState::Removed));
        assert!(!SessionState::Active.can_transition_to(SessionState::Created));
        assert!(!SessionState::Active.can_transition_to(SessionState::Active));
    }

    #[test]
    fn test_only_active_accepts_extraction() {
        assert!(SessionState::Active.accepts_extraction());
        assert!(!SessionState::Created.accepts_extraction());
        assert!(!SessionState::Removed.accepts_extraction());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Active".parse::<SessionState>(), Ok(SessionState::Active));
        assert!("paused".parse::<SessionState>().is_err());
    }
}
