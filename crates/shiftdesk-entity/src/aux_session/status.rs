//! AUX work-status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared work status for an AUX session.
///
/// The set is closed; transitions between statuses are unconstrained.
/// Only `WorkingOnProject` counts toward the productivity percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "aux_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuxStatus {
    /// Available for incoming work.
    Ready,
    /// Actively working on a project task.
    WorkingOnProject,
    /// Personal time.
    Personal,
    /// On break.
    Break,
}

impl AuxStatus {
    /// Whether time in this status counts as productive.
    pub fn is_productive(&self) -> bool {
        matches!(self, Self::WorkingOnProject)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::WorkingOnProject => "working_on_project",
            Self::Personal => "personal",
            Self::Break => "break",
        }
    }
}

impl fmt::Display for AuxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuxStatus {
    type Err = shiftdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ready" => Ok(Self::Ready),
            "working_on_project" => Ok(Self::WorkingOnProject),
            "personal" => Ok(Self::Personal),
            "break" => Ok(Self::Break),
            _ => Err(shiftdesk_core::AppError::validation(format!(
                "Invalid AUX status: '{s}'. Expected one of: ready, working_on_project, personal, break"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftdesk_core::error::ErrorKind;

    #[test]
    fn test_round_trips_through_str() {
        for status in [
            AuxStatus::Ready,
            AuxStatus::WorkingOnProject,
            AuxStatus::Personal,
            AuxStatus::Break,
        ] {
            let parsed: AuxStatus = status.as_str().parse().expect("should parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_value_is_a_validation_error() {
        let err = "lunch".parse::<AuxStatus>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_only_project_work_is_productive() {
        assert!(AuxStatus::WorkingOnProject.is_productive());
        assert!(!AuxStatus::Ready.is_productive());
        assert!(!AuxStatus::Personal.is_productive());
        assert!(!AuxStatus::Break.is_productive());
    }
}
