use thiserror::Error;

use crate::models::ChangeDirection;

/// Raised when authored data breaks one of the view-model invariants.
/// Values are rejected at construction; nothing here is ever rendered with a fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    #[error("unknown interview status `{0}` (expected scheduled, completed or cancelled)")]
    UnknownStatus(String),
    #[error("stat `{name}` has change {magnitude} but direction {direction:?}")]
    DirectionMismatch {
        name: String,
        magnitude: f64,
        direction: ChangeDirection,
    },
    #[error("unknown change direction `{0}` (expected positive or negative)")]
    UnknownDirection(String),
    #[error("stat `{0}` has a non-finite change magnitude")]
    NonFiniteChange(String),
    #[error("interview {id} has unparseable scheduled time `{value}`")]
    InvalidTimestamp { id: i64, value: String },
    #[error("interview id {0} appears more than once")]
    DuplicateInterviewId(i64),
    #[error("interview id {id} is already stored under source key `{existing}`")]
    InterviewIdTaken { id: i64, existing: String },
    #[error("quick action `{0}` appears more than once")]
    DuplicateAction(String),
    #[error("chart point `{index}` has fields {found:?}, series expects {expected:?}")]
    SeriesShape {
        index: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("chart point `{index}` has invalid value {value} for `{field}`")]
    InvalidChartValue {
        index: String,
        field: String,
        value: f64,
    },
    #[error("unknown icon `{0}`")]
    UnknownIcon(String),
    #[error("no view registered for path `{0}`")]
    UnknownRoute(String),
}
