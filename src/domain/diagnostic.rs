use serde::Serialize;
use thiserror::Error;

/// Advisory conditions raised while parsing a listing page. None of these stop
/// a document from being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("block status {status:?} is not OPEN or CLOSED")]
    NotACourseRow { status: String },

    #[error("crn cell is missing")]
    MissingCrn,

    #[error("crn {raw:?} is not a number")]
    InvalidCrn { raw: String },

    #[error("course number in subject {raw:?} is not a number")]
    NonNumericCourseId { raw: String },

    #[error("{day_times} day/time groups but {locations} location groups")]
    GroupCountMismatch { day_times: usize, locations: usize },

    #[error("date range {raw:?} split into {parts} parts, expected 2")]
    MalformedDateRange { raw: String, parts: usize },
}

impl Diagnostic {
    /// Warnings worth surfacing in logs. Field-level misses and non-course
    /// blocks stay at debug level.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            Diagnostic::MissingCrn
                | Diagnostic::InvalidCrn { .. }
                | Diagnostic::GroupCountMismatch { .. }
                | Diagnostic::MalformedDateRange { .. }
        )
    }
}

/// Result of a field normalizer: either the field parsed cleanly, or a default
/// was substituted and the reason is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<T> {
    Clean(T),
    Defaulted { value: T, reason: Diagnostic },
}

impl<T> Normalized<T> {
    pub fn is_clean(&self) -> bool {
        matches!(self, Normalized::Clean(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Normalized::Clean(value) | Normalized::Defaulted { value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&Diagnostic> {
        match self {
            Normalized::Clean(_) => None,
            Normalized::Defaulted { reason, .. } => Some(reason),
        }
    }

    pub fn into_parts(self) -> (T, Option<Diagnostic>) {
        match self {
            Normalized::Clean(value) => (value, None),
            Normalized::Defaulted { value, reason } => (value, Some(reason)),
        }
    }
}
