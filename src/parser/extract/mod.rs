pub mod company;
pub mod job;
pub mod links;

use serde::Serialize;
use thiserror::Error;

/// Something the transformer could not find or could not normalize. None of
/// these stop a record from being produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    #[error("field `{field}` not found")]
    MissingField { field: &'static str },

    #[error("{field} value `{raw}` kept as written")]
    Unparsed { field: &'static str, raw: String },

    #[error("record incomplete, missing: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

/// A record plus the notices raised while building it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction<R> {
    pub record: R,
    pub notices: Vec<Notice>,
}

impl<R> Extraction<R> {
    pub fn is_complete(&self) -> bool {
        !self
            .notices
            .iter()
            .any(|n| matches!(n, Notice::Incomplete { .. }))
    }

    pub fn into_record(self) -> R {
        self.record
    }
}

/// Collects notices while a record is assembled.
#[derive(Debug, Default)]
pub(crate) struct Notices(Vec<Notice>);

impl Notices {
    /// Pass `value` through, noting a miss when it is `None`.
    pub fn track<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            tracing::debug!(field, "field not found");
            self.0.push(Notice::MissingField { field });
        }
        value
    }

    pub fn push(&mut self, notice: Notice) {
        self.0.push(notice);
    }

    pub fn into_vec(self) -> Vec<Notice> {
        self.0
    }
}
