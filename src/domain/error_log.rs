//! Entries of the back-office error log.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{ErrorContext, ErrorLogId, UserId};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ErrorLogEntry {
    pub id: ErrorLogId,
    pub context: ErrorContext,
    pub message: String,
    pub user_id: Option<UserId>,
    pub path: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewErrorLogEntry {
    pub context: ErrorContext,
    pub message: String,
    pub user_id: Option<UserId>,
    pub path: Option<String>,
}

impl NewErrorLogEntry {
    /// Longest message kept; the rest is cut at a character boundary.
    pub const MAX_MESSAGE_LEN: usize = 2000;

    pub fn new(
        context: ErrorContext,
        message: impl Into<String>,
        user_id: Option<UserId>,
        path: Option<String>,
    ) -> Self {
        let mut message = message.into();
        if message.len() > Self::MAX_MESSAGE_LEN {
            let mut cut = Self::MAX_MESSAGE_LEN;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        Self {
            context,
            message,
            user_id,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_messages_are_truncated_on_char_boundary() {
        let message = "é".repeat(NewErrorLogEntry::MAX_MESSAGE_LEN);
        let entry = NewErrorLogEntry::new(
            ErrorContext::new("test").unwrap(),
            message,
            None,
            None,
        );
        assert!(entry.message.len() <= NewErrorLogEntry::MAX_MESSAGE_LEN);
        assert!(entry.message.chars().all(|c| c == 'é'));
    }
}
