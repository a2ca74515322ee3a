use serde_json::Value;
use std::str::FromStr;

use crate::models::homework::{field_text, Homework, HomeworkStatus};

/// Build the chat message for one homework record.
///
/// Both `homework_name` and `status` must be present and non-null; that is
/// checked before the status code, so a record lacking either never reports
/// [`StatusError::UnknownStatus`]. A non-string status is an unknown code.
pub fn parse_status(record: &Value) -> Result<String, StatusError> {
    let homework = Homework::from_value(record);

    let (name, code) = match (homework.homework_name, homework.status) {
        (Some(name), Some(code)) => (field_text(name), field_text(code)),
        (name, code) => {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push("homework_name");
            }
            if code.is_none() {
                missing.push("status");
            }
            tracing::error!(missing = ?missing, "Homework record is missing keys");
            return Err(StatusError::MissingKey(missing));
        }
    };

    match HomeworkStatus::from_str(&code) {
        Ok(status) => {
            tracing::debug!(homework = %name, status = %status, "Homework status recognized");
            Ok(format!(
                "Изменился статус проверки работы \"{}\". {}",
                name,
                status.verdict()
            ))
        }
        Err(_) => {
            tracing::error!(status = %code, homework = %name, "Unexpected homework status in API response");
            Err(StatusError::UnknownStatus(code.into_owned()))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("Homework record is missing keys: {}", .0.join(", "))]
    MissingKey(Vec<&'static str>),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),
}
