use serde_json::Value;
use std::borrow::Cow;
use strum::{Display, EnumString};

/// Review status codes reported by the homework API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict sent to the chat.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Borrowed view over one record of the `homeworks` array.
///
/// Absent and `null` fields read as `None`; any other JSON value is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Homework<'a> {
    pub homework_name: Option<&'a Value>,
    pub status: Option<&'a Value>,
}

impl<'a> Homework<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        let field = move |key: &str| value.get(key).filter(|v| !v.is_null());
        Self {
            homework_name: field("homework_name"),
            status: field("status"),
        }
    }
}

/// Text of a field: strings as-is, anything else as its JSON rendering.
pub fn field_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}
