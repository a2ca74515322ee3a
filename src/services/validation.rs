use serde_json::Value;

/// Field of the API response holding the tracked homework records.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Check the API response shape and return the homework records.
///
/// Checks run in order: the payload is an object, it has a `homeworks` key,
/// that key holds an array, and the array is not empty. An empty list is a
/// failure, not "nothing to report".
pub fn check_response(response: &Value) -> Result<&[Value], ValidationError> {
    let result = shape(response);
    if let Err(err) = &result {
        tracing::error!(reason = %err.reason, "Homework API response failed validation");
    }
    result
}

fn shape(response: &Value) -> Result<&[Value], ValidationError> {
    let object = response
        .as_object()
        .ok_or(ValidationError::new(InvalidShape::NotAnObject))?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or(ValidationError::new(InvalidShape::MissingHomeworks))?;

    let homeworks = homeworks
        .as_array()
        .ok_or(ValidationError::new(InvalidShape::HomeworksNotAList))?;

    if homeworks.is_empty() {
        return Err(ValidationError::new(InvalidShape::EmptyHomeworks));
    }

    Ok(homeworks.as_slice())
}

/// The API response does not have the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("Unexpected homework API response: {reason}")]
pub struct ValidationError {
    pub reason: InvalidShape,
}

impl ValidationError {
    fn new(reason: InvalidShape) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidShape {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("no `homeworks` key")]
    MissingHomeworks,

    #[error("`homeworks` is not a list")]
    HomeworksNotAList,

    #[error("`homeworks` list is empty")]
    EmptyHomeworks,
}
