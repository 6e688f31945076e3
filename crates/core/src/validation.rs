//! Field-level validation for task creation requests.
//!
//! Each parser returns either the typed value or a [`FieldError`] naming the
//! offending field. Callers collect every error before responding so a
//! client sees all problems at once.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::task::TaskType;
use crate::types::{DbId, Timestamp};

pub const FIELD_APPLICATION_ID: &str = "application_id";
pub const FIELD_TASK_TYPE: &str = "task_type";
pub const FIELD_DUE_AT: &str = "due_at";
pub const FIELD_BODY: &str = "body";

pub const MSG_APPLICATION_NOT_FOUND: &str = "Application not found";

/// A single validation failure tied to a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of field errors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Record the error side of `result` and hand back the success value.
    pub fn take<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, FieldError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FieldError::new(field, format!("{field} is required"))),
    }
}

/// Syntactic check only; existence is checked against storage by the caller.
pub fn parse_application_id(value: Option<&str>) -> Result<DbId, FieldError> {
    let raw = required(FIELD_APPLICATION_ID, value)?;
    raw.parse::<DbId>().map_err(|_| {
        FieldError::new(
            FIELD_APPLICATION_ID,
            format!("{FIELD_APPLICATION_ID} must be a valid UUID"),
        )
    })
}

pub fn parse_task_type(value: Option<&str>) -> Result<TaskType, FieldError> {
    let raw = required(FIELD_TASK_TYPE, value)?;
    raw.parse::<TaskType>().map_err(|_| {
        let allowed: Vec<&str> = TaskType::ALL.iter().map(|t| t.as_str()).collect();
        FieldError::new(
            FIELD_TASK_TYPE,
            format!("{FIELD_TASK_TYPE} must be one of: {}", allowed.join(", ")),
        )
    })
}

/// Parse an ISO-8601 instant and require it to lie strictly after `now`.
///
/// Offsets are honoured; a timestamp without an offset is read as UTC.
pub fn parse_due_at(value: Option<&str>, now: Timestamp) -> Result<Timestamp, FieldError> {
    let raw = required(FIELD_DUE_AT, value)?;
    let due_at = parse_instant(raw).ok_or_else(|| {
        FieldError::new(
            FIELD_DUE_AT,
            format!("{FIELD_DUE_AT} must be a valid ISO-8601 timestamp"),
        )
    })?;
    if due_at <= now {
        return Err(FieldError::new(
            FIELD_DUE_AT,
            format!("{FIELD_DUE_AT} must be in the future"),
        ));
    }
    Ok(due_at)
}

fn parse_instant(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Use the supplied title if it has content, otherwise derive one from the type.
pub fn resolve_title(title: Option<&str>, task_type: TaskType) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => task_type.default_title().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn application_id_must_be_present_and_a_uuid() {
        assert_matches!(
            parse_application_id(None),
            Err(FieldError { ref field, ref message })
                if field == FIELD_APPLICATION_ID && message == "application_id is required"
        );
        assert_matches!(
            parse_application_id(Some("not-a-uuid")),
            Err(FieldError { ref message, .. }) if message.contains("valid UUID")
        );
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_application_id(Some(id.to_string().as_str())), Ok(id));
    }

    #[test]
    fn invalid_task_type_names_the_allowed_values() {
        let err = parse_task_type(Some("invalid")).unwrap_err();
        assert_eq!(err.field, FIELD_TASK_TYPE);
        assert_eq!(err.message, "task_type must be one of: call, email, review");
    }

    #[test]
    fn due_at_accepts_offsets_and_fractional_seconds() {
        let parsed = parse_due_at(Some("2026-03-10T14:00:00.000Z"), now()).unwrap();
        assert_eq!(parsed, now() + Duration::hours(2));

        let offset = parse_due_at(Some("2026-03-10T15:00:00+02:00"), now()).unwrap();
        assert_eq!(offset, now() + Duration::hours(1));

        let naive = parse_due_at(Some("2026-03-10T13:30"), now()).unwrap();
        assert_eq!(naive, now() + Duration::minutes(90));
    }

    #[test]
    fn due_at_must_be_strictly_in_the_future() {
        let past = parse_due_at(Some("2026-03-10T11:00:00Z"), now()).unwrap_err();
        assert_eq!(past.message, "due_at must be in the future");

        let exactly_now = parse_due_at(Some("2026-03-10T12:00:00Z"), now()).unwrap_err();
        assert_eq!(exactly_now.field, FIELD_DUE_AT);
    }

    #[test]
    fn garbage_due_at_is_a_format_error() {
        let err = parse_due_at(Some("next tuesday"), now()).unwrap_err();
        assert_eq!(err.message, "due_at must be a valid ISO-8601 timestamp");
    }

    #[test]
    fn errors_are_collected_in_order() {
        let mut errors = FieldErrors::default();
        let id = errors.take(parse_application_id(Some("x")));
        let task_type = errors.take(parse_task_type(Some("fax")));
        let due_at = errors.take(parse_due_at(None, now()));

        assert!(id.is_none() && task_type.is_none() && due_at.is_none());
        let fields: Vec<String> = errors.into_vec().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["application_id", "task_type", "due_at"]);
    }

    #[test]
    fn blank_title_falls_back_to_type_default() {
        assert_eq!(resolve_title(None, TaskType::Call), "Call follow-up");
        assert_eq!(resolve_title(Some("   "), TaskType::Review), "Application review");
        assert_eq!(resolve_title(Some("Ring back"), TaskType::Call), "Ring back");
    }
}
