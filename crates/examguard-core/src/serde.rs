use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Treats empty or whitespace-only strings as absent.
///
/// HTML forms submit untouched inputs as `""`; those should not overwrite
/// stored values or fail validation.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Parses a client-supplied date, accepting either RFC 3339 timestamps or
/// plain `YYYY-MM-DD` dates (interpreted as midnight UTC).
pub fn parse_flexible_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Serde adapter around [`parse_flexible_date`] for optional date fields.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_flexible_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        name: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        due: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_flexible_date("2025-03-14").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 3, 14));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_flexible_date("2025-03-14T10:30:00+01:00").unwrap();
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_flexible_date("next tuesday").is_none());
        assert!(parse_flexible_date("").is_none());
    }

    #[test]
    fn test_empty_strings_become_none() {
        let form: Form = serde_json::from_str(r#"{"name":"  ","due":""}"#).unwrap();
        assert!(form.name.is_none());
        assert!(form.due.is_none());
    }

    #[test]
    fn test_values_are_trimmed() {
        let form: Form = serde_json::from_str(r#"{"name":" Ada ","due":"2025-01-02"}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("Ada"));
        assert!(form.due.is_some());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result: Result<Form, _> = serde_json::from_str(r#"{"due":"soon"}"#);
        assert!(result.is_err());
    }
}
