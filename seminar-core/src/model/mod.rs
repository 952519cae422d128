//! Typed records stored in the local mirror and exchanged with the backend.

mod attendance;
mod evaluation;
mod participant;
mod seminar;

pub use attendance::{AttendanceMark, AttendanceRecord};
pub use evaluation::{Answers, Evaluation, EvaluationPayload};
pub use participant::{JoinPayload, JoinedParticipant, Registration};
pub use seminar::{Seminar, SeminarDraft};

/// Deserializers that accept the loose shapes older mirrors and form
/// submissions contain (numbers as strings, empty strings as null).
pub(crate) mod lenient {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::schedule::Semester;

    /// Integer prefix of `s` after leading whitespace and an optional sign:
    /// `"2.5"` is 2 and `"30 seats"` is 30. `None` when there are no digits.
    pub fn leading_int(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let (sign, rest) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s.strip_prefix('+').unwrap_or(s)),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        rest[..digits].parse::<i64>().ok().map(|n| sign * n)
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Some(Value::String(s)) => leading_int(&s),
            _ => None,
        })
    }

    /// `YYYY-MM-DD` or RFC 3339. Anything else reads as no date.
    pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(Value::String(s)) = Option::<Value>::deserialize(d)? else {
            return Ok(None);
        };
        let s = s.trim();
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())))
    }

    pub fn opt_semester<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Semester>, D::Error> {
        Ok(opt_int(d)?
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| Semester::try_from(n).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Semester;

    #[test]
    fn test_lenient_seminar_fields() {
        let seminar: Seminar = serde_json::from_str(
            r#"{"id": 4, "title": "Rust", "duration": "2", "participants": "30",
                "date": "2025-12-03", "semester": "2"}"#,
        )
        .unwrap();

        assert_eq!(seminar.duration, Some(2));
        assert_eq!(seminar.capacity, Some(30));
        assert_eq!(seminar.semester, Some(Semester::Second));
        assert_eq!(seminar.date.unwrap().to_string(), "2025-12-03");
    }

    #[test]
    fn test_empty_strings_become_none() {
        let seminar: Seminar =
            serde_json::from_str(r#"{"title": "Rust", "duration": "", "date": ""}"#).unwrap();
        assert_eq!(seminar.duration, None);
        assert_eq!(seminar.date, None);
        assert_eq!(seminar.id, None);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(lenient::leading_int("2.5"), Some(2));
        assert_eq!(lenient::leading_int(" 30 seats"), Some(30));
        assert_eq!(lenient::leading_int("-4"), Some(-4));
        assert_eq!(lenient::leading_int("+7h"), Some(7));
        assert_eq!(lenient::leading_int("seats 30"), None);
        assert_eq!(lenient::leading_int("-"), None);
        assert_eq!(lenient::leading_int(""), None);
    }

    #[test]
    fn test_unparseable_date_reads_as_none() {
        let seminar: Seminar =
            serde_json::from_str(r#"{"title": "Rust", "date": "03/20/2025"}"#).unwrap();
        assert_eq!(seminar.date, None);

        let seminar: Seminar =
            serde_json::from_str(r#"{"title": "Rust", "date": "2025-03-20T09:00:00Z"}"#).unwrap();
        assert_eq!(seminar.date.unwrap().to_string(), "2025-03-20");
    }
}
