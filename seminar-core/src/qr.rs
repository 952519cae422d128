//! Check-in payloads carried by attendance QR codes.

use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use url::Url;

use crate::error::{DeskError, DeskResult};
use crate::id::RecordId;

/// Who is checking in to which seminar.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPayload {
    pub seminar_id: RecordId,
    pub participant_email: String,
}

#[derive(Deserialize)]
struct RawPayload {
    seminar_id: Option<RecordId>,
    participant_email: Option<String>,
}

impl QrPayload {
    /// Decode a scanned payload.
    ///
    /// Accepted shapes:
    /// - URL-encoded JSON: `{"seminar_id": 5, "participant_email": "a@b.c"}`
    /// - pipe-separated: `5|a@b.c`
    /// - either of the above behind a leading `#`
    /// - a full link carrying the data in its fragment or `data` query parameter
    pub fn decode(scanned: &str) -> DeskResult<Self> {
        let data = extract_data(scanned.trim())?;
        let decoded = percent_decode_str(&data).decode_utf8_lossy();

        let raw = match serde_json::from_str::<RawPayload>(&decoded) {
            Ok(raw) => raw,
            Err(_) => match decoded.split_once('|') {
                Some((seminar, email)) => RawPayload {
                    seminar_id: Some(RecordId::from(seminar)),
                    participant_email: Some(email.to_string()),
                },
                None => return Err(DeskError::InvalidQr("unrecognized format".into())),
            },
        };

        let seminar_id = match raw.seminar_id {
            Some(RecordId::Text(s)) if s.trim().is_empty() => None,
            Some(RecordId::Text(s)) => Some(RecordId::from(s.as_str())),
            other => other,
        }
        .ok_or_else(|| DeskError::InvalidQr("missing seminar_id".into()))?;

        let participant_email = raw
            .participant_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| DeskError::InvalidQr("missing participant_email".into()))?;

        Ok(QrPayload {
            seminar_id,
            participant_email,
        })
    }
}

impl FromStr for QrPayload {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QrPayload::decode(s)
    }
}

/// Pull the payload out of a link or a `#`-prefixed fragment.
fn extract_data(scanned: &str) -> DeskResult<String> {
    if let Some(fragment) = scanned.strip_prefix('#') {
        return non_empty(fragment.to_string());
    }

    let Ok(link) = Url::parse(scanned) else {
        return non_empty(scanned.to_string());
    };
    if !link.has_host() {
        return non_empty(scanned.to_string());
    }

    // Fragment first, then the query parameter
    if let Some(fragment) = link.fragment().filter(|f| !f.is_empty()) {
        return Ok(fragment.to_string());
    }
    link.query_pairs()
        .find(|(key, _)| key == "data")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DeskError::InvalidQr("No QR data found".into()))
}

fn non_empty(data: String) -> DeskResult<String> {
    if data.trim().is_empty() {
        Err(DeskError::InvalidQr("No QR data found".into()))
    } else {
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(id: i64) -> QrPayload {
        QrPayload {
            seminar_id: RecordId::Number(id),
            participant_email: "ana@example.com".into(),
        }
    }

    #[test]
    fn test_decode_encoded_json() {
        let scanned =
            "%7B%22seminar_id%22%3A5%2C%22participant_email%22%3A%22ana%40example.com%22%7D";
        assert_eq!(QrPayload::decode(scanned).unwrap(), expected(5));

        let plain = r#"{"seminar_id": "12", "participant_email": "ana@example.com"}"#;
        assert_eq!(QrPayload::decode(plain).unwrap(), expected(12));
    }

    #[test]
    fn test_decode_pipe_separated() {
        assert_eq!(QrPayload::decode("7|ana@example.com").unwrap(), expected(7));
        assert_eq!(QrPayload::decode("#7|ana@example.com").unwrap(), expected(7));
    }

    #[test]
    fn test_decode_from_link() {
        let by_fragment = "https://desk.example.com/qr#3|ana@example.com";
        assert_eq!(QrPayload::decode(by_fragment).unwrap(), expected(3));

        let by_query = "https://desk.example.com/qr?data=%7B%22seminar_id%22%3A4%2C%22participant_email%22%3A%22ana%40example.com%22%7D";
        assert_eq!(QrPayload::decode(by_query).unwrap(), expected(4));
    }

    #[test]
    fn test_local_uuid_ids_are_kept_as_text() {
        let id = RecordId::generate();
        let payload = QrPayload::decode(&format!("{id}|ana@example.com")).unwrap();
        assert!(payload.seminar_id.is_local());
        assert_eq!(payload.seminar_id, id);
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        for scanned in [
            r#"{"seminar_id": 5}"#,
            r#"{"participant_email": "ana@example.com"}"#,
            "5|",
            "|ana@example.com",
            "https://desk.example.com/qr",
            "#",
            "just text",
        ] {
            let err = QrPayload::decode(scanned).unwrap_err();
            assert!(matches!(err, DeskError::InvalidQr(_)), "{scanned}");
        }
    }
}
