//! Session keys of the signed-in user.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DeskError, DeskResult};

const SESSION_FILE: &str = "session.toml";
const FALLBACK_PARTICIPANT_EMAIL: &str = "participant@example.com";

/// Stored in `<data_dir>/session.toml`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_background: Option<String>,
}

impl Session {
    /// Load the session; a missing or unreadable file is an empty session.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SESSION_FILE);

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable session file");
            Self::default()
        })
    }

    pub fn save(&self, dir: &Path) -> DeskResult<()> {
        std::fs::create_dir_all(dir)?;

        let content =
            toml::to_string_pretty(self).map_err(|e| DeskError::Serialization(e.to_string()))?;

        std::fs::write(dir.join(SESSION_FILE), content)?;

        Ok(())
    }

    /// Email used when an operation is not given one explicitly.
    pub fn current_email(&self) -> &str {
        self.participant_email
            .as_deref()
            .or(self.user_email.as_deref())
            .unwrap_or(FALLBACK_PARTICIPANT_EMAIL)
    }
}
