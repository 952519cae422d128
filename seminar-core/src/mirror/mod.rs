//! Local mirror of backend collections.
//!
//! Each collection is one JSON array in `<data_dir>/<key>.json`, read and
//! written whole. There is no locking: concurrent writers race and the last
//! one wins.

mod session;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::DeskResult;
use crate::model::{AttendanceRecord, Evaluation, JoinedParticipant, Seminar};

pub use session::Session;

/// A record type that lives in its own mirror collection.
pub trait Collection: Serialize + DeserializeOwned {
    const KEY: &'static str;
}

impl Collection for Seminar {
    const KEY: &'static str = "seminars";
}

impl Collection for AttendanceRecord {
    const KEY: &'static str = "attendance";
}

impl Collection for Evaluation {
    const KEY: &'static str = "evaluations";
}

impl Collection for JoinedParticipant {
    const KEY: &'static str = "joined_participants";
}

#[derive(Debug, Clone)]
pub struct Mirror {
    dir: PathBuf,
}

impl Mirror {
    pub fn open(dir: impl Into<PathBuf>) -> DeskResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Mirror { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn collection_path<C: Collection>(&self) -> PathBuf {
        self.dir.join(format!("{}.json", C::KEY))
    }

    /// Read a whole collection. Missing or unreadable files read as empty;
    /// records that do not fit the schema are skipped.
    pub fn load<C: Collection>(&self) -> Vec<C> {
        self.load_split().0
    }

    /// Parsed records, plus the raw entries that failed to parse.
    fn load_split<C: Collection>(&self) -> (Vec<C>, Vec<Value>) {
        let path = self.collection_path::<C>();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return (Vec::new(), Vec::new()),
        };

        let entries = match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(collection = C::KEY, error = %e, "Ignoring unreadable mirror collection");
                return (Vec::new(), Vec::new());
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();
        for entry in entries {
            match serde_json::from_value::<C>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(collection = C::KEY, error = %e, "Skipping unreadable mirror record");
                    rejected.push(entry);
                }
            }
        }

        (records, rejected)
    }

    /// Replace a whole collection.
    pub fn save<C: Collection>(&self, records: &[C]) -> DeskResult<()> {
        self.write(C::KEY, &serde_json::to_value(records)?)
    }

    fn write(&self, key: &str, collection: &Value) -> DeskResult<()> {
        let path = self.dir.join(format!("{key}.json"));
        let temp = self.dir.join(format!("{key}.json.tmp"));

        let content = serde_json::to_string_pretty(collection)?;

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    /// Read-modify-write a collection. Entries that could not be read are
    /// written back untouched.
    pub fn update<C: Collection, R>(&self, f: impl FnOnce(&mut Vec<C>) -> R) -> DeskResult<R> {
        let (mut records, rejected) = self.load_split::<C>();
        let result = f(&mut records);

        let mut entries = Vec::with_capacity(records.len() + rejected.len());
        for record in &records {
            entries.push(serde_json::to_value(record)?);
        }
        entries.extend(rejected);

        self.write(C::KEY, &Value::Array(entries))?;
        Ok(result)
    }

    pub fn session(&self) -> Session {
        Session::load(&self.dir)
    }

    pub fn save_session(&self, session: &Session) -> DeskResult<()> {
        session.save(&self.dir)
    }
}
