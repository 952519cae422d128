//! Local-first data access for seminar-desk.
//!
//! This crate provides the pieces shared by the CLI and any other front end:
//! - [`Desk`], which mirrors every operation between the REST backend and a
//!   local JSON store, falling back to the store when the backend fails
//! - the seminar, attendance, participant and evaluation models
//! - schedule validation, sorting/grouping and QR payload decoding

pub mod config;
pub mod desk;
pub mod error;
pub mod id;
pub mod mirror;
pub mod model;
pub mod notice;
pub mod qr;
pub mod remote;
pub mod schedule;
pub mod sort;

pub use config::DeskConfig;
pub use desk::{DELETED_LOCALLY, Desk, LOADED_LOCALLY, SAVED_LOCALLY, Source, Synced};
pub use error::{DeskError, DeskResult};
pub use id::RecordId;
pub use mirror::{Mirror, Session};
pub use model::*;
pub use notice::{Banner, NoticeLog, Notifier};
pub use qr::QrPayload;
pub use remote::{HttpTransport, RemoteFailure, Transport};
pub use schedule::{ClockTime, Semester, TimeWindow};
