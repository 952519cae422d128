pub mod attendance;
pub mod config;
pub mod evaluations;
pub mod health;
pub mod login;
pub mod participants;
pub mod seminars;
