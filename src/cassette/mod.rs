//! Cassette format for recording and replaying remote collaborator calls.

pub mod config;
pub mod error;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

pub use error::CassetteError;
