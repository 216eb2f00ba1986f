//! Errors raised while loading, checking or writing cassettes.

use std::path::PathBuf;

use thiserror::Error;

/// A cassette could not be used.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read.
    #[error("failed to read cassette {}: {source}", path.display())]
    Read {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cassette file is not valid cassette YAML.
    #[error("failed to parse cassette {}: {source}", path.display())]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The cassette could not be written.
    #[error("failed to write cassette {}: {source}", path.display())]
    Write {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cassette was recorded for another repository.
    #[error(
        "cassette {} was recorded for {recorded:?}, not {requested:?}",
        path.display()
    )]
    RepoMismatch {
        /// Cassette path.
        path: PathBuf,
        /// Repository URL stored in the cassette.
        recorded: String,
        /// Repository URL of the run.
        requested: String,
    },
}
