//! Run-level errors. Everything here aborts the run.

use {crate::dnslib::QueryError, std::path::PathBuf, thiserror::Error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The trusted resolver could not provide a ground-truth address.
    #[error("baseline check failed for {domain} against {server}: {reason}")]
    Baseline {
        domain: String,
        server: String,
        reason: BaselineFailure,
    },

    /// Opening the resolvers or output file failed.
    #[error("can't open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker, ingestion or sink task panicked.
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum BaselineFailure {
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("response has no answers")]
    NoAnswers,

    #[error("response has no A record")]
    NoAddress,
}
