use localic_std::errors::LocalError;
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("local-ic request failed: {0:?}")]
    Local(LocalError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("chain {0} is not configured")]
    UnknownChain(String),

    #[error("no code id stored for {contract} on {chain}")]
    MissingCodeId { chain: String, contract: String },

    #[error("no {kind} found from {src} to {dest}")]
    MissingLink {
        kind: String,
        src: String,
        dest: String,
    },

    #[error("failed to match pairwise {0}")]
    NoPairwiseMatch(String),

    #[error("invalid genesis key {key}: {reason}")]
    GenesisPath { key: String, reason: String },

    #[error("timed out after {attempts} attempts waiting for: {what}")]
    PollTimeout { what: String, attempts: u32 },

    #[error("unexpected response from {0}: {1}")]
    UnexpectedResponse(String, String),

    #[error("relayer command `{cmd}` failed: {reason}")]
    Relayer { cmd: String, reason: String },
}

impl From<LocalError> for HarnessError {
    fn from(err: LocalError) -> Self {
        HarnessError::Local(err)
    }
}
