use std::{io, path::PathBuf};

/// Problems with the five positional parameters.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected 5 arguments (size, assoc, policy, block size, trace), got {0}")]
    Arity(usize),
    #[error("{what} must be an unsigned integer, got {value:?}")]
    InvalidNumber { what: &'static str, value: String },
    #[error("{what} must be a power of two, got {value}")]
    NotPowerOfTwo { what: &'static str, value: u64 },
    #[error("unknown associativity {0:?}")]
    UnknownAssoc(String),
    #[error("unknown replacement policy {0:?}")]
    UnknownPolicy(String),
    #[error("cache of {size} bytes cannot hold {ways} way(s) of {block_size} byte blocks")]
    EmptyGeometry {
        size: u64,
        block_size: u64,
        ways: u64,
    },
    #[error("{lines} cache lines exceed the limit of {max}")]
    TooLarge { lines: u64, max: u64 },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Args(#[from] pico_args::Error),
    #[error("cannot read trace {path:?}: {source}")]
    Trace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write report: {0}")]
    Report(#[from] io::Error),
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
