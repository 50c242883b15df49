use thiserror::Error;

/// Engine error types.
///
/// None of these are fatal to the engine itself: after any single-order
/// failure the active session remains usable, and a rejected session
/// creation simply leaves the engine inactive.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("session creation rejected by backend: {0}")]
    SessionCreationRejected(String),

    #[error("a session is already active")]
    SessionAlreadyActive,

    #[error("no active session")]
    NoActiveSession,

    #[error("no signing-capable wallet connected")]
    WalletUnavailable,

    #[error("signature request declined by wallet")]
    SignatureDeclined,

    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    #[error("invalid session parameters: {0}")]
    InvalidSessionParameters(String),

    #[error("invalid viewport geometry: {0}")]
    InvalidViewport(String),

    #[error("price {0} is outside the addressable domain")]
    InvalidPrice(i64),

    #[error("no price tick available for the instrument")]
    PriceUnavailable,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
