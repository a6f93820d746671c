use thiserror::Error;

/// Failures surfaced by a [`ProxyTransport`](crate::transport::ProxyTransport).
///
/// The converter never raises these on its own; whatever the transport returns
/// is handed back to the caller untouched.
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("downstream peer disconnected")]
    Disconnected,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid downstream response: {0}")]
    InvalidResponse(String),
    #[error("not implemented")]
    NotImplemented,
}

pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn code(&self) -> &'static str {
        match self {
            ConverterError::Disconnected => "disconnected",
            ConverterError::Transport(_) => "transport",
            ConverterError::InvalidResponse(_) => "invalid_response",
            ConverterError::NotImplemented => "not_implemented",
        }
    }
}
