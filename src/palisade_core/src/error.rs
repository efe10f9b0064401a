use thiserror::Error;

/// The error surface of the authentication flows.
///
/// Every rejected authentication path carries the same variant with a
/// human-readable reason; callers must not branch on the reason beyond
/// displaying it, so no structured cause leaks that would let a client
/// distinguish an unknown account from a wrong password.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// Bad credentials, any lock state, missing fields, bad or spent reset
    /// token, mismatched session type.
    #[error("{0}")]
    AuthenticationFailure(String),
    /// Input rejected before any credential logic ran (malformed email on a
    /// registration, weak new password).
    #[error("{0}")]
    ValidationFailure(String),
    /// A downstream store or client failed.
    #[error("{0}")]
    OperationFailure(String),
}

impl AuthFlowError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationFailure(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailure(message.into())
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::OperationFailure(message.into())
    }
}
