use thiserror::Error;

/// Failures surfaced by the dashboard's domain operations.
///
/// `Validation` is raised before any request leaves the client. `Network`
/// and `Parse` come out of [`crate::core::api::ApiClient`] and are treated
/// the same way for propagation purposes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),

    /// Status 0 means the request never produced an HTTP response
    /// (connection refused, timeout, DNS failure).
    #[error("request failed ({status}): {message}")]
    Network { status: u16, message: String },

    #[error("malformed response: {0}")]
    Parse(String),
}

impl DashboardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type DashResult<T> = std::result::Result<T, DashboardError>;
