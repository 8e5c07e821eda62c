use thiserror::Error;

/// The cause carried by a failed fetch.
///
/// A `FetchError` never escapes the pipeline as an error value: it is captured in
/// [`FetchOutcome::Failed`](crate::FetchOutcome::Failed) and rendered into the
/// presentation state by the feature's mapper.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum FetchError {
    /// A general error with a message describing what went wrong.
    #[error("{0}")]
    Error(String),

    /// The provider has no data for the requested location.
    #[error("no weather data for {0}")]
    NotFound(String),

    /// The fetch was cancelled before completion.
    #[error("Task was cancelled!")]
    Cancelled,

    /// The fetch timed out.
    #[error("deadline has elapsed!")]
    Timeout,
}

impl FetchError {
    pub fn error(message: impl Into<String>) -> Self {
        FetchError::Error(message.into())
    }

    /// Returns true if this error is a general error with a message.
    pub fn is_error(&self) -> bool {
        matches!(self, FetchError::Error(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }

    /// Returns true if this error represents a cancelled fetch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Returns true if this error represents a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }
}

/// Failure of an upstream source (favorites store, location provider).
///
/// Source failures are not recovered by the pipeline; they terminate the hub's
/// producer and reach subscribers as [`HubError::ProducerCrashed`].
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SourceError {
    #[error("source failed: {0}")]
    Failed(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("source closed")]
    Closed,
}

/// What a subscription holder sees when a hub stops serving values.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum HubError {
    /// The producer's upstream source failed.
    #[error("producer crashed: {0}")]
    ProducerCrashed(String),

    /// The producer task panicked.
    #[error("producer panicked: {0}")]
    ProducerPanicked(String),

    /// The hub was torn down by its owner.
    #[error("hub closed")]
    Closed,
}

impl HubError {
    /// Returns true for both kinds of abnormal producer termination.
    pub fn is_crash(&self) -> bool {
        matches!(
            self,
            HubError::ProducerCrashed(_) | HubError::ProducerPanicked(_)
        )
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, HubError::Closed)
    }
}

impl From<SourceError> for HubError {
    fn from(error: SourceError) -> Self {
        HubError::ProducerCrashed(error.to_string())
    }
}
