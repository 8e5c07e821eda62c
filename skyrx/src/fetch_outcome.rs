use crate::FetchError;

/// Result of one fetch invocation.
///
/// Outcomes are created once by a fetch and never mutated afterwards; the
/// feature mappers consume them by exhaustive match.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FetchOutcome<T> {
    Pending,
    Succeeded { value: T },
    Failed { error: FetchError },
}

impl<T> FetchOutcome<T> {
    pub fn pending() -> Self {
        FetchOutcome::Pending
    }

    pub fn succeeded(value: T) -> Self {
        FetchOutcome::Succeeded { value }
    }

    pub fn failed(error: FetchError) -> Self {
        FetchOutcome::Failed { error }
    }

    pub fn failed_with_message(message: impl Into<String>) -> Self {
        FetchOutcome::Failed {
            error: FetchError::Error(message.into()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchOutcome::Pending)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }

    /// Succeeded or failed; anything but pending.
    pub fn is_complete(&self) -> bool {
        !self.is_pending()
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            FetchOutcome::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            FetchOutcome::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchOutcome::Pending => FetchOutcome::Pending,
            FetchOutcome::Succeeded { value } => FetchOutcome::Succeeded { value: f(value) },
            FetchOutcome::Failed { error } => FetchOutcome::Failed { error },
        }
    }
}

impl<T> Default for FetchOutcome<T> {
    fn default() -> Self {
        FetchOutcome::Pending
    }
}

impl<T> From<Result<T, FetchError>> for FetchOutcome<T> {
    fn from(value: Result<T, FetchError>) -> Self {
        match value {
            Ok(value) => FetchOutcome::succeeded(value),
            Err(error) => FetchOutcome::failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending() {
        let pending: FetchOutcome<i32> = FetchOutcome::default();
        assert!(pending.is_pending());
        assert!(!pending.is_complete());
        assert!(pending.value_ref().is_none());
        assert!(pending.error().is_none());
    }

    #[test]
    fn test_succeeded() {
        let succeeded = FetchOutcome::succeeded(8);
        assert!(succeeded.is_succeeded());
        assert!(succeeded.is_complete());
        assert_eq!(succeeded.value_ref(), Some(&8));
        assert_eq!(succeeded.value(), Some(8));
    }

    #[test]
    fn test_failed() {
        let failed = FetchOutcome::<i32>::failed_with_message("Connection failed");
        assert!(failed.is_failed());
        assert!(failed.is_complete());
        assert_eq!(failed.error(), Some(&FetchError::error("Connection failed")));
        assert_eq!(failed.value(), None);
    }

    #[test]
    fn test_from_result() {
        let ok: FetchOutcome<u8> = Ok(3).into();
        assert_eq!(ok, FetchOutcome::succeeded(3));

        let err: FetchOutcome<u8> = Err(FetchError::Timeout).into();
        assert_eq!(err, FetchOutcome::failed(FetchError::Timeout));
    }

    #[test]
    fn test_map_keeps_variant() {
        assert_eq!(FetchOutcome::succeeded(2).map(|v| v * 10), FetchOutcome::succeeded(20));
        assert_eq!(
            FetchOutcome::<i32>::Pending.map(|v| v * 10),
            FetchOutcome::<i32>::Pending
        );
        assert_eq!(
            FetchOutcome::<i32>::failed(FetchError::Cancelled).map(|v| v * 10),
            FetchOutcome::<i32>::failed(FetchError::Cancelled)
        );
    }
}
