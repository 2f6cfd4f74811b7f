#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The local store refused the write.
    StorageUnavailable,
    /// The question service could not be reached or refused the request.
    ServiceUnavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::StorageUnavailable => {
                "Local storage is unavailable, so progress cannot be saved."
            }
            ViewError::ServiceUnavailable => {
                "The question service is unavailable. Check your connection and try again."
            }
        }
    }
}
