use thiserror::Error;

use crate::model::{BatchValidationError, ParseIdError, QuestionError, UnknownCategory};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Batch(#[from] BatchValidationError),
    #[error(transparent)]
    Category(#[from] UnknownCategory),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
