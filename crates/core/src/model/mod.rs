mod auth;
pub mod batch;
mod category;
mod ids;
mod preferences;
mod question;
mod session;

pub use auth::{AuthUser, LOGIN_TTL};
pub use batch::{BatchError, BatchIssue, BatchValidationError, QuestionInput};
pub use category::{Category, CollectionName, UnknownCategory};
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use preferences::UserPreferences;
pub use question::{Difficulty, MIN_ANSWER_LEN, MIN_QUESTION_LEN, Question, QuestionError};
pub use session::{SessionData, SessionPatch};
