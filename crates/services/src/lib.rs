#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod question_api;
pub mod question_index;
pub mod question_source;
pub mod random;
pub mod session_store;
pub mod sessions;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, Authenticator, StaticCredentials};
pub use error::{AppServicesError, AuthError, SourceError};
pub use question_api::{QuestionApi, QuestionApiConfig};
pub use question_index::{IndexPhase, LoadOutcome, QuestionIndex};
pub use question_source::{QuestionQuery, QuestionSource, StaticQuestionSource};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use session_store::SessionStore;
pub use sessions::{NextQuestion, PracticeCoordinator, PracticeProgress};
