use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use prep_core::model::{
    Category, Question, QuestionId, SessionData, SessionPatch, UserPreferences,
};

use crate::question_index::{IndexPhase, LoadOutcome, QuestionIndex};
use crate::session_store::SessionStore;

use super::progress::PracticeProgress;

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(Question),
    /// Every loaded question has been shown.
    Exhausted,
    /// Questions are not loaded yet, or a reload is in flight.
    NotLoaded,
    NoSession,
}

/// Glue between the persisted session and the question index.
///
/// Keeps the last session it read or wrote so views can render without
/// another store round trip.
#[derive(Clone)]
pub struct PracticeCoordinator {
    store: SessionStore,
    index: Arc<QuestionIndex>,
    session: Arc<Mutex<Option<SessionData>>>,
    // held from draw until the draw is recorded
    draws: Arc<tokio::sync::Mutex<()>>,
}

impl PracticeCoordinator {
    #[must_use]
    pub fn new(store: SessionStore, index: Arc<QuestionIndex>) -> Self {
        Self {
            store,
            index,
            session: Arc::new(Mutex::new(None)),
            draws: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    #[must_use]
    pub fn index(&self) -> &QuestionIndex {
        &self.index
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The session as last seen by this coordinator.
    #[must_use]
    pub fn session(&self) -> Option<SessionData> {
        self.cached().clone()
    }

    pub async fn load_session(&self) -> Option<SessionData> {
        let session = self.store.load_session().await;
        self.remember(session.clone());
        session
    }

    /// Start a fresh session. Does nothing when the store cannot be written.
    pub async fn create_session(
        &self,
        category: Category,
        technologies: Vec<String>,
    ) -> Option<SessionData> {
        if !self.store.local_store().is_available().await {
            tracing::warn!(%category, "local store unavailable, session not created");
            return None;
        }
        let session = self.store.create_session(category, technologies).await;
        self.remember(Some(session.clone()));
        Some(session)
    }

    pub async fn update_session(&self, patch: SessionPatch) -> Option<SessionData> {
        let session = self.store.update_session(patch).await;
        if session.is_some() {
            self.remember(session.clone());
        }
        session
    }

    pub async fn add_accessed_question(&self, id: QuestionId) -> Option<SessionData> {
        let session = self.store.add_accessed_question(id).await;
        if session.is_some() {
            self.remember(session.clone());
        }
        session
    }

    pub async fn clear_session(&self) {
        self.store.clear_session().await;
        self.remember(None);
    }

    pub async fn is_valid_session(&self) -> bool {
        self.load_session()
            .await
            .is_some_and(|session| session.is_valid())
    }

    /// Load the questions for the current session.
    ///
    /// `None` when there is no session to practice.
    pub async fn start_practice(&self) -> Option<LoadOutcome> {
        let session = self.current_or_stored().await?;
        let outcome = self
            .index
            .safe_initialize_questions(
                session.selected_category(),
                session.selected_technologies(),
            )
            .await;
        Some(outcome)
    }

    /// Draw an unseen question and record it as accessed.
    ///
    /// Overlapping calls are serialized, so each one sees the draws recorded
    /// before it.
    pub async fn next_question(&self) -> NextQuestion {
        let _draw = self.draws.lock().await;
        let Some(session) = self.current_or_stored().await else {
            return NextQuestion::NoSession;
        };
        if self.index.phase() != IndexPhase::Ready {
            return NextQuestion::NotLoaded;
        }
        let Some(question) = self.index.random_question(session.accessed_question_ids()) else {
            tracing::debug!(session_id = %session.session_id(), "no unseen questions left");
            return NextQuestion::Exhausted;
        };

        if self.add_accessed_question(question.id.clone()).await.is_none() {
            // store went away mid-session; keep tracking in memory
            tracing::warn!(question_id = %question.id, "accessed question not persisted");
            let mut cached = self.cached();
            if let Some(session) = cached.as_mut() {
                session.record_access(question.id.clone());
            }
        }
        NextQuestion::Question(question)
    }

    /// The question last drawn in this session, if still loaded.
    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        let id = self.cached().as_ref()?.current_question_id()?.clone();
        self.index.question_by_id(&id)
    }

    pub async fn preferences(&self) -> UserPreferences {
        self.store.load_preferences().await
    }

    pub async fn save_preferences(&self, preferences: &UserPreferences) -> bool {
        self.store.save_preferences(preferences).await
    }

    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        let cached = self.cached();
        let accessed = cached
            .as_ref()
            .map_or(&[][..], SessionData::accessed_question_ids);
        PracticeProgress {
            answered: accessed.len(),
            total: self.index.total_questions(),
            remaining: self.index.remaining_question_count(accessed),
        }
    }

    async fn current_or_stored(&self) -> Option<SessionData> {
        if let Some(session) = self.session() {
            return Some(session);
        }
        self.load_session().await
    }

    fn remember(&self, session: Option<SessionData>) {
        *self.cached() = session;
    }

    fn cached(&self) -> MutexGuard<'_, Option<SessionData>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
