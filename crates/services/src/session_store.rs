use chrono::Duration;
use rand::Rng;

use prep_core::model::{
    Category, QuestionId, SessionData, SessionId, SessionPatch, UserPreferences,
};
use storage::LocalStore;
use storage::local_store::{SESSION_DATA_KEY, USER_PREFERENCES_KEY};

use crate::Clock;

const SUFFIX_LEN: usize = 6;

/// Owns the lifecycle of the single persisted practice session.
///
/// Reads treat a missing or corrupt record as "no session"; writes are best
/// effort and never surface an error.
#[derive(Clone)]
pub struct SessionStore {
    clock: Clock,
    store: LocalStore,
}

impl SessionStore {
    #[must_use]
    pub fn new(clock: Clock, store: LocalStore) -> Self {
        Self { clock, store }
    }

    #[must_use]
    pub fn local_store(&self) -> &LocalStore {
        &self.store
    }

    /// `ses_<epochMillis>_<6 base36 chars>`. Not cryptographically secure.
    #[must_use]
    pub fn generate_session_id(&self) -> SessionId {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
            .collect();
        SessionId::from_parts(self.clock.now_millis(), &suffix)
    }

    /// Start a new session, replacing any existing one.
    pub async fn create_session(
        &self,
        category: Category,
        technologies: Vec<String>,
    ) -> SessionData {
        if !category.uses_technologies() && !technologies.is_empty() {
            tracing::debug!(%category, "ignoring technologies for non-general session");
        }
        let data = SessionData::new(
            category,
            technologies,
            self.clock.now_millis(),
            self.generate_session_id(),
        );
        self.save_session(&data).await;
        tracing::info!(session_id = %data.session_id(), %category, "practice session created");
        data
    }

    pub async fn save_session(&self, data: &SessionData) -> bool {
        self.store.set(SESSION_DATA_KEY, data).await
    }

    pub async fn load_session(&self) -> Option<SessionData> {
        self.store.get(SESSION_DATA_KEY).await
    }

    /// Shallow-merge `patch` into the stored session.
    ///
    /// Returns `None` without writing when there is no session.
    pub async fn update_session(&self, patch: SessionPatch) -> Option<SessionData> {
        let mut session = self.load_session().await?;
        session.apply(patch);
        self.save_session(&session).await;
        Some(session)
    }

    /// Append `id` to the accessed list (once) and make it current.
    pub async fn add_accessed_question(&self, id: QuestionId) -> Option<SessionData> {
        let session = self.load_session().await?;
        let mut accessed = session.accessed_question_ids().to_vec();
        if !accessed.contains(&id) {
            accessed.push(id.clone());
        }
        tracing::debug!(question_id = %id, accessed = accessed.len(), "question recorded");
        self.update_session(SessionPatch {
            accessed_question_ids: Some(accessed),
            current_question_id: Some(id),
            ..SessionPatch::default()
        })
        .await
    }

    pub async fn is_question_accessed(&self, id: &QuestionId) -> bool {
        self.load_session()
            .await
            .is_some_and(|session| session.has_accessed(id))
    }

    pub async fn clear_session(&self) {
        self.store.remove(SESSION_DATA_KEY).await;
    }

    pub async fn is_valid_session(&self) -> bool {
        self.load_session()
            .await
            .is_some_and(|session| session.is_valid())
    }

    /// Time since the session started; zero without a session.
    pub async fn session_duration(&self) -> Duration {
        match self.load_session().await {
            Some(session) => {
                Duration::milliseconds(self.clock.now_millis() - session.session_start_time())
            }
            None => Duration::zero(),
        }
    }

    pub async fn accessed_question_count(&self) -> usize {
        self.load_session()
            .await
            .map_or(0, |session| session.accessed_count())
    }

    /// Stored display preferences, or defaults.
    pub async fn load_preferences(&self) -> UserPreferences {
        self.store
            .get(USER_PREFERENCES_KEY)
            .await
            .unwrap_or_default()
    }

    pub async fn save_preferences(&self, preferences: &UserPreferences) -> bool {
        self.store.set(USER_PREFERENCES_KEY, preferences).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::time::{fixed_clock, fixed_now};
    use std::sync::Arc;
    use storage::repository::{InMemoryBackend, KeyValueBackend};

    fn store_on(backend: &InMemoryBackend) -> SessionStore {
        SessionStore::new(fixed_clock(), LocalStore::new(Arc::new(backend.clone())))
    }

    #[test]
    fn session_id_has_expected_shape() {
        let store = store_on(&InMemoryBackend::new());
        let id = store.generate_session_id();
        let parts: Vec<&str> = id.as_str().split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ses");
        assert_eq!(parts[1], fixed_now().timestamp_millis().to_string());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[tokio::test]
    async fn create_overwrites_previous_session() {
        let store = store_on(&InMemoryBackend::new());
        let first = store.create_session(Category::Behaviour, Vec::new()).await;
        store.add_accessed_question(QuestionId::new("b1")).await;

        let second = store
            .create_session(Category::General, vec!["rust".into()])
            .await;
        let loaded = store.load_session().await.unwrap();

        assert_eq!(loaded, second);
        assert_ne!(loaded.session_id(), first.session_id());
        assert!(loaded.accessed_question_ids().is_empty());
    }

    #[tokio::test]
    async fn add_accessed_question_is_idempotent() {
        let store = store_on(&InMemoryBackend::new());
        store.create_session(Category::Behaviour, Vec::new()).await;

        let once = store
            .add_accessed_question(QuestionId::new("q1"))
            .await
            .unwrap();
        let twice = store
            .add_accessed_question(QuestionId::new("q1"))
            .await
            .unwrap();

        assert_eq!(once.accessed_question_ids(), twice.accessed_question_ids());
        assert_eq!(store.accessed_question_count().await, 1);
        assert!(store.is_question_accessed(&QuestionId::new("q1")).await);
        assert!(!store.is_question_accessed(&QuestionId::new("q2")).await);
    }

    #[tokio::test]
    async fn mutations_without_session_are_no_ops() {
        let backend = InMemoryBackend::new();
        let store = store_on(&backend);

        assert!(
            store
                .add_accessed_question(QuestionId::new("q1"))
                .await
                .is_none()
        );
        assert!(
            store
                .update_session(SessionPatch::technologies(vec!["go".into()]))
                .await
                .is_none()
        );
        assert!(!store.is_question_accessed(&QuestionId::new("q1")).await);
        assert_eq!(store.accessed_question_count().await, 0);
        assert_eq!(store.session_duration().await, Duration::zero());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn validity_follows_category_rules() {
        let store = store_on(&InMemoryBackend::new());

        store.create_session(Category::General, Vec::new()).await;
        assert!(store.load_session().await.is_some());
        assert!(!store.is_valid_session().await);

        let data = store
            .create_session(Category::SystemsDesign, vec!["python".into()])
            .await;
        assert!(data.selected_technologies().is_empty());
        assert!(store.is_valid_session().await);
    }

    #[tokio::test]
    async fn clear_then_load_is_absent() {
        let store = store_on(&InMemoryBackend::new());
        store.create_session(Category::Behaviour, Vec::new()).await;

        store.clear_session().await;

        assert!(store.load_session().await.is_none());
        assert!(!store.is_valid_session().await);
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_no_session() {
        let backend = InMemoryBackend::new();
        backend
            .set_item(SESSION_DATA_KEY, "{\"selectedCategory\":\"general\"")
            .await
            .unwrap();
        let store = store_on(&backend);

        assert!(store.load_session().await.is_none());
        assert!(!store.is_valid_session().await);
    }

    #[tokio::test]
    async fn record_missing_session_id_is_not_a_session() {
        let backend = InMemoryBackend::new();
        backend
            .set_item(
                SESSION_DATA_KEY,
                r#"{"selectedCategory":"behaviour","selectedTechnologies":[],"accessedQuestionIds":[],"sessionStartTime":1}"#,
            )
            .await
            .unwrap();
        let store = store_on(&backend);

        assert!(!store.is_valid_session().await);
    }

    #[tokio::test]
    async fn duration_uses_clock() {
        let backend = InMemoryBackend::new();
        let store = store_on(&backend);
        store.create_session(Category::Behaviour, Vec::new()).await;

        let mut later = fixed_clock();
        later.advance(Duration::seconds(90));
        let later_store =
            SessionStore::new(later, LocalStore::new(Arc::new(backend.clone())));

        assert_eq!(later_store.session_duration().await, Duration::seconds(90));
    }

    #[tokio::test]
    async fn preferences_default_until_saved() {
        let store = store_on(&InMemoryBackend::new());
        assert_eq!(store.load_preferences().await, UserPreferences::default());

        let prefs = UserPreferences {
            timer_visible: false,
            ..UserPreferences::default()
        };
        assert!(store.save_preferences(&prefs).await);
        assert_eq!(store.load_preferences().await, prefs);
    }
}
