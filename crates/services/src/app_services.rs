use std::sync::Arc;

use storage::LocalStore;
use storage::repository::Storage;

use crate::Clock;
use crate::auth_service::{AuthService, Authenticator, StaticCredentials};
use crate::error::AppServicesError;
use crate::question_api::{QuestionApi, QuestionApiConfig};
use crate::question_index::QuestionIndex;
use crate::question_source::QuestionSource;
use crate::session_store::SessionStore;
use crate::sessions::PracticeCoordinator;

/// Assembles app-facing services around one local store.
#[derive(Clone)]
pub struct AppServices {
    coordinator: Arc<PracticeCoordinator>,
    auth: Arc<AuthService>,
    api: Option<Arc<QuestionApi>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the remote question API.
    ///
    /// Logins are checked against `credentials` when given, otherwise against
    /// the API's login endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the API
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        api_config: &QuestionApiConfig,
        credentials: Option<StaticCredentials>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api = Arc::new(QuestionApi::new(api_config)?);
        let authenticator: Arc<dyn Authenticator> = match credentials {
            Some(credentials) => Arc::new(credentials),
            None => Arc::clone(&api) as Arc<dyn Authenticator>,
        };
        tracing::info!(api = %api.base_url(), "services ready");

        let mut services = Self::from_parts(
            &storage,
            Arc::clone(&api) as Arc<dyn QuestionSource>,
            authenticator,
            clock,
        );
        services.api = Some(api);
        Ok(services)
    }

    /// Build services over any storage and question source, without a
    /// remote API for writes.
    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        source: Arc<dyn QuestionSource>,
        authenticator: Arc<dyn Authenticator>,
        clock: Clock,
    ) -> Self {
        let store = LocalStore::from_storage(storage);
        let index = Arc::new(QuestionIndex::new(source, clock));
        let coordinator = Arc::new(PracticeCoordinator::new(
            SessionStore::new(clock, store.clone()),
            index,
        ));
        let auth = Arc::new(AuthService::new(clock, store, authenticator));
        Self {
            coordinator,
            auth,
            api: None,
        }
    }

    #[must_use]
    pub fn coordinator(&self) -> Arc<PracticeCoordinator> {
        Arc::clone(&self.coordinator)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    /// The remote API, when services were built against one.
    #[must_use]
    pub fn api(&self) -> Option<Arc<QuestionApi>> {
        self.api.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question_source::StaticQuestionSource;
    use prep_core::model::Category;
    use prep_core::time::fixed_clock;

    #[tokio::test]
    async fn parts_share_one_local_store() {
        let storage = Storage::in_memory();
        let services = AppServices::from_parts(
            &storage,
            Arc::new(StaticQuestionSource::new()),
            Arc::new(StaticCredentials::new().with_user("luis", "pw")),
            fixed_clock(),
        );

        services
            .coordinator()
            .create_session(Category::Behaviour, Vec::new())
            .await
            .unwrap();
        services.auth().login("luis", "pw").await.unwrap();

        let store = LocalStore::from_storage(&storage);
        let reopened = SessionStore::new(fixed_clock(), store);
        assert!(reopened.is_valid_session().await);
        assert!(services.auth().is_authenticated().await);
        assert!(services.api().is_none());
    }

    #[tokio::test]
    async fn sqlite_services_start_with_api_client() {
        let services = AppServices::new_sqlite(
            "sqlite:file:memdb_app_services?mode=memory&cache=shared",
            fixed_clock(),
            &QuestionApiConfig::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(
            services.api().unwrap().base_url().as_str(),
            "http://localhost:3000/"
        );
        assert!(services.coordinator().session().is_none());
    }
}
