use std::sync::Arc;

use services::{AppServices, AuthService, PracticeCoordinator, QuestionApi};

pub trait UiApp: Send + Sync {
    fn coordinator(&self) -> Arc<PracticeCoordinator>;
    fn auth(&self) -> Arc<AuthService>;
    /// `None` when running without the remote API (inserts disabled).
    fn api(&self) -> Option<Arc<QuestionApi>>;
}

impl UiApp for AppServices {
    fn coordinator(&self) -> Arc<PracticeCoordinator> {
        AppServices::coordinator(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }

    fn api(&self) -> Option<Arc<QuestionApi>> {
        AppServices::api(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    coordinator: Arc<PracticeCoordinator>,
    auth: Arc<AuthService>,
    api: Option<Arc<QuestionApi>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            coordinator: app.coordinator(),
            auth: app.auth(),
            api: app.api(),
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

    #[must_use]
    pub fn api(&self) -> Option<Arc<QuestionApi>> {
        self.api.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
