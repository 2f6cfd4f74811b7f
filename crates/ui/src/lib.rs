pub mod app;
pub mod context;
pub mod hooks;
pub mod routes;
pub mod views;
pub mod vm;

pub use app::{APP_TITLE, App};
pub use context::{AppContext, UiApp, build_app_context};
pub use hooks::{
    DisplayPreferences, PracticeSession, PracticeStatus, PracticeTimer, use_display_preferences,
    use_practice_session, use_practice_timer,
};
