use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

/// Window and document title.
pub const APP_TITLE: &str = "Interview Prep";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "{APP_TITLE}" }

        div { class: "app-root",
            ErrorBoundary { handle_error: fatal_error, Router::<Route> {} }
        }
    }
}

// Outside the router, so no links back into the app.
fn fatal_error(errors: ErrorContext) -> Element {
    rsx! {
        div { class: "fatal",
            h1 { "{APP_TITLE} stopped working" }
            p { "Restart the app. Your current session is kept in local storage." }
            pre { "{errors:?}" }
        }
    }
}
