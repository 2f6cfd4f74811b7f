use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{InsertView, LoginView, PracticeView, SelectionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", SelectionView)] Selection {},
        #[route("/practice", PracticeView)] Practice {},
        #[route("/login", LoginView)] Login {},
        #[route("/new", InsertView)] Insert {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Interview Prep" }
            ul {
                li { Link { to: Route::Selection {}, "Topics" } }
                li { Link { to: Route::Practice {}, "Practice" } }
                li { Link { to: Route::Insert {}, "Add questions" } }
            }
        }
    }
}
