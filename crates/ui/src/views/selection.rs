use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{SelectionVm, session_title};

#[component]
pub fn SelectionView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut selection = use_signal(SelectionVm::default);
    let mut error = use_signal(|| None::<ViewError>);
    let mut starting = use_signal(|| false);

    let coordinator = ctx.coordinator();
    let existing = use_resource(move || {
        let coordinator = coordinator.clone();
        async move {
            coordinator
                .load_session()
                .await
                .filter(prep_core::model::SessionData::is_valid)
        }
    });

    let vm = selection.read().clone();
    let category_cards = vm.category_options().into_iter().map(|option| {
        let category = option.category;
        let class = if option.selected {
            "category-card category-card--selected"
        } else {
            "category-card"
        };
        rsx! {
            button {
                key: "{category}",
                class: "{class}",
                r#type: "button",
                onclick: move |_| selection.write().select_category(category),
                h3 { "{option.label}" }
                p { "{option.description}" }
            }
        }
    });
    let technology_chips = vm.technology_options().into_iter().map(|option| {
        let id = option.id;
        let class = if option.selected {
            "tech-chip tech-chip--selected"
        } else {
            "tech-chip"
        };
        rsx! {
            button {
                key: "{id}",
                class: "{class}",
                r#type: "button",
                onclick: move |_| selection.write().toggle_technology(id),
                "{option.label}"
            }
        }
    });

    let coordinator = ctx.coordinator();
    let start = move |_| {
        let Some((category, technologies)) = selection.read().start_request() else {
            return;
        };
        let coordinator = coordinator.clone();
        starting.set(true);
        spawn(async move {
            if coordinator
                .create_session(category, technologies)
                .await
                .is_some()
            {
                error.set(None);
                let _ = navigator.push(Route::Practice {});
            } else {
                error.set(Some(ViewError::StorageUnavailable));
            }
            starting.set(false);
        });
    };

    let resume = existing.read().clone().flatten();

    rsx! {
        div { class: "page selection-page",
            header { class: "view-header",
                h2 { class: "view-title", "Interview Practice" }
                p { class: "view-subtitle", "Choose what to practice. Questions are drawn at random and never repeat within a session." }
            }
            div { class: "view-divider" }
            if let Some(session) = resume {
                div { class: "resume-banner",
                    span { "Session in progress: {session_title(&session)}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::Practice {});
                        },
                        "Resume"
                    }
                }
            }
            section { class: "category-grid", {category_cards} }
            if vm.shows_technologies() {
                section { class: "tech-grid",
                    h3 { "Technologies" }
                    div { class: "tech-chips", {technology_chips} }
                }
            }
            footer { class: "selection-footer",
                p { class: "selection-hint", "{vm.hint()}" }
                if let Some(err) = error() {
                    p { class: "form-error", "{err.message()}" }
                }
                button {
                    id: "start-practice",
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !vm.can_start() || starting(),
                    onclick: start,
                    "Start practice"
                }
            }
        }
    }
}
