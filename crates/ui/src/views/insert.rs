use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use prep_core::model::CollectionName;
use services::SourceError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{SAMPLE_BATCH, check_batch, collection_options, inserted_message};

#[derive(Clone, Debug, PartialEq, Eq)]
enum InsertState {
    Idle,
    Saving,
    Inserted(String),
    Rejected(Vec<String>),
}

fn rejection_messages(err: &SourceError) -> Vec<String> {
    match err {
        SourceError::Rejected(message) => message.lines().map(str::to_string).collect(),
        other => vec![format!("Insert failed: {other}")],
    }
}

#[component]
pub fn InsertView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let user = use_resource(move || {
        let auth = auth.clone();
        async move { auth.current_user().await }
    });

    let mut collection = use_signal(|| "javascript".to_string());
    let mut text = use_signal(|| SAMPLE_BATCH.to_string());
    let mut state = use_signal(|| InsertState::Idle);

    let api = ctx.api();
    let submit = move |_| {
        let Some(created_by) = user.read().clone().flatten().map(|user| user.username) else {
            return;
        };
        let questions = match check_batch(&text()) {
            Ok(questions) => questions,
            Err(messages) => {
                state.set(InsertState::Rejected(messages));
                return;
            }
        };
        let Some(api) = api.clone() else {
            state.set(InsertState::Rejected(vec![
                "Inserting is unavailable without the question service.".to_string(),
            ]));
            return;
        };
        let target = CollectionName::new(collection());
        state.set(InsertState::Saving);
        spawn(async move {
            match api.insert_batch(&target, &questions, &created_by).await {
                Ok(count) => {
                    state.set(InsertState::Inserted(inserted_message(count, target.as_str())));
                }
                Err(err) => state.set(InsertState::Rejected(rejection_messages(&err))),
            }
        });
    };

    let auth = ctx.auth();
    let mut user_for_logout = user;
    let logout = move |_| {
        let auth = auth.clone();
        spawn(async move {
            auth.logout().await;
            user_for_logout.restart();
            let _ = navigator.push(Route::Login {});
        });
    };

    let current = user.read().clone();
    let options = collection_options();

    rsx! {
        div { class: "page insert-page",
            header { class: "view-header",
                h2 { class: "view-title", "Add questions" }
                p { class: "view-subtitle", "Paste a JSON array. The tag is taken from the selected topic." }
            }
            div { class: "view-divider" }
            match current {
                None => rsx! {
                    p { "Loading..." }
                },
                Some(None) => rsx! {
                    div { class: "empty-state",
                        p { "You need to log in to add questions." }
                        Link { to: Route::Login {}, class: "btn btn-primary", "Log in" }
                    }
                },
                Some(Some(signed_in)) => rsx! {
                    div { class: "insert-user",
                        span { "Signed in as {signed_in.username}" }
                        button { class: "btn btn-link", r#type: "button", onclick: logout, "Log out" }
                    }
                    label { r#for: "insert-collection", "Topic" }
                    select {
                        id: "insert-collection",
                        value: "{collection}",
                        onchange: move |evt| collection.set(evt.value()),
                        for choice in options.iter() {
                            option { key: "{choice.id}", value: "{choice.id}", "{choice.label}" }
                        }
                    }
                    label { r#for: "insert-json", "Questions" }
                    textarea {
                        id: "insert-json",
                        class: "json-editor",
                        rows: "16",
                        value: "{text}",
                        oninput: move |evt| text.set(evt.value()),
                    }
                    match state() {
                        InsertState::Idle => rsx! {},
                        InsertState::Saving => rsx! {
                            p { "Saving..." }
                        },
                        InsertState::Inserted(message) => rsx! {
                            p { class: "form-success", "{message}" }
                        },
                        InsertState::Rejected(messages) => rsx! {
                            ul { class: "form-error",
                                for message in messages.iter() {
                                    li { "{message}" }
                                }
                            }
                        },
                    }
                    button {
                        id: "insert-submit",
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: state() == InsertState::Saving,
                        onclick: submit,
                        "Insert questions"
                    }
                },
            }
        }
    }
}
