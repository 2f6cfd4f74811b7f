use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::MissingCredentials | AuthError::InvalidCredentials => err.to_string(),
        AuthError::NotPersisted => "Logged in, but the login could not be saved.".to_string(),
        _ => "Login failed. Please try again.".to_string(),
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let auth = ctx.auth();
    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        let name = username();
        let secret = password();
        submitting.set(true);
        spawn(async move {
            match auth.login(&name, &secret).await {
                Ok(_) => {
                    error.set(None);
                    password.set(String::new());
                    let _ = navigator.push(Route::Insert {});
                }
                Err(err) => error.set(Some(login_error_message(&err))),
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "page login-page",
            header { class: "view-header",
                h2 { class: "view-title", "Log in" }
                p { class: "view-subtitle", "Log in to add questions." }
            }
            div { class: "view-divider" }
            form { class: "form", onsubmit: submit,
                label { r#for: "login-username", "Username" }
                input {
                    id: "login-username",
                    r#type: "text",
                    autocomplete: "username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Logging in..." } else { "Log in" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::SourceError;

    #[test]
    fn credential_errors_are_shown_verbatim() {
        assert_eq!(
            login_error_message(&AuthError::InvalidCredentials),
            "Invalid username or password"
        );
        assert_eq!(
            login_error_message(&AuthError::Source(SourceError::NotFound)),
            "Login failed. Please try again."
        );
    }
}
