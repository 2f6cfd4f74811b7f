use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use prep_core::time::fixed_clock;
use serde_json::json;
use services::{AppServices, StaticCredentials, StaticQuestionSource};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{InsertView, LoginView, PracticeView, SelectionView};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Selection,
    Practice,
    Login,
    Insert,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Selection => rsx! { SelectionView {} },
        ViewKind::Practice => rsx! { PracticeView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Insert => rsx! { InsertView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: Arc<AppServices>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks and resources finish, re-rendering in between.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn question_record(id: &str, question: &str) -> serde_json::Value {
    json!({
        "id": id,
        "tag": "behaviour",
        "question": question,
        "answer": "Explain the situation, what you did, and the outcome.",
        "keywords": ["communication"],
        "difficulty": "easy"
    })
}

/// Services over in-memory storage with two behaviour questions and one
/// known user (`luis` / `hunter22`).
#[must_use]
pub fn test_services() -> Arc<AppServices> {
    let source = StaticQuestionSource::new().with_records(
        "behaviour",
        vec![
            question_record("b1", "Tell me about a conflict with a teammate."),
            question_record("b2", "Describe a project you are proud of."),
        ],
    );
    Arc::new(AppServices::from_parts(
        &Storage::in_memory(),
        Arc::new(source),
        Arc::new(StaticCredentials::new().with_user("luis", "hunter22")),
        fixed_clock(),
    ))
}

pub fn setup_view_harness(view: ViewKind, services: Arc<AppServices>) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::clone(&services),
            view,
        },
    );
    ViewHarness { dom, services }
}
