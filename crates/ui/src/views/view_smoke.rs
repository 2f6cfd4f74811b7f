use dioxus::prelude::*;
use prep_core::model::{Category, UserPreferences};

use super::QuestionCard;
use super::test_harness::{ViewKind, setup_view_harness, test_services};
use crate::vm::QuestionCardVm;

#[tokio::test(flavor = "current_thread")]
async fn selection_view_lists_categories() {
    let mut harness = setup_view_harness(ViewKind::Selection, test_services());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    for label in ["General", "Systems Design", "Behaviour", "Start practice"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(!html.contains("Session in progress"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn selection_view_offers_resume() {
    let services = test_services();
    services
        .coordinator()
        .create_session(Category::Behaviour, Vec::new())
        .await
        .expect("session");

    let mut harness = setup_view_harness(ViewKind::Selection, services);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Session in progress: Behaviour"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_without_session_links_to_selection() {
    let mut harness = setup_view_harness(ViewKind::Practice, test_services());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("There is no practice session yet."), "{html}");
    assert!(html.contains("Choose a topic"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_shows_first_question() {
    let services = test_services();
    services
        .coordinator()
        .create_session(Category::Behaviour, Vec::new())
        .await
        .expect("session");

    let mut harness = setup_view_harness(ViewKind::Practice, services);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Question 1 of 2"), "{html}");
    assert!(html.contains("Show answer"), "{html}");
    assert!(
        html.contains("conflict with a teammate") || html.contains("project you are proud of"),
        "{html}"
    );
    assert_eq!(
        harness
            .services
            .coordinator()
            .store()
            .accessed_question_count()
            .await,
        1
    );
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_shows_running_timer() {
    let services = test_services();
    services
        .coordinator()
        .create_session(Category::Behaviour, Vec::new())
        .await
        .expect("session");

    let mut harness = setup_view_harness(ViewKind::Practice, services);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("practice-timer"), "{html}");
    assert!(html.contains("00:00"), "{html}");
    assert!(html.contains("Pause"), "{html}");
    assert!(html.contains("difficulty--easy"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_follows_display_preferences() {
    let services = test_services();
    let coordinator = services.coordinator();
    coordinator
        .create_session(Category::Behaviour, Vec::new())
        .await
        .expect("session");
    assert!(
        coordinator
            .save_preferences(&UserPreferences {
                timer_visible: false,
                show_difficulty: false,
                auto_advance_timer: None,
            })
            .await
    );

    let mut harness = setup_view_harness(ViewKind::Practice, services);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Question 1 of 2"), "{html}");
    assert!(!html.contains("practice-timer"), "{html}");
    assert!(!html.contains("difficulty--easy"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn insert_view_requires_login() {
    let mut harness = setup_view_harness(ViewKind::Insert, test_services());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("You need to log in"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn insert_view_shows_editor_when_logged_in() {
    let services = test_services();
    services.auth().login("luis", "hunter22").await.expect("login");

    let mut harness = setup_view_harness(ViewKind::Insert, services);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Signed in as luis"), "{html}");
    assert!(html.contains("Insert questions"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, test_services());
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("login-username"), "{html}");
    assert!(html.contains("Log in"), "{html}");
}

#[test]
fn question_card_hides_answer_until_revealed() {
    let card = QuestionCardVm {
        id: "q-1".into(),
        tag_label: "Behaviour".into(),
        question_html: "<p>Why?</p>".into(),
        answer_html: "<p>Because.</p>".into(),
        difficulty_label: Some("Easy"),
        difficulty_class: "difficulty difficulty--easy",
        keywords: vec!["reasoning".into()],
        study_topics: vec!["logic".into()],
    };

    let hidden = dioxus_ssr::render_element(rsx! {
        QuestionCard { card: card.clone(), revealed: false, show_difficulty: true }
    });
    assert!(hidden.contains("Why?"), "{hidden}");
    assert!(hidden.contains("Easy"), "{hidden}");
    assert!(!hidden.contains("Because."), "{hidden}");

    let shown = dioxus_ssr::render_element(rsx! {
        QuestionCard { card: card.clone(), revealed: true, show_difficulty: true }
    });
    assert!(shown.contains("Because."), "{shown}");
    assert!(shown.contains("reasoning"), "{shown}");
    assert!(shown.contains("Study: logic"), "{shown}");

    let plain = dioxus_ssr::render_element(rsx! {
        QuestionCard { card, revealed: false, show_difficulty: false }
    });
    assert!(!plain.contains("Easy"), "{plain}");
}
