use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::hooks::{
    PracticeStatus, PracticeTimer, use_display_preferences, use_practice_session,
    use_practice_timer,
};
use crate::routes::Route;
use crate::vm::{
    QuestionCardVm, auto_advance_due, exhausted_message, format_elapsed, map_question_card,
    progress_label, session_title,
};

#[component]
pub fn PracticeView() -> Element {
    let practice = use_practice_session();
    let navigator = use_navigator();
    let timer = use_practice_timer();
    let display = use_display_preferences();

    let loader = practice.clone();
    use_hook(move || loader.load());

    // every newly shown question starts its own clock
    let shown = practice.question;
    use_effect(move || {
        if shown.read().is_some() {
            timer.restart();
        } else {
            timer.reset();
        }
    });

    let advance = practice.clone();
    let preferences = display.current;
    use_effect(move || {
        let elapsed = (timer.seconds)();
        if auto_advance_due(elapsed, &preferences.read())
            && *advance.status.peek() == PracticeStatus::Ready
        {
            advance.next();
        }
    });

    let status = (practice.status)();
    let progress = (practice.progress)();
    let title = practice
        .session
        .read()
        .as_ref()
        .map_or_else(|| "Practice".to_string(), session_title);
    let card = practice.question.read().as_ref().map(map_question_card);
    let revealed = (practice.revealed)();
    let notice = (practice.notice)();
    let busy = (practice.busy)();
    let prefs = (display.current)();

    let next = practice.clone();
    let reveal = practice.clone();
    let restart = practice.clone();
    let change = practice.clone();
    let retry = practice.clone();
    let toggle_timer = display.clone();
    let toggle_difficulty = display.clone();

    rsx! {
        div { class: "page practice-page",
            header { class: "view-header practice-header",
                div {
                    h2 { class: "view-title", "{title}" }
                    if status == PracticeStatus::Ready || status == PracticeStatus::Exhausted {
                        p { class: "view-subtitle", "{progress_label(progress)}" }
                    }
                }
                if prefs.timer_visible && status == PracticeStatus::Ready {
                    TimerBar { timer }
                }
            }
            div { class: "display-options",
                label {
                    input {
                        r#type: "checkbox",
                        checked: prefs.timer_visible,
                        onchange: move |_| {
                            toggle_timer.update(|next| next.timer_visible = !next.timer_visible);
                        },
                    }
                    "Show timer"
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: prefs.show_difficulty,
                        onchange: move |_| {
                            toggle_difficulty
                                .update(|next| next.show_difficulty = !next.show_difficulty);
                        },
                    }
                    "Show difficulty"
                }
            }
            div { class: "view-divider" }
            if let Some(text) = notice {
                p { class: "notice", "{text}" }
            }
            match status {
                PracticeStatus::Idle | PracticeStatus::Loading => rsx! {
                    p { "Loading questions..." }
                },
                PracticeStatus::NoSession => rsx! {
                    div { class: "empty-state",
                        p { "There is no practice session yet." }
                        Link { to: Route::Selection {}, class: "btn btn-primary", "Choose a topic" }
                    }
                },
                PracticeStatus::Error(err) => rsx! {
                    div { class: "empty-state",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| retry.load(),
                            "Retry"
                        }
                    }
                },
                PracticeStatus::Exhausted => rsx! {
                    div { class: "empty-state",
                        p { "{exhausted_message(progress)}" }
                        div { class: "actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| restart.restart(),
                                "Start over"
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    change.clear();
                                    let _ = navigator.push(Route::Selection {});
                                },
                                "Change topic"
                            }
                        }
                    }
                },
                PracticeStatus::Ready => rsx! {
                    if let Some(card) = card {
                        QuestionCard { card, revealed, show_difficulty: prefs.show_difficulty }
                    }
                    div { class: "actions",
                        if !revealed {
                            button {
                                id: "practice-reveal",
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| reveal.reveal(),
                                "Show answer"
                            }
                        }
                        button {
                            id: "practice-next",
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| next.next(),
                            "Next question"
                        }
                    }
                },
            }
        }
    }
}

/// Elapsed time for the current question with start/pause and reset.
#[component]
pub fn TimerBar(timer: PracticeTimer) -> Element {
    let elapsed = format_elapsed((timer.seconds)());
    let running = (timer.running)();

    rsx! {
        div { id: "practice-timer", class: "timer",
            span { class: "timer-clock", "{elapsed}" }
            if running {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| timer.pause(),
                    "Pause"
                }
            } else {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| timer.start(),
                    "Start"
                }
            }
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| timer.reset(),
                "Reset"
            }
        }
    }
}

/// Question text, metadata and (once revealed) the answer.
#[component]
pub fn QuestionCard(card: QuestionCardVm, revealed: bool, show_difficulty: bool) -> Element {
    let study = card.study_topics.join(", ");
    rsx! {
        article { class: "question-card",
            div { class: "question-meta",
                span { class: "question-tag", "{card.tag_label}" }
                if let Some(label) = card.difficulty_label.filter(|_| show_difficulty) {
                    span { class: "{card.difficulty_class}", "{label}" }
                }
            }
            div { class: "question-text", dangerous_inner_html: "{card.question_html}" }
            if revealed {
                section { class: "question-answer",
                    h4 { "Answer" }
                    div { dangerous_inner_html: "{card.answer_html}" }
                    if !card.keywords.is_empty() {
                        ul { class: "pill-list",
                            for keyword in card.keywords.iter() {
                                li { class: "pill", "{keyword}" }
                            }
                        }
                    }
                    if !study.is_empty() {
                        p { class: "study-topics", "Study: {study}" }
                    }
                }
            }
        }
    }
}
