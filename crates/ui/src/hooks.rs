use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use prep_core::model::{Question, SessionData, UserPreferences};
use services::{LoadOutcome, NextQuestion, PracticeCoordinator, PracticeProgress};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::load_notice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeStatus {
    Idle,
    Loading,
    Ready,
    Exhausted,
    NoSession,
    Error(ViewError),
}

/// Reactive handle over the practice coordinator.
///
/// Every call runs on a spawned task and refreshes the signals when done.
#[derive(Clone)]
pub struct PracticeSession {
    coordinator: Arc<PracticeCoordinator>,
    pub session: Signal<Option<SessionData>>,
    pub question: Signal<Option<Question>>,
    pub revealed: Signal<bool>,
    pub progress: Signal<PracticeProgress>,
    pub status: Signal<PracticeStatus>,
    pub notice: Signal<Option<String>>,
    /// A draw is in flight; further `next` calls are ignored.
    pub busy: Signal<bool>,
}

impl PartialEq for PracticeSession {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.coordinator, &other.coordinator)
            && self.session == other.session
            && self.status == other.status
    }
}

pub fn use_practice_session() -> PracticeSession {
    let ctx = use_context::<AppContext>();
    let session = use_signal(|| None::<SessionData>);
    let question = use_signal(|| None::<Question>);
    let revealed = use_signal(|| false);
    let progress = use_signal(PracticeProgress::default);
    let status = use_signal(|| PracticeStatus::Idle);
    let notice = use_signal(|| None::<String>);
    let busy = use_signal(|| false);

    use_hook(|| PracticeSession {
        coordinator: ctx.coordinator(),
        session,
        question,
        revealed,
        progress,
        status,
        notice,
        busy,
    })
}

impl PracticeSession {
    /// Load the stored session and its questions, resuming the current
    /// question when it is still available.
    pub fn load(&self) {
        let handle = self.clone();
        spawn(async move {
            handle.load_now().await;
        });
    }

    pub fn next(&self) {
        if *self.busy.peek() {
            return;
        }
        let mut busy = self.busy;
        busy.set(true);
        let handle = self.clone();
        spawn(async move {
            handle.next_now().await;
            let mut busy = handle.busy;
            busy.set(false);
        });
    }

    pub fn reveal(&self) {
        let mut revealed = self.revealed;
        revealed.set(true);
    }

    /// Start a fresh session with the same selection.
    pub fn restart(&self) {
        let handle = self.clone();
        spawn(async move {
            let Some(current) = handle.coordinator.session() else {
                handle.set_status(PracticeStatus::NoSession);
                return;
            };
            let created = handle
                .coordinator
                .create_session(
                    current.selected_category(),
                    current.selected_technologies().to_vec(),
                )
                .await;
            if created.is_none() {
                handle.set_status(PracticeStatus::Error(ViewError::StorageUnavailable));
                return;
            }
            handle.load_now().await;
        });
    }

    pub fn clear(&self) {
        let handle = self.clone();
        spawn(async move {
            handle.coordinator.clear_session().await;
            let mut question = handle.question;
            question.set(None);
            handle.refresh();
            handle.set_status(PracticeStatus::NoSession);
        });
    }

    async fn load_now(&self) {
        self.set_status(PracticeStatus::Loading);
        let mut notice = self.notice;
        let Some(outcome) = self.coordinator.start_practice().await else {
            self.refresh();
            self.set_status(PracticeStatus::NoSession);
            return;
        };
        match &outcome {
            LoadOutcome::Superseded => return,
            LoadOutcome::Failed { .. } => {
                notice.set(load_notice(&outcome));
                self.refresh();
                self.set_status(PracticeStatus::Error(ViewError::ServiceUnavailable));
                return;
            }
            LoadOutcome::Ready { .. } | LoadOutcome::Degraded { .. } => {
                notice.set(load_notice(&outcome));
            }
        }

        if let Some(current) = self.coordinator.current_question() {
            let mut question = self.question;
            question.set(Some(current));
            self.refresh();
            self.set_status(PracticeStatus::Ready);
        } else {
            self.next_now().await;
        }
    }

    async fn next_now(&self) {
        let mut question = self.question;
        let mut revealed = self.revealed;
        revealed.set(false);
        let status = match self.coordinator.next_question().await {
            NextQuestion::Question(next) => {
                question.set(Some(next));
                PracticeStatus::Ready
            }
            NextQuestion::Exhausted => {
                question.set(None);
                PracticeStatus::Exhausted
            }
            NextQuestion::NotLoaded => PracticeStatus::Loading,
            NextQuestion::NoSession => {
                question.set(None);
                PracticeStatus::NoSession
            }
        };
        self.refresh();
        self.set_status(status);
    }

    fn refresh(&self) {
        let mut session = self.session;
        let mut progress = self.progress;
        session.set(self.coordinator.session());
        progress.set(self.coordinator.progress());
    }

    fn set_status(&self, next: PracticeStatus) {
        let mut status = self.status;
        status.set(next);
    }
}

const TICK: Duration = Duration::from_secs(1);

/// Per-question stopwatch, counting whole seconds while running.
#[derive(Clone, Copy, PartialEq)]
pub struct PracticeTimer {
    pub seconds: Signal<u64>,
    pub running: Signal<bool>,
}

pub fn use_practice_timer() -> PracticeTimer {
    let mut seconds = use_signal(|| 0_u64);
    let running = use_signal(|| false);

    use_future(move || async move {
        loop {
            tokio::time::sleep(TICK).await;
            if *running.peek() {
                *seconds.write() += 1;
            }
        }
    });

    PracticeTimer { seconds, running }
}

impl PracticeTimer {
    pub fn start(mut self) {
        self.running.set(true);
    }

    pub fn pause(mut self) {
        self.running.set(false);
    }

    /// Back to zero and stopped.
    pub fn reset(mut self) {
        self.seconds.set(0);
        self.running.set(false);
    }

    /// Back to zero and running, for a freshly shown question.
    pub fn restart(mut self) {
        self.seconds.set(0);
        self.running.set(true);
    }
}

/// Display preferences, loaded once and saved back on every change.
#[derive(Clone)]
pub struct DisplayPreferences {
    coordinator: Arc<PracticeCoordinator>,
    pub current: Signal<UserPreferences>,
}

impl PartialEq for DisplayPreferences {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.coordinator, &other.coordinator) && self.current == other.current
    }
}

pub fn use_display_preferences() -> DisplayPreferences {
    let ctx = use_context::<AppContext>();
    let mut current = use_signal(UserPreferences::default);

    let coordinator = ctx.coordinator();
    use_hook(move || {
        spawn(async move {
            current.set(coordinator.preferences().await);
        });
    });

    use_hook(|| DisplayPreferences {
        coordinator: ctx.coordinator(),
        current,
    })
}

impl DisplayPreferences {
    pub fn update(&self, change: impl FnOnce(&mut UserPreferences)) {
        let mut current = self.current;
        change(&mut current.write());
        let next = current.peek().clone();
        let coordinator = Arc::clone(&self.coordinator);
        spawn(async move {
            if !coordinator.save_preferences(&next).await {
                tracing::warn!("display preferences not saved");
            }
        });
    }
}
