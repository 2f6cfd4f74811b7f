//! In-memory index of the questions loaded for one practice session.
//!
//! Loads replace the whole index. Each load takes a new generation number
//! before fetching and commits only while it is still the latest, so a slow
//! load that finishes after a newer one is discarded.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;

use prep_core::model::{Category, Difficulty, Question, QuestionId};

use crate::Clock;
use crate::question_source::{QuestionQuery, QuestionSource};
use crate::random::{RandomSource, ThreadRandom};

pub const FALLBACK_QUESTION: &str = "Sample question - Unable to load questions at this time.";
pub const FALLBACK_ANSWER: &str = "Please refresh the page and try again. If the problem persists, check your internet connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPhase {
    #[default]
    Empty,
    Loading,
    Ready,
}

/// Result of one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `total` questions indexed; `dropped` records were rejected.
    Ready { total: usize, dropped: usize },
    /// Every fetch failed; a single placeholder was installed instead.
    Degraded { fallback: Question, reason: String },
    /// Every fetch failed; the index is empty.
    Failed { reason: String },
    /// A newer load started before this one finished; nothing was committed.
    Superseded,
}

impl LoadOutcome {
    /// Whether questions can be drawn after this outcome.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, LoadOutcome::Ready { .. } | LoadOutcome::Degraded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Plain,
    Safe,
}

#[derive(Default)]
struct IndexState {
    phase: IndexPhase,
    questions: Vec<Question>,
    by_id: HashMap<QuestionId, usize>,
    by_tag: HashMap<String, Vec<usize>>,
}

impl IndexState {
    fn ready(questions: Vec<Question>) -> Self {
        let mut by_id = HashMap::with_capacity(questions.len());
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, question) in questions.iter().enumerate() {
            by_id.insert(question.id.clone(), position);
            by_tag
                .entry(question.tag.clone())
                .or_default()
                .push(position);
        }
        Self {
            phase: IndexPhase::Ready,
            questions,
            by_id,
            by_tag,
        }
    }
}

pub struct QuestionIndex {
    source: Arc<dyn QuestionSource>,
    clock: Clock,
    random: Mutex<Box<dyn RandomSource>>,
    generation: AtomicU64,
    state: RwLock<IndexState>,
}

impl QuestionIndex {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, clock: Clock) -> Self {
        Self::with_random(source, clock, Box::new(ThreadRandom))
    }

    #[must_use]
    pub fn with_random(
        source: Arc<dyn QuestionSource>,
        clock: Clock,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            source,
            clock,
            random: Mutex::new(random),
            generation: AtomicU64::new(0),
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Load every collection of `category`, dropping undecodable records.
    pub async fn initialize_questions(
        &self,
        category: Category,
        technologies: &[String],
    ) -> LoadOutcome {
        self.load(category, technologies, LoadMode::Plain).await
    }

    /// Like [`Self::initialize_questions`], but also drops records that fail
    /// validation and falls back to a placeholder when nothing could be fetched.
    pub async fn safe_initialize_questions(
        &self,
        category: Category,
        technologies: &[String],
    ) -> LoadOutcome {
        self.load(category, technologies, LoadMode::Safe).await
    }

    async fn load(&self, category: Category, technologies: &[String], mode: LoadMode) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.write_state().phase = IndexPhase::Loading;

        let collections = category.collections(technologies);
        if collections.is_empty() {
            tracing::debug!(%category, "no collections to load");
        }
        let query = QuestionQuery::session_load();
        let results = join_all(
            collections
                .iter()
                .map(|collection| self.source.fetch_collection(collection, &query)),
        )
        .await;

        let mut questions = Vec::new();
        let mut dropped = 0;
        let mut failures = Vec::new();
        for (collection, result) in collections.iter().zip(results) {
            let records = match result {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(%collection, error = %err, "collection fetch failed");
                    failures.push(format!("{collection}: {err}"));
                    continue;
                }
            };
            for record in records {
                match Question::from_value(record) {
                    Ok(question) if mode == LoadMode::Safe && !question.is_valid() => {
                        if let Err(err) = question.validate() {
                            tracing::warn!(%collection, id = %question.id, error = %err, "dropping invalid question");
                        }
                        dropped += 1;
                    }
                    Ok(question) => questions.push(question),
                    Err(err) => {
                        tracing::warn!(%collection, error = %err, "dropping malformed question");
                        dropped += 1;
                    }
                }
            }
        }

        let all_failed = !collections.is_empty() && failures.len() == collections.len();
        let mut state = self.write_state();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(generation, "discarding superseded question load");
            return LoadOutcome::Superseded;
        }

        if !all_failed {
            let total = questions.len();
            *state = IndexState::ready(questions);
            tracing::info!(%category, total, dropped, "questions loaded");
            return LoadOutcome::Ready { total, dropped };
        }

        let reason = failures.join("; ");
        match mode {
            LoadMode::Plain => {
                *state = IndexState::default();
                tracing::error!(%category, %reason, "question load failed");
                LoadOutcome::Failed { reason }
            }
            LoadMode::Safe => {
                let fallback = self.fallback_question(category);
                *state = IndexState::ready(vec![fallback.clone()]);
                tracing::error!(%category, %reason, "question load failed, serving placeholder");
                LoadOutcome::Degraded { fallback, reason }
            }
        }
    }

    fn fallback_question(&self, category: Category) -> Question {
        Question {
            id: QuestionId::new(format!("fallback-{category}-{}", self.clock.now_millis())),
            tag: category.as_str().to_string(),
            question: FALLBACK_QUESTION.to_string(),
            answer: FALLBACK_ANSWER.to_string(),
            keywords: Some(vec!["error handling".into(), "troubleshooting".into()]),
            study_topics: None,
            difficulty: Some(Difficulty::Easy),
            created_by: None,
            created_at: None,
        }
    }

    /// Draw uniformly among loaded questions whose id is not in `exclude`.
    ///
    /// `None` when the index is not ready or every question is excluded.
    pub fn random_question(&self, exclude: &[QuestionId]) -> Option<Question> {
        let state = self.read_state();
        if state.phase != IndexPhase::Ready {
            return None;
        }
        let excluded: HashSet<&QuestionId> = exclude.iter().collect();
        let candidates: Vec<&Question> = state
            .questions
            .iter()
            .filter(|question| !excluded.contains(&question.id))
            .collect();

        let picked = match candidates.as_slice() {
            [] => return None,
            [only] => only,
            _ => {
                let unit = self
                    .random
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .next_unit();
                let len = candidates.len();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let position = ((unit * len as f64).floor() as usize).min(len - 1);
                candidates[position]
            }
        };
        tracing::debug!(id = %picked.id, candidates = candidates.len(), "question drawn");
        Some((*picked).clone())
    }

    #[must_use]
    pub fn question_by_id(&self, id: &QuestionId) -> Option<Question> {
        let state = self.read_state();
        state
            .by_id
            .get(id)
            .and_then(|&position| state.questions.get(position))
            .cloned()
    }

    #[must_use]
    pub fn questions_by_tag(&self, tag: &str) -> Vec<Question> {
        let state = self.read_state();
        state.by_tag.get(tag).map_or_else(Vec::new, |positions| {
            positions
                .iter()
                .filter_map(|&position| state.questions.get(position))
                .cloned()
                .collect()
        })
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.read_state().questions.len()
    }

    #[must_use]
    pub fn available_questions(&self, exclude: &[QuestionId]) -> Vec<Question> {
        let excluded: HashSet<&QuestionId> = exclude.iter().collect();
        self.read_state()
            .questions
            .iter()
            .filter(|question| !excluded.contains(&question.id))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn remaining_question_count(&self, exclude: &[QuestionId]) -> usize {
        let excluded: HashSet<&QuestionId> = exclude.iter().collect();
        self.read_state()
            .questions
            .iter()
            .filter(|question| !excluded.contains(&question.id))
            .count()
    }

    #[must_use]
    pub fn phase(&self) -> IndexPhase {
        self.read_state().phase
    }

    fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
