use serde::{Deserialize, Serialize};

use crate::model::{Category, QuestionId, SessionId};

/// One user's in-progress practice run, as persisted in the local store.
///
/// `accessed_question_ids` keeps draw order and never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    selected_category: Category,
    selected_technologies: Vec<String>,
    accessed_question_ids: Vec<QuestionId>,
    session_start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_question_id: Option<QuestionId>,
    session_id: SessionId,
}

impl SessionData {
    /// Start a fresh session record.
    ///
    /// Technologies only apply to `Category::General`; they are dropped for
    /// the other categories. An empty list for `General` is accepted here and
    /// rejected later by [`SessionData::is_valid`].
    #[must_use]
    pub fn new(
        category: Category,
        technologies: Vec<String>,
        started_at_millis: i64,
        session_id: SessionId,
    ) -> Self {
        let selected_technologies = if category.uses_technologies() {
            technologies
        } else {
            Vec::new()
        };
        Self {
            selected_category: category,
            selected_technologies,
            accessed_question_ids: Vec::new(),
            session_start_time: started_at_millis,
            current_question_id: None,
            session_id,
        }
    }

    #[must_use]
    pub fn selected_category(&self) -> Category {
        self.selected_category
    }

    #[must_use]
    pub fn selected_technologies(&self) -> &[String] {
        &self.selected_technologies
    }

    #[must_use]
    pub fn accessed_question_ids(&self) -> &[QuestionId] {
        &self.accessed_question_ids
    }

    #[must_use]
    pub fn session_start_time(&self) -> i64 {
        self.session_start_time
    }

    #[must_use]
    pub fn current_question_id(&self) -> Option<&QuestionId> {
        self.current_question_id.as_ref()
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn has_accessed(&self, id: &QuestionId) -> bool {
        self.accessed_question_ids.contains(id)
    }

    #[must_use]
    pub fn accessed_count(&self) -> usize {
        self.accessed_question_ids.len()
    }

    /// Gate for entering the practice flow.
    ///
    /// Requires a session id and start time, plus at least one technology for
    /// `General` sessions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let has_required_fields = !self.session_id.is_empty() && self.session_start_time != 0;
        if self.selected_category == Category::General {
            return has_required_fields && !self.selected_technologies.is_empty();
        }
        has_required_fields
    }

    /// Record a drawn question: append it if absent and make it current.
    ///
    /// Returns `true` if the id was newly appended.
    pub fn record_access(&mut self, id: QuestionId) -> bool {
        let appended = if self.has_accessed(&id) {
            false
        } else {
            self.accessed_question_ids.push(id.clone());
            true
        };
        self.current_question_id = Some(id);
        appended
    }

    /// Shallow merge: every field present in `patch` replaces the current one.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(category) = patch.selected_category {
            self.selected_category = category;
        }
        if let Some(technologies) = patch.selected_technologies {
            self.selected_technologies = technologies;
        }
        if let Some(ids) = patch.accessed_question_ids {
            self.accessed_question_ids = ids;
        }
        if let Some(started) = patch.session_start_time {
            self.session_start_time = started;
        }
        if let Some(current) = patch.current_question_id {
            self.current_question_id = Some(current);
        }
        if let Some(session_id) = patch.session_id {
            self.session_id = session_id;
        }
    }
}

/// Partial update for a [`SessionData`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub selected_category: Option<Category>,
    pub selected_technologies: Option<Vec<String>>,
    pub accessed_question_ids: Option<Vec<QuestionId>>,
    pub session_start_time: Option<i64>,
    pub current_question_id: Option<QuestionId>,
    pub session_id: Option<SessionId>,
}

impl SessionPatch {
    #[must_use]
    pub fn technologies(technologies: Vec<String>) -> Self {
        Self {
            selected_technologies: Some(technologies),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn current_question(id: QuestionId) -> Self {
        Self {
            current_question_id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(category: Category, technologies: &[&str]) -> SessionData {
        SessionData::new(
            category,
            technologies.iter().map(ToString::to_string).collect(),
            1_700_000_000_000,
            SessionId::from_parts(1_700_000_000_000, "abc123"),
        )
    }

    #[test]
    fn general_without_technologies_is_created_but_invalid() {
        let data = session(Category::General, &[]);
        assert!(data.selected_technologies().is_empty());
        assert!(!data.is_valid());
    }

    #[test]
    fn technologies_are_dropped_for_fixed_categories() {
        let data = session(Category::SystemsDesign, &["python"]);
        assert!(data.selected_technologies().is_empty());
        assert!(data.is_valid());
    }

    #[test]
    fn record_access_is_idempotent() {
        let mut data = session(Category::Behaviour, &[]);
        assert!(data.record_access(QuestionId::new("a")));
        assert!(!data.record_access(QuestionId::new("a")));
        assert_eq!(data.accessed_question_ids(), [QuestionId::new("a")]);
        assert_eq!(data.current_question_id(), Some(&QuestionId::new("a")));
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut data = session(Category::General, &["rust"]);
        let before = data.clone();
        data.apply(SessionPatch::technologies(vec!["go".into(), "gin".into()]));

        assert_eq!(data.selected_technologies(), ["go", "gin"]);
        assert_eq!(data.session_id(), before.session_id());
        assert_eq!(data.session_start_time(), before.session_start_time());
    }

    #[test]
    fn missing_start_time_is_invalid() {
        let mut data = session(Category::Behaviour, &[]);
        data.apply(SessionPatch {
            session_start_time: Some(0),
            ..SessionPatch::default()
        });
        assert!(!data.is_valid());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let data = session(Category::General, &["rust"]);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["selectedCategory"], "general");
        assert_eq!(value["sessionId"], "ses_1700000000000_abc123");
        assert!(value.get("currentQuestionId").is_none());

        let back: SessionData = serde_json::from_value(value).unwrap();
        assert_eq!(back, data);
    }
}
