use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;

use prep_core::model::{CollectionName, Difficulty, Question};

use crate::error::SourceError;

/// Filters and pagination for fetching one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
    pub tag: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Matches records carrying any of these keywords.
    pub keywords: Vec<String>,
    /// Matches records carrying any of these study topics.
    pub study_topics: Vec<String>,
    pub created_by: Option<String>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

impl QuestionQuery {
    /// Page size used when loading a whole collection for a session.
    pub const SESSION_LIMIT: u32 = 1000;

    #[must_use]
    pub fn session_load() -> Self {
        Self {
            limit: Some(Self::SESSION_LIMIT),
            ..Self::default()
        }
    }

    /// Query-string pairs understood by the question API.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(tag) = &self.tag {
            params.push(("tag", tag.clone()));
        }
        if let Some(difficulty) = self.difficulty {
            params.push(("difficulty", difficulty.as_str().to_string()));
        }
        if !self.keywords.is_empty() {
            params.push(("keywords", self.keywords.join(",")));
        }
        if !self.study_topics.is_empty() {
            params.push(("studyTopics", self.study_topics.join(",")));
        }
        if let Some(created_by) = &self.created_by {
            params.push(("createdBy", created_by.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        params
    }

    /// Whether a raw record passes the filters (pagination aside).
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        let text = |field: &str| record.get(field).and_then(Value::as_str);
        let any_of = |field: &str, wanted: &[String]| {
            wanted.is_empty()
                || record
                    .get(field)
                    .and_then(Value::as_array)
                    .is_some_and(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .any(|item| wanted.iter().any(|w| w == item))
                    })
        };

        self.tag.as_deref().is_none_or(|tag| text("tag") == Some(tag))
            && self
                .difficulty
                .is_none_or(|d| text("difficulty") == Some(d.as_str()))
            && self
                .created_by
                .as_deref()
                .is_none_or(|by| text("createdBy") == Some(by))
            && any_of("keywords", &self.keywords)
            && any_of("studyTopics", &self.study_topics)
    }
}

/// Where question records come from. Records are returned undecoded so the
/// caller can drop malformed entries one by one.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the records of one collection.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport failures, non-success responses or
    /// malformed payloads.
    async fn fetch_collection(
        &self,
        collection: &CollectionName,
        query: &QuestionQuery,
    ) -> Result<Vec<Value>, SourceError>;
}

/// In-memory source serving fixed collections.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    collections: HashMap<CollectionName, Vec<Value>>,
    failing: HashSet<CollectionName>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw records to a collection.
    #[must_use]
    pub fn with_records(mut self, collection: &str, records: Vec<Value>) -> Self {
        self.collections
            .entry(CollectionName::new(collection))
            .or_default()
            .extend(records);
        self
    }

    /// Add decoded questions to a collection.
    #[must_use]
    pub fn with_questions(self, collection: &str, questions: &[Question]) -> Self {
        let records = questions
            .iter()
            .filter_map(|question| serde_json::to_value(question).ok())
            .collect();
        self.with_records(collection, records)
    }

    /// Make every fetch of `collection` fail.
    #[must_use]
    pub fn failing(mut self, collection: &str) -> Self {
        self.failing.insert(CollectionName::new(collection));
        self
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch_collection(
        &self,
        collection: &CollectionName,
        query: &QuestionQuery,
    ) -> Result<Vec<Value>, SourceError> {
        if self.failing.contains(collection) {
            return Err(SourceError::UnknownCollection(collection.to_string()));
        }
        let Some(records) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let skip = query.skip.map_or(0, |skip| skip as usize);
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(records
            .iter()
            .filter(|record| query.matches(record))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}
