use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::QuestionId;

/// Minimum length (in characters) of a question prompt.
pub const MIN_QUESTION_LEN: usize = 10;
/// Minimum length (in characters) of an answer.
pub const MIN_ANSWER_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuestionError::UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("malformed question record: {0}")]
    Malformed(String),

    #[error("question id cannot be empty")]
    EmptyId,

    #[error("tag cannot be empty")]
    EmptyTag,

    #[error("question must be at least 10 characters (got {len})")]
    QuestionTooShort { len: usize },

    #[error("answer must be at least 20 characters (got {len})")]
    AnswerTooShort { len: usize },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// A practice question as served by the question API.
///
/// Document fields not listed here (store ids, update stamps) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub tag: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Decode one raw record.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Malformed` when required fields are missing or
    /// have the wrong shape (e.g. `keywords` that is not an array).
    pub fn from_value(value: serde_json::Value) -> Result<Self, QuestionError> {
        serde_json::from_value(value).map_err(|err| QuestionError::Malformed(err.to_string()))
    }

    /// Check the content rules a record must meet to be shown.
    ///
    /// # Errors
    ///
    /// Returns the first rule the record breaks.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.id.is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if self.tag.is_empty() {
            return Err(QuestionError::EmptyTag);
        }
        let len = self.question.chars().count();
        if len < MIN_QUESTION_LEN {
            return Err(QuestionError::QuestionTooShort { len });
        }
        let len = self.answer.chars().count();
        if len < MIN_ANSWER_LEN {
            return Err(QuestionError::AnswerTooShort { len });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn study_topics(&self) -> &[String] {
        self.study_topics.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "_id": "65a0c0ffee",
            "id": "q-1",
            "tag": "rust",
            "question": "What does the borrow checker enforce?",
            "answer": "Aliasing XOR mutability, checked at compile time.",
            "keywords": ["ownership", "borrowing"],
            "difficulty": "medium",
            "createdBy": "luis",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z"
        })
    }

    #[test]
    fn decodes_api_record_ignoring_extra_fields() {
        let question = Question::from_value(record()).unwrap();
        assert_eq!(question.id, QuestionId::new("q-1"));
        assert_eq!(question.difficulty, Some(Difficulty::Medium));
        assert_eq!(question.keywords(), ["ownership", "borrowing"]);
        assert!(question.study_topics().is_empty());
        assert!(question.created_at.is_some());
        assert!(question.is_valid());
    }

    #[test]
    fn keywords_must_be_an_array() {
        let mut value = record();
        value["keywords"] = json!("ownership");
        assert!(matches!(
            Question::from_value(value),
            Err(QuestionError::Malformed(_))
        ));
    }

    #[test]
    fn short_answer_fails_validation() {
        let mut question = Question::from_value(record()).unwrap();
        question.answer = "short".into();
        assert_eq!(
            question.validate(),
            Err(QuestionError::AnswerTooShort { len: 5 })
        );
    }

    #[test]
    fn empty_id_and_tag_fail_validation() {
        let mut question = Question::from_value(record()).unwrap();
        question.tag = String::new();
        assert_eq!(question.validate(), Err(QuestionError::EmptyTag));
        question.id = QuestionId::new("");
        assert_eq!(question.validate(), Err(QuestionError::EmptyId));
    }

    #[test]
    fn difficulty_parses_lowercase_only() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("Hard".parse::<Difficulty>().is_err());
    }
}
