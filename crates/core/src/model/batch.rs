//! Validation for pasted question batches before they are inserted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::model::{Difficulty, MIN_ANSWER_LEN, MIN_QUESTION_LEN};

/// One question as submitted for insertion. The tag comes from the target
/// collection, never from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub study_topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Fields the server fills in; submitting them is rejected.
pub const FORBIDDEN_FIELDS: [&str; 6] =
    ["id", "tag", "createdAt", "updatedAt", "createdBy", "_id"];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BatchIssue {
    #[error("entry must be a JSON object")]
    NotAnObject,
    #[error("'question' field is required and must be at least 10 characters")]
    QuestionTooShort,
    #[error("'answer' field is required and must be at least 20 characters")]
    AnswerTooShort,
    #[error("'keywords' must be an array")]
    KeywordsNotArray,
    #[error("all 'keywords' must be strings")]
    KeywordsNotStrings,
    #[error("'studyTopics' must be an array")]
    StudyTopicsNotArray,
    #[error("all 'studyTopics' must be strings")]
    StudyTopicsNotStrings,
    #[error("'difficulty' must be 'easy', 'medium', or 'hard'")]
    InvalidDifficulty,
    #[error("'{0}' field is not allowed (auto-generated)")]
    ForbiddenField(&'static str),
}

/// A rule broken by one entry; `position` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchError {
    pub position: usize,
    pub issue: BatchIssue,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question {}: {}", self.position, self.issue)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BatchValidationError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("JSON must be an array of questions")]
    NotAnArray,
    #[error("questions array must not be empty")]
    Empty,
    #[error("validation failed for {} question(s)", .0.len())]
    Invalid(Vec<BatchError>),
}

impl BatchValidationError {
    /// Human-readable lines, one per problem.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            BatchValidationError::Invalid(errors) => {
                errors.iter().map(ToString::to_string).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// Parse pasted text and validate every entry.
///
/// # Errors
///
/// Returns `BatchValidationError` if the text is not a JSON array, the array is
/// empty, or any entry breaks a rule.
pub fn parse_batch(text: &str) -> Result<Vec<QuestionInput>, BatchValidationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| BatchValidationError::InvalidJson(err.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(BatchValidationError::NotAnArray);
    };
    validate_batch(&entries)
}

/// Validate already-parsed entries, reporting every problem of every entry.
///
/// # Errors
///
/// Returns `BatchValidationError::Empty` for an empty batch and
/// `BatchValidationError::Invalid` with every broken rule otherwise.
pub fn validate_batch(entries: &[Value]) -> Result<Vec<QuestionInput>, BatchValidationError> {
    if entries.is_empty() {
        return Err(BatchValidationError::Empty);
    }

    let mut accepted = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Ok(input) => accepted.push(input),
            Err(issues) => errors.extend(issues.into_iter().map(|issue| BatchError {
                position: idx + 1,
                issue,
            })),
        }
    }

    if errors.is_empty() {
        Ok(accepted)
    } else {
        Err(BatchValidationError::Invalid(errors))
    }
}

fn validate_entry(entry: &Value) -> Result<QuestionInput, Vec<BatchIssue>> {
    let Value::Object(fields) = entry else {
        return Err(vec![BatchIssue::NotAnObject]);
    };
    let mut issues = Vec::new();

    let question = text_field(fields.get("question"), MIN_QUESTION_LEN);
    if question.is_none() {
        issues.push(BatchIssue::QuestionTooShort);
    }
    let answer = text_field(fields.get("answer"), MIN_ANSWER_LEN);
    if answer.is_none() {
        issues.push(BatchIssue::AnswerTooShort);
    }
    let keywords = list_field(fields.get("keywords")).unwrap_or_else(|issue| {
        issues.push(issue.keywords());
        Vec::new()
    });
    let study_topics = list_field(fields.get("studyTopics")).unwrap_or_else(|issue| {
        issues.push(issue.study_topics());
        Vec::new()
    });

    let difficulty = match fields.get("difficulty") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.is_empty() => None,
        Some(Value::String(raw)) => raw.parse::<Difficulty>().ok().or_else(|| {
            issues.push(BatchIssue::InvalidDifficulty);
            None
        }),
        Some(_) => {
            issues.push(BatchIssue::InvalidDifficulty);
            None
        }
    };

    issues.extend(
        FORBIDDEN_FIELDS
            .into_iter()
            .filter(|field| fields.contains_key(*field))
            .map(BatchIssue::ForbiddenField),
    );

    match (question, answer) {
        (Some(question), Some(answer)) if issues.is_empty() => Ok(QuestionInput {
            question,
            answer,
            keywords,
            study_topics,
            difficulty,
        }),
        _ => Err(issues),
    }
}

fn text_field(value: Option<&Value>, min_len: usize) -> Option<String> {
    match value {
        Some(Value::String(text)) if text.chars().count() >= min_len => Some(text.clone()),
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum ListIssue {
    NotArray,
    NotStrings,
}

impl ListIssue {
    fn keywords(self) -> BatchIssue {
        match self {
            ListIssue::NotArray => BatchIssue::KeywordsNotArray,
            ListIssue::NotStrings => BatchIssue::KeywordsNotStrings,
        }
    }

    fn study_topics(self) -> BatchIssue {
        match self {
            ListIssue::NotArray => BatchIssue::StudyTopicsNotArray,
            ListIssue::NotStrings => BatchIssue::StudyTopicsNotStrings,
        }
    }
}

// Absent or null lists are empty.
fn list_field(value: Option<&Value>) -> Result<Vec<String>, ListIssue> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(ListIssue::NotStrings),
        Some(_) => Err(ListIssue::NotArray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> Value {
        json!({
            "question": "Explain the CAP theorem.",
            "answer": "A distributed store can guarantee at most two of C, A and P.",
            "keywords": ["distributed systems"],
            "difficulty": "hard"
        })
    }

    #[test]
    fn accepts_well_formed_entries() {
        let inputs = validate_batch(&[entry()]).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].difficulty, Some(Difficulty::Hard));
        assert!(inputs[0].study_topics.is_empty());
    }

    #[test]
    fn rejects_empty_batch() {
        assert_eq!(validate_batch(&[]), Err(BatchValidationError::Empty));
    }

    #[test]
    fn reports_each_failing_entry_with_position() {
        let mut tagged = entry();
        tagged["tag"] = json!("rust");
        let mut short = entry();
        short["answer"] = json!("too short");

        let err = validate_batch(&[entry(), tagged, short]).unwrap_err();
        assert_eq!(
            err,
            BatchValidationError::Invalid(vec![
                BatchError {
                    position: 2,
                    issue: BatchIssue::ForbiddenField("tag")
                },
                BatchError {
                    position: 3,
                    issue: BatchIssue::AnswerTooShort
                },
            ])
        );
        assert_eq!(
            err.messages()[0],
            "Question 2: 'tag' field is not allowed (auto-generated)"
        );
    }

    #[test]
    fn rejects_non_array_lists_and_unknown_difficulty() {
        let mut keywords = entry();
        keywords["keywords"] = json!("cap");
        let mut difficulty = entry();
        difficulty["difficulty"] = json!("extreme");

        let err = validate_batch(&[keywords, difficulty]).unwrap_err();
        let BatchValidationError::Invalid(errors) = err else {
            panic!("expected invalid entries");
        };
        assert_eq!(errors[0].issue, BatchIssue::KeywordsNotArray);
        assert_eq!(errors[1].issue, BatchIssue::InvalidDifficulty);
    }

    #[test]
    fn lists_every_issue_of_one_entry() {
        let bad = json!({
            "id": "abc",
            "_id": "65f0c",
            "question": "Short?",
            "keywords": ["ok", 3],
            "createdBy": "someone",
            "difficulty": "extreme"
        });

        let err = validate_batch(&[bad]).unwrap_err();
        let BatchValidationError::Invalid(errors) = err else {
            panic!("expected invalid entries");
        };
        let issues: Vec<BatchIssue> = errors.iter().map(|error| error.issue).collect();
        assert_eq!(
            issues,
            [
                BatchIssue::QuestionTooShort,
                BatchIssue::AnswerTooShort,
                BatchIssue::KeywordsNotStrings,
                BatchIssue::InvalidDifficulty,
                BatchIssue::ForbiddenField("id"),
                BatchIssue::ForbiddenField("createdBy"),
                BatchIssue::ForbiddenField("_id"),
            ]
        );
        assert!(errors.iter().all(|error| error.position == 1));
    }

    #[test]
    fn server_managed_fields_are_rejected() {
        for field in ["createdAt", "updatedAt"] {
            let mut stamped = entry();
            stamped[field] = json!("2024-01-01T00:00:00Z");
            let err = validate_batch(&[stamped]).unwrap_err();
            assert_eq!(
                err.messages(),
                [format!("Question 1: '{field}' field is not allowed (auto-generated)")]
            );
        }
    }

    #[test]
    fn parse_batch_requires_an_array() {
        assert_eq!(
            parse_batch("{\"question\": \"x\"}"),
            Err(BatchValidationError::NotAnArray)
        );
        assert!(matches!(
            parse_batch("not json"),
            Err(BatchValidationError::InvalidJson(_))
        ));
    }
}
