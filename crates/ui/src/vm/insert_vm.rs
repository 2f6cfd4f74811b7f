use prep_core::catalog::TECHNOLOGIES;
use prep_core::model::{Category, QuestionInput};
use prep_core::parse_batch;

/// Starting text for the batch editor.
pub const SAMPLE_BATCH: &str = r#"[
  {
    "question": "What problem does a connection pool solve?",
    "answer": "It reuses open connections so requests skip the setup cost.",
    "keywords": ["pooling", "latency"],
    "studyTopics": ["databases"],
    "difficulty": "medium"
  }
]"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionOptionVm {
    pub id: &'static str,
    pub label: &'static str,
}

/// Every collection a batch can be inserted into.
#[must_use]
pub fn collection_options() -> Vec<CollectionOptionVm> {
    TECHNOLOGIES
        .iter()
        .map(|tech| CollectionOptionVm {
            id: tech.id,
            label: tech.label,
        })
        .chain(
            [Category::SystemsDesign, Category::Behaviour]
                .into_iter()
                .map(|category| CollectionOptionVm {
                    id: category.as_str(),
                    label: category.label(),
                }),
        )
        .collect()
}

/// Parse the editor text, returning one message per problem.
///
/// # Errors
///
/// Returns the messages to list under the editor.
pub fn check_batch(text: &str) -> Result<Vec<QuestionInput>, Vec<String>> {
    parse_batch(text).map_err(|err| err.messages())
}

#[must_use]
pub fn inserted_message(count: usize, collection: &str) -> String {
    let noun = if count == 1 { "question" } else { "questions" };
    format!("Inserted {count} {noun} into {collection}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_batch_is_valid() {
        let parsed = check_batch(SAMPLE_BATCH).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].study_topics, ["databases"]);
    }

    #[test]
    fn problems_are_numbered() {
        let messages = check_batch(
            r#"[{"question": "Long enough question?", "answer": "Long enough answer text here."},
                {"question": "short", "answer": "Long enough answer text here."}]"#,
        )
        .unwrap_err();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Question 2:"), "{messages:?}");
    }

    #[test]
    fn options_include_fixed_collections() {
        let options = collection_options();
        assert_eq!(options.len(), TECHNOLOGIES.len() + 2);
        assert_eq!(options.last().map(|option| option.id), Some("behaviour"));
        assert_eq!(inserted_message(1, "rust"), "Inserted 1 question into rust.");
    }
}
