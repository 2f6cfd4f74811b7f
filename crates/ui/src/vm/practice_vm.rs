use prep_core::catalog::technology_label;
use prep_core::model::{Category, Question, SessionData};
use services::{LoadOutcome, PracticeProgress};

use super::markdown_vm::markdown_to_html;

/// Display-ready form of one question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub id: String,
    pub tag_label: String,
    pub question_html: String,
    pub answer_html: String,
    pub difficulty_label: Option<&'static str>,
    pub difficulty_class: &'static str,
    pub keywords: Vec<String>,
    pub study_topics: Vec<String>,
}

#[must_use]
pub fn map_question_card(question: &Question) -> QuestionCardVm {
    let difficulty_class = match question.difficulty {
        Some(difficulty) => match difficulty.as_str() {
            "easy" => "difficulty difficulty--easy",
            "medium" => "difficulty difficulty--medium",
            _ => "difficulty difficulty--hard",
        },
        None => "difficulty",
    };
    QuestionCardVm {
        id: question.id.to_string(),
        tag_label: tag_label(&question.tag),
        question_html: markdown_to_html(&question.question),
        answer_html: markdown_to_html(&question.answer),
        difficulty_label: question.difficulty.map(|difficulty| difficulty.label()),
        difficulty_class,
        keywords: question.keywords().to_vec(),
        study_topics: question.study_topics().to_vec(),
    }
}

fn tag_label(tag: &str) -> String {
    if let Ok(category) = tag.parse::<Category>() {
        return category.label().to_string();
    }
    technology_label(tag).to_string()
}

/// Heading for the practice page, e.g. "General: Rust, Docker".
#[must_use]
pub fn session_title(session: &SessionData) -> String {
    let category = session.selected_category();
    if !category.uses_technologies() {
        return category.label().to_string();
    }
    let techs = session
        .selected_technologies()
        .iter()
        .map(|tech| technology_label(tech).to_string())
        .collect::<Vec<_>>();
    if techs.is_empty() {
        return category.label().to_string();
    }
    format!("{}: {}", category.label(), techs.join(", "))
}

#[must_use]
pub fn progress_label(progress: PracticeProgress) -> String {
    if progress.total == 0 {
        return "No questions loaded".to_string();
    }
    let seen = progress.total - progress.remaining;
    format!("Question {seen} of {}", progress.total)
}

/// Banner shown after loading, if the load was not clean.
#[must_use]
pub fn load_notice(outcome: &LoadOutcome) -> Option<String> {
    match outcome {
        LoadOutcome::Ready { total: 0, .. } => {
            Some("No questions are available for this selection yet.".to_string())
        }
        LoadOutcome::Ready { dropped: 0, .. } | LoadOutcome::Superseded => None,
        LoadOutcome::Ready { dropped, .. } => Some(format!(
            "{dropped} incomplete question{} skipped.",
            if *dropped == 1 { " was" } else { "s were" }
        )),
        LoadOutcome::Degraded { .. } => Some(
            "Questions could not be loaded. Showing a placeholder until the connection recovers."
                .to_string(),
        ),
        LoadOutcome::Failed { .. } => Some("Questions could not be loaded.".to_string()),
    }
}

#[must_use]
pub fn exhausted_message(progress: PracticeProgress) -> String {
    match progress.total {
        0 => "There are no questions to practice.".to_string(),
        1 => "You have gone through the only question in this session.".to_string(),
        total => format!("You have gone through all {total} questions in this session."),
    }
}
