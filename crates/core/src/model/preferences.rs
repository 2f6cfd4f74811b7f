use serde::{Deserialize, Serialize};

/// Display preferences for the practice view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub timer_visible: bool,
    pub show_difficulty: bool,
    /// Seconds before moving to the next question automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance_timer: Option<u32>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            timer_visible: true,
            show_difficulty: true,
            auto_advance_timer: None,
        }
    }
}
