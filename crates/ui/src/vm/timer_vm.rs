use prep_core::model::UserPreferences;

/// `MM:SS`; minutes keep counting past the hour.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whether the auto-advance limit (if any) has been reached.
#[must_use]
pub fn auto_advance_due(seconds: u64, preferences: &UserPreferences) -> bool {
    preferences
        .auto_advance_timer
        .is_some_and(|limit| limit > 0 && seconds >= u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(9), "00:09");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3_725), "62:05");
    }

    #[test]
    fn auto_advance_only_with_a_limit() {
        let mut preferences = UserPreferences::default();
        assert!(!auto_advance_due(600, &preferences));

        preferences.auto_advance_timer = Some(90);
        assert!(!auto_advance_due(89, &preferences));
        assert!(auto_advance_due(90, &preferences));

        preferences.auto_advance_timer = Some(0);
        assert!(!auto_advance_due(90, &preferences));
    }
}
