/// Aggregated view of practice progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PracticeProgress {
    /// Questions already shown in this session.
    pub answered: usize,
    /// Questions loaded for the session.
    pub total: usize,
    pub remaining: usize,
}

impl PracticeProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.remaining == 0
    }

    /// Share of loaded questions already shown, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = (self.total - self.remaining) as f64 / self.total as f64;
        fraction.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_progress_is_not_complete() {
        let progress = PracticeProgress::default();
        assert!(!progress.is_complete());
        assert!(progress.fraction().abs() < f64::EPSILON);
    }

    #[test]
    fn fraction_tracks_remaining() {
        let progress = PracticeProgress {
            answered: 3,
            total: 4,
            remaining: 1,
        };
        assert!((progress.fraction() - 0.75).abs() < f64::EPSILON);
        assert!(!progress.is_complete());
    }
}
