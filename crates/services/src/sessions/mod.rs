mod coordinator;
mod progress;

// Public API of the practice session subsystem.
pub use coordinator::{NextQuestion, PracticeCoordinator};
pub use progress::PracticeProgress;
