mod insert;
mod login;
mod practice;
mod selection;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use insert::InsertView;
pub use login::LoginView;
pub use practice::{PracticeView, QuestionCard, TimerBar};
pub use selection::SelectionView;
pub use state::ViewError;
