mod insert_vm;
mod markdown_vm;
mod practice_vm;
mod selection_vm;
mod timer_vm;

pub use insert_vm::{
    CollectionOptionVm, SAMPLE_BATCH, check_batch, collection_options, inserted_message,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use practice_vm::{
    QuestionCardVm, exhausted_message, load_notice, map_question_card, progress_label,
    session_title,
};
pub use selection_vm::{CategoryOptionVm, SelectionVm, TechnologyOptionVm};
pub use timer_vm::{auto_advance_due, format_elapsed};
