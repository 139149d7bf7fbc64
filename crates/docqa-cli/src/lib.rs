//! CLI interface for docqa

mod args;
mod logging;
mod ui;

pub use args::Args;
pub use logging::init_logging;
pub use ui::{
    display_banner, is_exit_command, is_help_command, print_answer, print_error, print_help,
    prompt_question, read_line_from, QUESTION_PROMPT,
};

// Re-export core types
pub use docqa_core::{Error, Result};
