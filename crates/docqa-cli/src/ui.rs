//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;
use std::io::{self, BufRead, Write};

use docqa_core::{Document, Result, SegmentOrigin};

/// Prompt shown before each interactive question
pub const QUESTION_PROMPT: &str = "What do you want to learn from the document?";

/// Display startup banner for the interactive session
pub fn display_banner(document: &Document) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    let boxed = |text: &str| {
        let text: String = text.chars().take(inner.saturating_sub(2)).collect();
        let padding = inner.saturating_sub(text.chars().count() + 2);
        format!("│  {}{}│", text, " ".repeat(padding))
    };

    println!();
    println!("{}", top_border.blue());
    println!("{}", boxed("docqa - ask your PDF").blue().bold());
    println!("{}", empty_line.blue());
    println!("{}", boxed(&format!("Document: {}", document.file_name())).blue());
    println!("{}", boxed(&format!("Segments indexed: {}", document.segments.len())).blue());
    println!("{}", bottom_border.blue());
    println!();

    if document
        .segments
        .iter()
        .any(|segment| segment.origin() == SegmentOrigin::Placeholder)
    {
        println!(
            "{}",
            "⚠️  No text could be extracted; answers will be generic.".yellow()
        );
    }
    println!(
        "{}",
        "💡 Tip: type 'help' for commands, 'exit' to quit".dimmed()
    );
    println!();
}

/// Read one line, without the trailing newline. `None` at end of input.
pub fn read_line_from<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Print the interactive prompt and read the next question from stdin
pub fn prompt_question() -> Result<Option<String>> {
    println!("{}", QUESTION_PROMPT.green().bold());
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

/// Whether the input ends the interactive session
pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// Whether the input asks for help
pub fn is_help_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("help")
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask anything about the document", "question".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What are the four types of macromolecules?");
    println!("  Make 5 flashcards about proteins");
}

/// Print an answer surrounded by blank lines
pub fn print_answer(answer: &str) {
    println!();
    println!("{}", answer);
    println!();
}

/// Print an error to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
