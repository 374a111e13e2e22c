//! REPL input parsing.

use std::path::PathBuf;

/// A slash command as listed in help and offered for completion.
pub struct CommandInfo {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "/url", args: "<backend-url>", description: "set the backend URL" },
    CommandInfo { name: "/file", args: "<path>", description: "select a PDF" },
    CommandInfo { name: "/upload", args: "[path]", description: "upload the selected PDF" },
    CommandInfo {
        name: "/ask",
        args: "<question>",
        description: "ask about the uploaded PDF (bare text works too)",
    },
    CommandInfo { name: "/health", args: "", description: "check that the backend is up" },
    CommandInfo { name: "/status", args: "", description: "show the current state" },
    CommandInfo { name: "/help", args: "", description: "list commands" },
];

/// Commands whose name starts with `prefix`.
pub fn matching(prefix: &str) -> impl Iterator<Item = &'static CommandInfo> + '_ {
    COMMANDS.iter().filter(move |c| c.name.starts_with(prefix))
}

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Set the backend URL field.
    SetUrl(String),
    /// Select a file for upload.
    SelectFile(PathBuf),
    /// Run the upload handler, optionally selecting a file first.
    Upload(Option<PathBuf>),
    /// Put text in the question box and run the ask handler.
    Ask(String),
    Health,
    Status,
    Help,
    Quit,
    /// A command that needs an argument was given none.
    MissingArgument(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parses one line. Text that is not a command is a question.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            // Keep the raw text; the ask handler does its own trimming.
            return Self::Ask(line.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "/url" if rest.is_empty() => Self::MissingArgument("/url <backend-url>"),
            "/url" => Self::SetUrl(rest.to_string()),
            "/file" if rest.is_empty() => Self::MissingArgument("/file <path>"),
            "/file" => Self::SelectFile(PathBuf::from(rest)),
            "/upload" if rest.is_empty() => Self::Upload(None),
            "/upload" => Self::Upload(Some(PathBuf::from(rest))),
            "/ask" => Self::Ask(rest.to_string()),
            "/health" => Self::Health,
            "/status" => Self::Status,
            "/help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }
}
