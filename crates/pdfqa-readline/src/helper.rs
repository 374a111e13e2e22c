//! rustyline integration for slash commands.

use std::borrow::Cow;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::matching;

/// Returns the command word being typed, if the cursor is still inside it.
fn command_prefix(line: &str, pos: usize) -> Option<&str> {
    let typed = line.get(..pos)?;
    (typed.starts_with('/') && !typed.contains(char::is_whitespace)).then_some(typed)
}

/// Completes and hints slash commands, and colors the command word.
#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(prefix) = command_prefix(line, pos) else {
            return Ok((pos, Vec::new()));
        };
        let candidates = matching(prefix)
            .map(|cmd| Pair {
                display: format!("{} {}", cmd.name, cmd.args).trim_end().to_string(),
                replacement: format!("{} ", cmd.name),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Cow::Borrowed(line);
        }
        let (word, rest) = line
            .find(char::is_whitespace)
            .map_or((line, ""), |at| line.split_at(at));
        Cow::Owned(format!("{}{}", word.bright_cyan(), rest))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    /// Hints the rest of the command name when exactly one command matches.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let prefix = command_prefix(line, pos)?;
        let mut found = matching(prefix);
        let only = found.next()?;
        if found.next().is_some() {
            return None;
        }
        only.name.get(prefix.len()..).filter(|rest| !rest.is_empty()).map(str::to_string)
    }
}

impl Validator for CliHelper {}
