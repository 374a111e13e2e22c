//! Terminal output for the two display areas and alerts.

use colored::Colorize;
use pdfqa_core::{DisplayArea, FormInputs, Snapshot, UiEvent};
use tokio::sync::mpsc;

use crate::command::COMMANDS;

/// One styled terminal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Status(String),
    Answer(String),
}

impl Line {
    fn print(&self) {
        match self {
            Line::Status(text) => println!("{}", format!("[status] {text}").bright_black()),
            Line::Answer(text) => println!("{}", text.bright_blue()),
        }
    }
}

/// Lines to print for one display write. Clearing an area prints nothing.
pub fn lines_for(event: &UiEvent) -> Vec<Line> {
    if event.text.is_empty() {
        return Vec::new();
    }
    match event.area {
        DisplayArea::Status => vec![Line::Status(event.text.clone())],
        DisplayArea::Answer => event.text.lines().map(|l| Line::Answer(l.to_string())).collect(),
    }
}

pub fn print_alert(message: &str) {
    println!("{}", format!("! {message}").bright_yellow().bold());
}

pub fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    for cmd in COMMANDS {
        let usage = format!("{} {}", cmd.name, cmd.args);
        println!("  {:<22}{}", usage.trim_end().bright_cyan(), cmd.description);
    }
    println!("  {:<22}{}", "quit".bright_cyan(), "exit");
}

pub fn print_snapshot(form: &FormInputs, snapshot: &Snapshot) {
    let file = form
        .selected_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let session = snapshot
        .session_id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    println!("{} {}", "backend:".bright_black(), form.backend_url);
    println!("{} {}", "file:   ".bright_black(), file);
    println!("{} {}", "session:".bright_black(), session);
    let areas = [
        (DisplayArea::Status, &snapshot.display.status),
        (DisplayArea::Answer, &snapshot.display.answer),
    ];
    for (area, text) in areas {
        let event = UiEvent { area, text: text.clone() };
        lines_for(&event).iter().for_each(Line::print);
    }
}

/// Prints every display write. Runs until the controller is dropped.
pub async fn render_events(mut events: mpsc::UnboundedReceiver<UiEvent>) {
    while let Some(event) = events.recv().await {
        lines_for(&event).iter().for_each(Line::print);
    }
}
