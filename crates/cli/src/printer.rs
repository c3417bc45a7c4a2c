//! Terminal output for engine status events
//!
//! Formatting policy lives here, not in the engine: one line per event,
//! `[timestamp] label [path]`, colored labels.

use chrono::Local;
use crossbeam_channel::Receiver;
use keepsake_core::StatusEvent;
use owo_colors::OwoColorize;

const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print status events until the channel disconnects
///
/// Runs on its own thread; the engine side never blocks on the terminal.
pub fn print_loop(events: Receiver<StatusEvent>) {
    for event in events {
        print_event(&event);
    }
}

fn print_event(event: &StatusEvent) {
    match event {
        StatusEvent::Synchronized { path, at } => {
            println!(
                "[{}] {} [{}]",
                at.format(STAMP_FORMAT),
                "synchronized".green(),
                path
            );
        }
        StatusEvent::Archived { path, at } => {
            println!(
                "[{}] {} [{}]",
                at.format(STAMP_FORMAT),
                "archived".yellow(),
                path
            );
        }
        StatusEvent::Error { path, message } => {
            eprintln!(
                "[{}] {} [{}] {}",
                Local::now().format(STAMP_FORMAT),
                "error".red(),
                path,
                message
            );
        }
    }
}
