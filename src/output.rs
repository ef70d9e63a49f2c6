//! User-facing console lines.
//! Colors are enabled only when the stream is a TTY.

use owo_colors::OwoColorize;

use crate::mover::{MoveFailure, MoveOutcome};

fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// One detail line per failed document.
pub fn print_failure(failure: &MoveFailure) {
    let label = if failure.partial { "partial:" } else { "failed:" };
    if stderr_tty() {
        eprintln!("{} {}", label.red().bold(), failure);
    } else {
        eprintln!("{label} {failure}");
    }
}

/// Plain summary line (no prefix) so scripts can parse it, followed by failure details.
pub fn print_summary(outcome: &MoveOutcome) {
    println!("{outcome}");
    for failure in &outcome.failures {
        print_failure(failure);
    }
}
