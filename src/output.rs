//! Labeled status lines on stderr.
//!
//! stdout is left to the packaging tool (and to `--dry-run` listings), so
//! everything printed here goes to stderr. Labels are colored only when
//! stderr is a terminal.

use console::{Color, Term, style};
use std::io::{self, Write};

fn stderr_is_tty() -> bool {
    Term::stderr().is_term()
}

fn paint_label(label: &str, color: Color, is_tty: bool) -> String {
    if is_tty {
        style(label).bold().fg(color).to_string()
    } else {
        label.to_string()
    }
}

fn write_status(
    w: &mut dyn Write,
    label: &str,
    color: Color,
    msg: &str,
    is_tty: bool,
) -> io::Result<()> {
    // Right-align labels the way cargo does so messages line up.
    let label = paint_label(&format!("{label:>12}"), color, is_tty);
    if msg.is_empty() {
        writeln!(w, "{label}")
    } else {
        writeln!(w, "{label} {msg}")
    }
}

pub fn action_to(w: &mut dyn Write, label: &str, msg: &str, is_tty: bool) {
    let _ = write_status(w, label, Color::Cyan, msg, is_tty);
}

pub fn success_to(w: &mut dyn Write, label: &str, msg: &str, is_tty: bool) {
    let _ = write_status(w, label, Color::Green, msg, is_tty);
}

pub fn fail_to(w: &mut dyn Write, label: &str, msg: &str, is_tty: bool) {
    let _ = write_status(w, label, Color::Red, msg, is_tty);
}

pub fn detail_to(w: &mut dyn Write, msg: &str, is_tty: bool) {
    let line = format!("{:>12} {msg}", "");
    let line = if is_tty {
        style(line).dim().to_string()
    } else {
        line
    };
    let _ = writeln!(w, "{line}");
}

pub fn action(label: &str, msg: &str) {
    action_to(&mut io::stderr(), label, msg, stderr_is_tty());
}

pub fn success(label: &str, msg: &str) {
    success_to(&mut io::stderr(), label, msg, stderr_is_tty());
}

pub fn fail(label: &str, msg: &str) {
    fail_to(&mut io::stderr(), label, msg, stderr_is_tty());
}

pub fn detail(msg: &str) {
    detail_to(&mut io::stderr(), msg, stderr_is_tty());
}

/// Print a top-level error with its cause chain.
pub fn error(err: &anyhow::Error) {
    let label = paint_label("error:", Color::Red, stderr_is_tty());
    eprintln!("{label} {err:#}");
}
