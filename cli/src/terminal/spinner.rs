use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);
    pb.set_style(style);
    pb
}

pub fn start(total: usize) {
    let pb = get_spinner();
    pb.reset();
    pb.enable_steady_tick(Duration::from_millis(100));
    report_progress(0, total, 0);
}

pub fn report_progress(done: usize, total: usize, alive: usize) {
    get_spinner().set_message(format!(
        "Probed {}/{} addresses, {} alive",
        done.to_string().bold(),
        total,
        alive.to_string().green().bold()
    ));
}

pub fn finish() {
    get_spinner().finish_and_clear();
}

/// Writer that keeps lines above the spinner.
///
/// Program output goes to stdout so it can be piped or redirected. Log
/// lines go to stderr and fall back to a plain write when the spinner
/// cannot draw, e.g. when stderr is not a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerWriter {
    Stdout,
    Stderr,
}

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let spinner = get_spinner();
        match self {
            SpinnerWriter::Stdout => spinner.suspend(|| std::io::stdout().write_all(buf))?,
            SpinnerWriter::Stderr if spinner.is_hidden() || spinner.is_finished() => {
                std::io::stderr().write_all(buf)?
            }
            SpinnerWriter::Stderr => {
                let msg = String::from_utf8_lossy(buf);
                spinner.println(msg.trim_end());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            SpinnerWriter::Stdout => std::io::stdout().flush(),
            SpinnerWriter::Stderr => std::io::stderr().flush(),
        }
    }
}
