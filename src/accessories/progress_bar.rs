//! A simple progress bar for command-line tools.
//!
//! ```no_run
//! use gatlab_tools::accessories::progress_bar::ProgressBar;
//!
//! let workload = 5_000_000;
//! let mut bar = ProgressBar::new(workload).bar_len(50).bar_char("-");
//! bar.start()?;
//! for progress in (0..workload).step_by(1024) {
//!     bar.update(progress)?;
//! }
//! bar.finish(workload)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Stderr, Write};

use crate::defaults::{BAR_CHAR, BAR_LEN};

/// Draws `[=====>    ]`-style progress on a terminal line.
///
/// `workload` is unitless: bytes, records, days... Updates have to use the
/// same unit. A multi-character `bar_char` makes the drawn bar
/// proportionally longer.
pub struct ProgressBar<W: Write = Stderr> {
    workload: u64,
    bar_len: usize,
    bar_char: String,
    current: u64,
    writer: W,
}

impl ProgressBar<Stderr> {
    /// A bar drawn on stderr.
    pub fn new(workload: u64) -> Self {
        Self::with_writer(workload, io::stderr())
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn with_writer(workload: u64, writer: W) -> Self {
        ProgressBar {
            workload,
            bar_len: BAR_LEN,
            bar_char: BAR_CHAR.to_string(),
            current: 0,
            writer,
        }
    }

    pub fn bar_len(mut self, bar_len: usize) -> Self {
        self.bar_len = bar_len;
        self
    }

    pub fn bar_char(mut self, bar_char: impl Into<String>) -> Self {
        self.bar_char = bar_char.into();
        self
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn workload(&self) -> u64 {
        self.workload
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Draw the empty bar. Use [`update`](Self::update) to start elsewhere.
    pub fn start(&mut self) -> io::Result<()> {
        self.update(0)
    }

    /// Redraw the bar at `cur_progress`, rewriting the current line.
    pub fn update(&mut self, cur_progress: u64) -> io::Result<()> {
        self.updater(cur_progress, false)
    }

    /// Draw the final state and end the line.
    ///
    /// `final_progress` may be lower than the workload, e.g. when a download
    /// breaks early; the bar then shows how far it got.
    pub fn finish(&mut self, final_progress: u64) -> io::Result<()> {
        self.updater(final_progress, true)
    }

    /// Lower-level redraw. With `new_line` every update ends its own line,
    /// which reads better once the output is redirected to a log file.
    ///
    /// Progress beyond the workload is shown as 100%.
    pub fn updater(&mut self, cur_progress: u64, new_line: bool) -> io::Result<()> {
        let line = self.render(cur_progress, new_line);
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()
    }

    fn render(&mut self, cur_progress: u64, new_line: bool) -> String {
        self.current = cur_progress.min(self.workload);
        let progress = if self.workload == 0 {
            1.0
        } else {
            self.current as f64 / self.workload as f64
        };
        let progress_len = (progress * self.bar_len as f64) as usize;

        let (tail, eol) = if new_line {
            ("", "\n")
        } else if progress_len == self.bar_len {
            ("", "")
        } else {
            (">", "")
        };
        let pad = self.bar_len.saturating_sub(tail.len() + progress_len);
        format!(
            "\r{:>3.0}%[{}{}{}] {} {}",
            progress * 100.0,
            self.bar_char.repeat(progress_len),
            tail,
            " ".repeat(pad),
            group_thousands(self.current),
            eol
        )
    }
}

/// `1839328401` -> `"1,839,328,401"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
