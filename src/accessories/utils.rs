use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, stdin, BufReader, Read, Stderr, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::read::MultiGzDecoder;

#[path = "utils_test.rs"]
mod utils_test;

/// Wall-clock seconds since the epoch.
pub fn realtime() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// User plus system CPU seconds used by this process.
pub fn cputime() -> f64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
        libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr());
        rusage.assume_init()
    };
    let user_time = rusage.ru_utime;
    let sys_time = rusage.ru_stime;
    (user_time.tv_sec as f64 + user_time.tv_usec as f64 * 1e-6)
        + (sys_time.tv_sec as f64 + sys_time.tv_usec as f64 * 1e-6)
}

/// Open `path` for reading, `-` meaning stdin.
pub fn xopen(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::new(stdin())));
    }
    let file = OpenOptions::new().read(true).open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Like [`xopen`], decompressing `.gz` files on the fly.
pub fn xzopen(path: &Path) -> io::Result<Box<dyn Read>> {
    let input = xopen(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Ok(Box::new(MultiGzDecoder::new(input)))
    } else {
        Ok(input)
    }
}

/// `true 1 t y yes ok`, in any case, are true; everything else is false.
pub fn check_true(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "1" | "t" | "y" | "yes" | "ok"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3600.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = std::convert::Infallible;

    /// Anything but `minute` or `hour` is read as `second`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "minute" => TimeUnit::Minute,
            "hour" => TimeUnit::Hour,
            _ => TimeUnit::Second,
        })
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
        })
    }
}

/// Reports the time spent in a scope when dropped.
///
/// ```no_run
/// use gatlab_tools::accessories::utils::{MeasureTime, TimeUnit};
///
/// {
///     let _timer = MeasureTime::new("indexing", TimeUnit::Second);
///     // ... work ...
/// } // "indexing: 0.42 second(s) elapsed" on stderr
/// ```
pub struct MeasureTime<W: Write = Stderr> {
    title: String,
    unit: TimeUnit,
    writer: Option<W>,
    t_real: f64,
    t_cpu: f64,
}

impl MeasureTime<Stderr> {
    pub fn new(title: impl Into<String>, unit: TimeUnit) -> Self {
        Self::with_writer(title, unit, io::stderr())
    }
}

impl<W: Write> MeasureTime<W> {
    pub fn with_writer(title: impl Into<String>, unit: TimeUnit, writer: W) -> Self {
        MeasureTime {
            title: title.into(),
            unit,
            writer: Some(writer),
            t_real: realtime(),
            t_cpu: cputime(),
        }
    }

    /// Report now and hand the writer back instead of waiting for drop.
    pub fn finish(mut self) -> Option<W> {
        self.report();
        self.writer.take()
    }

    fn report(&mut self) {
        let elapsed = (realtime() - self.t_real).max(0.0) / self.unit.seconds();
        let cpu = cputime() - self.t_cpu;
        log::debug!("{}: {:.3} sec CPU time", self.title, cpu);
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writeln!(
                writer,
                "{}: {:.2} {}(s) elapsed",
                self.title, elapsed, self.unit
            ) {
                log::warn!("could not report time for {}: {}", self.title, e);
            }
        }
    }
}

impl<W: Write> Drop for MeasureTime<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            self.report();
        }
    }
}

/// Run `f` and write its elapsed time to stderr.
pub fn measure_time<T>(title: &str, unit: TimeUnit, f: impl FnOnce() -> T) -> T {
    let _timer = MeasureTime::new(title, unit);
    f()
}
