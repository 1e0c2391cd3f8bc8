//! Tracing subscriber: a console formatter, a per-command log file layer and
//! the global initialisation tying them together.
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::sync::Mutex;

use tracing::{Event, Level};

use super::utils::{DATETIME_FORMAT, TIME_FORMAT, log_file_path, strip_ansi, utc_now};

/// Target of section headers such as the run summary.
pub(super) const STAGE_TARGET: &str = "dfm::stage";

/// How an event is presented, decided from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match *metadata.level() {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Error => format!("\x1b[1;31merror:\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[1;33mwarning:\x1b[0m {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    fn file_line(self, ts: &str, msg: &str) -> String {
        let msg = strip_ansi(msg);
        let tag = match self {
            Self::Stage => return format!("{ts} ==> {msg}"),
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
        };
        format!("{ts} {tag} {msg}")
    }
}

/// Pulls the formatted `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl Message {
    fn of(event: &Event<'_>) -> String {
        let mut message = Self::default();
        event.record(&mut message);
        message.0
    }
}

impl tracing::field::Visit for Message {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Writes every event, `DEBUG` included, to `<cache>/dfm/<command>.log`.
///
/// The file is truncated at the start of each run and begins with a header
/// naming the version, the command and the UTC start time.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Open the log file for `command`. Returns `None` when the cache
    /// directory or the file is unavailable; logging to the console still
    /// works in that case.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .ok()?;
        writeln!(
            file,
            "# dfm {} {command} started {}",
            crate::VERSION,
            utc_now(DATETIME_FORMAT)
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = Kind::of(event).file_line(&utc_now(TIME_FORMAT), &Message::of(event));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console rendering: stage headers, `error:` and `warning:` prefixes,
/// indented info, dimmed debug.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", Kind::of(event).console_line(&Message::of(event)))
    }
}

/// Install the global subscriber for one run of `command`.
///
/// Warnings and errors go to stderr, everything else to stdout; debug events
/// reach the console only when `verbose` is set but always reach the log
/// file. Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(writer)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(console)
        .with(FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}
