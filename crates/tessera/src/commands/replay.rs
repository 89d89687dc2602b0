//! Replay command - Drive the engine from a JSON-lines event log
//!
//! Each line is one event:
//!
//! ```text
//! {"type":"set","tag":"semanticDiag","file":"/p/a.ts","diagnostics":[...],"triggerFile":"/p/tsconfig.json"}
//! {"type":"clear","projectPath":"/p"}
//! {"type":"wait","ms":150}
//! {"type":"query","file":"/p/a.ts","at":{"row":1,"column":0}}
//! {"type":"triggered","triggerFile":"/p/tsconfig.json"}
//! ```
//!
//! Blank lines and lines starting with `//` are skipped. Every publish the
//! engine makes is printed as it is observed; at end of input the engine is
//! flushed so the final state always appears.

use clap::Args;
use serde::Deserialize;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tessera_maestro::{
    AggregatorConfig, ChannelSink, ClearSelector, DiagnosticAggregator, MaestroError, SinkEvent,
    DEFAULT_DEBOUNCE,
};
use tessera_patina::{format_text, DiagnosticsConfig, Message, OutputFormat};
use tessera_relief::{Diagnostic, NormalizedPath, Point, Range, SourceTag};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::load_config;

#[derive(Args)]
pub struct ReplayArgs {
    /// Event log to replay (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Publish debounce window in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Config file path (defaults to ./tessera.config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Errors that stop a replay.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: invalid event: {source}")]
    Event {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Engine(#[from] MaestroError),
}

/// One line of the event log.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    /// Replace the diagnostics for `(tag, file)`
    Set {
        tag: SourceTag,
        file: String,
        #[serde(default)]
        diagnostics: Vec<Diagnostic>,
        trigger_file: Option<String>,
    },
    /// Remove entries by project path and/or trigger
    Clear {
        project_path: Option<String>,
        trigger_file: Option<String>,
    },
    /// Let time pass, then print what the engine published meanwhile
    Wait { ms: u64 },
    /// Point query with `at`, range query with `range`, whole file otherwise
    Query {
        file: String,
        at: Option<Point>,
        range: Option<Range>,
    },
    /// Files whose stored trigger equals `trigger_file`
    Triggered { trigger_file: String },
}

/// Replay settings.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub debounce: Duration,
    pub diagnostics: DiagnosticsConfig,
    pub format: OutputFormat,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            diagnostics: DiagnosticsConfig::default(),
            format: OutputFormat::Text,
        }
    }
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub publishes: usize,
}

pub fn run(args: ReplayArgs) {
    tessera_maestro::init_logging(if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    });

    let config = load_config(args.config.as_deref());
    let mut diagnostics = config.diagnostics;
    if diagnostics.project_roots.is_empty() {
        if let Ok(cwd) = std::env::current_dir() {
            diagnostics.project_roots.push(cwd.to_string_lossy().into_owned());
        }
    }

    let options = ReplayOptions {
        debounce: Duration::from_millis(
            args.debounce_ms
                .or(config.replay.debounce_ms)
                .unwrap_or(DEFAULT_DEBOUNCE.as_millis() as u64),
        ),
        diagnostics,
        format: match args.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        },
    };

    let source = match read_input(args.input.as_ref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    match runtime.block_on(replay(&source, options, stdout.lock())) {
        Ok(summary) => {
            tracing::debug!(
                "replayed {} event(s), {} publish(es)",
                summary.events,
                summary.publishes
            );
        }
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, ReplayError> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.clone(),
            source,
        }),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Parse one event log line. Returns `None` for blank and comment lines.
pub fn parse_line(line: &str, number: usize) -> Result<Option<Event>, ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ReplayError::Event {
            line: number,
            source,
        })
}

/// Replay `source` through a fresh engine, writing observations to `out`.
///
/// Must run inside a tokio runtime with time enabled.
pub async fn replay<W: Write>(
    source: &str,
    options: ReplayOptions,
    out: W,
) -> Result<ReplaySummary, ReplayError> {
    let engine = DiagnosticAggregator::with_config(AggregatorConfig {
        debounce: options.debounce,
        config: std::sync::Arc::new(options.diagnostics),
    })?;
    let (sink, events) = ChannelSink::new();
    engine.set_sink(sink);

    let mut reporter = Reporter::new(out, options.format, events);
    let mut summary = ReplaySummary::default();

    for (index, line) in source.lines().enumerate() {
        let Some(event) = parse_line(line, index + 1)? else {
            continue;
        };
        summary.events += 1;
        tracing::debug!("event {}: {:?}", index + 1, event);

        match event {
            Event::Set {
                tag,
                file,
                diagnostics,
                trigger_file,
            } => engine.set_errors(tag, &file, diagnostics, trigger_file.as_deref()),
            Event::Clear {
                project_path,
                trigger_file,
            } => {
                engine.clear_file_errors(&ClearSelector {
                    project_path,
                    trigger_file,
                });
            }
            Event::Wait { ms } => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                // let a timer that expired in the same tick publish first
                tokio::task::yield_now().await;
                reporter.drain()?;
            }
            Event::Query { file, at, range } => {
                let found = match (at, range) {
                    (Some(point), _) => engine.errors_at(&file, point),
                    (None, Some(range)) => engine.errors_in_range(&file, range),
                    (None, None) => engine.errors_in_range(
                        &file,
                        Range::from_coords(0, 0, u32::MAX, u32::MAX),
                    ),
                };
                reporter.drain()?;
                reporter.query(&file, &found)?;
            }
            Event::Triggered { trigger_file } => {
                let files = engine.files_for_trigger(&trigger_file);
                reporter.drain()?;
                reporter.triggered(&trigger_file, &files)?;
            }
        }
    }

    engine.flush();
    reporter.drain()?;
    engine.dispose();
    reporter.drain()?;

    summary.publishes = reporter.publishes;
    Ok(summary)
}

/// Prints sink events and query results as they are observed.
struct Reporter<W> {
    out: W,
    format: OutputFormat,
    events: UnboundedReceiver<SinkEvent>,
    publishes: usize,
}

impl<W: Write> Reporter<W> {
    fn new(out: W, format: OutputFormat, events: UnboundedReceiver<SinkEvent>) -> Self {
        Self {
            out,
            format,
            events,
            publishes: 0,
        }
    }

    /// Print every sink event received so far.
    fn drain(&mut self) -> io::Result<()> {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SinkEvent::Publish(messages) => self.publish(&messages)?,
                SinkEvent::Clear => tracing::debug!("sink cleared"),
                SinkEvent::Dispose => tracing::debug!("sink disposed"),
            }
        }
        self.out.flush()
    }

    fn publish(&mut self, messages: &[Message]) -> io::Result<()> {
        self.publishes += 1;
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "== publish {} ==", self.publishes)?;
                writeln!(self.out, "{}", format_text(messages))?;
                writeln!(self.out)
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "type": "publish",
                    "seq": self.publishes,
                    "messages": messages,
                });
                writeln!(self.out, "{}", line)
            }
        }
    }

    fn query(&mut self, file: &str, found: &[Diagnostic]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "== query {}: {} match{} ==",
                    file,
                    found.len(),
                    if found.len() == 1 { "" } else { "es" }
                )?;
                for diagnostic in found {
                    let (start, _) = diagnostic.locations();
                    writeln!(
                        self.out,
                        "  {}:{}  {:<10}  {:>5}  {}",
                        start.line,
                        start.offset,
                        diagnostic.category.as_str(),
                        diagnostic.code.to_string(),
                        diagnostic.text
                    )?;
                }
                writeln!(self.out)
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "type": "query",
                    "file": file,
                    "diagnostics": found,
                });
                writeln!(self.out, "{}", line)
            }
        }
    }

    fn triggered(&mut self, trigger: &str, files: &[NormalizedPath]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "== triggered by {}: {} file{} ==",
                    trigger,
                    files.len(),
                    if files.len() == 1 { "" } else { "s" }
                )?;
                for file in files {
                    writeln!(self.out, "  {}", file)?;
                }
                writeln!(self.out)
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "type": "triggered",
                    "triggerFile": trigger,
                    "files": files,
                });
                writeln!(self.out, "{}", line)
            }
        }
    }
}
