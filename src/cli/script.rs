use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analytics::GraphReport;
use crate::db::{AdjacencyDump, Listing, Notice, RelationalStore, SEPARATOR};
use crate::types::{CadenzaError, Namespace};

/// Errors raised while reading or executing a command script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A line could not be parsed into a command.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// The script file could not be read.
    #[error("failed to read script {path}: {source}")]
    Read {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Encoding a JSON event failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The store rejected an operation.
    #[error(transparent)]
    Store(#[from] CadenzaError),
}

/// What a `print` command shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintTarget {
    /// Listing of one namespace.
    Names(Namespace),
    /// Component report.
    Graph,
}

/// One parsed script command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `insert {artist}<SEP>{song}`
    Insert {
        /// Artist name.
        artist: String,
        /// Song title.
        song: String,
    },
    /// `remove artist|song {name}`
    Remove {
        /// Namespace to remove from.
        namespace: Namespace,
        /// Name to remove.
        name: String,
    },
    /// `print artist|song|graph`
    Print(PrintTarget),
    /// `debug`
    Debug,
    /// Anything else; echoed back as `Unrecognized input {0}`.
    Unrecognized(String),
}

/// Parses one line; blank lines yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    let command = match word {
        "insert" => {
            let (artist, song) = rest
                .split_once(SEPARATOR)
                .ok_or_else(|| ScriptError::Malformed {
                    line: line_no,
                    message: format!("insert needs `artist{SEPARATOR}song`, got {rest:?}"),
                })?;
            Command::Insert {
                artist: artist.trim().to_owned(),
                song: song.trim().to_owned(),
            }
        }
        "remove" => {
            let parsed = rest.split_once(char::is_whitespace).and_then(|(kind, name)| {
                let name = name.trim();
                let namespace = Namespace::from_keyword(kind)?;
                (!name.is_empty()).then(|| Command::Remove {
                    namespace,
                    name: name.to_owned(),
                })
            });
            parsed.unwrap_or_else(|| Command::Unrecognized(word.to_owned()))
        }
        "print" => {
            let target = rest.split_whitespace().next().unwrap_or("");
            match target {
                "graph" => Command::Print(PrintTarget::Graph),
                other => match Namespace::from_keyword(other) {
                    Some(ns) => Command::Print(PrintTarget::Names(ns)),
                    None => Command::Unrecognized(word.to_owned()),
                },
            }
        }
        "debug" => Command::Debug,
        other => Command::Unrecognized(other.to_owned()),
    };
    Ok(Some(command))
}

/// Parses a whole script.
pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(command) = parse_line(idx + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Reads and parses a script file.
pub fn read_script(path: &Path) -> Result<Vec<Command>, ScriptError> {
    let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&text)
}

/// One unit of runner output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A store notice.
    Notice(Notice),
    /// A namespace listing.
    Listing(Listing),
    /// A component report.
    Report(GraphReport),
    /// Full state dump requested by `debug`.
    Debug {
        /// Artist table including tombstones.
        artists: Listing,
        /// Song table including tombstones.
        songs: Listing,
        /// Adjacency lists of present nodes.
        adjacency: AdjacencyDump,
    },
    /// A command the runner does not understand.
    Unrecognized {
        /// The offending command word.
        input: String,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Notice(notice) => write!(f, "{notice}"),
            Event::Listing(listing) => write!(f, "{listing}"),
            Event::Report(report) => write!(f, "{report}"),
            Event::Debug {
                artists,
                songs,
                adjacency,
            } => {
                writeln!(f, "debug cmd activated")?;
                writeln!(f, "{artists}")?;
                writeln!(f, "{songs}")?;
                write!(f, "{adjacency}")
            }
            Event::Unrecognized { input } => write!(f, "Unrecognized input {input}"),
        }
    }
}

/// How the runner renders events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text, one rendered event per line group.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Counts gathered while running a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed.
    pub commands: usize,
    /// Events written.
    pub events: usize,
}

/// Executes commands against a store and writes their output.
pub struct ScriptRunner {
    store: RelationalStore,
    format: OutputFormat,
}

impl ScriptRunner {
    /// Wraps `store`, rendering output as `format`.
    pub fn new(store: RelationalStore, format: OutputFormat) -> Self {
        Self { store, format }
    }

    /// The store commands run against.
    pub fn store(&self) -> &RelationalStore {
        &self.store
    }

    /// Consumes the runner, returning its store.
    pub fn into_store(self) -> RelationalStore {
        self.store
    }

    /// Applies one command and returns the events it produced.
    pub fn apply(&mut self, command: &Command) -> Result<Vec<Event>, ScriptError> {
        let events = match command {
            Command::Insert { artist, song } => self
                .store
                .insert(artist, song)?
                .into_iter()
                .map(Event::Notice)
                .collect(),
            Command::Remove { namespace, name } => self
                .store
                .remove(*namespace, name)
                .into_iter()
                .map(Event::Notice)
                .collect(),
            Command::Print(PrintTarget::Names(ns)) => vec![Event::Listing(self.store.list(*ns))],
            Command::Print(PrintTarget::Graph) => vec![Event::Report(self.store.report())],
            Command::Debug => vec![Event::Debug {
                artists: Listing::with_tombstones(self.store.table(Namespace::Artist)),
                songs: Listing::with_tombstones(self.store.table(Namespace::Song)),
                adjacency: self.store.dump_adjacency(),
            }],
            Command::Unrecognized(word) => vec![Event::Unrecognized {
                input: word.clone(),
            }],
        };
        Ok(events)
    }

    /// Runs every command, writing events to `out`.
    pub fn run<W: Write>(
        &mut self,
        commands: &[Command],
        out: &mut W,
    ) -> Result<RunSummary, ScriptError> {
        let mut summary = RunSummary::default();
        for command in commands {
            debug!(?command, "script.command");
            for event in self.apply(command)? {
                self.emit(&event, out)?;
                summary.events += 1;
            }
            summary.commands += 1;
        }
        out.flush()?;
        info!(
            commands = summary.commands,
            events = summary.events,
            "script.finished"
        );
        Ok(summary)
    }

    fn emit<W: Write>(&self, event: &Event, out: &mut W) -> Result<(), ScriptError> {
        match self.format {
            OutputFormat::Text => writeln!(out, "{event}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
