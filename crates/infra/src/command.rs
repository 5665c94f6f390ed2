//! Line protocol: parsing and execution.
//!
//! ```text
//! insert <id> "<data>" [<parent_id> ...]
//! get <id>
//! .list
//! .exit
//! ```
//!
//! Parsing is lenient the way `atoi` is: numeric fields that do not parse become
//! `0`. A missing id or a missing quoted payload makes the line unrecognized.

use core::fmt;

use tracing::debug;

use causaldb_core::{Event, EventId, MAX_PARENTS};

use crate::error::StoreError;
use crate::event_log::EventLog;
use crate::store::{EventStore, InsertOutcome};

/// A parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Event),
    Get(EventId),
    List,
    Exit,
}

/// What executing a line produced. `Display` renders the shell output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { id: EventId, outcome: InsertOutcome },
    Found(Event),
    NotFound(EventId),
    Listed(Vec<Event>),
    Exit,
    Unrecognized(String),
}

impl Command {
    /// Parse one line; `None` means the line is not a recognized command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (keyword, rest) = split_token(line)?;

        match keyword {
            "insert" => parse_insert(rest),
            "get" => {
                let (id, _) = split_token(rest)?;
                Some(Self::Get(EventId::new(lenient_u32(id))))
            }
            ".list" => Some(Self::List),
            ".exit" => Some(Self::Exit),
            _ => None,
        }
    }

    /// Run the command against `store`.
    pub fn execute<L: EventLog>(self, store: &mut EventStore<L>) -> Result<Outcome, StoreError> {
        match self {
            Self::Insert(event) => {
                let id = event.id();
                let outcome = store.insert(event)?;
                Ok(Outcome::Inserted { id, outcome })
            }
            Self::Get(id) => Ok(match store.get(id)? {
                Some(event) => Outcome::Found(event),
                None => Outcome::NotFound(id),
            }),
            Self::List => Ok(Outcome::Listed(store.list().cloned().collect())),
            Self::Exit => Ok(Outcome::Exit),
        }
    }
}

/// Parse and execute one line.
///
/// Only IO failures are errors; bad input comes back as [`Outcome::Unrecognized`].
pub fn dispatch_line<L: EventLog>(store: &mut EventStore<L>, line: &str) -> Result<Outcome, StoreError> {
    match Command::parse(line) {
        Some(command) => {
            debug!(?command, "dispatching");
            command.execute(store)
        }
        None => Ok(Outcome::Unrecognized(line.to_string())),
    }
}

fn parse_insert(rest: &str) -> Option<Command> {
    let (id, rest) = split_token(rest)?;
    let body = rest.trim_start().strip_prefix('"')?;
    let close = body.find('"')?;
    let data = &body[..close];

    let parents = body[close + 1..]
        .split_whitespace()
        .take(MAX_PARENTS)
        .map(|token| EventId::new(lenient_u32(token)));

    Event::new(lenient_u32(id), data, parents)
        .ok()
        .map(Command::Insert)
}

/// First whitespace-delimited token and the remainder, or `None` if blank.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(at) => Some((&s[..at], &s[at..])),
        None => Some((s, "")),
    }
}

/// Leading-digit parse: `"12abc"` is 12, `"abc"`, `"-3"` and overflow are 0.
fn lenient_u32(token: &str) -> u32 {
    let token = token.trim_start();
    let token = token.strip_prefix('+').unwrap_or(token);
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().unwrap_or(0)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted {
                outcome: InsertOutcome::Mirrored,
                ..
            } => Ok(()),
            Outcome::Inserted {
                outcome: InsertOutcome::PersistedOnly,
                ..
            } => write!(f, "Error: table full."),
            Outcome::Found(event) => write!(f, "{event}"),
            Outcome::NotFound(_) => write!(f, "Event not found."),
            Outcome::Listed(events) => {
                for (i, event) in events.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{event}")?;
                }
                Ok(())
            }
            Outcome::Exit => Ok(()),
            Outcome::Unrecognized(line) => write!(f, "Unrecognized command: {line}"),
        }
    }
}
