//! Interactive line shell over an [`EventStore`].

use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Parser;

use causaldb_infra::command::{dispatch_line, Outcome};
use causaldb_infra::{EventLog, EventStore, InsertOutcome, LoadPolicy, StoreConfig, StoreOverrides};

pub const PROMPT: &str = "db > ";

/// Command-line options; unset values fall back to the `CAUSALDB_*` environment.
#[derive(Debug, Parser)]
#[command(name = "causaldb", about = "Interactive shell for the causal event store")]
pub struct Args {
    /// Event file to open (created if missing).
    #[arg(long)]
    pub db: Option<std::path::PathBuf>,

    /// Maximum number of events mirrored in memory.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Table load policy: `prefix` or `full`.
    #[arg(long)]
    pub load_policy: Option<LoadPolicy>,
}

impl Args {
    /// The flags that were given, as overrides for an environment-derived config.
    pub fn overrides(&self) -> StoreOverrides {
        StoreOverrides {
            path: self.db.clone(),
            table_capacity: self.capacity,
            load_policy: self.load_policy,
        }
    }
}

/// Read-eval-print loop. Returns when `.exit` is read or input ends.
///
/// Store IO failures end the session with an error.
pub fn run_session<L, R, W>(store: &mut EventStore<L>, input: R, mut output: W) -> anyhow::Result<()>
where
    L: EventLog,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            tracing::debug!("end of input");
            break;
        };
        let line = line.context("failed to read input")?;

        let outcome = dispatch_line(store, &line).context("storage failure")?;
        match &outcome {
            Outcome::Exit => break,
            Outcome::Inserted {
                outcome: InsertOutcome::Mirrored,
                ..
            } => {}
            _ => writeln!(output, "{outcome}")?,
        }
    }

    Ok(())
}

/// Open the configured store, run the loop on the given streams, then close.
pub fn run<R: BufRead, W: Write>(config: &StoreConfig, input: R, output: W) -> anyhow::Result<()> {
    let mut store = EventStore::open(config)
        .with_context(|| format!("failed to open {}", config.path.display()))?;

    run_session(&mut store, input, output)?;

    store.close().context("failed to close event file")?;
    Ok(())
}
