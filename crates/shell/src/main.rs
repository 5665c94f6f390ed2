use std::io;

use clap::Parser;

use causaldb_infra::StoreConfig;
use causaldb_shell::Args;

fn main() {
    causaldb_observability::init_interactive();

    let args = Args::parse();
    let config = StoreConfig::from_env().with_overrides(args.overrides());

    let stdin = io::stdin();
    if let Err(err) = causaldb_shell::run(&config, stdin.lock(), io::stdout()) {
        tracing::error!(error = ?err, "session aborted");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
