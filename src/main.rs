use clap::Parser;
use tracing_subscriber::EnvFilter;

use doctrail::adapters::audit::log_sink::AUDIT_TARGET;
use doctrail::cli::{self, Cli, Commands};

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    // Audit records logged in place of storage must survive --quiet.
    let filter = EnvFilter::try_from_env("DOCTRAIL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{AUDIT_TARGET}=info")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::context::init(args.config.as_deref());

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(),
        Commands::Diff { before, after } => cli::commands::diff::execute(before, after),
        Commands::Record {
            before,
            after,
            actor,
            action,
            model,
        } => cli::commands::record::execute(
            before,
            after,
            actor.as_deref(),
            action,
            model.as_deref(),
        ),
        Commands::Log { actor, since, last } => {
            cli::commands::log::execute(actor.as_deref(), since.as_deref(), *last)
        }
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
