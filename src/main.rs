use std::process::ExitCode;

use clap::{Parser, Subcommand};

use prequelbot::commands::GlobalArgs;
use prequelbot::commands::check::CheckArgs;
use prequelbot::commands::reply::ReplyArgs;
use prequelbot::commands::stream::StreamArgs;
use prequelbot::{commands, error, telemetry};

#[derive(Debug, Parser)]
#[command(
    name = "prequelbot",
    version,
    about = "Pattern-rule reply engine for a prequel-quoting chat bot"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the reply to a single message
    Reply(ReplyArgs),
    /// Answer JSON-lines requests from stdin
    Stream(StreamArgs),
    /// Validate the rule catalog and configuration
    Check(CheckArgs),
    /// Print the JSON Schema for rule catalog documents
    Schema,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Reply(_) => "reply",
            Self::Stream(_) => "stream",
            Self::Check(_) => "check",
            Self::Schema => "schema",
        }
    }
}

fn main() -> ExitCode {
    telemetry::init();

    let cli = Cli::parse();

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match &cli.command {
        Commands::Reply(args) => args.execute(&cli.global),
        Commands::Stream(args) => args.execute(&cli.global),
        Commands::Check(args) => args.execute(&cli.global),
        Commands::Schema => commands::schema::run_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit_err) = e.downcast_ref::<error::ExitError>() {
                eprintln!("error: {exit_err}");
                exit_err.exit_code()
            } else {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}
