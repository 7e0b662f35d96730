use crate::pipeline::{
    check_criteria, run_pipeline, score_listings, CriteriaArgs, RunArgs, ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use deal_scout::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Deal Scout",
    about = "Score Minnesota business-for-sale listings against SBA acquisition criteria",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the candidate dashboard API (default command)
    Serve(ServeArgs),
    /// Score an exported listing file, store new candidates, and write the daily report
    Run(RunArgs),
    /// Score an exported listing file and print the results as JSON without storing them
    Score(ScoreArgs),
    /// Inspect the investment criteria
    Criteria {
        #[command(subcommand)]
        command: CriteriaCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CriteriaCommand {
    /// Load and validate a criteria file, then print its headline settings
    Check(CriteriaArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Run(args) => run_pipeline(args),
        Command::Score(args) => score_listings(args),
        Command::Criteria {
            command: CriteriaCommand::Check(args),
        } => check_criteria(args),
    }
}
