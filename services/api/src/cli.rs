use crate::report::{run_calculation, run_custom_calculation, CalculateArgs, CustomArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grade_calc::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "IGCSE Grade Calculator",
    about = "Calculate weighted syllabus totals, grades and uniform marks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grade marks against the bundled weighting factors and thresholds
    Calculate(CalculateArgs),
    /// Grade marks against weightings and thresholds read from a JSON file
    Custom(CustomArgs),
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
        Command::Calculate(args) => run_calculation(args),
        Command::Custom(args) => run_custom_calculation(args),
    }
}
