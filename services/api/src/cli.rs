use crate::commands::{run_recommend, run_seed, RecommendArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use uni_directory::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "University Directory",
    about = "Serve, seed, and query the university directory from the command line",
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
    /// Import universities, programs, and admission records from a JSON file
    Seed(SeedArgs),
    /// Ask the advisor for a single university recommendation
    Recommend(RecommendArgs),
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
        Command::Seed(args) => run_seed(args),
        Command::Recommend(args) => run_recommend(args).await,
    }
}
