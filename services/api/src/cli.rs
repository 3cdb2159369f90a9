use crate::commands::{run_lead, run_quote, LeadArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use showroom::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Showroom",
    about = "Serve car model pages, quote configurations and capture leads",
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
    /// Print an itemized price and on-road cost breakdown for a configuration
    Quote(QuoteArgs),
    /// Validate a lead and hand it to the simulated CRM
    Lead(LeadArgs),
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
        Command::Quote(args) => run_quote(args).await,
        Command::Lead(args) => run_lead(args).await,
    }
}
