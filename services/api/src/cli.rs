use crate::demo::{
    run_cost, run_demo, run_recommend, run_timeline, CostArgs, DemoArgs, RecommendArgs,
    TimelineArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use visa_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Visa Advisor",
    about = "Rank foreign-worker visa options and project their hiring cost and timeline",
    version
)]
struct Cli {
    /// Load rule tables from this JSON file instead of the bundled set
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Screen, rank and assess visa options for a hiring profile
    Recommend(RecommendArgs),
    /// Project hiring cost for one visa option, optionally against a domestic hire
    Cost(CostArgs),
    /// Lay out the onboarding schedule for one visa option
    Timeline(TimelineArgs),
    /// Walk through a sample manufacturing hire end to end
    Demo(DemoArgs),
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
    let rules = cli.rules;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, rules).await,
        Command::Recommend(args) => run_recommend(args, rules),
        Command::Cost(args) => run_cost(args, rules),
        Command::Timeline(args) => run_timeline(args, rules),
        Command::Demo(args) => run_demo(args, rules),
    }
}
