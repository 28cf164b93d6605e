use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "runepause", version, about = "Runepause break reminder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the break scheduler in the foreground
    Run(commands::run::RunArgs),
    /// Pick an activity the way a break would
    Select(commands::select::SelectArgs),
    /// List activities for a break length
    List(commands::select::ListArgs),
    /// Guided breathing session
    Breathe(commands::breathe::BreatheArgs),
    /// Guided stretch routine
    Stretch(commands::stretch::StretchArgs),
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// JSON command channel on stdin/stdout
    Bridge,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("RUNEPAUSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Select(args) => commands::select::run_select(args),
        Commands::List(args) => commands::select::run_list(args),
        Commands::Breathe(args) => commands::breathe::run(args),
        Commands::Stretch(args) => commands::stretch::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Bridge => commands::bridge::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
