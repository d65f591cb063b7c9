use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "timerkit", version, about = "Tabata, cooking and stopwatch timers")]
struct Cli {
    /// Log engine and storage activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabata interval workouts
    Tabata {
        #[command(subcommand)]
        action: commands::tabata::TabataAction,
    },
    /// Multi-step cooking recipes
    Recipe {
        #[command(subcommand)]
        action: commands::recipe::RecipeAction,
    },
    /// Stopwatch with laps
    Stopwatch(commands::stopwatch::StopwatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("timerkit=debug,timerkit_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("timerkit=warn,timerkit_core=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Tabata { action } => commands::tabata::run(action),
        Commands::Recipe { action } => commands::recipe::run(action),
        Commands::Stopwatch(args) => commands::stopwatch::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timerkit", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
