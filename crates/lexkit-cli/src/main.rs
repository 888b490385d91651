//! lexkit CLI — word-game lexicon and tournament tools.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::{db, defs, quiz, tourney, words, xt};

#[derive(Parser)]
#[command(name = "lexkit", version, about = "Word-game lexicon and tournament tools")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Word list analysis: anagrams, bingo quizzes, statistics, exports
    Words {
        #[command(subcommand)]
        command: words::WordsCommand,
    },

    /// Build and reshape quiz files
    Quiz {
        #[command(subcommand)]
        command: quiz::QuizCommand,
    },

    /// Definition analysis and lexicon edition updates
    Defs {
        #[command(subcommand)]
        command: defs::DefsCommand,
    },

    /// Game statistics and tournament files
    Tourney {
        #[command(subcommand)]
        command: tourney::TourneyCommand,
    },

    /// Query the cross-tables game database
    Xt {
        #[command(subcommand)]
        command: xt::XtCommand,
    },

    /// Write definitions into a quiz program lexicon database
    Db {
        #[command(subcommand)]
        command: db::DbCommand,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Words { command } => words::execute(command),
        Commands::Quiz { command } => quiz::execute(command, config).await,
        Commands::Defs { command } => defs::execute(command, config).await,
        Commands::Tourney { command } => tourney::execute(command, config).await,
        Commands::Xt { command } => xt::execute(command, config).await,
        Commands::Db { command } => db::execute(command),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
