//! The `lexkit tourney` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use comfy_table::{Cell, Table};

use lexkit_tourney::coco::{load_results, to_t_file};
use lexkit_tourney::games::{
    default_since, go_array_literal, load_games, max_rating_difference, score_analysis, score_difference_array,
    score_stats, write_analysis_csv, ScoreSummary,
};
use lexkit_tourney::gcg::annotate_directory;

#[derive(Subcommand)]
pub enum TourneyCommand {
    /// Score-difference statistics overall, per lexicon, and per rating
    Stats {
        /// Games CSV export
        games: PathBuf,

        /// Only games on or after this date
        #[arg(long, default_value_t = default_since())]
        since: NaiveDate,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Absolute score differences per lexicon and rating threshold, as CSV
    Analysis {
        games: PathBuf,

        #[arg(long, default_value_t = default_since())]
        since: NaiveDate,

        #[arg(long, default_value = "score_analysis.csv")]
        output: PathBuf,
    },

    /// Write the score-difference table used by standings simulations
    ScoreArray {
        games: PathBuf,

        /// Both players rated at least this
        min_rating: i64,

        /// Only games on or after this date (YYYY-MM-DD)
        start_date: NaiveDate,

        /// Divide each difference's count by this
        scale: f64,

        #[arg(long, default_value = "score_differences.go")]
        output: PathBuf,
    },

    /// Find the game with the largest rating gap in a games CSV
    MaxRatingDiff {
        games: PathBuf,
    },

    /// Convert plain-text results into a .t file
    Coco {
        input: PathBuf,
        output: PathBuf,
    },

    /// Add a tournament and round note to every GCG file in a directory
    Annotate {
        #[arg(long)]
        srcdir: PathBuf,

        #[arg(long)]
        destdir: PathBuf,

        #[arg(long)]
        tourney_name: String,
    },

    /// Download a tournament's config.tsh and division .t file
    Tsh {
        /// Base URL of the published tournament directory
        url: String,

        directory: PathBuf,

        division: String,
    },
}

pub async fn execute(command: TourneyCommand, config: Option<PathBuf>) -> Result<()> {
    match command {
        TourneyCommand::Stats { games, since, json } => {
            let games = load_games(&games)?;
            let stats = score_stats(&games, since);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            println!("Overall Statistics:");
            match &stats.overall {
                Some(summary) => print_summary("", summary),
                None => println!("  No games"),
            }
            println!("\nLexicon Statistics:");
            for (lexicon, summary) in &stats.by_lexicon {
                println!("Lexicon {lexicon}:");
                print_summary("  ", summary);
            }
            println!("\nRating Threshold Statistics:");
            for threshold in &stats.by_threshold {
                println!("{}:", threshold.label());
                print_summary("  ", &threshold.summary);
            }
            Ok(())
        }
        TourneyCommand::Analysis { games, since, output } => {
            let rows = score_analysis(&load_games(&games)?, since);
            let mut table = Table::new();
            table.set_header(vec!["Lexicon", "Threshold", "Average", "StdDev", "Count"]);
            for row in &rows {
                table.add_row(vec![
                    Cell::new(&row.lexicon),
                    Cell::new(row.threshold),
                    Cell::new(optional(row.average)),
                    Cell::new(optional(row.std_deviation)),
                    Cell::new(row.count),
                ]);
            }
            println!("{table}");
            write_analysis_csv(&rows, &output)?;
            println!("\nResults saved to {}", output.display());
            Ok(())
        }
        TourneyCommand::ScoreArray {
            games,
            min_rating,
            start_date,
            scale,
            output,
        } => {
            let table = score_difference_array(&load_games(&games)?, min_rating, start_date, scale)?;
            println!("Games included: {}", table.total_games);
            println!("Array length: {}", table.values.len());
            std::fs::write(&output, go_array_literal(&table.values))
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        TourneyCommand::MaxRatingDiff { games } => {
            let games = load_games(&games)?;
            match max_rating_difference(&games) {
                Some(game) => {
                    let id = game.gameid.map_or_else(|| "?".to_string(), |id| id.to_string());
                    println!("Game with max difference: {id}");
                    println!("Rating difference: {}", game.rating_difference().unwrap_or_default());
                }
                None => println!("No rated games found."),
            }
            Ok(())
        }
        TourneyCommand::Coco { input, output } => {
            let results = load_results(&input)?;
            std::fs::write(&output, to_t_file(&results))
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Wrote {} players and {} games to {}",
                results.players.len(),
                results.games.len(),
                output.display()
            );
            Ok(())
        }
        TourneyCommand::Annotate {
            srcdir,
            destdir,
            tourney_name,
        } => {
            let written = annotate_directory(&srcdir, &destdir, &tourney_name)?;
            println!("Annotated {} games into {}", written.len(), destdir.display());
            Ok(())
        }
        TourneyCommand::Tsh {
            url,
            directory,
            division,
        } => {
            let config = lexkit_remote::load_config_from(config.as_deref())?;
            let xt = &config.crosstables;
            let client = lexkit_remote::http::build_client(&xt.user_agent, xt.timeout_secs)?;
            let written =
                lexkit_remote::tsh::download_tsh_directory(&client, &url, &directory, &division, xt.timeout_secs)
                    .await?;
            for path in written {
                println!("Downloaded {}", path.display());
            }
            println!("Files downloaded successfully.");
            Ok(())
        }
    }
}

fn print_summary(indent: &str, summary: &ScoreSummary) {
    println!("{indent}Average Score Difference: {:.2}", summary.average);
    println!("{indent}Standard Deviation: {:.2}", summary.std_deviation);
    println!("{indent}Total Games: {}", summary.total_games);
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
