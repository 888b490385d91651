//! The `lexkit xt` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use lexkit_remote::crosstables::{
    collect_games, download_annotations, scan_max_rating_difference, GameCsvWriter, SCAN_CHUNK,
};
use lexkit_remote::{CrossTablesClient, GameSource, RetryPolicy};

#[derive(Subcommand)]
pub enum XtCommand {
    /// Export the most recent N games to CSV
    Games {
        /// Number of games to collect
        n: usize,

        /// Output CSV file (overwritten)
        output: PathBuf,
    },

    /// Scan the whole archive for the largest rating gap
    MaxDiff,

    /// Download a player's annotated games from a date range
    Annos {
        player_id: i64,

        /// YYYY-MM-DD
        start_date: NaiveDate,

        /// YYYY-MM-DD
        end_date: NaiveDate,

        /// Directory to create the download folder in
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

pub async fn execute(command: XtCommand, config: Option<PathBuf>) -> Result<()> {
    let config = lexkit_remote::load_config_from(config.as_deref())?;
    let client = CrossTablesClient::new(&config.crosstables)?;

    match command {
        XtCommand::Games { n, output } => {
            let highest = client
                .max_game_id()
                .await
                .context("could not retrieve the highest game ID")?;
            if output.exists() {
                println!("Overwriting existing file: {}", output.display());
            }
            let file = std::fs::File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            let mut writer = GameCsvWriter::new(file);
            let policy = RetryPolicy::from(&config.crosstables);
            let written = collect_games(
                &client,
                highest,
                n,
                config.crosstables.chunk_size,
                &policy,
                &mut writer,
            )
            .await?;
            writer.into_inner()?;
            println!("Finished collecting games. Wrote {written} of {n} requested to {}.", output.display());
            Ok(())
        }
        XtCommand::MaxDiff => {
            let highest = client
                .max_game_id()
                .await
                .context("could not retrieve the highest game ID")?;
            match scan_max_rating_difference(&client, highest, SCAN_CHUNK).await? {
                Some((game, diff)) => {
                    let id = game
                        .get("gameid")
                        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                        .unwrap_or_default();
                    println!("Game with max difference: {id}");
                    println!("Rating difference: {diff}");
                }
                None => println!("No rated games found."),
            }
            Ok(())
        }
        XtCommand::Annos {
            player_id,
            start_date,
            end_date,
            output_dir,
        } => {
            let saved = download_annotations(&client, player_id, start_date, end_date, &output_dir).await?;
            for path in &saved {
                println!("Saved {}", path.display());
            }
            println!("\nFinished. Downloaded {} annotated games.", saved.len());
            Ok(())
        }
    }
}
