//! The `lexkit db` commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use lexkit_core::lexicon::{load_definitions, load_zyzzyva_export};
use lexkit_db::{apply_definitions, open_database, sync_definitions};

#[derive(Subcommand)]
pub enum DbCommand {
    /// Fill in definitions from a quiz program definitions export
    Apply {
        /// SQLite lexicon database
        #[arg(long)]
        db: PathBuf,

        /// Exported definitions file
        #[arg(long)]
        defs: PathBuf,
    },

    /// Replace every definition from a WORD<TAB>definition file, all or nothing
    Sync {
        /// SQLite lexicon database
        #[arg(long)]
        db: PathBuf,

        /// Definitions file covering every word in the database
        #[arg(long)]
        defs: PathBuf,
    },
}

pub fn execute(command: DbCommand) -> Result<()> {
    match command {
        DbCommand::Apply { db, defs } => {
            let defs = load_zyzzyva_export(&defs)?;
            let mut conn = open_database(&db)?;
            let report = apply_definitions(&mut conn, &defs)?;
            for word in &report.missing {
                println!("not found in definitions dictionary: {word}");
            }
            println!("Updated {} definitions.", report.updated);
            Ok(())
        }
        DbCommand::Sync { db, defs } => {
            let defs = load_definitions(&defs)?;
            let mut conn = open_database(&db)?;
            let updated = sync_definitions(&mut conn, &defs)?;
            println!(
                "Update successful. {updated} words were updated with new definitions. \
                 Restart the quiz program for the changes to take effect."
            );
            Ok(())
        }
    }
}
