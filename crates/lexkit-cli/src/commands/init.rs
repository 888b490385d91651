//! The `lexkit init` command.

use anyhow::Result;

use lexkit_remote::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("lexkit.toml").exists() {
        println!("lexkit.toml already exists, skipping.");
    } else {
        std::fs::write("lexkit.toml", SAMPLE_CONFIG)?;
        println!("Created lexkit.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set a user_agent in lexkit.toml that identifies you to the game database");
    println!("  2. Run: lexkit xt games 100 games.csv");

    Ok(())
}
