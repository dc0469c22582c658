use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::fs::DataDir;

/// Create the data directory layout and write a default `cottonflow.toml`.
pub fn execute(data_dir: &DataDir) -> Result<()> {
    println!("\n{}", "Initialize".bold());
    println!("{}", "─".repeat(40).dimmed());

    data_dir.initialize()?;
    println!(
        "  {} Directory structure created {}",
        "✓".green().bold(),
        data_dir.root().display().to_string().dimmed()
    );

    let config_path = data_dir.config_path();
    if config_path.exists() {
        println!(
            "  {} Keeping existing {}",
            "○".yellow(),
            config_path.display()
        );
    } else {
        Config::default().save(&config_path)?;
        println!(
            "  {} Default configuration written {}",
            "✓".green().bold(),
            config_path.display().to_string().dimmed()
        );
    }

    println!(
        "\n  Users: {} (Manager), {} (Chairman). Edit the config to change them.",
        "manager".cyan(),
        "chairman".cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_default_config() {
        let temp = TempDir::new().unwrap();
        let data_dir = DataDir::new(temp.path().join(".cottonflow"));

        execute(&data_dir).unwrap();
        let config = Config::load(&data_dir.config_path()).unwrap();
        assert_eq!(config, Config::default());

        assert!(execute(&data_dir).is_err());
    }
}
