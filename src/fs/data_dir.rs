use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".cottonflow";

/// Environment variable overriding the data directory location
pub const DATA_DIR_ENV: &str = "COTTONFLOW_DATA_DIR";

pub const CONFIG_FILE: &str = "cottonflow.toml";

/// Layout of the data directory used by the file-backed store.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve the data directory: explicit path, else `COTTONFLOW_DATA_DIR`,
    /// else `.cottonflow` in the current directory.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        match std::env::var_os(DATA_DIR_ENV) {
            Some(path) if !path.is_empty() => Self::new(PathBuf::from(path)),
            _ => Self::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        if self.contracts_dir().exists() {
            bail!(
                "Data directory already initialized: {}",
                self.root.display()
            );
        }

        fs::create_dir_all(self.contracts_dir()).with_context(|| {
            format!(
                "Failed to create contracts directory: {}",
                self.contracts_dir().display()
            )
        })?;

        self.create_readme()?;

        Ok(())
    }

    /// Make sure the directory layout exists, creating missing parts.
    pub fn ensure(&self) -> Result<()> {
        let contracts = self.contracts_dir();
        if !contracts.exists() {
            fs::create_dir_all(&contracts).with_context(|| {
                format!(
                    "Failed to create contracts directory: {}",
                    contracts.display()
                )
            })?;
        }
        Ok(())
    }

    fn create_readme(&self) -> Result<()> {
        let readme_content = r#"# cottonflow data directory

- `cottonflow.toml` - workflow settings and users
- `contracts/` - one JSON document per contract (records + history)
- `vendors.json` - vendor registry
- `counters.json` - id counters

Files are written under advisory locks. Do not edit them by hand while
cottonflow is running.
"#;

        let readme_path = self.root.join("README.md");
        fs::write(readme_path, readme_content).context("Failed to create README.md")?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn contracts_dir(&self) -> PathBuf {
        self.root.join("contracts")
    }

    pub fn vendors_path(&self) -> PathBuf {
        self.root.join("vendors.json")
    }

    pub fn counters_path(&self) -> PathBuf {
        self.root.join("counters.json")
    }

    /// Lock guarding the vendor registry and the id counters
    pub fn registry_lock_path(&self) -> PathBuf {
        self.root.join("registry.lock")
    }
}
