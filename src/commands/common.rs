use anyhow::{bail, Context as _, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::fs::DataDir;
use crate::identity::{IdentityProvider, UserDirectory};
use crate::models::Actor;
use crate::store::FileStore;
use crate::workflow::{parse_form, Workflow};

/// Everything a command needs: the opened data directory, its config and
/// a workflow over the file store.
pub struct Context {
    pub data_dir: DataDir,
    pub config: Config,
    pub users: UserDirectory,
    pub workflow: Workflow<FileStore>,
}

impl Context {
    /// Open an initialized data directory.
    pub fn open(data_dir: &DataDir) -> Result<Self> {
        if !data_dir.contracts_dir().exists() {
            bail!(
                "No data directory at {}. Run 'cottonflow init' first.",
                data_dir.root().display()
            );
        }

        let config = load_config(data_dir)?;
        let store = FileStore::open(data_dir.clone())?;
        Ok(Self {
            data_dir: data_dir.clone(),
            users: UserDirectory::new(config.users.clone()),
            workflow: Workflow::new(store, config.workflow.clone()),
            config,
        })
    }

    /// Resolve the acting user named by `--user`.
    pub fn actor(&self, user: Option<&str>) -> Result<Actor> {
        let Some(username) = user else {
            bail!("This command needs --user <username>");
        };
        Ok(self.users.session(username).current_actor()?)
    }
}

pub fn load_config(data_dir: &DataDir) -> Result<Config> {
    Config::load(&data_dir.config_path())
}

/// Read a JSON payload from `path`, or from stdin when `path` is `-`.
///
/// Parse failures stay `WorkflowError::Validation` so the CLI exits with the
/// validation status.
pub fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload: {}", path.display()))?
    };

    Ok(parse_form(&content)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
