//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use cart_core::cart::CartStore;
use cart_core::checkout::StoredOrderService;
use cart_core::OwnerId;
use cart_storage::Backend;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Cart store over whichever backend the config selects.
pub type DynStore = CartStore<Box<dyn Backend>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve_against(&cwd, path)),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Directory relative storage paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(self.cwd.as_path())
    }

    /// Open the cart store, rehydrating persisted state.
    pub fn open_store(&self) -> Result<DynStore> {
        let backend = self.config.storage.open_backend(self.base_dir())?;
        let store = CartStore::open(backend, self.config.storage.key.clone());
        self.output.debug(&format!(
            "Opened {} storage ({} owner(s) in cart)",
            self.config.storage.backend.as_str(),
            store.state().owners().len()
        ));
        Ok(store)
    }

    /// Open the order log that sits next to the cart state.
    pub fn open_orders(&self) -> Result<StoredOrderService<Box<dyn Backend>>> {
        let backend = self.config.storage.open_backend(self.base_dir())?;
        Ok(StoredOrderService::new(backend))
    }
}

/// Pick the owner a command acts for.
///
/// An explicit `--owner` wins; otherwise the active owner is used.
pub fn resolve_owner(arg: Option<&str>, active: Option<&OwnerId>) -> Result<OwnerId> {
    match (arg, active) {
        (Some(owner), _) if !owner.trim().is_empty() => Ok(OwnerId::new(owner)),
        (Some(_), _) => bail!("Owner id cannot be blank"),
        (None, Some(owner)) => Ok(owner.clone()),
        (None, None) => {
            bail!("No owner given and nobody is logged in. Pass --owner or run `shopcart login`.")
        }
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
