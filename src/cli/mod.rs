//! Non-interactive report commands behind `finance_core_cli`.

mod args;
pub mod commands;
pub mod output;

use std::{env, path::PathBuf, sync::Arc};

use crate::{
    config::{Config, ConfigManager},
    core::{Clock, SystemClock},
    errors::{FinanceError, Result},
};

use commands::CommandRegistry;

/// State shared by every command invocation.
pub struct CliContext {
    pub config: Config,
    pub base_dir: PathBuf,
    pub clock: Arc<dyn Clock>,
}

impl CliContext {
    pub fn load() -> Result<Self> {
        let manager = ConfigManager::new();
        let config = manager.load()?;
        Ok(Self {
            config,
            base_dir: manager.base_dir().to_path_buf(),
            clock: Arc::new(SystemClock),
        })
    }
}

/// Entry point used by the binary: reads the process arguments.
pub fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut context = CliContext::load()?;
    crate::init_with_filter(context.config.log_filter.as_deref());
    run_with_args(&mut context, &args)
}

pub fn run_with_args(context: &mut CliContext, args: &[String]) -> Result<()> {
    let registry = CommandRegistry::default();
    let (name, rest) = match args.split_first() {
        Some((name, rest)) => (name.as_str(), rest),
        None => ("help", args),
    };
    let entry = registry.get(name).ok_or_else(|| {
        FinanceError::InvalidInput(format!("unknown command `{name}`; try `help`"))
    })?;
    tracing::debug!(command = entry.name, "dispatching command");
    (entry.handler)(context, rest)
}
