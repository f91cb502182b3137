//! Core application

use anyhow::{Context, Result};

use crate::component::{Component, Options, Registry};
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::spanmetrics;

pub struct CoreApp {
    pub config: AppConfig,
    pub registry: Registry,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command.unwrap_or(Commands::Check) {
            Commands::Components => {
                let registry = Self::default_registry()?;
                Self::print_components(&registry)
            }
            Commands::Check => Self::init(&cli_config)?.check(),
            Commands::Convert { pretty } => Self::init(&cli_config)?.convert(pretty),
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Self::with_config(config)
    }

    /// Build an app over an already loaded config
    pub fn with_config(config: AppConfig) -> Result<Self> {
        let registry = Self::default_registry()?;
        Ok(Self { config, registry })
    }

    /// Registry holding every built-in component
    pub fn default_registry() -> Result<Registry> {
        let mut registry = Registry::new();
        spanmetrics::register(&mut registry).context("Failed to register span metrics connector")?;
        Ok(registry)
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Build one component per configured connector, stopping at the first failure
    pub fn build_all(&self) -> Result<Vec<Box<dyn Component>>> {
        self.config
            .connectors
            .iter()
            .map(|connector| {
                let id = connector.id();
                let opts = Options { id: id.clone() };
                self.registry
                    .build(&connector.component, opts, &connector.arguments)
                    .with_context(|| format!("Failed to build {}", id))
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        let mut failed = 0usize;
        for connector in &self.config.connectors {
            let id = connector.id();
            let opts = Options { id: id.clone() };
            match self
                .registry
                .build(&connector.component, opts, &connector.arguments)
            {
                Ok(_) => tracing::info!(id = %id, "Connector configuration is valid"),
                Err(e) => {
                    failed += 1;
                    tracing::error!(id = %id, error = %e, "Connector configuration is invalid");
                }
            }
        }

        if failed > 0 {
            anyhow::bail!(
                "{} of {} connectors failed to build",
                failed,
                self.config.connectors.len()
            );
        }

        tracing::info!(connectors = self.config.connectors.len(), "Config OK");
        Ok(())
    }

    /// Effective engine config of every connector, keyed by instance id
    pub fn effective_configs(&self) -> Result<serde_json::Value> {
        let mut configs = serde_json::Map::new();
        for component in self.build_all()? {
            let config = component
                .effective_config()
                .with_context(|| format!("Failed to serialize config of {}", component.id()))?;
            configs.insert(component.id().to_string(), config);
        }
        Ok(serde_json::Value::Object(configs))
    }

    fn convert(&self, pretty: bool) -> Result<()> {
        let configs = self.effective_configs()?;
        let output = if pretty {
            serde_json::to_string_pretty(&configs)?
        } else {
            serde_json::to_string(&configs)?
        };
        println!("{}", output);
        Ok(())
    }

    fn print_components(registry: &Registry) -> Result<()> {
        for name in registry.names() {
            let Some(registration) = registry.get(name) else {
                continue;
            };
            let prototype = registration
                .prototype()
                .with_context(|| format!("Failed to serialize defaults of {}", name))?;
            println!("{} ({})", name, registration.stability());
            println!("  exports: {}", registration.exports().fields().join(", "));
            println!("  arguments: {}", prototype);
        }
        Ok(())
    }
}
