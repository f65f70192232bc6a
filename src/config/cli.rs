use crate::core::catalog::FeatureCatalog;
use crate::core::engine::DEFAULT_MODEL_PATH;
use crate::core::formatter::{CurrencyStyle, DEFAULT_LOCALE};
use crate::domain::model::SelectionState;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "mars-habitat-pricer")]
#[command(about = "Estimate the price of a Mars habitat from its solar panels, greenhouses and size")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model artifact to load (overrides the configuration file)
    #[arg(long)]
    pub model: Option<String>,

    /// Currency locale (overrides the configuration file)
    #[arg(long)]
    pub locale: Option<String>,

    /// Selected solar panels option
    #[arg(long, default_value = "0")]
    pub solar_panels: usize,

    /// Selected greenhouses option
    #[arg(long, default_value = "0")]
    pub greenhouses: usize,

    /// Selected size option
    #[arg(long, default_value = "0")]
    pub size: usize,

    /// Print every option per feature and exit
    #[arg(long)]
    pub list_options: bool,

    /// Write the price of every option combination to this CSV file
    #[arg(long)]
    pub grid: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn selection(&self) -> SelectionState {
        SelectionState::new(self.solar_panels, self.greenhouses, self.size)
    }
}

impl ConfigProvider for CliConfig {
    fn model_path(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL_PATH)
    }

    fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    fn catalog(&self) -> Result<FeatureCatalog> {
        Ok(FeatureCatalog::mars_habitat())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("--model", self.model_path())?;
        if let Some(grid) = &self.grid {
            validate_path("--grid", grid)?;
        }
        CurrencyStyle::for_locale(self.locale())?;
        Ok(())
    }
}
