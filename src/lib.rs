pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::app::console::{ConsoleSink, SilentSink};
pub use crate::core::{
    catalog::{FeatureCatalog, FeatureTable},
    engine::{LinearRegressionModel, ModelArtifact, PredictionEngine},
    formatter::{CurrencyStyle, PriceFormatter},
    orchestrator::{CyclePhase, PredictionOrchestrator},
};
pub use domain::model::{CatalogEntry, Feature, FeatureVector, PredictionResult, SelectionState};
pub use domain::ports::{ConfigProvider, PriceSink, Predictor, SelectionSource};
pub use utils::error::{PricerError, Result};
