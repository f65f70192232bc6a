use anyhow::Context;
use clap::Parser;
use mars_habitat_pricer::app::grid::export_price_grid;
use mars_habitat_pricer::config::toml_config::FormatterConfig;
use mars_habitat_pricer::utils::error::ErrorSeverity;
use mars_habitat_pricer::utils::{logger, validation::Validate};
use mars_habitat_pricer::{
    CliConfig, ConfigProvider, ConsoleSink, Feature, PredictionEngine, PredictionOrchestrator,
    PredictionResult, PriceFormatter, PricerError, TomlConfig,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置並套用命令列覆蓋設定
    let toml_config = match &cli.config {
        Some(path) => {
            let mut config = TomlConfig::from_file(path).with_context(|| {
                format!(
                    "Failed to load config file '{}'; make sure it exists and is valid TOML",
                    path
                )
            })?;
            if let Some(model) = &cli.model {
                config.model.path = model.clone();
            }
            if let Some(locale) = &cli.locale {
                config.formatter = Some(FormatterConfig {
                    locale: Some(locale.clone()),
                });
            }
            Some(config)
        }
        None => None,
    };

    let verbose = cli.verbose || toml_config.as_ref().is_some_and(|c| c.verbose());
    let json_logs = cli.log_json || toml_config.as_ref().is_some_and(|c| c.json_logs());

    // 初始化日誌
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting mars-habitat-pricer");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &toml_config {
        Some(config) => run(&cli, config),
        None => run(&cli, &cli),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Pricer failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        // 預測失敗已由 ConsoleSink 顯示
        if !e.is_recoverable() {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        }
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

fn run<C: ConfigProvider + Validate>(cli: &CliConfig, config: &C) -> Result<(), PricerError> {
    config.validate()?;
    cli.validate()?;

    let catalog = Arc::new(config.catalog()?);
    let formatter = PriceFormatter::for_locale(config.locale())?;
    let engine = PredictionEngine::load(config.model_path());

    let mut orchestrator = PredictionOrchestrator::new(catalog, engine, formatter, ConsoleSink);

    if cli.list_options {
        for feature in Feature::ALL {
            let labels = (0..orchestrator.option_count(feature))
                .map(|index| orchestrator.option_label(feature, index).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            println!("{}:", feature);
            for (index, label) in labels.iter().enumerate() {
                println!("  [{}] {}", index, label);
            }
        }
        return Ok(());
    }

    if let Some(grid_path) = &cli.grid {
        let file = std::fs::File::create(grid_path)?;
        let rows = export_price_grid(&mut orchestrator, file)?;
        println!("📁 Wrote {} rows to {}", rows, grid_path);
        return Ok(());
    }

    match orchestrator.start(&cli.selection()) {
        PredictionResult::Priced { .. } => Ok(()),
        PredictionResult::Failed(e) => Err(e),
    }
}

fn exit_code(error: &PricerError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
