use crate::core::catalog::{default_table, FeatureCatalog, FeatureTable};
use crate::core::engine::DEFAULT_MODEL_PATH;
use crate::core::formatter::{CurrencyStyle, DEFAULT_LOCALE};
use crate::domain::model::{CatalogEntry, Feature};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PricerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pricer: PricerConfig,
    pub model: ModelConfig,
    pub formatter: Option<FormatterConfig>,
    pub catalog: Option<CatalogConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricerConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub solar_panels: Option<FeatureTableConfig>,
    pub greenhouses: Option<FeatureTableConfig>,
    pub size: Option<FeatureTableConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTableConfig {
    pub entries: Vec<EntryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    /// 省略時依照列出的順序編號
    pub index: Option<usize>,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricerError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("pricer.name", &self.pricer.name)?;
        validate_path("model.path", &self.model.path)?;
        // 未設定的環境變數會保留 ${VAR} 原樣
        if self.model.path.contains("${") {
            return Err(PricerError::MissingConfigError {
                field: "model.path".to_string(),
            });
        }
        CurrencyStyle::for_locale(self.locale())?;
        self.build_catalog()?;
        Ok(())
    }

    /// 建立特徵目錄，未設定的特徵使用內建表
    pub fn build_catalog(&self) -> Result<FeatureCatalog> {
        let mut tables = Vec::with_capacity(Feature::COUNT);
        for feature in Feature::ALL {
            let table = match self.table_config(feature) {
                Some(config) => config.to_table(feature)?,
                None => default_table(feature),
            };
            tables.push((feature, table));
        }

        FeatureCatalog::new(tables)
    }

    fn table_config(&self, feature: Feature) -> Option<&FeatureTableConfig> {
        let catalog = self.catalog.as_ref()?;
        match feature {
            Feature::SolarPanels => catalog.solar_panels.as_ref(),
            Feature::Greenhouses => catalog.greenhouses.as_ref(),
            Feature::Size => catalog.size.as_ref(),
        }
    }

    pub fn locale(&self) -> &str {
        self.formatter
            .as_ref()
            .and_then(|f| f.locale.as_deref())
            .unwrap_or(DEFAULT_LOCALE)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            pricer: PricerConfig {
                name: "mars-habitat-pricer".to_string(),
                description: None,
            },
            model: ModelConfig {
                path: DEFAULT_MODEL_PATH.to_string(),
            },
            formatter: None,
            catalog: None,
            logging: None,
        }
    }
}

impl FeatureTableConfig {
    pub fn to_table(&self, feature: Feature) -> Result<FeatureTable> {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                CatalogEntry::new(
                    entry.index.unwrap_or(position),
                    entry.label.clone(),
                    entry.value,
                )
            })
            .collect();
        FeatureTable::new(feature, entries)
    }
}

impl ConfigProvider for TomlConfig {
    fn model_path(&self) -> &str {
        &self.model.path
    }

    fn locale(&self) -> &str {
        TomlConfig::locale(self)
    }

    fn catalog(&self) -> Result<FeatureCatalog> {
        self.build_catalog()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
