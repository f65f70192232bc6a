use crate::utils::error::{PricerError, Result};
use std::fmt;

/// 定價模型的輸入維度
///
/// 宣告順序即模型預期的特徵向量排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    SolarPanels,
    Greenhouses,
    Size,
}

impl Feature {
    pub const COUNT: usize = 3;

    pub const ALL: [Feature; Feature::COUNT] =
        [Feature::SolarPanels, Feature::Greenhouses, Feature::Size];

    /// 此特徵在特徵向量中的位置
    pub fn position(self) -> usize {
        match self {
            Feature::SolarPanels => 0,
            Feature::Greenhouses => 1,
            Feature::Size => 2,
        }
    }

    /// 模型檔中使用的輸入名稱
    pub fn model_input_name(self) -> &'static str {
        match self {
            Feature::SolarPanels => "solarPanels",
            Feature::Greenhouses => "greenhouses",
            Feature::Size => "size",
        }
    }

    /// 配置檔中使用的鍵名
    pub fn config_key(self) -> &'static str {
        match self {
            Feature::SolarPanels => "solar_panels",
            Feature::Greenhouses => "greenhouses",
            Feature::Size => "size",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::SolarPanels => "solar panels",
            Feature::Greenhouses => "greenhouses",
            Feature::Size => "size",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub index: usize,
    pub label: String,
    pub value: f64,
}

impl CatalogEntry {
    pub fn new(index: usize, label: impl Into<String>, value: f64) -> Self {
        Self {
            index,
            label: label.into(),
            value,
        }
    }
}

/// 單次預測的模型輸入，依 [`Feature`] 宣告順序每個特徵一個值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; Feature::COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; Feature::COUNT]) -> Self {
        Self(values)
    }

    /// 從未型別化的切片建立向量，長度不等於 [`Feature::COUNT`] 時回傳錯誤
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; Feature::COUNT] =
            values.try_into().map_err(|_| PricerError::ContractViolation {
                message: format!(
                    "feature vector has {} values, expected {}",
                    values.len(),
                    Feature::COUNT
                ),
            })?;
        Ok(Self(array))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.position()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |&feature| (feature, self.get(feature)))
    }
}

/// 每個特徵目前選取的選項索引
///
/// 由驅動選擇的一方擁有，協調器只透過 [`crate::domain::ports::SelectionSource`] 讀取
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    indices: [usize; Feature::COUNT],
}

impl SelectionState {
    pub fn new(solar_panels: usize, greenhouses: usize, size: usize) -> Self {
        Self {
            indices: [solar_panels, greenhouses, size],
        }
    }

    pub fn select(&mut self, feature: Feature, index: usize) {
        self.indices[feature.position()] = index;
    }

    pub fn index_of(&self, feature: Feature) -> usize {
        self.indices[feature.position()]
    }
}

/// 單次預測週期的最終結果
#[derive(Debug)]
pub enum PredictionResult {
    Priced { price: f64, text: String },
    Failed(PricerError),
}

impl PredictionResult {
    pub fn is_priced(&self) -> bool {
        matches!(self, PredictionResult::Priced { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PredictionResult::Priced { text, .. } => Some(text),
            PredictionResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PricerError> {
        match self {
            PredictionResult::Priced { .. } => None,
            PredictionResult::Failed(e) => Some(e),
        }
    }
}
