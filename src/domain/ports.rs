use crate::core::catalog::FeatureCatalog;
use crate::domain::model::{Feature, FeatureVector, SelectionState};
use crate::utils::error::{PricerError, Result};

/// 對固定順序特徵向量做純量迴歸
pub trait Predictor {
    fn predict(&self, vector: &FeatureVector) -> Result<f64>;
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, vector: &FeatureVector) -> Result<f64> {
        (**self).predict(vector)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, vector: &FeatureVector) -> Result<f64> {
        (**self).predict(vector)
    }
}

/// 讀取目前的選項選擇
pub trait SelectionSource {
    fn selected_index(&self, feature: Feature) -> usize;
}

impl SelectionSource for SelectionState {
    fn selected_index(&self, feature: Feature) -> usize {
        self.index_of(feature)
    }
}

/// 接收協調器的兩種輸出：價格文字與預測失敗
pub trait PriceSink {
    fn on_price_text_updated(&mut self, text: &str);
    fn on_prediction_failed(&mut self, reason: &PricerError);
}

pub trait ConfigProvider {
    fn model_path(&self) -> &str;
    fn locale(&self) -> &str;
    fn catalog(&self) -> Result<FeatureCatalog>;
}
