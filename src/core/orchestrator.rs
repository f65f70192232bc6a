use crate::core::catalog::FeatureCatalog;
use crate::core::formatter::PriceFormatter;
use crate::domain::model::{Feature, FeatureVector, PredictionResult};
use crate::domain::ports::{PriceSink, Predictor, SelectionSource};
use crate::utils::error::{PricerError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Resolving,
    Predicting,
    Formatting,
}

/// 將目前的選擇轉換為發布的價格文字
///
/// 每次 [`PredictionOrchestrator::run_cycle`] 都重新讀取所有特徵的索引，經由目錄解析後
/// 交給預測器取得價格，再把格式化文字（或失敗原因）交給 sink。
/// 失敗的週期不會更動已顯示的文字。
pub struct PredictionOrchestrator<P: Predictor, K: PriceSink> {
    catalog: Arc<FeatureCatalog>,
    engine: P,
    formatter: PriceFormatter,
    sink: K,
    phase: CyclePhase,
}

impl<P: Predictor, K: PriceSink> PredictionOrchestrator<P, K> {
    pub fn new(catalog: Arc<FeatureCatalog>, engine: P, formatter: PriceFormatter, sink: K) -> Self {
        Self {
            catalog,
            engine,
            formatter,
            sink,
            phase: CyclePhase::Idle,
        }
    }

    /// 以初始選擇執行啟動時的預測
    pub fn start<S: SelectionSource>(&mut self, selection: &S) -> PredictionResult {
        tracing::debug!("Running initial prediction");
        self.run_cycle(selection)
    }

    /// 變更的特徵只用於日誌，整個選擇都會重新讀取
    pub fn on_selection_changed<S: SelectionSource>(
        &mut self,
        feature: Feature,
        new_index: usize,
        selection: &S,
    ) -> PredictionResult {
        tracing::debug!("Selection changed: {} -> {}", feature, new_index);
        self.run_cycle(selection)
    }

    pub fn run_cycle<S: SelectionSource>(&mut self, selection: &S) -> PredictionResult {
        let result = match self.compute(selection) {
            Ok((price, text)) => {
                tracing::info!("Predicted price {} ({})", text, price);
                self.sink.on_price_text_updated(&text);
                PredictionResult::Priced { price, text }
            }
            Err(e) => {
                if let PricerError::ContractViolation { message } = &e {
                    tracing::error!("Prediction pipeline mis-wired: {}", message);
                    if cfg!(debug_assertions) {
                        panic!("contract violation: {}", message);
                    }
                } else {
                    tracing::warn!("Prediction failed: {}", e);
                }
                self.sink.on_prediction_failed(&e);
                PredictionResult::Failed(e)
            }
        };
        self.enter(CyclePhase::Idle);
        result
    }

    fn enter(&mut self, phase: CyclePhase) {
        tracing::debug!("Cycle phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn compute<S: SelectionSource>(&mut self, selection: &S) -> Result<(f64, String)> {
        self.enter(CyclePhase::Resolving);
        let vector = self.resolve(selection)?;
        tracing::debug!("Resolved feature vector {:?}", vector.as_slice());

        self.enter(CyclePhase::Predicting);
        let price = self.engine.predict(&vector)?;

        self.enter(CyclePhase::Formatting);
        Ok((price, self.formatter.format(price)))
    }

    /// 為 `selection` 建立特徵向量，遇到第一個目錄中不存在的索引即失敗
    pub fn resolve<S: SelectionSource>(&self, selection: &S) -> Result<FeatureVector> {
        let mut values = [0.0; Feature::COUNT];
        for feature in Feature::ALL {
            let index = selection.selected_index(feature);
            values[feature.position()] = self.catalog.value_for(feature, index)?;
        }
        Ok(FeatureVector::new(values))
    }

    pub fn option_count(&self, feature: Feature) -> usize {
        self.catalog.count_for(feature)
    }

    pub fn option_label(&self, feature: Feature, index: usize) -> Result<&str> {
        self.catalog.label_for(feature, index)
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::FeatureTable;
    use crate::domain::model::SelectionState;
    use std::cell::{Cell, RefCell};

    struct FakeEngine {
        response: fn() -> Result<f64>,
        calls: Cell<usize>,
        last_vector: RefCell<Option<FeatureVector>>,
    }

    impl FakeEngine {
        fn returning(response: fn() -> Result<f64>) -> Self {
            Self {
                response,
                calls: Cell::new(0),
                last_vector: RefCell::new(None),
            }
        }
    }

    impl Predictor for FakeEngine {
        fn predict(&self, vector: &FeatureVector) -> Result<f64> {
            self.calls.set(self.calls.get() + 1);
            *self.last_vector.borrow_mut() = Some(*vector);
            (self.response)()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        displayed: Option<String>,
        updates: Vec<String>,
        failures: Vec<String>,
    }

    impl PriceSink for RecordingSink {
        fn on_price_text_updated(&mut self, text: &str) {
            self.displayed = Some(text.to_string());
            self.updates.push(text.to_string());
        }

        fn on_prediction_failed(&mut self, reason: &PricerError) {
            self.failures.push(reason.to_string());
        }
    }

    fn small_catalog() -> Arc<FeatureCatalog> {
        Arc::new(
            FeatureCatalog::new([
                (
                    Feature::SolarPanels,
                    FeatureTable::from_pairs(Feature::SolarPanels, [("4", 4.0), ("8", 8.0)])
                        .unwrap(),
                ),
                (
                    Feature::Greenhouses,
                    FeatureTable::from_pairs(Feature::Greenhouses, [("1", 1.0)]).unwrap(),
                ),
                (
                    Feature::Size,
                    FeatureTable::from_pairs(Feature::Size, [("600 m³", 600.0)]).unwrap(),
                ),
            ])
            .unwrap(),
        )
    }

    fn orchestrator(
        engine: FakeEngine,
    ) -> PredictionOrchestrator<FakeEngine, RecordingSink> {
        PredictionOrchestrator::new(
            small_catalog(),
            engine,
            PriceFormatter::default(),
            RecordingSink::default(),
        )
    }

    #[test]
    fn test_cycle_publishes_formatted_price() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| Ok(5_000_000.0)));
        let result = orchestrator.start(&SelectionState::new(0, 0, 0));

        assert_eq!(result.text(), Some("$5,000,000"));
        assert_eq!(
            *orchestrator.engine.last_vector.borrow(),
            Some(FeatureVector::new([4.0, 1.0, 600.0]))
        );
        assert_eq!(orchestrator.sink().displayed.as_deref(), Some("$5,000,000"));
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
    }

    #[test]
    fn test_out_of_range_selection_skips_engine() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| Ok(1.0)));
        let result = orchestrator.run_cycle(&SelectionState::new(5, 0, 0));

        assert!(matches!(
            result.error(),
            Some(PricerError::CatalogOutOfRange { feature: Feature::SolarPanels, index: 5, count: 2 })
        ));
        assert_eq!(orchestrator.engine.calls.get(), 0);
        assert_eq!(orchestrator.sink().failures.len(), 1);
        assert!(orchestrator.sink().updates.is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_text() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| Ok(1_250.0)));
        orchestrator.start(&SelectionState::default());
        assert_eq!(orchestrator.sink().displayed.as_deref(), Some("$1,250"));

        orchestrator.engine.response = || {
            Err(PricerError::ModelUnavailable {
                reason: "not loaded".to_string(),
            })
        };
        let result = orchestrator.on_selection_changed(
            Feature::SolarPanels,
            1,
            &SelectionState::new(1, 0, 0),
        );

        assert!(matches!(result.error(), Some(PricerError::ModelUnavailable { .. })));
        assert_eq!(orchestrator.sink().displayed.as_deref(), Some("$1,250"));
        assert_eq!(orchestrator.sink().updates.len(), 1);
        assert_eq!(orchestrator.sink().failures.len(), 1);
    }

    #[test]
    fn test_selection_change_rereads_every_feature() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| Ok(10.0)));
        let mut selection = SelectionState::default();
        selection.select(Feature::SolarPanels, 1);

        orchestrator.on_selection_changed(Feature::Size, 0, &selection);

        assert_eq!(
            *orchestrator.engine.last_vector.borrow(),
            Some(FeatureVector::new([8.0, 1.0, 600.0]))
        );
    }

    #[test]
    fn test_repeated_cycles_are_idempotent() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| Ok(42_000.4)));
        let selection = SelectionState::new(1, 0, 0);

        let first = orchestrator.run_cycle(&selection);
        let second = orchestrator.run_cycle(&selection);

        assert_eq!(first.text(), second.text());
        assert_eq!(orchestrator.sink().updates, vec!["$42,000", "$42,000"]);
    }

    #[test]
    fn test_options_delegate_to_catalog() {
        let orchestrator = orchestrator(FakeEngine::returning(|| Ok(0.0)));
        assert_eq!(orchestrator.option_count(Feature::SolarPanels), 2);
        assert_eq!(orchestrator.option_label(Feature::Size, 0).unwrap(), "600 m³");
        assert!(orchestrator.option_label(Feature::Size, 1).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "contract violation")]
    fn test_contract_violation_panics_in_debug() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| {
            Err(PricerError::ContractViolation {
                message: "vector too short".to_string(),
            })
        }));
        orchestrator.run_cycle(&SelectionState::default());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_contract_violation_published_in_release() {
        let mut orchestrator = orchestrator(FakeEngine::returning(|| {
            Err(PricerError::ContractViolation {
                message: "vector too short".to_string(),
            })
        }));
        let result = orchestrator.run_cycle(&SelectionState::default());

        assert!(matches!(
            result.error(),
            Some(PricerError::ContractViolation { .. })
        ));
        assert_eq!(orchestrator.phase(), CyclePhase::Idle);
        let sink = orchestrator.sink();
        assert_eq!(sink.failures, vec!["Contract violation: vector too short".to_string()]);
        assert!(sink.displayed.is_none());
        assert!(sink.updates.is_empty());
    }
}
