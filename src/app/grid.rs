use crate::core::orchestrator::PredictionOrchestrator;
use crate::domain::model::{Feature, PredictionResult, SelectionState};
use crate::domain::ports::{PriceSink, Predictor};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub solar_panels: String,
    pub greenhouses: String,
    pub size: String,
    pub status: &'static str,
    pub price: String,
}

/// 對每種選項組合執行一次預測週期並輸出成 CSV，回傳寫入的列數
pub fn export_price_grid<P, K, W>(
    orchestrator: &mut PredictionOrchestrator<P, K>,
    writer: W,
) -> Result<usize>
where
    P: Predictor,
    K: PriceSink,
    W: Write,
{
    let counts = Feature::ALL.map(|feature| orchestrator.option_count(feature));
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for selection in combinations(counts) {
        let (status, price) = match orchestrator.run_cycle(&selection) {
            PredictionResult::Priced { text, .. } => ("ok", text),
            PredictionResult::Failed(e) => ("failed", e.user_friendly_message()),
        };

        let label = |feature: Feature| -> Result<String> {
            Ok(orchestrator
                .option_label(feature, selection.index_of(feature))?
                .to_string())
        };

        csv_writer.serialize(GridRow {
            solar_panels: label(Feature::SolarPanels)?,
            greenhouses: label(Feature::Greenhouses)?,
            size: label(Feature::Size)?,
            status,
            price,
        })?;
        rows += 1;
    }

    csv_writer.flush()?;
    tracing::info!("Wrote {} price grid rows", rows);
    Ok(rows)
}

/// 依列優先順序列出所有選擇，最後一個特徵變化最快
fn combinations(counts: [usize; Feature::COUNT]) -> Vec<SelectionState> {
    if counts.iter().any(|&count| count == 0) {
        return Vec::new();
    }

    let total: usize = counts.iter().product();
    let mut selections = Vec::with_capacity(total);
    let mut indices = [0usize; Feature::COUNT];

    for _ in 0..total {
        let mut selection = SelectionState::default();
        for feature in Feature::ALL {
            selection.select(feature, indices[feature.position()]);
        }
        selections.push(selection);

        for position in (0..Feature::COUNT).rev() {
            indices[position] += 1;
            if indices[position] < counts[position] {
                break;
            }
            indices[position] = 0;
        }
    }

    selections
}
