use crate::domain::ports::PriceSink;
use crate::utils::error::PricerError;

/// 以終端機輸出取代選擇器 UI 的價格標籤
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl PriceSink for ConsoleSink {
    fn on_price_text_updated(&mut self, text: &str) {
        println!("💰 Predicted price: {}", text);
    }

    fn on_prediction_failed(&mut self, reason: &PricerError) {
        eprintln!("❌ {}", reason.user_friendly_message());
        eprintln!("💡 Suggestion: {}", reason.recovery_suggestion());
    }
}

/// 批次執行用，只需要回傳結果時使用
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl PriceSink for SilentSink {
    fn on_price_text_updated(&mut self, _text: &str) {}

    fn on_prediction_failed(&mut self, _reason: &PricerError) {}
}
