use crate::utils::error::{PricerError, Result};

pub const DEFAULT_LOCALE: &str = "en_US";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    Prefix,
    /// 符號在金額之後，以空白分隔
    Suffix,
}

/// 單一語系的貨幣格式慣例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyStyle {
    pub locale: &'static str,
    pub symbol: &'static str,
    pub grouping_separator: char,
    pub placement: SymbolPlacement,
}

impl CurrencyStyle {
    pub const EN_US: CurrencyStyle = CurrencyStyle {
        locale: "en_US",
        symbol: "$",
        grouping_separator: ',',
        placement: SymbolPlacement::Prefix,
    };

    pub const EN_GB: CurrencyStyle = CurrencyStyle {
        locale: "en_GB",
        symbol: "£",
        grouping_separator: ',',
        placement: SymbolPlacement::Prefix,
    };

    pub const DE_DE: CurrencyStyle = CurrencyStyle {
        locale: "de_DE",
        symbol: "€",
        grouping_separator: '.',
        placement: SymbolPlacement::Suffix,
    };

    pub const SUPPORTED: [CurrencyStyle; 3] = [Self::EN_US, Self::EN_GB, Self::DE_DE];

    pub fn for_locale(locale: &str) -> Result<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|style| style.locale == locale)
            .ok_or_else(|| PricerError::InvalidConfigValueError {
                field: "formatter.locale".to_string(),
                value: locale.to_string(),
                reason: format!(
                    "Unsupported locale. Supported locales: {}",
                    Self::SUPPORTED
                        .iter()
                        .map(|style| style.locale)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

/// 整數單位的貨幣格式化
///
/// 金額採銀行家捨入（half-to-even）。負數前置減號（`-$1,234`），
/// 非有限值以 `NaN` 或 `∞` 取代數字。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormatter {
    style: CurrencyStyle,
}

impl PriceFormatter {
    pub fn new(style: CurrencyStyle) -> Self {
        Self { style }
    }

    pub fn for_locale(locale: &str) -> Result<Self> {
        CurrencyStyle::for_locale(locale).map(Self::new)
    }

    pub fn format(&self, price: f64) -> String {
        let (negative, amount) = if price.is_nan() {
            (false, "NaN".to_string())
        } else if price.is_infinite() {
            (price < 0.0, "∞".to_string())
        } else {
            let rounded = price.round_ties_even();
            (
                rounded < 0.0,
                group_digits(&format!("{:.0}", rounded.abs()), self.style.grouping_separator),
            )
        };

        let sign = if negative { "-" } else { "" };
        match self.style.placement {
            SymbolPlacement::Prefix => format!("{}{}{}", sign, self.style.symbol, amount),
            SymbolPlacement::Suffix => format!("{}{} {}", sign, amount, self.style.symbol),
        }
    }
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::new(CurrencyStyle::EN_US)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
