use crate::domain::model::{CatalogEntry, Feature};
use crate::utils::error::{PricerError, Result};

/// 單一特徵的選項表
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    entries: Vec<CatalogEntry>,
}

impl FeatureTable {
    /// 驗證選項表：不可為空、索引從 0 連續不重複（宣告順序不限）、標籤非空且數值有限
    pub fn new(feature: Feature, mut entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PricerError::InvalidCatalog {
                feature,
                reason: "catalog has no entries".to_string(),
            });
        }

        // 依索引排序後，第 i 筆必須恰好是索引 i
        entries.sort_by_key(|entry| entry.index);

        for (position, entry) in entries.iter().enumerate() {
            if entry.index != position {
                return Err(PricerError::InvalidCatalog {
                    feature,
                    reason: format!(
                        "entry '{}' has index {}, expected {}",
                        entry.label, entry.index, position
                    ),
                });
            }
            if entry.label.trim().is_empty() {
                return Err(PricerError::InvalidCatalog {
                    feature,
                    reason: format!("entry {} has an empty label", position),
                });
            }
            if !entry.value.is_finite() {
                return Err(PricerError::InvalidCatalog {
                    feature,
                    reason: format!("entry '{}' has a non-finite value", entry.label),
                });
            }
        }

        Ok(Self { entries })
    }

    /// 由 `(label, value)` 依序編號建立選項表
    pub fn from_pairs<L, I>(feature: Feature, pairs: I) -> Result<Self>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64)>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (label, value))| CatalogEntry::new(index, label, value))
            .collect();
        Self::new(feature, entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }
}

/// 每個 [`Feature`] 的索引 → (標籤, 數值) 對照表
///
/// 啟動時建立一次，之後唯讀，以 `Arc` 共享
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCatalog {
    tables: Vec<FeatureTable>,
}

impl FeatureCatalog {
    /// 每個特徵必須恰好有一張選項表
    pub fn new<I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Feature, FeatureTable)>,
    {
        let mut slots: [Option<FeatureTable>; Feature::COUNT] = Default::default();

        for (feature, table) in tables {
            if slots[feature.position()].replace(table).is_some() {
                return Err(PricerError::InvalidCatalog {
                    feature,
                    reason: "catalog declared more than once".to_string(),
                });
            }
        }

        let tables = Feature::ALL
            .iter()
            .zip(slots)
            .map(|(&feature, slot)| {
                slot.ok_or_else(|| PricerError::InvalidCatalog {
                    feature,
                    reason: "no catalog declared".to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tables })
    }

    /// 火星棲地預設選項（面積單位為英畝）
    pub fn mars_habitat() -> Self {
        Self::new(Feature::ALL.map(|feature| (feature, default_table(feature))))
            .unwrap_or_else(|e| unreachable!("built-in catalog is valid: {}", e))
    }

    pub fn table(&self, feature: Feature) -> &FeatureTable {
        &self.tables[feature.position()]
    }

    pub fn count_for(&self, feature: Feature) -> usize {
        self.table(feature).len()
    }

    pub fn label_for(&self, feature: Feature, index: usize) -> Result<&str> {
        self.entry(feature, index).map(|entry| entry.label.as_str())
    }

    pub fn value_for(&self, feature: Feature, index: usize) -> Result<f64> {
        self.entry(feature, index).map(|entry| entry.value)
    }

    fn entry(&self, feature: Feature, index: usize) -> Result<&CatalogEntry> {
        let table = self.table(feature);
        table.get(index).ok_or(PricerError::CatalogOutOfRange {
            feature,
            index,
            count: table.len(),
        })
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::mars_habitat()
    }
}

/// 單一特徵的內建選項表
pub fn default_table(feature: Feature) -> FeatureTable {
    let pairs: &[(&str, f64)] = match feature {
        Feature::SolarPanels => &[
            ("1", 1.0),
            ("1.5", 1.5),
            ("2", 2.0),
            ("2.5", 2.5),
            ("3", 3.0),
            ("3.5", 3.5),
            ("4", 4.0),
            ("4.5", 4.5),
            ("5", 5.0),
        ],
        Feature::Greenhouses => &[("1", 1.0), ("2", 2.0), ("3", 3.0), ("4", 4.0), ("5", 5.0)],
        Feature::Size => &[
            ("750", 750.0),
            ("1,000", 1000.0),
            ("1,500", 1500.0),
            ("2,000", 2000.0),
            ("3,000", 3000.0),
            ("4,000", 4000.0),
            ("5,000", 5000.0),
            ("10,000", 10000.0),
        ],
    };

    FeatureTable::from_pairs(feature, pairs.iter().copied())
        .unwrap_or_else(|e| unreachable!("built-in table is valid: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> FeatureCatalog {
        FeatureCatalog::new([
            (
                Feature::SolarPanels,
                FeatureTable::from_pairs(Feature::SolarPanels, [("4", 4.0), ("8", 8.0)]).unwrap(),
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
        .unwrap()
    }

    #[test]
    fn test_in_range_lookups_are_stable() {
        let catalog = FeatureCatalog::mars_habitat();
        for feature in Feature::ALL {
            for index in 0..catalog.count_for(feature) {
                let label = catalog.label_for(feature, index).unwrap().to_string();
                let value = catalog.value_for(feature, index).unwrap();
                assert_eq!(catalog.label_for(feature, index).unwrap(), label);
                assert_eq!(catalog.value_for(feature, index).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_out_of_range_lookups_fail() {
        let catalog = small_catalog();
        for feature in Feature::ALL {
            let count = catalog.count_for(feature);
            for index in [count, count + 1, usize::MAX] {
                assert!(matches!(
                    catalog.value_for(feature, index),
                    Err(PricerError::CatalogOutOfRange { index: i, count: c, .. }) if i == index && c == count
                ));
                assert!(matches!(
                    catalog.label_for(feature, index),
                    Err(PricerError::CatalogOutOfRange { .. })
                ));
            }
        }
    }

    #[test]
    fn test_tables_are_sized_independently() {
        let catalog = FeatureCatalog::mars_habitat();
        assert_eq!(catalog.count_for(Feature::SolarPanels), 9);
        assert_eq!(catalog.count_for(Feature::Greenhouses), 5);
        assert_eq!(catalog.count_for(Feature::Size), 8);
        assert_eq!(catalog.label_for(Feature::Size, 7).unwrap(), "10,000");
        assert_eq!(catalog.value_for(Feature::SolarPanels, 1).unwrap(), 1.5);
    }

    #[test]
    fn test_non_contiguous_indices_rejected() {
        let entries = vec![
            CatalogEntry::new(0, "1", 1.0),
            CatalogEntry::new(2, "3", 3.0),
        ];
        let err = FeatureTable::new(Feature::Greenhouses, entries).unwrap_err();
        assert!(matches!(err, PricerError::InvalidCatalog { feature: Feature::Greenhouses, .. }));

        let duplicated = vec![
            CatalogEntry::new(0, "1", 1.0),
            CatalogEntry::new(0, "1 again", 1.0),
        ];
        assert!(FeatureTable::new(Feature::Greenhouses, duplicated).is_err());
    }

    #[test]
    fn test_out_of_order_indices_accepted() {
        let entries = vec![
            CatalogEntry::new(1, "2", 2.0),
            CatalogEntry::new(0, "1", 1.0),
        ];
        let table = FeatureTable::new(Feature::Greenhouses, entries).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().label, "1");
        assert_eq!(table.get(1).unwrap().value, 2.0);

        let shuffled = vec![
            CatalogEntry::new(2, "1,500", 1500.0),
            CatalogEntry::new(0, "750", 750.0),
            CatalogEntry::new(1, "1,000", 1000.0),
        ];
        let table = FeatureTable::new(Feature::Size, shuffled).unwrap();
        let labels: Vec<_> = (0..table.len())
            .map(|i| table.get(i).unwrap().label.as_str())
            .collect();
        assert_eq!(labels, ["750", "1,000", "1,500"]);
    }

    #[test]
    fn test_invalid_entries_rejected() {
        assert!(FeatureTable::new(Feature::Size, vec![]).is_err());
        assert!(FeatureTable::from_pairs(Feature::Size, [("  ", 1.0)]).is_err());
        assert!(FeatureTable::from_pairs(Feature::Size, [("big", f64::NAN)]).is_err());
    }

    #[test]
    fn test_catalog_requires_every_feature_once() {
        let table = || FeatureTable::from_pairs(Feature::Size, [("1", 1.0)]).unwrap();

        let missing = FeatureCatalog::new([(Feature::Size, table())]).unwrap_err();
        assert!(matches!(
            missing,
            PricerError::InvalidCatalog { feature: Feature::SolarPanels, .. }
        ));

        let twice = FeatureCatalog::new([
            (Feature::SolarPanels, table()),
            (Feature::SolarPanels, table()),
        ])
        .unwrap_err();
        assert!(matches!(
            twice,
            PricerError::InvalidCatalog { feature: Feature::SolarPanels, .. }
        ));
    }
}
