// Derived insight domain model
use serde::{Deserialize, Serialize};

use super::charge::ChargeRecord;

/// A charge record enriched with metrics computed against its chronological
/// predecessor. The record's own fields are flattened into the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedInsight {
    #[serde(flatten)]
    pub record: ChargeRecord,
    /// Distance driven since the previous session.
    pub km_run: f64,
    /// Battery percentage consumed while driving since the previous session.
    /// Kept raw; dirty data can make it negative.
    pub percent_used: f64,
    /// Projected full-charge range extrapolated from this interval.
    pub estimated_range: f64,
    /// Energy consumed while driving, from `percent_used` and battery capacity.
    pub kwh_consumed: f64,
    /// Cost efficiency of the interval, priced at the predecessor's rate.
    pub cost_per_km: f64,
    /// Delivery rate of the charging event itself.
    pub charging_speed: f64,
}

impl DerivedInsight {
    /// Whether a meaningful driving interval precedes this session. The first
    /// chronological record and same-odometer duplicates do not have one and
    /// are excluded from range/cost analytics and charts.
    pub fn has_driving_interval(&self) -> bool {
        self.km_run > 0.0
    }
}

/// Display ordering for the insight sequence. The pairwise computation always
/// runs oldest-first; reversal happens after computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parses_from_query_strings() {
        assert_eq!(
            serde_json::from_str::<SortOrder>(r#""newest""#).unwrap(),
            SortOrder::Newest
        );
        assert_eq!(
            serde_json::from_str::<SortOrder>(r#""oldest""#).unwrap(),
            SortOrder::Oldest
        );
        assert_eq!(SortOrder::default(), SortOrder::Newest);
    }
}
