// Insights engine - Pairwise consecutive-session analytics
use crate::application::charge_repository::ChargeRepository;
use crate::domain::charge::ChargeRecord;
use crate::domain::insight::{DerivedInsight, SortOrder};
use std::sync::Arc;

/// Derive per-session metrics for every record, oldest first.
///
/// Records are sorted ascending by date, ties broken by ascending odometer,
/// then each is paired with its immediate predecessor in that order. The
/// driving interval between a pair is priced at the predecessor's rate: the
/// energy burned on the road was bought in the prior session.
pub fn compute_insights(records: &[ChargeRecord], battery_capacity: f64) -> Vec<DerivedInsight> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.odometer.total_cmp(&b.odometer)));

    let mut insights = Vec::with_capacity(sorted.len());
    for (i, current) in sorted.iter().enumerate() {
        let previous = if i > 0 { Some(&sorted[i - 1]) } else { None };

        let km_run = previous.map_or(0.0, |p| current.odometer - p.odometer);
        let percent_used = previous.map_or(0.0, |p| p.end_percent - current.start_percent);

        // Entry errors can make percent_used non-positive; that interval has
        // no usable consumption figure, so the range stays 0 instead of
        // going negative or dividing by zero.
        let estimated_range = if percent_used > 0.0 {
            km_run / percent_used * 100.0
        } else {
            0.0
        };

        let kwh_consumed = percent_used / 100.0 * battery_capacity;
        let rate = previous.map_or(current.cost_per_kwh, |p| p.cost_per_kwh);
        let cost_per_km = if km_run > 0.0 && kwh_consumed > 0.0 {
            kwh_consumed * rate / km_run
        } else {
            0.0
        };

        insights.push(DerivedInsight {
            record: current.clone(),
            km_run,
            percent_used,
            estimated_range,
            kwh_consumed,
            cost_per_km,
            charging_speed: current.charging_speed(),
        });
    }
    insights
}

#[derive(Clone)]
pub struct InsightsService {
    repository: Arc<dyn ChargeRepository>,
    default_capacity_kwh: f64,
}

impl InsightsService {
    pub fn new(repository: Arc<dyn ChargeRepository>, default_capacity_kwh: f64) -> Self {
        Self {
            repository,
            default_capacity_kwh,
        }
    }

    /// Full-store insight sequence in the requested display order. By default
    /// only insights with a driving interval are returned; `include_all`
    /// keeps the raw sequence for history listings.
    pub async fn insights(
        &self,
        capacity: Option<f64>,
        order: SortOrder,
        include_all: bool,
    ) -> anyhow::Result<Vec<DerivedInsight>> {
        let records = self.repository.list().await?;
        let capacity = capacity.unwrap_or(self.default_capacity_kwh);

        let mut insights = compute_insights(&records, capacity);
        if !include_all {
            insights.retain(DerivedInsight::has_driving_interval);
        }
        if order == SortOrder::Newest {
            insights.reverse();
        }
        Ok(insights)
    }
}
