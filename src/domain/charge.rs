// Charge session domain model
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Tag applied to sessions that do not state a charge type.
pub const DEFAULT_CHARGE_TYPE: &str = "Slow";

/// One persisted charging event. The camelCase field names are the external
/// JSON contract; records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRecord {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Calendar date of the session, no time component.
    pub date: NaiveDate,
    /// Cumulative odometer reading (km) at time of logging.
    #[serde(default)]
    pub odometer: f64,
    /// Battery state of charge when the session started, 0-100.
    pub start_percent: f64,
    /// Battery state of charge when the session ended, 0-100.
    pub end_percent: f64,
    /// Session duration in hours.
    #[serde(default)]
    pub time_to_charge: f64,
    /// Energy delivered during the session, kWh.
    #[serde(default)]
    pub kwh_used: f64,
    /// Price per kWh in effect for this session.
    #[serde(default)]
    pub cost_per_kwh: f64,
    /// Free-form tag, e.g. "Slow" or "Fast".
    #[serde(default = "default_charge_type")]
    pub charge_type: String,
    /// Server-assigned persistence timestamp.
    pub created_at: DateTime<Utc>,
}

fn default_charge_type() -> String {
    DEFAULT_CHARGE_TYPE.to_string()
}

impl ChargeRecord {
    /// Delivery rate of the charging event itself in kW, or 0 when the
    /// duration is unknown.
    pub fn charging_speed(&self) -> f64 {
        if self.time_to_charge > 0.0 {
            self.kwh_used / self.time_to_charge
        } else {
            0.0
        }
    }
}

/// A submitted session before the server assigns `id` and `createdAt`.
/// `date`, `startPercent` and `endPercent` are required; the remaining
/// numerics default to 0 and the charge type to "Slow".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeDraft {
    pub date: NaiveDate,
    #[serde(default)]
    pub odometer: f64,
    pub start_percent: f64,
    pub end_percent: f64,
    #[serde(default)]
    pub time_to_charge: f64,
    #[serde(default)]
    pub kwh_used: f64,
    #[serde(default)]
    pub cost_per_kwh: f64,
    #[serde(default = "default_charge_type")]
    pub charge_type: String,
}

impl ChargeDraft {
    /// Submission preconditions, checked before the store is touched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("startPercent", self.start_percent),
            ("endPercent", self.end_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::PercentOutOfRange { field, value });
            }
        }
        if self.end_percent <= self.start_percent {
            return Err(ValidationError::EndNotAboveStart {
                start: self.start_percent,
                end: self.end_percent,
            });
        }
        Ok(())
    }

    /// Promote to a persisted record with a server-assigned identity.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> ChargeRecord {
        ChargeRecord {
            id,
            date: self.date,
            odometer: self.odometer,
            start_percent: self.start_percent,
            end_percent: self.end_percent,
            time_to_charge: self.time_to_charge,
            kwh_used: self.kwh_used,
            cost_per_kwh: self.cost_per_kwh,
            charge_type: self.charge_type,
            created_at,
        }
    }
}
