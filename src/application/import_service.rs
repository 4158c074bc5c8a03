// Spreadsheet import - Header mapping, cell parsing, and the import driver
use crate::application::charge_repository::ChargeRepository;
use crate::domain::charge::{ChargeDraft, DEFAULT_CHARGE_TYPE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
const SPREADSHEET_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// One raw spreadsheet cell as the client-side sheet reader delivers it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetField {
    Date,
    StartPercent,
    EndPercent,
    ChargeType,
    TimeToCharge,
    KwhUsed,
    CostPerKwh,
    Odometer,
}

/// Accepted header aliases per field, in match priority order. Matching is
/// substring-based against canonicalized headers; the first alias found in
/// any header claims the column for its field.
const COLUMN_ALIASES: &[(TargetField, &[&str])] = &[
    (TargetField::Date, &["date", "day"]),
    (
        TargetField::StartPercent,
        &["start percent", "start %", "start soc", "start"],
    ),
    (
        TargetField::EndPercent,
        &["end percent", "end %", "end soc", "end"],
    ),
    (TargetField::ChargeType, &["charge type", "type"]),
    (
        TargetField::TimeToCharge,
        &["time to charge", "charging time", "duration", "hours", "time"],
    ),
    (
        TargetField::KwhUsed,
        &["kwh used", "kwh charged", "energy", "kwh"],
    ),
    (
        TargetField::CostPerKwh,
        &["cost per kwh", "cost/kwh", "price per kwh", "rate", "cost", "price"],
    ),
    (
        TargetField::Odometer,
        &["odometer", "odo", "mileage", "km reading"],
    ),
];

#[derive(Debug, Default, Clone, Copy)]
struct ColumnMap {
    date: Option<usize>,
    start_percent: Option<usize>,
    end_percent: Option<usize>,
    charge_type: Option<usize>,
    time_to_charge: Option<usize>,
    kwh_used: Option<usize>,
    cost_per_kwh: Option<usize>,
    odometer: Option<usize>,
}

fn canonicalize_header(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.trim().to_lowercase().replace('_', " "),
        CellValue::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn resolve_columns(header: &[CellValue]) -> ColumnMap {
    let headers: Vec<String> = header.iter().map(canonicalize_header).collect();
    let find = |aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|alias| headers.iter().position(|h| h.contains(alias)))
    };

    let mut map = ColumnMap::default();
    for (field, aliases) in COLUMN_ALIASES {
        let idx = find(aliases);
        match field {
            TargetField::Date => map.date = idx,
            TargetField::StartPercent => map.start_percent = idx,
            TargetField::EndPercent => map.end_percent = idx,
            TargetField::ChargeType => map.charge_type = idx,
            TargetField::TimeToCharge => map.time_to_charge = idx,
            TargetField::KwhUsed => map.kwh_used = idx,
            TargetField::CostPerKwh => map.cost_per_kwh = idx,
            TargetField::Odometer => map.odometer = idx,
        }
    }
    map
}

fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        // Spreadsheet day-count serial.
        CellValue::Number(serial) => {
            let unix_secs = ((serial - SPREADSHEET_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY) as i64;
            DateTime::from_timestamp(unix_secs, 0).map(|dt| dt.date_naive())
        }
        CellValue::Text(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    // Strip any time portion ("2024-01-05 00:00:00", "2024-01-05T10:12:00Z").
    let date_part = raw.trim().split([' ', 'T']).next()?;
    if date_part.is_empty() {
        return None;
    }
    const FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Charge duration arrives in three shapes: "8:30" clock notation, a
/// fraction-of-day serial (0.25 == 6h), or plain decimal hours.
fn parse_hours(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Text(s) if s.contains(':') => {
            let mut parts = s.trim().splitn(3, ':');
            let hours: f64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0.0);
            let minutes: f64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0.0);
            hours + minutes / 60.0
        }
        other => {
            let value = parse_number(other);
            if value > 0.0 && value < 1.0 {
                value * 24.0
            } else {
                value
            }
        }
    }
}

fn parse_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Parse heterogeneous spreadsheet rows into charge draft candidates.
///
/// The first row is the header. A malformed cell defaults (0 for numerics,
/// "Slow" for the type) and a row is kept only when it has a parseable date
/// and at least one of odometer / kWh populated; this drops blank trailing
/// rows and header echoes without ever failing the batch. Row order is
/// preserved; chronological sorting is the insights engine's job.
pub fn normalize(rows: &[Vec<CellValue>]) -> Vec<ChargeDraft> {
    let Some((header, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let columns = resolve_columns(header);
    // Only the date column has a positional fallback; an unlabelled first
    // column is almost always the date in real exports.
    let date_idx = columns.date.unwrap_or(0);

    let mut drafts = Vec::new();
    for row in data_rows {
        if row.len() < 3 {
            continue;
        }
        let Some(date) = row.get(date_idx).and_then(parse_date) else {
            continue;
        };

        let number_at =
            |idx: Option<usize>| idx.and_then(|i| row.get(i)).map_or(0.0, parse_number);
        let odometer = number_at(columns.odometer);
        let kwh_used = number_at(columns.kwh_used);
        if odometer <= 0.0 && kwh_used <= 0.0 {
            continue;
        }

        let charge_type = columns
            .charge_type
            .and_then(|i| row.get(i))
            .and_then(parse_text)
            .unwrap_or_else(|| DEFAULT_CHARGE_TYPE.to_string());

        drafts.push(ChargeDraft {
            date,
            odometer,
            start_percent: number_at(columns.start_percent),
            end_percent: number_at(columns.end_percent),
            time_to_charge: columns
                .time_to_charge
                .and_then(|i| row.get(i))
                .map_or(0.0, parse_hours),
            kwh_used,
            cost_per_kwh: number_at(columns.cost_per_kwh),
            charge_type,
        });
    }
    drafts
}

/// Outcome tally for one import batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub attempted: usize,
    pub imported: usize,
}

#[derive(Clone)]
pub struct ImportService {
    repository: Arc<dyn ChargeRepository>,
}

impl ImportService {
    pub fn new(repository: Arc<dyn ChargeRepository>) -> Self {
        Self { repository }
    }

    /// Normalize and persist a batch. Every create is independent: a failed
    /// row is logged and skipped, prior successes stay in place.
    pub async fn import_rows(&self, rows: &[Vec<CellValue>]) -> ImportSummary {
        let drafts = normalize(rows);
        let attempted = drafts.len();

        let mut imported = 0;
        for draft in drafts {
            let record = draft.into_record(Uuid::new_v4().to_string(), Utc::now());
            match self.repository.create(record).await {
                Ok(_) => imported += 1,
                Err(e) => warn!("skipping imported row: {e:#}"),
            }
        }
        ImportSummary {
            attempted,
            imported,
        }
    }
}
