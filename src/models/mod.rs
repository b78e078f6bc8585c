// src/models/mod.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ───────────────────────────────────────
// Rows
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub dept_name: String,
}

/// One metric as the summary sees it. `metric_value` is nullable in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub metric_name: String,
    pub metric_value: Option<f64>,
    pub is_inverse: bool,
}

/// All metrics of one department, in the order the store returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentMetrics {
    pub dept_name: String,
    pub metrics: Vec<MetricRow>,
}

// ───────────────────────────────────────
// Scoring
// ───────────────────────────────────────

/// Value used for averaging: NULL counts as 0, "low is good" metrics are
/// flipped onto the 0..100 scale.
pub fn effective_value(raw: Option<f64>, is_inverse: bool) -> f64 {
    let v = raw.unwrap_or(0.0);
    if is_inverse {
        100.0 - v
    } else {
        v
    }
}

/// Two decimals, exact ties go to the even digit (62.625 -> 62.62).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

// ───────────────────────────────────────
// Responses
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentScore {
    pub average: f64,
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryResponse {
    pub data: BTreeMap<String, DepartmentScore>,
    pub weights: BTreeMap<String, f64>,
}

impl DepartmentScore {
    /// `None` for a department without metrics; it has no average.
    pub fn from_rows(rows: &[MetricRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let mut metrics = BTreeMap::new();
        let mut total = 0.0;
        for m in rows {
            let val = effective_value(m.metric_value, m.is_inverse);
            metrics.insert(m.metric_name.clone(), val);
            total += val;
        }
        let average = round2(total / rows.len() as f64);
        Some(Self { average, metrics })
    }
}

impl SummaryResponse {
    pub fn build(departments: &[DepartmentMetrics]) -> Self {
        let mut out = Self::default();
        for dept in departments {
            let Some(score) = DepartmentScore::from_rows(&dept.metrics) else {
                continue;
            };
            out.weights.insert(dept.dept_name.clone(), score.average);
            out.data.insert(dept.dept_name.clone(), score);
        }
        out
    }
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginOk {
    pub success: bool,
    pub user: String,
}

/// metric_name -> new value; `null` clears the stored value.
pub type MetricUpdates = BTreeMap<String, Option<f64>>;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
