// src/db/mod.rs

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::{Department, DepartmentMetrics, MetricUpdates};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::{connect, MySqlStore};

/// Everything the handlers need from the database. Each call is one logical
/// operation and holds its connection only for its own duration.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Rows of the `departments` table.
    async fn list_departments(&self) -> Result<Vec<Department>, sqlx::Error>;

    /// Departments that appear in `metrics`, each with all of its metrics.
    async fn metrics_by_department(&self) -> Result<Vec<DepartmentMetrics>, sqlx::Error>;

    /// metric_name -> raw metric_value for one department. Empty if the
    /// department has no metrics.
    async fn department_values(
        &self,
        dept_name: &str,
    ) -> Result<BTreeMap<String, Option<f64>>, sqlx::Error>;

    /// Applies every update for the department; returns rows touched.
    /// Names that don't exist touch nothing.
    async fn update_metrics(
        &self,
        dept_name: &str,
        updates: &MetricUpdates,
    ) -> Result<u64, sqlx::Error>;
}
