// src/db/memory.rs

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::MetricsStore;
use crate::models::{Department, DepartmentMetrics, MetricRow, MetricUpdates};

#[derive(Debug, Clone)]
pub struct StoredMetric {
    pub dept_name: String,
    pub row: MetricRow,
}

/// Table-shaped store for handler tests.
#[derive(Default)]
pub struct MemoryStore {
    departments: Vec<String>,
    metrics: Mutex<Vec<StoredMetric>>,
    broken: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the database were unreachable.
    pub fn broken() -> Self {
        Self { broken: true, ..Self::default() }
    }

    pub fn department(mut self, name: &str) -> Self {
        self.departments.push(name.into());
        self
    }

    pub fn metric(self, dept: &str, name: &str, value: Option<f64>, is_inverse: bool) -> Self {
        self.metrics.lock().unwrap().push(StoredMetric {
            dept_name: dept.into(),
            row: MetricRow { metric_name: name.into(), metric_value: value, is_inverse },
        });
        self
    }

    pub fn value(&self, dept: &str, name: &str) -> Option<Option<f64>> {
        self.metrics
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.dept_name == dept && m.row.metric_name == name)
            .map(|m| m.row.metric_value)
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.broken {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn list_departments(&self) -> Result<Vec<Department>, sqlx::Error> {
        self.check()?;
        Ok(self
            .departments
            .iter()
            .map(|d| Department { dept_name: d.clone() })
            .collect())
    }

    async fn metrics_by_department(&self) -> Result<Vec<DepartmentMetrics>, sqlx::Error> {
        self.check()?;
        let metrics = self.metrics.lock().unwrap();
        let mut out: Vec<DepartmentMetrics> = Vec::new();
        for m in metrics.iter() {
            match out.iter_mut().find(|d| d.dept_name == m.dept_name) {
                Some(d) => d.metrics.push(m.row.clone()),
                None => out.push(DepartmentMetrics {
                    dept_name: m.dept_name.clone(),
                    metrics: vec![m.row.clone()],
                }),
            }
        }
        Ok(out)
    }

    async fn department_values(
        &self,
        dept_name: &str,
    ) -> Result<BTreeMap<String, Option<f64>>, sqlx::Error> {
        self.check()?;
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.dept_name == dept_name)
            .map(|m| (m.row.metric_name.clone(), m.row.metric_value))
            .collect())
    }

    async fn update_metrics(
        &self,
        dept_name: &str,
        updates: &MetricUpdates,
    ) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut metrics = self.metrics.lock().unwrap();
        let mut touched = 0;
        for (name, value) in updates {
            for m in metrics
                .iter_mut()
                .filter(|m| m.dept_name == dept_name && &m.row.metric_name == name)
            {
                m.row.metric_value = *value;
                touched += 1;
            }
        }
        Ok(touched)
    }
}
