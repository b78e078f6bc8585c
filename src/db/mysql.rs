// src/db/mysql.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{query, query_as};

use super::MetricsStore;
use crate::config::DbConfig;
use crate::models::{Department, DepartmentMetrics, MetricRow, MetricUpdates};

pub async fn connect(cfg: &DbConfig) -> anyhow::Result<MySqlPool> {
    let opts = MySqlConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database);

    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;

    tracing::info!(host = %cfg.host, port = cfg.port, database = %cfg.database, "connected to MySQL");
    Ok(pool)
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// metric_value may be INT, DECIMAL or FLOAT in the table; read it as DOUBLE.
// is_inverse is a TINYINT/BOOLEAN flag; read it as a signed integer.
const SELECT_METRICS_FOR_DEPT: &str = r#"
    SELECT metric_name,
           CAST(metric_value AS DOUBLE) AS metric_value,
           CAST(COALESCE(is_inverse, 0) AS SIGNED) AS is_inverse
    FROM metrics
    WHERE dept_name = ?
"#;

#[async_trait]
impl MetricsStore for MySqlStore {
    async fn list_departments(&self) -> Result<Vec<Department>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        query_as::<_, Department>(r#"SELECT dept_name FROM departments"#)
            .fetch_all(&mut *conn)
            .await
    }

    async fn metrics_by_department(&self) -> Result<Vec<DepartmentMetrics>, sqlx::Error> {
        // one connection for the whole walk
        let mut conn = self.pool.acquire().await?;

        let names: Vec<(String,)> = query_as(r#"SELECT DISTINCT dept_name FROM metrics"#)
            .fetch_all(&mut *conn)
            .await?;

        let mut out = Vec::with_capacity(names.len());
        for (dept_name,) in names {
            let rows: Vec<(String, Option<f64>, i64)> = query_as(SELECT_METRICS_FOR_DEPT)
                .bind(&dept_name)
                .fetch_all(&mut *conn)
                .await?;
            let metrics = rows
                .into_iter()
                .map(|(metric_name, metric_value, inverse)| MetricRow {
                    metric_name,
                    metric_value,
                    is_inverse: inverse != 0,
                })
                .collect();
            out.push(DepartmentMetrics { dept_name, metrics });
        }
        Ok(out)
    }

    async fn department_values(
        &self,
        dept_name: &str,
    ) -> Result<BTreeMap<String, Option<f64>>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<(String, Option<f64>)> = query_as(
            r#"SELECT metric_name, CAST(metric_value AS DOUBLE) AS metric_value
               FROM metrics WHERE dept_name = ?"#,
        )
        .bind(dept_name)
        .fetch_all(&mut *conn)
        .await?;
        // duplicate names: last row wins
        Ok(rows.into_iter().collect())
    }

    async fn update_metrics(
        &self,
        dept_name: &str,
        updates: &MetricUpdates,
    ) -> Result<u64, sqlx::Error> {
        // dropped without commit on any error => rolled back
        let mut tx = self.pool.begin().await?;
        let mut touched = 0;
        for (metric_name, value) in updates {
            let res = query(
                r#"
                UPDATE metrics
                SET metric_value = ?
                WHERE dept_name = ? AND metric_name = ?
                "#,
            )
            .bind(*value)
            .bind(dept_name)
            .bind(metric_name)
            .execute(&mut *tx)
            .await?;
            touched += res.rows_affected();
        }
        tx.commit().await?;
        Ok(touched)
    }
}
