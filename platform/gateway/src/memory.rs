//! In-process gateway used by demo mode and tests.
//!
//! Understands the same projection syntax as the REST backend, including
//! embedded relations: `employees(first_name,last_name)` on a row resolves
//! through its `employee_id` column.

use std::{
    cmp,
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::{
    Gateway,
    error::{GatewayError, GatewayResult},
    query::{Direction, Query},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    failures: Mutex<Vec<(String, Operation)>>,
    calls: Mutex<Vec<(String, Operation)>>,
    /// Set for gateways that hand out predictable ids.
    sequence: Option<AtomicU64>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows created without an `id` get `00000000-0000-0000-0000-000000000001`,
    /// then `...0002` and so on, so a fresh gateway seeded the same way always
    /// yields the same ids.
    pub fn sequential() -> Self {
        Self {
            sequence: Some(AtomicU64::new(1)),
            ..Self::default()
        }
    }

    fn next_id(&self) -> Uuid {
        match &self.sequence {
            Some(next) => Uuid::from_u128(u128::from(next.fetch_add(1, Ordering::Relaxed))),
            None => Uuid::new_v4(),
        }
    }

    /// Append rows verbatim; rows should already carry an `id`.
    pub async fn insert_rows(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next `op` against `table` fail once.
    pub async fn fail_next(&self, table: &str, op: Operation) {
        self.failures.lock().await.push((table.to_string(), op));
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<(String, Operation)> {
        self.calls.lock().await.clone()
    }

    async fn enter(&self, table: &str, op: Operation) -> GatewayResult<()> {
        self.calls.lock().await.push((table.to_string(), op));
        let mut failures = self.failures.lock().await;
        if let Some(pos) = failures
            .iter()
            .position(|(t, o)| t == table && *o == op)
        {
            failures.remove(pos);
            return Err(GatewayError::Unavailable(format!(
                "injected {op:?} failure on {table}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list(&self, table: &str, query: &Query) -> GatewayResult<Vec<Value>> {
        self.enter(table, Operation::List).await?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters()
                            .iter()
                            .all(|(column, value)| scalar_text(&row[column.as_str()]) == *value)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = query.ordering() {
            rows.sort_by(|a, b| {
                let ord = compare_values(&a[order.column.as_str()], &b[order.column.as_str()]);
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        let rows = rows
            .into_iter()
            .map(|row| project(&tables, query, row))
            .collect::<Vec<_>>();
        debug!(table, rows = rows.len(), "memory gateway list");
        Ok(rows)
    }

    async fn get(&self, table: &str, id: Uuid) -> GatewayResult<Option<Value>> {
        self.enter(table, Operation::Get).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| has_id(row, id)))
            .cloned())
    }

    async fn create(&self, table: &str, record: Value) -> GatewayResult<Value> {
        self.enter(table, Operation::Create).await?;
        let Value::Object(mut fields) = record else {
            return Err(GatewayError::Backend {
                endpoint: format!("POST {table}"),
                status: 400,
                body: "record must be a JSON object".into(),
            });
        };
        fields
            .entry("id")
            .or_insert_with(|| Value::String(self.next_id().to_string()));
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        let row = Value::Object(fields);
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> GatewayResult<Value> {
        self.enter(table, Operation::Update).await?;
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| has_id(row, id)))
            .ok_or_else(|| GatewayError::NotFound {
                table: table.to_string(),
                id,
            })?;
        if let (Value::Object(target), Value::Object(changes)) = (&mut *row, patch) {
            for (key, value) in changes {
                target.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: Uuid) -> GatewayResult<()> {
        self.enter(table, Operation::Delete).await?;
        if let Some(rows) = self.tables.write().await.get_mut(table) {
            rows.retain(|row| !has_id(row, id));
        }
        Ok(())
    }
}

fn has_id(row: &Value, id: Uuid) -> bool {
    row["id"].as_str() == Some(id.to_string().as_str())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: &Value, b: &Value) -> cmp::Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(cmp::Ordering::Equal),
        (Value::Null, Value::Null) => cmp::Ordering::Equal,
        (Value::Null, _) => cmp::Ordering::Less,
        (_, Value::Null) => cmp::Ordering::Greater,
        _ => scalar_text(a).cmp(&scalar_text(b)),
    }
}

/// Foreign key column for an embedded relation: `employees` -> `employee_id`.
fn foreign_key(relation: &str) -> String {
    format!("{}_id", relation.strip_suffix('s').unwrap_or(relation))
}

fn project(tables: &HashMap<String, Vec<Value>>, query: &Query, row: Value) -> Value {
    let Value::Object(source) = row else {
        return row;
    };
    let embedded = query.embedded();
    let plain: Vec<&str> = query
        .projection()
        .split(',')
        .filter(|item| !item.contains('(') && !item.contains(')') && !item.is_empty())
        .collect();

    let mut out = if plain.contains(&"*") {
        source.clone()
    } else {
        plain
            .iter()
            .filter_map(|col| source.get(*col).map(|v| (col.to_string(), v.clone())))
            .collect::<Map<String, Value>>()
    };

    for (relation, columns) in embedded {
        let related = source
            .get(&foreign_key(&relation))
            .and_then(Value::as_str)
            .and_then(|fk| {
                tables
                    .get(&relation)?
                    .iter()
                    .find(|candidate| candidate["id"].as_str() == Some(fk))
            });
        let value = match related {
            Some(Value::Object(fields)) if columns.iter().any(|c| c == "*") => {
                Value::Object(fields.clone())
            }
            Some(Value::Object(fields)) => Value::Object(
                columns
                    .iter()
                    .filter_map(|col| fields.get(col).map(|v| (col.clone(), v.clone())))
                    .collect(),
            ),
            _ => Value::Null,
        };
        out.insert(relation, value);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EMPLOYEE: &str = "6f1c1b8e-2d7e-4a53-9d0b-5c1f2d3e4a10";

    async fn seeded() -> MemoryGateway {
        let gateway = MemoryGateway::new();
        gateway
            .insert_rows(
                "employees",
                vec![json!({"id": EMPLOYEE, "first_name": "Ada", "last_name": "Lovelace"})],
            )
            .await;
        gateway
            .insert_rows(
                "attendance",
                vec![
                    json!({"id": Uuid::new_v4().to_string(), "employee_id": EMPLOYEE, "date": "2024-03-01", "status": "present"}),
                    json!({"id": Uuid::new_v4().to_string(), "employee_id": "missing", "date": "2024-03-02", "status": "late"}),
                ],
            )
            .await;
        gateway
    }

    #[tokio::test]
    async fn list_filters_orders_and_embeds() {
        let gateway = seeded().await;
        let query = Query::new()
            .select("*, employees(first_name, last_name)")
            .order("date", Direction::Desc);
        let rows = gateway.list("attendance", &query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-03-02");
        assert!(rows[0]["employees"].is_null());
        assert_eq!(rows[1]["employees"]["first_name"], "Ada");

        let filtered = gateway
            .list("attendance", &query.clone().eq("date", "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let gateway = MemoryGateway::new();
        let created = gateway
            .create("leave_requests", json!({"status": "pending"}))
            .await
            .unwrap();
        let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();
        assert!(created["created_at"].is_string());

        let updated = gateway
            .update("leave_requests", id, json!({"status": "approved"}))
            .await
            .unwrap();
        assert_eq!(updated["status"], "approved");

        gateway.delete("leave_requests", id).await.unwrap();
        assert!(gateway.get("leave_requests", id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sequential_gateways_repeat_ids() {
        let first = MemoryGateway::sequential();
        let second = MemoryGateway::sequential();
        let mut ids = Vec::new();
        for gateway in [&first, &second] {
            let a = gateway.create("employees", json!({"first_name": "Ada"})).await.unwrap();
            let b = gateway.create("leave_requests", json!({"status": "pending"})).await.unwrap();
            ids.push((a["id"].clone(), b["id"].clone()));
        }
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[0].0, "00000000-0000-0000-0000-000000000001");
        assert_eq!(ids[0].1, "00000000-0000-0000-0000-000000000002");

        let kept = first
            .create("employees", json!({"id": EMPLOYEE, "first_name": "Grace"}))
            .await
            .unwrap();
        assert_eq!(kept["id"], EMPLOYEE);
        let next = first.create("employees", json!({})).await.unwrap();
        assert_eq!(next["id"], "00000000-0000-0000-0000-000000000003");
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let gateway = seeded().await;
        gateway.fail_next("attendance", Operation::List).await;
        assert!(gateway.list("attendance", &Query::new()).await.is_err());
        assert!(gateway.list("attendance", &Query::new()).await.is_ok());
        assert_eq!(gateway.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn projection_limits_columns() {
        let gateway = seeded().await;
        let rows = gateway
            .list("attendance", &Query::new().select("status"))
            .await
            .unwrap();
        assert_eq!(rows[0], json!({"status": "present"}));
    }
}
