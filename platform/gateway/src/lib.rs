//! Gateway primitives for the hosted table service that owns every HR
//! collection.
//!
//! The [`Gateway`] trait is the only seam the rest of the suite talks to.
//! [`RestGateway`] speaks the PostgREST dialect over HTTP; [`MemoryGateway`]
//! keeps tables in process for demo mode and tests.

mod error;
mod memory;
mod query;
mod rest;
mod settings;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

pub use error::{GatewayError, GatewayResult};
pub use memory::{MemoryGateway, Operation};
pub use query::{Direction, Ordering, Query};
pub use rest::RestGateway;
pub use settings::{ConfigError, GatewaySettings};

/// Table-oriented CRUD surface of the hosted backend.
///
/// Rows travel as JSON objects; typed mapping happens in the product crates.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Select rows matching the query's equality filters, in the query's order.
    async fn list(&self, table: &str, query: &Query) -> GatewayResult<Vec<Value>>;

    /// Fetch a single row by id, `None` when it does not exist.
    async fn get(&self, table: &str, id: Uuid) -> GatewayResult<Option<Value>>;

    /// Insert a row and return it as stored, including the generated id.
    async fn create(&self, table: &str, record: Value) -> GatewayResult<Value>;

    /// Apply a partial update and return the updated row.
    async fn update(&self, table: &str, id: Uuid, patch: Value) -> GatewayResult<Value>;

    async fn delete(&self, table: &str, id: Uuid) -> GatewayResult<()>;
}
