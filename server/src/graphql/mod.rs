mod hr;
mod types;

use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, ID, Object, Schema};
use platform_api::{ApiError, FieldIssue, error_with_code, internal_error};
use platform_gateway::GatewayError;
use products_hr::{HrError, HrServices};
use tracing::error;
use uuid::Uuid;

pub use hr::{HrMutation, HrQuery};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: HrServices) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    async fn hr(&self) -> HrQuery {
        HrQuery
    }

    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[Object]
impl MutationRoot {
    async fn hr(&self) -> HrMutation {
        HrMutation
    }
}

fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a HrServices> {
    ctx.data::<HrServices>()
        .map_err(|_| error_with_code("INTERNAL", "Missing HR services"))
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| ApiError::validation("Invalid ID").extend())
}

/// Map a domain failure onto the API error codes. Gateway details are
/// logged and kept out of the response.
fn hr_error(err: HrError) -> Error {
    let api = match err {
        HrError::Validation(errors) => ApiError::Validation {
            message: errors.to_string(),
            fields: errors
                .fields
                .iter()
                .map(|field| FieldIssue {
                    field: field.field.to_string(),
                    message: field.issue.message().to_string(),
                })
                .collect(),
        },
        HrError::Transition(err) => ApiError::Conflict(err.to_string()),
        HrError::NotFound { .. } => ApiError::NotFound,
        HrError::Gateway(err) if err.is_not_found() => ApiError::NotFound,
        HrError::Gateway(GatewayError::Backend { status: 409, .. }) => {
            ApiError::Conflict("record conflicts with existing data".into())
        }
        HrError::Gateway(err @ GatewayError::Decode { .. }) => return internal_error(err),
        HrError::Gateway(err) => {
            error!(error = %err, "gateway request failed");
            ApiError::Backend("gateway request failed".into())
        }
    };
    api.extend()
}
