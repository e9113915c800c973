mod employees;

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Schema, SimpleObject, Subscription};
use futures_util::stream::{self, BoxStream, StreamExt};
use platform_api::{ApiError, ApiResult};
use products_hr::{EmployeeForm, EmployeeRepository};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, instrument, warn};

pub use employees::{EmployeeInput, EmployeeNode};

pub type SchemaType = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

pub fn build_schema(repository: Arc<EmployeeRepository>) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(repository)
        .finish()
}

fn repository<'a>(ctx: &Context<'a>) -> ApiResult<&'a Arc<EmployeeRepository>> {
    ctx.data::<Arc<EmployeeRepository>>()
        .map_err(|err| ApiError::internal(anyhow::anyhow!(err.message)))
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    /// Every employee in creation order.
    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(&self, ctx: &Context<'_>) -> ApiResult<Vec<EmployeeNode>> {
        let repository = repository(ctx)?;
        Ok(repository
            .current_collection()
            .into_iter()
            .map(EmployeeNode::from)
            .collect())
    }

    #[instrument(name = "graphql.employee_count", skip_all)]
    async fn employee_count(&self, ctx: &Context<'_>) -> ApiResult<u64> {
        Ok(repository(ctx)?.len() as u64)
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let repository = repository(ctx).map_err(|err| err.extend())?;
        let payload = EmployeeForm::from(input)
            .validate()
            .map_err(|errors| ApiError::fields(errors.iter()).extend())?;
        let employee = repository.add_employee(payload);
        info!(employee_id = %employee.id, "employee created via graphql");
        Ok(employee.into())
    }
}

#[derive(Default)]
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Emits each employee as it is added.
    async fn employee_created(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<BoxStream<'static, EmployeeNode>> {
        let receiver = repository(ctx).map_err(|err| err.extend())?.subscribe();
        let events = stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(employee) => return Some((EmployeeNode::from(employee), receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "employee subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(events.boxed())
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}
