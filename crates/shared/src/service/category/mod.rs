mod command;
mod query;

use self::command::CategoryCommandService;
use self::query::CategoryQueryService;
use crate::{
    abstract_trait::{DynCategoryCommandService, DynCategoryQueryService},
    repository::{CategoryRepository, ProductRepository},
    utils::OperationTracer,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CategoryService {
    pub query: DynCategoryQueryService,
    pub command: DynCategoryCommandService,
}

impl fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryService")
            .field("query", &"Arc<dyn CategoryQueryServiceTrait>")
            .field("command", &"Arc<dyn CategoryCommandServiceTrait>")
            .finish()
    }
}

impl CategoryService {
    pub async fn new(
        categories: CategoryRepository,
        products: ProductRepository,
        registry: Arc<Mutex<Registry>>,
    ) -> Result<Self> {
        let query_tracer = OperationTracer::new("category_query_service", registry.clone()).await;
        let command_tracer = OperationTracer::new("category_command_service", registry).await;

        let query = Arc::new(CategoryQueryService::new(
            categories.query.clone(),
            products.query.clone(),
            query_tracer,
        )) as DynCategoryQueryService;

        let command = Arc::new(CategoryCommandService::new(
            categories.query,
            categories.command,
            products.query,
            command_tracer,
        )) as DynCategoryCommandService;

        Ok(Self { query, command })
    }
}
