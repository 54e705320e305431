mod command;
mod query;

use self::command::ProductCommandService;
use self::query::ProductQueryService;
use crate::{
    abstract_trait::{DynProductCommandService, DynProductQueryService},
    repository::{CategoryRepository, ProductRepository},
    utils::OperationTracer,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ProductService {
    pub query: DynProductQueryService,
    pub command: DynProductCommandService,
}

impl fmt::Debug for ProductService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductService")
            .field("query", &"Arc<dyn ProductQueryServiceTrait>")
            .field("command", &"Arc<dyn ProductCommandServiceTrait>")
            .finish()
    }
}

impl ProductService {
    pub async fn new(
        products: ProductRepository,
        categories: CategoryRepository,
        registry: Arc<Mutex<Registry>>,
    ) -> Result<Self> {
        let query_tracer = OperationTracer::new("product_query_service", registry.clone()).await;
        let command_tracer = OperationTracer::new("product_command_service", registry).await;

        let query = Arc::new(ProductQueryService::new(
            products.query.clone(),
            categories.query.clone(),
            query_tracer,
        )) as DynProductQueryService;

        let command = Arc::new(ProductCommandService::new(
            products.query,
            products.command,
            categories.query,
            command_tracer,
        )) as DynProductCommandService;

        Ok(Self { query, command })
    }
}
