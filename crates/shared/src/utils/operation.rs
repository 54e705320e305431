use crate::utils::{Method, Metrics, Status};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{Span, error, info, info_span};

pub struct TracingContext {
    pub span: Span,
    pub operation: String,
    pub start_time: Instant,
}

/// Span plus request counter and latency histogram for every service operation.
#[derive(Clone, Debug)]
pub struct OperationTracer {
    component: &'static str,
    metrics: Metrics,
}

impl OperationTracer {
    pub async fn new(component: &'static str, registry: Arc<Mutex<Registry>>) -> Self {
        let metrics = Metrics::new();

        let mut registry = registry.lock().await;
        registry.register(
            format!("{component}_request_counter"),
            format!("Total number of requests to the {component}"),
            metrics.request_counter.clone(),
        );
        registry.register(
            format!("{component}_request_duration"),
            format!("Histogram of request durations for the {component}"),
            metrics.request_duration.clone(),
        );

        Self { component, metrics }
    }

    pub fn start(&self, operation: &str, attributes: &[(&str, String)]) -> TracingContext {
        let span = info_span!(
            "operation",
            component = self.component,
            operation = operation,
            attributes = ?attributes,
        );

        span.in_scope(|| info!("Starting operation: {operation}"));

        TracingContext {
            span,
            operation: operation.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn success(&self, ctx: &TracingContext, method: Method, message: &str) {
        self.complete(ctx, method, true, message);
    }

    pub fn error(&self, ctx: &TracingContext, method: Method, message: &str) {
        self.complete(ctx, method, false, message);
    }

    fn complete(&self, ctx: &TracingContext, method: Method, is_success: bool, message: &str) {
        let elapsed = ctx.start_time.elapsed().as_secs_f64();
        let _entered = ctx.span.enter();

        let status = if is_success {
            info!(duration_secs = elapsed, "✅ Operation completed successfully: {message}");
            Status::Success
        } else {
            error!(duration_secs = elapsed, "❌ Operation failed: {message}");
            Status::Error
        };

        self.metrics.record(&ctx.operation, method, status, elapsed);
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[tokio::test]
    async fn outcomes_are_counted_and_exported() {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let tracer = OperationTracer::new("category_query_service", registry.clone()).await;

        let ctx = tracer.start("find_all", &[("skip", "0".to_string())]);
        tracer.success(&ctx, Method::Get, "ok");
        let ctx = tracer.start("find_by_id", &[]);
        tracer.error(&ctx, Method::Get, "missing");

        let metrics = tracer.metrics();
        assert_eq!(metrics.count("find_all", Method::Get, Status::Success), 1);
        assert_eq!(metrics.count("find_by_id", Method::Get, Status::Error), 1);
        assert_eq!(metrics.count("find_by_id", Method::Get, Status::Success), 0);

        let mut buffer = String::new();
        encode(&mut buffer, &*registry.lock().await).unwrap();
        assert!(buffer.contains("category_query_service_request_counter_total"));
        assert!(buffer.contains("operation=\"find_all\""));
    }
}
