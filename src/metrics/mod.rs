use prometheus::{
    Encoder, HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP requests by route and status
// - Order store operation latency
// - Lifecycle transition outcomes
//
// Recorded by the request handling layer and scraped via /metrics.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounterVec,
    pub store_operation_duration: HistogramVec,
    pub order_transitions_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let store_operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "order_store_operation_duration_seconds",
                "Order store operation duration",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5]),
            &["operation"],
        )?;
        registry.register(Box::new(store_operation_duration.clone()))?;

        let order_transitions_total = IntCounterVec::new(
            Opts::new("order_transitions_total", "Requested order status transitions"),
            &["target", "outcome"],
        )?;
        registry.register(Box::new(order_transitions_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            store_operation_duration,
            order_transitions_total,
        })
    }

    pub fn record_request(&self, method: &str, route: &str, status: u16) {
        self.http_requests_total
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
    }

    /// Observes on drop
    pub fn store_timer(&self, operation: &str) -> HistogramTimer {
        self.store_operation_duration
            .with_label_values(&[operation])
            .start_timer()
    }

    pub fn record_transition(&self, target: &str, outcome: &str) {
        self.order_transitions_total
            .with_label_values(&[target, outcome])
            .inc();
    }

    /// Text exposition format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("GET", "/orders/{id}", 200);
        metrics.record_request("GET", "/orders/{id}", 200);
        metrics.record_request("GET", "/orders/{id}", 404);

        let gathered = metrics.registry.gather();
        let requests = gathered.iter().find(|m| m.name() == "http_requests_total").unwrap();
        assert_eq!(requests.metric.len(), 2); // Two status labels
    }

    #[test]
    fn test_store_timer_observes_on_drop() {
        let metrics = Metrics::new().unwrap();
        {
            let _timer = metrics.store_timer("find");
        }

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("order_store_operation_duration_seconds_count{operation=\"find\"} 1"));
    }

    #[test]
    fn test_render_transitions() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transition("shipped", "applied");
        metrics.record_transition("completed", "rejected");

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("order_transitions_total{outcome=\"applied\",target=\"shipped\"} 1"));
        assert!(rendered.contains("order_transitions_total{outcome=\"rejected\",target=\"completed\"} 1"));
    }
}
