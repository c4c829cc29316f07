use anyhow::Result;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters for one process. Cloning shares the underlying registry.
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    listings_collected: IntCounterVec,
    source_failures: IntCounterVec,
    messages: IntCounterVec,
    runs: IntCounterVec,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let listings_collected = IntCounterVec::new(
            Opts::new(
                "car_deals_listings_collected_total",
                "Listings returned by each source",
            ),
            &["source"],
        )?;
        let source_failures = IntCounterVec::new(
            Opts::new(
                "car_deals_source_failures_total",
                "Source fetches that failed, timed out or panicked",
            ),
            &["source"],
        )?;
        let messages = IntCounterVec::new(
            Opts::new("car_deals_messages_total", "Channel messages by outcome"),
            &["outcome"],
        )?;
        let runs = IntCounterVec::new(
            Opts::new("car_deals_runs_total", "Pipeline runs by trigger and outcome"),
            &["trigger", "outcome"],
        )?;

        registry.register(Box::new(listings_collected.clone()))?;
        registry.register(Box::new(source_failures.clone()))?;
        registry.register(Box::new(messages.clone()))?;
        registry.register(Box::new(runs.clone()))?;

        Ok(Self {
            registry,
            listings_collected,
            source_failures,
            messages,
            runs,
        })
    }

    pub fn record_collected(&self, source: &str, count: usize) {
        self.listings_collected
            .with_label_values(&[source])
            .inc_by(count as u64);
    }

    pub fn record_source_failure(&self, source: &str) {
        self.source_failures.with_label_values(&[source]).inc();
    }

    pub fn record_message(&self, delivered: bool) {
        let outcome = if delivered { "sent" } else { "failed" };
        self.messages.with_label_values(&[outcome]).inc();
    }

    pub fn record_run(&self, trigger: &str, outcome: &str) {
        self.runs.with_label_values(&[trigger, outcome]).inc();
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages.with_label_values(&["sent"]).get()
    }

    pub fn messages_failed(&self) -> u64 {
        self.messages.with_label_values(&["failed"]).get()
    }

    pub fn source_failures(&self, source: &str) -> u64 {
        self.source_failures.with_label_values(&[source]).get()
    }

    /// Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
