use std::collections::HashMap;

use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};

pub const GPU_TEMPERATURE: &str = "gpu_temperature";
pub const GPU_TEMPERATURE_HELP: &str = "temperature(C) of gpu";

/// Gauge store shared for the process lifetime.
///
/// Container metrics are registered the first time a container name is seen
/// and never removed; a container that stops simply keeps its last reading.
/// Callers serialize access through a single `tokio::sync::Mutex` so a scrape
/// never observes a half-applied cycle.
pub struct MetricRegistry {
    registry: Registry,
    gauges: HashMap<String, Gauge>,
}

impl MetricRegistry {
    /// Creates the registry with the static `gpu_temperature` gauge
    /// pre-registered. It renders as 0 until the first successful scrape.
    pub fn new() -> Result<Self, prometheus::Error> {
        let mut metrics = Self {
            registry: Registry::new(),
            gauges: HashMap::new(),
        };
        metrics.set(GPU_TEMPERATURE, GPU_TEMPERATURE_HELP, 0.0)?;
        Ok(metrics)
    }

    /// Upserts a gauge: the first sight of `name` registers it with `help`,
    /// every call overwrites the current value.
    pub fn set(&mut self, name: &str, help: &str, value: f64) -> Result<(), prometheus::Error> {
        if !self.gauges.contains_key(name) {
            let gauge = Gauge::with_opts(Opts::new(name, help))?;
            self.registry.register(Box::new(gauge.clone()))?;
            self.gauges.insert(name.to_string(), gauge);
        }

        if let Some(gauge) = self.gauges.get(name) {
            gauge.set(value);
        }
        Ok(())
    }

    /// Renders the exposition-format snapshot of every registered gauge.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
