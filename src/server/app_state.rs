use std::sync::Arc;

use tokio::sync::Mutex;

use crate::collector::Collector;
use crate::config::Config;
use crate::registry::MetricRegistry;

pub struct AppState {
    pub config: Config,
    pub start_time: std::time::Instant,
    /// Shared gauge store; a single lock serializes all set/render access.
    pub registry: Mutex<MetricRegistry>,
    pub collector: Collector,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, prometheus::Error> {
        let collector = Collector::new(&config.sources);

        Ok(Arc::new(Self {
            config,
            start_time: std::time::Instant::now(),
            registry: Mutex::new(MetricRegistry::new()?),
            collector,
        }))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
