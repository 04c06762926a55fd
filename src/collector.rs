use tokio::sync::Mutex;
use tracing::debug;

use crate::command::{self, CommandSpec};
use crate::config::SourcesConfig;
use crate::error::{CollectionError, SourceError};
use crate::parse::{self, ContainerSample};
use crate::registry::{MetricRegistry, GPU_TEMPERATURE, GPU_TEMPERATURE_HELP};

/// Runs one collection cycle per scrape: query both sources concurrently,
/// parse their output, then apply all samples to the registry.
pub struct Collector {
    docker_stats: CommandSpec,
    nvidia_smi: CommandSpec,
}

impl Collector {
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            docker_stats: sources.docker_stats.clone(),
            nvidia_smi: sources.nvidia_smi.clone(),
        }
    }

    /// Both queries are started together and joined before any registry
    /// mutation, so a failed cycle leaves every previous value intact.
    pub async fn scrape(&self, registry: &Mutex<MetricRegistry>) -> Result<(), CollectionError> {
        let (stats_out, gpu_out) = tokio::join!(
            command::run(&self.docker_stats),
            command::run(&self.nvidia_smi),
        );

        let samples = stats_out
            .map_err(SourceError::from)
            .and_then(|out| parse::parse_stats(&out).map_err(SourceError::from))
            .map_err(CollectionError::Docker)?;

        let gpu = gpu_out
            .map_err(SourceError::from)
            .and_then(|out| parse::parse_status(&out).map_err(SourceError::from))
            .map_err(CollectionError::Gpu)?;

        let mut registry = registry.lock().await;

        for sample in &samples {
            apply_container(&mut registry, sample)
                .map_err(|e| CollectionError::Docker(SourceError::Registry(e)))?;
        }

        registry
            .set(GPU_TEMPERATURE, GPU_TEMPERATURE_HELP, gpu.temperature_c)
            .map_err(|e| CollectionError::Gpu(SourceError::Registry(e)))?;

        debug!(
            containers = samples.len(),
            gpu_temperature = gpu.temperature_c,
            "Collection cycle complete"
        );

        Ok(())
    }
}

fn apply_container(
    registry: &mut MetricRegistry,
    sample: &ContainerSample,
) -> Result<(), prometheus::Error> {
    let key = metric_key(&sample.name);

    registry.set(
        &format!("container_usage_cpu_{key}"),
        &format!("cpu_usage(%) of {} container", sample.name),
        sample.cpu_percent,
    )?;
    registry.set(
        &format!("container_usage_memory_{key}"),
        &format!("memory_usage(%) of {} container", sample.name),
        sample.memory_percent,
    )
}

/// Container names may carry characters that are illegal in exposition
/// metric names (dashes, dots); map them to underscores.
fn metric_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    fn two_container_stats() -> CommandSpec {
        sh(concat!(
            r#"echo '{"container": "8d4f", "name": "web", "memory": "20.0%", "cpu": "10.5%"}'; "#,
            r#"echo '{"container": "a1b2", "name": "db", "memory": "15.0%", "cpu": "5.0%"}'"#,
        ))
    }

    fn gpu_report(temp: &str) -> CommandSpec {
        sh(&format!(
            "echo '<nvidia_smi_log><gpu><temperature><gpu_temp>{temp}</gpu_temp></temperature></gpu></nvidia_smi_log>'"
        ))
    }

    fn collector(docker_stats: CommandSpec, nvidia_smi: CommandSpec) -> Collector {
        Collector {
            docker_stats,
            nvidia_smi,
        }
    }

    #[tokio::test]
    async fn test_scrape_registers_all_metrics() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());
        let collector = collector(two_container_stats(), gpu_report("55.0 C"));

        collector.scrape(&registry).await.unwrap();

        let text = registry.lock().await.render().unwrap();
        assert!(text.contains("gpu_temperature 55"));
        assert!(text.contains("container_usage_cpu_web 10.5"));
        assert!(text.contains("container_usage_memory_web 20"));
        assert!(text.contains("container_usage_cpu_db 5"));
        assert!(text.contains("container_usage_memory_db 15"));

        let gauge_lines = text.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(gauge_lines, 5);
    }

    #[tokio::test]
    async fn test_repeated_scrape_is_idempotent() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());
        let collector = collector(two_container_stats(), gpu_report("55.0 C"));

        collector.scrape(&registry).await.unwrap();
        let first = registry.lock().await.render().unwrap();

        collector.scrape(&registry).await.unwrap();
        assert_eq!(first, registry.lock().await.render().unwrap());
    }

    #[tokio::test]
    async fn test_second_cycle_updates_in_place() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());

        collector(two_container_stats(), gpu_report("55.0 C"))
            .scrape(&registry)
            .await
            .unwrap();

        let updated = sh(r#"echo '{"container": "8d4f", "name": "web", "memory": "21.0%", "cpu": "11.5%"}'"#);
        collector(updated, gpu_report("60.0 C"))
            .scrape(&registry)
            .await
            .unwrap();

        let text = registry.lock().await.render().unwrap();
        assert!(text.contains("container_usage_cpu_web 11.5"));
        assert!(text.contains("gpu_temperature 60"));
        // db stopped refreshing but is kept with its last value
        assert!(text.contains("container_usage_cpu_db 5"));
        let cpu_web = text
            .lines()
            .filter(|l| l.starts_with("container_usage_cpu_web"))
            .count();
        assert_eq!(cpu_web, 1);
    }

    #[tokio::test]
    async fn test_malformed_stats_fails_without_touching_registry() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());

        collector(two_container_stats(), gpu_report("55.0 C"))
            .scrape(&registry)
            .await
            .unwrap();
        let before = registry.lock().await.render().unwrap();

        let missing_cpu = sh(r#"echo '{"container": "8d4f", "name": "web", "memory": "20.0%"}'"#);
        let err = collector(missing_cpu, gpu_report("99.0 C"))
            .scrape(&registry)
            .await
            .unwrap_err();

        assert!(matches!(err, CollectionError::Docker(_)));
        assert_eq!(before, registry.lock().await.render().unwrap());
    }

    #[tokio::test]
    async fn test_failed_gpu_query_reports_source() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());
        let collector = collector(two_container_stats(), sh("exit 9"));

        let err = collector.scrape(&registry).await.unwrap_err();
        assert!(matches!(
            err,
            CollectionError::Gpu(SourceError::Command(_))
        ));

        // the docker side succeeded but must not have been applied
        let text = registry.lock().await.render().unwrap();
        assert!(!text.contains("container_usage_cpu_web"));
    }

    #[tokio::test]
    async fn test_container_name_sanitized() {
        let registry = Mutex::new(MetricRegistry::new().unwrap());
        let stats = sh(r#"echo '{"container": "c0", "name": "my-app.1", "memory": "1.0%", "cpu": "2.0%"}'"#);

        collector(stats, gpu_report("40 C"))
            .scrape(&registry)
            .await
            .unwrap();

        let text = registry.lock().await.render().unwrap();
        assert!(text.contains("container_usage_cpu_my_app_1 2"));
    }

    #[test]
    fn test_metric_key() {
        assert_eq!(metric_key("web"), "web");
        assert_eq!(metric_key("my-app.1"), "my_app_1");
        assert_eq!(metric_key("ns:svc"), "ns:svc");
    }
}
