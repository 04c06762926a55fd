use serde::Deserialize;

use super::value;
use crate::error::ParseError;

/// One line of `docker stats --format` output. The template also emits a
/// `container` id field which is not used for metric naming.
#[derive(Debug, Deserialize)]
struct StatsRecord {
    name: String,
    cpu: String,
    memory: String,
}

/// CPU and memory reading for a single running container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSample {
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Parses the stdout of the container stats query: one JSON object per line,
/// percentages given as `"NN.NN%"` strings.
///
/// Any malformed line aborts the whole batch; a corrupted stats dump must not
/// be partially ingested.
pub fn parse_stats(output: &str) -> Result<Vec<ContainerSample>, ParseError> {
    let mut samples = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: StatsRecord = serde_json::from_str(line)?;
        samples.push(ContainerSample {
            cpu_percent: value::percent(&record.cpu)?,
            memory_percent: value::percent(&record.memory)?,
            name: record.name,
        });
    }

    Ok(samples)
}
