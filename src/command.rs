use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

/// Docker stats format template emitting one JSON object per container.
const DOCKER_STATS_FORMAT: &str = r#"{"container": "{{ .Container }}", "name": "{{ .Name }}", "memory": "{{ .MemPerc }}", "cpu": "{{ .CPUPerc }}"}"#;

/// Argv description of an external query. Configs may override the built-in
/// commands, e.g. to wrap them in `sudo` or point at a test shim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// One-shot container stats query with JSON-formatted output.
    pub fn docker_stats() -> Self {
        Self {
            program: "docker".to_string(),
            args: vec![
                "stats".to_string(),
                "--no-stream".to_string(),
                "--format".to_string(),
                DOCKER_STATS_FORMAT.to_string(),
            ],
        }
    }

    /// Full GPU status query as XML.
    pub fn nvidia_smi() -> Self {
        Self {
            program: "nvidia-smi".to_string(),
            args: vec!["-x".to_string(), "-q".to_string()],
        }
    }
}

/// Runs an external query to completion and returns its trimmed stdout.
///
/// A missing tool or non-zero exit is a `CommandError`; there is no timeout
/// beyond what the process itself does.
pub async fn run(spec: &CommandSpec) -> Result<String, CommandError> {
    debug!(program = %spec.program, "Running source query");

    let output = Command::new(&spec.program)
        .args(&spec.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| CommandError::Launch {
            program: spec.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(CommandError::Exit {
            program: spec.program.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
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

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let out = run(&sh("echo hello")).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let err = run(&sh("echo broken >&2; exit 3")).await.unwrap_err();
        match err {
            CommandError::Exit { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_missing_tool() {
        let spec = CommandSpec {
            program: "definitely-not-installed-anywhere".to_string(),
            args: Vec::new(),
        };
        assert!(matches!(
            run(&spec).await,
            Err(CommandError::Launch { .. })
        ));
    }
}
