use thiserror::Error;

/// Malformed source output: bad JSON/XML, a missing field or element, or a
/// value that is not a number after suffix stripping.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid stats record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("missing element <{0}> in GPU report")]
    MissingElement(&'static str),

    #[error("expected a value ending in `{unit}`, got `{raw}`")]
    MissingUnit { raw: String, unit: &'static str },

    #[error("invalid numeric value `{0}`")]
    Number(String),
}

/// External query tool missing or exited with a failure status.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with code {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },
}

/// Any failure produced while collecting from a single source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("metric registration failed: {0}")]
    Registry(#[from] prometheus::Error),
}

/// A failed collection cycle, tagged with the source that broke it.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("container stats collection failed: {0}")]
    Docker(#[source] SourceError),

    #[error("GPU status collection failed: {0}")]
    Gpu(#[source] SourceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
