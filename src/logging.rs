use crate::cli::Cli;
use anyhow::Result;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub fn init(cli: &Cli) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.effective_log_level()));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match cli.effective_log_format() {
        "json" => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE);

            subscriber.with(fmt_layer).init();
        }
        _ => {
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE);

            subscriber.with(fmt_layer).init();
        }
    }

    Ok(())
}
