use clap::Parser;
use pendscope_analyzer::{Inspector, InspectorConfig};
use pendscope_cluster::{FileSnapshotProvider, KubeSnapshotProvider, SnapshotProvider};
use pendscope_report::{
    redact_webhook_url, MetricsPusher, OutputFormat, ReportError, Reporter, SlackNotifier,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const SLACK_WEBHOOK_PREFIX: &str = "https://hooks.slack.com/";
const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];
const UNKNOWN_CLUSTER: &str = "unknown";

/// Find pending pods whose CPU or memory demand exceeds every node's allocatable capacity
#[derive(Parser, Debug)]
#[command(name = "pendscope", version, about)]
struct Cli {
    /// Target namespace to analyze (empty for cluster-wide)
    #[arg(short, long, env = "PENDSCOPE_NAMESPACE")]
    namespace: Option<String>,

    /// Use resource limits instead of requests for analysis
    #[arg(long, env = "PENDSCOPE_INCLUDE_LIMITS")]
    include_limits: bool,

    /// Output format: human, json, yaml
    #[arg(short, long, default_value = "human", env = "PENDSCOPE_OUTPUT")]
    output: String,

    /// Slack webhook URL for notifications
    #[arg(long, env = "PENDSCOPE_ALERT_SLACK")]
    alert_slack: Option<String>,

    /// Prometheus push gateway base URL
    #[arg(long, env = "PENDSCOPE_PUSH_GATEWAY")]
    push_gateway: Option<String>,

    /// Cluster name used in reports and metric labels
    #[arg(long, env = "PENDSCOPE_CLUSTER_NAME")]
    cluster_name: Option<String>,

    /// Read nodes and pods from a JSON/YAML snapshot instead of a live cluster
    #[arg(long, env = "PENDSCOPE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Log level: debug, info, warn, error
    #[arg(long, default_value = "info", env = "PENDSCOPE_LOG_LEVEL")]
    log_level: String,

    /// Log format: text, json
    #[arg(long, default_value = "text", env = "PENDSCOPE_LOG_FORMAT")]
    log_format: String,
}

impl Cli {
    /// Check flag values before anything touches the cluster
    fn validate(&self) -> miette::Result<OutputFormat> {
        let format = self.output.parse::<OutputFormat>().map_err(|_| {
            miette::miette!(
                "unsupported output format: {} (supported: human, json, yaml)",
                self.output
            )
        })?;

        if let Some(url) = &self.alert_slack {
            if !url.starts_with(SLACK_WEBHOOK_PREFIX) {
                return Err(miette::miette!(
                    "invalid Slack webhook URL: must start with {}",
                    SLACK_WEBHOOK_PREFIX
                ));
            }
        }

        if let Some(url) = &self.push_gateway {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(miette::miette!(
                    "invalid push gateway URL '{}': must start with http:// or https://",
                    url
                ));
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(miette::miette!(
                "unsupported log level: {} (supported: debug, info, warn, error)",
                self.log_level
            ));
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(miette::miette!(
                "unsupported log format: {} (supported: text, json)",
                self.log_format
            ));
        }

        Ok(format)
    }
}

/// Logs go to stderr so stdout carries only the report
fn init_logging(level: &str, format: &str) -> miette::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| miette::miette!("Failed to initialize logging: {}", e))
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let format = cli.validate()?;
    init_logging(&cli.log_level, &cli.log_format)?;

    run(cli, format).await
}

async fn run(cli: Cli, format: OutputFormat) -> miette::Result<()> {
    info!("Starting pendscope analysis");

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling");
            signal_token.cancel();
        }
    });

    let provider: Arc<dyn SnapshotProvider> = match &cli.snapshot {
        Some(path) => Arc::new(FileSnapshotProvider::load(path).await?),
        None => Arc::new(KubeSnapshotProvider::connect().await?),
    };
    debug!("Snapshot provider ready");

    let inspector = Inspector::new(
        provider,
        InspectorConfig {
            namespace: cli.namespace.clone().filter(|ns| !ns.is_empty()),
            use_limits: cli.include_limits,
        },
    );

    let inspection = inspector.inspect(&token).await.inspect_err(|e| {
        error!(error = %e, "Failed to analyze pod schedulability");
    })?;
    info!(
        pending_pods = inspection.results.len(),
        unschedulable = inspection.unschedulable_count(),
        "Pod schedulability analysis completed"
    );

    let cluster_name = cli
        .cluster_name
        .clone()
        .or_else(|| inspector.cluster_name())
        .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string());

    info!(format = format.as_str(), "Generating report");
    {
        let mut reporter = Reporter::new(std::io::stdout().lock(), format);
        reporter.generate(&inspection.results, &cluster_name, inspection.total_nodes)?;
    }

    notify(&cli, &inspection.results, &cluster_name, &token).await?;

    info!("Analysis completed successfully");
    Ok(())
}

/// Deliver alerts after the report is out. Every configured notifier is
/// attempted; the first failure is returned.
async fn notify(
    cli: &Cli,
    results: &[pendscope_core::EvaluationResult],
    cluster_name: &str,
    token: &CancellationToken,
) -> Result<(), ReportError> {
    let mut first_error = None;

    if let Some(url) = &cli.alert_slack {
        let outcome = match SlackNotifier::new(url.as_str()) {
            Ok(notifier) => notifier.send(results, token).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            error!(
                webhook_url = redact_webhook_url(url).as_str(),
                error = %e,
                "Failed to send Slack notification"
            );
            first_error.get_or_insert(e);
        }
    }

    if let Some(url) = &cli.push_gateway {
        let outcome = match MetricsPusher::new(url) {
            Ok(pusher) => pusher.push(results, cluster_name, token).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            error!(error = %e, "Failed to push metrics");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
