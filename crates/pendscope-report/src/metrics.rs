//! Push-gateway export of a pass's counts.
//!
//! Gauges live in a private registry built per push, so repeated runs in one
//! process never collide with each other or with a global registry.

use crate::error::{ReportError, Result};
use pendscope_core::EvaluationResult;
use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Job name under which metrics are grouped on the gateway
pub const JOB_NAME: &str = "pendscope";

const METRICS_TARGET: &str = "metrics push";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a registry holding the gauges for `results`
pub fn build_registry(results: &[EvaluationResult], cluster_name: &str) -> Result<Registry> {
    let labels = HashMap::from([("cluster".to_string(), cluster_name.to_string())]);
    let registry = Registry::new_custom(None, Some(labels))?;

    let schedulable = results.iter().filter(|r| r.schedulable).count();
    let unschedulable = results.len() - schedulable;

    let gauges = [
        (
            "pendscope_pending_pods_total",
            "Total number of pending pods analyzed",
            results.len(),
        ),
        (
            "pendscope_pending_pods_schedulable",
            "Number of pending pods that are schedulable",
            schedulable,
        ),
        (
            "pendscope_pending_pods_unschedulable",
            "Number of pending pods that are unschedulable due to resource constraints",
            unschedulable,
        ),
    ];
    for (name, help, value) in gauges {
        let gauge = IntGauge::new(name, help)?;
        gauge.set(value as i64);
        registry.register(Box::new(gauge))?;
    }

    let per_pod = IntGaugeVec::new(
        Opts::new(
            "pendscope_pod_schedulable",
            "Whether a specific pod is schedulable (1) or not (0)",
        ),
        &["pod", "namespace"],
    )?;
    for result in results {
        per_pod
            .with_label_values(&[result.pod.name.as_str(), result.pod.namespace.as_str()])
            .set(i64::from(result.schedulable));
    }
    registry.register(Box::new(per_pod))?;

    Ok(registry)
}

/// Render the gauges for `results` in the text exposition format
pub fn render(results: &[EvaluationResult], cluster_name: &str) -> Result<String> {
    let registry = build_registry(results, cluster_name)?;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ReportError::metrics(e.to_string()))
}

/// Pushes analysis gauges to a Prometheus push gateway
pub struct MetricsPusher {
    gateway_url: String,
    client: Client,
}

impl MetricsPusher {
    pub fn new(gateway_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReportError::http(METRICS_TARGET, e))?;

        Ok(Self {
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `<gateway>/metrics/job/pendscope`
    pub fn push_url(&self) -> String {
        format!("{}/metrics/job/{}", self.gateway_url, JOB_NAME)
    }

    pub async fn push(
        &self,
        results: &[EvaluationResult],
        cluster_name: &str,
        token: &CancellationToken,
    ) -> Result<()> {
        let body = render(results, cluster_name)?;
        let url = self.push_url();
        info!(url = url.as_str(), "Pushing metrics");

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, TextEncoder::new().format_type())
            .body(body)
            .send();

        let resp = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ReportError::cancelled(METRICS_TARGET)),
            resp = request => resp.map_err(|e| ReportError::http(METRICS_TARGET, e))?,
        };

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::unexpected_status(
                "Prometheus Push Gateway",
                status,
                body,
            ));
        }

        debug!("Metrics pushed");
        Ok(())
    }
}
