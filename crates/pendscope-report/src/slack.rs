use crate::error::{ReportError, Result};
use crate::redact::redact_webhook_url;
use pendscope_core::EvaluationResult;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Per-pod fields shown before the overflow line
pub const MAX_POD_FIELDS: usize = 5;

const SLACK_TARGET: &str = "Slack notification";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Incoming-webhook message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachment {
    pub color: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SlackField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Build the message summarizing `results`
pub fn build_message(results: &[EvaluationResult]) -> SlackMessage {
    let total = results.len();
    let unschedulable: Vec<&EvaluationResult> = results.iter().filter(|r| !r.schedulable).collect();

    let attachment = if unschedulable.is_empty() {
        SlackAttachment {
            color: "good".to_string(),
            title: format!("✅ All {} pending pods are schedulable", total),
            text: String::new(),
            fields: Vec::new(),
        }
    } else {
        let mut fields: Vec<SlackField> = unschedulable
            .iter()
            .take(MAX_POD_FIELDS)
            .map(|result| SlackField {
                title: format!("Pod: {}", result.pod.name),
                value: format!(
                    "Reason: {}\nSuggestion: {}",
                    result.reason(),
                    result.suggestion()
                ),
                short: false,
            })
            .collect();

        if unschedulable.len() > MAX_POD_FIELDS {
            fields.push(SlackField {
                title: "Additional Issues".to_string(),
                value: format!(
                    "... and {} more unschedulable pods",
                    unschedulable.len() - MAX_POD_FIELDS
                ),
                short: false,
            });
        }

        SlackAttachment {
            color: "danger".to_string(),
            title: format!(
                "⚠️ {} of {} pending pods are unschedulable",
                unschedulable.len(),
                total
            ),
            text: String::new(),
            fields,
        }
    };

    SlackMessage {
        text: "Kubernetes Pending Pod Analysis Report".to_string(),
        attachments: vec![attachment],
    }
}

/// Posts analysis summaries to a Slack incoming webhook
pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReportError::http(SLACK_TARGET, e))?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }

    /// Send the summary. Does nothing when there are no results.
    pub async fn send(&self, results: &[EvaluationResult], token: &CancellationToken) -> Result<()> {
        if results.is_empty() {
            debug!("No results, skipping Slack notification");
            return Ok(());
        }

        info!(
            webhook_url = redact_webhook_url(&self.webhook_url).as_str(),
            "Sending Slack notification"
        );

        let message = build_message(results);
        let request = self.client.post(&self.webhook_url).json(&message).send();

        let resp = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ReportError::cancelled(SLACK_TARGET)),
            resp = request => resp.map_err(|e| ReportError::http(SLACK_TARGET, e))?,
        };

        if resp.status() != StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::unexpected_status("Slack API", status, body));
        }

        debug!("Slack notification delivered");
        Ok(())
    }
}
