/// Hide the secret tail of a webhook URL before it reaches a log line.
///
/// `https://hooks.slack.com/services/T0/B0/secret` becomes
/// `https://hooks.slack.com/services/T0/B0/***`. A URL without a usable
/// final segment is replaced entirely.
pub fn redact_webhook_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    match url.rfind('/') {
        Some(idx) if idx < url.len() - 1 => format!("{}***", &url[..=idx]),
        _ => "***".to_string(),
    }
}
