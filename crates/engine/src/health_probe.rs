// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Polls a newly-started instance's health-check endpoint until it answers
//! or a deadline expires.

use std::time::Duration;

use tracing::debug;

const HEALTH_CHECK_PATH: &str = "/_ah/health_check";
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEADLINE: Duration = Duration::from_secs(180);

/// Builds the client used for health probing: redirects are never
/// followed, since a redirect from the app itself is not "ready".
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap_or_default()
}

/// Polls `http://{node_ip}:{port}/_ah/health_check` at [`POLL_INTERVAL`]
/// until any response (any HTTP status) arrives or [`DEADLINE`] expires.
/// Redirects are not followed; I/O errors count as one retry.
pub async fn wait_ready(client: &reqwest::Client, node_ip: &str, port: u16) -> bool {
    let url = format!("http://{node_ip}:{port}{HEALTH_CHECK_PATH}");
    let deadline = tokio::time::Instant::now() + DEADLINE;

    loop {
        match client.get(&url).send().await {
            Ok(_) => return true,
            Err(err) => debug!(%url, %err, "health probe attempt failed"),
        }

        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_and_interval_match_spec() {
        assert_eq!(DEADLINE, Duration::from_secs(180));
        assert_eq!(POLL_INTERVAL, Duration::from_secs(1));
    }
}
