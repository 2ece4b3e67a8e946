use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

// stats.nba.com stalls requests that don't look like they come from nba.com.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(BROWSER_UA)
            .default_headers(default_headers())
            .build()
            .context("failed to build http client")
    })
}

pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    Ok(body)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Bounded retry with linear backoff: the wait after failed attempt `n` is
/// `n * backoff_step`. A successful call is followed by `pacing` so the
/// upstream isn't hammered by back-to-back requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
    pub pacing: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
            pacing: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_step: Duration::ZERO,
            pacing: Duration::ZERO,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }

    pub fn run<T>(&self, label: &str, mut action: impl FnMut() -> Result<T>) -> Result<T> {
        let attempts = self.max_attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match action() {
                Ok(value) => {
                    if !self.pacing.is_zero() {
                        thread::sleep(self.pacing);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    tracing::debug!(%label, attempt, error = %err, "attempt failed");
                    last_err = Some(err);
                    if attempt < attempts {
                        let delay = self.delay_after(attempt);
                        if !delay.is_zero() {
                            thread::sleep(delay);
                        }
                    }
                }
            }
        }
        let err = last_err.unwrap_or_else(|| anyhow!("no attempts made"));
        Err(err.context(format!("{label} failed after {attempts} attempts")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::anyhow;

    use super::RetryPolicy;

    #[test]
    fn backoff_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let out = RetryPolicy::immediate(3).run("flaky", || {
            calls += 1;
            if calls < 3 { Err(anyhow!("boom")) } else { Ok(calls) }
        });
        assert_eq!(out.expect("third attempt should succeed"), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: anyhow::Result<()> = RetryPolicy::immediate(3).run("down", || {
            calls += 1;
            Err(anyhow!("still down"))
        });
        assert_eq!(calls, 3);
        let msg = format!("{:#}", out.expect_err("should fail"));
        assert!(msg.contains("down failed after 3 attempts"));
        assert!(msg.contains("still down"));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let mut calls = 0;
        let _ = RetryPolicy::immediate(0).run("once", || {
            calls += 1;
            Ok(())
        });
        assert_eq!(calls, 1);
    }
}
