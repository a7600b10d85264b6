use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, timeout};
use tracing::{info, warn};

use genchat_types::{
    Chat, GenerationError, ATTEMPT_TIMEOUT, MAX_RETRIES, PROGRESS_INTERVAL, RETRY_BACKOFF,
};

use crate::{GenerationClient, GenerationRequest};

/// Knobs for the retry/timeout wrapper. Defaults match the production
/// budget; tests shrink the durations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Each attempt independently races against this timeout
    pub attempt_timeout: Duration,
    /// Fixed wait between failed attempts, none after the last
    pub backoff: Duration,
    /// How often to log progress while a call is in flight
    pub progress_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            attempt_timeout: ATTEMPT_TIMEOUT,
            backoff: RETRY_BACKOFF,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Wall-clock deadline for one whole handler invocation. Matches the
    /// longest configured per-attempt timeout.
    pub fn overall_deadline(&self) -> Duration {
        self.attempt_timeout
    }
}

/// Logs elapsed time at a fixed interval while a call is in flight.
/// Aborted on drop, so no tick outlives the request on any exit path.
struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    fn spawn(started: Instant, every: Duration) -> Self {
        Self::spawn_with(every, move || {
            info!(
                elapsed_s = started.elapsed().as_secs(),
                "generation request still in flight"
            );
        })
    }

    fn spawn_with(every: Duration, on_tick: impl Fn() + Send + 'static) -> Self {
        let handle = tokio::spawn(async move {
            let mut tick = interval(every);
            // the first tick completes immediately; skip it
            tick.tick().await;
            loop {
                tick.tick().await;
                on_tick();
            }
        });
        Self { handle }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run a generation request with bounded retries, racing every attempt
/// against the per-attempt timeout. Returns the first success, or the last
/// failure once the budget is exhausted. Non-retriable failures (auth,
/// invalid request, malformed response) short-circuit the loop.
pub async fn call_with_retry(
    client: &dyn GenerationClient,
    request: &GenerationRequest,
    policy: &RetryPolicy,
) -> Result<Chat, GenerationError> {
    let started = Instant::now();
    let _progress = ProgressTicker::spawn(started, policy.progress_interval);

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let call = async {
            match request {
                GenerationRequest::Create { message } => client.create_chat(message).await,
                GenerationRequest::Continue { chat_id, message } => {
                    client.continue_chat(chat_id, message).await
                }
            }
        };

        let outcome = match timeout(policy.attempt_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(policy.attempt_timeout)),
        };

        match outcome {
            Ok(chat) => {
                info!(
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    chat_id = %chat.id,
                    message_count = chat.messages.len(),
                    "generation call succeeded"
                );
                return Ok(chat);
            }
            Err(err) if attempt <= policy.max_retries && err.is_retriable() => {
                warn!(
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "generation attempt failed, retrying"
                );
                sleep(policy.backoff).await;
            }
            Err(err) => {
                warn!(
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "generation call failed"
                );
                return Err(err);
            }
        }
    }
}
