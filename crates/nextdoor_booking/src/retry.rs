// --- File: crates/nextdoor_booking/src/retry.rs ---
//! Timeouts and bounded retries for calendar provider calls.

use chrono::{DateTime, Utc};
use nextdoor_common::services::{
    BoxFuture, BusyPeriod, CalendarError, CalendarEvent, CalendarEventResult, CalendarService,
};
use nextdoor_config::GcalConfig;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;

/// Jittered exponential backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_pct: f64,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: usize,
        base_delay_ms: u64,
        max_delay_ms: u64,
        jitter_pct: f64,
    ) -> Self {
        let base_delay_ms = base_delay_ms.max(1);
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
            max_delay_ms: max_delay_ms.max(base_delay_ms),
            jitter_pct: jitter_pct.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &GcalConfig) -> Self {
        Self::new(
            config.retry_attempts,
            config.retry_base_delay_ms,
            config.retry_base_delay_ms.saturating_mul(16),
            0.2,
        )
    }

    /// Delay before retry number `attempt + 1`.
    pub fn next_delay(&self, attempt: usize) -> Duration {
        let exp = 2_u64.saturating_pow(attempt as u32);
        let delay = self.base_delay_ms.saturating_mul(exp).min(self.max_delay_ms);
        let delay = if self.jitter_pct > 0.0 {
            let spread = (delay as f64 * self.jitter_pct) as i64;
            let delta = rand::thread_rng().gen_range(-spread..=spread);
            delay.saturating_add_signed(delta)
        } else {
            delay
        };
        Duration::from_millis(delay)
    }

    /// Runs `op` until it succeeds, fails with an error `should_retry` rejects, or the attempt
    /// budget is spent. The last error is returned.
    pub async fn retry_when<F, Fut, T, E>(
        &self,
        mut op: F,
        should_retry: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !should_retry(&err) {
                        return Err(err);
                    }
                    sleep(self.next_delay(attempt - 1)).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 200, 3_200, 0.2)
    }
}

fn is_transient(err: &CalendarError) -> bool {
    matches!(err, CalendarError::Api(_) | CalendarError::Timeout(_))
}

// A timed-out insert may still have landed, so creation only retries on explicit API errors.
fn is_retryable_create(err: &CalendarError) -> bool {
    matches!(err, CalendarError::Api(_))
}

/// Wraps a calendar with a per-call timeout and a retry policy.
pub struct ResilientCalendar {
    inner: Arc<dyn CalendarService>,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl ResilientCalendar {
    pub fn new(
        inner: Arc<dyn CalendarService>,
        policy: RetryPolicy,
        call_timeout: Duration,
    ) -> Self {
        Self {
            inner,
            policy,
            call_timeout,
        }
    }

    pub fn from_config(inner: Arc<dyn CalendarService>, config: &GcalConfig) -> Self {
        Self::new(
            inner,
            RetryPolicy::from_config(config),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    async fn timed<T>(&self, call: BoxFuture<'_, T, CalendarError>) -> Result<T, CalendarError> {
        match timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let ms = self.call_timeout.as_millis() as u64;
                warn!("Calendar call timed out after {} ms", ms);
                Err(CalendarError::Timeout(ms))
            }
        }
    }
}

impl CalendarService for ResilientCalendar {
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            let calendar_id = calendar_id.as_str();
            self.policy
                .retry_when(
                    |_| self.timed(self.inner.get_busy_times(calendar_id, start_time, end_time)),
                    is_transient,
                )
                .await
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            let calendar_id = calendar_id.as_str();
            let event = &event;
            self.policy
                .retry_when(
                    |_| self.timed(self.inner.create_event(calendar_id, event.clone())),
                    is_retryable_create,
                )
                .await
        })
    }

    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, (), CalendarError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        Box::pin(async move {
            let (calendar_id, event_id) = (calendar_id.as_str(), event_id.as_str());
            self.policy
                .retry_when(
                    |_| {
                        self.timed(
                            self.inner
                                .delete_event(calendar_id, event_id, notify_attendees),
                        )
                    },
                    is_transient,
                )
                .await
        })
    }

    fn mark_event_cancelled(
        &self,
        calendar_id: &str,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        Box::pin(async move {
            let (calendar_id, event_id) = (calendar_id.as_str(), event_id.as_str());
            self.policy
                .retry_when(
                    |_| {
                        self.timed(
                            self.inner
                                .mark_event_cancelled(calendar_id, event_id, notify_attendees),
                        )
                    },
                    is_transient,
                )
                .await
        })
    }
}
