//! 存储层瞬时错误重试
//!
//! 仅对 `HWSystemError::is_transient()` 为真的错误（连接丢失、连接池获取失败）重试，
//! 退避时间按 2 的幂次增长。业务校验错误原样返回。

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::Result;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    // 首次失败后的最大重试次数
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_attempts,
            base_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(retry.min(16)))
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0;
        loop {
            match f().await {
                Err(e) if e.is_transient() && retry < self.max_retries => {
                    let delay = self.backoff(retry);
                    retry += 1;
                    warn!(
                        "{} 遇到瞬时错误，第 {} 次重试（{} ms 后）: {}",
                        operation,
                        retry,
                        delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HWSystemError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_transient_error_is_retried_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = fast_policy(3)
            .run("test", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(HWSystemError::database_connection("连接丢失"))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = fast_policy(2)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HWSystemError::database_connection("连接丢失"))
            })
            .await;

        assert!(matches!(result, Err(HWSystemError::DatabaseConnection(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_validation_error_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = fast_policy(5)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(HWSystemError::attempts_exceeded_limit(3))
            })
            .await;

        assert!(matches!(result, Err(HWSystemError::AttemptsExceeded(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(50),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(50));
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
    }
}
