//! 弹性模块：带退避的有界重试阶段执行器。
//!
//! # Resilience
//!
//! A report stage is a zero-argument unit of work. [`StageRunner`] executes
//! it up to [`RetryPolicy::max_attempts`] times, sleeping
//! `min(base · 2^i + jitter, max)` before retry `i`, and hands the last
//! failure back as a [`StageFailure`] instead of retrying indefinitely.
//! Deciding what to substitute on failure is the caller's job.
//!
//! ```rust
//! use cogscreen::resilience::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3).with_jitter(false);
//! assert_eq!(policy.backoff(0, 0.0), Duration::from_secs(2));
//! assert_eq!(policy.backoff(1, 0.0), Duration::from_secs(4));
//! ```

mod retry;

pub use retry::{RetryPolicy, StageFailure, StageRunner};
