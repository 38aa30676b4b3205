// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for the Mnemo extraction pipeline.
//!
//! - [`RetryPolicy`]: attempt budget and fixed backoff
//! - [`retry`]: run an async operation under a policy, retrying only the
//!   errors a caller-supplied predicate classifies as transient

pub mod retry;

pub use retry::{retry, RetryPolicy};
