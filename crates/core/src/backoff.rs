// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry backoff schedule for the job store's `schedule_retry` (`spec.md`
//! §4.3, §8 boundary behaviors).

use std::time::Duration;

use rand::Rng;

/// Base delay for the first retry (`n_retries == 0`).
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Ceiling on the exponential backoff before jitter is applied.
pub const MAX_DELAY: Duration = Duration::from_secs(5 * 60);

/// Jobs that have retried this many times transition to `BLOCKED` instead
/// of scheduling another retry.
pub const MAX_RETRIES: u32 = 10;

/// Compute the delay before a job's next retry attempt for the `k`-th
/// retry (`n_retries == k`).
///
/// Per `spec.md` §8: the result lies in `[BASE*2^k, BASE*2^k*1.5]`, clipped
/// to `[BASE, MAX]`. The jitter is drawn relative to the *unclipped*
/// exponential delay so the boundary law holds even once `BASE*2^k`
/// exceeds `MAX`.
///
/// Returns the delay to add to "now", not an absolute timestamp, so callers
/// can combine it with whatever clock they use.
pub fn retry_delay(n_retries: u32, rng: &mut impl Rng) -> Duration {
    let base_delay = BASE_DELAY.saturating_mul(1u32.checked_shl(n_retries).unwrap_or(u32::MAX));
    let jitter_ceiling_ms = (base_delay.as_millis() as u64 / 2).max(1);
    let jitter_ms = rng.gen_range(0..=jitter_ceiling_ms);
    let raw = base_delay + Duration::from_millis(jitter_ms);
    raw.clamp(BASE_DELAY, MAX_DELAY)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
