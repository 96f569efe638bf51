//! Test-data generators.
//!
//! Names, emails and ids embed the current millisecond timestamp so that
//! concurrently running tests do not collide on the shared demo service.
//! Within one process the timestamp is bumped when two callers land on the
//! same millisecond.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{SecondsFormat, Utc};
use rand::Rng;

static LAST_ID: AtomicI64 = AtomicI64::new(0);
static ORDER_TICKETS: AtomicI64 = AtomicI64::new(0);
static ORDER_ID_START: OnceLock<i64> = OnceLock::new();

/// Inclusive range of order ids the demo service accepts.
pub const ORDER_ID_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Current Unix time in milliseconds, strictly increasing per process.
#[must_use]
pub fn unique_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or(now);
    now.max(previous.saturating_add(1))
}

/// `prefix_<millis>`.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", unique_id())
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T10:20:30.123Z`.
#[must_use]
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `prefix_<millis>@example.com`.
#[must_use]
pub fn random_email(prefix: &str) -> String {
    format!("{prefix}_{}@example.com", unique_id())
}

/// Ten-digit phone number taken from the end of the current timestamp.
#[must_use]
pub fn random_phone() -> String {
    let digits = unique_id().to_string();
    let skip = digits.chars().count().saturating_sub(10);
    digits.chars().skip(skip).collect()
}

/// Order id within [`ORDER_ID_RANGE`].
///
/// The first call starts at a random id and later calls walk the range in
/// order, so up to ten orders placed concurrently by one process never share
/// an id.
#[must_use]
pub fn order_id() -> i64 {
    let start = *ORDER_ID_START.get_or_init(|| rand::thread_rng().gen_range(ORDER_ID_RANGE));
    nth_order_id(start, ORDER_TICKETS.fetch_add(1, Ordering::SeqCst))
}

/// The `ticket`-th id after `start`, wrapping within [`ORDER_ID_RANGE`].
const fn nth_order_id(start: i64, ticket: i64) -> i64 {
    let first = *ORDER_ID_RANGE.start();
    let span = *ORDER_ID_RANGE.end() - first + 1;
    first + (start - first + ticket).rem_euclid(span)
}
