//! Priority tokens
//!
//! An [`ExpirationTime`] is an opaque, totally ordered priority: a lower
//! value is more urgent. [`ExpirationTime::NO_WORK`] means "nothing
//! pending" and sorts after every real priority, so folding priorities
//! together is always `min`.
//!
//! Clock-derived times are expressed in 10 ms units offset past
//! [`ExpirationTime::SYNC`], and async work is bucketed so that updates
//! scheduled close together share a deadline and are batched.

use std::fmt;

/// Duration of one expiration unit in milliseconds.
pub const UNIT_SIZE_MS: u64 = 10;

/// Offset keeping clock times strictly less urgent than `SYNC`.
const MAGIC_NUMBER_OFFSET: u32 = 2;

/// Deadline for low-priority async work.
pub const LOW_PRIORITY_EXPIRATION_MS: u64 = 5000;
/// Bucket width for low-priority async work.
pub const LOW_PRIORITY_BATCH_SIZE_MS: u64 = 250;
/// Deadline for interactive work.
pub const HIGH_PRIORITY_EXPIRATION_MS: u64 = 150;
/// Bucket width for interactive work.
pub const HIGH_PRIORITY_BATCH_SIZE_MS: u64 = 100;

/// Priority deadline of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpirationTime(u32);

impl ExpirationTime {
    /// Most urgent: must finish in the current call.
    pub const SYNC: Self = Self(1);
    /// Least urgent real priority (offscreen work).
    pub const NEVER: Self = Self(u32::MAX - 1);
    /// Sentinel: nothing pending.
    pub const NO_WORK: Self = Self(u32::MAX);

    /// Create from a raw value, clamped into `SYNC..=NEVER`.
    #[inline]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::SYNC.0, Self::NEVER.0))
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether this is the "nothing pending" sentinel.
    #[inline]
    pub fn is_no_work(&self) -> bool {
        *self == Self::NO_WORK
    }

    /// Whether this is strictly more urgent than `other`.
    #[inline]
    pub fn is_more_urgent_than(
        &self,
        other: ExpirationTime,
    ) -> bool {
        self.0 < other.0
    }

    /// Whether work at this priority is included in a pass rendering at
    /// `render`. Nothing qualifies for a `NO_WORK` render.
    #[inline]
    pub fn qualifies_for(
        &self,
        render: ExpirationTime,
    ) -> bool {
        !render.is_no_work() && !self.is_no_work() && self.0 <= render.0
    }

    /// The more urgent of two priorities (`NO_WORK` is the identity).
    #[inline]
    pub fn most_urgent(
        self,
        other: ExpirationTime,
    ) -> ExpirationTime {
        self.min(other)
    }

    /// Convert a clock reading in milliseconds.
    pub fn from_ms(ms: u64) -> Self {
        let units = (ms / UNIT_SIZE_MS).min(u64::from(u32::MAX));
        Self::new((units as u32).saturating_add(MAGIC_NUMBER_OFFSET))
    }

    /// Convert back to milliseconds.
    pub fn to_ms(&self) -> u64 {
        u64::from(self.0.saturating_sub(MAGIC_NUMBER_OFFSET)) * UNIT_SIZE_MS
    }

    /// Round `current + expiration_ms` up to the next bucket boundary.
    pub fn compute_bucket(
        current: ExpirationTime,
        expiration_ms: u64,
        bucket_size_ms: u64,
    ) -> Self {
        let precision = (bucket_size_ms / UNIT_SIZE_MS).max(1);
        let base = u64::from(current.0.saturating_sub(MAGIC_NUMBER_OFFSET))
            + expiration_ms / UNIT_SIZE_MS;
        let ceiling = (base / precision + 1) * precision;
        let value = ceiling.saturating_add(u64::from(MAGIC_NUMBER_OFFSET));
        Self::new(value.min(u64::from(u32::MAX)) as u32)
    }

    /// Deadline for low-priority async work scheduled at `current`.
    pub fn compute_async(current: ExpirationTime) -> Self {
        Self::compute_bucket(current, LOW_PRIORITY_EXPIRATION_MS, LOW_PRIORITY_BATCH_SIZE_MS)
    }

    /// Deadline for interactive work scheduled at `current`.
    pub fn compute_interactive(current: ExpirationTime) -> Self {
        Self::compute_bucket(current, HIGH_PRIORITY_EXPIRATION_MS, HIGH_PRIORITY_BATCH_SIZE_MS)
    }
}

impl Default for ExpirationTime {
    fn default() -> Self {
        Self::NO_WORK
    }
}

impl fmt::Display for ExpirationTime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::NO_WORK => write!(f, "NoWork"),
            Self::SYNC => write!(f, "Sync"),
            Self::NEVER => write!(f, "Never"),
            Self(v) => write!(f, "Expiration({})", v),
        }
    }
}
