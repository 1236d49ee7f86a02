//! Time APIs for obtaining the current time, delaying execution, and calculating with points in
//! time and durations.
//!
//! These APIs are made for this stack's protocol timers and are not meant to be general-purpose.
//! They have millisecond resolution, matching the granularity of `ACK_TIMEOUT`, `ACK_DELAY`,
//! `SEGMENT_SPACING` and `RETRY_DELAY`, and use 32-bit arithmetic wherever possible.

use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// A duration with millisecond resolution.
///
/// This can represent a maximum duration of about 49 days. Overflows result in a panic, but
/// shouldn't happen since the protocol never deals with durations anywhere near that large.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(u32);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Duration(0);

    /// Creates a [`Duration`] from a number of milliseconds.
    pub fn from_millis(millis: u32) -> Self {
        Duration(millis)
    }

    /// Creates a [`Duration`] representing a number of seconds.
    pub fn from_secs(secs: u16) -> Self {
        Duration(u32::from(secs) * 1_000)
    }

    /// Returns the number of whole seconds that fit in `self`.
    pub fn whole_secs(&self) -> u32 {
        self.0 / 1_000
    }

    /// Returns the number of milliseconds represented by `self`.
    pub fn as_millis(&self) -> u32 {
        self.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Duration(self.0.checked_add(rhs.0).expect("duration overflow"))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Duration(self.0.checked_sub(rhs.0).expect("duration underflow"))
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1_000 {
            let (secs, millis) = (self.whole_secs(), self.0 % 1_000);
            if millis == 0 {
                write!(f, "{}s", secs)
            } else {
                write!(f, "{}.{:03}s", secs, millis)
            }
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

/// A point in time, relative to an unspecified epoch.
///
/// Has millisecond resolution and may wrap around after ~49 days; apart from the wraparound it is
/// monotonic. `Instant`s are obtained from a [`Clock`] implementation; mixing `Instant`s from
/// different `Clock`s (even of the same type) gives unspecified results. [`Duration`]s are
/// independent of the `Clock` implementation and can be freely mixed.
#[derive(Copy, Clone)]
pub struct Instant(u32);

impl Instant {
    /// Creates an `Instant` from raw milliseconds since an arbitrary implementation-defined
    /// reference point.
    ///
    /// Should only be called from a [`Clock`] implementation.
    pub fn from_raw_millis(millis: u32) -> Self {
        Instant(millis)
    }

    /// Returns the raw value from which this `Instant` was created.
    pub fn raw_millis(&self) -> u32 {
        self.0
    }

    /// Calculates the duration of time that has passed between `earlier` and `self`, assuming no
    /// more than one wraparound has occurred between them.
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration(self.0.wrapping_sub(earlier.0))
    }
}

impl Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.duration_since(rhs)
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, d: Duration) -> Self {
        Instant(self.0.wrapping_add(d.as_millis()))
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, d: Duration) {
        *self = *self + d;
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, d: Duration) -> Self {
        Instant(self.0.wrapping_sub(d.as_millis()))
    }
}

impl SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, d: Duration) {
        *self = *self - d;
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

/// Trait for time providers.
///
/// The platform has to provide an implementation of `Clock` to the stack. Unlike a plain time
/// source, a `Clock` can also block the caller for a given duration, since every protocol delay
/// (`ACK_DELAY`, `SEGMENT_SPACING`, `RETRY_DELAY`) is a blocking wait in this single-threaded
/// design.
///
/// This trait can also be implemented by a mock clock for testing, where `delay_ms` need not
/// actually block.
pub trait Clock {
    /// Obtains the current time as an [`Instant`].
    ///
    /// `Instant`s returned by this function must never move backwards in time, except when the
    /// underlying value wraps around.
    fn now(&self) -> Instant;

    /// Blocks the caller for approximately `ms` milliseconds.
    fn delay_ms(&self, ms: u16);
}
