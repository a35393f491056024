// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Busy-wait primitives.
//!
//! Every wait on a hardware flag goes through [`poll`]. On target the wait is
//! unbounded: a flag that never changes hangs the hart. With the
//! `bounded-spin` feature a wait gives up after [`SPIN_LIMIT`] polls by
//! panicking.

use ufmt::derive::uDebug;

#[cfg(feature = "bounded-spin")]
pub const SPIN_LIMIT: u32 = 100_000;

/// A bounded wait ran out of polls.
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTimeout {
    pub polls: u32,
}

/// Call `f` until it yields a value.
#[cfg(not(feature = "bounded-spin"))]
#[inline(always)]
pub fn poll<T>(mut f: impl FnMut() -> Option<T>) -> T {
    loop {
        if let Some(val) = f() {
            return val;
        }
        core::hint::spin_loop();
    }
}

/// Call `f` until it yields a value, panicking after [`SPIN_LIMIT`] polls.
#[cfg(feature = "bounded-spin")]
pub fn poll<T>(f: impl FnMut() -> Option<T>) -> T {
    match poll_bounded(SPIN_LIMIT, f) {
        Ok(val) => val,
        Err(timeout) => panic!("spin wait gave up after {} polls", timeout.polls),
    }
}

/// Busy-wait until `ready` returns `true`.
#[inline(always)]
pub fn wait_until(mut ready: impl FnMut() -> bool) {
    poll(|| ready().then_some(()))
}

/// Call `f` at most `max_polls` times until it yields a value.
pub fn poll_bounded<T>(max_polls: u32, mut f: impl FnMut() -> Option<T>) -> Result<T, SpinTimeout> {
    for _ in 0..max_polls {
        if let Some(val) = f() {
            return Ok(val);
        }
        core::hint::spin_loop();
    }
    Err(SpinTimeout { polls: max_polls })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_returns_first_value() {
        let mut calls = 0;
        let val = poll(|| {
            calls += 1;
            (calls == 3).then_some(calls * 10)
        });
        assert_eq!(val, 30);
        assert_eq!(calls, 3);
    }

    #[test]
    fn bounded_poll_gives_up() {
        let mut calls = 0;
        let res: Result<(), _> = poll_bounded(5, || {
            calls += 1;
            None
        });
        assert_eq!(res, Err(SpinTimeout { polls: 5 }));
        assert_eq!(calls, 5);
    }

    #[test]
    fn bounded_poll_succeeds_on_last_poll() {
        let mut calls = 0;
        let res = poll_bounded(4, || {
            calls += 1;
            (calls == 4).then_some(())
        });
        assert_eq!(res, Ok(()));
    }

    #[test]
    fn wait_until_stops_when_ready() {
        let mut flag = 0;
        wait_until(|| {
            flag += 1;
            flag > 7
        });
        assert_eq!(flag, 8);
    }
}
