// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Hardware agnostic interfaces for counter-like resources.

/// A free-running counter.
pub trait Time {
    type Frequency: Frequency;

    /// Returns the current time in hardware clock units. The counter wraps
    /// at `u32::MAX`.
    fn now(&self) -> u32;
}

/// Trait to represent clock frequency in Hz
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// 1MHz `Frequency`
#[derive(Debug)]
pub struct Freq1MHz;
impl Frequency for Freq1MHz {
    fn frequency() -> u32 {
        1_000_000
    }
}

/// 32KHz `Frequency`
#[derive(Debug)]
pub struct Freq32KHz;
impl Frequency for Freq32KHz {
    fn frequency() -> u32 {
        32768
    }
}

/// Conversions between real time and ticks of a [`Time`] source, rounding
/// up so a wait is never shorter than asked for.
pub trait ConvertTicks: Time {
    fn ticks_from_ms(&self, ms: u32) -> u32 {
        scale(ms, Self::Frequency::frequency(), 1000)
    }

    fn ticks_from_us(&self, us: u32) -> u32 {
        scale(us, Self::Frequency::frequency(), 1_000_000)
    }

    /// Ticks elapsed since `start`, accounting for counter wrap-around.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }

    /// Spin until `ticks` have elapsed.
    fn busy_wait(&self, ticks: u32) {
        let start = self.now();
        while self.elapsed_since(start) < ticks {
            core::hint::spin_loop();
        }
    }
}

impl<T: Time + ?Sized> ConvertTicks for T {}

fn scale(value: u32, freq: u32, unit: u64) -> u32 {
    let ticks = (value as u64 * freq as u64).div_ceil(unit);
    ticks.min(u32::MAX as u64) as u32
}
