// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Backplane window bookkeeping.
//!
//! The backplane is a 32-bit address space, but a backplane command only
//! carries a 15-bit offset. The upper bits come from three window-select
//! registers on the chip, which the driver must program before touching a
//! different 32 KiB region. This module remembers what is programmed so
//! only changed bytes are rewritten.

use core::cell::Cell;

/// Offset bits carried by a backplane command.
pub const BACKPLANE_ADDRESS_MASK: u32 = 0x7FFF;
/// Set in the offset of a 4-byte backplane access.
pub const BACKPLANE_ADDRESS_32BIT_FLAG: u32 = 0x8000;

/// Window-select registers, in the backplane function.
pub const REG_BACKPLANE_ADDRESS_LOW: u32 = 0x1000A;
pub const REG_BACKPLANE_ADDRESS_MID: u32 = 0x1000B;
pub const REG_BACKPLANE_ADDRESS_HIGH: u32 = 0x1000C;

/// Value that matches no real window, so every byte is rewritten on the
/// next selection.
const WINDOW_INVALID: u32 = 0xAAAA_AAAA;

/// Window base of a backplane address.
pub const fn window_of(address: u32) -> u32 {
    address & !BACKPLANE_ADDRESS_MASK
}

/// Offset of a backplane address within its window.
pub const fn offset_of(address: u32) -> u32 {
    address & BACKPLANE_ADDRESS_MASK
}

/// The most recent write to the backplane function, kept for replay and
/// post-mortem inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastWrite {
    pub command: u32,
    pub value: u32,
    pub window: u32,
}

/// A single window-select register update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowByte {
    pub register: u32,
    pub value: u8,
}

pub struct BackplaneWindow {
    current: Cell<u32>,
    last_write: Cell<Option<LastWrite>>,
}

impl BackplaneWindow {
    pub const fn new() -> Self {
        Self {
            current: Cell::new(WINDOW_INVALID),
            last_write: Cell::new(None),
        }
    }

    /// The window programmed on the chip, or `None` after a reset.
    pub fn current(&self) -> Option<u32> {
        match self.current.get() {
            WINDOW_INVALID => None,
            window => Some(window),
        }
    }

    /// The raw window register contents as tracked by the host, including
    /// the invalid marker.
    pub(crate) fn selected(&self) -> u32 {
        self.current.get()
    }

    /// Whether `address` resolves inside the programmed window.
    pub fn contains(&self, address: u32) -> bool {
        self.current() == Some(window_of(address))
    }

    /// Forget the programmed window.
    pub fn invalidate(&self) {
        self.current.set(WINDOW_INVALID);
    }

    /// Register writes needed to move the window over `address`, high byte
    /// first. Empty when the window already covers it.
    pub fn changes_for(&self, address: u32) -> impl Iterator<Item = WindowByte> {
        let new = window_of(address);
        let old = self.current.get();
        [
            (24, REG_BACKPLANE_ADDRESS_HIGH),
            (16, REG_BACKPLANE_ADDRESS_MID),
            (8, REG_BACKPLANE_ADDRESS_LOW),
        ]
        .into_iter()
        .filter(move |&(shift, _)| (new >> shift) as u8 != (old >> shift) as u8)
        .map(move |(shift, register)| WindowByte {
            register,
            value: (new >> shift) as u8,
        })
    }

    /// Record that the window covering `address` is now programmed.
    pub fn commit(&self, address: u32) {
        self.current.set(window_of(address));
    }

    pub fn record_write(&self, command: u32, value: u32) {
        self.last_write.set(Some(LastWrite {
            command,
            value,
            window: self.current.get(),
        }));
    }

    pub fn last_write(&self) -> Option<LastWrite> {
        self.last_write.get()
    }
}

impl Default for BackplaneWindow {
    fn default() -> Self {
        Self::new()
    }
}
