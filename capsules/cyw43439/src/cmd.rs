// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! gSPI command word.
//!
//! Every transaction starts with one 32-bit command:
//!
//! ```text
//!  31   30   29..28   27 ........ 11   10 ..... 0
//! +----+----+--------+----------------+-----------+
//! | W  | I  |  FUNC  |    ADDRESS     |   SIZE    |
//! +----+----+--------+----------------+-----------+
//! ```
//!
//! `W` selects write (1) or read (0), `I` selects incrementing (1) or fixed
//! (0) addressing. Out-of-range addresses and sizes are masked to their
//! field width rather than rejected.

use core::fmt;

use tock_registers::{register_bitfields, LocalRegisterCopy};

register_bitfields![u32,
    pub(crate) CMD [
        WRITE OFFSET(31) NUMBITS(1) [],
        INCREMENT OFFSET(30) NUMBITS(1) [],
        FUNCTION OFFSET(28) NUMBITS(2) [],
        ADDRESS OFFSET(11) NUMBITS(17) [],
        SIZE OFFSET(0) NUMBITS(11) [],
    ]
];

/// Largest address representable in the command word.
pub const ADDRESS_MASK: u32 = 0x1_FFFF;
/// Largest transfer size representable in the command word.
pub const SIZE_MASK: u32 = 0x7FF;

/// The chip's independent address spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum FunctionSpace {
    /// gSPI bus registers. Always 8-bit addressable.
    Bus = 0b00,
    /// Registers and memories of other blocks on the chip, reached through
    /// the backplane window (64 bytes max per transfer).
    Backplane = 0b01,
    /// DMA channel 1, WLAN packets up to 2048 bytes.
    Wlan = 0b10,
    /// DMA channel 2 (optional), packets up to 2048 bytes.
    Dma2 = 0b11,
}

impl FunctionSpace {
    /// Alias of [`FunctionSpace::Wlan`].
    pub const DMA1: FunctionSpace = FunctionSpace::Wlan;

    pub const fn from_bits(bits: u32) -> FunctionSpace {
        match bits & 0b11 {
            0b00 => FunctionSpace::Bus,
            0b01 => FunctionSpace::Backplane,
            0b10 => FunctionSpace::Wlan,
            _ => FunctionSpace::Dma2,
        }
    }

    /// Extra bytes appended to a read of this function to cover the
    /// one-word response latency of the backplane.
    pub const fn read_padding(self) -> usize {
        match self {
            FunctionSpace::Backplane => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for FunctionSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FunctionSpace::Bus => "bus",
            FunctionSpace::Backplane => "backplane",
            FunctionSpace::Wlan => "wlan",
            FunctionSpace::Dma2 => "dma2",
        })
    }
}

/// Pack a command word.
pub fn encode(write: bool, increment: bool, func: FunctionSpace, address: u32, size: u32) -> u32 {
    let mut reg = LocalRegisterCopy::<u32, CMD::Register>::new(0);
    reg.modify(
        CMD::WRITE.val(write as u32)
            + CMD::INCREMENT.val(increment as u32)
            + CMD::FUNCTION.val(func as u32)
            + CMD::ADDRESS.val(address)
            + CMD::SIZE.val(size),
    );
    reg.get()
}

/// Decoded view of a command word.
#[derive(Clone, Copy)]
pub struct Command(LocalRegisterCopy<u32, CMD::Register>);

impl Command {
    pub fn new(write: bool, increment: bool, func: FunctionSpace, address: u32, size: u32) -> Self {
        Self::from(encode(write, increment, func, address, size))
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    pub fn is_write(&self) -> bool {
        self.0.is_set(CMD::WRITE)
    }

    pub fn increments(&self) -> bool {
        self.0.is_set(CMD::INCREMENT)
    }

    pub fn function(&self) -> FunctionSpace {
        FunctionSpace::from_bits(self.0.read(CMD::FUNCTION))
    }

    pub fn address(&self) -> u32 {
        self.0.read(CMD::ADDRESS)
    }

    pub fn size(&self) -> u32 {
        self.0.read(CMD::SIZE)
    }

    /// The command as sent while the bus is still in 16-bit word mode,
    /// with its two halfwords exchanged.
    pub fn swapped(&self) -> u32 {
        swap16(self.get())
    }
}

impl From<u32> for Command {
    fn from(word: u32) -> Self {
        Command(LocalRegisterCopy::new(word))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("write", &self.is_write())
            .field("increment", &self.increments())
            .field("function", &self.function())
            .field("address", &format_args!("{:#x}", self.address()))
            .field("size", &self.size())
            .finish()
    }
}

/// Exchange the two halfwords of a word.
pub const fn swap16(word: u32) -> u32 {
    word.rotate_left(16)
}
