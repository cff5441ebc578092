// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Register access on top of the gSPI bus.
//!
//! Reads decode the response little-endian; writes serialize the value
//! big-endian and send the bytes holding it. Backplane reads ask for four
//! extra bytes, which the chip fills while it fetches the value, and drop
//! them again.
//!
//! The `*s` variants are for the bus's reset state, where it still works in
//! 16-bit words: command and data are exchanged halfword by halfword, and a
//! full 32-bit word always moves.

use tock_registers::{register_bitfields, LocalRegisterCopy};

use crate::backplane::{offset_of, LastWrite, BACKPLANE_ADDRESS_32BIT_FLAG};
use crate::cmd::{self, swap16, FunctionSpace};
use crate::debug::Field;
use crate::device::Cyw43439;
use crate::errorcode::Error;
use crate::hil::gpio;
use crate::hil::gspi::ByteTransfer;
use crate::hil::time::Time;
use crate::status::{Interrupts, Status};

/// Bus control register.
pub const REG_BUS_CTRL: u32 = 0x0;
/// Latched interrupt causes, 16 bits, write 1 to clear.
pub const REG_BUS_INTERRUPT: u32 = 0x04;
/// Interrupt causes forwarded to the host interrupt line, 16 bits.
pub const REG_BUS_INTERRUPT_ENABLE: u32 = 0x06;
pub const REG_BUS_STATUS: u32 = 0x08;
/// Read-only test register holding [`TEST_PATTERN`].
pub const REG_BUS_TEST_RO: u32 = 0x14;
pub const REG_BUS_TEST_RW: u32 = 0x18;

/// `0xFEEDBEAD` as read back through the little-endian decode.
pub const TEST_PATTERN: u32 = 0xADBE_EDFE;

register_bitfields![u32,
    pub BUS_CTRL [
        WORD_LENGTH_32 OFFSET(31) NUMBITS(1) [],
        BIG_ENDIAN OFFSET(30) NUMBITS(1) [],
        HIGH_SPEED OFFSET(27) NUMBITS(1) [],
        INTERRUPT_POLARITY_HIGH OFFSET(26) NUMBITS(1) [],
        WAKE_UP OFFSET(24) NUMBITS(1) [],
    ]
];

/// Bus control value written during bring-up: wake the chip, 32-bit
/// words, little-endian, normal speed, active-high interrupt.
pub fn bus_control_word() -> u32 {
    let mut reg = LocalRegisterCopy::<u32, BUS_CTRL::Register>::new(0);
    reg.modify(
        BUS_CTRL::WORD_LENGTH_32::SET
            + BUS_CTRL::BIG_ENDIAN::CLEAR
            + BUS_CTRL::HIGH_SPEED::CLEAR
            + BUS_CTRL::INTERRUPT_POLARITY_HIGH::SET
            + BUS_CTRL::WAKE_UP::SET,
    );
    reg.get()
}

/// Widest register plus backplane padding.
const MAX_READ: usize = 8;

impl<S: ByteTransfer, P: gpio::Pin, A: Time> Cyw43439<'_, S, P, A> {
    pub fn read8(&self, func: FunctionSpace, addr: u32) -> Result<u8, Error> {
        let [b] = self.read_bytes::<1>(func, addr)?;
        Ok(b)
    }

    pub fn read16(&self, func: FunctionSpace, addr: u32) -> Result<u16, Error> {
        self.read_bytes(func, addr).map(u16::from_le_bytes)
    }

    pub fn read32(&self, func: FunctionSpace, addr: u32) -> Result<u32, Error> {
        self.read_bytes(func, addr).map(u32::from_le_bytes)
    }

    pub fn write8(&self, func: FunctionSpace, addr: u32, value: u8) -> Result<(), Error> {
        self.write_bytes(func, addr, 1, value as u32)
    }

    pub fn write16(&self, func: FunctionSpace, addr: u32, value: u16) -> Result<(), Error> {
        self.write_bytes(func, addr, 2, value as u32)
    }

    pub fn write32(&self, func: FunctionSpace, addr: u32, value: u32) -> Result<(), Error> {
        self.write_bytes(func, addr, 4, value)
    }

    pub fn read8s(&self, func: FunctionSpace, addr: u32) -> Result<u8, Error> {
        self.read_swapped(func, addr).map(|word| word as u8)
    }

    pub fn read16s(&self, func: FunctionSpace, addr: u32) -> Result<u16, Error> {
        self.read_swapped(func, addr).map(|word| word as u16)
    }

    pub fn read32s(&self, func: FunctionSpace, addr: u32) -> Result<u32, Error> {
        self.read_swapped(func, addr)
    }

    pub fn write8s(&self, func: FunctionSpace, addr: u32, value: u8) -> Result<(), Error> {
        self.write_swapped(func, addr, value as u32)
    }

    pub fn write16s(&self, func: FunctionSpace, addr: u32, value: u16) -> Result<(), Error> {
        self.write_swapped(func, addr, value as u32)
    }

    pub fn write32s(&self, func: FunctionSpace, addr: u32, value: u32) -> Result<(), Error> {
        self.write_swapped(func, addr, value)
    }

    pub fn read_status(&self) -> Result<Status, Error> {
        let status = Status::new(self.read32(FunctionSpace::Bus, REG_BUS_STATUS)?);
        self.trace("status", Field::Status(status));
        Ok(status)
    }

    pub fn read_interrupts(&self) -> Result<Interrupts, Error> {
        let irqs = self.read16(FunctionSpace::Bus, REG_BUS_INTERRUPT)?;
        self.trace("irq", Field::U16(irqs));
        Ok(Interrupts::new(irqs))
    }

    /// Select which interrupt causes raise the host interrupt line.
    pub fn enable_interrupts(&self, mask: Interrupts) -> Result<(), Error> {
        self.write16(FunctionSpace::Bus, REG_BUS_INTERRUPT_ENABLE, mask.get())
    }

    /// Acknowledge the interrupt causes set in `mask`.
    pub fn clear_interrupts(&self, mask: Interrupts) -> Result<(), Error> {
        self.write16(FunctionSpace::Bus, REG_BUS_INTERRUPT, mask.get())
    }

    /// Point the backplane window at the 32 KiB region holding `addr`,
    /// writing only the window-select bytes that change.
    pub fn set_backplane_window(&self, addr: u32) -> Result<(), Error> {
        for change in self.window.changes_for(addr) {
            if let Err(err) = self.write8(FunctionSpace::Backplane, change.register, change.value) {
                // The chip may hold a partial update.
                self.window.invalidate();
                return Err(err);
            }
            self.trace("window", Field::U8(change.value));
        }
        self.window.commit(addr);
        Ok(())
    }

    /// Read a backplane word by its full 32-bit address. The window must
    /// already cover `addr`.
    pub fn backplane_read32(&self, addr: u32) -> Result<u32, Error> {
        self.check_window(addr)?;
        self.read32(
            FunctionSpace::Backplane,
            offset_of(addr) | BACKPLANE_ADDRESS_32BIT_FLAG,
        )
    }

    /// Write a backplane word by its full 32-bit address. The window must
    /// already cover `addr`.
    pub fn backplane_write32(&self, addr: u32, value: u32) -> Result<(), Error> {
        self.check_window(addr)?;
        self.write32(
            FunctionSpace::Backplane,
            offset_of(addr) | BACKPLANE_ADDRESS_32BIT_FLAG,
            value,
        )
    }

    /// The most recent backplane write, with the window it went through.
    pub fn last_backplane_write(&self) -> Option<LastWrite> {
        self.window.last_write()
    }

    pub fn backplane_window(&self) -> Option<u32> {
        self.window.current()
    }

    fn check_window(&self, addr: u32) -> Result<(), Error> {
        if !self.config.check_backplane_window || self.window.contains(addr) {
            return Ok(());
        }
        let err = Error::WindowMismatch {
            address: addr,
            window: self.window.selected(),
        };
        self.trace("window", Field::Error(err));
        Err(err)
    }

    fn read_bytes<const N: usize>(&self, func: FunctionSpace, addr: u32) -> Result<[u8; N], Error> {
        let len = N + func.read_padding();
        let command = cmd::encode(false, true, func, addr, len as u32);
        let mut buf = [0u8; MAX_READ];
        self.bus.read(command, &mut buf[..len])?;
        let mut value = [0u8; N];
        value.copy_from_slice(&buf[..N]);
        Ok(value)
    }

    fn write_bytes(&self, func: FunctionSpace, addr: u32, width: usize, value: u32) -> Result<(), Error> {
        let command = cmd::encode(true, true, func, addr, width as u32);
        if func == FunctionSpace::Backplane {
            self.window.record_write(command, value);
        }
        let bytes = value.to_be_bytes();
        // Narrow writes send the low-order bytes. Unverified on hardware.
        self.bus.write(command, &bytes[4 - width..])
    }

    fn read_swapped(&self, func: FunctionSpace, addr: u32) -> Result<u32, Error> {
        let len = 4 + func.read_padding();
        let command = swap16(cmd::encode(false, true, func, addr, len as u32));
        let mut buf = [0u8; MAX_READ];
        self.bus.read(command, &mut buf[..len])?;
        Ok(swap16(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])))
    }

    fn write_swapped(&self, func: FunctionSpace, addr: u32, value: u32) -> Result<(), Error> {
        let command = cmd::encode(true, true, func, addr, 4);
        if func == FunctionSpace::Backplane {
            self.window.record_write(command, value);
        }
        self.bus.write_words(swap16(command), &[swap16(value)])
    }
}
