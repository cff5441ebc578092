// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Views over the gSPI status word and interrupt register.
//!
//! The chip can report a status word after each transaction and latches
//! interrupt causes in the 16-bit bus interrupt register. Both are decoded
//! here without any state; unknown bits simply read as clear.

use core::fmt;

use tock_registers::{register_bitfields, LocalRegisterCopy};

register_bitfields![u32,
    STATUS [
        DATA_UNAVAILABLE OFFSET(0) NUMBITS(1) [],
        UNDERFLOW OFFSET(1) NUMBITS(1) [],
        OVERFLOW OFFSET(2) NUMBITS(1) [],
        F2_INTR OFFSET(3) NUMBITS(1) [],
        F3_INTR OFFSET(4) NUMBITS(1) [],
        F2_RX_READY OFFSET(5) NUMBITS(1) [],
        F3_RX_READY OFFSET(6) NUMBITS(1) [],
        HOST_CMD_DATA_ERR OFFSET(7) NUMBITS(1) [],
        F2_PKT_AVAILABLE OFFSET(8) NUMBITS(1) [],
        F2_PKT_LEN OFFSET(9) NUMBITS(11) [],
        F3_PKT_AVAILABLE OFFSET(20) NUMBITS(1) [],
        F3_PKT_LEN OFFSET(21) NUMBITS(11) [],
    ]
];

register_bitfields![u16,
    INTERRUPT [
        DATA_UNAVAILABLE OFFSET(0) NUMBITS(1) [],
        F2_F3_FIFO_RD_UNDERFLOW OFFSET(1) NUMBITS(1) [],
        F2_F3_FIFO_WR_OVERFLOW OFFSET(2) NUMBITS(1) [],
        COMMAND_ERROR OFFSET(3) NUMBITS(1) [],
        DATA_ERROR OFFSET(4) NUMBITS(1) [],
        F2_PACKET_AVAILABLE OFFSET(5) NUMBITS(1) [],
        F3_PACKET_AVAILABLE OFFSET(6) NUMBITS(1) [],
        F1_OVERFLOW OFFSET(7) NUMBITS(1) [],
        MISC_INTR0 OFFSET(8) NUMBITS(1) [],
        MISC_INTR1 OFFSET(9) NUMBITS(1) [],
        MISC_INTR2 OFFSET(10) NUMBITS(1) [],
        MISC_INTR3 OFFSET(11) NUMBITS(1) [],
        MISC_INTR4 OFFSET(12) NUMBITS(1) [],
        F1_INTR OFFSET(13) NUMBITS(1) [],
        F2_INTR OFFSET(14) NUMBITS(1) [],
        F3_INTR OFFSET(15) NUMBITS(1) [],
    ]
];

/// Status notification returned by the chip after a transaction.
///
/// Reports packet errors, protocol errors and pending packets so the host
/// can avoid reading the interrupt register on every exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Status(u32);

impl Status {
    pub const fn new(word: u32) -> Self {
        Status(word)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    fn reg(&self) -> LocalRegisterCopy<u32, STATUS::Register> {
        LocalRegisterCopy::new(self.0)
    }

    /// Requested read data is unavailable.
    pub fn data_unavailable(&self) -> bool {
        self.reg().is_set(STATUS::DATA_UNAVAILABLE)
    }

    /// FIFO underflow caused by the current F2/F3 read.
    pub fn underflow(&self) -> bool {
        self.reg().is_set(STATUS::UNDERFLOW)
    }

    /// FIFO overflow caused by the current F1/F2/F3 write.
    pub fn overflow(&self) -> bool {
        self.reg().is_set(STATUS::OVERFLOW)
    }

    pub fn f2_interrupt(&self) -> bool {
        self.reg().is_set(STATUS::F2_INTR)
    }

    pub fn f3_interrupt(&self) -> bool {
        self.reg().is_set(STATUS::F3_INTR)
    }

    /// F2 FIFO is empty and ready to receive.
    pub fn f2_rx_ready(&self) -> bool {
        self.reg().is_set(STATUS::F2_RX_READY)
    }

    /// F3 FIFO is empty and ready to receive.
    pub fn f3_rx_ready(&self) -> bool {
        self.reg().is_set(STATUS::F3_RX_READY)
    }

    pub fn host_command_data_error(&self) -> bool {
        self.reg().is_set(STATUS::HOST_CMD_DATA_ERR)
    }

    /// A packet is waiting in the F2 TX FIFO.
    pub fn f2_packet_available(&self) -> bool {
        self.reg().is_set(STATUS::F2_PKT_AVAILABLE)
    }

    pub fn f2_packet_length(&self) -> u16 {
        self.reg().read(STATUS::F2_PKT_LEN) as u16
    }

    /// A packet is waiting in the F3 TX FIFO.
    pub fn f3_packet_available(&self) -> bool {
        self.reg().is_set(STATUS::F3_PKT_AVAILABLE)
    }

    pub fn f3_packet_length(&self) -> u16 {
        self.reg().read(STATUS::F3_PKT_LEN) as u16
    }

    /// Names of the asserted flags, in bit order. Length fields are not
    /// flags and are left out.
    pub fn flags(&self) -> impl Iterator<Item = &'static str> {
        let status = *self;
        [
            (status.data_unavailable(), "dataunavailable"),
            (status.underflow(), "underflow"),
            (status.overflow(), "overflow"),
            (status.f2_interrupt(), "f2intr"),
            (status.f3_interrupt(), "f3intr"),
            (status.f2_rx_ready(), "f2rxready"),
            (status.f3_rx_ready(), "f3rxready"),
            (status.host_command_data_error(), "hostcmderr"),
            (status.f2_packet_available(), "f2pktavail"),
            (status.f3_packet_available(), "f3pktavail"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl From<u32> for Status {
    fn from(word: u32) -> Self {
        Status(word)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("no status");
        }
        let mut sep = write_flags(f, self.flags())?;
        let lengths = [
            ("f2len", self.f2_packet_length()),
            ("f3len", self.f3_packet_length()),
        ];
        for (name, len) in lengths {
            if len != 0 {
                if sep {
                    f.write_str(" ")?;
                }
                write!(f, "{}={}", name, len)?;
                sep = true;
            }
        }
        Ok(())
    }
}

/// Latched interrupt causes from the bus interrupt register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Interrupts(u16);

impl Interrupts {
    pub const fn new(word: u16) -> Self {
        Interrupts(word)
    }

    pub const fn get(&self) -> u16 {
        self.0
    }

    fn reg(&self) -> LocalRegisterCopy<u16, INTERRUPT::Register> {
        LocalRegisterCopy::new(self.0)
    }

    pub fn data_unavailable(&self) -> bool {
        self.reg().is_set(INTERRUPT::DATA_UNAVAILABLE)
    }

    pub fn fifo_read_underflow(&self) -> bool {
        self.reg().is_set(INTERRUPT::F2_F3_FIFO_RD_UNDERFLOW)
    }

    pub fn fifo_write_overflow(&self) -> bool {
        self.reg().is_set(INTERRUPT::F2_F3_FIFO_WR_OVERFLOW)
    }

    pub fn command_error(&self) -> bool {
        self.reg().is_set(INTERRUPT::COMMAND_ERROR)
    }

    pub fn data_error(&self) -> bool {
        self.reg().is_set(INTERRUPT::DATA_ERROR)
    }

    pub fn f2_packet_available(&self) -> bool {
        self.reg().is_set(INTERRUPT::F2_PACKET_AVAILABLE)
    }

    pub fn f3_packet_available(&self) -> bool {
        self.reg().is_set(INTERRUPT::F3_PACKET_AVAILABLE)
    }

    pub fn f1_overflow(&self) -> bool {
        self.reg().is_set(INTERRUPT::F1_OVERFLOW)
    }

    /// Miscellaneous interrupt `n` (0 to 4). Out-of-range indices read as
    /// clear.
    pub fn misc(&self, n: usize) -> bool {
        let reg = self.reg();
        match n {
            0 => reg.is_set(INTERRUPT::MISC_INTR0),
            1 => reg.is_set(INTERRUPT::MISC_INTR1),
            2 => reg.is_set(INTERRUPT::MISC_INTR2),
            3 => reg.is_set(INTERRUPT::MISC_INTR3),
            4 => reg.is_set(INTERRUPT::MISC_INTR4),
            _ => false,
        }
    }

    pub fn f1_interrupt(&self) -> bool {
        self.reg().is_set(INTERRUPT::F1_INTR)
    }

    pub fn f2_interrupt(&self) -> bool {
        self.reg().is_set(INTERRUPT::F2_INTR)
    }

    pub fn f3_interrupt(&self) -> bool {
        self.reg().is_set(INTERRUPT::F3_INTR)
    }

    /// Any FIFO fault: F2/F3 read underflow, F2/F3 write overflow or F1
    /// overflow.
    pub fn bus_fault(&self) -> bool {
        self.fifo_read_underflow() || self.fifo_write_overflow() || self.f1_overflow()
    }

    pub fn flags(&self) -> impl Iterator<Item = &'static str> {
        const NAMES: [&str; 16] = [
            "dataunavailable",
            "rdunderflow",
            "wroverflow",
            "cmderr",
            "dataerr",
            "f2pktavail",
            "f3pktavail",
            "f1overflow",
            "misc0",
            "misc1",
            "misc2",
            "misc3",
            "misc4",
            "f1intr",
            "f2intr",
            "f3intr",
        ];
        let word = self.0;
        NAMES
            .into_iter()
            .enumerate()
            .filter_map(move |(bit, name)| (word & (1 << bit) != 0).then_some(name))
    }
}

impl From<u16> for Interrupts {
    fn from(word: u16) -> Self {
        Interrupts(word)
    }
}

impl fmt::Display for Interrupts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("no interrupts");
        }
        write_flags(f, self.flags()).map(|_| ())
    }
}

/// Space-separated names. Returns whether anything was written.
fn write_flags<'a>(
    f: &mut fmt::Formatter<'_>,
    names: impl Iterator<Item = &'a str>,
) -> Result<bool, fmt::Error> {
    let mut any = false;
    for name in names {
        if any {
            f.write_str(" ")?;
        }
        f.write_str(name)?;
        any = true;
    }
    Ok(any)
}
