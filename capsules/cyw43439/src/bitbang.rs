// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Software byte transfer over three GPIO pins.
//!
//! SPI mode 0, MSB first: data is set up while the clock is low and sampled
//! on the rising edge. On boards with a shared data line `sdo` and `sdi`
//! are the same pin; the gSPI bus turns its direction around between
//! phases.

use core::cell::Cell;

use crate::errorcode::ErrorCode;
use crate::hil::gpio;
use crate::hil::gspi::ByteTransfer;

pub struct BitBangSpi<'a, O: gpio::Output, I: gpio::Input> {
    clk: &'a O,
    sdo: &'a O,
    sdi: &'a I,
    /// Spin iterations per clock half-period.
    delay: Cell<u32>,
}

impl<'a, O: gpio::Output, I: gpio::Input> BitBangSpi<'a, O, I> {
    pub fn new(clk: &'a O, sdo: &'a O, sdi: &'a I) -> Self {
        clk.clear();
        Self {
            clk,
            sdo,
            sdi,
            delay: Cell::new(0),
        }
    }

    pub fn set_delay(&self, spins: u32) {
        self.delay.set(spins);
    }

    pub fn delay(&self) -> u32 {
        self.delay.get()
    }

    fn half_period(&self) {
        for _ in 0..self.delay.get() {
            core::hint::spin_loop();
        }
    }
}

impl<O: gpio::Output, I: gpio::Input> ByteTransfer for BitBangSpi<'_, O, I> {
    fn transfer_byte(&self, out: u8) -> Result<u8, ErrorCode> {
        let mut rx = 0u8;
        for bit in (0..8).rev() {
            self.clk.clear();
            self.sdo.write(out & (1 << bit) != 0);
            self.half_period();

            self.clk.set();
            rx = (rx << 1) | self.sdi.read() as u8;
            self.half_period();
        }
        self.clk.clear();
        Ok(rx)
    }
}
