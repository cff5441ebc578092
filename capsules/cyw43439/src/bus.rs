// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! gSPI transaction framing.
//!
//! A transaction is a command word (sent as four little-endian bytes)
//! followed either by a payload or, for reads, by the chip's response. The
//! bus drives chip-select itself and, when host-out and host-in share one
//! data line, switches that pin between output and input (with pull-down)
//! around the response phase.
//!
//! ```text
//!  write:  CS\_ [cmd0 cmd1 cmd2 cmd3 | payload ...] _/CS
//!  read:   CS\_ [cmd0 cmd1 cmd2 cmd3] _/CS   CS\_ [delay | response ...] _/CS
//! ```

use core::cell::Cell;

use crate::errorcode::Error;
use crate::hil::gpio::{self, FloatingState};
use crate::hil::gspi::ByteTransfer;
use crate::hil::time::{ConvertTicks, Time};

/// Holds chip-select asserted (low) until dropped, so every exit path of a
/// transaction releases the bus.
struct ChipSelect<'a, P: gpio::Output> {
    pin: &'a P,
}

impl<'a, P: gpio::Output> ChipSelect<'a, P> {
    fn assert(pin: &'a P) -> Self {
        pin.clear();
        ChipSelect { pin }
    }
}

impl<P: gpio::Output> Drop for ChipSelect<'_, P> {
    fn drop(&mut self) {
        self.pin.set();
    }
}

pub struct GSpiBus<'a, S: ByteTransfer, P: gpio::Pin, A: Time> {
    spi: S,
    cs: &'a P,
    /// The shared data line, if host-out and host-in are one pin.
    data: Option<&'a P>,
    alarm: &'a A,
    response_delay_us: Cell<u32>,
}

impl<'a, S: ByteTransfer, P: gpio::Pin, A: Time> GSpiBus<'a, S, P, A> {
    pub fn new(spi: S, cs: &'a P, data: Option<&'a P>, alarm: &'a A, response_delay_us: u32) -> Self {
        Self {
            spi,
            cs,
            data,
            alarm,
            response_delay_us: Cell::new(response_delay_us),
        }
    }

    pub fn set_response_delay_us(&self, us: u32) {
        self.response_delay_us.set(us);
    }

    pub fn response_delay_us(&self) -> u32 {
        self.response_delay_us.get()
    }

    pub(crate) fn cs(&self) -> &'a P {
        self.cs
    }

    /// Send `command` followed by `payload`.
    pub fn write(&self, command: u32, payload: &[u8]) -> Result<(), Error> {
        self.data_output();
        let _cs = ChipSelect::assert(self.cs);
        self.send(&command.to_le_bytes())?;
        self.send(payload)
    }

    /// Send `command` followed by `words`, each as four little-endian bytes.
    pub fn write_words(&self, command: u32, words: &[u32]) -> Result<(), Error> {
        self.write_word_iter(command, words.iter().copied())
    }

    /// Send `command` followed by a byte buffer reinterpreted as
    /// little-endian words. The buffer must hold a whole number of words.
    pub fn write_buffer(&self, command: u32, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() % 4 != 0 {
            return Err(Error::Unaligned { len: bytes.len() });
        }
        let words = bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        self.write_word_iter(command, words)
    }

    fn write_word_iter(&self, command: u32, words: impl Iterator<Item = u32>) -> Result<(), Error> {
        self.data_output();
        let _cs = ChipSelect::assert(self.cs);
        self.send(&command.to_le_bytes())?;
        for word in words {
            self.send(&word.to_le_bytes())?;
        }
        Ok(())
    }

    /// Send `command`, then clock `out.len()` response bytes in a second
    /// chip-select window.
    pub fn read(&self, command: u32, out: &mut [u8]) -> Result<(), Error> {
        self.data_output();
        {
            let _cs = ChipSelect::assert(self.cs);
            self.send(&command.to_le_bytes())?;
        }
        self.data_input();
        let _cs = ChipSelect::assert(self.cs);
        self.response_delay()?;
        self.receive(out)
    }

    /// Like [`GSpiBus::read`], but command and response share one
    /// chip-select window.
    pub fn write_read(&self, command: u32, out: &mut [u8]) -> Result<(), Error> {
        self.data_output();
        let _cs = ChipSelect::assert(self.cs);
        self.send(&command.to_le_bytes())?;
        self.data_input();
        self.response_delay()?;
        self.receive(out)
    }

    fn send(&self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            self.spi.transfer_byte(byte)?;
        }
        Ok(())
    }

    fn receive(&self, out: &mut [u8]) -> Result<(), Error> {
        for byte in out.iter_mut() {
            *byte = self.spi.transfer_byte(0)?;
        }
        Ok(())
    }

    /// Clock out zeros until the response delay has elapsed.
    fn response_delay(&self) -> Result<(), Error> {
        let us = self.response_delay_us.get();
        if us == 0 {
            return Ok(());
        }
        let ticks = self.alarm.ticks_from_us(us);
        let start = self.alarm.now();
        while self.alarm.elapsed_since(start) < ticks {
            self.spi.transfer_byte(0)?;
        }
        Ok(())
    }

    fn data_output(&self) {
        if let Some(data) = self.data {
            data.make_output();
        }
    }

    fn data_input(&self) {
        if let Some(data) = self.data {
            data.make_input();
            data.set_floating_state(FloatingState::PullDown);
        }
    }
}
