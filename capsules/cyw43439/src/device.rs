// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! CYW43439 power sequencing and bus bring-up.
//!
//! After power-enable goes high the chip needs about 50 ms before its gSPI
//! block answers. The host then polls the read-only test register until it
//! returns the fixed pattern, and finally writes the bus control register
//! to wake the chip and switch the bus to 32-bit words.
//!
//! ```text
//! PoweredDown --init--> Resetting --delay--> AwaitingHandshake --poll--> Configured
//!      ^                                                                      |
//!      +-------------------------------reset---------------------------------+
//! ```
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let wifi = Cyw43439::new(spi, &pwr, &cs, &dio, &alarm, &NullSink, DEFAULT_CONFIG);
//! wifi.init()?;
//! let chip_id = wifi.backplane_read32(0x1800_0000)?;
//! ```

use core::cell::Cell;
use core::fmt;

use crate::backplane::BackplaneWindow;
use crate::bus::GSpiBus;
use crate::cmd::FunctionSpace;
use crate::config::Config;
use crate::debug::{DebugSink, Field};
use crate::errorcode::Error;
use crate::hil::gpio::{self, FloatingState};
use crate::hil::gspi::ByteTransfer;
use crate::hil::time::{ConvertTicks, Time};
use crate::registers::{bus_control_word, REG_BUS_CTRL, REG_BUS_TEST_RO, TEST_PATTERN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    PoweredDown,
    Resetting,
    AwaitingHandshake,
    Configured,
}

impl State {
    pub const fn as_str(self) -> &'static str {
        match self {
            State::PoweredDown => "powered-down",
            State::Resetting => "resetting",
            State::AwaitingHandshake => "awaiting-handshake",
            State::Configured => "configured",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Cyw43439<'a, S: ByteTransfer, P: gpio::Pin, A: Time> {
    pub(crate) bus: GSpiBus<'a, S, P, A>,
    pwr: &'a P,
    dio: &'a P,
    alarm: &'a A,
    pub(crate) window: BackplaneWindow,
    state: Cell<State>,
    debug: &'a dyn DebugSink,
    pub(crate) config: Config,
}

impl<'a, S: ByteTransfer, P: gpio::Pin, A: Time> Cyw43439<'a, S, P, A> {
    /// `dio` is the host data-out line. When `config.shared_data_line` is
    /// set it doubles as data-in and the bus turns it around for every
    /// response.
    pub fn new(
        spi: S,
        pwr: &'a P,
        cs: &'a P,
        dio: &'a P,
        alarm: &'a A,
        debug: &'a dyn DebugSink,
        config: Config,
    ) -> Self {
        let shared = if config.shared_data_line {
            Some(dio)
        } else {
            None
        };
        Self {
            bus: GSpiBus::new(spi, cs, shared, alarm, config.response_delay_us),
            pwr,
            dio,
            alarm,
            window: BackplaneWindow::new(),
            state: Cell::new(State::PoweredDown),
            debug,
            config,
        }
    }

    pub fn state(&self) -> State {
        self.state.get()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_response_delay_us(&self, us: u32) {
        self.bus.set_response_delay_us(us);
    }

    pub fn response_delay_us(&self) -> u32 {
        self.bus.response_delay_us()
    }

    /// Power the chip up and bring the gSPI bus into 32-bit mode.
    pub fn init(&self) -> Result<(), Error> {
        self.gpio_setup();
        self.set_state(State::PoweredDown);

        self.pwr.set();
        self.set_state(State::Resetting);
        self.delay_ms(self.config.power_up_delay_ms);

        self.set_state(State::AwaitingHandshake);
        let result = self.handshake().and_then(|()| {
            self.write32(FunctionSpace::Bus, REG_BUS_CTRL, bus_control_word())
        });
        if let Err(err) = result {
            self.trace("init", Field::Error(err));
            return Err(err);
        }

        self.set_state(State::Configured);
        Ok(())
    }

    /// Power-cycle the chip. No bus traffic; `init` must run again before
    /// the bus is usable.
    pub fn reset(&self) {
        self.pwr.clear();
        self.delay_ms(self.config.reset_low_ms);
        self.pwr.set();
        self.delay_ms(self.config.reset_settle_ms);
        self.window.invalidate();
        self.set_state(State::PoweredDown);
    }

    fn gpio_setup(&self) {
        self.pwr.make_output();
        self.pwr.clear();
        // The chip comes back with its window registers reset.
        self.window.invalidate();
        if self.config.shared_data_line {
            self.dio.make_output();
            self.dio.set_floating_state(FloatingState::PullNone);
            self.dio.clear();
        }
        let cs = self.bus.cs();
        cs.make_output();
        cs.set();
    }

    fn handshake(&self) -> Result<(), Error> {
        let limit = self.alarm.ticks_from_ms(self.config.poll_limit_ms);
        let start = self.alarm.now();
        loop {
            let got = self.read32(FunctionSpace::Bus, REG_BUS_TEST_RO)?;
            self.trace("poll", Field::U32(got));
            if got == TEST_PATTERN {
                return Ok(());
            }
            if self.alarm.elapsed_since(start) > limit {
                return Err(Error::HandshakeTimeout { last: got });
            }
        }
    }

    fn delay_ms(&self, ms: u32) {
        self.alarm.busy_wait(self.alarm.ticks_from_ms(ms));
    }

    fn set_state(&self, state: State) {
        self.state.set(state);
        self.trace("state", Field::Text(state.as_str()));
    }

    pub(crate) fn trace(&self, tag: &'static str, field: Field) {
        if self.config.trace {
            self.debug.event(tag, field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names() {
        assert_eq!(State::PoweredDown.as_str(), "powered-down");
        assert_eq!(State::AwaitingHandshake.as_str(), "awaiting-handshake");
    }
}
