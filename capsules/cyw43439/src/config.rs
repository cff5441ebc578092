// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Driver configuration.
//!
//! Boards pick their values by starting from [`DEFAULT_CONFIG`] and
//! overriding fields in a `const`, so all timing is fixed at compile time
//! and every code path stays type-checked regardless of the values chosen.

/// Data structure holding the driver's configuration options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether host-out and host-in share one physical data line.
    ///
    /// On the Pico W the data line is shared, so the driver flips the pin
    /// to an input with pull-down for every response phase and back to an
    /// output for every command phase.
    pub shared_data_line: bool,

    /// Delay between the command phase and the response phase of a read,
    /// during which zero bytes are clocked out. Zero disables the delay.
    pub response_delay_us: u32,

    /// Time the chip needs after power-enable before the bus answers. The
    /// datasheet asks for 50 ms; the extra margin covers VDDC and POR
    /// startup.
    pub power_up_delay_ms: u32,

    /// How long bring-up keeps polling the test register before giving up.
    pub poll_limit_ms: u32,

    /// Power-enable low time during a recovery reset.
    pub reset_low_ms: u32,

    /// Settling time after power-enable goes high again during a reset.
    pub reset_settle_ms: u32,

    /// Reject full-address backplane accesses outside the selected window
    /// instead of letting them alias into it.
    pub check_backplane_window: bool,

    /// Send handshake, state and window events to the debug sink.
    pub trace: bool,
}

pub const DEFAULT_CONFIG: Config = Config {
    shared_data_line: true,
    response_delay_us: 0,
    power_up_delay_ms: 60,
    poll_limit_ms: 100,
    reset_low_ms: 20,
    reset_settle_ms: 250,
    check_backplane_window: cfg!(debug_assertions),
    trace: false,
};

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
