// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! General-purpose pins.

/// Enum for configuring any pull-up or pull-down resistors on the GPIO pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatingState {
    PullUp,
    PullDown,
    PullNone,
}

/// Enum for which state the pin is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Configuration {
    LowPower,
    Input,
    Output,
    InputOutput,
    Unknown,
}

/// The Pin trait allows a pin to be used as either input
/// or output and to be configured.
pub trait Pin: Input + Output + Configure {}

impl<T: Input + Output + Configure> Pin for T {}

pub trait Configure {
    fn configuration(&self) -> Configuration;
    fn make_output(&self) -> Configuration;
    fn make_input(&self) -> Configuration;

    fn set_floating_state(&self, state: FloatingState);
    fn floating_state(&self) -> FloatingState;

    fn is_input(&self) -> bool {
        matches!(
            self.configuration(),
            Configuration::Input | Configuration::InputOutput
        )
    }

    fn is_output(&self) -> bool {
        matches!(
            self.configuration(),
            Configuration::Output | Configuration::InputOutput
        )
    }
}

pub trait Output {
    /// Set the GPIO pin high. If the pin is not an output or
    /// input/output, this call is ignored.
    fn set(&self);

    /// Set the GPIO pin low. If the pin is not an output or
    /// input/output, this call is ignored.
    fn clear(&self);

    /// Toggle the GPIO pin and return its new value.
    fn toggle(&self) -> bool;

    /// Drive the pin to `value`.
    fn write(&self, value: bool) {
        if value {
            self.set();
        } else {
            self.clear();
        }
    }
}

pub trait Input {
    /// Get the current state of an input GPIO pin. For an output
    /// pin, return the output; for an input pin, return the input.
    fn read(&self) -> bool;
}
