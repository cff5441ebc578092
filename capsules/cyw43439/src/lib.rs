// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! gSPI bus driver for the Infineon CYW43439 WiFi/Bluetooth chip.
//!
//! The CYW43439 (on the Raspberry Pi Pico W among others) is attached over a
//! half-duplex SPI variant, gSPI, with one chip-select, one clock and one
//! shared data line. This crate covers the lowest layer of talking to it:
//!
//! - [`cmd`]: the 32-bit command word heading every transaction.
//! - [`bus`]: chip-select framing and data-line turnaround.
//! - [`registers`]: 8/16/32-bit register access in any function space.
//! - [`backplane`]: the window that maps the 32-bit backplane into 15-bit
//!   command offsets.
//! - [`device`]: power-up, handshake and bus configuration.
//! - [`status`]: decoders for the status and interrupt registers.
//! - [`firmware`]: locating the CLM blob and the firmware version.
//!
//! The board supplies a [`hil::gspi::ByteTransfer`] (a peripheral, or the
//! software [`bitbang::BitBangSpi`]), the pins and a free-running counter.

#![no_std]
#![forbid(unsafe_code)]

pub mod backplane;
pub mod bitbang;
pub mod bus;
pub mod cmd;
pub mod config;
pub mod debug;
pub mod device;
pub mod errorcode;
pub mod firmware;
pub mod hil;
pub mod registers;
pub mod status;

pub use crate::cmd::FunctionSpace;
pub use crate::config::{Config, DEFAULT_CONFIG};
pub use crate::device::{Cyw43439, State};
pub use crate::errorcode::{Error, ErrorCode};
