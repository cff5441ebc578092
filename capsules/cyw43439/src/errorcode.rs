// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Error types for the gSPI driver.
//!
//! Hardware interfaces (transfer primitive, pins) report failures with
//! [`ErrorCode`]. The driver wraps those in [`Error`] together with the
//! failures it detects itself, so a caller can always tell a bus fault
//! apart from a chip that never came up.

use core::fmt;

/// Standard errors reported by the hardware interfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 1,
    /// Underlying system is busy; retry
    BUSY = 2,
    /// The component is powered down
    OFF = 4,
    /// An invalid parameter was passed
    INVAL = 6,
    /// Parameter passed was too large
    SIZE = 7,
    /// Operation or command is unsupported
    NOSUPPORT = 10,
    /// Device does not exist
    NODEVICE = 11,
    /// Packet transmission not acknowledged
    NOACK = 13,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::FAIL => "FAIL",
            ErrorCode::BUSY => "BUSY",
            ErrorCode::OFF => "OFF",
            ErrorCode::INVAL => "INVAL",
            ErrorCode::SIZE => "SIZE",
            ErrorCode::NOSUPPORT => "NOSUPPORT",
            ErrorCode::NODEVICE => "NODEVICE",
            ErrorCode::NOACK => "NOACK",
        };
        f.write_str(s)
    }
}

/// Errors returned by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The byte-transfer primitive failed. The code is passed through
    /// untouched.
    Transport(ErrorCode),
    /// The power-on handshake never returned the test pattern before the poll
    /// limit elapsed. `last` is the final value read.
    HandshakeTimeout { last: u32 },
    /// The firmware backing buffer cannot hold the CLM region that follows
    /// the firmware image.
    ClmOutOfBounds { required: usize, available: usize },
    /// A word-oriented buffer whose length is not a multiple of 4.
    Unaligned { len: usize },
    /// A backplane access outside the currently selected window.
    WindowMismatch { address: u32, window: u32 },
    /// No version string was found in the firmware trailer.
    InvalidFirmware,
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Error::Transport(code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(code) => write!(f, "transport error: {}", code),
            Error::HandshakeTimeout { last } => {
                write!(f, "handshake timed out, last read {:#010x}", last)
            }
            Error::ClmOutOfBounds {
                required,
                available,
            } => write!(
                f,
                "firmware buffer too small for CLM: need {} bytes, have {}",
                required, available
            ),
            Error::Unaligned { len } => {
                write!(f, "buffer length {} is not a multiple of 4", len)
            }
            Error::WindowMismatch { address, window } => write!(
                f,
                "backplane address {:#010x} outside window {:#010x}",
                address, window
            ),
            Error::InvalidFirmware => f.write_str("firmware validation failed"),
        }
    }
}
