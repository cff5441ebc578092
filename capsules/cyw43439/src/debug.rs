// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Observability hooks.
//!
//! The driver never prints on its own. It reports events to a
//! [`DebugSink`] supplied by the board, each event being a static tag plus
//! one typed [`Field`]. Boards that want text output wrap any
//! `core::fmt::Write` in a [`WriteSink`].

use core::cell::RefCell;
use core::fmt::{self, Write};

use crate::errorcode::Error;
use crate::status::Status;

/// Value attached to a debug event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    U8(u8),
    U16(u16),
    U32(u32),
    Status(Status),
    Error(Error),
    Text(&'static str),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::U8(v) => write!(f, "{:#x}", v),
            Field::U16(v) => write!(f, "{:#x}", v),
            Field::U32(v) => write!(f, "{:#x}", v),
            Field::Status(status) => write!(f, "{}", status),
            Field::Error(err) => write!(f, "err=\"{}\"", err),
            Field::Text(s) => f.write_str(s),
        }
    }
}

/// Receiver of driver events.
pub trait DebugSink {
    fn event(&self, tag: &'static str, field: Field);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn event(&self, _tag: &'static str, _field: Field) {}
}

/// Formats events as `tag=value` lines into a writer.
pub struct WriteSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> DebugSink for WriteSink<W> {
    fn event(&self, tag: &'static str, field: Field) {
        // Re-entrant events (a writer that itself logs) are dropped.
        if let Ok(mut writer) = self.writer.try_borrow_mut() {
            let _ = write!(writer, "{}={}\r\n", tag, field);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::errorcode::ErrorCode;
    use std::string::String;

    #[test]
    fn write_sink_formats_fields() {
        let sink = WriteSink::new(String::new());
        sink.event("poll", Field::U32(0xadbeedfe));
        sink.event("irq", Field::U16(0x20));
        sink.event("init", Field::Error(Error::Transport(ErrorCode::NOACK)));
        sink.event("status", Field::Status(Status::new(0x1)));
        assert_eq!(
            sink.into_inner(),
            "poll=0xadbeedfe\r\n\
             irq=0x20\r\n\
             init=err=\"transport error: NOACK\"\r\n\
             status=dataunavailable\r\n"
        );
    }
}
