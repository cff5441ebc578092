// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Byte-level serial transfer used underneath the gSPI protocol.

use crate::errorcode::ErrorCode;

/// A synchronous, full-duplex byte exchange.
///
/// `transfer_byte` must only return once the byte has been clocked out and
/// the answering byte clocked in, and transfers must complete in call
/// order. Chip select is not part of this trait: the driver drives it as
/// a separate pin.
pub trait ByteTransfer {
    fn transfer_byte(&self, out: u8) -> Result<u8, ErrorCode>;
}

impl<T: ByteTransfer + ?Sized> ByteTransfer for &T {
    fn transfer_byte(&self, out: u8) -> Result<u8, ErrorCode> {
        (**self).transfer_byte(out)
    }
}
