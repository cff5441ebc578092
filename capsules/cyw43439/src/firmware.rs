// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Firmware image helpers.
//!
//! The CLM (country locale matrix) blob is stored right after the firmware
//! image, starting at the next 512-byte boundary. Boards typically embed
//! both in one buffer and hand the driver the firmware length.

use core::ops::Range;

use crate::errorcode::Error;

/// Alignment of the CLM blob behind the firmware image.
pub const CLM_ALIGNMENT: usize = 512;

/// Round `value` up to a multiple of `align`, which must be a power of two.
/// `None` if the result does not fit in a `usize`.
pub const fn align_up(value: usize, align: usize) -> Option<usize> {
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

/// A firmware image inside a larger backing buffer.
#[derive(Clone, Copy, Debug)]
pub struct FirmwareImage<'a> {
    backing: &'a [u8],
    firmware_len: usize,
}

impl<'a> FirmwareImage<'a> {
    /// `firmware_len` is clamped to the backing buffer.
    pub fn new(backing: &'a [u8], firmware_len: usize) -> Self {
        Self {
            backing,
            firmware_len: firmware_len.min(backing.len()),
        }
    }

    pub fn firmware(&self) -> &'a [u8] {
        &self.backing[..self.firmware_len]
    }

    /// Byte range of the CLM blob within the backing buffer.
    pub fn clm_range(&self, clm_len: usize) -> Result<Range<usize>, Error> {
        locate_clm(self.backing.len(), self.firmware_len, clm_len)
    }

    pub fn clm(&self, clm_len: usize) -> Result<&'a [u8], Error> {
        let range = self.clm_range(clm_len)?;
        Ok(&self.backing[range])
    }
}

/// Locate the CLM blob of `clm_len` bytes behind a firmware image of
/// `firmware_len` bytes in a buffer of `capacity` bytes.
///
/// A buffer too small to hold the blob is a board configuration error.
pub fn locate_clm(capacity: usize, firmware_len: usize, clm_len: usize) -> Result<Range<usize>, Error> {
    let too_small = |required| Error::ClmOutOfBounds {
        required,
        available: capacity,
    };
    let offset = align_up(firmware_len, CLM_ALIGNMENT).ok_or_else(|| too_small(usize::MAX))?;
    let end = offset.checked_add(clm_len).ok_or_else(|| too_small(usize::MAX))?;
    if capacity < end {
        return Err(too_small(end));
    }
    Ok(offset..end)
}

/// Number of trailing bytes of the image searched for the trailer.
const TRAILER_WINDOW: usize = 800;
/// Size of the DVID trailer at the very end of the image.
const DVID_TRAILER_LEN: usize = 16;
/// The version string never starts closer than this to the trailer end.
const VERSION_MIN_OFFSET: usize = 80;
const VERSION_TAG: &[u8] = b"Version: ";

/// Check the version trailer of a firmware image and return the version
/// text (without the tag).
pub fn validate_firmware(firmware: &[u8]) -> Result<&[u8], Error> {
    if firmware.len() < TRAILER_WINDOW {
        return Err(Error::InvalidFirmware);
    }
    let tail = &firmware[firmware.len() - TRAILER_WINDOW..];
    let end = TRAILER_WINDOW - DVID_TRAILER_LEN;
    let trailer_len = u16::from_le_bytes([tail[end - 2], tail[end - 1]]) as usize;
    if trailer_len >= 500 || tail[end - 3] != 0 {
        return Err(Error::InvalidFirmware);
    }

    let start = (VERSION_MIN_OFFSET..trailer_len)
        .map(|i| end - 3 - i)
        .find(|&ptr| tail[ptr..].starts_with(VERSION_TAG))
        .ok_or(Error::InvalidFirmware)?;

    let text = &tail[start + VERSION_TAG.len()..end - 3];
    let len = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    Ok(&text[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLM_LEN: usize = 984;

    #[test]
    fn clm_offset_is_aligned() {
        let cases = [(0, 0), (1, 512), (511, 512), (512, 512), (513, 1024), (1024, 1024)];
        for &(len, offset) in cases.iter() {
            let range = locate_clm(offset + CLM_LEN, len, CLM_LEN).unwrap();
            assert_eq!(range, offset..offset + CLM_LEN, "firmware length {}", len);
        }
    }

    #[test]
    fn clm_needs_capacity() {
        assert_eq!(
            locate_clm(1024 + CLM_LEN - 1, 513, CLM_LEN),
            Err(Error::ClmOutOfBounds {
                required: 1024 + CLM_LEN,
                available: 1024 + CLM_LEN - 1,
            })
        );
        assert!(locate_clm(0, 0, 0).is_ok());
        assert!(locate_clm(0, 0, 1).is_err());
    }

    #[test]
    fn clm_offset_overflow_is_an_error() {
        let overflow = Err(Error::ClmOutOfBounds {
            required: usize::MAX,
            available: 1000,
        });
        assert_eq!(locate_clm(1000, usize::MAX - 10, 10), overflow);
        assert_eq!(locate_clm(1000, 512, usize::MAX - 100), overflow);
        assert_eq!(align_up(usize::MAX - 10, CLM_ALIGNMENT), None);
        assert_eq!(align_up(513, CLM_ALIGNMENT), Some(1024));
    }

    #[test]
    fn image_slices_clm() {
        let mut backing = [0u8; 1024 + 16];
        backing[1024..].copy_from_slice(&[0xc1; 16]);
        let image = FirmwareImage::new(&backing, 600);
        assert_eq!(image.firmware().len(), 600);
        assert_eq!(image.clm(16).unwrap(), &[0xc1; 16]);
        assert!(image.clm(17).is_err());
    }

    fn image_with_version(version: &[u8]) -> [u8; 1024] {
        let mut fw = [0u8; 1024];
        let end = fw.len() - DVID_TRAILER_LEN;
        let trailer_len: u16 = 300;
        fw[end - 2..end].copy_from_slice(&trailer_len.to_le_bytes());
        fw[end - 3] = 0;
        // Tag 120 bytes before the trailer end, NUL terminated.
        let start = end - 3 - 120;
        fw[start..start + VERSION_TAG.len()].copy_from_slice(VERSION_TAG);
        let text = start + VERSION_TAG.len();
        fw[text..text + version.len()].copy_from_slice(version);
        fw
    }

    #[test]
    fn finds_version() {
        let fw = image_with_version(b"7.95.49 (2271bb6 CY) FWID 01-c51d9400");
        assert_eq!(
            validate_firmware(&fw).unwrap(),
            b"7.95.49 (2271bb6 CY) FWID 01-c51d9400"
        );
    }

    #[test]
    fn rejects_missing_version() {
        assert_eq!(validate_firmware(&[0u8; 1024]), Err(Error::InvalidFirmware));
        assert_eq!(validate_firmware(&[0u8; 100]), Err(Error::InvalidFirmware));
    }
}
