//! Byte access for patterns.
//!
//! Patterns never own the bytes they describe. Anything that needs the
//! underlying data (value formatting, the value sort column) goes through a
//! [`ByteProvider`], and whatever error the provider reports is handed back to
//! the caller unchanged.

use crate::err::{PatternError, Result};
use crate::pattern::Endian;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Source of the raw bytes a pattern tree was evaluated against.
pub trait ByteProvider {
    /// Read exactly `len` bytes starting at the absolute `offset`.
    fn read_bytes(&self, offset: u64, len: u64) -> Result<Vec<u8>>;

    /// Total size of the data source.
    fn size(&self) -> u64;
}

/// Provider backed by an in-memory byte slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceProvider<'a> {
    data: &'a [u8],
}

impl<'a> SliceProvider<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceProvider { data }
    }
}

impl ByteProvider for SliceProvider<'_> {
    fn read_bytes(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let out_of_bounds = || PatternError::OutOfBounds {
            offset,
            len,
            source_len: self.data.len() as u64,
        };

        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let len_usize = usize::try_from(len).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(len_usize).ok_or_else(out_of_bounds)?;

        self.data
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(out_of_bounds)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Read `size` bytes at `offset` and decode them as an unsigned integer.
///
/// Widths between 1 and 16 bytes are supported.
pub(crate) fn read_unsigned(
    provider: &dyn ByteProvider,
    offset: u64,
    size: u64,
    endian: Endian,
    type_name: &str,
) -> Result<u128> {
    if size == 0 || size > 16 {
        return Err(PatternError::unsupported_width(type_name, size));
    }

    let bytes = read_exact(provider, offset, size)?;
    Ok(decode_unsigned(&bytes, endian))
}

/// Same as [`ByteProvider::read_bytes`], but rejects short reads from
/// providers that do not honor the requested length.
pub(crate) fn read_exact(provider: &dyn ByteProvider, offset: u64, len: u64) -> Result<Vec<u8>> {
    let bytes = provider.read_bytes(offset, len)?;
    if bytes.len() as u64 != len {
        return Err(PatternError::Provider {
            offset,
            len,
            message: format!("short read, got {} bytes", bytes.len()),
        });
    }
    Ok(bytes)
}

/// `bytes` must hold between 1 and 16 bytes.
pub(crate) fn decode_unsigned(bytes: &[u8], endian: Endian) -> u128 {
    match endian {
        Endian::Big => BigEndian::read_uint128(bytes, bytes.len()),
        Endian::Little => LittleEndian::read_uint128(bytes, bytes.len()),
    }
}

/// `bytes` must hold between 1 and 16 bytes. The value is sign-extended.
pub(crate) fn decode_signed(bytes: &[u8], endian: Endian) -> i128 {
    match endian {
        Endian::Big => BigEndian::read_int128(bytes, bytes.len()),
        Endian::Little => LittleEndian::read_int128(bytes, bytes.len()),
    }
}

pub(crate) fn decode_f32(bytes: &[u8], endian: Endian) -> f32 {
    match endian {
        Endian::Big => BigEndian::read_f32(bytes),
        Endian::Little => LittleEndian::read_f32(bytes),
    }
}

pub(crate) fn decode_f64(bytes: &[u8], endian: Endian) -> f64 {
    match endian {
        Endian::Big => BigEndian::read_f64(bytes),
        Endian::Little => LittleEndian::read_f64(bytes),
    }
}
