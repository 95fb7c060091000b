//! Fixed-width unsigned fields and the bit-level reader/writer used by the
//! persisted blob.
//!
//! # Truncation Policy
//!
//! A value assigned to an `N`-bit field is stored as `value mod 2^N`. This is
//! the only normalization inbound preferences get; it never fails.

/// An unsigned value occupying exactly `N` bits (`1 <= N <= 8`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bits<const N: u32>(u8);

impl<const N: u32> Bits<N> {
    const VALID: () = assert!(N >= 1 && N <= 8);

    /// Largest value the field can hold.
    pub const MAX: u8 = ((1u16 << N) - 1) as u8;

    /// Store `value mod 2^N`.
    #[inline]
    pub const fn wrapping(value: u32) -> Self {
        let () = Self::VALID;
        Self((value & Self::MAX as u32) as u8)
    }

    #[inline]
    pub const fn get(self) -> u8 { self.0 }

    /// Field width in bits.
    #[inline]
    pub const fn width() -> u32 { N }
}

impl<const N: u32> From<Bits<N>> for u8 {
    fn from(bits: Bits<N>) -> Self { bits.0 }
}

/// Truncate `value` to its low `bits` bits (`bits <= 32`).
#[inline]
pub const fn truncate(
    value: u32,
    bits: u32,
) -> u32 {
    if bits >= 32 {
        value
    } else {
        value & ((1u32 << bits) - 1)
    }
}

// =============================================================================
// Bit Writer / Reader
// =============================================================================

/// Packs values LSB-first into a byte buffer.
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BitWriter<'a> {
    /// Wrap `buf`, which must already be zeroed.
    pub fn new(buf: &'a mut [u8]) -> Self { Self { buf, pos: 0 } }

    /// Append the low `bits` bits of `value`.
    ///
    /// Bits that would land past the end of the buffer are dropped.
    pub fn write(
        &mut self,
        value: u32,
        bits: u32,
    ) {
        let value = truncate(value, bits);
        for i in 0..bits {
            let byte = self.pos / 8;
            if byte >= self.buf.len() {
                return;
            }
            if (value >> i) & 1 == 1 {
                self.buf[byte] |= 1 << (self.pos % 8);
            }
            self.pos += 1;
        }
    }

    pub fn write_bool(
        &mut self,
        value: bool,
    ) {
        self.write(u32::from(value), 1);
    }

    /// Number of bits written so far.
    #[inline]
    pub const fn position(&self) -> usize { self.pos }
}

/// Unpacks values written by [`BitWriter`].
pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self { Self { buf, pos: 0 } }

    /// Read the next `bits` bits. Bits past the end of the buffer read as zero.
    pub fn read(
        &mut self,
        bits: u32,
    ) -> u32 {
        let mut value = 0u32;
        for i in 0..bits {
            let byte = self.pos / 8;
            let bit = self.buf.get(byte).map_or(0, |b| (b >> (self.pos % 8)) & 1);
            value |= u32::from(bit) << i;
            self.pos += 1;
        }
        value
    }

    pub fn read_bool(&mut self) -> bool { self.read(1) == 1 }

    #[inline]
    pub const fn position(&self) -> usize { self.pos }
}

// =============================================================================
// Unit Tests
// =============================================================================
