//! Bit level extraction and packing.
//!
//! All buffers are read MSB first: bit 0 is the most significant bit
//! of byte 0, which is the transmission order of every navigation message
//! and of RTCM3 payloads.
use crate::Error;

/// How the raw bits of a field are turned into a signed value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignConvention {
    /// Plain unsigned integer
    Unsigned,
    /// Two's complement: the top bit has a negative weight
    TwosComplement,
    /// First bit is the sign, remaining bits are the unsigned magnitude
    /// (GLONASS navigation message and RTCM 1020).
    SignMagnitude,
}

impl SignConvention {
    /// Interprets the `width` low bits of `raw` according to Self.
    pub fn apply(&self, raw: u64, width: usize) -> i64 {
        match self {
            Self::Unsigned => raw as i64,
            Self::TwosComplement => sign_extend(raw, width),
            Self::SignMagnitude => sign_magnitude(raw, width),
        }
    }
}

/// Two's complement interpretation of the `width` low bits of `raw`.
pub fn sign_extend(raw: u64, width: usize) -> i64 {
    if width == 0 || width >= 64 {
        return raw as i64;
    }
    if raw & (1 << (width - 1)) != 0 {
        raw as i64 - (1_i64 << width)
    } else {
        raw as i64
    }
}

/// Sign bit + magnitude interpretation of the `width` low bits of `raw`.
pub fn sign_magnitude(raw: u64, width: usize) -> i64 {
    if width < 2 {
        return 0;
    }
    let magnitude = (raw & ((1_u64 << (width - 1)) - 1)) as i64;
    if (raw >> (width - 1)) & 0x01 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// Extracts the unsigned value of `width` bits starting at bit `offset`.
/// Fields may span any number of bytes, up to 64 bits.
pub fn get_unsigned(buf: &[u8], offset: usize, width: usize) -> Result<u64, Error> {
    if width == 0 || width > 64 {
        return Err(Error::InvalidWidth(width));
    }
    let available = buf.len() * 8;
    if offset + width > available {
        return Err(Error::RangeError {
            offset,
            width,
            available,
        });
    }
    let mut value = 0_u64;
    for bit in offset..offset + width {
        let byte = buf[bit / 8];
        value = (value << 1) | ((byte >> (7 - bit % 8)) & 0x01) as u64;
    }
    Ok(value)
}

/// Extracts the two's complement value of `width` bits starting at bit `offset`.
pub fn get_signed(buf: &[u8], offset: usize, width: usize) -> Result<i64, Error> {
    let raw = get_unsigned(buf, offset, width)?;
    Ok(sign_extend(raw, width))
}

/// Extracts the sign-magnitude value of `width` bits starting at bit `offset`.
pub fn get_sign_magnitude(buf: &[u8], offset: usize, width: usize) -> Result<i64, Error> {
    let raw = get_unsigned(buf, offset, width)?;
    Ok(sign_magnitude(raw, width))
}

/// [Field] describes one ICD field: one or more bit ranges,
/// concatenated MSB first, and the sign convention of the result.
/// Split fields (8 MSB in one word, 24 LSB in the next) are described
/// with two parts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    parts: [(usize, usize); 2],
    nparts: usize,
    /// Sign convention of the concatenated value
    pub sign: SignConvention,
}

impl Field {
    /// Unsigned field
    pub const fn unsigned(offset: usize, width: usize) -> Self {
        Self {
            parts: [(offset, width), (0, 0)],
            nparts: 1,
            sign: SignConvention::Unsigned,
        }
    }
    /// Two's complement field
    pub const fn signed(offset: usize, width: usize) -> Self {
        Self {
            parts: [(offset, width), (0, 0)],
            nparts: 1,
            sign: SignConvention::TwosComplement,
        }
    }
    /// Sign-magnitude field
    pub const fn sign_magnitude(offset: usize, width: usize) -> Self {
        Self {
            parts: [(offset, width), (0, 0)],
            nparts: 1,
            sign: SignConvention::SignMagnitude,
        }
    }
    /// Field made of an MSB part followed by an LSB part
    pub const fn split(msb: (usize, usize), lsb: (usize, usize), sign: SignConvention) -> Self {
        Self {
            parts: [msb, lsb],
            nparts: 2,
            sign,
        }
    }
    /// Total width in bits
    pub fn width(&self) -> usize {
        self.parts[..self.nparts].iter().map(|(_, w)| w).sum()
    }
    /// Raw (unsigned) concatenated value
    pub fn raw(&self, buf: &[u8]) -> Result<u64, Error> {
        let mut value = 0_u64;
        for (offset, width) in &self.parts[..self.nparts] {
            value = (value << width) | get_unsigned(buf, *offset, *width)?;
        }
        Ok(value)
    }
    /// Decoded integer value, sign convention applied
    pub fn value(&self, buf: &[u8]) -> Result<i64, Error> {
        let raw = self.raw(buf)?;
        Ok(self.sign.apply(raw, self.width()))
    }
    /// Decoded value multiplied by `scale`
    pub fn scaled(&self, buf: &[u8], scale: f64) -> Result<f64, Error> {
        Ok(self.value(buf)? as f64 * scale)
    }
}

/// Sequential reader, used where fields follow each other
/// and the layout depends on earlier values (RTCM3).
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Builds a [BitReader] positioned on first bit
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
    /// Current bit position
    pub fn position(&self) -> usize {
        self.pos
    }
    /// Number of bits left
    pub fn remaining(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.pos)
    }
    pub fn skip(&mut self, width: usize) -> Result<(), Error> {
        if width > self.remaining() {
            return Err(Error::RangeError {
                offset: self.pos,
                width,
                available: self.buf.len() * 8,
            });
        }
        self.pos += width;
        Ok(())
    }
    pub fn unsigned(&mut self, width: usize) -> Result<u64, Error> {
        let value = get_unsigned(self.buf, self.pos, width)?;
        self.pos += width;
        Ok(value)
    }
    pub fn signed(&mut self, width: usize) -> Result<i64, Error> {
        let value = get_signed(self.buf, self.pos, width)?;
        self.pos += width;
        Ok(value)
    }
    pub fn sign_magnitude(&mut self, width: usize) -> Result<i64, Error> {
        let value = get_sign_magnitude(self.buf, self.pos, width)?;
        self.pos += width;
        Ok(value)
    }
    pub fn flag(&mut self) -> Result<bool, Error> {
        Ok(self.unsigned(1)? == 1)
    }
}

/// Sequential bit packer. Produces MSB first buffers
/// that [get_unsigned] and [BitReader] read back.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Number of bits written so far
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Appends the `width` low bits of `value`, MSB first.
    /// Bits above 64 are zero padding.
    pub fn push(&mut self, value: u64, width: usize) {
        for i in (0..width).rev() {
            if self.len % 8 == 0 {
                self.buf.push(0);
            }
            if value.checked_shr(i as u32).unwrap_or(0) & 0x01 == 1 {
                let last = self.buf.len() - 1;
                self.buf[last] |= 0x80 >> (self.len % 8);
            }
            self.len += 1;
        }
    }
    /// Appends a two's complement value on `width` bits
    pub fn push_signed(&mut self, value: i64, width: usize) {
        let mask = if width >= 64 {
            u64::MAX
        } else {
            (1_u64 << width) - 1
        };
        self.push(value as u64 & mask, width);
    }
    /// Appends a sign-magnitude value on `width` bits
    pub fn push_sign_magnitude(&mut self, value: i64, width: usize) {
        if width == 0 {
            return;
        }
        let sign = if value < 0 { 1 } else { 0 };
        self.push(sign, 1);
        self.push(value.unsigned_abs(), width - 1);
    }
    /// Pads with zeros up to the next byte boundary
    pub fn align(&mut self) {
        while self.len % 8 != 0 {
            self.push(0, 1);
        }
    }
    /// Returns packed bytes. Trailing bits of the last byte are zero.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
