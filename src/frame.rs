//! Raw navigation blocks and their split into fixed width words.
//!
//! Blocks are delivered by the receiver chipset driver, one per
//! subframe (GPS, BeiDou), word (Galileo I/NAV) or string (Glonass).
//! This module does not interprete the content: it only recovers
//! the transmitted bits, in transmission order.
use crate::{bits::BitWriter, Error};
use gnss::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [RawFrame] as delivered by the chipset driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawFrame {
    /// Emitter
    pub sv: SV,
    /// GPS and BeiDou subframe ID, Galileo I/NAV word type,
    /// Glonass string number.
    pub index: u8,
    /// Raw block
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(sv: SV, index: u8, data: &[u8]) -> Self {
        Self {
            sv,
            index,
            data: data.to_vec(),
        }
    }
}

/// [BitWord] is a fixed width bit string, right aligned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct BitWord {
    value: u128,
    width: u8,
}

impl BitWord {
    pub fn new(value: u128, width: u8) -> Self {
        let mask = if width >= 128 {
            u128::MAX
        } else {
            (1_u128 << width) - 1
        };
        Self {
            value: value & mask,
            width,
        }
    }
    /// Word width in bits
    pub fn width(&self) -> usize {
        self.width as usize
    }
    /// Whole word value
    pub fn value(&self) -> u128 {
        self.value
    }
    /// Returns `width` bits starting at `offset`, 0 being the MSB of the word
    pub fn bits(&self, offset: usize, width: usize) -> Result<u64, Error> {
        if width == 0 || width > 64 {
            return Err(Error::InvalidWidth(width));
        }
        if offset + width > self.width() {
            return Err(Error::RangeError {
                offset,
                width,
                available: self.width(),
            });
        }
        let shift = self.width() - offset - width;
        let mask = (1_u128 << width) - 1;
        Ok(((self.value >> shift) & mask) as u64)
    }
}

/// Block layout, per constellation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameLayout {
    /// GPS LNAV: 10 words of 30 bits, each one right aligned in 4 bytes
    GPS,
    /// Galileo I/NAV: even + odd page parts, 128 bit word
    Galileo,
    /// BeiDou D1: 10 words of 30 bits, each one right aligned in 4 bytes
    BeiDou,
    /// Glonass: 85 bit string
    Glonass,
}

/// Galileo I/NAV data field of the even page part: [start, end[ bit index
const GALILEO_EVEN_DATA: (usize, usize) = (2, 114);

/// Galileo I/NAV data field of the odd page part: [start, end[ bit index
const GALILEO_ODD_DATA: (usize, usize) = (116, 132);

impl FrameLayout {
    /// Identifies the [FrameLayout] of this [Constellation]
    pub fn from_constellation(constellation: Constellation) -> Result<Self, Error> {
        match constellation {
            Constellation::GPS => Ok(Self::GPS),
            Constellation::Galileo => Ok(Self::Galileo),
            Constellation::BeiDou => Ok(Self::BeiDou),
            Constellation::Glonass => Ok(Self::Glonass),
            c => Err(Error::NonSupportedConstellation(c)),
        }
    }
    /// Nominal raw block size in bytes
    pub const fn block_len(&self) -> usize {
        match self {
            Self::GPS | Self::BeiDou => 40,
            Self::Galileo => 30,
            Self::Glonass => 11,
        }
    }
    /// Minimal block size we need to recover all words
    pub const fn min_len(&self) -> usize {
        match self {
            Self::GPS | Self::BeiDou => 40,
            Self::Galileo => (GALILEO_ODD_DATA.1 + 7) / 8,
            Self::Glonass => 11,
        }
    }
    /// Number of words per block
    pub const fn word_count(&self) -> usize {
        match self {
            Self::GPS | Self::BeiDou => 10,
            Self::Galileo | Self::Glonass => 1,
        }
    }
    /// Word width in bits
    pub const fn word_bits(&self) -> usize {
        match self {
            Self::GPS | Self::BeiDou => 30,
            Self::Galileo => 128,
            Self::Glonass => 85,
        }
    }
    /// Block indexes that must all be gathered to form an ephemeris
    pub const fn required_indexes(&self) -> &'static [u8] {
        match self {
            Self::GPS => &[1, 2, 3, 4],
            Self::Galileo => &[1, 2, 3, 4, 5],
            Self::BeiDou => &[1, 2, 3],
            Self::Glonass => &[1, 2, 3, 4, 5],
        }
    }
    /// Splits raw block into [Framed] words
    pub fn split(&self, data: &[u8]) -> Result<Framed, Error> {
        if data.len() < self.min_len() {
            return Err(Error::FrameTooShort {
                expected: self.block_len(),
                got: data.len(),
            });
        }
        let words = match self {
            Self::GPS | Self::BeiDou => data
                .chunks_exact(4)
                .take(self.word_count())
                .map(|chunk| {
                    let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    BitWord::new((word & 0x3fff_ffff) as u128, 30)
                })
                .collect::<Vec<_>>(),
            Self::Galileo => {
                let mut value = 0_u128;
                for (start, end) in [GALILEO_EVEN_DATA, GALILEO_ODD_DATA] {
                    for bit in start..end {
                        let b = (data[bit / 8] >> (7 - bit % 8)) & 0x01;
                        value = (value << 1) | b as u128;
                    }
                }
                vec![BitWord::new(value, 128)]
            },
            Self::Glonass => {
                let mut value = 0_u128;
                for byte in &data[..11] {
                    value = (value << 8) | *byte as u128;
                }
                // B86-B88 are not significant
                vec![BitWord::new(value >> 3, 85)]
            },
        };
        Ok(Framed::new(*self, words))
    }
}

/// [Framed] block: words in transmission order, and the
/// resulting continuous bit stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Framed {
    /// [FrameLayout] used to recover the words
    pub layout: FrameLayout,
    words: Vec<BitWord>,
    stream: Vec<u8>,
}

impl Framed {
    fn new(layout: FrameLayout, words: Vec<BitWord>) -> Self {
        let mut w = BitWriter::new();
        for word in &words {
            let width = word.width();
            if width > 64 {
                w.push((word.value() >> 64) as u64, width - 64);
                w.push(word.value() as u64, 64);
            } else {
                w.push(word.value() as u64, width);
            }
        }
        Self {
            layout,
            words,
            stream: w.into_bytes(),
        }
    }
    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
    /// Returns i-th word (0 based)
    pub fn word(&self, i: usize) -> Option<&BitWord> {
        self.words.get(i)
    }
    /// Iterates all words
    pub fn words(&self) -> impl Iterator<Item = &BitWord> + '_ {
        self.words.iter()
    }
    /// Words concatenated in transmission order, MSB first.
    /// GPS and BeiDou ICD bit k (1 based) is stream bit k-1.
    /// Glonass ICD bit k (85 to 1) is stream bit 85-k.
    pub fn stream(&self) -> &[u8] {
        &self.stream
    }
}
