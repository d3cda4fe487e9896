//! Synthetic frames and messages, logger setup
use log::LevelFilter;
use std::sync::Once;

use crate::bits::BitWriter;

mod nav;
mod rtcm;

pub use nav::*;
pub use rtcm::*;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/*
 * Random access bit buffer (MSB first), used to lay out
 * ICD fields at their absolute positions.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

fn mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

impl BitBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }
    pub fn set(&mut self, offset: usize, width: usize, value: u64) -> &mut Self {
        for i in 0..width {
            self.bits[offset + i] = (value >> (width - 1 - i)) & 0x01 == 1;
        }
        self
    }
    pub fn set_signed(&mut self, offset: usize, width: usize, value: i64) -> &mut Self {
        self.set(offset, width, value as u64 & mask(width))
    }
    pub fn set_sign_magnitude(&mut self, offset: usize, width: usize, value: i64) -> &mut Self {
        let sign = if value < 0 { 1 } else { 0 };
        self.set(offset, 1, sign);
        self.set(offset + 1, width - 1, value.unsigned_abs())
    }
    /// Two's complement (or unsigned) value split in two parts
    pub fn set_split(&mut self, msb: (usize, usize), lsb: (usize, usize), value: i64) -> &mut Self {
        let raw = value as u64 & mask(msb.1 + lsb.1);
        self.set(msb.0, msb.1, raw >> lsb.1);
        self.set(lsb.0, lsb.1, raw & mask(lsb.1))
    }
    pub fn get(&self, offset: usize, width: usize) -> u64 {
        self.bits[offset..offset + width]
            .iter()
            .fold(0, |acc, bit| (acc << 1) | *bit as u64)
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = BitWriter::new();
        for bit in &self.bits {
            w.push(*bit as u64, 1);
        }
        w.into_bytes()
    }
}
