//! GNSS navigation message and RTCM3 correction stream decoding,
//! with WGS84 geodesy.
//!
//! - [frame] splits raw navigation blocks (GPS, Galileo, BeiDou, Glonass)
//! into words
//! - [ephemeris] assembles words into complete ephemeris records
//! - [rtcm] decodes RTCM3 Glonass ephemeris and SSR messages
//! - [corrections] keeps the latest corrections per satellite
//! - [coords] converts between ECEF and geodetic coordinates
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

use thiserror::Error;

pub mod bits;
pub mod coords;
pub mod corrections;
pub mod ephemeris;
pub mod frame;
pub mod rtcm;

mod cfg;
mod constants;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::bits::{BitReader, BitWriter, Field, SignConvention};
    pub use crate::cfg::Config;
    pub use crate::coords::{Geodetic, Position};
    pub use crate::corrections::{CodeBiasSet, CorrectionStore, PreciseCorrection};
    pub use crate::ephemeris::{
        BeiDouEphemeris, EphemerisAssembler, EphemerisRecord, GPSEphemeris, GalileoEphemeris,
        GlonassEphemeris, KeplerEphemeris,
    };
    pub use crate::frame::{BitWord, FrameLayout, Framed, RawFrame};
    pub use crate::rtcm::{Message as RtcmMessage, SsrHeader};
    pub use crate::Error;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{Matrix3, Vector3};
}

use gnss::prelude::Constellation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("bit range {offset}+{width} exceeds {available} available bits")]
    RangeError {
        offset: usize,
        width: usize,
        available: usize,
    },
    #[error("invalid field width: {0} bits")]
    InvalidWidth(usize),
    #[error("frame too short: {got} bytes, expecting {expected}")]
    FrameTooShort { expected: usize, got: usize },
    #[error("non supported constellation: {0}")]
    NonSupportedConstellation(Constellation),
    #[error("invalid subframe/word index #{0}")]
    InvalidIndex(u8),
    #[error("declared word type #{declared} does not match embedded #{embedded}")]
    IndexMismatch { declared: u8, embedded: u8 },
    #[error("not enough bits to decode message")]
    NotEnoughBits,
    #[error("non supported rtcm message #{0}")]
    UnsupportedMessage(u16),
    #[error("glonass reference date can't be determined")]
    DateReconstruction,
}
