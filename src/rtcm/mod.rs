//! RTCM3 correction stream decoding.
//!
//! [decode] works on message payloads (transport framing removed,
//! see [frame]). Handled messages are:
//! - 1020: Glonass ephemeris
//! - 1059, 1065, 1242, 1260: SSR code biases (GPS, Glonass, Galileo, BeiDou)
//! - 1060, 1066, 1243, 1261: SSR combined orbit and clock corrections
//!
//! Decoding failures are reported as [Error]: the message should be
//! discarded, previously decoded data remains valid.
use crate::{
    bits::{get_unsigned, BitReader},
    cfg::Config,
    corrections::{CodeBiasSet, PreciseCorrection},
    ephemeris::GlonassEphemeris,
    Error,
};

use gnss::prelude::Constellation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod frame;

mod glonass;
mod signal;
mod ssr;

pub use frame::Framer;
pub use signal::signal_code;
pub use ssr::SsrHeader;

/// Handled message kinds
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Kind {
    GlonassEphemeris,
    CodeBias(Constellation),
    OrbitClock(Constellation),
}

impl Kind {
    fn from_message(message: u16) -> Option<Self> {
        match message {
            1020 => Some(Self::GlonassEphemeris),
            1059 => Some(Self::CodeBias(Constellation::GPS)),
            1065 => Some(Self::CodeBias(Constellation::Glonass)),
            1242 => Some(Self::CodeBias(Constellation::Galileo)),
            1260 => Some(Self::CodeBias(Constellation::BeiDou)),
            1060 => Some(Self::OrbitClock(Constellation::GPS)),
            1066 => Some(Self::OrbitClock(Constellation::Glonass)),
            1243 => Some(Self::OrbitClock(Constellation::Galileo)),
            1261 => Some(Self::OrbitClock(Constellation::BeiDou)),
            _ => None,
        }
    }
}

/// Decoded RTCM3 [Message]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// Message 1020
    GlonassEphemeris(GlonassEphemeris),
    /// SSR code biases, one set per satellite
    CodeBias {
        header: SsrHeader,
        biases: Vec<CodeBiasSet>,
    },
    /// SSR orbit and clock corrections, one per satellite
    OrbitClock {
        header: SsrHeader,
        corrections: Vec<PreciseCorrection>,
    },
}

impl Message {
    /// Message number
    pub fn message_type(&self) -> u16 {
        match self {
            Self::GlonassEphemeris(_) => 1020,
            Self::CodeBias { header, .. } => header.message,
            Self::OrbitClock { header, .. } => header.message,
        }
    }
    /// Constellation this [Message] applies to
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::GlonassEphemeris(_) => Constellation::Glonass,
            Self::CodeBias { header, .. } => header.constellation,
            Self::OrbitClock { header, .. } => header.constellation,
        }
    }
}

/// Message number, from the first 12 bits of the payload
pub fn message_type(payload: &[u8]) -> Result<u16, Error> {
    get_unsigned(payload, 0, 12)
        .map(|msg| msg as u16)
        .map_err(|_| Error::NotEnoughBits)
}

/// True if this message number is handled by [decode]
pub fn is_supported(message: u16) -> bool {
    Kind::from_message(message).is_some()
}

/// Decodes RTCM3 payload, using default [Config].
/// ```
/// use gnss_decoder::prelude::Error;
/// use gnss_decoder::rtcm::decode;
///
/// // 1005: station coordinates, not handled
/// let payload = [0x3E, 0xD7, 0xD3, 0x02];
/// assert_eq!(decode(&payload), Err(Error::UnsupportedMessage(1005)));
///
/// assert_eq!(decode(&[0x3E]), Err(Error::NotEnoughBits));
/// ```
pub fn decode(payload: &[u8]) -> Result<Message, Error> {
    decode_with_config(payload, &Config::default())
}

/// Decodes RTCM3 payload. [Config] drives the Glonass date reconstruction.
pub fn decode_with_config(payload: &[u8], cfg: &Config) -> Result<Message, Error> {
    let message = message_type(payload)?;
    let kind = Kind::from_message(message).ok_or(Error::UnsupportedMessage(message))?;

    let mut r = BitReader::new(payload);
    r.skip(12)?;

    let decoded = match kind {
        Kind::GlonassEphemeris => {
            glonass::decode_ephemeris(&mut r, cfg).map(Message::GlonassEphemeris)
        },
        Kind::CodeBias(constellation) => ssr::decode_code_bias(&mut r, message, constellation)
            .map(|(header, biases)| Message::CodeBias { header, biases }),
        Kind::OrbitClock(constellation) => {
            ssr::decode_orbit_clock(&mut r, message, constellation)
                .map(|(header, corrections)| Message::OrbitClock {
                    header,
                    corrections,
                })
        },
    };

    decoded.map_err(|e| match e {
        Error::RangeError { .. } => Error::NotEnoughBits,
        e => e,
    })
}
