//! State Space Representation (SSR) messages: code biases
//! and combined orbit and clock corrections.
use std::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    bits::BitReader,
    corrections::{CodeBiasSet, PreciseCorrection},
    rtcm::signal_code,
    Error,
};

use gnss::prelude::{Constellation, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SSR update interval indicator, in seconds
const UPDATE_INTERVALS_S: [u32; 16] = [
    1, 2, 5, 10, 15, 30, 60, 120, 240, 300, 600, 900, 1800, 3600, 7200, 10800,
];

/// Code bias unit: 1 cm
const BIAS_SCALING_M: f64 = 0.01;

/// Orbit and clock scalings, in meters (per second, per second²)
const RADIAL_SCALING: f64 = 0.1E-3;
const ALONG_CROSS_SCALING: f64 = 0.4E-3;
const RADIAL_RATE_SCALING: f64 = 0.001E-3;
const ALONG_CROSS_RATE_SCALING: f64 = 0.004E-3;
const C0_SCALING: f64 = 0.1E-3;
const C1_SCALING: f64 = 0.001E-3;
const C2_SCALING: f64 = 0.00002E-3;

/// Field widths that depend on the constellation
#[derive(Debug, Copy, Clone)]
struct SsrLayout {
    prn: usize,
    iod: usize,
    iod_crc: usize,
    epoch: usize,
}

impl SsrLayout {
    fn new(constellation: Constellation) -> Result<Self, Error> {
        match constellation {
            Constellation::GPS => Ok(Self {
                prn: 6,
                iod: 8,
                iod_crc: 0,
                epoch: 20,
            }),
            Constellation::Glonass => Ok(Self {
                prn: 5,
                iod: 8,
                iod_crc: 0,
                epoch: 17,
            }),
            Constellation::Galileo => Ok(Self {
                prn: 6,
                iod: 10,
                iod_crc: 0,
                epoch: 20,
            }),
            Constellation::BeiDou => Ok(Self {
                prn: 6,
                iod: 10,
                iod_crc: 24,
                epoch: 20,
            }),
            c => Err(Error::NonSupportedConstellation(c)),
        }
    }
}

/// [SsrHeader] is common to all SSR messages
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SsrHeader {
    /// Message number
    pub message: u16,
    /// Constellation this message applies to
    pub constellation: Constellation,
    /// Epoch time: seconds of week, seconds of day for Glonass
    pub epoch_s: u32,
    /// Update interval indicator (0..=15)
    pub update_interval: u8,
    /// More messages follow, for the same epoch
    pub multiple_message: bool,
    /// Orbit messages only. False: ITRF, true: regional datum
    pub satellite_reference_datum: Option<bool>,
    /// Issue of SSR data
    pub iod_ssr: u8,
    /// SSR provider ID
    pub provider_id: u16,
    /// SSR solution ID
    pub solution_id: u8,
    /// Number of satellites described
    pub num_satellites: u8,
}

impl SsrHeader {
    /// Update interval in seconds
    pub fn update_interval_s(&self) -> u32 {
        UPDATE_INTERVALS_S[(self.update_interval & 0x0f) as usize]
    }

    fn decode(
        r: &mut BitReader,
        message: u16,
        constellation: Constellation,
        layout: &SsrLayout,
        with_datum: bool,
    ) -> Result<Self, Error> {
        let epoch_s = r.unsigned(layout.epoch)? as u32;
        let update_interval = r.unsigned(4)? as u8;
        let multiple_message = r.flag()?;
        let satellite_reference_datum = if with_datum {
            Some(r.flag()?)
        } else {
            None
        };
        Ok(Self {
            message,
            constellation,
            epoch_s,
            update_interval,
            multiple_message,
            satellite_reference_datum,
            iod_ssr: r.unsigned(4)? as u8,
            provider_id: r.unsigned(16)? as u16,
            solution_id: r.unsigned(4)? as u8,
            num_satellites: r.unsigned(6)? as u8,
        })
    }
}

/// Decodes a code bias message body. `r` is positioned after the message number.
pub(crate) fn decode_code_bias(
    r: &mut BitReader,
    message: u16,
    constellation: Constellation,
) -> Result<(SsrHeader, Vec<CodeBiasSet>), Error> {
    let layout = SsrLayout::new(constellation)?;
    let header = SsrHeader::decode(r, message, constellation, &layout, false)?;
    let mut sets = Vec::with_capacity(header.num_satellites as usize);

    for _ in 0..header.num_satellites {
        let sv = SV::new(constellation, r.unsigned(layout.prn)? as u8);
        let num_biases = r.unsigned(5)?;
        let mut biases = BTreeMap::new();

        for _ in 0..num_biases {
            let indicator = r.unsigned(5)? as u8;
            let bias = r.signed(14)? as f64 * BIAS_SCALING_M;
            match signal_code(constellation, indicator) {
                Some(code) => {
                    biases.insert(code.to_string(), bias);
                },
                None => {
                    warn!("{} - unsupported signal indicator {}", sv, indicator);
                },
            }
        }

        sets.push(CodeBiasSet {
            sv,
            iod_ssr: header.iod_ssr,
            epoch_s: header.epoch_s,
            update_interval_s: header.update_interval_s(),
            biases,
        });
    }

    debug!(
        "rtcm {}: {} code bias set(s), iod_ssr={}",
        message,
        sets.len(),
        header.iod_ssr
    );
    Ok((header, sets))
}

/// Decodes a combined orbit and clock correction message body.
/// `r` is positioned after the message number.
pub(crate) fn decode_orbit_clock(
    r: &mut BitReader,
    message: u16,
    constellation: Constellation,
) -> Result<(SsrHeader, Vec<PreciseCorrection>), Error> {
    let layout = SsrLayout::new(constellation)?;
    let header = SsrHeader::decode(r, message, constellation, &layout, true)?;
    let mut corrections = Vec::with_capacity(header.num_satellites as usize);

    for _ in 0..header.num_satellites {
        let sv = SV::new(constellation, r.unsigned(layout.prn)? as u8);
        let iode = r.unsigned(layout.iod)? as u16;
        let iod_crc = if layout.iod_crc > 0 {
            Some(r.unsigned(layout.iod_crc)? as u32)
        } else {
            None
        };

        corrections.push(PreciseCorrection {
            sv,
            iode,
            iod_crc,
            iod_ssr: header.iod_ssr,
            epoch_s: header.epoch_s,
            update_interval_s: header.update_interval_s(),
            radial: r.signed(22)? as f64 * RADIAL_SCALING,
            along: r.signed(20)? as f64 * ALONG_CROSS_SCALING,
            cross: r.signed(20)? as f64 * ALONG_CROSS_SCALING,
            radial_rate: r.signed(21)? as f64 * RADIAL_RATE_SCALING,
            along_rate: r.signed(19)? as f64 * ALONG_CROSS_RATE_SCALING,
            cross_rate: r.signed(19)? as f64 * ALONG_CROSS_RATE_SCALING,
            c0: r.signed(22)? as f64 * C0_SCALING,
            c1: r.signed(21)? as f64 * C1_SCALING,
            c2: r.signed(27)? as f64 * C2_SCALING,
        });
    }

    debug!(
        "rtcm {}: {} orbit/clock correction(s), iod_ssr={}",
        message,
        corrections.len(),
        header.iod_ssr
    );
    Ok((header, corrections))
}
