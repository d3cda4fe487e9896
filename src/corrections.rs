//! Latest SSR corrections, per satellite.
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use nalgebra::Vector3;

use crate::{
    ephemeris::GlonassEphemeris,
    rtcm::{decode, Message},
};

use gnss::prelude::SV;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [PreciseCorrection] to the broadcast orbit and clock of one satellite.
/// Orbit corrections are expressed in the radial, along-track and
/// cross-track frame, in meters. Clock corrections are in meters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreciseCorrection {
    /// Satellite
    pub sv: SV,
    /// Issue of data of the broadcast ephemeris this applies to
    pub iode: u16,
    /// BeiDou only: CRC of the broadcast ephemeris this applies to
    pub iod_crc: Option<u32>,
    /// Issue of SSR data
    pub iod_ssr: u8,
    /// Seconds of week (seconds of day for Glonass)
    pub epoch_s: u32,
    /// Validity of this correction [s]
    pub update_interval_s: u32,
    pub radial: f64,
    pub along: f64,
    pub cross: f64,
    pub radial_rate: f64,
    pub along_rate: f64,
    pub cross_rate: f64,
    /// Clock correction polynomial [m], [m/s], [m/s²]
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl PreciseCorrection {
    /// (radial, along, cross) orbit correction [m]
    pub fn orbit(&self) -> Vector3<f64> {
        Vector3::new(self.radial, self.along, self.cross)
    }
    /// (radial, along, cross) orbit correction rate [m/s]
    pub fn orbit_rate(&self) -> Vector3<f64> {
        Vector3::new(self.radial_rate, self.along_rate, self.cross_rate)
    }
    /// Orbit correction `dt` seconds after [Self::epoch_s] [m]
    pub fn orbit_at(&self, dt: f64) -> Vector3<f64> {
        self.orbit() + self.orbit_rate() * dt
    }
    /// Clock correction `dt` seconds after [Self::epoch_s] [m]
    pub fn clock_at(&self, dt: f64) -> f64 {
        self.c0 + self.c1 * dt + self.c2 * dt * dt
    }
}

/// [CodeBiasSet] of one satellite: code bias [m] per signal code
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeBiasSet {
    /// Satellite
    pub sv: SV,
    /// Issue of SSR data
    pub iod_ssr: u8,
    /// Seconds of week (seconds of day for Glonass)
    pub epoch_s: u32,
    /// Validity of these biases [s]
    pub update_interval_s: u32,
    /// Bias [m] per signal code ("1C", "2W"..)
    pub biases: BTreeMap<String, f64>,
}

impl CodeBiasSet {
    /// Bias of given signal code [m]
    pub fn bias(&self, code: &str) -> Option<f64> {
        self.biases.get(code).copied()
    }
}

/// [CorrectionStore] keeps the most recent [PreciseCorrection] and
/// [CodeBiasSet] of each satellite. New data always replaces previous
/// data, whatever its issue of data. [CorrectionStore] may be shared
/// between a correction stream reader and the navigation solver.
/// ```
/// use gnss_decoder::prelude::*;
///
/// let store = CorrectionStore::default();
/// let sv = SV::new(Constellation::GPS, 5);
///
/// store.set_correction(PreciseCorrection {
///     sv,
///     iode: 3,
///     ..Default::default()
/// });
/// store.set_correction(PreciseCorrection {
///     sv,
///     iode: 7,
///     ..Default::default()
/// });
///
/// let correction = store.correction_for(sv).unwrap();
/// assert_eq!(correction.iode, 7);
/// ```
#[derive(Debug, Default)]
pub struct CorrectionStore {
    corrections: RwLock<HashMap<SV, PreciseCorrection>>,
    code_biases: RwLock<HashMap<SV, CodeBiasSet>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl CorrectionStore {
    /// Stores [PreciseCorrection], replacing previous one
    pub fn set_correction(&self, correction: PreciseCorrection) {
        write(&self.corrections).insert(correction.sv, correction);
    }
    /// Latest [PreciseCorrection] of this satellite
    pub fn correction_for(&self, sv: SV) -> Option<PreciseCorrection> {
        read(&self.corrections).get(&sv).cloned()
    }
    /// Stores [CodeBiasSet], replacing previous one
    pub fn set_code_bias(&self, biases: CodeBiasSet) {
        write(&self.code_biases).insert(biases.sv, biases);
    }
    /// Latest [CodeBiasSet] of this satellite
    pub fn code_bias_for(&self, sv: SV) -> Option<CodeBiasSet> {
        read(&self.code_biases).get(&sv).cloned()
    }
    /// Snapshot of all [PreciseCorrection]s
    pub fn corrections(&self) -> HashMap<SV, PreciseCorrection> {
        read(&self.corrections).clone()
    }
    /// Snapshot of all [CodeBiasSet]s
    pub fn code_biases(&self) -> HashMap<SV, CodeBiasSet> {
        read(&self.code_biases).clone()
    }
    /// Number of satellites with a [PreciseCorrection]
    pub fn correction_count(&self) -> usize {
        read(&self.corrections).len()
    }
    /// Number of satellites with a [CodeBiasSet]
    pub fn code_bias_count(&self) -> usize {
        read(&self.code_biases).len()
    }
    /// True when neither corrections nor code biases are stored
    pub fn is_empty(&self) -> bool {
        read(&self.corrections).is_empty() && read(&self.code_biases).is_empty()
    }
    /// Stores the content of a decoded [Message]. Glonass ephemeris
    /// are not corrections: they are handed back to the caller.
    pub fn ingest(&self, message: &Message) -> Option<GlonassEphemeris> {
        match message {
            Message::GlonassEphemeris(eph) => Some(eph.clone()),
            Message::CodeBias { biases, .. } => {
                let mut store = write(&self.code_biases);
                for set in biases {
                    store.insert(set.sv, set.clone());
                }
                None
            },
            Message::OrbitClock { corrections, .. } => {
                let mut store = write(&self.corrections);
                for correction in corrections {
                    store.insert(correction.sv, correction.clone());
                }
                None
            },
        }
    }
    /// Decodes RTCM3 payload and stores its content. Undecodable
    /// payloads are dropped, leaving previous state untouched.
    pub fn ingest_payload(&self, payload: &[u8]) -> Option<GlonassEphemeris> {
        match decode(payload) {
            Ok(message) => self.ingest(&message),
            Err(e) => {
                debug!("rtcm: dropping message: {}", e);
                None
            },
        }
    }
    /// Drops all corrections
    pub fn clear(&self) {
        write(&self.corrections).clear();
        write(&self.code_biases).clear();
    }
}
