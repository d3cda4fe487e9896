//! Broadcast ephemeris, assembled from navigation message blocks.
use crate::{cfg::Config, frame::Framed, Error};
use gnss::prelude::{Constellation, SV};
use hifitime::{Epoch, TimeScale, Unit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod assembler;
mod beidou;
mod galileo;
mod glonass;
mod gps;
mod health;

pub use assembler::EphemerisAssembler;
pub use beidou::BeiDouEphemeris;
pub use galileo::GalileoEphemeris;
pub use glonass::{glonass_reference_epoch, GlonassEphemeris};
pub use gps::GPSEphemeris;
pub use health::{GalileoHealth, GlonassHealth};

pub(crate) use glonass::{gps_time_of_week, resolve_glonass_reference};

/// 2^n, used to scale ICD fields
pub(crate) fn p2(n: i32) -> f64 {
    2.0_f64.powi(n)
}

/// Semi-circles to radians
pub(crate) const SC2RAD: f64 = std::f64::consts::PI;

/// Decoding contract, implemented by each constellation.
pub(crate) trait Assemble: Sized {
    /// Returns true if this block should be buffered.
    fn accepts(sv: SV, index: u8, framed: &Framed) -> Result<bool, Error>;
    /// Decodes a complete set of blocks. `blocks[i]` is the block
    /// of the i-th required index. Returns `None` when the blocks
    /// do not describe the same ephemeris.
    fn assemble(sv: SV, blocks: &[&Framed], cfg: &Config) -> Result<Option<Self>, Error>;
}

/// [EphemerisRecord] is a complete and immutable ephemeris.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EphemerisRecord {
    /// GPS LNAV ephemeris
    GPS(GPSEphemeris),
    /// Galileo I/NAV ephemeris
    Galileo(GalileoEphemeris),
    /// BeiDou D1 ephemeris
    BeiDou(BeiDouEphemeris),
    /// Glonass state vector ephemeris
    Glonass(GlonassEphemeris),
}

impl EphemerisRecord {
    /// Emitter
    pub fn sv(&self) -> SV {
        match self {
            Self::GPS(eph) => eph.kepler.sv,
            Self::Galileo(eph) => eph.kepler.sv,
            Self::BeiDou(eph) => eph.kepler.sv,
            Self::Glonass(eph) => eph.sv,
        }
    }
    /// Keplerian elements, unless this is a Glonass record
    pub fn kepler(&self) -> Option<&KeplerEphemeris> {
        match self {
            Self::GPS(eph) => Some(&eph.kepler),
            Self::Galileo(eph) => Some(&eph.kepler),
            Self::BeiDou(eph) => Some(&eph.kepler),
            Self::Glonass(_) => None,
        }
    }
    pub fn as_glonass(&self) -> Option<&GlonassEphemeris> {
        match self {
            Self::Glonass(eph) => Some(eph),
            _ => None,
        }
    }
    /// True if the satellite declares itself healthy
    pub fn is_healthy(&self) -> bool {
        match self {
            Self::Glonass(eph) => eph.is_healthy(),
            _ => self.kepler().map(|k| k.is_healthy()).unwrap_or(false),
        }
    }
}

/// [KeplerEphemeris] gathers the fields shared by GPS,
/// Galileo and BeiDou. Angles are expressed in radians,
/// times in seconds of week, in the constellation timescale.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerEphemeris {
    /// Emitter
    pub sv: SV,
    /// Time of week of transmission [s]
    pub tow: u32,
    /// Week number, rollover resolved
    pub week: u32,
    /// Clock reference time of week [s]
    pub toc: f64,
    /// Clock bias [s]
    pub af0: f64,
    /// Clock drift [s/s]
    pub af1: f64,
    /// Clock drift rate [s/s²]
    pub af2: f64,
    /// Sine correction to orbit radius [m]
    pub crs: f64,
    /// Mean motion difference [rad/s]
    pub delta_n: f64,
    /// Mean anomaly at reference time [rad]
    pub m0: f64,
    /// Cosine correction to argument of latitude [rad]
    pub cuc: f64,
    /// Eccentricity
    pub e: f64,
    /// Sine correction to argument of latitude [rad]
    pub cus: f64,
    /// Square root of semi-major axis [m^1/2]
    pub sqrt_a: f64,
    /// Ephemeris reference time of week [s]
    pub toe: f64,
    /// Cosine correction to inclination [rad]
    pub cic: f64,
    /// Longitude of ascending node at weekly epoch [rad]
    pub omega0: f64,
    /// Sine correction to inclination [rad]
    pub cis: f64,
    /// Inclination at reference time [rad]
    pub i0: f64,
    /// Cosine correction to orbit radius [m]
    pub crc: f64,
    /// Argument of perigee [rad]
    pub omega: f64,
    /// Rate of right ascension [rad/s]
    pub omega_dot: f64,
    /// Rate of inclination [rad/s]
    pub idot: f64,
    /// Ionospheric model coefficients. Klobuchar alpha0..3, beta0..3
    /// for GPS and BeiDou, NeQuick ai0..ai2 for Galileo (remaining are zero).
    pub iono: [f64; 8],
    /// Issue of data, ephemeris (GPS IODE, Galileo IODnav, BeiDou AODE)
    pub iode: u16,
    /// Issue of data, clock (GPS IODC, Galileo IODnav, BeiDou AODC)
    pub iodc: u16,
    /// Raw health flags, zero means healthy
    pub health: u16,
}

impl KeplerEphemeris {
    /// [TimeScale] in which [Self] is expressed
    pub fn timescale(&self) -> Option<TimeScale> {
        match self.sv.constellation {
            Constellation::GPS => Some(TimeScale::GPST),
            Constellation::Galileo => Some(TimeScale::GST),
            Constellation::BeiDou => Some(TimeScale::BDT),
            _ => None,
        }
    }
    fn epoch_of_week(&self, seconds: f64) -> Option<Epoch> {
        let ts = self.timescale()?;
        let t0 = Epoch::from_time_of_week(self.week, 0, ts);
        Some(t0 + seconds * Unit::Second)
    }
    /// Ephemeris reference time, as [Epoch]
    pub fn toe_epoch(&self) -> Option<Epoch> {
        self.epoch_of_week(self.toe)
    }
    /// Clock reference time, as [Epoch]
    pub fn toc_epoch(&self) -> Option<Epoch> {
        self.epoch_of_week(self.toc)
    }
    /// Semi-major axis [m]
    pub fn semi_major_axis(&self) -> f64 {
        self.sqrt_a.powi(2)
    }
    pub fn is_healthy(&self) -> bool {
        self.health == 0
    }
}
