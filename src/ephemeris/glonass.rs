//! Glonass L1OF immediate data (strings 1 to 5).
//!
//! Glonass signed fields are sign-magnitude encoded. String bits are
//! numbered 85 (first transmitted) down to 1, so a field occupying ICD
//! bits `hi..lo` starts at stream offset `85 - hi`.
use log::{debug, warn};
use nalgebra::Vector3;

use crate::{
    bits::Field,
    cfg::Config,
    constants::{
        GLONASS_DAYS_PER_CYCLE, GLONASS_N4_ORIGIN_YEAR, GLONASS_UTC_OFFSET_S, SECONDS_PER_DAY,
    },
    ephemeris::{p2, Assemble, GlonassHealth},
    frame::Framed,
    Error,
};

use gnss::prelude::SV;
use hifitime::{Epoch, TimeScale, Unit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const STRING_NUMBER: Field = Field::unsigned(1, 4);

// Strings #1, #2, #3: one axis each
const VELOCITY: Field = Field::sign_magnitude(21, 24);
const ACCELERATION: Field = Field::sign_magnitude(45, 5);
const POSITION: Field = Field::sign_magnitude(50, 27);

// String #1
const TK_HOURS: Field = Field::unsigned(9, 5);
const TK_MINUTES: Field = Field::unsigned(14, 6);
const TK_HALF_MINUTE: Field = Field::unsigned(20, 1);

// String #2
const BN: Field = Field::unsigned(5, 3);
const TB: Field = Field::unsigned(9, 7);

// String #3
const GAMMA_N: Field = Field::sign_magnitude(6, 11);
const LN3: Field = Field::unsigned(20, 1);

// String #4
const TAU_N: Field = Field::sign_magnitude(5, 22);
const EN: Field = Field::unsigned(32, 5);
const NT: Field = Field::unsigned(59, 11);

// String #5
const N4: Field = Field::unsigned(49, 5);

/// tb unit: 15'
const TB_SCALING_S: u32 = 15 * 60;

/// Glonass ephemeris, described as a state vector
/// in the PZ-90 frame at reference time tb.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlonassEphemeris {
    /// Emitter
    pub sv: SV,
    /// Frequency channel number, when known (RTCM)
    pub freq_channel: Option<i8>,
    /// Frame start time within the day [s]
    pub tk: u32,
    /// Reference time within the day (Moscow time) [s]
    pub tb: u32,
    /// Day within the four-year interval
    pub nt: u16,
    /// Four-year interval number, starting from 1996
    pub n4: u8,
    /// Reference time, in UTC
    pub epoch: Epoch,
    /// Reference time, equivalent GPS week
    pub week: u32,
    /// Reference time, equivalent GPS time of week [s]
    pub tow: f64,
    /// Position [km]
    pub position_km: Vector3<f64>,
    /// Velocity [km/s]
    pub velocity_km_s: Vector3<f64>,
    /// Luni-solar acceleration [km/s²]
    pub acceleration_km_s2: Vector3<f64>,
    /// Clock bias [s] (-τn)
    pub clock_bias: f64,
    /// Relative frequency bias (γn)
    pub clock_drift: f64,
    /// Health indications
    pub health: GlonassHealth,
    /// Age of operational information [days]
    pub age_days: u8,
    /// True when the reference date could not be derived from the
    /// broadcast day number, and the current date was used instead.
    pub date_fallback: bool,
}

impl GlonassEphemeris {
    pub fn is_healthy(&self) -> bool {
        self.health.is_empty()
    }
}

/// Reference [Epoch] (UTC) from the day number within the four-year
/// interval `nt` (1..=1461), the interval number `n4` (1 = 1996)
/// and the Moscow time of day `tb_s`.
/// Returns None when `nt` or `n4` are out of range.
pub fn glonass_reference_epoch(nt: u16, n4: u8, tb_s: u32) -> Option<Epoch> {
    if nt == 0 || nt > GLONASS_DAYS_PER_CYCLE || n4 == 0 {
        return None;
    }
    let mut year = GLONASS_N4_ORIGIN_YEAR + 4 * (n4 as i32 - 1);
    let mut day = nt as u32 - 1;
    loop {
        let year_len = if is_leap_year(year) { 366 } else { 365 };
        if day < year_len {
            break;
        }
        day -= year_len;
        year += 1;
    }
    let (month, mday) = month_day(year, day);
    Some(moscow_day_start(year, month, mday) + tb_s as i64 * Unit::Second)
}

/// Resolves the reference epoch, falling back to the current Moscow
/// date when allowed. Returns the epoch and whether fallback was used.
pub(crate) fn resolve_glonass_reference(
    nt: u16,
    n4: u8,
    tb_s: u32,
    fallback: bool,
) -> Result<(Epoch, bool), Error> {
    if let Some(epoch) = glonass_reference_epoch(nt, n4, tb_s) {
        return Ok((epoch, false));
    }
    if !fallback {
        return Err(Error::DateReconstruction);
    }
    let now = Epoch::now().map_err(|_| Error::DateReconstruction)?;
    let moscow = now + GLONASS_UTC_OFFSET_S * Unit::Second;
    let (year, month, day, _, _, _, _) = moscow.to_gregorian_utc();
    warn!(
        "glonass: invalid day number nt={} n4={}: using current date {}-{:02}-{:02}",
        nt, n4, year, month, day
    );
    Ok((
        moscow_day_start(year, month, day) + tb_s as i64 * Unit::Second,
        true,
    ))
}

/// Moscow midnight of given date, expressed in UTC
fn moscow_day_start(year: i32, month: u8, day: u8) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, month, day) - GLONASS_UTC_OFFSET_S * Unit::Second
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// (month, day of month) of 0 based day of year
fn month_day(year: i32, mut day: u32) -> (u8, u8) {
    let feb = if is_leap_year(year) { 29 } else { 28 };
    let months = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (i, len) in months.iter().enumerate() {
        if day < *len {
            return (i as u8 + 1, day as u8 + 1);
        }
        day -= len;
    }
    (12, 31)
}

/// Equivalent GPS (week, time of week) of given [Epoch]
pub(crate) fn gps_time_of_week(epoch: Epoch) -> (u32, f64) {
    let (week, nanos) = epoch.to_time_scale(TimeScale::GPST).to_time_of_week();
    (week, nanos as f64 * 1.0E-9)
}

impl Assemble for GlonassEphemeris {
    fn accepts(_: SV, index: u8, framed: &Framed) -> Result<bool, Error> {
        let embedded = STRING_NUMBER.raw(framed.stream())? as u8;
        if embedded != index {
            return Err(Error::IndexMismatch {
                declared: index,
                embedded,
            });
        }
        Ok(true)
    }

    fn assemble(sv: SV, blocks: &[&Framed], cfg: &Config) -> Result<Option<Self>, Error> {
        let (s1, s2, s3, s4, s5) = (
            blocks[0].stream(),
            blocks[1].stream(),
            blocks[2].stream(),
            blocks[3].stream(),
            blocks[4].stream(),
        );

        let tk = TK_HOURS.raw(s1)? as u32 * 3600
            + TK_MINUTES.raw(s1)? as u32 * 60
            + TK_HALF_MINUTE.raw(s1)? as u32 * 30;

        let tb = TB.raw(s2)? as u32 * TB_SCALING_S;
        if tb >= SECONDS_PER_DAY {
            debug!("{} - invalid tb={}", sv, tb);
            return Ok(None);
        }

        let nt = NT.raw(s4)? as u16;
        let n4 = N4.raw(s5)? as u8;

        let (epoch, date_fallback) =
            match resolve_glonass_reference(nt, n4, tb, cfg.glonass_date_fallback) {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!("{} - {}", sv, e);
                    return Ok(None);
                },
            };

        let (week, tow) = gps_time_of_week(epoch);

        let mut health = GlonassHealth::empty();
        if BN.raw(s2)? & 0x04 != 0 {
            health |= GlonassHealth::UNHEALTHY;
        }
        if LN3.raw(s3)? == 1 {
            health |= GlonassHealth::NOT_USABLE;
        }

        Ok(Some(Self {
            sv,
            freq_channel: None,
            tk,
            tb,
            nt,
            n4,
            epoch,
            week,
            tow,
            position_km: Vector3::new(
                POSITION.scaled(s1, p2(-11))?,
                POSITION.scaled(s2, p2(-11))?,
                POSITION.scaled(s3, p2(-11))?,
            ),
            velocity_km_s: Vector3::new(
                VELOCITY.scaled(s1, p2(-20))?,
                VELOCITY.scaled(s2, p2(-20))?,
                VELOCITY.scaled(s3, p2(-20))?,
            ),
            acceleration_km_s2: Vector3::new(
                ACCELERATION.scaled(s1, p2(-30))?,
                ACCELERATION.scaled(s2, p2(-30))?,
                ACCELERATION.scaled(s3, p2(-30))?,
            ),
            clock_bias: -TAU_N.scaled(s4, p2(-30))?,
            clock_drift: GAMMA_N.scaled(s3, p2(-40))?,
            health,
            age_days: EN.raw(s4)? as u8,
            date_fallback,
        }))
    }
}
