//! Message 1020: Glonass ephemeris
use log::debug;
use nalgebra::Vector3;

use crate::{
    bits::BitReader,
    cfg::Config,
    ephemeris::{gps_time_of_week, p2, resolve_glonass_reference, GlonassEphemeris, GlonassHealth},
    Error,
};

use gnss::prelude::{Constellation, SV};

/// Frequency channel number offset
const FREQ_CHANNEL_OFFSET: i8 = 7;

/// Sign-magnitude state vector component, one axis
struct Axis {
    velocity: f64,
    position: f64,
    acceleration: f64,
}

impl Axis {
    fn decode(r: &mut BitReader) -> Result<Self, Error> {
        Ok(Self {
            velocity: r.sign_magnitude(24)? as f64 * p2(-20),
            position: r.sign_magnitude(27)? as f64 * p2(-11),
            acceleration: r.sign_magnitude(5)? as f64 * p2(-30),
        })
    }
}

/// Decodes a 1020 message body. `r` is positioned after the message number.
pub(crate) fn decode_ephemeris(r: &mut BitReader, cfg: &Config) -> Result<GlonassEphemeris, Error> {
    let slot = r.unsigned(6)? as u8;
    let sv = SV::new(Constellation::Glonass, slot);
    let freq_channel = r.unsigned(5)? as i8 - FREQ_CHANNEL_OFFSET;

    r.skip(2)?; // almanac health, health availability
    r.skip(2)?; // P1

    let tk = r.unsigned(5)? as u32 * 3600 + r.unsigned(6)? as u32 * 60 + r.unsigned(1)? as u32 * 30;

    let bn_msb = r.flag()?;
    r.skip(1)?; // P2
    let tb = r.unsigned(7)? as u32 * 900;

    let x = Axis::decode(r)?;
    let y = Axis::decode(r)?;
    let z = Axis::decode(r)?;

    r.skip(1)?; // P3
    let gamma_n = r.sign_magnitude(11)? as f64 * p2(-40);
    r.skip(2)?; // P
    let ln3 = r.flag()?;
    let tau_n = r.sign_magnitude(22)? as f64 * p2(-30);
    r.skip(5)?; // Δτn
    let en = r.unsigned(5)? as u8;
    r.skip(1)?; // P4
    r.skip(4)?; // FT
    let nt = r.unsigned(11)? as u16;
    r.skip(2)?; // M
    let additional_data = r.flag()?;
    r.skip(11)?; // NA
    r.skip(32)?; // τc
    let n4 = r.unsigned(5)? as u8;
    r.skip(22)?; // τGPS
    let ln5 = r.flag()?;
    r.skip(7)?; // reserved

    // N4 is only meaningful with additional data
    let n4 = if additional_data { n4 } else { 0 };

    let (epoch, date_fallback) = resolve_glonass_reference(nt, n4, tb, cfg.glonass_date_fallback)?;
    let (week, tow) = gps_time_of_week(epoch);

    let mut health = GlonassHealth::empty();
    if bn_msb {
        health |= GlonassHealth::UNHEALTHY;
    }
    if ln3 || ln5 {
        health |= GlonassHealth::NOT_USABLE;
    }

    debug!("rtcm 1020: {} (k={}) tb={}", sv, freq_channel, tb);

    Ok(GlonassEphemeris {
        sv,
        freq_channel: Some(freq_channel),
        tk,
        tb,
        nt,
        n4,
        epoch,
        week,
        tow,
        position_km: Vector3::new(x.position, y.position, z.position),
        velocity_km_s: Vector3::new(x.velocity, y.velocity, z.velocity),
        acceleration_km_s2: Vector3::new(x.acceleration, y.acceleration, z.acceleration),
        clock_bias: -tau_n,
        clock_drift: gamma_n,
        health,
        age_days: en,
        date_fallback,
    })
}
