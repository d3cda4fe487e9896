//! RTCM3 payload builders
use crate::bits::BitWriter;

/// GPS 1060, one satellite (PRN 5, IODE 69), epoch 345600 s,
/// update interval 5 s, IOD SSR 3, provider 270, solution 1.
/// radial=1000, along=-250, cross=500, rates=2000,-500,250,
/// c0=-12345, c1=100, c2=50 (raw units).
pub const CANNED_1060: [u8; 35] = [
    0x42, 0x45, 0x46, 0x00, 0x20, 0xC0, 0x43, 0x84, 0x11, 0x51, 0x40, 0x03, 0xE8, 0xFF, 0xF0,
    0x60, 0x01, 0xF4, 0x00, 0x3E, 0x87, 0xFE, 0x0C, 0x00, 0x1F, 0x5F, 0xE7, 0xE3, 0x80, 0x01,
    0x90, 0x00, 0x00, 0x19, 0x00,
];

/// CRC-24Q, bit by bit
fn crc24q(bytes: &[u8]) -> u32 {
    let mut crc = 0_u32;
    for byte in bytes {
        crc ^= (*byte as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x100_0000 != 0 {
                crc ^= 0x186_4CFB;
            }
        }
    }
    crc & 0xff_ffff
}

/// Wraps payload (up to 1023 bytes) into a complete transport frame
pub fn rtcm_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xD3, (payload.len() >> 8) as u8 & 0x03, payload.len() as u8];
    frame.extend_from_slice(payload);
    let crc = crc24q(&frame);
    frame.extend_from_slice(&crc.to_be_bytes()[1..]);
    frame
}

/// Raw (unscaled) orbit and clock correction of one satellite
#[derive(Debug, Copy, Clone, Default)]
pub struct SsrSatellite {
    pub prn: u8,
    pub iod: u16,
    pub iod_crc: u32,
    /// radial, along, cross, and their rates
    pub orbit: [i64; 6],
    /// c0, c1, c2
    pub clock: [i64; 3],
}

/// (prn, iod, iod crc, epoch) widths
fn ssr_widths(message: u16) -> (usize, usize, usize, usize) {
    match message {
        1065 | 1066 => (5, 8, 0, 17),
        1242 | 1243 => (6, 10, 0, 20),
        1260 | 1261 => (6, 10, 24, 20),
        _ => (6, 8, 0, 20),
    }
}

fn ssr_header(w: &mut BitWriter, message: u16, epoch: u32, nsat: usize, datum: bool) {
    let (_, _, _, epoch_bits) = ssr_widths(message);
    w.push(message as u64, 12);
    w.push(epoch as u64, epoch_bits);
    w.push(2, 4); // 5 s
    w.push(0, 1); // multiple message
    if datum {
        w.push(0, 1);
    }
    w.push(3, 4); // IOD SSR
    w.push(270, 16); // provider
    w.push(1, 4); // solution
    w.push(nsat as u64, 6);
}

pub fn ssr_orbit_clock(message: u16, epoch: u32, sats: &[SsrSatellite]) -> Vec<u8> {
    let (prn_bits, iod_bits, crc_bits, _) = ssr_widths(message);
    let mut w = BitWriter::new();
    ssr_header(&mut w, message, epoch, sats.len(), true);
    for sat in sats {
        w.push(sat.prn as u64, prn_bits);
        w.push(sat.iod as u64, iod_bits);
        if crc_bits > 0 {
            w.push(sat.iod_crc as u64, crc_bits);
        }
        for (value, width) in sat.orbit.iter().zip([22, 20, 20, 21, 19, 19]) {
            w.push_signed(*value, width);
        }
        for (value, width) in sat.clock.iter().zip([22, 21, 27]) {
            w.push_signed(*value, width);
        }
    }
    w.align();
    w.into_bytes()
}

/// Code biases: (prn, [(signal indicator, raw bias)]) per satellite
pub fn ssr_code_bias(message: u16, epoch: u32, sats: &[(u8, Vec<(u8, i64)>)]) -> Vec<u8> {
    let (prn_bits, _, _, _) = ssr_widths(message);
    let mut w = BitWriter::new();
    ssr_header(&mut w, message, epoch, sats.len(), false);
    for (prn, biases) in sats {
        w.push(*prn as u64, prn_bits);
        w.push(biases.len() as u64, 5);
        for (indicator, bias) in biases {
            w.push(*indicator as u64, 5);
            w.push_signed(*bias, 14);
        }
    }
    w.align();
    w.into_bytes()
}

/// 1020 carrying the same state vector as [super::glonass_string].
/// N4 is only transmitted when `n4` is provided.
pub fn glonass_1020(slot: u8, freq_channel: i8, nt: u16, n4: Option<u8>) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.push(1020, 12);
    w.push(slot as u64, 6);
    w.push((freq_channel + 7) as u64, 5);
    w.push(0, 1); // almanac health
    w.push(1, 1); // health availability
    w.push(0, 2); // P1
    w.push(10, 5); // tk
    w.push(30, 6);
    w.push(1, 1);
    w.push(0, 1); // Bn
    w.push(0, 1); // P2
    w.push(48, 7); // tb
    for (velocity, position, acceleration) in [
        (-1000, 10_000_000, 2),
        (2000, -20_000_000, -1),
        (0, 30_000_000, 0),
    ] {
        w.push_sign_magnitude(velocity, 24);
        w.push_sign_magnitude(position, 27);
        w.push_sign_magnitude(acceleration, 5);
    }
    w.push(0, 1); // P3
    w.push_sign_magnitude(-3, 11); // γn
    w.push(0, 2); // P
    w.push(0, 1); // ln
    w.push_sign_magnitude(1000, 22); // τn
    w.push_sign_magnitude(0, 5); // Δτn
    w.push(3, 5); // En
    w.push(0, 1); // P4
    w.push(0, 4); // FT
    w.push(nt as u64, 11);
    w.push(1, 2); // M
    w.push(n4.is_some() as u64, 1);
    w.push(0, 11); // NA
    w.push_sign_magnitude(0, 32); // τc
    w.push(n4.unwrap_or(0) as u64, 5);
    w.push_sign_magnitude(0, 22); // τGPS
    w.push(0, 1); // ln
    w.push(0, 7);
    w.into_bytes()
}
