//! Navigation message builders. Every builder encodes the same
//! reference orbit, so decoded values can be checked by hand.
use super::BitBuffer;
use crate::prelude::{RawFrame, SV};

/// Packs a 300 bit subframe into 10 words, right aligned in 4 bytes.
/// Padding bits are set, the framer must ignore them.
fn words_30(stream: &BitBuffer) -> Vec<u8> {
    (0..10)
        .flat_map(|i| (0xC000_0000 | stream.get(30 * i, 30) as u32).to_be_bytes())
        .collect()
}

/// GPS LNAV subframe `id` (page 18 for subframe 4), IODE = `iode`
pub fn gps_subframe(id: u8, iode: u8) -> BitBuffer {
    let mut sf = BitBuffer::new(300);
    sf.set(0, 8, 0x8B) // preamble
        .set(30, 17, 100_000) // TOW count
        .set(49, 3, id as u64);
    match id {
        1 => {
            sf.set(60, 10, 62) // week
                .set(70, 2, 1) // L2 codes
                .set(72, 4, 1) // URA
                .set(76, 6, 0) // health
                .set_split((82, 2), (210, 8), 0x100 | iode as i64) // IODC
                .set_signed(196, 8, -10) // TGD
                .set(218, 16, 3600) // toc
                .set_signed(240, 8, 0) // af2
                .set_signed(248, 16, -200) // af1
                .set_signed(270, 22, 123_456); // af0
        },
        2 => {
            sf.set(60, 8, iode as u64)
                .set_signed(68, 16, -1000) // crs
                .set_signed(90, 16, 12_000) // Δn
                .set_split((106, 8), (120, 24), -0x123_4567) // m0
                .set_signed(150, 16, -500) // cuc
                .set_split((166, 8), (180, 24), 0x00A0_0000) // e
                .set_signed(210, 16, 700) // cus
                .set_split((226, 8), (240, 24), 2_702_049_280) // √a
                .set(270, 16, 3600) // toe
                .set(286, 1, 0); // fit interval
        },
        3 => {
            sf.set_signed(60, 16, 100) // cic
                .set_split((76, 8), (90, 24), 0x2000_0000) // Ω0
                .set_signed(120, 16, -100) // cis
                .set_split((136, 8), (150, 24), 0x3000_0000) // i0
                .set_signed(180, 16, 8000) // crc
                .set_split((196, 8), (210, 24), -0x4000_0000) // ω
                .set_signed(240, 24, -20_000) // Ω dot
                .set(270, 8, iode as u64)
                .set_signed(278, 14, -300); // idot
        },
        4 => {
            sf.set(60, 2, 1) // data id
                .set(62, 6, 56) // page id
                .set_signed(68, 8, 10)
                .set_signed(76, 8, -3)
                .set_signed(90, 8, 0)
                .set_signed(98, 8, 1)
                .set_signed(106, 8, 5)
                .set_signed(120, 8, -1)
                .set_signed(128, 8, 0)
                .set_signed(136, 8, -2);
        },
        _ => {},
    }
    sf
}

pub fn gps_frame(sv: SV, id: u8, subframe: &BitBuffer) -> RawFrame {
    RawFrame::new(sv, id, &words_30(subframe))
}

/// Complete GPS set, subframes 1 to 4
pub fn gps_frames(sv: SV, iode: u8) -> Vec<RawFrame> {
    (1..=4)
        .map(|id| gps_frame(sv, id, &gps_subframe(id, iode)))
        .collect()
}

/// Galileo I/NAV word `word_type`, IODnav = `iod_nav`
pub fn galileo_word(word_type: u8, iod_nav: u16, svid: u8) -> BitBuffer {
    let mut w = BitBuffer::new(128);
    w.set(0, 6, word_type as u64);
    if (1..=4).contains(&word_type) {
        w.set(6, 10, iod_nav as u64);
    }
    match word_type {
        1 => {
            w.set(16, 14, 960) // toe
                .set_signed(30, 32, -0x123_4567) // m0
                .set(62, 32, 0x00A0_0000) // e
                .set(94, 32, 2_702_049_280); // √a
        },
        2 => {
            w.set_signed(16, 32, 0x2000_0000) // Ω0
                .set_signed(48, 32, 0x3000_0000) // i0
                .set_signed(80, 32, -0x4000_0000) // ω
                .set_signed(112, 14, -300); // idot
        },
        3 => {
            w.set_signed(16, 24, -20_000) // Ω dot
                .set_signed(40, 16, 12_000) // Δn
                .set_signed(56, 16, -500) // cuc
                .set_signed(72, 16, 700) // cus
                .set_signed(88, 16, 8000) // crc
                .set_signed(104, 16, -1000) // crs
                .set(120, 8, 107); // SISA
        },
        4 => {
            w.set(16, 6, svid as u64)
                .set_signed(22, 16, 100) // cic
                .set_signed(38, 16, -100) // cis
                .set(54, 14, 960) // toc
                .set_signed(68, 31, 123_456) // af0
                .set_signed(99, 21, -200) // af1
                .set_signed(120, 6, -1); // af2
        },
        5 => {
            w.set(6, 11, 100) // ai0
                .set_signed(17, 11, -8) // ai1
                .set_signed(28, 14, 16) // ai2
                .set_signed(47, 10, -20) // BGD E1/E5a
                .set_signed(57, 10, 12) // BGD E1/E5b
                .set(73, 12, 1234) // week
                .set(85, 20, 345_600); // tow
        },
        _ => {},
    }
    w
}

/// Wraps 128 bit word into a 30 byte even/odd page pair
pub fn galileo_frame(sv: SV, index: u8, word: &BitBuffer) -> RawFrame {
    let mut page = BitBuffer::new(240);
    page.set(2, 48, word.get(0, 48))
        .set(50, 64, word.get(48, 64))
        .set(114, 1, 1) // odd
        .set(116, 16, word.get(112, 16));
    RawFrame::new(sv, index, &page.to_bytes())
}

/// Complete Galileo set, words 1 to 5
pub fn galileo_frames(sv: SV, iod_nav: u16) -> Vec<RawFrame> {
    (1..=5)
        .map(|wt| galileo_frame(sv, wt, &galileo_word(wt, iod_nav, sv.prn)))
        .collect()
}

/// BeiDou D1 subframe `id`, broadcast at `sow`
pub fn beidou_subframe(id: u8, sow: u32) -> BitBuffer {
    let mut sf = BitBuffer::new(300);
    sf.set(0, 11, 0x712) // preamble
        .set(15, 3, id as u64)
        .set_split((18, 8), (30, 12), sow as i64);
    match id {
        1 => {
            sf.set(42, 1, 0) // SatH1
                .set(43, 5, 12) // AODC
                .set(48, 4, 2) // URAI
                .set(60, 13, 900) // week
                .set_split((73, 9), (90, 8), 7200) // toc
                .set_signed(98, 10, 25) // TGD1
                .set_split((108, 4), (120, 6), -30) // TGD2
                .set_signed(126, 8, 10)
                .set_signed(134, 8, -3)
                .set_signed(150, 8, 0)
                .set_signed(158, 8, 1)
                .set_split((166, 6), (180, 2), 5)
                .set_signed(182, 8, -1)
                .set_signed(190, 8, 0)
                .set_split((198, 4), (210, 4), -2)
                .set_signed(214, 11, -1) // a2
                .set_split((225, 7), (240, 17), 123_456) // a0
                .set_split((257, 5), (270, 17), -200) // a1
                .set(287, 5, 13); // AODE
        },
        2 => {
            sf.set_split((42, 10), (60, 6), 12_000) // Δn
                .set_split((66, 16), (90, 2), -500) // cuc
                .set_split((92, 20), (120, 12), -0x123_4567) // m0
                .set_split((132, 10), (150, 22), 0x00A0_0000) // e
                .set_signed(180, 18, 700) // cus
                .set_split((198, 4), (210, 14), 8000) // crc
                .set_split((224, 8), (240, 10), -1000) // crs
                .set_split((250, 12), (270, 20), 2_702_049_280) // √a
                .set(290, 2, 7200 >> 15); // toe (MSB)
        },
        3 => {
            sf.set_split((42, 10), (60, 5), 7200 & 0x7fff) // toe (LSB)
                .set_split((65, 17), (90, 15), 0x3000_0000) // i0
                .set_split((105, 7), (120, 11), 100) // cic
                .set_split((131, 11), (150, 13), -20_000) // Ω dot
                .set_split((163, 9), (180, 9), -100) // cis
                .set_split((189, 13), (210, 1), -300) // idot
                .set_split((211, 21), (240, 11), 0x2000_0000) // Ω0
                .set_split((251, 11), (270, 21), -0x4000_0000); // ω
        },
        _ => {},
    }
    sf
}

/// Complete BeiDou D1 set, subframes 1 to 3
pub fn beidou_frame(sv: SV, id: u8, subframe: &BitBuffer) -> RawFrame {
    RawFrame::new(sv, id, &words_30(subframe))
}

/// Complete D1 frame, subframe 1 broadcast at SOW 345600
pub fn beidou_frames(sv: SV) -> Vec<RawFrame> {
    (1..=3)
        .map(|id| beidou_frame(sv, id, &beidou_subframe(id, 345_600 + 6 * (id as u32 - 1))))
        .collect()
}

/// Glonass string `n`, day `nt` of four-year interval `n4`
pub fn glonass_string(n: u8, nt: u16, n4: u8) -> BitBuffer {
    let mut s = BitBuffer::new(88);
    s.set(1, 4, n as u64);
    match n {
        1 => {
            s.set(9, 5, 10) // tk: 10h30'30"
                .set(14, 6, 30)
                .set(20, 1, 1)
                .set_sign_magnitude(21, 24, -1000)
                .set_sign_magnitude(45, 5, 2)
                .set_sign_magnitude(50, 27, 10_000_000);
        },
        2 => {
            s.set(5, 3, 0) // Bn
                .set(9, 7, 48) // tb: 12h
                .set_sign_magnitude(21, 24, 2000)
                .set_sign_magnitude(45, 5, -1)
                .set_sign_magnitude(50, 27, -20_000_000);
        },
        3 => {
            s.set_sign_magnitude(6, 11, -3) // γn
                .set(20, 1, 0) // ln
                .set_sign_magnitude(21, 24, 0)
                .set_sign_magnitude(45, 5, 0)
                .set_sign_magnitude(50, 27, 30_000_000);
        },
        4 => {
            s.set_sign_magnitude(5, 22, 1000) // τn
                .set(32, 5, 3) // En
                .set(59, 11, nt as u64);
        },
        5 => {
            s.set(49, 5, n4 as u64);
        },
        _ => {},
    }
    s
}

/// Complete Glonass set, strings 1 to 5
pub fn glonass_frames(sv: SV, nt: u16, n4: u8) -> Vec<RawFrame> {
    (1..=5)
        .map(|n| RawFrame::new(sv, n, &glonass_string(n, nt, n4).to_bytes()))
        .collect()
}
