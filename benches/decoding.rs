//! Benchmarking of ephemeris assembly, RTCM3 decoding and coordinates conversion
use gnss_decoder::{
    coords::ecef2geodetic,
    prelude::*,
    rtcm::{self, Framer},
};

extern crate criterion;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// GPS subframe, zero content apart from its id
/// (and page 18 marker for subframe 4)
fn gps_subframe(id: u8) -> Vec<u8> {
    let mut stream = BitWriter::new();
    stream.push(0x8B, 8);
    stream.push(0, 41);
    stream.push(id as u64, 3);
    stream.push(0, 10);
    stream.push(if id == 4 { 56 } else { 0 }, 6);
    stream.push(0, 232);
    let stream = stream.into_bytes();

    let mut words = BitWriter::new();
    for i in 0..10 {
        let mut word = 0;
        for bit in 30 * i..30 * (i + 1) {
            word = (word << 1) | ((stream[bit / 8] >> (7 - bit % 8)) & 0x01) as u64;
        }
        words.push(word, 32);
    }
    words.into_bytes()
}

/// Message 1005 (reference station 2003)
const FRAME_1005: [u8; 25] = [
    0xD3, 0x00, 0x13, 0x3E, 0xD7, 0xD3, 0x02, 0x02, 0x98, 0x0E, 0xDE, 0xEF, 0x34, 0xB4, 0xBD,
    0x62, 0xAC, 0x09, 0x41, 0x98, 0x6F, 0x33, 0x36, 0x0B, 0x98,
];

fn orbit_clock_payload(num_sats: u8) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.push(1060, 12);
    w.push(345_600, 20);
    w.push(2, 4);
    w.push(0, 2);
    w.push(3, 4);
    w.push(270, 16);
    w.push(1, 4);
    w.push(num_sats as u64, 6);
    for prn in 1..=num_sats {
        w.push(prn as u64, 6);
        w.push(prn as u64, 8);
        for width in [22, 20, 20, 21, 19, 19, 22, 21, 27] {
            w.push_signed(-(prn as i64) * 100, width);
        }
    }
    w.align();
    w.into_bytes()
}

fn benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ephemeris");

    let subframes = (1..=4).map(gps_subframe).collect::<Vec<_>>();
    let layout = FrameLayout::GPS;

    group.bench_function("gps/split", |b| {
        b.iter(|| {
            let _ = layout.split(black_box(&subframes[1]));
        })
    });

    group.bench_function("gps/assembly", |b| {
        let assembler = EphemerisAssembler::default();
        let sv = SV::new(Constellation::GPS, 1);
        b.iter(|| {
            for (index, data) in subframes.iter().enumerate() {
                let frame = RawFrame::new(sv, index as u8 + 1, data);
                let _ = black_box(assembler.push(frame));
            }
        })
    });

    group.finish();

    let mut group = c.benchmark_group("rtcm");
    let payload = orbit_clock_payload(32);
    let framed = FRAME_1005.repeat(32);

    group.bench_function("1060/decode", |b| {
        b.iter(|| {
            let _ = rtcm::decode(black_box(&payload));
        })
    });

    group.bench_function("framing", |b| {
        b.iter(|| {
            let mut framer = Framer::default();
            framer.push(black_box(&framed));
            let _ = framer.by_ref().count();
        })
    });

    group.bench_function("1060/store", |b| {
        let store = CorrectionStore::default();
        b.iter(|| {
            store.ingest_payload(black_box(&payload));
        })
    });

    group.finish();

    let mut group = c.benchmark_group("coords");
    group.bench_function("ecef2geodetic", |b| {
        b.iter(|| {
            let _ = ecef2geodetic(
                black_box(4_201_575.85),
                black_box(189_856.4),
                black_box(4_779_066.6),
            );
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
