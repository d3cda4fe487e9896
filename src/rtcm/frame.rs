//! RTCM3 transport layer.
//!
//! A frame is: preamble (0xD3), 6 reserved bits, 10 bit payload length,
//! payload, then a 24 bit CRC-24Q. Frame synchronization and CRC
//! verification are delegated to [rtcm_rs]; payloads are then
//! handed to [super::decode].
use log::debug;

use rtcm_rs::{next_msg_frame, MsgFrameIter};

/// Frame preamble
pub const PREAMBLE: u8 = 0xD3;

/// Preamble + reserved bits + length
pub const HEADER_SIZE: usize = 3;

/// CRC-24Q
pub const CRC_SIZE: usize = 3;

/// Largest payload the 10 bit length can describe
pub const MAX_PAYLOAD_SIZE: usize = 1023;

/// Strips header and CRC of a verified frame
fn payload(frame: &[u8]) -> Vec<u8> {
    frame[HEADER_SIZE..frame.len() - CRC_SIZE].to_vec()
}

/// Searches `buf` for the next valid frame. Returns the number of bytes
/// that can be dropped (garbage, corrupt frames, and the frame itself)
/// and the payload of the frame that was found, if any.
/// When an incomplete frame is pending at the end of `buf`, its bytes
/// are not counted as consumed.
pub fn decode(buf: &[u8]) -> (usize, Option<Vec<u8>>) {
    let (consumed, frame) = next_msg_frame(buf);
    (consumed, frame.map(|frame| payload(frame.frame_data())))
}

/// Payloads of all complete frames contained in `buf`
pub fn payloads(buf: &[u8]) -> Vec<Vec<u8>> {
    MsgFrameIter::new(buf)
        .map(|frame| payload(frame.frame_data()))
        .collect()
}

/// [Framer] recovers payloads from a byte stream, delivered in
/// chunks of any size. Garbage and corrupt frames are dropped.
/// ```
/// use gnss_decoder::rtcm::frame::Framer;
///
/// // message 1005
/// let frame = [
///     0xD3, 0x00, 0x13, 0x3E, 0xD7, 0xD3, 0x02, 0x02, 0x98, 0x0E, 0xDE, 0xEF, 0x34,
///     0xB4, 0xBD, 0x62, 0xAC, 0x09, 0x41, 0x98, 0x6F, 0x33, 0x36, 0x0B, 0x98,
/// ];
///
/// let mut framer = Framer::default();
/// framer.push(&[0x00, 0xff]); // garbage
/// framer.push(&frame[..4]);
/// assert!(framer.next().is_none()); // incomplete
///
/// framer.push(&frame[4..]);
/// assert_eq!(framer.next(), Some(frame[3..22].to_vec()));
/// assert!(framer.next().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Framer {
    buffer: Vec<u8>,
}

impl Framer {
    /// Appends new bytes to the internal buffer
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
    /// Number of bytes buffered, not yet consumed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
    /// Drops all buffered bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Iterator for Framer {
    type Item = Vec<u8>;
    /// Returns next complete payload, if any
    fn next(&mut self) -> Option<Self::Item> {
        let (consumed, payload) = decode(&self.buffer);
        if payload.is_none() && consumed > 0 {
            debug!("rtcm framing: dropping {} byte(s)", consumed);
        }
        self.buffer.drain(..consumed.min(self.buffer.len()));
        payload
    }
}
