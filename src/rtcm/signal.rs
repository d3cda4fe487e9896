//! SSR code bias signal indicators
use gnss::prelude::Constellation;

const GPS_SIGNALS: [&str; 20] = [
    "1C", "1P", "1W", "1Y", "1M", "2C", "2D", "2S", "2L", "2X", "2P", "2W", "2Y", "2M", "5I",
    "5Q", "5X", "1S", "1L", "1X",
];

const GLONASS_SIGNALS: [&str; 13] = [
    "1C", "1P", "2C", "2P", "4A", "4B", "4X", "6A", "6B", "6X", "3I", "3Q", "3X",
];

const GALILEO_SIGNALS: [&str; 19] = [
    "1A", "1B", "1C", "1X", "1Z", "5I", "5Q", "5X", "7I", "7Q", "7X", "8I", "8Q", "8X", "6A",
    "6B", "6C", "6X", "6Z",
];

const BEIDOU_SIGNALS: [&str; 15] = [
    "2I", "2Q", "2X", "6I", "6Q", "6X", "7I", "7Q", "7X", "1D", "1P", "1X", "5D", "5P", "5X",
];

/// Returns the RINEX observable code (without leading type letter)
/// of given SSR signal and tracking mode indicator.
/// ```
/// use gnss_decoder::prelude::Constellation;
/// use gnss_decoder::rtcm::signal_code;
///
/// assert_eq!(signal_code(Constellation::GPS, 0), Some("1C"));
/// assert_eq!(signal_code(Constellation::GPS, 11), Some("2W"));
/// assert_eq!(signal_code(Constellation::Galileo, 31), None);
/// ```
pub fn signal_code(constellation: Constellation, indicator: u8) -> Option<&'static str> {
    let table: &[&str] = match constellation {
        Constellation::GPS => &GPS_SIGNALS,
        Constellation::Glonass => &GLONASS_SIGNALS,
        Constellation::Galileo => &GALILEO_SIGNALS,
        Constellation::BeiDou => &BEIDOU_SIGNALS,
        _ => return None,
    };
    table.get(indicator as usize).copied()
}
