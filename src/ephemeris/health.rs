use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Galileo signal health and data validity, RINEX bit order
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GalileoHealth: u16 {
        /// E1-B data validity status: working without guarantee
        const E1B_DVS = 0x01;
        /// E1-B signal health status (LSB)
        const E1B_HS0 = 0x02;
        /// E1-B signal health status (MSB)
        const E1B_HS1 = 0x04;
        /// E5b data validity status: working without guarantee
        const E5B_DVS = 0x40;
        /// E5b signal health status (LSB)
        const E5B_HS0 = 0x80;
        /// E5b signal health status (MSB)
        const E5B_HS1 = 0x100;
    }
}

impl GalileoHealth {
    /// Builds flags from I/NAV word 5 status bits
    pub(crate) fn from_status(e5b_hs: u64, e1b_hs: u64, e5b_dvs: u64, e1b_dvs: u64) -> Self {
        let bits = (e1b_dvs & 0x01)
            | ((e1b_hs & 0x03) << 1)
            | ((e5b_dvs & 0x01) << 6)
            | ((e5b_hs & 0x03) << 7);
        Self::from_bits_truncate(bits as u16)
    }
}

bitflags! {
    /// Glonass health indications
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GlonassHealth: u8 {
        /// Bn most significant bit: satellite malfunction
        const UNHEALTHY = 0x01;
        /// ln: this satellite is not to be used
        const NOT_USABLE = 0x02;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn galileo_status() {
        assert_eq!(GalileoHealth::from_status(0, 0, 0, 0), GalileoHealth::empty());
        let health = GalileoHealth::from_status(0b11, 0b01, 1, 0);
        assert!(health.contains(GalileoHealth::E5B_HS0 | GalileoHealth::E5B_HS1));
        assert!(health.contains(GalileoHealth::E1B_HS0));
        assert!(health.contains(GalileoHealth::E5B_DVS));
        assert!(!health.contains(GalileoHealth::E1B_DVS));
        assert_eq!(health.bits(), 0x80 | 0x100 | 0x02 | 0x40);
    }
}
