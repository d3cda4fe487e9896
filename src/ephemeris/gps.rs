//! GPS LNAV (L1 C/A) ephemeris, IS-GPS-200.
//! Subframes are handled as 300 bit streams (parity included),
//! so field offsets below are ICD bit numbers minus one.
use log::{debug, warn};

use crate::{
    bits::{Field, SignConvention},
    cfg::Config,
    constants::GPS_WEEK_CYCLE,
    ephemeris::{p2, Assemble, KeplerEphemeris, SC2RAD},
    frame::Framed,
    Error,
};

use gnss::prelude::SV;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use SignConvention::{TwosComplement, Unsigned};

// HOW
const TOW_COUNT: Field = Field::unsigned(30, 17);
const SUBFRAME_ID: Field = Field::unsigned(49, 3);

// Subframe #1
const WEEK: Field = Field::unsigned(60, 10);
const L2_CODES: Field = Field::unsigned(70, 2);
const URA: Field = Field::unsigned(72, 4);
const HEALTH: Field = Field::unsigned(76, 6);
const IODC: Field = Field::split((82, 2), (210, 8), Unsigned);
const TGD: Field = Field::signed(196, 8);
const TOC: Field = Field::unsigned(218, 16);
const AF2: Field = Field::signed(240, 8);
const AF1: Field = Field::signed(248, 16);
const AF0: Field = Field::signed(270, 22);

// Subframe #2
const IODE2: Field = Field::unsigned(60, 8);
const CRS: Field = Field::signed(68, 16);
const DELTA_N: Field = Field::signed(90, 16);
const M0: Field = Field::split((106, 8), (120, 24), TwosComplement);
const CUC: Field = Field::signed(150, 16);
const E: Field = Field::split((166, 8), (180, 24), Unsigned);
const CUS: Field = Field::signed(210, 16);
const SQRT_A: Field = Field::split((226, 8), (240, 24), Unsigned);
const TOE: Field = Field::unsigned(270, 16);
const FIT_INTERVAL: Field = Field::unsigned(286, 1);

// Subframe #3
const CIC: Field = Field::signed(60, 16);
const OMEGA0: Field = Field::split((76, 8), (90, 24), TwosComplement);
const CIS: Field = Field::signed(120, 16);
const I0: Field = Field::split((136, 8), (150, 24), TwosComplement);
const CRC: Field = Field::signed(180, 16);
const OMEGA: Field = Field::split((196, 8), (210, 24), TwosComplement);
const OMEGA_DOT: Field = Field::signed(240, 24);
const IODE3: Field = Field::unsigned(270, 8);
const IDOT: Field = Field::signed(278, 14);

// Subframe #4, page 18
const PAGE_ID: Field = Field::unsigned(62, 6);
const ALPHA0: Field = Field::signed(68, 8);
const ALPHA1: Field = Field::signed(76, 8);
const ALPHA2: Field = Field::signed(90, 8);
const ALPHA3: Field = Field::signed(98, 8);
const BETA0: Field = Field::signed(106, 8);
const BETA1: Field = Field::signed(120, 8);
const BETA2: Field = Field::signed(128, 8);
const BETA3: Field = Field::signed(136, 8);

/// Subframe 4 page carrying the ionosphere and UTC parameters
const IONO_PAGE_ID: u64 = 56;

/// GPS LNAV ephemeris
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GPSEphemeris {
    /// Keplerian elements, clock and ionosphere model
    pub kepler: KeplerEphemeris,
    /// Total group delay [s]
    pub tgd: f64,
    /// User range accuracy index
    pub ura_index: u8,
    /// Codes on L2 channel
    pub l2_codes: u8,
    /// Fit interval flag: false means 4 hours
    pub fit_interval: bool,
}

impl GPSEphemeris {
    /// Nominal user range accuracy [m], from [Self::ura_index]
    pub fn ura_m(&self) -> Option<f64> {
        match self.ura_index {
            0 => Some(2.4),
            1 => Some(3.4),
            2 => Some(4.85),
            3 => Some(6.85),
            4 => Some(9.65),
            5 => Some(13.65),
            6 => Some(24.0),
            7..=14 => Some(48.0 * 2.0_f64.powi(self.ura_index as i32 - 7)),
            _ => None,
        }
    }
}

impl Assemble for GPSEphemeris {
    fn accepts(sv: SV, index: u8, framed: &Framed) -> Result<bool, Error> {
        let stream = framed.stream();
        let embedded = SUBFRAME_ID.raw(stream)? as u8;
        if embedded != index {
            return Err(Error::IndexMismatch {
                declared: index,
                embedded,
            });
        }
        if index == 4 {
            let page = PAGE_ID.raw(stream)?;
            if page != IONO_PAGE_ID {
                debug!("{} - skipping subframe 4 page id {}", sv, page);
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn assemble(sv: SV, blocks: &[&Framed], cfg: &Config) -> Result<Option<Self>, Error> {
        let (sf1, sf2, sf3, sf4) = (
            blocks[0].stream(),
            blocks[1].stream(),
            blocks[2].stream(),
            blocks[3].stream(),
        );

        let iodc = IODC.raw(sf1)? as u16;
        let iode = IODE2.raw(sf2)? as u16;
        let iode3 = IODE3.raw(sf3)? as u16;

        if cfg.check_issue_of_data && (iode != iode3 || iode != iodc & 0xff) {
            warn!(
                "{} - inconsistent issue of data: iodc={} iode(2)={} iode(3)={}",
                sv, iodc, iode, iode3
            );
            return Ok(None);
        }

        let week = WEEK.raw(sf1)? as u32 + cfg.gps_week_rollovers as u32 * GPS_WEEK_CYCLE;

        let kepler = KeplerEphemeris {
            sv,
            week,
            tow: TOW_COUNT.raw(sf1)? as u32 * 6,
            toc: TOC.scaled(sf1, 16.0)?,
            af0: AF0.scaled(sf1, p2(-31))?,
            af1: AF1.scaled(sf1, p2(-43))?,
            af2: AF2.scaled(sf1, p2(-55))?,
            crs: CRS.scaled(sf2, p2(-5))?,
            delta_n: DELTA_N.scaled(sf2, p2(-43))? * SC2RAD,
            m0: M0.scaled(sf2, p2(-31))? * SC2RAD,
            cuc: CUC.scaled(sf2, p2(-29))?,
            e: E.scaled(sf2, p2(-33))?,
            cus: CUS.scaled(sf2, p2(-29))?,
            sqrt_a: SQRT_A.scaled(sf2, p2(-19))?,
            toe: TOE.scaled(sf2, 16.0)?,
            cic: CIC.scaled(sf3, p2(-29))?,
            omega0: OMEGA0.scaled(sf3, p2(-31))? * SC2RAD,
            cis: CIS.scaled(sf3, p2(-29))?,
            i0: I0.scaled(sf3, p2(-31))? * SC2RAD,
            crc: CRC.scaled(sf3, p2(-5))?,
            omega: OMEGA.scaled(sf3, p2(-31))? * SC2RAD,
            omega_dot: OMEGA_DOT.scaled(sf3, p2(-43))? * SC2RAD,
            idot: IDOT.scaled(sf3, p2(-43))? * SC2RAD,
            iono: [
                ALPHA0.scaled(sf4, p2(-30))?,
                ALPHA1.scaled(sf4, p2(-27))?,
                ALPHA2.scaled(sf4, p2(-24))?,
                ALPHA3.scaled(sf4, p2(-24))?,
                BETA0.scaled(sf4, p2(11))?,
                BETA1.scaled(sf4, p2(14))?,
                BETA2.scaled(sf4, p2(16))?,
                BETA3.scaled(sf4, p2(16))?,
            ],
            iode,
            iodc,
            health: HEALTH.raw(sf1)? as u16,
        };

        Ok(Some(Self {
            kepler,
            tgd: TGD.scaled(sf1, p2(-31))?,
            ura_index: URA.raw(sf1)? as u8,
            l2_codes: L2_CODES.raw(sf1)? as u8,
            fit_interval: FIT_INTERVAL.raw(sf2)? == 1,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn ura() {
        let mut eph = GPSEphemeris::default();
        assert_eq!(eph.ura_m(), Some(2.4));
        eph.ura_index = 8;
        assert_eq!(eph.ura_m(), Some(96.0));
        eph.ura_index = 15;
        assert_eq!(eph.ura_m(), None);
    }
}
