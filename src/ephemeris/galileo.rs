//! Galileo I/NAV ephemeris, words 1 to 5 (OS SIS ICD).
use log::{debug, warn};

use crate::{
    bits::Field,
    cfg::Config,
    ephemeris::{p2, Assemble, GalileoHealth, KeplerEphemeris, SC2RAD},
    frame::Framed,
    Error,
};

use gnss::prelude::SV;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const WORD_TYPE: Field = Field::unsigned(0, 6);
const IOD_NAV: Field = Field::unsigned(6, 10);

// Word #1
const TOE: Field = Field::unsigned(16, 14);
const M0: Field = Field::signed(30, 32);
const E: Field = Field::unsigned(62, 32);
const SQRT_A: Field = Field::unsigned(94, 32);

// Word #2
const OMEGA0: Field = Field::signed(16, 32);
const I0: Field = Field::signed(48, 32);
const OMEGA: Field = Field::signed(80, 32);
const IDOT: Field = Field::signed(112, 14);

// Word #3
const OMEGA_DOT: Field = Field::signed(16, 24);
const DELTA_N: Field = Field::signed(40, 16);
const CUC: Field = Field::signed(56, 16);
const CUS: Field = Field::signed(72, 16);
const CRC: Field = Field::signed(88, 16);
const CRS: Field = Field::signed(104, 16);
const SISA: Field = Field::unsigned(120, 8);

// Word #4
const SVID: Field = Field::unsigned(16, 6);
const CIC: Field = Field::signed(22, 16);
const CIS: Field = Field::signed(38, 16);
const TOC: Field = Field::unsigned(54, 14);
const AF0: Field = Field::signed(68, 31);
const AF1: Field = Field::signed(99, 21);
const AF2: Field = Field::signed(120, 6);

// Word #5
const AI0: Field = Field::unsigned(6, 11);
const AI1: Field = Field::signed(17, 11);
const AI2: Field = Field::signed(28, 14);
const BGD_E1E5A: Field = Field::signed(47, 10);
const BGD_E1E5B: Field = Field::signed(57, 10);
const E5B_HS: Field = Field::unsigned(67, 2);
const E1B_HS: Field = Field::unsigned(69, 2);
const E5B_DVS: Field = Field::unsigned(71, 1);
const E1B_DVS: Field = Field::unsigned(72, 1);
const WEEK: Field = Field::unsigned(73, 12);
const TOW: Field = Field::unsigned(85, 20);

/// Galileo I/NAV ephemeris
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GalileoEphemeris {
    /// Keplerian elements, clock and NeQuick coefficients
    pub kepler: KeplerEphemeris,
    /// Broadcast group delay E1/E5a [s]
    pub bgd_e1_e5a: f64,
    /// Broadcast group delay E1/E5b [s]
    pub bgd_e1_e5b: f64,
    /// Signal in space accuracy index
    pub sisa: u8,
    /// Signal health and data validity
    pub signal_health: GalileoHealth,
}

impl Assemble for GalileoEphemeris {
    fn accepts(_: SV, index: u8, framed: &Framed) -> Result<bool, Error> {
        let embedded = WORD_TYPE.raw(framed.stream())? as u8;
        if embedded != index {
            return Err(Error::IndexMismatch {
                declared: index,
                embedded,
            });
        }
        Ok(true)
    }

    fn assemble(sv: SV, blocks: &[&Framed], cfg: &Config) -> Result<Option<Self>, Error> {
        let (w1, w2, w3, w4, w5) = (
            blocks[0].stream(),
            blocks[1].stream(),
            blocks[2].stream(),
            blocks[3].stream(),
            blocks[4].stream(),
        );

        let iods = [
            IOD_NAV.raw(w1)?,
            IOD_NAV.raw(w2)?,
            IOD_NAV.raw(w3)?,
            IOD_NAV.raw(w4)?,
        ];

        if cfg.check_issue_of_data && iods.iter().any(|iod| *iod != iods[0]) {
            warn!("{} - inconsistent iodnav: {:?}", sv, iods);
            return Ok(None);
        }

        let svid = SVID.raw(w4)? as u8;
        if svid != sv.prn {
            debug!("{} - word 4 declares svid {}", sv, svid);
        }

        let iod_nav = iods[0] as u16;

        let kepler = KeplerEphemeris {
            sv,
            week: WEEK.raw(w5)? as u32,
            tow: TOW.raw(w5)? as u32,
            toc: TOC.scaled(w4, 60.0)?,
            af0: AF0.scaled(w4, p2(-34))?,
            af1: AF1.scaled(w4, p2(-46))?,
            af2: AF2.scaled(w4, p2(-59))?,
            crs: CRS.scaled(w3, p2(-5))?,
            delta_n: DELTA_N.scaled(w3, p2(-43))? * SC2RAD,
            m0: M0.scaled(w1, p2(-31))? * SC2RAD,
            cuc: CUC.scaled(w3, p2(-29))?,
            e: E.scaled(w1, p2(-33))?,
            cus: CUS.scaled(w3, p2(-29))?,
            sqrt_a: SQRT_A.scaled(w1, p2(-19))?,
            toe: TOE.scaled(w1, 60.0)?,
            cic: CIC.scaled(w4, p2(-29))?,
            omega0: OMEGA0.scaled(w2, p2(-31))? * SC2RAD,
            cis: CIS.scaled(w4, p2(-29))?,
            i0: I0.scaled(w2, p2(-31))? * SC2RAD,
            crc: CRC.scaled(w3, p2(-5))?,
            omega: OMEGA.scaled(w2, p2(-31))? * SC2RAD,
            omega_dot: OMEGA_DOT.scaled(w3, p2(-43))? * SC2RAD,
            idot: IDOT.scaled(w2, p2(-43))? * SC2RAD,
            iono: [
                AI0.scaled(w5, p2(-2))?,
                AI1.scaled(w5, p2(-8))?,
                AI2.scaled(w5, p2(-15))?,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
            ],
            iode: iod_nav,
            iodc: iod_nav,
            health: 0,
        };

        let signal_health = GalileoHealth::from_status(
            E5B_HS.raw(w5)?,
            E1B_HS.raw(w5)?,
            E5B_DVS.raw(w5)?,
            E1B_DVS.raw(w5)?,
        );

        Ok(Some(Self {
            kepler: KeplerEphemeris {
                health: signal_health.bits(),
                ..kepler
            },
            bgd_e1_e5a: BGD_E1E5A.scaled(w5, p2(-32))?,
            bgd_e1_e5b: BGD_E1E5B.scaled(w5, p2(-32))?,
            sisa: SISA.raw(w3)? as u8,
            signal_health,
        }))
    }
}
