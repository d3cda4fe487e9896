//! BeiDou D1 (MEO/IGSO) ephemeris, BDS-SIS-ICD-B1I.
//! Like GPS, subframes are 300 bit streams and offsets are ICD
//! bit numbers minus one. Most fields are split between two words.
use log::{debug, warn};

use crate::{
    bits::{Field, SignConvention},
    cfg::Config,
    constants::{BEIDOU_SUBFRAME_S, SECONDS_PER_WEEK},
    ephemeris::{p2, Assemble, KeplerEphemeris, SC2RAD},
    frame::Framed,
    Error,
};

use gnss::prelude::SV;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use SignConvention::{TwosComplement, Unsigned};

// Word #1 and #2, all subframes
const FRAME_ID: Field = Field::unsigned(15, 3);
const SOW: Field = Field::split((18, 8), (30, 12), Unsigned);

// Subframe #1
const SAT_H1: Field = Field::unsigned(42, 1);
const AODC: Field = Field::unsigned(43, 5);
const URAI: Field = Field::unsigned(48, 4);
const WEEK: Field = Field::unsigned(60, 13);
const TOC: Field = Field::split((73, 9), (90, 8), Unsigned);
const TGD1: Field = Field::signed(98, 10);
const TGD2: Field = Field::split((108, 4), (120, 6), TwosComplement);
const ALPHA0: Field = Field::signed(126, 8);
const ALPHA1: Field = Field::signed(134, 8);
const ALPHA2: Field = Field::signed(150, 8);
const ALPHA3: Field = Field::signed(158, 8);
const BETA0: Field = Field::split((166, 6), (180, 2), TwosComplement);
const BETA1: Field = Field::signed(182, 8);
const BETA2: Field = Field::signed(190, 8);
const BETA3: Field = Field::split((198, 4), (210, 4), TwosComplement);
const A2: Field = Field::signed(214, 11);
const A0: Field = Field::split((225, 7), (240, 17), TwosComplement);
const A1: Field = Field::split((257, 5), (270, 17), TwosComplement);
const AODE: Field = Field::unsigned(287, 5);

// Subframe #2
const DELTA_N: Field = Field::split((42, 10), (60, 6), TwosComplement);
const CUC: Field = Field::split((66, 16), (90, 2), TwosComplement);
const M0: Field = Field::split((92, 20), (120, 12), TwosComplement);
const E: Field = Field::split((132, 10), (150, 22), Unsigned);
const CUS: Field = Field::signed(180, 18);
const CRC: Field = Field::split((198, 4), (210, 14), TwosComplement);
const CRS: Field = Field::split((224, 8), (240, 10), TwosComplement);
const SQRT_A: Field = Field::split((250, 12), (270, 20), Unsigned);
const TOE_MSB: Field = Field::unsigned(290, 2);

// Subframe #3
const TOE_LSB: Field = Field::split((42, 10), (60, 5), Unsigned);
const I0: Field = Field::split((65, 17), (90, 15), TwosComplement);
const CIC: Field = Field::split((105, 7), (120, 11), TwosComplement);
const OMEGA_DOT: Field = Field::split((131, 11), (150, 13), TwosComplement);
const CIS: Field = Field::split((163, 9), (180, 9), TwosComplement);
const IDOT: Field = Field::split((189, 13), (210, 1), TwosComplement);
const OMEGA0: Field = Field::split((211, 21), (240, 11), TwosComplement);
const OMEGA: Field = Field::split((251, 11), (270, 21), TwosComplement);

/// TGD unit: 0.1 ns
const TGD_SCALING: f64 = 1.0E-10;

/// BeiDou D1 ephemeris
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeiDouEphemeris {
    /// Keplerian elements, clock and Klobuchar coefficients
    pub kepler: KeplerEphemeris,
    /// B1I group delay [s]
    pub tgd1: f64,
    /// B2I group delay [s]
    pub tgd2: f64,
    /// User range accuracy index
    pub urai: u8,
}

impl BeiDouEphemeris {
    /// GEO vehicles broadcast the D2 message, which we do not support.
    pub(crate) fn is_geo(sv: SV) -> bool {
        sv.prn <= 5 || (59..=63).contains(&sv.prn)
    }

    /// Subframes 1 to 3 of one frame are broadcast 6 s apart
    fn is_continuous(sow: [u32; 3]) -> bool {
        sow.windows(2)
            .all(|w| w[1] == (w[0] + BEIDOU_SUBFRAME_S) % SECONDS_PER_WEEK)
    }
}

impl Assemble for BeiDouEphemeris {
    fn accepts(sv: SV, index: u8, framed: &Framed) -> Result<bool, Error> {
        if Self::is_geo(sv) {
            debug!("{} - D2 message is not supported", sv);
            return Ok(false);
        }
        let embedded = FRAME_ID.raw(framed.stream())? as u8;
        if embedded != index {
            return Err(Error::IndexMismatch {
                declared: index,
                embedded,
            });
        }
        Ok(true)
    }

    fn assemble(sv: SV, blocks: &[&Framed], cfg: &Config) -> Result<Option<Self>, Error> {
        let (sf1, sf2, sf3) = (blocks[0].stream(), blocks[1].stream(), blocks[2].stream());

        let sow = [SOW.raw(sf1)? as u32, SOW.raw(sf2)? as u32, SOW.raw(sf3)? as u32];
        if cfg.check_issue_of_data && !Self::is_continuous(sow) {
            warn!(
                "{} - subframes from different frames: sow={}/{}/{}",
                sv, sow[0], sow[1], sow[2]
            );
            return Ok(None);
        }

        let toe = ((TOE_MSB.raw(sf2)? << 15) | TOE_LSB.raw(sf3)?) as f64 * 8.0;

        let kepler = KeplerEphemeris {
            sv,
            week: WEEK.raw(sf1)? as u32,
            tow: sow[0],
            toc: TOC.scaled(sf1, 8.0)?,
            af0: A0.scaled(sf1, p2(-33))?,
            af1: A1.scaled(sf1, p2(-50))?,
            af2: A2.scaled(sf1, p2(-66))?,
            crs: CRS.scaled(sf2, p2(-6))?,
            delta_n: DELTA_N.scaled(sf2, p2(-43))? * SC2RAD,
            m0: M0.scaled(sf2, p2(-31))? * SC2RAD,
            cuc: CUC.scaled(sf2, p2(-31))?,
            e: E.scaled(sf2, p2(-33))?,
            cus: CUS.scaled(sf2, p2(-31))?,
            sqrt_a: SQRT_A.scaled(sf2, p2(-19))?,
            toe,
            cic: CIC.scaled(sf3, p2(-31))?,
            omega0: OMEGA0.scaled(sf3, p2(-31))? * SC2RAD,
            cis: CIS.scaled(sf3, p2(-31))?,
            i0: I0.scaled(sf3, p2(-31))? * SC2RAD,
            crc: CRC.scaled(sf2, p2(-6))?,
            omega: OMEGA.scaled(sf3, p2(-31))? * SC2RAD,
            omega_dot: OMEGA_DOT.scaled(sf3, p2(-43))? * SC2RAD,
            idot: IDOT.scaled(sf3, p2(-43))? * SC2RAD,
            iono: [
                ALPHA0.scaled(sf1, p2(-30))?,
                ALPHA1.scaled(sf1, p2(-27))?,
                ALPHA2.scaled(sf1, p2(-24))?,
                ALPHA3.scaled(sf1, p2(-24))?,
                BETA0.scaled(sf1, p2(11))?,
                BETA1.scaled(sf1, p2(14))?,
                BETA2.scaled(sf1, p2(16))?,
                BETA3.scaled(sf1, p2(16))?,
            ],
            iode: AODE.raw(sf1)? as u16,
            iodc: AODC.raw(sf1)? as u16,
            health: SAT_H1.raw(sf1)? as u16,
        };

        Ok(Some(Self {
            kepler,
            tgd1: TGD1.scaled(sf1, TGD_SCALING)?,
            tgd2: TGD2.scaled(sf1, TGD_SCALING)?,
            urai: URAI.raw(sf1)? as u8,
        }))
    }
}
