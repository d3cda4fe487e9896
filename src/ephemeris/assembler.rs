use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use log::debug;

use crate::{
    cfg::Config,
    ephemeris::{
        Assemble, BeiDouEphemeris, EphemerisRecord, GPSEphemeris, GalileoEphemeris,
        GlonassEphemeris,
    },
    frame::{FrameLayout, Framed, RawFrame},
    Error,
};

use gnss::prelude::SV;

/// Blocks gathered so far, for one satellite
#[derive(Debug, Default)]
struct PendingSet {
    blocks: BTreeMap<u8, Framed>,
}

impl PendingSet {
    /// Returns all required blocks, in required order, once all are present
    fn complete(&self, required: &[u8]) -> Option<Vec<&Framed>> {
        required.iter().map(|i| self.blocks.get(i)).collect()
    }
}

/// [EphemerisAssembler] buffers navigation blocks per satellite and
/// emits an [EphemerisRecord] once all required blocks are gathered.
/// Pending state is reset on emission. [EphemerisAssembler] may be
/// shared between threads: [Self::push] takes `&self`.
/// ```
/// use gnss_decoder::prelude::*;
///
/// let assembler = EphemerisAssembler::new(Config::default());
/// let sv = SV::new(Constellation::GPS, 5);
///
/// // subframe 1: id is carried by the HOW (word 2)
/// let mut data = [0; 40];
/// data[6] = 0x01;
///
/// // declared and embedded ids must agree
/// let frame = RawFrame::new(sv, 2, &data);
/// assert!(assembler.push(frame).is_err());
///
/// // single subframe: nothing to emit yet
/// let frame = RawFrame::new(sv, 1, &data);
/// assert_eq!(assembler.push(frame), Ok(None));
/// assert!(assembler.is_pending(sv));
///
/// // stream closure
/// assembler.clear();
/// assert!(!assembler.is_pending(sv));
/// ```
#[derive(Debug, Default)]
pub struct EphemerisAssembler {
    cfg: Config,
    pending: Mutex<HashMap<SV, PendingSet>>,
}

impl EphemerisAssembler {
    /// Builds a new [EphemerisAssembler]
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// [Config] in use
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SV, PendingSet>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Folds a new [RawFrame] into pending state. Returns the completed
    /// [EphemerisRecord], if this frame completed one.
    /// Blocks that do not contribute to an ephemeris (almanac pages..)
    /// are dropped silently.
    pub fn push(&self, frame: RawFrame) -> Result<Option<EphemerisRecord>, Error> {
        let layout = FrameLayout::from_constellation(frame.sv.constellation)?;
        let framed = layout.split(&frame.data)?;

        if !layout.required_indexes().contains(&frame.index) {
            debug!("{} - block #{} not needed", frame.sv, frame.index);
            return Ok(None);
        }

        let record = match layout {
            FrameLayout::GPS => self
                .fold::<GPSEphemeris>(layout, frame.sv, frame.index, framed)?
                .map(EphemerisRecord::GPS),
            FrameLayout::Galileo => self
                .fold::<GalileoEphemeris>(layout, frame.sv, frame.index, framed)?
                .map(EphemerisRecord::Galileo),
            FrameLayout::BeiDou => self
                .fold::<BeiDouEphemeris>(layout, frame.sv, frame.index, framed)?
                .map(EphemerisRecord::BeiDou),
            FrameLayout::Glonass => self
                .fold::<GlonassEphemeris>(layout, frame.sv, frame.index, framed)?
                .map(EphemerisRecord::Glonass),
        };

        match record {
            Some(record) if self.cfg.discard_unhealthy && !record.is_healthy() => {
                debug!("{} - discarding unhealthy ephemeris", record.sv());
                Ok(None)
            },
            record => Ok(record),
        }
    }

    fn fold<T: Assemble>(
        &self,
        layout: FrameLayout,
        sv: SV,
        index: u8,
        framed: Framed,
    ) -> Result<Option<T>, Error> {
        if !T::accepts(sv, index, &framed)? {
            return Ok(None);
        }

        let mut pending = self.lock();
        let set = pending.entry(sv).or_default();
        set.blocks.insert(index, framed);

        let blocks = match set.complete(layout.required_indexes()) {
            Some(blocks) => blocks,
            None => {
                debug!(
                    "{} - pending {:?}",
                    sv,
                    set.blocks.keys().collect::<Vec<_>>()
                );
                return Ok(None);
            },
        };

        match T::assemble(sv, &blocks, &self.cfg)? {
            Some(record) => {
                debug!("{} - ephemeris complete", sv);
                pending.remove(&sv);
                Ok(Some(record))
            },
            None => Ok(None),
        }
    }

    /// True if some blocks are buffered for this satellite
    pub fn is_pending(&self, sv: SV) -> bool {
        self.lock().contains_key(&sv)
    }

    /// Number of satellites with pending blocks
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Block indexes buffered for this satellite
    pub fn pending_indexes(&self, sv: SV) -> Vec<u8> {
        self.lock()
            .get(&sv)
            .map(|set| set.blocks.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Discards pending blocks of one satellite
    pub fn discard(&self, sv: SV) {
        self.lock().remove(&sv);
    }

    /// Discards all pending state, for example on stream closure
    pub fn clear(&self) {
        self.lock().clear();
    }
}
