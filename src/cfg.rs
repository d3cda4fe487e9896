#[cfg(feature = "serde")]
use serde::Deserialize;

fn default_gps_week_rollovers() -> u16 {
    2
}

fn default_check_issue_of_data() -> bool {
    true
}

fn default_glonass_date_fallback() -> bool {
    true
}

fn default_discard_unhealthy() -> bool {
    false
}

/// [crate::ephemeris::EphemerisAssembler] configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// GPS week is broadcast modulo 1024. This is the number
    /// of rollovers to add to the broadcast value. Two rollovers
    /// happened so far (1999 and 2019).
    #[cfg_attr(feature = "serde", serde(default = "default_gps_week_rollovers"))]
    pub gps_week_rollovers: u16,
    /// Only emit GPS and Galileo ephemeris once the issue of data
    /// of all subframes (words) agree, and BeiDou ephemeris once all
    /// subframes belong to the same frame.
    #[cfg_attr(feature = "serde", serde(default = "default_check_issue_of_data"))]
    pub check_issue_of_data: bool,
    /// Glonass reference date falls back to the current date
    /// when the day number is out of range. Otherwise, the ephemeris is dropped.
    #[cfg_attr(feature = "serde", serde(default = "default_glonass_date_fallback"))]
    pub glonass_date_fallback: bool,
    /// Drop completed ephemeris of unhealthy satellites.
    #[cfg_attr(feature = "serde", serde(default = "default_discard_unhealthy"))]
    pub discard_unhealthy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gps_week_rollovers: default_gps_week_rollovers(),
            check_issue_of_data: default_check_issue_of_data(),
            glonass_date_fallback: default_glonass_date_fallback(),
            discard_unhealthy: default_discard_unhealthy(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with desired rollover count
    pub fn with_gps_week_rollovers(&self, rollovers: u16) -> Self {
        let mut s = self.clone();
        s.gps_week_rollovers = rollovers;
        s
    }
    /// Copies and returns [Config] with issue of data verification
    pub fn with_issue_of_data_check(&self, check: bool) -> Self {
        let mut s = self.clone();
        s.check_issue_of_data = check;
        s
    }
    /// Copies and returns [Config] with Glonass date fallback preference
    pub fn with_glonass_date_fallback(&self, fallback: bool) -> Self {
        let mut s = self.clone();
        s.glonass_date_fallback = fallback;
        s
    }
    /// Copies and returns [Config] that drops unhealthy ephemeris
    pub fn with_unhealthy_discarded(&self, discard: bool) -> Self {
        let mut s = self.clone();
        s.discard_unhealthy = discard;
        s
    }
}
