/// WGS84 Earth Frame Ellipsoid semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 Earth Frame Ellipsoid semi-minor axis (meters)
pub const WGS84_SEMI_MINOR_AXIS_M: f64 = WGS84_SEMI_MAJOR_AXIS_M * (1.0 - WGS84_FLATTENING);

/// WGS84 first eccentricity squared
pub const WGS84_E2: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

/// WGS84 second eccentricity squared: e² / (1 - e²)
pub const WGS84_EP2: f64 = WGS84_E2 / (1.0 - WGS84_E2);

/// Maximal number of Bowring iterations
pub const BOWRING_MAX_ITER: usize = 5;

/// Number of weeks in one GPS week counter cycle
pub const GPS_WEEK_CYCLE: u32 = 1024;

/// Seconds in one day
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds in one week
pub const SECONDS_PER_WEEK: u32 = 7 * SECONDS_PER_DAY;

/// BeiDou D1 subframe duration (seconds)
pub const BEIDOU_SUBFRAME_S: u32 = 6;

/// Moscow time (Glonass system time) is UTC + 3h
pub const GLONASS_UTC_OFFSET_S: i64 = 3 * 3600;

/// First year of the Glonass four-year interval counter (N4 = 1)
pub const GLONASS_N4_ORIGIN_YEAR: i32 = 1996;

/// Days in one Glonass four-year interval
pub const GLONASS_DAYS_PER_CYCLE: u16 = 1461;
