//! WGS84 geodesy: ECEF and geodetic coordinates, local ENU frame.
use std::sync::OnceLock;

use nalgebra::{Matrix3, Vector3};

use crate::constants::{
    BOWRING_MAX_ITER, WGS84_E2, WGS84_EP2, WGS84_SEMI_MAJOR_AXIS_M as A,
    WGS84_SEMI_MINOR_AXIS_M as B,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geodetic coordinates on the WGS84 ellipsoid
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geodetic {
    /// Latitude [°]
    pub latitude_deg: f64,
    /// Longitude [°]
    pub longitude_deg: f64,
    /// Height above the ellipsoid [m]
    pub height_m: f64,
}

impl Geodetic {
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            height_m,
        }
    }
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
    /// ECEF coordinates [m]
    pub fn to_ecef(&self) -> Vector3<f64> {
        geodetic2ecef(self.latitude_deg, self.longitude_deg, self.height_m)
    }
}

/// Geodetic to ECEF [m] conversion, closed form.
pub fn geodetic2ecef(lat_deg: f64, lon_deg: f64, h: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    // prime vertical radius of curvature
    let n = A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    Vector3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + h) * sin_lat,
    )
}

/// ECEF [m] to geodetic conversion, Bowring's iterative method
/// on the parametric latitude.
/// ```
/// use gnss_decoder::coords::{ecef2geodetic, geodetic2ecef};
///
/// let ecef = geodetic2ecef(47.218371, -1.553621, 50.0);
/// let geo = ecef2geodetic(ecef[0], ecef[1], ecef[2]);
/// assert!((geo.latitude_deg - 47.218371).abs() < 1.0E-9);
/// assert!((geo.longitude_deg + 1.553621).abs() < 1.0E-9);
/// assert!((geo.height_m - 50.0).abs() < 1.0E-3);
/// ```
pub fn ecef2geodetic(x: f64, y: f64, z: f64) -> Geodetic {
    let rho = x.hypot(y);
    if rho == 0.0 && z == 0.0 {
        return Geodetic::new(0.0, 0.0, -A);
    }

    // parametric latitude (cos, sin)
    let normalize = |u: f64, v: f64| {
        let norm = u.hypot(v);
        (u / norm, v / norm)
    };

    let (mut cos_b, mut sin_b) = normalize(A * rho, B * z * (1.0 + WGS84_EP2));

    for _ in 0..BOWRING_MAX_ITER {
        let u = A * (rho - WGS84_E2 * A * cos_b.powi(3));
        let v = B * (z + WGS84_EP2 * B * sin_b.powi(3));
        let (cos_next, sin_next) = normalize(u, v);
        let delta = (cos_next - cos_b).hypot(sin_next - sin_b);
        cos_b = cos_next;
        sin_b = sin_next;
        if delta < f64::EPSILON {
            break;
        }
    }

    let lat = (z + WGS84_EP2 * B * sin_b.powi(3)).atan2(rho - WGS84_E2 * A * cos_b.powi(3));
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let h = rho * cos_lat + (z + WGS84_E2 * n * sin_lat) * sin_lat - n;

    Geodetic::new(lat.to_degrees(), y.atan2(x).to_degrees(), h)
}

/// ECEF to ENU rotation matrix at given location.
/// Rows are the east, north and up unit vectors.
pub fn enu_rotation(lat_deg: f64, lon_deg: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Projects an ECEF vector (baseline, velocity..) onto the local ENU frame
pub fn ecef2enu(vector: &Vector3<f64>, lat_deg: f64, lon_deg: f64) -> Vector3<f64> {
    enu_rotation(lat_deg, lon_deg) * vector
}

/// Euclidean distance between two ECEF points [m]
pub fn distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm()
}

/// Cross product a × b
pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

/// [Position] in ECEF, with optional velocity. The geodetic view is
/// derived on first use only.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// ECEF [m]
    ecef: Vector3<f64>,
    /// ECEF velocity [m/s]
    velocity: Option<Vector3<f64>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    geodetic: OnceLock<Geodetic>,
}

impl PartialEq for Position {
    fn eq(&self, rhs: &Self) -> bool {
        self.ecef == rhs.ecef && self.velocity == rhs.velocity
    }
}

impl Position {
    /// Builds [Position] from ECEF coordinates [m]
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        Self {
            ecef,
            velocity: None,
            geodetic: OnceLock::new(),
        }
    }
    /// Builds [Position] from [Geodetic] coordinates
    pub fn from_geodetic(geodetic: Geodetic) -> Self {
        Self {
            ecef: geodetic.to_ecef(),
            velocity: None,
            geodetic: OnceLock::from(geodetic),
        }
    }
    /// Copies and attaches an ECEF velocity [m/s]
    pub fn with_velocity(&self, velocity: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.velocity = Some(velocity);
        s
    }
    /// ECEF coordinates [m]
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }
    /// ECEF velocity [m/s]
    pub fn velocity(&self) -> Option<Vector3<f64>> {
        self.velocity
    }
    /// [Geodetic] coordinates
    pub fn geodetic(&self) -> &Geodetic {
        self.geodetic
            .get_or_init(|| ecef2geodetic(self.ecef[0], self.ecef[1], self.ecef[2]))
    }
    /// ECEF to ENU rotation matrix, at this location
    pub fn enu_rotation(&self) -> Matrix3<f64> {
        let geo = self.geodetic();
        enu_rotation(geo.latitude_deg, geo.longitude_deg)
    }
    /// Velocity in the local ENU frame [m/s]
    pub fn velocity_enu(&self) -> Option<Vector3<f64>> {
        let velocity = self.velocity?;
        Some(self.enu_rotation() * velocity)
    }
    /// ENU baseline from Self to rhs [m]
    pub fn enu_to(&self, rhs: &Self) -> Vector3<f64> {
        self.enu_rotation() * (rhs.ecef - self.ecef)
    }
    /// Distance to rhs [m]
    pub fn distance(&self, rhs: &Self) -> f64 {
        distance(&self.ecef, &rhs.ecef)
    }
}
