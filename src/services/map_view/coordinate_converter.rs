//! Conversion of place-lookup coordinates into display latitude/longitude.
//!
//! The lookup reports positions either as TM128 (KATEC) planar metres or as
//! scaled WGS84 degrees. TM128 is a Transverse Mercator projection on the
//! Bessel 1841 ellipsoid; unprojected positions are shifted onto WGS84 with a
//! three-parameter geocentric translation.

use serde::{Deserialize, Serialize};

use crate::types::{place::LatLng, tracker_error::TrackerError};

#[derive(Clone, Copy)]
struct Ellipsoid {
    a: f64,
    f: f64,
}

impl Ellipsoid {
    fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }
}

const BESSEL_1841: Ellipsoid = Ellipsoid {
    a: 6_377_397.155,
    f: 1.0 / 299.152_812_8,
};

const WGS_84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

const TM128_LAT0: f64 = 38.0;
const TM128_LON0: f64 = 128.0;
const TM128_K0: f64 = 0.9999;
const TM128_FALSE_EASTING: f64 = 400_000.0;
const TM128_FALSE_NORTHING: f64 = 600_000.0;

/// Bessel (Tokyo datum) to WGS84 translation in metres.
const DATUM_SHIFT: [f64; 3] = [-146.43, 507.89, 681.46];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    Tm128,
    /// `x` is longitude and `y` latitude, both multiplied by `scale`.
    Wgs84 { scale: f64 },
}

impl CoordinateSystem {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tm128" | "katec" => Some(CoordinateSystem::Tm128),
            "wgs84" => Some(CoordinateSystem::Wgs84 { scale: 1.0 }),
            "wgs84e7" => Some(CoordinateSystem::Wgs84 { scale: 1e7 }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CoordinateConverter {
    system: CoordinateSystem,
}

impl CoordinateConverter {
    pub fn new(system: CoordinateSystem) -> Self {
        Self { system }
    }

    pub fn to_display(&self, native_x: &str, native_y: &str) -> Result<LatLng, TrackerError> {
        let invalid = |reason: String| TrackerError::InvalidCoordinate {
            x: native_x.to_string(),
            y: native_y.to_string(),
            reason,
        };

        let parse = |raw: &str| -> Result<f64, TrackerError> {
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("{raw:?}: {e}")))?;

            if !value.is_finite() {
                return Err(invalid(format!("{raw:?} is not finite")));
            }

            Ok(value)
        };

        let x = parse(native_x)?;
        let y = parse(native_y)?;

        Ok(match self.system {
            CoordinateSystem::Tm128 => tm128_to_wgs84(x, y),
            CoordinateSystem::Wgs84 { scale } => LatLng {
                lat: y / scale,
                lng: x / scale,
            },
        })
    }
}

pub fn tm128_to_wgs84(x: f64, y: f64) -> LatLng {
    let (lat, lon) = tm_inverse(x, y, BESSEL_1841);
    let (gx, gy, gz) = geodetic_to_geocentric(lat, lon, BESSEL_1841);
    let (lat, lon) = geocentric_to_geodetic(
        gx + DATUM_SHIFT[0],
        gy + DATUM_SHIFT[1],
        gz + DATUM_SHIFT[2],
        WGS_84,
    );

    LatLng {
        lat: lat.to_degrees(),
        lng: lon.to_degrees(),
    }
}

fn meridian_arc(phi: f64, ell: Ellipsoid) -> f64 {
    let e2 = ell.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    ell.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

fn tm_inverse(x: f64, y: f64, ell: Ellipsoid) -> (f64, f64) {
    let e2 = ell.e2();
    let ep2 = e2 / (1.0 - e2);

    let m = meridian_arc(TM128_LAT0.to_radians(), ell) + (y - TM128_FALSE_NORTHING) / TM128_K0;
    let mu = m / (ell.a * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    // footpoint latitude
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin2 = phi1.sin().powi(2);
    let c1 = ep2 * phi1.cos().powi(2);
    let t1 = phi1.tan().powi(2);
    let n1 = ell.a / (1.0 - e2 * sin2).sqrt();
    let r1 = ell.a * (1.0 - e2) / (1.0 - e2 * sin2).powf(1.5);
    let d = (x - TM128_FALSE_EASTING) / (n1 * TM128_K0);

    let lat = phi1
        - (n1 * phi1.tan() / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lon = TM128_LON0.to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / phi1.cos();

    (lat, lon)
}

fn geodetic_to_geocentric(lat: f64, lon: f64, ell: Ellipsoid) -> (f64, f64, f64) {
    let e2 = ell.e2();
    let n = ell.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();

    (
        n * lat.cos() * lon.cos(),
        n * lat.cos() * lon.sin(),
        n * (1.0 - e2) * lat.sin(),
    )
}

fn geocentric_to_geodetic(x: f64, y: f64, z: f64, ell: Ellipsoid) -> (f64, f64) {
    let e2 = ell.e2();
    let p = x.hypot(y);
    let lon = y.atan2(x);
    let mut lat = z.atan2(p * (1.0 - e2));

    for _ in 0..10 {
        let n = ell.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        let h = p / lat.cos() - n;
        lat = z.atan2(p * (1.0 - e2 * n / (n + h)));
    }

    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs84_to_tm128(position: LatLng) -> (f64, f64) {
        let (gx, gy, gz) = geodetic_to_geocentric(
            position.lat.to_radians(),
            position.lng.to_radians(),
            WGS_84,
        );
        let (lat, lon) = geocentric_to_geodetic(
            gx - DATUM_SHIFT[0],
            gy - DATUM_SHIFT[1],
            gz - DATUM_SHIFT[2],
            BESSEL_1841,
        );

        tm_forward(lat, lon, BESSEL_1841)
    }

    fn tm_forward(lat: f64, lon: f64, ell: Ellipsoid) -> (f64, f64) {
        let e2 = ell.e2();
        let ep2 = e2 / (1.0 - e2);

        let n = ell.a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        let t = lat.tan().powi(2);
        let c = ep2 * lat.cos().powi(2);
        let a = (lon - TM128_LON0.to_radians()) * lat.cos();

        let x = TM128_K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);

        let y = TM128_K0
            * (meridian_arc(lat, ell) - meridian_arc(TM128_LAT0.to_radians(), ell)
                + n * lat.tan()
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

        (x + TM128_FALSE_EASTING, y + TM128_FALSE_NORTHING)
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} is not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn wgs84_passes_degrees_through() {
        let converter = CoordinateConverter::new(CoordinateSystem::Wgs84 { scale: 1.0 });

        let position = converter.to_display("127.0", "37.5").unwrap();

        assert_eq!(position.lng, 127.0);
        assert_eq!(position.lat, 37.5);
    }

    #[test]
    fn wgs84_applies_scale() {
        let converter = CoordinateConverter::new(CoordinateSystem::Wgs84 { scale: 1e7 });

        let position = converter.to_display("1269780000", "375665000").unwrap();

        assert_close(position.lng, 126.978, 1e-9);
        assert_close(position.lat, 37.5665, 1e-9);
    }

    #[test]
    fn malformed_number_is_invalid() {
        let converter = CoordinateConverter::new(CoordinateSystem::Tm128);

        for (x, y) in [("abc", "37.5"), ("127.0", ""), ("NaN", "37.5"), ("127.0", "inf")] {
            let err = converter.to_display(x, y).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidCoordinate { .. }), "{x}, {y}");
        }
    }

    #[test]
    fn tm128_origin_is_near_projection_center() {
        let position = tm128_to_wgs84(400_000.0, 600_000.0);

        assert_close(position.lat, 38.0, 0.01);
        assert_close(position.lng, 128.0, 0.01);
    }

    #[test]
    fn tm128_seoul_city_hall() {
        let converter = CoordinateConverter::new(CoordinateSystem::Tm128);

        let position = converter.to_display("309947", "552092").unwrap();

        assert_close(position.lat, 37.5665, 0.001);
        assert_close(position.lng, 126.978, 0.001);
    }

    #[test]
    fn tm128_round_trips() {
        for (lat, lng) in [(37.5665, 126.978), (35.1796, 129.0756), (33.5, 126.5)] {
            let (x, y) = wgs84_to_tm128(LatLng { lat, lng });
            let back = tm128_to_wgs84(x, y);

            assert_close(back.lat, lat, 1e-6);
            assert_close(back.lng, lng, 1e-6);
        }
    }

    #[test]
    fn parses_system_names() {
        assert_eq!(CoordinateSystem::parse("TM128"), Some(CoordinateSystem::Tm128));
        assert_eq!(
            CoordinateSystem::parse("wgs84e7"),
            Some(CoordinateSystem::Wgs84 { scale: 1e7 })
        );
        assert_eq!(CoordinateSystem::parse("utm"), None);
    }
}
