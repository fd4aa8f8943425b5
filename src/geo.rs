use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Latitude and longitude in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatLon(f64, f64);

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon(lat, lon)
    }

    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    /// Squared planar distance in degrees. Only good for comparing nearby candidates.
    pub fn planar_distance_sq(self, other: LatLon) -> f64 {
        let (dlat, dlon) = (self.0 - other.0, self.1 - other.1);
        dlat * dlat + dlon * dlon
    }

    /// Accepts either decimal degrees or the FAA text form handled by `from_fix_txt`.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) if lat.abs() <= 90.0 && lon.abs() <= 180.0 => Some(LatLon(lat, lon)),
            (Ok(_), Ok(_)) => None,
            _ => Self::from_fix_txt(lat, lon),
        }
    }

    //Ex: 31-53-00.510N
    pub fn from_fix_txt(lat: &str, lon: &str) -> Option<Self> {
        fn to_dd(d: f64, m: f64, s: f64) -> f64 {
            d + m / 60.0 + s / 3600.0
        }

        lazy_static! {
            static ref LAT_LON_REGEX: Regex =
                Regex::new(r"^(\d+)-(\d+)-(\d+(?:\.\d+)?)([NSEW])$").unwrap();
        }

        let component = |raw: &str| {
            LAT_LON_REGEX.captures(raw).and_then(|cap| {
                let (d, m, s, dir) = (&cap[1], &cap[2], &cap[3], &cap[4]);
                let (d, m, s) = (d.parse().ok()?, m.parse().ok()?, s.parse().ok()?);
                let dd = to_dd(d, m, s);
                Some(if dir == "S" || dir == "W" { -dd } else { dd })
            })
        };

        match (component(lat), component(lon)) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)),
            _ => None,
        }
    }
}

/// A location that is either named (fix, aerodrome) or anonymous (procedure turn point).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub name: Option<String>,
    pub latlon: LatLon,
}

impl GeoPoint {
    pub fn named<S: Into<String>>(name: S, latlon: LatLon) -> Self {
        GeoPoint {
            name: Some(name.into()),
            latlon,
        }
    }

    pub fn anonymous(latlon: LatLon) -> Self {
        GeoPoint { name: None, latlon }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// A named point whose name is empty is a leftover from a bad record.
    pub fn is_artifact(&self) -> bool {
        self.name.as_deref() == Some("")
    }
}
