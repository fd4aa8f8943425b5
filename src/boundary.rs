//! Monitored airspace boundaries, loaded from an ArcGIS FeatureServer query response.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::LatLon;
use crate::overflight::Ring;
use crate::route::null_as_empty;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Altitude {
    Agl(i32),
    Msl(i32),
}

/// Vertical limits of a boundary. `None` means unbounded on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AltitudeRestriction {
    pub bottom: Option<Altitude>,
    pub top: Option<Altitude>,
}

impl AltitudeRestriction {
    pub fn new(bottom: Altitude, top: Altitude) -> Self {
        fn bound(alt: Altitude) -> Option<Altitude> {
            match alt {
                Altitude::Agl(0) => None,
                alt => Some(alt),
            }
        }

        AltitudeRestriction {
            bottom: bound(bottom),
            top: bound(top),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Boundary {
    pub ident: String,
    pub name: String,
    pub altitude: AltitudeRestriction,
    pub rings: Vec<Ring>,
}

impl Boundary {
    pub fn new<S: Into<String>>(ident: S, name: S, rings: Vec<Vec<LatLon>>) -> Self {
        Boundary {
            ident: ident.into(),
            name: name.into(),
            altitude: AltitudeRestriction::default(),
            rings: rings.into_iter().map(Ring::new).collect(),
        }
    }

    pub fn contains(&self, point: LatLon) -> bool {
        self.rings.iter().any(|r| r.contains(point))
    }

    fn from_feature(feature: Feature) -> Result<Boundary> {
        let attrs = feature.attributes;
        let bottom = parse_altitude(attrs.lower_val, attrs.lower_uom.as_deref(), attrs.lower_code.as_deref())?;
        let top = parse_altitude(attrs.upper_val, attrs.upper_uom.as_deref(), attrs.upper_code.as_deref())?;

        if feature.geometry.rings.iter().flatten().any(|c| c.len() != 2) {
            return Err(Error::InvalidCoordinate { feature: attrs.ident });
        }

        // ArcGIS orders coordinates lon, lat.
        let rings = feature
            .geometry
            .rings
            .into_iter()
            .map(|ring| Ring::new(ring.into_iter().map(|c| LatLon::new(c[1], c[0])).collect()))
            .collect();

        Ok(Boundary {
            ident: attrs.ident,
            name: attrs.name,
            altitude: AltitudeRestriction::new(bottom, top),
            rings,
        })
    }
}

fn parse_altitude(val: Option<i32>, uom: Option<&str>, code: Option<&str>) -> Result<Altitude> {
    let val = val.unwrap_or(0);
    if uom.is_none() && code.is_none() {
        return Ok(Altitude::Agl(0));
    }

    if uom != Some("FT") {
        return Err(Error::UnsupportedAltitude {
            unit: uom.unwrap_or("none").to_string(),
        });
    }

    match code {
        Some("SFC") | Some("AGL") => Ok(Altitude::Agl(val)),
        Some("MSL") => Ok(Altitude::Msl(val)),
        other => Err(Error::UnsupportedAltitude {
            unit: other.unwrap_or("none").to_string(),
        }),
    }
}

#[derive(Deserialize)]
struct AirspaceBoundaryResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    attributes: Attributes,
    #[serde(default)]
    geometry: Geometry,
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Attributes {
    #[serde(default, deserialize_with = "null_as_empty")]
    ident: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(default)]
    upper_val: Option<i32>,
    #[serde(default)]
    upper_uom: Option<String>,
    #[serde(default)]
    upper_code: Option<String>,
    #[serde(default)]
    lower_val: Option<i32>,
    #[serde(default)]
    lower_uom: Option<String>,
    #[serde(default)]
    lower_code: Option<String>,
}

#[derive(Deserialize, Default)]
struct Geometry {
    #[serde(default)]
    rings: Vec<Vec<Vec<f64>>>,
}

/// Parses every feature of a query response. One bad feature fails the lot, so callers can keep
/// the boundaries they already have.
pub fn from_arcgis(json: &str) -> Result<Vec<Boundary>> {
    let response: AirspaceBoundaryResponse = serde_json::from_str(json)?;
    let boundaries = response
        .features
        .into_par_iter()
        .map(Boundary::from_feature)
        .collect::<Result<Vec<_>>>()?;

    info!(boundaries = boundaries.len(), "Airspace boundaries loaded");
    Ok(boundaries)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Boundary>> {
    from_arcgis(&std::fs::read_to_string(path)?)
}
