//! Live traffic snapshots and the filtered digest built from them.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::geo::LatLon;
use crate::overflight::is_overflight;
use crate::relevance::{classify, RelevanceCategory};
use crate::route::{null_as_empty, resolve, FlightPlan, ResolvedRoute};
use crate::store::{Store, Tables};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Whazzup {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub clients: Clients,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Clients {
    #[serde(default)]
    pub pilots: Vec<Pilot>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pilot {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub callsign: String,
    #[serde(default)]
    pub last_track: Option<LastTrack>,
    #[serde(default)]
    pub flight_plan: Option<FlightPlan>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTrack {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: i32,
    #[serde(default)]
    pub ground_speed: i32,
    #[serde(default)]
    pub heading: i32,
    #[serde(default)]
    pub on_ground: bool,
}

impl LastTrack {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFlight {
    pub id: u64,
    pub callsign: String,
    pub position: Option<LatLon>,
    /// Feet, as reported by the client.
    pub altitude: Option<i32>,
    pub ground_speed: Option<i32>,
    pub heading: Option<i32>,
    pub on_ground: bool,
    pub category: RelevanceCategory,
    pub overflight: bool,
    pub route: ResolvedRoute,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub updated_at: Option<String>,
    pub flights: Vec<TrackedFlight>,
}

pub fn from_json(json: &str) -> Result<Whazzup> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Whazzup> {
    from_json(&std::fs::read_to_string(path)?)
}

/// Classifies one pilot, falling back to the overflight test when neither end is monitored.
/// Pilots without a flight plan, or with nothing tying them to the region, yield `None`.
pub fn track(pilot: &Pilot, tables: &Tables) -> Option<TrackedFlight> {
    let plan = pilot.flight_plan.as_ref()?;
    let category = classify(plan, &tables.nav);
    let track = pilot.last_track;
    let position = track.map(|t| t.position());

    let overflight = !category.is_relevant()
        && position.map_or(false, |p| is_overflight(p, &tables.boundaries));
    if !category.is_relevant() && !overflight {
        return None;
    }

    Some(TrackedFlight {
        id: pilot.id,
        callsign: pilot.callsign.clone(),
        position,
        altitude: track.map(|t| t.altitude),
        ground_speed: track.map(|t| t.ground_speed),
        heading: track.map(|t| t.heading),
        on_ground: track.map_or(false, |t| t.on_ground),
        category,
        overflight,
        route: resolve(plan, &tables.nav),
    })
}

/// Tracks every pilot of a snapshot in parallel. Output keeps the snapshot's order.
pub fn digest(whazzup: &Whazzup, tables: &Tables) -> Digest {
    let pilots = &whazzup.clients.pilots;
    let flights: Vec<TrackedFlight> = pilots
        .par_iter()
        .filter_map(|p| track(p, tables))
        .collect();

    info!(pilots = pilots.len(), tracked = flights.len(), "Snapshot digested");
    Digest {
        updated_at: whazzup.updated_at.clone(),
        flights,
    }
}

/// The most recent good digest.
#[derive(Debug, Default)]
pub struct Feed {
    latest: RwLock<Option<Arc<Digest>>>,
}

impl Feed {
    pub fn latest(&self) -> Option<Arc<Digest>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Digests a freshly fetched snapshot. A failed fetch keeps whatever was there before.
    pub fn update(&self, fetched: Result<Whazzup>, store: &Store) -> Option<Arc<Digest>> {
        match fetched {
            Ok(whazzup) => {
                let digest = Arc::new(digest(&whazzup, &store.tables()));
                *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(digest.clone());
                Some(digest)
            }
            Err(e) => {
                warn!(error = %e, "Live traffic unavailable, keeping previous snapshot");
                self.latest()
            }
        }
    }
}
