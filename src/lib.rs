//! Route expansion and regional relevance for live air traffic.
//!
//! Flight plan route strings are walked against a navigation index to produce drawable point
//! sequences, and each flight is classified by whether it departs from, arrives at, or is currently
//! over monitored airspace.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod geo;
pub mod navdata;
pub mod overflight;
pub mod relevance;
pub mod resolver;
pub mod route;
pub mod snapshot;
pub mod store;
pub mod txt_data;

pub use crate::boundary::Boundary;
pub use crate::error::{Error, Result};
pub use crate::geo::{GeoPoint, LatLon};
pub use crate::navdata::NavIndex;
pub use crate::overflight::is_overflight;
pub use crate::relevance::{classify, RelevanceCategory};
pub use crate::route::{resolve, FlightPlan, ResolvedRoute, RouteElement};
pub use crate::snapshot::{digest, Digest, TrackedFlight};
pub use crate::store::{Store, Tables};
