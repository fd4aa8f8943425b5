//! Expands a flight plan's route string into geographic points.
//!
//! The walk is a fold over route tokens. Its state is the last fixed point, an airway waiting for
//! its exit fix, and the points emitted so far. Tokens that resolve to nothing are skipped, so a
//! garbled route still yields whatever could be placed.

use std::iter;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::geo::GeoPoint;
use crate::navdata::{Aerodrome, Airway, Instruction, NavIndex, Procedure};
use crate::resolver::{self, Resolution};

const DIRECT: &str = "DCT";

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPlan {
    #[serde(default)]
    pub departure_id: Option<String>,
    #[serde(default)]
    pub arrival_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub route: String,
}

pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

impl FlightPlan {
    pub fn new<S: Into<String>>(departure: Option<&str>, arrival: Option<&str>, route: S) -> Self {
        FlightPlan {
            departure_id: departure.map(str::to_string),
            arrival_id: arrival.map(str::to_string),
            route: route.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteElement {
    Point(GeoPoint),
    /// A leg that could not be placed on the map. Breaks line drawing.
    Gap,
}

impl From<&Instruction> for RouteElement {
    fn from(instruction: &Instruction) -> Self {
        match instruction {
            Instruction::To(point) => RouteElement::Point(point.clone()),
            Instruction::Unreferenced => RouteElement::Gap,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedRoute(Vec<RouteElement>);

impl ResolvedRoute {
    pub fn elements(&self) -> &[RouteElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.0.iter().filter_map(|e| match e {
            RouteElement::Point(p) => Some(p),
            RouteElement::Gap => None,
        })
    }
}

/// Upper-cased route tokens with any `/speed-level` suffix removed.
pub fn tokenize(route: &str) -> impl Iterator<Item = String> + '_ {
    route.split_whitespace().filter_map(|t| {
        t.split('/')
            .next()
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    })
}

struct Scope<'a> {
    nav: &'a NavIndex,
    /// Departure and arrival identifiers, used to pick between same-named procedures.
    airports: Vec<String>,
}

struct Walk<'a> {
    last: Option<GeoPoint>,
    pending: Option<&'a Airway>,
    out: Vec<RouteElement>,
}

impl<'a> Walk<'a> {
    fn start(departure: Option<&Aerodrome>) -> Self {
        let last = departure.map(Aerodrome::point);
        Walk {
            out: last.iter().cloned().map(RouteElement::Point).collect(),
            last,
            pending: None,
        }
    }

    fn last_name(&self) -> Option<&str> {
        self.last.as_ref().and_then(GeoPoint::name)
    }

    /// Emits the stops of the pending airway between `last` and `endpoint`.
    fn flush_airway(mut self, endpoint: &str) -> Self {
        if let Some(airway) = self.pending.take() {
            let entry = self.last_name().and_then(|name| airway.position(name));
            match (entry, airway.position(endpoint)) {
                (Some(from), Some(to)) => self.out.extend(
                    airway
                        .between(from, to)
                        .into_iter()
                        .map(|stop| RouteElement::Point(stop.point())),
                ),
                _ => debug!(airway = %airway.ident, endpoint, "Airway does not join up, skipping"),
            }
        }
        self
    }

    fn arrive_at(self, point: GeoPoint) -> Self {
        let endpoint = point.name.clone().unwrap_or_default();
        let mut walk = self.flush_airway(&endpoint);
        walk.out.push(RouteElement::Point(point.clone()));
        walk.last = Some(point);
        walk
    }

    fn fly_procedure(mut self, scope: &Scope<'a>, variants: &'a [Procedure], next: Option<&str>) -> Self {
        let procedure = match resolver::scoped_procedure(variants, &scope.airports) {
            Some(p) => p,
            None => return self,
        };

        let departure = next
            .filter(|_| procedure.kind.is_departure())
            .and_then(|next| procedure.select_route(None, Some(next)));
        let selected = departure.or_else(|| {
            self.last_name()
                .filter(|_| procedure.kind.is_arrival())
                .and_then(|last| procedure.select_route(Some(last), None))
        });

        match selected {
            Some(route) => self.out.extend(route.instructions.iter().map(RouteElement::from)),
            None => {
                for (i, route) in procedure.routes.iter().enumerate() {
                    if i > 0 {
                        self.out.push(RouteElement::Gap);
                    }
                    self.out.extend(route.instructions.iter().map(RouteElement::from));
                }
            }
        }
        self
    }

    fn step(mut self, scope: &Scope<'a>, token: &str, next: Option<&str>) -> Self {
        if token == DIRECT {
            return self;
        }

        match resolver::resolve_token(token, scope.nav) {
            Resolution::Aerodrome(ad) => self.arrive_at(ad.point()),
            Resolution::Procedure(variants) => self.fly_procedure(scope, variants, next),
            Resolution::Fix(fixes) => {
                let from = self.last.as_ref().map(|p| p.latlon);
                match resolver::nearest_fix(fixes, from) {
                    Some(fix) => self.arrive_at(fix.point()),
                    None => self,
                }
            }
            Resolution::Airway(variants) => {
                self.pending = resolver::airway_from(variants, self.last_name());
                self
            }
            Resolution::Unresolvable => {
                debug!(token, "Unresolvable route token");
                self.pending = None;
                self
            }
        }
    }

    fn finish(mut self, arrival: Option<&Aerodrome>) -> ResolvedRoute {
        if let Some(ad) = arrival {
            self.out.push(RouteElement::Point(ad.point()));
        }

        ResolvedRoute(
            self.out
                .into_iter()
                .filter(|e| !matches!(e, RouteElement::Point(p) if p.is_artifact()))
                .collect(),
        )
    }
}

/// Resolves a flight plan to the points it passes through, departure and arrival included when
/// they are known aerodromes.
pub fn resolve(plan: &FlightPlan, nav: &NavIndex) -> ResolvedRoute {
    let departure = plan
        .departure_id
        .as_deref()
        .and_then(|id| resolver::find_aerodrome(id, nav));
    let arrival = plan
        .arrival_id
        .as_deref()
        .and_then(|id| resolver::find_aerodrome(id, nav));

    let scope = Scope {
        nav,
        airports: vec![
            airport_key(departure, plan.departure_id.as_deref()),
            airport_key(arrival, plan.arrival_id.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect(),
    };

    let tokens: Vec<String> = tokenize(&plan.route).collect();
    tokens
        .iter()
        .map(|t| Some(t.as_str()))
        .chain(iter::once(None))
        .tuple_windows()
        .filter_map(|(token, next)| token.map(|token| (token, next)))
        .fold(Walk::start(departure), |walk, (token, next)| {
            walk.step(&scope, token, next)
        })
        .finish(arrival)
}

fn airport_key(resolved: Option<&Aerodrome>, raw: Option<&str>) -> Option<String> {
    resolved
        .map(|ad| ad.icao.clone())
        .or_else(|| raw.map(|r| r.trim().to_uppercase()))
}
