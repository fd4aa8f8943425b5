use std::collections::HashMap;

use derive_builder::Builder;

use crate::geo::{GeoPoint, LatLon};

pub mod parse;

#[derive(Clone, Debug, Builder)]
#[builder(setter(into))]
pub struct Aerodrome {
    pub icao: String,
    /// IATA or FAA code, when the aerodrome has one.
    #[builder(default)]
    pub alias: Option<String>,
    pub location: LatLon,
}

impl Aerodrome {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::named(self.icao.clone(), self.location)
    }
}

#[derive(Clone, Debug, Builder)]
#[builder(setter(into))]
pub struct Fix {
    pub ident: String,
    pub location: LatLon,
}

impl Fix {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::named(self.ident.clone(), self.location)
    }
}

#[derive(Clone, Debug)]
pub struct Airway {
    pub ident: String,
    pub stops: Vec<Fix>,
}

impl Airway {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stops.iter().position(|s| s.ident == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Stops strictly between `from` and `to`, in travel order. Works both ways along the airway.
    pub fn between(&self, from: usize, to: usize) -> Vec<&Fix> {
        if from < to {
            self.stops[from + 1..to].iter().collect()
        } else if to < from {
            self.stops[to + 1..from].iter().rev().collect()
        } else {
            Vec::new()
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProcedureKind {
    Departure,
    Arrival,
    Approach,
}

impl ProcedureKind {
    pub fn is_departure(self) -> bool {
        self == ProcedureKind::Departure
    }

    pub fn is_arrival(self) -> bool {
        self == ProcedureKind::Arrival || self == ProcedureKind::Approach
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    To(GeoPoint),
    /// Leg without a fixed endpoint (heading, vector, hold).
    Unreferenced,
}

#[derive(Clone, Debug)]
pub struct ProcedureRoute {
    pub entry: Option<String>,
    pub exit: Option<String>,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug)]
pub struct Procedure {
    pub ident: String,
    pub kind: ProcedureKind,
    pub airport: String,
    pub routes: Vec<ProcedureRoute>,
}

impl Procedure {
    /// First route matching the given transitions. `None` leaves that side unspecified.
    pub fn select_route(&self, entry: Option<&str>, exit: Option<&str>) -> Option<&ProcedureRoute> {
        fn matches(wanted: Option<&str>, have: &Option<String>) -> bool {
            wanted.map_or(true, |w| have.as_deref() == Some(w))
        }

        self.routes
            .iter()
            .find(|r| matches(entry, &r.entry) && matches(exit, &r.exit))
    }
}

/// Read-only lookup tables for one navigation data cycle.
///
/// Same-named fixes, airways and procedures keep the order they were handed in;
/// that order is the tie-break wherever a lookup has to pick one.
#[derive(Debug, Default)]
pub struct NavIndex {
    aerodromes: HashMap<String, Aerodrome>,
    aliases: HashMap<String, String>,
    fixes: HashMap<String, Vec<Fix>>,
    airways: HashMap<String, Vec<Airway>>,
    procedures: HashMap<String, Vec<Procedure>>,
}

impl NavIndex {
    pub fn from_parts<A, F, W, P>(aerodromes: A, fixes: F, airways: W, procedures: P) -> Self
    where
        A: IntoIterator<Item = Aerodrome>,
        F: IntoIterator<Item = Fix>,
        W: IntoIterator<Item = Airway>,
        P: IntoIterator<Item = Procedure>,
    {
        let mut index = NavIndex::default();

        for mut ad in aerodromes {
            ad.icao = ad.icao.to_uppercase();
            ad.alias = ad.alias.map(|a| a.to_uppercase());
            if let Some(alias) = &ad.alias {
                index
                    .aliases
                    .entry(alias.clone())
                    .or_insert_with(|| ad.icao.clone());
            }
            index.aerodromes.entry(ad.icao.clone()).or_insert(ad);
        }

        for mut fix in fixes {
            fix.ident = fix.ident.to_uppercase();
            index.fixes.entry(fix.ident.clone()).or_default().push(fix);
        }

        for mut awy in airways {
            awy.ident = awy.ident.to_uppercase();
            for stop in &mut awy.stops {
                stop.ident = stop.ident.to_uppercase();
            }
            index.airways.entry(awy.ident.clone()).or_default().push(awy);
        }

        for mut prc in procedures {
            prc.ident = prc.ident.to_uppercase();
            prc.airport = prc.airport.to_uppercase();
            for route in &mut prc.routes {
                route.entry = route.entry.take().map(|e| e.to_uppercase());
                route.exit = route.exit.take().map(|e| e.to_uppercase());
            }
            index.procedures.entry(prc.ident.clone()).or_default().push(prc);
        }

        index
    }

    pub fn aerodrome(&self, icao: &str) -> Option<&Aerodrome> {
        self.aerodromes.get(icao)
    }

    pub fn aerodrome_by_alias(&self, code: &str) -> Option<&Aerodrome> {
        self.aliases.get(code).and_then(|icao| self.aerodromes.get(icao))
    }

    pub fn fixes(&self, ident: &str) -> &[Fix] {
        self.fixes.get(ident).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn airways(&self, ident: &str) -> &[Airway] {
        self.airways.get(ident).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn procedures(&self, ident: &str) -> &[Procedure] {
        self.procedures.get(ident).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn aerodrome_count(&self) -> usize {
        self.aerodromes.len()
    }

    pub fn fix_count(&self) -> usize {
        self.fixes.values().map(Vec::len).sum()
    }

    pub fn airway_count(&self) -> usize {
        self.airways.values().map(Vec::len).sum()
    }

    pub fn procedure_count(&self) -> usize {
        self.procedures.values().map(Vec::len).sum()
    }
}
