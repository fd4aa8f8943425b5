use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;
use tracing::{info, warn};

use super::*;
use crate::error::{Error, Result};
use crate::resolver::nearest_fix;
use crate::txt_data::{DataFile, Record};

const UNSPECIFIED: &str = "*";
const NO_ALIAS: &str = "-";
const ANONYMOUS: &str = "@";

fn location(r: &Record, at: usize) -> Option<LatLon> {
    LatLon::parse(r.get(at)?, r.get(at + 1)?)
}

fn transition(raw: &str) -> Option<String> {
    if raw == UNSPECIFIED {
        None
    } else {
        Some(raw.to_uppercase())
    }
}

fn get_aerodrome(r: &Record) -> Result<Aerodrome> {
    let mut aerodrome = AerodromeBuilder::default();

    if let Some(icao) = r.get(0) {
        aerodrome.icao(icao);
    }
    if let Some(alias) = r.get(1).filter(|a| *a != NO_ALIAS) {
        aerodrome.alias(Some(alias.to_string()));
    }
    if let Some(latlon) = location(r, 2) {
        aerodrome.location(latlon);
    }

    aerodrome.build().map_err(|_| Error::NotYielded)
}

fn get_fix(r: &Record) -> Result<Fix> {
    let mut fix = FixBuilder::default();

    if let Some(ident) = r.get(0) {
        fix.ident(ident.to_uppercase());
    }
    if let Some(latlon) = location(r, 1) {
        fix.location(latlon);
    }

    fix.build().map_err(|_| Error::NotYielded)
}

pub fn get_aerodromes(data: &DataFile) -> Vec<Aerodrome> {
    data.records("APT")
        .filter_map(|r| match get_aerodrome(&r) {
            Ok(aerodrome) => Some(aerodrome),
            Err(_) => {
                warn!(line = r.line, "Bad APT record, ignoring");
                None
            }
        })
        .collect()
}

pub fn get_fixes(data: &DataFile) -> Vec<Fix> {
    data.records("FIX")
        .filter_map(|r| match get_fix(&r) {
            Ok(fix) => Some(fix),
            Err(_) => {
                warn!(line = r.line, "Bad FIX record, ignoring");
                None
            }
        })
        .collect()
}

/// Airway stops come one per record. A sequence number that does not increase starts a new airway
/// with the same identifier.
pub fn get_airways(data: &DataFile, fixes: &[Fix]) -> Vec<Airway> {
    let by_name = fixes.iter().map(|f| (f.ident.as_str(), f)).into_group_map();
    let mut airways: Vec<Airway> = Vec::new();
    let mut open: HashMap<String, (u32, usize)> = HashMap::new();

    for r in data.records("AWY") {
        let seq = r.get(1).and_then(|s| s.parse::<u32>().ok());
        let (ident, seq, name) = match (r.get(0), seq, r.get(2)) {
            (Some(ident), Some(seq), Some(name)) => (ident.to_uppercase(), seq, name.to_uppercase()),
            _ => {
                warn!(line = r.line, "Bad AWY record, ignoring");
                continue;
            }
        };

        let slot = match open.get(&ident) {
            Some(&(prev, slot)) if seq > prev => slot,
            _ => {
                airways.push(Airway {
                    ident: ident.clone(),
                    stops: Vec::new(),
                });
                airways.len() - 1
            }
        };
        open.insert(ident, (seq, slot));

        let previous = airways[slot].stops.last().map(|s| s.location);
        let latlon = location(&r, 3).or_else(|| {
            by_name
                .get(name.as_str())
                .and_then(|candidates| nearest_fix(candidates.iter().copied(), previous))
                .map(|f| f.location)
        });

        match latlon {
            Some(location) => airways[slot].stops.push(Fix { ident: name, location }),
            None => warn!(line = r.line, fix = %name, "Unknown airway stop, ignoring"),
        }
    }

    airways.retain(|a| !a.stops.is_empty());
    airways
}

/// One instruction per record. Records sharing kind, identifier and airport make one procedure;
/// within it, records sharing an entry/exit pair make one route.
pub fn get_procedures(data: &DataFile, fixes: &[Fix]) -> Vec<Procedure> {
    let by_name = fixes.iter().map(|f| (f.ident.as_str(), f)).into_group_map();
    let mut procedures: Vec<Procedure> = Vec::new();
    let mut open: HashMap<(ProcedureKind, String, String), usize> = HashMap::new();

    let kinds = [
        ("SID", ProcedureKind::Departure),
        ("STAR", ProcedureKind::Arrival),
        ("APCH", ProcedureKind::Approach),
    ];

    for &(ty, kind) in kinds.iter() {
        for r in data.records(ty) {
            let (ident, airport, entry, exit, fix) = match (r.get(0), r.get(1), r.get(2), r.get(3), r.get(4)) {
                (Some(i), Some(a), Some(en), Some(ex), Some(f)) => {
                    (i.to_uppercase(), a.to_uppercase(), transition(en), transition(ex), f.to_uppercase())
                }
                _ => {
                    warn!(line = r.line, record = ty, "Bad procedure record, ignoring");
                    continue;
                }
            };

            let slot = *open
                .entry((kind, ident.clone(), airport.clone()))
                .or_insert_with(|| {
                    procedures.push(Procedure {
                        ident,
                        kind,
                        airport,
                        routes: Vec::new(),
                    });
                    procedures.len() - 1
                });

            let routes = &mut procedures[slot].routes;
            let at = match routes.iter().position(|rt| rt.entry == entry && rt.exit == exit) {
                Some(at) => at,
                None => {
                    routes.push(ProcedureRoute {
                        entry,
                        exit,
                        instructions: Vec::new(),
                    });
                    routes.len() - 1
                }
            };
            let route = &mut routes[at];

            let previous = route.instructions.iter().rev().find_map(|i| match i {
                Instruction::To(point) => Some(point.latlon),
                Instruction::Unreferenced => None,
            });

            let instruction = if fix == UNSPECIFIED {
                Instruction::Unreferenced
            } else if fix == ANONYMOUS {
                match location(&r, 5) {
                    Some(latlon) => Instruction::To(GeoPoint::anonymous(latlon)),
                    None => {
                        warn!(line = r.line, "Anonymous procedure point without a location");
                        Instruction::Unreferenced
                    }
                }
            } else {
                let latlon = location(&r, 5).or_else(|| {
                    by_name
                        .get(fix.as_str())
                        .and_then(|candidates| nearest_fix(candidates.iter().copied(), previous))
                        .map(|f| f.location)
                });
                match latlon {
                    Some(latlon) => Instruction::To(GeoPoint::named(fix, latlon)),
                    None => {
                        warn!(line = r.line, fix = %fix, "Unknown procedure fix, leaving a gap");
                        Instruction::Unreferenced
                    }
                }
            };
            route.instructions.push(instruction);
        }
    }

    procedures
}

/// Builds a navigation index from a text data file. Malformed records are skipped.
pub fn load(data: &DataFile) -> NavIndex {
    let aerodromes = get_aerodromes(data);
    let fixes = get_fixes(data);
    let airways = get_airways(data, &fixes);
    let procedures = get_procedures(data, &fixes);

    let index = NavIndex::from_parts(aerodromes, fixes, airways, procedures);
    info!(
        aerodromes = index.aerodrome_count(),
        fixes = index.fix_count(),
        airways = index.airway_count(),
        procedures = index.procedure_count(),
        "Navigation data loaded"
    );
    index
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<NavIndex> {
    Ok(load(&DataFile::from_file(path)?))
}
