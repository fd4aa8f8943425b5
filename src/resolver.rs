//! Identifier lookups against a navigation index.

use crate::geo::LatLon;
use crate::navdata::{Aerodrome, Airway, Fix, NavIndex, Procedure};

/// What a route token names, in lookup priority order.
#[derive(Clone, Copy, Debug)]
pub enum Resolution<'a> {
    Aerodrome(&'a Aerodrome),
    Procedure(&'a [Procedure]),
    Fix(&'a [Fix]),
    Airway(&'a [Airway]),
    Unresolvable,
}

/// Finds an aerodrome by ICAO code, then by IATA/FAA alias, then with a stray leading `K` removed.
pub fn find_aerodrome<'a>(code: &str, nav: &'a NavIndex) -> Option<&'a Aerodrome> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return None;
    }

    if let Some(ad) = nav.aerodrome(&code) {
        return Some(ad);
    }

    if let Some(ad) = nav.aerodrome_by_alias(&code) {
        return Some(ad);
    }

    // Non-US identifiers typed with a K in front.
    if code.starts_with('K') && code.chars().count() == 4 {
        find_aerodrome(&code[1..], nav)
    } else {
        None
    }
}

pub fn resolve_token<'a>(token: &str, nav: &'a NavIndex) -> Resolution<'a> {
    if let Some(ad) = find_aerodrome(token, nav) {
        return Resolution::Aerodrome(ad);
    }

    let procedures = nav.procedures(token);
    if !procedures.is_empty() {
        return Resolution::Procedure(procedures);
    }

    let fixes = nav.fixes(token);
    if !fixes.is_empty() {
        return Resolution::Fix(fixes);
    }

    let airways = nav.airways(token);
    if !airways.is_empty() {
        return Resolution::Airway(airways);
    }

    Resolution::Unresolvable
}

/// Candidate closest to `from` on the plane. Equal distances go to the earliest candidate,
/// and without a reference point the first candidate wins.
pub fn nearest_fix<'a, I>(candidates: I, from: Option<LatLon>) -> Option<&'a Fix>
where
    I: IntoIterator<Item = &'a Fix>,
{
    let mut candidates = candidates.into_iter();
    match from {
        None => candidates.next(),
        Some(from) => candidates.min_by(|a, b| {
            a.location
                .planar_distance_sq(from)
                .total_cmp(&b.location.planar_distance_sq(from))
        }),
    }
}

/// The procedure published for one of `airports`, else the first one defined.
pub fn scoped_procedure<'a>(variants: &'a [Procedure], airports: &[String]) -> Option<&'a Procedure> {
    variants
        .iter()
        .find(|p| airports.iter().any(|a| *a == p.airport))
        .or_else(|| variants.first())
}

/// The first airway variant that passes through `last`.
pub fn airway_from<'a>(variants: &'a [Airway], last: Option<&str>) -> Option<&'a Airway> {
    let last = last?;
    variants.iter().find(|a| a.contains(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navdata::{AerodromeBuilder, ProcedureKind};

    fn fix(ident: &str, lat: f64, lon: f64) -> Fix {
        Fix {
            ident: ident.into(),
            location: LatLon::new(lat, lon),
        }
    }

    fn aerodrome(icao: &str, alias: Option<&str>) -> Aerodrome {
        let mut builder = AerodromeBuilder::default();
        builder.icao(icao).location(LatLon::new(0.0, 0.0));
        if let Some(alias) = alias {
            builder.alias(Some(alias.to_string()));
        }
        builder.build().unwrap()
    }

    fn procedure(ident: &str, airport: &str) -> Procedure {
        Procedure {
            ident: ident.into(),
            kind: ProcedureKind::Arrival,
            airport: airport.into(),
            routes: Vec::new(),
        }
    }

    fn index() -> NavIndex {
        NavIndex::from_parts(
            vec![
                aerodrome("KJFK", Some("JFK")),
                aerodrome("EGLL", None),
                aerodrome("PHNL", Some("HNL")),
            ],
            vec![fix("MERIT", 41.0, -73.0), fix("Q1", 1.0, 1.0)],
            vec![Airway {
                ident: "J121".into(),
                stops: vec![fix("MERIT", 41.0, -73.0)],
            }],
            vec![procedure("Q1", "KJFK")],
        )
    }

    #[test]
    fn aerodrome_aliasing() {
        let nav = index();
        let icao = |code: &str| find_aerodrome(code, &nav).map(|a| a.icao.clone());

        assert_eq!(icao("kjfk").as_deref(), Some("KJFK"));
        assert_eq!(icao("JFK").as_deref(), Some("KJFK"));
        assert_eq!(icao("KEGLL").as_deref(), None);
        assert_eq!(icao("KHNL").as_deref(), Some("PHNL"));
        assert_eq!(icao("EGLL").as_deref(), Some("EGLL"));
        assert_eq!(icao("KXYZ").as_deref(), None);
        assert_eq!(icao("").as_deref(), None);
    }

    #[test]
    fn stray_k_only_applies_to_four_letter_codes() {
        let nav = NavIndex::from_parts(vec![aerodrome("EGL", None)], vec![], vec![], vec![]);
        assert!(find_aerodrome("KEGL", &nav).is_some());
        assert!(find_aerodrome("KKEGL", &nav).is_none());
    }

    #[test]
    fn lookup_order_is_aerodrome_procedure_fix_airway() {
        let nav = index();
        assert!(matches!(resolve_token("JFK", &nav), Resolution::Aerodrome(_)));
        assert!(matches!(resolve_token("Q1", &nav), Resolution::Procedure(_)));
        assert!(matches!(resolve_token("MERIT", &nav), Resolution::Fix(_)));
        assert!(matches!(resolve_token("J121", &nav), Resolution::Airway(_)));
        assert!(matches!(resolve_token("N0450F350", &nav), Resolution::Unresolvable));
    }

    #[test]
    fn nearest_fix_prefers_closest_then_first_defined() {
        let fixes = vec![
            fix("DUP", 10.0, 0.0),
            fix("DUP", -10.0, 0.0),
            fix("DUP", 1.0, 0.0),
        ];
        let pick = |from| nearest_fix(&fixes, from).map(|f| f.location.lat());

        assert_eq!(pick(None), Some(10.0));
        assert_eq!(pick(Some(LatLon::new(0.5, 0.0))), Some(1.0));
        // Equidistant candidates go to the first defined.
        let tied = &fixes[..2];
        assert_eq!(
            nearest_fix(tied, Some(LatLon::new(0.0, 0.0))).map(|f| f.location.lat()),
            Some(10.0)
        );
        assert!(nearest_fix(&[], None).is_none());
    }

    #[test]
    fn scoped_procedure_falls_back_to_first() {
        let variants = vec![procedure("ROBUC3", "KJFK"), procedure("ROBUC3", "KLGA")];
        let scope = |airports: &[&str]| {
            let airports: Vec<String> = airports.iter().map(|a| a.to_string()).collect();
            scoped_procedure(&variants, &airports).map(|p| p.airport.clone())
        };

        assert_eq!(scope(&["EGLL", "KLGA"]).as_deref(), Some("KLGA"));
        assert_eq!(scope(&["EGLL"]).as_deref(), Some("KJFK"));
        assert!(scoped_procedure(&[], &[]).is_none());
    }

    #[test]
    fn airway_from_needs_last_on_the_airway() {
        let nav = index();
        let variants = nav.airways("J121");
        assert!(airway_from(variants, Some("MERIT")).is_some());
        assert!(airway_from(variants, Some("SIE")).is_none());
        assert!(airway_from(variants, None).is_none());
    }
}
