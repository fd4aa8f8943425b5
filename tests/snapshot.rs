use foresite::navdata::parse;
use foresite::snapshot::{self, Feed};
use foresite::txt_data::DataFile;
use foresite::{boundary, classify, resolve, FlightPlan, RelevanceCategory, RouteElement, Store, Tables};

const NAVDATA: &str = "\
;==========================================
; Aerodromes
APT KJFK JFK 40-38-23.740N 073-46-43.293W
APT KLAX LAX 33-56-33.000N 118-24-29.000W
APT KBOS BOS 42.3656 -71.0096
;==========================================
; Fixes
FIX MERIT 41.3819 -73.1367
FIX HFD 41.6400 -72.5470
FIX PUT 41.9560 -71.8440
FIX ABCXY 42.1500 -71.3000
FIX MERIT -33.0 151.0
;==========================================
; Airways
AWY J121 10 MERIT
AWY J121 20 HFD
AWY J121 30 PUT
AWY J121 40 ABCXY
;==========================================
; Procedures
SID DEEZZ5 KJFK RW31L * *
SID DEEZZ5 KJFK * MERIT DEEZZ 40.75 -73.60
SID DEEZZ5 KJFK * MERIT MERIT
STAR ROBUC3 KBOS ABCXY * @ 42.30 -71.10
STAR ROBUC3 KBOS ABCXY * *
";

const BOUNDARIES: &str = r#"{
    "features": [{
        "attributes": {"IDENT": "ZNY", "NAME": "NEW YORK", "LOWER_UOM": "FT", "LOWER_CODE": "SFC",
                       "LOWER_VAL": 0, "UPPER_UOM": "FT", "UPPER_CODE": "MSL", "UPPER_VAL": 60000},
        "geometry": {"rings": [[[-75.0, 38.0], [-69.0, 38.0], [-69.0, 43.0], [-75.0, 43.0]]]}
    }]
}"#;

const WHAZZUP: &str = r#"{
    "updatedAt": "2024-05-01T12:00:00Z",
    "clients": {
        "pilots": [
            {"id": 1, "callsign": "AAL100",
             "lastTrack": {"latitude": 40.7, "longitude": -74.0},
             "flightPlan": {"departureId": "KJFK", "arrivalId": "KLAX", "route": "DCT"}},
            {"id": 2, "callsign": "AMX001",
             "lastTrack": {"latitude": 40.0, "longitude": -71.0},
             "flightPlan": {"departureId": "MMMX", "arrivalId": "EGLL", "route": "UPTUB N0480F370 DCT"}},
            {"id": 3, "callsign": "BAW15",
             "lastTrack": {"latitude": 51.0, "longitude": -20.0},
             "flightPlan": {"departureId": "EGLL", "arrivalId": "OMDB", "route": "DVR L9 KONAN"}},
            {"id": 4, "callsign": "JBU22",
             "lastTrack": {"latitude": 41.0, "longitude": -73.0},
             "flightPlan": {"departureId": "JFK", "arrivalId": "KBOS",
                            "route": "DEEZZ5 MERIT J121 ABCXY ROBUC3"}},
            {"id": 5, "callsign": "N172SP", "lastTrack": {"latitude": 40.8, "longitude": -73.1}}
        ]
    }
}"#;

fn tables() -> Tables {
    let nav = parse::load(&DataFile::from_text(NAVDATA));
    Tables::new(nav, boundary::from_arcgis(BOUNDARIES).unwrap())
}

fn names(elements: &[RouteElement]) -> Vec<String> {
    elements
        .iter()
        .map(|e| match e {
            RouteElement::Point(p) => p.name().unwrap_or("@").to_string(),
            RouteElement::Gap => "-".to_string(),
        })
        .collect()
}

#[test]
fn digest_keeps_relevant_and_overflying_flights() {
    let whazzup = snapshot::from_json(WHAZZUP).unwrap();
    let digest = snapshot::digest(&whazzup, &tables());

    let callsigns: Vec<_> = digest.flights.iter().map(|f| f.callsign.as_str()).collect();
    assert_eq!(callsigns, vec!["AAL100", "AMX001", "JBU22"]);

    let aal = &digest.flights[0];
    assert_eq!(aal.category, RelevanceCategory::DOMESTIC);
    assert_eq!(names(aal.route.elements()), vec!["KJFK", "KLAX"]);

    let amx = &digest.flights[1];
    assert_eq!(amx.category, RelevanceCategory::NON_RELEVANT);
    assert!(amx.overflight);
    assert!(amx.route.is_empty());
}

#[test]
fn full_route_through_procedures_and_airway() {
    let tables = tables();
    let plan = FlightPlan::new(Some("JFK"), Some("KBOS"), "DEEZZ5 MERIT J121 ABCXY ROBUC3");

    assert_eq!(
        names(resolve(&plan, &tables.nav).elements()),
        vec!["KJFK", "DEEZZ", "MERIT", "MERIT", "HFD", "PUT", "ABCXY", "@", "-", "KBOS"]
    );
    assert_eq!(classify(&plan, &tables.nav), RelevanceCategory::DOMESTIC);
}

#[test]
fn reverse_airway_walks_backwards() {
    let tables = tables();
    let plan = FlightPlan::new(Some("KBOS"), Some("KJFK"), "ABCXY J121 MERIT");

    assert_eq!(
        names(resolve(&plan, &tables.nav).elements()),
        vec!["KBOS", "ABCXY", "PUT", "HFD", "MERIT", "KJFK"]
    );
}

#[test]
fn feed_survives_a_bad_fetch() {
    let store = Store::new(tables());
    let feed = Feed::default();

    let first = feed.update(snapshot::from_json(WHAZZUP), &store).unwrap();
    let second = feed.update(snapshot::from_json("<html>502</html>"), &store).unwrap();
    assert_eq!(first.flights.len(), second.flights.len());
    assert_eq!(second.updated_at.as_deref(), Some("2024-05-01T12:00:00Z"));
}

#[test]
fn digest_serializes_for_the_map() {
    let whazzup = snapshot::from_json(WHAZZUP).unwrap();
    let digest = snapshot::digest(&whazzup, &tables());
    let json = serde_json::to_value(&digest).unwrap();

    assert_eq!(json["updatedAt"], "2024-05-01T12:00:00Z");
    assert_eq!(json["flights"][0]["category"], "domestic");
    assert_eq!(json["flights"][0]["route"][0]["kind"], "point");
    assert_eq!(json["flights"][0]["route"][0]["name"], "KJFK");
    assert_eq!(json["flights"][1]["overflight"], true);
}
