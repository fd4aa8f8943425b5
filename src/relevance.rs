use std::fmt;

use bitflags::bitflags;
use serde::{Serialize, Serializer};

use crate::navdata::NavIndex;
use crate::resolver::find_aerodrome;
use crate::route::FlightPlan;

bitflags! {
    /// Whether a flight departs from and/or arrives at a monitored aerodrome.
    #[derive(Default)]
    pub struct RelevanceCategory: u8 {
        const NON_RELEVANT = 0b00;
        const DEPARTURE = 0b01;
        const ARRIVAL = 0b10;
        const DOMESTIC = Self::DEPARTURE.bits | Self::ARRIVAL.bits;
    }
}

impl RelevanceCategory {
    pub fn is_relevant(self) -> bool {
        !self.is_empty()
    }

    pub fn name(self) -> &'static str {
        match self.bits() {
            0b01 => "departure",
            0b10 => "arrival",
            0b11 => "domestic",
            _ => "none",
        }
    }
}

impl fmt::Display for RelevanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for RelevanceCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

pub fn classify(plan: &FlightPlan, nav: &NavIndex) -> RelevanceCategory {
    let known = |id: &Option<String>| id.as_deref().and_then(|id| find_aerodrome(id, nav)).is_some();

    let mut category = RelevanceCategory::NON_RELEVANT;
    if known(&plan.departure_id) {
        category |= RelevanceCategory::DEPARTURE;
    }
    if known(&plan.arrival_id) {
        category |= RelevanceCategory::ARRIVAL;
    }
    category
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use crate::navdata::AerodromeBuilder;

    fn nav() -> NavIndex {
        let ad = |icao: &str| {
            AerodromeBuilder::default()
                .icao(icao)
                .location(LatLon::new(0.0, 0.0))
                .build()
                .unwrap()
        };
        NavIndex::from_parts(vec![ad("KJFK"), ad("KLAX")], vec![], vec![], vec![])
    }

    #[test]
    fn classify_sets_bits_per_known_endpoint() {
        let nav = nav();
        let classify = |dep, arr| classify(&FlightPlan::new(dep, arr, ""), &nav);

        assert_eq!(classify(Some("KJFK"), Some("KLAX")), RelevanceCategory::DOMESTIC);
        assert_eq!(classify(Some("KJFK"), Some("EGLL")), RelevanceCategory::DEPARTURE);
        assert_eq!(classify(Some("MMMX"), Some("klax")), RelevanceCategory::ARRIVAL);
        assert_eq!(classify(Some("MMMX"), Some("EGLL")), RelevanceCategory::NON_RELEVANT);
        assert_eq!(classify(None, None), RelevanceCategory::NON_RELEVANT);
    }

    #[test]
    fn domestic_is_union_of_departure_and_arrival() {
        let both = RelevanceCategory::DEPARTURE | RelevanceCategory::ARRIVAL;
        assert_eq!(both, RelevanceCategory::DOMESTIC);
        assert!(both.contains(RelevanceCategory::ARRIVAL));
        assert!(!RelevanceCategory::DEPARTURE.contains(RelevanceCategory::ARRIVAL));
        assert!(!RelevanceCategory::NON_RELEVANT.is_relevant());
        assert_eq!(RelevanceCategory::NON_RELEVANT, RelevanceCategory::empty());
        assert_eq!(RelevanceCategory::default(), RelevanceCategory::NON_RELEVANT);
        assert_eq!(both.bits(), 0b11);

        let mut category = RelevanceCategory::NON_RELEVANT;
        category |= RelevanceCategory::DEPARTURE;
        assert_eq!(category, RelevanceCategory::DEPARTURE);
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(serde_json::to_string(&RelevanceCategory::ARRIVAL).unwrap(), r#""arrival""#);
        assert_eq!(RelevanceCategory::NON_RELEVANT.to_string(), "none");
    }
}
