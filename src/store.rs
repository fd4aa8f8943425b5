use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::boundary::Boundary;
use crate::navdata::NavIndex;

/// One consistent set of lookup tables. Cloning only bumps reference counts.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub nav: Arc<NavIndex>,
    pub boundaries: Arc<Vec<Boundary>>,
}

impl Tables {
    pub fn new(nav: NavIndex, boundaries: Vec<Boundary>) -> Self {
        Tables {
            nav: Arc::new(nav),
            boundaries: Arc::new(boundaries),
        }
    }
}

/// Holds the current tables. Replacing them never disturbs a pass that already took a copy.
#[derive(Debug, Default)]
pub struct Store {
    current: RwLock<Tables>,
}

impl Store {
    pub fn new(tables: Tables) -> Self {
        Store {
            current: RwLock::new(tables),
        }
    }

    pub fn tables(&self) -> Tables {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_nav(&self, nav: NavIndex) {
        let nav = Arc::new(nav);
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .nav = nav;
        info!("Navigation data replaced");
    }

    pub fn replace_boundaries(&self, boundaries: Vec<Boundary>) {
        let boundaries = Arc::new(boundaries);
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .boundaries = boundaries;
        info!("Airspace boundaries replaced");
    }
}
