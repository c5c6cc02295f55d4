//! Named prospect sites around Lyon for realistic fixtures.
//!
//! Coordinates are approximate street-level positions; zones follow a
//! 3x3 split of the metropolitan area.

use territory_planner::model::{Sector, Zone};
use territory_planner::traits::Location;

/// A named prospect site.
#[derive(Debug, Clone)]
pub struct Site {
    pub name: &'static str,
    pub zone: Zone,
    pub sector: Sector,
    pub lat: f64,
    pub lng: f64,
}

impl Site {
    pub const fn new(name: &'static str, zone: Zone, sector: Sector, lat: f64, lng: f64) -> Self {
        Self {
            name,
            zone,
            sector,
            lat,
            lng,
        }
    }

    pub fn location(&self) -> Location {
        Location::at(self.zone, self.lat, self.lng)
    }
}

// ============================================================================
// Hotels
// ============================================================================

pub const HOTELS: &[Site] = &[
    Site::new("Hotel Carlton", Zone::Center, Sector::Hotel, 45.7597, 4.8335),
    Site::new("Villa Florentine", Zone::West, Sector::Hotel, 45.7615, 4.8240),
    Site::new("Radisson Part-Dieu", Zone::East, Sector::Hotel, 45.7610, 4.8570),
];

// ============================================================================
// Pharmacies
// ============================================================================

pub const PHARMACIES: &[Site] = &[
    Site::new("Pharmacie Bellecour", Zone::Center, Sector::Pharmacy, 45.7578, 4.8320),
    Site::new("Pharmacie Croix-Rousse", Zone::North, Sector::Pharmacy, 45.7745, 4.8310),
    Site::new("Pharmacie Villeurbanne", Zone::NorthEast, Sector::Pharmacy, 45.7665, 4.8800),
];

// ============================================================================
// Clinics
// ============================================================================

pub const CLINICS: &[Site] = &[
    Site::new("Clinique du Parc", Zone::NorthEast, Sector::Clinic, 45.7700, 4.8560),
    Site::new("Clinique Saint-Jean", Zone::SouthEast, Sector::Clinic, 45.7360, 4.8690),
];

// ============================================================================
// Enterprises and retail
// ============================================================================

pub const ENTERPRISES: &[Site] = &[
    Site::new("Gerland Biotech", Zone::South, Sector::Enterprise, 45.7290, 4.8300),
    Site::new("Vaise Logistics", Zone::NorthWest, Sector::Enterprise, 45.7790, 4.8040),
    Site::new("Confluence Offices", Zone::SouthWest, Sector::Enterprise, 45.7400, 4.8180),
];

pub const RETAIL: &[Site] = &[
    Site::new("Halles Paul Bocuse", Zone::East, Sector::Retail, 45.7630, 4.8500),
];

/// Every fixture site.
pub fn all() -> Vec<&'static Site> {
    HOTELS
        .iter()
        .chain(PHARMACIES)
        .chain(CLINICS)
        .chain(ENTERPRISES)
        .chain(RETAIL)
        .collect()
}
