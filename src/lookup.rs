//! Fixed advisory tables shown next to a prediction.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub id: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub name: &'static str,
}

pub const ZONES: [Zone; 3] = [
    Zone {
        id: "A",
        latitude: 44.69,
        longitude: -63.60,
        radius_km: 5.0,
        name: "Near Bedford Basin",
    },
    Zone {
        id: "B",
        latitude: 44.66,
        longitude: -63.56,
        radius_km: 7.0,
        name: "Near Point Pleasant",
    },
    Zone {
        id: "C",
        latitude: 44.63,
        longitude: -63.53,
        radius_km: 10.0,
        name: "Near McNabs Island",
    },
];

const FALLBACK_ZONE: usize = 1;

/// Accepts either the bare identifier (`"A"`) or the service label (`"Zone A"`).
pub fn zone(id: &str) -> Option<&'static Zone> {
    let id = id.trim();
    let id = id.strip_prefix("Zone ").unwrap_or(id).trim();
    ZONES.iter().find(|zone| zone.id.eq_ignore_ascii_case(id))
}

/// Zone to centre the map on; unknown identifiers fall back to zone B.
pub fn display_zone(gps_zone: &str) -> &'static Zone {
    zone(gps_zone).unwrap_or(&ZONES[FALLBACK_ZONE])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingTips {
    pub species: &'static str,
    pub bait: &'static str,
    pub best_time: &'static str,
    pub gear: &'static str,
}

pub const FISHING_TIPS: [FishingTips; 5] = [
    FishingTips {
        species: "Cod",
        bait: "Use squid or clams as bait.",
        best_time: "Best fished at dawn or dusk.",
        gear: "Medium-heavy rod with 20-30 lb line.",
    },
    FishingTips {
        species: "Haddock",
        bait: "Try shrimp or small fish like herring.",
        best_time: "Fish during early morning hours.",
        gear: "Light to medium rod with 15-20 lb line.",
    },
    FishingTips {
        species: "Salmon",
        bait: "Use spoons or spinners.",
        best_time: "Fish in the evening or early morning.",
        gear: "Medium rod with 10-20 lb line.",
    },
    FishingTips {
        species: "Mackerel",
        bait: "Use small jigs or feathers.",
        best_time: "Fish during mid-day when they're most active.",
        gear: "Light rod with 8-12 lb line.",
    },
    FishingTips {
        species: "Halibut",
        bait: "Use large bait like herring or mackerel.",
        best_time: "Fish during slack tides.",
        gear: "Heavy rod with 50-80 lb line.",
    },
];

pub fn fishing_tips(species: &str) -> Option<&'static FishingTips> {
    let species = species.trim();
    FISHING_TIPS
        .iter()
        .find(|tips| tips.species.eq_ignore_ascii_case(species))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearRecommendation {
    pub species: &'static str,
    pub rod: &'static str,
    pub reel: &'static str,
    pub bait: &'static str,
}

pub const GEAR_GUIDE: [GearRecommendation; 5] = [
    GearRecommendation {
        species: "Cod",
        rod: "Medium-heavy rod (20-30 lb line)",
        reel: "Spinning reel (3000-4000 size)",
        bait: "Squid or clams",
    },
    GearRecommendation {
        species: "Haddock",
        rod: "Light to medium rod (15-20 lb line)",
        reel: "Spinning reel (2500-3000 size)",
        bait: "Shrimp or small herring",
    },
    GearRecommendation {
        species: "Salmon",
        rod: "Medium rod (10-20 lb line)",
        reel: "Baitcasting reel",
        bait: "Spoons or spinners",
    },
    GearRecommendation {
        species: "Mackerel",
        rod: "Light rod (8-12 lb line)",
        reel: "Spinning reel (2000-2500 size)",
        bait: "Small jigs or feathers",
    },
    GearRecommendation {
        species: "Halibut",
        rod: "Heavy rod (50-80 lb line)",
        reel: "Conventional reel (6000+ size)",
        bait: "Herring or mackerel",
    },
];

const DEFAULT_GEAR_SPECIES: [&str; 2] = ["Cod", "Haddock"];

pub fn gear_for(species: &str) -> Option<&'static GearRecommendation> {
    let species = species.trim();
    GEAR_GUIDE
        .iter()
        .find(|gear| gear.species.eq_ignore_ascii_case(species))
}

/// Gear for the requested species, or the Cod and Haddock sample when the
/// species is absent or not in the guide.
pub fn gear_guide(species: Option<&str>) -> Vec<&'static GearRecommendation> {
    if let Some(gear) = species.and_then(gear_for) {
        return vec![gear];
    }
    DEFAULT_GEAR_SPECIES
        .iter()
        .filter_map(|species| gear_for(species))
        .collect()
}
