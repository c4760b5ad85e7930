use serde::Serialize;

/// A supported synoptic station and the code embedded in its archive filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Station {
    pub name: &'static str,
    pub code: &'static str,
}

pub const STATIONS: [Station; 6] = [
    Station { name: "Szczecin", code: "205" },
    Station { name: "Wrocław", code: "424" },
    Station { name: "Warszawa", code: "375" },
    Station { name: "Kraków", code: "566" },
    Station { name: "Lublin", code: "495" },
    Station { name: "Poznań", code: "330" },
];

/// Station names found in the archives, mapped onto canonical city names
pub const NAME_VARIANTS: [(&str, &str); 9] = [
    ("SZCZECIN", "Szczecin"),
    ("KRAKÓW-BALICE", "Kraków"),
    ("WROCŁAW-STRACHOWICE", "Wrocław"),
    ("WARSZAWA-OKĘCIE", "Warszawa"),
    ("LUBLIN-RADAWIEC", "Lublin"),
    ("POZNAŃ-ŁAWICA", "Poznań"),
    ("WARSZAWA", "Warszawa"),
    ("POZNAŃ", "Poznań"),
    ("WROCŁAW", "Wrocław"),
];

impl Station {
    pub fn find(location: &str) -> Option<&'static Station> {
        STATIONS.iter().find(|station| station.name == location)
    }
}

/// Archive filename code for one of the supported cities
pub fn station_code(location: &str) -> Option<&'static str> {
    Station::find(location).map(|station| station.code)
}

/// Resolve a historical station name to its canonical city name.
/// Names without a known variant pass through unchanged.
pub fn canonical_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    NAME_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == trimmed)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(trimmed)
}
