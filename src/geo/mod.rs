//! Neighborhood ↔ zipcode reference data.
//!
//! The table is a fixed-order slice rather than a map: several zipcodes
//! belong to more than one neighborhood (10003 is in lower-east-side,
//! greenwich-village and east-village), and lookup is first-match-wins over
//! the declaration order.

/// Manhattan neighborhoods and their zipcodes, in lookup-priority order.
pub const NEIGHBORHOODS: &[(&str, &[&str])] = &[
    ("lower-east-side", &["10002", "10003", "10009"]),
    ("chinatown", &["10013", "10038"]),
    ("soho", &["10012", "10013"]),
    ("greenwich-village", &["10003", "10011", "10012", "10014"]),
    ("east-village", &["10003", "10009"]),
    ("chelsea", &["10001", "10011", "10018"]),
    (
        "midtown",
        &["10016", "10017", "10018", "10019", "10020", "10022", "10036"],
    ),
    ("upper-west-side", &["10023", "10024", "10025"]),
    ("upper-east-side", &["10021", "10028", "10065", "10075"]),
    (
        "harlem",
        &[
            "10026", "10027", "10029", "10030", "10031", "10032", "10035", "10037", "10039",
        ],
    ),
    ("washington-heights", &["10032", "10033", "10034", "10040"]),
];

const NO_ZIPCODES: &[&str] = &[];

/// Returns the zipcodes for a neighborhood filter.
///
/// - `None` input means "no filter" and maps to `None`.
/// - A known neighborhood maps to its zipcode list.
/// - An unknown neighborhood maps to an empty list, so the caller's filter
///   matches nothing instead of silently matching everything.
pub fn zipcodes_for(neighborhood: Option<&str>) -> Option<&'static [&'static str]> {
    let name = neighborhood?;
    Some(
        NEIGHBORHOODS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, zips)| *zips)
            .unwrap_or(NO_ZIPCODES),
    )
}

/// Returns the first neighborhood (in table order) containing the zipcode.
pub fn neighborhood_for_zipcode(zipcode: Option<u32>) -> Option<&'static str> {
    let zipcode = zipcode?;
    NEIGHBORHOODS
        .iter()
        .find(|(_, zips)| zips.iter().any(|z| parse_zipcode(z) == Some(zipcode)))
        .map(|(name, _)| *name)
}

/// Normalizes a zipcode string to its numeric form.
///
/// The restaurant dataset stores zipcodes as floats (`"10003.0"`), while the
/// neighborhood table uses plain strings; comparing anything requires going
/// through a single numeric representation.
pub fn parse_zipcode(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|f| f as u32))
}
