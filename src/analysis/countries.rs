//! Static jurisdiction tables.

/// A country known to the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub iso3: &'static str,
}

/// Codes filtered into the Nordic subset, in display order.
pub const NORDIC_CODES: [&str; 5] = ["NO", "SE", "DK", "FI", "IS"];

/// Regional and international filing offices. These are not countries and
/// have no ISO-3 code.
const SPECIAL_REGIONS: &[(&str, &str)] = &[
    ("EP", "European Patent Office"),
    ("WO", "WIPO (PCT)"),
    ("EA", "Eurasian Patent Organization"),
    ("AP", "African Regional IP Organization"),
    ("OA", "African IP Organization"),
    ("GC", "GCC Patent Office"),
];

// (alpha-2, display name, alpha-3)
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AE", "United Arab Emirates", "ARE"),
    ("AR", "Argentina", "ARG"),
    ("AT", "Austria", "AUT"),
    ("AU", "Australia", "AUS"),
    ("BE", "Belgium", "BEL"),
    ("BG", "Bulgaria", "BGR"),
    ("BR", "Brazil", "BRA"),
    ("CA", "Canada", "CAN"),
    ("CH", "Switzerland", "CHE"),
    ("CL", "Chile", "CHL"),
    ("CN", "China", "CHN"),
    ("CO", "Colombia", "COL"),
    ("CY", "Cyprus", "CYP"),
    ("CZ", "Czechia", "CZE"),
    ("DE", "Germany", "DEU"),
    ("DK", "Denmark", "DNK"),
    ("EE", "Estonia", "EST"),
    ("EG", "Egypt", "EGY"),
    ("ES", "Spain", "ESP"),
    ("FI", "Finland", "FIN"),
    ("FR", "France", "FRA"),
    ("GB", "United Kingdom", "GBR"),
    ("GR", "Greece", "GRC"),
    ("HK", "Hong Kong", "HKG"),
    ("HR", "Croatia", "HRV"),
    ("HU", "Hungary", "HUN"),
    ("ID", "Indonesia", "IDN"),
    ("IE", "Ireland", "IRL"),
    ("IL", "Israel", "ISR"),
    ("IN", "India", "IND"),
    ("IS", "Iceland", "ISL"),
    ("IT", "Italy", "ITA"),
    ("JP", "Japan", "JPN"),
    ("KR", "South Korea", "KOR"),
    ("LT", "Lithuania", "LTU"),
    ("LU", "Luxembourg", "LUX"),
    ("LV", "Latvia", "LVA"),
    ("MA", "Morocco", "MAR"),
    ("MX", "Mexico", "MEX"),
    ("MY", "Malaysia", "MYS"),
    ("NL", "Netherlands", "NLD"),
    ("NO", "Norway", "NOR"),
    ("NZ", "New Zealand", "NZL"),
    ("PE", "Peru", "PER"),
    ("PH", "Philippines", "PHL"),
    ("PL", "Poland", "POL"),
    ("PT", "Portugal", "PRT"),
    ("RO", "Romania", "ROU"),
    ("RS", "Serbia", "SRB"),
    ("RU", "Russia", "RUS"),
    ("SA", "Saudi Arabia", "SAU"),
    ("SE", "Sweden", "SWE"),
    ("SG", "Singapore", "SGP"),
    ("SI", "Slovenia", "SVN"),
    ("SK", "Slovakia", "SVK"),
    ("TH", "Thailand", "THA"),
    ("TR", "Turkey", "TUR"),
    ("TW", "Taiwan", "TWN"),
    ("UA", "Ukraine", "UKR"),
    ("US", "United States", "USA"),
    ("VN", "Vietnam", "VNM"),
    ("ZA", "South Africa", "ZAF"),
];

/// Look up a country by its (already upper-cased) alpha-2 code.
pub fn lookup_country(code: &str) -> Option<Country> {
    COUNTRIES
        .iter()
        .find(|(alpha2, _, _)| *alpha2 == code)
        .map(|&(_, name, iso3)| Country { name, iso3 })
}

/// Display name for a regional office code, if it is one.
pub fn special_region_name(code: &str) -> Option<&'static str> {
    SPECIAL_REGIONS
        .iter()
        .find(|(region, _)| *region == code)
        .map(|&(_, name)| name)
}

pub fn is_nordic(code: &str) -> bool {
    NORDIC_CODES.contains(&code)
}
