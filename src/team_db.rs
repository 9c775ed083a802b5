use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::color::HexColor;
use crate::fuzzy::{self, FuzzyOutcome, MatchConfig, MatchKey, normalize_key};

/// Primary kit colors keyed by canonical name.
pub const TEAM_COLORS: &[(&str, &str)] = &[
    // La Liga
    ("Real Madrid", "#FEBE10"),
    ("Barcelona", "#A50044"),
    ("Atletico Madrid", "#CB3524"),
    ("Sevilla", "#F43333"),
    ("Valencia", "#EE7814"),
    ("Villarreal", "#FFE667"),
    ("Real Sociedad", "#0A3A82"),
    ("Athletic Bilbao", "#EE2523"),
    ("Real Betis", "#00954C"),
    ("Celta Vigo", "#8AC3EE"),
    ("Getafe", "#005999"),
    // Premier League
    ("Manchester United", "#DA291C"),
    ("Manchester City", "#6CABDD"),
    ("Liverpool", "#C8102E"),
    ("Chelsea", "#034694"),
    ("Arsenal", "#EF0107"),
    ("Tottenham", "#132257"),
    ("Newcastle", "#241F20"),
    ("Aston Villa", "#95BFE5"),
    ("West Ham", "#7A263A"),
    ("Leicester City", "#003090"),
    ("Everton", "#003399"),
    ("Leeds United", "#FFCD00"),
    ("Wolves", "#FDB913"),
    ("Brighton", "#0057B8"),
    ("Crystal Palace", "#1B458F"),
    ("AFC Bournemouth", "#B50E12"),
    // Serie A
    ("Juventus", "#000000"),
    ("Inter Milan", "#0068A8"),
    ("AC Milan", "#FB090B"),
    ("Napoli", "#00A1DD"),
    ("Roma", "#8B0304"),
    ("Hellas Verona", "#FFED00"),
    ("Lazio", "#87D8F7"),
    ("Atalanta", "#1B3B82"),
    ("Fiorentina", "#512D6D"),
    ("Como", "#00A1E4"),
    // Bundesliga
    ("Bayern Munich", "#DC052D"),
    ("Borussia Dortmund", "#FDE100"),
    ("RB Leipzig", "#DD0741"),
    ("Bayer Leverkusen", "#E32221"),
    ("Wolfsburg", "#65B32E"),
    ("Eintracht Frankfurt", "#E1000F"),
    ("Schalke", "#004D9D"),
    ("Borussia Monchengladbach", "#000000"),
    ("FC Koln", "#EC1C24"),
    // Ligue 1
    ("Paris Saint-Germain", "#004170"),
    ("Marseille", "#2BB5E8"),
    ("Lyon", "#DA020E"),
    ("Monaco", "#E30613"),
    ("Lille", "#D01317"),
    // EFL
    ("Coventry City", "#3AADE8"),
    ("Sunderland", "#EB172B"),
    ("Hull City", "#F5A623"),
    ("Preston North End", "#FFFFFF"),
    ("Sheffield Wednesday", "#0033A0"),
    ("Plymouth Argyle", "#00573F"),
    ("Derby County", "#FFFFFF"),
    ("Oxford United", "#F5B800"),
    ("Bristol City", "#E21836"),
    ("Millwall", "#001D5E"),
    ("Barnsley", "#E41E26"),
    ("Rotherham United", "#E21836"),
    ("Birmingham City", "#0000FF"),
    ("Burnley", "#6C1D45"),
    ("Norwich City", "#00A650"),
    ("Watford", "#FBEE23"),
    ("Luton Town", "#F78F1E"),
    ("Sheffield United", "#EE2737"),
    ("Middlesbrough", "#E11B22"),
    ("Stoke City", "#E03A3E"),
    ("Swansea City", "#FFFFFF"),
    ("Cardiff City", "#0070B5"),
    ("Queens Park Rangers", "#005CAB"),
    ("West Brom", "#122F67"),
    ("Blackburn", "#009EE0"),
    ("Blackpool", "#F68712"),
    ("Portsmouth", "#001489"),
    ("Huddersfield", "#0E63AD"),
    ("Reading", "#004494"),
    ("Ipswich Town", "#0044AA"),
    ("Southampton", "#D71920"),
    ("Fulham", "#FFFFFF"),
    ("Brentford", "#E30613"),
    // Other European
    ("Ajax", "#D2122E"),
    ("Porto", "#003893"),
    ("Benfica", "#E30613"),
    ("Celtic", "#00A650"),
    ("Rangers", "#0000CD"),
    // Liga MX
    ("Club América", "#FFCD00"),
    ("Guadalajara", "#E51C23"),
    ("Monterrey", "#003DA5"),
    ("Tigres UANL", "#F4C400"),
    ("Cruz Azul", "#0057A3"),
    ("Pumas UNAM", "#003366"),
    ("Toluca", "#C8102E"),
    ("Santos Laguna", "#00A651"),
    ("León", "#006633"),
    ("Pachuca", "#004E9A"),
    ("Puebla", "#004A8D"),
    ("Atlas", "#BA1F24"),
    ("Necaxa", "#C8102E"),
    ("Querétaro", "#003DA5"),
    ("Mazatlán", "#6A2382"),
    ("Tijuana", "#C8102E"),
    ("Juárez", "#C68E28"),
    ("Atlético San Luis", "#E31837"),
    // NWSL
    ("Angel City FC", "#010101"),
    ("Bay FC", "#051C2C"),
    ("Chicago Red Stars", "#051C2C"),
    ("Houston Dash", "#101820"),
    ("Kansas City Current", "#64CCC9"),
    ("Racing Louisville FC", "#C5B4E3"),
    ("NJ/NY Gotham FC", "#9ADBE8"),
    ("North Carolina Courage", "#01426A"),
    ("OL Reign", "#003087"),
    ("Orlando Pride", "#5F249F"),
    ("Portland Thorns FC", "#93282C"),
    ("San Diego Wave FC", "#041E42"),
    ("Utah Royals", "#001E62"),
    ("Washington Spirit", "#C8102E"),
    // WSL
    ("London City Lionesses", "#D4AF37"),
];

/// Alternative spellings seen in data exports, mapped to canonical names.
pub const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Man United", "Manchester United"),
    ("Man City", "Manchester City"),
    ("Tottenham Hotspur", "Tottenham"),
    ("Wolverhampton Wanderers", "Wolves"),
    ("Brighton and Hove Albion", "Brighton"),
    ("Internazionale", "Inter Milan"),
    ("AS Roma", "Roma"),
    ("Verona", "Hellas Verona"),
    ("Bayern Munchen", "Bayern Munich"),
    ("Athletic Club", "Athletic Bilbao"),
    ("PSG", "Paris Saint-Germain"),
    ("Olympique de Marseille", "Marseille"),
    ("Olympique Marseille", "Marseille"),
    ("Olympique Lyonnais", "Lyon"),
    ("Club Tijuana", "Tijuana"),
    ("Portland Thorns", "Portland Thorns FC"),
    ("San Diego Wave", "San Diego Wave FC"),
];

/// Data-provider team codes. A code listed twice resolves to its later entry.
pub const TEAM_ABBREVIATIONS: &[(&str, &str)] = &[
    // Premier League
    ("ARS", "Arsenal"),
    ("AVL", "Aston Villa"),
    ("BOU", "AFC Bournemouth"),
    ("BRE", "Brentford"),
    ("BHA", "Brighton"),
    ("BUR", "Burnley"),
    ("CHE", "Chelsea"),
    ("CRY", "Crystal Palace"),
    ("EVE", "Everton"),
    ("FUL", "Fulham"),
    ("IPS", "Ipswich Town"),
    ("LEI", "Leicester City"),
    ("LIV", "Liverpool"),
    ("LUT", "Luton Town"),
    ("MCI", "Manchester City"),
    ("MUN", "Manchester United"),
    ("NEW", "Newcastle"),
    ("NFO", "Nottingham Forest"),
    ("SHU", "Sheffield United"),
    ("SOU", "Southampton"),
    ("TOT", "Tottenham"),
    ("WHU", "West Ham"),
    ("WOL", "Wolves"),
    ("LEE", "Leeds United"),
    ("WBA", "West Brom"),
    ("NOR", "Norwich City"),
    ("WAT", "Watford"),
    ("HUD", "Huddersfield"),
    ("CAR", "Cardiff City"),
    ("SWA", "Swansea City"),
    ("STK", "Stoke City"),
    ("MID", "Middlesbrough"),
    ("WIG", "Wigan Athletic"),
    ("QPR", "Queens Park Rangers"),
    ("REA", "Reading"),
    ("POR", "Portsmouth"),
    ("BOL", "Bolton"),
    ("BLB", "Blackburn"),
    ("BLP", "Blackpool"),
    // EFL Championship
    ("COV", "Coventry City"),
    ("SUN", "Sunderland"),
    ("HUL", "Hull City"),
    ("PNE", "Preston North End"),
    ("SHW", "Sheffield Wednesday"),
    ("PLY", "Plymouth Argyle"),
    ("DER", "Derby County"),
    ("OXF", "Oxford United"),
    ("BRC", "Bristol City"),
    ("MLW", "Millwall"),
    ("BRN", "Barnsley"),
    ("ROT", "Rotherham United"),
    ("BIR", "Birmingham City"),
    // Serie A
    ("JUV", "Juventus"),
    ("INT", "Inter Milan"),
    ("MIL", "AC Milan"),
    ("NAP", "Napoli"),
    ("ROM", "Roma"),
    ("LAZ", "Lazio"),
    ("ATA", "Atalanta"),
    ("FIO", "Fiorentina"),
    ("COM", "Como"),
    ("TOR", "Torino"),
    ("BOL", "Bologna"),
    ("UDI", "Udinese"),
    ("EMP", "Empoli"),
    ("SAL", "Salernitana"),
    ("SAS", "Sassuolo"),
    ("VER", "Verona"),
    ("SPE", "Spezia"),
    ("SAM", "Sampdoria"),
    ("CRE", "Cremonese"),
    ("LEC", "Lecce"),
    ("MON", "Monza"),
    ("CAG", "Cagliari"),
    ("GEN", "Genoa"),
    ("PAR", "Parma"),
    ("VEN", "Venezia"),
    ("FRO", "Frosinone"),
    // La Liga
    ("RMA", "Real Madrid"),
    ("BAR", "Barcelona"),
    ("ATM", "Atletico Madrid"),
    ("SEV", "Sevilla"),
    ("VAL", "Valencia"),
    ("VIL", "Villarreal"),
    ("RSO", "Real Sociedad"),
    ("BET", "Real Betis"),
    ("ATH", "Athletic Bilbao"),
    ("CEL", "Celta Vigo"),
    ("GET", "Getafe"),
    ("OSA", "Osasuna"),
    ("MAL", "Mallorca"),
    ("RAY", "Rayo Vallecano"),
    ("ALM", "Almeria"),
    ("CAD", "Cadiz"),
    ("GRA", "Granada"),
    ("ELC", "Elche"),
    ("ESP", "Espanyol"),
    ("GIR", "Girona"),
    ("ALV", "Alaves"),
    ("LAS", "Las Palmas"),
    ("LEG", "Leganes"),
    ("VAD", "Real Valladolid"),
    // Bundesliga
    ("BAY", "Bayern Munich"),
    ("BVB", "Borussia Dortmund"),
    ("RBL", "RB Leipzig"),
    ("LEV", "Bayer Leverkusen"),
    ("BMG", "Borussia Monchengladbach"),
    ("WOB", "Wolfsburg"),
    ("SGE", "Eintracht Frankfurt"),
    ("SCF", "Freiburg"),
    ("HOF", "Hoffenheim"),
    ("UNB", "Union Berlin"),
    ("KOE", "FC Koln"),
    ("MAI", "Mainz"),
    ("AUG", "Augsburg"),
    ("HER", "Hertha Berlin"),
    ("VFB", "Stuttgart"),
    ("BOC", "Bochum"),
    ("S04", "Schalke"),
    ("WER", "Werder Bremen"),
    ("DAR", "Darmstadt"),
    ("HEI", "Heidenheim"),
    ("STH", "St Pauli"),
    ("HOL", "Holstein Kiel"),
    // Ligue 1
    ("PSG", "Paris Saint-Germain"),
    ("OLY", "Marseille"),
    ("LYO", "Lyon"),
    ("MOC", "Monaco"),
    ("LIL", "Lille"),
    ("NIC", "Nice"),
    ("REN", "Rennes"),
    ("LEN", "Lens"),
    ("NAN", "Nantes"),
    ("MOT", "Montpellier"),
    ("STR", "Strasbourg"),
    ("REI", "Reims"),
    ("BRS", "Brest"),
    ("TOU", "Toulouse"),
    ("CLE", "Clermont"),
    ("AUX", "Auxerre"),
    ("ANG", "Angers"),
    ("HAV", "Le Havre"),
    ("MET", "Metz"),
    ("AJA", "Ajaccio"),
    ("TRO", "Troyes"),
    ("LOR", "Lorient"),
    // Other European
    ("AJX", "Ajax"),
    ("PSV", "PSV Eindhoven"),
    ("FEY", "Feyenoord"),
    ("PRT", "Porto"),
    ("BEN", "Benfica"),
    ("SPO", "Sporting CP"),
    ("CLT", "Celtic"),
    ("RAN", "Rangers"),
    ("GAL", "Galatasaray"),
    ("FEN", "Fenerbahce"),
    ("BES", "Besiktas"),
    // Liga MX
    ("CFA", "Club América"),
    ("GDL", "Guadalajara"),
    ("MTY", "Monterrey"),
    ("TIG", "Tigres UANL"),
    ("CRZ", "Cruz Azul"),
    ("PUM", "Pumas UNAM"),
    ("TOL", "Toluca"),
    ("SAN", "Santos Laguna"),
    ("LEO", "León"),
    ("PAC", "Pachuca"),
    ("PUE", "Puebla"),
    ("ATL", "Atlas"),
    ("NEC", "Necaxa"),
    ("QRO", "Querétaro"),
    ("MZT", "Mazatlán"),
    ("TIJ", "Tijuana"),
    ("JSL", "Juárez"),
    ("ASL", "Atlético San Luis"),
    ("CTJ", "Club Tijuana"),
    // NWSL
    ("ANG", "Angel City FC"),
    ("BAY", "Bay FC"),
    ("CRS", "Chicago Red Stars"),
    ("HOU", "Houston Dash"),
    ("KC", "Kansas City Current"),
    ("LOU", "Racing Louisville FC"),
    ("NJY", "NJ/NY Gotham FC"),
    ("NCC", "North Carolina Courage"),
    ("OLR", "OL Reign"),
    ("ORL", "Orlando Pride"),
    ("POR", "Portland Thorns FC"),
    ("SDW", "San Diego Wave FC"),
    ("UTA", "Utah Royals"),
    ("WAS", "Washington Spirit"),
    // WSL
    ("LCL", "London City Lionesses"),
];

/// Away or third kit colors, used when two sides clash.
pub const TEAM_ALTERNATE_COLORS: &[(&str, &str)] = &[
    ("Arsenal", "#F0BC42"),
    ("Liverpool", "#00A398"),
    ("Manchester United", "#FFE500"),
    ("Bayern Munich", "#0066B2"),
    ("AC Milan", "#000000"),
    ("Roma", "#F5A623"),
    ("Atletico Madrid", "#272E61"),
    ("Sevilla", "#000000"),
    ("Athletic Bilbao", "#FFFFFF"),
    ("Monaco", "#FFFFFF"),
    ("Benfica", "#FFFFFF"),
    ("Lille", "#0A2240"),
    ("Lyon", "#FFFFFF"),
    ("Bayer Leverkusen", "#000000"),
    ("RB Leipzig", "#FFFFFF"),
    ("Eintracht Frankfurt", "#FFFFFF"),
    ("AFC Bournemouth", "#000000"),
    ("Lazio", "#000080"),
    ("Paris Saint-Germain", "#E30613"),
    ("Borussia Dortmund", "#000000"),
    ("Real Madrid", "#000000"),
    ("Barcelona", "#004D98"),
    ("Juventus", "#FFFFFF"),
];

/// Clubs with no men's side of the same name, so a "Women" suffix can be dropped.
pub const WOMENS_ONLY_CLUBS: &[&str] = &[
    "Angel City FC",
    "Bay FC",
    "Chicago Red Stars",
    "Houston Dash",
    "Kansas City Current",
    "Racing Louisville FC",
    "NJ/NY Gotham FC",
    "North Carolina Courage",
    "OL Reign",
    "Orlando Pride",
    "Portland Thorns FC",
    "Portland Thorns",
    "San Diego Wave FC",
    "San Diego Wave",
    "Utah Royals",
    "Washington Spirit",
    "London City Lionesses",
];

const WOMEN_SUFFIX: &str = " Women";

static COLORS_BY_KEY: Lazy<HashMap<String, (&'static str, HexColor)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (name, hex) in TEAM_COLORS {
        if let Ok(color) = HexColor::parse(hex) {
            map.insert(normalize_key(name), (*name, color));
        }
    }
    map
});

static CANONICAL_BY_KEY: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map: HashMap<String, &'static str> = HashMap::new();
    for (name, _) in TEAM_COLORS {
        map.insert(normalize_key(name), *name);
    }
    for (alias, canonical) in TEAM_ALIASES {
        map.insert(normalize_key(alias), *canonical);
    }
    map
});

static ABBREVIATIONS: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    TEAM_ABBREVIATIONS
        .iter()
        .map(|(code, name)| (code.to_ascii_uppercase(), *name))
        .collect()
});

static ALTERNATES_BY_KEY: Lazy<Vec<(MatchKey, &'static str)>> = Lazy::new(|| {
    TEAM_ALTERNATE_COLORS
        .iter()
        .map(|(name, _)| (MatchKey::new(name), *name))
        .collect()
});

static FUZZY_KEYS: Lazy<Vec<(MatchKey, &'static str)>> = Lazy::new(|| {
    TEAM_COLORS
        .iter()
        .map(|(name, _)| (MatchKey::new(name), *name))
        .chain(
            TEAM_ALIASES
                .iter()
                .map(|(alias, canonical)| (MatchKey::new(alias), *canonical)),
        )
        .collect()
});

static WOMENS_ONLY: Lazy<HashSet<&'static str>> =
    Lazy::new(|| WOMENS_ONLY_CLUBS.iter().copied().collect());

/// Canonical name and every alias, ready for the fuzzy matcher.
pub fn fuzzy_keys() -> &'static [(MatchKey, &'static str)] {
    FUZZY_KEYS.as_slice()
}

/// Full name for a provider code such as `ARS`. Case-insensitive.
pub fn expand_abbreviation(code: &str) -> Option<&'static str> {
    ABBREVIATIONS.get(&code.trim().to_ascii_uppercase()).copied()
}

/// Canonical name for a canonical spelling, alias or code.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let name = normalize_team_name(name);
    if let Some(canonical) = CANONICAL_BY_KEY.get(&normalize_key(name)) {
        return Some(*canonical);
    }
    let expanded = expand_abbreviation(name)?;
    Some(
        CANONICAL_BY_KEY
            .get(&normalize_key(expanded))
            .copied()
            .unwrap_or(expanded),
    )
}

/// Exact built-in color lookup by canonical name, alias or code.
pub fn builtin_color(name: &str) -> Option<(&'static str, HexColor)> {
    let canonical = canonical_name(name)?;
    COLORS_BY_KEY.get(&normalize_key(canonical)).copied()
}

/// Strips a trailing " Women" when the club has no men's side of the same name.
pub fn normalize_team_name(name: &str) -> &str {
    let trimmed = name.trim();
    match trimmed.strip_suffix(WOMEN_SUFFIX) {
        Some(base) if WOMENS_ONLY.contains(base) => base,
        _ => trimmed,
    }
}

/// Reverse lookup: the provider code for a team name, falling back to the first
/// three letters uppercased.
pub fn team_abbrev(name: &str) -> String {
    let wanted = name.trim().to_lowercase();
    if let Some((code, _)) = TEAM_ABBREVIATIONS
        .iter()
        .find(|(_, full)| full.to_lowercase() == wanted)
    {
        return code.to_string();
    }

    let mut best: Option<(&str, f64)> = None;
    for (code, full) in TEAM_ABBREVIATIONS {
        let full = full.to_lowercase();
        let score = if full.starts_with(&wanted) {
            90.0 + 1.0 / full.len() as f64
        } else if wanted.starts_with(&full) {
            85.0 + 1.0 / wanted.len() as f64
        } else if full.ends_with(&wanted) {
            80.0 + wanted.len() as f64 / full.len() as f64
        } else if wanted.ends_with(&full) {
            75.0
        } else if wanted.split_whitespace().all(|w| full.contains(w)) {
            70.0
        } else {
            0.0
        };
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((*code, score));
        }
    }
    if let Some((code, _)) = best {
        return code.to_string();
    }

    name.trim().chars().take(3).collect::<String>().to_uppercase()
}

/// Alternate kit color, matched exactly first and then fuzzily.
pub fn alternate_color(name: &str) -> Option<HexColor> {
    let lookup = |canonical: &str| {
        TEAM_ALTERNATE_COLORS
            .iter()
            .find(|(n, _)| *n == canonical)
            .and_then(|(_, hex)| HexColor::parse(hex).ok())
    };
    if let Some(canonical) = canonical_name(name)
        && let Some(color) = lookup(canonical)
    {
        return Some(color);
    }
    match fuzzy::fuzzy_match(name, ALTERNATES_BY_KEY.as_slice(), MatchConfig::default()) {
        FuzzyOutcome::Single(c) => lookup(&c.name),
        FuzzyOutcome::Ambiguous(_) | FuzzyOutcome::NoMatch => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_meet_minimum_sizes() {
        assert!(TEAM_COLORS.len() >= 50);
        assert!(TEAM_ABBREVIATIONS.len() >= 160);
    }

    #[test]
    fn every_table_color_parses() {
        for (name, hex) in TEAM_COLORS.iter().chain(TEAM_ALTERNATE_COLORS) {
            assert!(HexColor::parse(hex).is_ok(), "{name}: {hex}");
        }
    }

    #[test]
    fn canonical_names_are_unique() {
        let mut seen = HashSet::new();
        for (name, _) in TEAM_COLORS {
            assert!(seen.insert(normalize_key(name)), "duplicate {name}");
        }
    }

    #[test]
    fn aliases_point_at_colored_teams() {
        for (alias, canonical) in TEAM_ALIASES {
            assert!(builtin_color(canonical).is_some(), "{alias} -> {canonical}");
        }
    }

    #[test]
    fn abbreviation_lookup() {
        assert_eq!(expand_abbreviation("ARS"), Some("Arsenal"));
        assert_eq!(expand_abbreviation("mci"), Some("Manchester City"));
        // Later entries win for reused codes.
        assert_eq!(expand_abbreviation("POR"), Some("Portland Thorns FC"));
        assert_eq!(expand_abbreviation("ZZZ"), None);
    }

    #[test]
    fn builtin_color_accepts_codes_and_aliases() {
        let (name, color) = builtin_color("ARS").unwrap();
        assert_eq!(name, "Arsenal");
        assert_eq!(color.to_string(), "#EF0107");

        let (name, _) = builtin_color("man united").unwrap();
        assert_eq!(name, "Manchester United");

        assert_eq!(builtin_color("TOR"), None);
    }

    #[test]
    fn womens_suffix_only_dropped_for_womens_clubs() {
        assert_eq!(normalize_team_name("Washington Spirit Women"), "Washington Spirit");
        assert_eq!(normalize_team_name("Chelsea Women"), "Chelsea Women");
        assert_eq!(normalize_team_name("Arsenal"), "Arsenal");
    }

    #[test]
    fn reverse_abbreviation() {
        assert_eq!(team_abbrev("Arsenal"), "ARS");
        assert_eq!(team_abbrev("Milan"), "MIL");
        assert_eq!(team_abbrev("Wrexham AFC"), "WRE");
    }

    #[test]
    fn alternate_color_lookup() {
        assert_eq!(
            alternate_color("Arsenal").map(|c| c.to_string()),
            Some("#F0BC42".to_string())
        );
        assert_eq!(
            alternate_color("MUN").map(|c| c.to_string()),
            Some("#FFE500".to_string())
        );
        assert_eq!(alternate_color("Chelsea"), None);
    }
}
