use std::collections::HashMap;

use kit_colors::resolver::check_clash;
use kit_colors::store::OverrideStore;
use kit_colors::{ColorError, ColorResolver, HexColor};

fn hex(s: &str) -> HexColor {
    HexColor::parse(s).expect("valid test color")
}

#[test]
fn distinct_colors_need_no_fix() {
    let mut resolver = ColorResolver::new(OverrideStore::in_memory());
    let m = resolver
        .resolve_matchup("Arsenal", "Chelsea", &HashMap::new())
        .expect("both known");
    assert_eq!(m.home_color, hex("#EF0107"));
    assert_eq!(m.away_color, hex("#034694"));
    assert!(m.fix.is_none());
    assert!(!m.distinct_line_styles);
    assert!(m.distance > 50.0);
}

#[test]
fn clashing_reds_switch_to_the_better_alternate() {
    let mut resolver = ColorResolver::new(OverrideStore::in_memory());
    let m = resolver
        .resolve_matchup("Liverpool", "Manchester United", &HashMap::new())
        .expect("both known");

    let fix = m.fix.as_ref().expect("an alternate separates the reds");
    assert_eq!(fix.team, "Liverpool");
    assert_eq!(fix.original, hex("#C8102E"));
    assert_eq!(fix.replacement, hex("#00A398"));
    assert_eq!(m.home_color, hex("#00A398"));
    assert_eq!(m.away_color, hex("#DA291C"));
    assert_eq!(m.home.color, hex("#C8102E"));
    assert!(m.distance > 250.0);
    assert!(!m.distinct_line_styles);
}

#[test]
fn clash_without_alternates_falls_back_to_line_styles() {
    let mut resolver = ColorResolver::new(OverrideStore::in_memory());
    let m = resolver
        .resolve_matchup("Chelsea", "Everton", &HashMap::new())
        .expect("both known");
    assert!(m.fix.is_none());
    assert!(m.distinct_line_styles);
    assert_eq!(m.home_color, hex("#034694"));
    assert_eq!(m.away_color, hex("#003399"));
}

#[test]
fn hints_feed_the_matchup() {
    let mut resolver = ColorResolver::new(OverrideStore::in_memory());
    let hints = HashMap::from([
        ("Forest Green Rovers".to_string(), "#8CC63F".to_string()),
        ("Arsenal".to_string(), "#FFFFFF".to_string()),
    ]);
    let m = resolver
        .resolve_matchup("Forest Green Rovers", "Arsenal", &hints)
        .expect("hints cover both");
    assert_eq!(m.home_color, hex("#8CC63F"));
    assert_eq!(m.away_color, hex("#FFFFFF"));
}

#[test]
fn unknown_side_is_reported_without_prompter() {
    let mut resolver = ColorResolver::new(OverrideStore::in_memory());
    let err = resolver
        .resolve_matchup("Forest Green Rovers", "Arsenal", &HashMap::new())
        .unwrap_err();
    assert!(
        matches!(err, ColorError::MissingTeamColor { ref teams } if teams == &["Forest Green Rovers"])
    );
}

#[test]
fn check_clash_reports_distance_even_when_far_apart() {
    let clash = check_clash("Arsenal", hex("#EF0107"), "Chelsea", hex("#034694"), 50.0);
    assert!(!clash.too_similar);
    assert!(clash.fix.is_none());

    let clash = check_clash("Arsenal", hex("#EF0107"), "Chelsea", hex("#034694"), 400.0);
    assert!(clash.too_similar);
    // Arsenal's gold is no further from Chelsea blue than the red is.
    assert!(clash.fix.is_none());
}
