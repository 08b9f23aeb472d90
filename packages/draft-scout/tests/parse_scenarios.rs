//! End-to-end parsing scenarios over realistic page shapes.

use draft_scout::testing::fixtures;
use draft_scout::{
    Attributes, ExtractionSchema, PageParser, PlayerRecord, PositionGroup, StatBlock, StatValue,
};
use serde_json::json;

#[test]
fn test_single_quarterback_listing() {
    let markup = fixtures::prospects_page(&[(
        "QB",
        vec![fixtures::prospect_row(
            "J. Doe",
            "22",
            "6-2",
            "210",
            "State",
            Some("/cfb/players/j-doe-1.htm"),
        )],
    )]);

    let roster = PageParser::default().parse_listing(&markup);

    assert_eq!(roster.keys().copied().collect::<Vec<_>>(), vec![PositionGroup::QB]);
    let qbs = &roster[&PositionGroup::QB];
    assert_eq!(qbs.len(), 1);

    let doe = &qbs[0];
    assert_eq!(doe.name, "J. Doe");
    assert_eq!(doe.age, Some(22));
    assert_eq!(doe.height, Some(74));
    assert_eq!(doe.weight, Some(210));
    assert_eq!(doe.college.as_deref(), Some("State"));
    assert_eq!(doe.stats_link.as_deref(), Some("/cfb/players/j-doe-1.htm"));
    assert!(matches!(doe.stats(), StatBlock::Quarterback(_)));
}

#[test]
fn test_draft_positions_are_remapped_or_dropped() {
    let markup = fixtures::draft_page(&[
        fixtures::draft_row("12", "S", "A. Safety", "21", "State", Some("/cfb/players/a-safety-1.html"), "18"),
        fixtures::draft_row("200", "P", "B. Punter", "23", "Tech", None, "2"),
    ]);

    let roster = PageParser::default().parse_draft_listing(&markup);

    assert_eq!(roster.len(), 1);
    let corners = &roster[&PositionGroup::CB];
    assert_eq!(corners.len(), 1);
    assert_eq!(corners[0].name, "A. Safety");
    assert_eq!(corners[0].draft.as_ref().and_then(|d| d.pick), Some(12));
    assert!(roster.values().flatten().all(|p| p.name != "B. Punter"));
}

#[test]
fn test_listing_then_detail_enrichment() {
    let listing = fixtures::prospects_page(&[(
        "OLB",
        vec![fixtures::prospect_row("E. Rusher", "21", "6-3", "240", "State", Some("/cfb/players/e-rusher-1.html"))],
    )]);
    let parser = PageParser::default();
    let mut rusher = parser.parse_listing(&listing)[&PositionGroup::OLB][0].clone();

    let page = fixtures::player_page_with_bio(
        "defense_standard",
        &[
            ("games", "42"),
            ("tackles_solo", "101"),
            ("tackles_loss", "33.5"),
            ("sacks", "19.0"),
            ("def_int", ""),
            ("fumbles_forced", "x"),
        ],
        "6-4",
        "251lb",
    );
    parser.parse_detail(&page, &mut rusher).unwrap();

    assert_eq!(rusher.height, Some(76));
    assert_eq!(rusher.weight, Some(251));
    assert_eq!(rusher.stat("games"), Some(StatValue::Int(42)));
    assert_eq!(rusher.stat("tackles_loss"), Some(StatValue::Float(33.5)));
    assert_eq!(rusher.stat("sacks"), Some(StatValue::Float(19.0)));
    assert_eq!(rusher.stat("def_int"), None);
    assert_eq!(rusher.stat("fumbles_forced"), None);
}

#[test]
fn test_builder_is_case_insensitive() {
    let attrs: Attributes = json!({ "name": "J. Doe", "height": "6-2" })
        .as_object()
        .cloned()
        .unwrap();

    let lower = PlayerRecord::from_attributes("qb", &attrs).unwrap();
    let upper = PlayerRecord::from_attributes("QB", &attrs).unwrap();

    assert_eq!(lower, upper);
    assert_eq!(lower.height, Some(74));
}

#[test]
fn test_custom_schema_without_group() {
    let schema = ExtractionSchema::default().without_group(PositionGroup::WR);
    let parser = PageParser::new(&schema);
    let mut receiver = PlayerRecord::new("W. Out", PositionGroup::WR);

    assert!(parser.parse_detail("<html></html>", &mut receiver).is_err());

    let listing = fixtures::prospects_page(&[(
        "WR",
        vec![fixtures::prospect_row("W. Out", "22", "6-0", "190", "State", None)],
    )]);
    assert!(parser.parse_listing(&listing).is_empty());
}
