//! Athlete pages: career totals and biographical height/weight.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::parser::markup::{
    cell_text, child_element, element_text, find_by_id, height_to_inches, parse_document, to_float,
    to_int,
};
use crate::schema::ExtractionSchema;
use crate::types::player::{PlayerRecord, StatValue};

static HEIGHT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}-\d{1,2}$").expect("height pattern is valid"));

/// Enrich `record` with career totals and height/weight from its page.
///
/// Fails only when the record's group has no schema entry. Missing tables,
/// footers, career rows or cells leave the affected fields empty.
pub fn parse_detail(
    markup: &str,
    record: &mut PlayerRecord,
    schema: &ExtractionSchema,
) -> ParseResult<()> {
    let position = record.position();
    let layout = schema
        .group(position)
        .ok_or_else(|| ParseError::InvalidPosition {
            position: position.to_string(),
        })?;

    let document = parse_document(markup);
    let root = document.root_element();

    for spec in &layout.tables {
        let Some(table) = find_by_id(root, "table", &spec.id) else {
            trace!(table = %spec.id, player = %record.name, "Stat table not present");
            continue;
        };
        let Some(footer) = child_element(table, "tfoot") else {
            continue;
        };
        let Some(career) = find_by_id(footer, "tr", &spec.career_row_id()) else {
            trace!(table = %spec.id, player = %record.name, "No career row");
            continue;
        };

        for field in &spec.fields {
            let value = cell_text(career, field).and_then(|text| {
                if layout.is_int(field) {
                    to_int(&text).map(StatValue::Int)
                } else {
                    to_float(&text).map(StatValue::Float)
                }
            });
            if !record.set_stat(field, value) {
                trace!(field = %field, position = %position, "No slot for field");
            }
        }
    }

    apply_height_weight(&document, record);
    Ok(())
}

/// Find the bio paragraph's `6-2` / `210lb` spans and apply them.
///
/// Returns whether a paragraph matched.
pub fn parse_height_weight(markup: &str, record: &mut PlayerRecord) -> bool {
    apply_height_weight(&parse_document(markup), record)
}

fn apply_height_weight(document: &Html, record: &mut PlayerRecord) -> bool {
    let paragraphs = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "p");

    for paragraph in paragraphs {
        let text: String = paragraph.text().collect();
        if !text.contains("lb") {
            continue;
        }

        let spans: Vec<String> = paragraph
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "span")
            .take(2)
            .map(|span| element_text(span).unwrap_or_default())
            .collect();
        let [height, weight] = spans.as_slice() else {
            continue;
        };

        if !HEIGHT_SPAN.is_match(height) || !weight.ends_with("lb") {
            continue;
        }

        let digits: String = weight.chars().filter(char::is_ascii_digit).collect();
        let Ok(pounds) = digits.parse::<u32>() else {
            continue;
        };

        record.height = height_to_inches(height);
        record.weight = Some(pounds);
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::types::position::PositionGroup;

    #[test]
    fn test_career_row_fills_stats() {
        let markup = fixtures::player_page(
            "passing_standard",
            &[("games", "38"), ("pass_yds", "9,001"), ("pass_rating", "161.5"), ("pass_td", "")],
        );
        let mut record = PlayerRecord::new("J. Doe", PositionGroup::QB);

        parse_detail(&markup, &mut record, ExtractionSchema::standard()).unwrap();

        assert_eq!(record.stat("games"), Some(StatValue::Int(38)));
        assert_eq!(record.stat("pass_yds"), Some(StatValue::Int(9001)));
        assert_eq!(record.stat("pass_rating"), Some(StatValue::Float(161.5)));
        assert_eq!(record.stat("pass_td"), None);
        // rushing_standard is absent
        assert_eq!(record.stat("rush_yds"), None);
    }

    #[test]
    fn test_missing_schema_entry_is_invalid_position() {
        let schema = ExtractionSchema::default().without_group(PositionGroup::OL);
        let mut record = PlayerRecord::new("Big Man", PositionGroup::OL);

        let err = parse_detail("<html></html>", &mut record, &schema).unwrap_err();

        assert!(matches!(err, ParseError::InvalidPosition { position } if position == "OL"));
    }

    #[test]
    fn test_absent_table_leaves_fields_untouched() {
        let mut record = PlayerRecord::new("Corner", PositionGroup::CB);
        record.set_stat("def_int", Some(StatValue::Int(4)));
        record.height = Some(70);

        parse_detail("<html><body><p>nothing</p></body></html>", &mut record, ExtractionSchema::standard())
            .unwrap();

        assert_eq!(record.stat("def_int"), Some(StatValue::Int(4)));
        assert_eq!(record.height, Some(70));
    }

    #[test]
    fn test_table_without_footer_is_skipped() {
        let markup = r#"<table id="defense_standard"><tbody>
            <tr id="defense_standard.Career"><td data-stat="games">12</td></tr>
        </tbody></table>"#;
        let mut record = PlayerRecord::new("Guard", PositionGroup::OL);

        parse_detail(markup, &mut record, ExtractionSchema::standard()).unwrap();

        assert_eq!(record.stat("games"), None);
    }

    #[test]
    fn test_commented_stat_table() {
        let table = fixtures::stat_table("defense_standard", &[("games", "40"), ("sacks", "21.5")]);
        let markup = format!("<html><body><div><!--{table}--></div></body></html>");
        let mut record = PlayerRecord::new("Edge", PositionGroup::OLB);

        parse_detail(&markup, &mut record, ExtractionSchema::standard()).unwrap();

        assert_eq!(record.stat("games"), Some(StatValue::Int(40)));
        assert_eq!(record.stat("sacks"), Some(StatValue::Float(21.5)));
    }

    #[test]
    fn test_height_weight_first_match_wins() {
        let markup = r#"<html><body>
            <p><span>Position</span>: QB</p>
            <p><span>about</span><span>200</span> lb</p>
            <p><span>6-3</span>, <span>215lb</span> (191cm, 97kg)</p>
            <p><span>6-5</span>, <span>240lb</span></p>
        </body></html>"#;
        let mut record = PlayerRecord::new("J. Doe", PositionGroup::QB);

        assert!(parse_height_weight(markup, &mut record));
        assert_eq!(record.height, Some(75));
        assert_eq!(record.weight, Some(215));
    }

    #[test]
    fn test_weight_without_digits_keeps_scanning() {
        let markup = r#"<html><body>
            <p><span>6-1</span>, <span>lb</span></p>
            <p><span>6-2</span>, <span>212lb</span></p>
        </body></html>"#;
        let mut record = PlayerRecord::new("J. Doe", PositionGroup::QB);
        record.weight = Some(210);

        assert!(parse_height_weight(markup, &mut record));
        assert_eq!(record.height, Some(74));
        assert_eq!(record.weight, Some(212));

        let mut listed = PlayerRecord::new("K. Roe", PositionGroup::QB);
        listed.weight = Some(205);
        assert!(!parse_height_weight("<p><span>6-1</span> <span>lb</span></p>", &mut listed));
        assert_eq!(listed.weight, Some(205));
        assert_eq!(listed.height, None);
    }

    #[test]
    fn test_height_weight_no_match() {
        let mut record = PlayerRecord::new("J. Doe", PositionGroup::QB);
        record.weight = Some(210);

        assert!(!parse_height_weight("<p><span>6-2</span></p>", &mut record));
        assert_eq!(record.weight, Some(210));
    }
}
