//! Document helpers shared by the listing and detail passes.
//!
//! Lookups walk the element tree and compare attributes directly instead of
//! building CSS selectors, since several ids on the site contain dots
//! (`defense_standard.Career`).

use scraper::{ElementRef, Html};
use std::collections::VecDeque;
use tracing::trace;

/// Parse a page and splice commented-out tables back into the tree.
pub fn parse_document(markup: &str) -> Html {
    let mut document = Html::parse_document(markup);
    unwrap_commented_tables(&mut document);
    document
}

/// Replace every comment that hides a `<table` with its parsed content.
///
/// The site ships many secondary tables inside HTML comments and reveals
/// them client-side. Returns the number of comments unwrapped.
pub fn unwrap_commented_tables(document: &mut Html) -> usize {
    let hidden: Vec<_> = document
        .tree
        .nodes()
        .filter_map(|node| {
            let text: &str = node.value().as_comment()?;
            text.contains("<table")
                .then(|| (node.id(), text.to_string()))
        })
        .collect();

    for (comment_id, text) in &hidden {
        let fragment = Html::parse_fragment(text);
        let mut queue = VecDeque::new();

        for child in fragment.root_element().children() {
            let Some(mut anchor) = document.tree.get_mut(*comment_id) else {
                break;
            };
            let copied = anchor.insert_before(child.value().clone()).id();
            queue.push_back((child, copied));
        }

        while let Some((source, target)) = queue.pop_front() {
            for child in source.children() {
                let Some(mut parent) = document.tree.get_mut(target) else {
                    continue;
                };
                let copied = parent.append(child.value().clone()).id();
                queue.push_back((child, copied));
            }
        }

        if let Some(mut comment) = document.tree.get_mut(*comment_id) {
            comment.detach();
        }
    }

    if !hidden.is_empty() {
        trace!(count = hidden.len(), "Unwrapped commented tables");
    }
    hidden.len()
}

/// First `<tag id="id">` anywhere under `root`.
pub fn find_by_id<'a>(root: ElementRef<'a>, tag: &str, id: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag && el.value().id() == Some(id))
}

/// First direct child element named `tag`.
pub fn child_element<'a>(parent: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// Direct `<tr>` children of the table's `<tbody>`, minus repeated
/// `thead` rows.
pub fn body_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    child_element(table, "tbody")
        .into_iter()
        .flat_map(|body| body.children().filter_map(ElementRef::wrap))
        .filter(|el| el.value().name() == "tr")
        .filter(|el| !el.value().classes().any(|class| class == "thead"))
}

/// The cell of `row` whose `data-stat` is `field` (either `th` or `td`).
pub fn stat_cell<'a>(row: ElementRef<'a>, field: &str) -> Option<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .find(|cell| cell.value().attr("data-stat") == Some(field))
}

/// Trimmed text of an element; `None` when blank.
pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text: String = el.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn cell_text(row: ElementRef<'_>, field: &str) -> Option<String> {
    stat_cell(row, field).and_then(element_text)
}

/// `href` of the first anchor inside the `field` cell.
pub fn cell_link(row: ElementRef<'_>, field: &str) -> Option<String> {
    stat_cell(row, field)?
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(String::from)
}

/// Best-effort integer: `"1,234"` → 1234, anything unreadable → `None`.
pub fn to_int(text: &str) -> Option<i64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Best-effort float; rejects NaN and infinities.
pub fn to_float(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"6-2"` → 74. Anything else (`"tall"`, `"6-"`, `"6-14"`) → `None`.
pub fn height_to_inches(text: &str) -> Option<u32> {
    let (feet, inches) = text.trim().split_once('-')?;
    if !is_digits(feet) || !is_digits(inches) {
        return None;
    }
    let feet: u32 = feet.parse().ok()?;
    let inches: u32 = inches.parse().ok()?;
    (inches < 12).then(|| feet * 12 + inches)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_to_inches() {
        assert_eq!(height_to_inches("6-2"), Some(74));
        assert_eq!(height_to_inches(" 5-11 "), Some(71));
        assert_eq!(height_to_inches("6-0"), Some(72));
        assert_eq!(height_to_inches("tall"), None);
        assert_eq!(height_to_inches("6-"), None);
        assert_eq!(height_to_inches("-2"), None);
        assert_eq!(height_to_inches("6-14"), None);
        assert_eq!(height_to_inches(""), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_int("22"), Some(22));
        assert_eq!(to_int("1,234"), Some(1234));
        assert_eq!(to_int("-7"), Some(-7));
        assert_eq!(to_int(""), None);
        assert_eq!(to_int("n/a"), None);
        assert_eq!(to_int("4.5"), None);

        assert_eq!(to_float("64.5"), Some(64.5));
        assert_eq!(to_float("12"), Some(12.0));
        assert_eq!(to_float("1,001.5"), Some(1001.5));
        assert_eq!(to_float("NaN"), None);
        assert_eq!(to_float(" "), None);
    }

    #[test]
    fn test_unwrap_commented_tables() {
        let markup = r#"<html><body>
            <div id="wrap"><!--
              <table id="hidden"><tbody><tr><td data-stat="x">1</td></tr></tbody></table>
            --></div>
            <!-- just a note -->
        </body></html>"#;

        let mut document = Html::parse_document(markup);
        assert!(find_by_id(document.root_element(), "table", "hidden").is_none());

        assert_eq!(unwrap_commented_tables(&mut document), 1);

        let table = find_by_id(document.root_element(), "table", "hidden").unwrap();
        let rows: Vec<_> = body_rows(table).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(cell_text(rows[0], "x").as_deref(), Some("1"));

        let wrap = find_by_id(document.root_element(), "div", "wrap").unwrap();
        assert!(wrap.children().all(|n| !n.value().is_comment()));
    }

    #[test]
    fn test_cell_helpers() {
        let document = parse_document(
            r#"<table id="t"><tbody>
                <tr>
                  <th data-stat="player"> J. Doe </th>
                  <td data-stat="cfb"><a href="/cfb/players/j-doe-1.html">College Stats</a></td>
                  <td data-stat="age"></td>
                </tr>
            </tbody></table>"#,
        );
        let table = find_by_id(document.root_element(), "table", "t").unwrap();
        let row = body_rows(table).next().unwrap();

        assert_eq!(cell_text(row, "player").as_deref(), Some("J. Doe"));
        assert_eq!(cell_text(row, "age"), None);
        assert_eq!(cell_text(row, "missing"), None);
        assert_eq!(
            cell_link(row, "cfb").as_deref(),
            Some("/cfb/players/j-doe-1.html")
        );
        assert_eq!(cell_link(row, "player"), None);
    }
}
