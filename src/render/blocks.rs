// SPDX-License-Identifier: PMPL-1.0-or-later

//! Section block renderers
//!
//! One function per block kind. All of them borrow their input and are
//! safe to call repeatedly on the same data.

use super::{Element, Node};
use crate::content::{Block, CategorySection, RuleCard, Table, Warning, Zone};

/// Category keys whose list entries get bulleted secondary lines.
pub const BULLETED_LIST_KEYS: &[&str] = &["common"];

const BULLET: &str = "• ";

/// Visual severity of a penalty badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeClass {
    Perma,
    Danger,
    Warn,
    #[default]
    Mid,
}

impl BadgeClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeClass::Perma => "badge--perma",
            BadgeClass::Danger => "badge--danger",
            BadgeClass::Warn => "badge--warn",
            BadgeClass::Mid => "badge--mid",
        }
    }
}

/// Classify free-text penalty labels. Checks run in a fixed order on the
/// lower-cased text and the first hit wins, so "24h then 48h" is `Danger`.
pub fn badge_class(penalty: &str) -> BadgeClass {
    let p = penalty.to_lowercase();
    if p.contains("perma") {
        BadgeClass::Perma
    } else if p.contains("48") {
        BadgeClass::Danger
    } else if p.contains("24") {
        BadgeClass::Warn
    } else if p.contains("warn") {
        BadgeClass::Mid
    } else {
        BadgeClass::default()
    }
}

pub fn render_badge(penalty: &str) -> Node {
    Element::new("span")
        .class(&format!("badge {}", badge_class(penalty).css_class()))
        .text(penalty)
        .into()
}

pub fn render_rules_list(cards: &[RuleCard]) -> Node {
    let items = cards.iter().map(|card| {
        let head = Element::new("div")
            .class("ruleItem__head")
            .child(Element::new("div").class("ruleItem__title").text(&card.title))
            .child(render_badge(&card.penalty));

        let mut row = Element::new("div").class("ruleItem").child(head);
        if !card.desc.is_empty() {
            row = row.child(Element::new("div").class("ruleItem__desc").text(&card.desc));
        }
        Node::from(row)
    });
    Element::new("div").class("rulesList").children(items).into()
}

pub fn render_warning(warning: &Warning) -> Node {
    Element::new("div")
        .class("warning")
        .child(Element::new("p").class("warning__title").text(&warning.title))
        .child(Element::new("p").class("warning__desc").text(&warning.desc))
        .into()
}

/// Cells are copied verbatim; ragged rows stay ragged.
pub fn render_table(table: &Table) -> Node {
    let header = Element::new("tr").children(
        table
            .headers
            .iter()
            .map(|h| Node::from(Element::new("th").text(h))),
    );
    let rows = table.rows.iter().map(|row| {
        Node::from(
            Element::new("tr").children(row.iter().map(|cell| Node::from(Element::new("td").text(cell)))),
        )
    });

    let el = Element::new("table")
        .class("table")
        .child(Element::new("thead").child(header))
        .child(Element::new("tbody").children(rows));
    Element::new("div").class("tableWrap").child(el).into()
}

pub fn render_list(section_key: &str, items: &[String]) -> Node {
    let bulleted = BULLETED_LIST_KEYS.contains(&section_key);
    let lis = items.iter().map(|item| Node::from(render_list_item(item, bulleted)));
    Element::new("ul").class("list").children(lis).into()
}

fn render_list_item(item: &str, bulleted: bool) -> Element {
    let Some((first, rest)) = item.split_once('\n') else {
        return Element::new("li").class("list__item").text(item);
    };

    let rest = rest.trim();
    let secondary = if bulleted {
        // Blank lines are kept as spacing and get no bullet.
        rest.lines()
            .map(str::trim)
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", BULLET, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        rest.to_string()
    };

    Element::new("li")
        .class("list__item list__item--split")
        .child(Element::new("div").class("list__primary").text(first.trim()))
        .child(Element::new("div").class("list__secondary").text(secondary))
}

pub fn render_zones(zones: &[Zone]) -> Node {
    let cells = zones.iter().map(|zone| {
        let mut el = Element::new("div").class("safeZone");
        if let Some(img) = zone.img.as_deref().filter(|src| !src.is_empty()) {
            el = el.child(
                Element::new("img")
                    .class("safeZone__img")
                    .attr("src", img)
                    .attr("alt", &zone.name)
                    .attr("loading", "lazy"),
            );
        }
        Node::from(
            el.child(Element::new("div").class("safeZone__name").text(&zone.name))
                .child(Element::new("div").class("safeZone__note").text(&zone.note)),
        )
    });
    Element::new("div").class("safeZones").children(cells).into()
}

pub fn render_block(section_key: &str, block: Block<'_>) -> Node {
    match block {
        Block::Cards(cards) => render_rules_list(cards),
        Block::Warning(warning) => render_warning(warning),
        Block::GeneralCard(card) => render_rules_list(std::slice::from_ref(card)),
        Block::Table(table) => render_table(table),
        Block::List(items) => render_list(section_key, items),
        Block::Zones(zones) => render_zones(zones),
    }
}

/// Detail body for a section: one node per present block, in block order.
pub fn render_section_body(section_key: &str, section: &CategorySection) -> Vec<Node> {
    section
        .blocks()
        .into_iter()
        .map(|block| render_block(section_key, block))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, penalty: &str, desc: &str) -> RuleCard {
        RuleCard {
            title: title.into(),
            penalty: penalty.into(),
            desc: desc.into(),
        }
    }

    #[test]
    fn badge_precedence() {
        assert_eq!(badge_class("PERMA"), BadgeClass::Perma);
        assert_eq!(badge_class("48H Ban"), BadgeClass::Danger);
        assert_eq!(badge_class("24H Ban"), BadgeClass::Warn);
        assert_eq!(badge_class("Warning"), BadgeClass::Mid);
        assert_eq!(badge_class("???"), BadgeClass::Mid);
        assert_eq!(badge_class(""), BadgeClass::Mid);
        assert_eq!(badge_class("24H or 48H"), BadgeClass::Danger);
        assert_eq!(badge_class("Permanent after 24h"), BadgeClass::Perma);
    }

    #[test]
    fn empty_description_is_omitted() {
        let node = render_rules_list(&[card("A", "24H Ban", ""), card("B", "PERMA", "why")]);
        assert_eq!(node.find_by_class("ruleItem").len(), 2);
        assert_eq!(node.find_by_class("ruleItem__desc").len(), 1);
        let badges = node.find_by_class("badge");
        assert!(badges[0].has_class("badge--warn"));
        assert!(badges[1].has_class("badge--perma"));
    }

    #[test]
    fn table_keeps_ragged_rows() {
        let table = Table {
            headers: vec!["Heist".into(), "Days".into()],
            rows: vec![vec!["Fleeca".into()], vec!["Paleto".into(), "السبت".into(), "x".into()]],
        };
        let node = render_table(&table);
        assert_eq!(node.elements().iter().filter(|e| e.tag == "th").count(), 2);
        let rows: Vec<_> = node.elements().into_iter().filter(|e| e.tag == "tr").collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].children.len(), 1);
        assert_eq!(rows[2].children.len(), 3);
        assert!(node.to_html().contains("<td>السبت</td>"));
    }

    #[test]
    fn list_splits_on_line_break() {
        let items = vec!["single".to_string(), " Head \n line one\nline two \n".to_string()];
        let node = render_list("gang", &items);
        let lis = node.find_by_class("list__item");
        assert_eq!(lis.len(), 2);
        assert_eq!(Node::from(lis[0].clone()).text_content(), "single");
        let primary = node.find_by_class("list__primary");
        assert_eq!(Node::from(primary[0].clone()).text_content(), "Head");
        let secondary = node.find_by_class("list__secondary");
        assert_eq!(Node::from(secondary[0].clone()).text_content(), "line one\nline two");
    }

    #[test]
    fn common_list_bullets_secondary_lines() {
        let items = vec!["Clips\nKeep footage\n\nUpload in 24h".to_string()];
        let node = render_list("common", &items);
        let secondary = node.find_by_class("list__secondary");
        assert_eq!(
            Node::from(secondary[0].clone()).text_content(),
            "• Keep footage\n\n• Upload in 24h"
        );
    }

    #[test]
    fn zones_render_image_name_note_in_order() {
        let zones = vec![
            Zone {
                name: "Hospital".into(),
                note: "No crime".into(),
                img: Some("assets/hospital.png".into()),
            },
            Zone {
                name: "Fish".into(),
                note: "No crime".into(),
                img: None,
            },
        ];
        let node = render_zones(&zones);
        let cells = node.find_by_class("safeZone");
        assert_eq!(cells.len(), 2);
        let first: Vec<_> = cells[0].children.iter().filter_map(Node::as_element).collect();
        assert_eq!(first[0].tag, "img");
        assert_eq!(first[0].get_attr("alt"), Some("Hospital"));
        assert_eq!(first[0].get_attr("loading"), Some("lazy"));
        assert!(first[1].has_class("safeZone__name"));
        assert!(first[2].has_class("safeZone__note"));
        assert_eq!(cells[1].children.len(), 2);
    }

    #[test]
    fn section_body_follows_block_order_and_leaves_input_untouched() {
        let section = CategorySection {
            title: "Robbery".into(),
            general_card: Some(card("General", "48H Ban", "d")),
            warning: Some(Warning {
                title: "Warning".into(),
                desc: "d".into(),
            }),
            list: Some(vec!["x".into()]),
            ..Default::default()
        };
        let before = section.clone();
        let body = render_section_body("robbery", &section);
        let classes: Vec<_> = body
            .iter()
            .map(|n| n.as_element().and_then(|e| e.get_attr("class")).unwrap_or(""))
            .collect();
        assert_eq!(classes, vec!["warning", "rulesList", "list"]);
        assert_eq!(render_section_body("robbery", &section), body);
        assert_eq!(section, before);
    }
}
