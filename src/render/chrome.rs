// SPDX-License-Identifier: PMPL-1.0-or-later

//! Page chrome: category grid, overlay picker and shell strings

use super::{Element, Node};
use crate::content::ContentDocument;
use crate::i18n::{t, Direction, Lang};
use crate::slug::slugify;

/// Category buttons for the main grid, in TOC order.
pub fn render_categories(doc: &ContentDocument, active: Option<&str>, dir: Direction) -> Vec<Node> {
    doc.toc
        .iter()
        .map(|entry| {
            let class = if active == Some(entry.key.as_str()) {
                "catCard catCard--active"
            } else {
                "catCard"
            };
            let hint = doc.section(&entry.key).map(|s| s.hint.as_str()).unwrap_or("");
            Element::new("button")
                .attr("type", "button")
                .class(class)
                .attr("id", format!("cat-{}", slugify(&entry.key)))
                .attr("data-key", entry.key.as_str())
                .child(Element::new("div").class("catCard__arrow").text(dir.arrow()))
                .child(Element::new("h3").class("catCard__title").text(entry.label.as_str()))
                .child(Element::new("div").class("catCard__desc").text(hint))
                .into()
        })
        .collect()
}

/// Links for the overlay picker. Each targets the category's fragment.
pub fn render_picker_links(doc: &ContentDocument, dir: Direction) -> Vec<Node> {
    doc.toc
        .iter()
        .map(|entry| {
            let slug = slugify(&entry.key);
            Element::new("a")
                .class("toc__item")
                .attr("href", format!("#{}", slug))
                .attr("id", format!("toc-{}", slug))
                .attr("data-key", entry.key.as_str())
                .child(Element::new("div").class("toc__label").text(entry.label.as_str()))
                .child(Element::new("div").class("toc__chev").text(dir.arrow()))
                .into()
        })
        .collect()
}

/// Every localized string the shell writes outside the detail body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellStrings {
    pub brand_subtitle: String,
    pub title: String,
    pub subtitle: String,
    pub desc: String,
    pub home_button: &'static str,
    pub categories_title: &'static str,
    pub categories_subtitle: &'static str,
    pub overlay_title: &'static str,
    pub toggle: &'static str,
    pub close: &'static str,
    pub back: &'static str,
    pub next: String,
    pub load_error: &'static str,
    pub retry: &'static str,
}

/// Shell strings for `lang`.
///
/// Page texts come from the content document when one is loaded and fall
/// back to the catalog otherwise. The landing page (`home`) always uses its
/// own catalog strings, whatever the document says.
pub fn shell_strings(lang: Lang, doc: Option<&ContentDocument>, home: bool) -> ShellStrings {
    let (brand_subtitle, title, subtitle, desc) = if home {
        (
            t(lang, "home.brand_subtitle").to_string(),
            t(lang, "home.title").to_string(),
            t(lang, "home.subtitle").to_string(),
            t(lang, "home.desc").to_string(),
        )
    } else if let Some(doc) = doc {
        (
            doc.top_subtitle.clone(),
            doc.title.clone(),
            doc.subtitle.clone(),
            doc.desc.clone(),
        )
    } else {
        (
            t(lang, "shell.brand_subtitle").to_string(),
            t(lang, "shell.title").to_string(),
            String::new(),
            String::new(),
        )
    };

    ShellStrings {
        brand_subtitle,
        title,
        subtitle,
        desc,
        home_button: t(lang, "home.button"),
        categories_title: t(lang, "nav.categories"),
        categories_subtitle: t(lang, "nav.categories_subtitle"),
        overlay_title: t(lang, "nav.categories"),
        toggle: t(lang, "nav.categories"),
        close: t(lang, "nav.close"),
        back: t(lang, "nav.back"),
        next: format!("{} {}", t(lang, "nav.next"), lang.direction().arrow()),
        load_error: t(lang, "error.load"),
        retry: t(lang, "error.retry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CategorySection, TocEntry};

    fn doc() -> ContentDocument {
        let mut doc = ContentDocument {
            top_subtitle: "Official Rules".into(),
            title: "Rules".into(),
            toc: vec![TocEntry::new("core", "Core Rules"), TocEntry::new("gang", "Gangs")],
            ..Default::default()
        };
        doc.sections.insert(
            "core".into(),
            CategorySection {
                title: "Core".into(),
                hint: "Basics".into(),
                ..Default::default()
            },
        );
        doc
    }

    #[test]
    fn grid_marks_active_and_tolerates_missing_section() {
        let nodes = render_categories(&doc(), Some("gang"), Direction::Ltr);
        assert_eq!(nodes.len(), 2);
        let core = nodes[0].as_element().unwrap();
        let gang = nodes[1].as_element().unwrap();
        assert!(!core.has_class("catCard--active"));
        assert!(gang.has_class("catCard--active"));
        assert_eq!(core.get_attr("id"), Some("cat-core"));
        assert_eq!(nodes[0].find_by_class("catCard__desc")[0].children, vec![Node::text("Basics")]);
        assert_eq!(nodes[1].find_by_class("catCard__desc")[0].children, vec![Node::text("")]);
    }

    #[test]
    fn picker_links_point_at_fragments_and_follow_direction() {
        let nodes = render_picker_links(&doc(), Direction::Rtl);
        let link = nodes[0].as_element().unwrap();
        assert_eq!(link.get_attr("href"), Some("#core"));
        assert!(link.is_focusable());
        assert_eq!(Node::from(nodes[1].find_by_class("toc__chev")[0].clone()).text_content(), "←");
    }

    #[test]
    fn shell_prefers_document_then_catalog() {
        let doc = doc();
        let strings = shell_strings(Lang::En, Some(&doc), false);
        assert_eq!(strings.title, "Rules");
        assert_eq!(strings.next, "Next →");

        let fallback = shell_strings(Lang::Ar, None, false);
        assert_eq!(fallback.brand_subtitle, "قوانين السيرفر");
        assert_eq!(fallback.next, "التالي ←");
        assert_eq!(fallback.retry, "إعادة المحاولة");
    }

    #[test]
    fn home_variant_ignores_document() {
        let doc = doc();
        let strings = shell_strings(Lang::En, Some(&doc), true);
        assert_eq!(strings.brand_subtitle, "Rules Portal");
        assert_eq!(strings.home_button, "Open Categories");
    }
}
