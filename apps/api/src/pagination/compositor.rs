//! Markup composition: turns a page's fragment list back into renderable markup.

use crate::pagination::document::{Block, Document, ListContainer, Node, Section};
use crate::pagination::engine::{Fragment, Page};

/// Reconstructs page content from the original nodes.
///
/// Implementations must keep the section container's classes and splittable
/// marker, the list container's tag and classes, and every item's markup
/// unchanged, so a fragment renders identically on whichever page it lands.
pub trait MarkupCompositor {
    fn compose(&self, document: &Document, page: &Page) -> String;
}

/// Serializes fragments as HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCompositor;

impl MarkupCompositor for HtmlCompositor {
    fn compose(&self, document: &Document, page: &Page) -> String {
        let mut out = String::new();
        for fragment in &page.fragments {
            let Some(block) = document.blocks.get(fragment.block()) else {
                continue;
            };
            match (fragment, block) {
                (Fragment::Whole { .. }, Block::Fixed(node)) => out.push_str(&node.markup),
                (Fragment::Whole { .. }, Block::Splittable(section)) => {
                    let items = section.list.as_ref().map(|l| l.items.as_slice()).unwrap_or(&[]);
                    write_section(&mut out, section, section.heading.as_ref(), items);
                }
                (
                    Fragment::Section {
                        with_heading,
                        items,
                        ..
                    },
                    Block::Splittable(section),
                ) => {
                    let all = section.list.as_ref().map(|l| l.items.as_slice()).unwrap_or(&[]);
                    let slice = all.get(items.clone()).unwrap_or(&[]);
                    let heading = section.heading.as_ref().filter(|_| *with_heading);
                    write_section(&mut out, section, heading, slice);
                }
                // A section fragment never points at a fixed block.
                (Fragment::Section { .. }, Block::Fixed(node)) => out.push_str(&node.markup),
            }
        }
        out
    }
}

fn write_section(out: &mut String, section: &Section, heading: Option<&Node>, items: &[Node]) {
    out.push_str("<div class=\"");
    out.push_str(&escape_attr(&section.class));
    out.push_str("\" data-splittable=\"true\">");
    if let Some(heading) = heading {
        out.push_str(&heading.markup);
    }
    if let Some(list) = &section.list {
        write_list(out, list, items);
    }
    out.push_str("</div>");
}

fn write_list(out: &mut String, list: &ListContainer, items: &[Node]) {
    let tag = list_tag(&list.tag);
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(&escape_attr(&list.class));
    out.push_str("\">");
    for item in items {
        out.push_str(&item.markup);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Accepts a plain element name, anything else degrades to `div`.
fn list_tag(tag: &str) -> &str {
    let valid = !tag.is_empty()
        && tag.len() <= 16
        && tag.chars().all(|c| c.is_ascii_alphanumeric())
        && tag.starts_with(|c: char| c.is_ascii_alphabetic());
    if valid {
        tag
    } else {
        "div"
    }
}

pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::document::NodeId;

    fn document() -> Document {
        Document::new(vec![
            Block::Fixed(Node::new(NodeId(0), "<table>edu</table>")),
            Block::Splittable(Section {
                id: NodeId(1),
                class: "mb-6 break-inside-avoid".to_string(),
                heading: Some(Node::new(NodeId(2), "<h2>Projects</h2>")),
                list: Some(ListContainer {
                    tag: "ul".to_string(),
                    class: "custom-bullet-list".to_string(),
                    items: vec![
                        Node::new(NodeId(3), "<li>one</li>"),
                        Node::new(NodeId(4), "<li>two</li>"),
                        Node::new(NodeId(5), "<li>three</li>"),
                    ],
                }),
            }),
        ])
    }

    fn page(fragments: Vec<Fragment>) -> Page {
        Page {
            index: 0,
            fragments,
            used_height: 0.0,
        }
    }

    #[test]
    fn test_whole_blocks_keep_original_markup() {
        let html = HtmlCompositor.compose(
            &document(),
            &page(vec![Fragment::Whole { block: 0 }, Fragment::Whole { block: 1 }]),
        );
        assert_eq!(
            html,
            "<table>edu</table>\
             <div class=\"mb-6 break-inside-avoid\" data-splittable=\"true\">\
             <h2>Projects</h2><ul class=\"custom-bullet-list\">\
             <li>one</li><li>two</li><li>three</li></ul></div>"
        );
    }

    #[test]
    fn test_continuation_fragment_omits_heading() {
        let html = HtmlCompositor.compose(
            &document(),
            &page(vec![Fragment::Section {
                block: 1,
                with_heading: false,
                items: 1..3,
            }]),
        );
        assert!(!html.contains("<h2>"));
        assert!(html.starts_with("<div class=\"mb-6 break-inside-avoid\" data-splittable=\"true\">"));
        assert!(html.contains("<ul class=\"custom-bullet-list\"><li>two</li><li>three</li></ul>"));
    }

    #[test]
    fn test_out_of_range_items_are_ignored() {
        let html = HtmlCompositor.compose(
            &document(),
            &page(vec![Fragment::Section {
                block: 1,
                with_heading: true,
                items: 2..9,
            }]),
        );
        assert!(html.contains("<h2>Projects</h2><ul class=\"custom-bullet-list\"></ul>"));
    }

    #[test]
    fn test_hostile_class_and_tag_are_neutralised() {
        let doc = Document::new(vec![Block::Splittable(Section {
            id: NodeId(0),
            class: "x\"><script>".to_string(),
            heading: None,
            list: Some(ListContainer {
                tag: "ul onload=alert(1)".to_string(),
                class: String::new(),
                items: vec![],
            }),
        })]);
        let html = HtmlCompositor.compose(&doc, &page(vec![Fragment::Whole { block: 0 }]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<div class=\"\"></div>"));
    }
}
