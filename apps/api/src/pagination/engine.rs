//! Pagination Engine — greedy single-pass bin fill of a measured document.
//!
//! # Rules
//! - A block that fits on the current page is placed whole.
//! - A fixed block that does not fit starts the next page (alone if it is oversized).
//! - A splittable section that does not fit is distributed item by item. Its
//!   heading is never left at the bottom of a page without at least one item,
//!   and it is NOT repeated on continuation pages.
//! - An item (or fixed block) larger than a whole page is placed alone and
//!   allowed to overflow rather than looping.
//!
//! Pages are structured fragment lists referring back into the source
//! [`Document`]; turning them into markup is the compositor's job.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pagination::budget::PageBudget;
use crate::pagination::document::{Block, Document, Section};
use crate::pagination::measure::{sanitized, LayoutMeasurement};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A vertical slice of one top-level block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// The whole block at `block`, unsplit.
    Whole { block: usize },
    /// Part of a splittable section: optionally its heading, then `items`.
    Section {
        block: usize,
        with_heading: bool,
        items: Range<usize>,
    },
}

impl Fragment {
    pub fn block(&self) -> usize {
        match self {
            Fragment::Whole { block } | Fragment::Section { block, .. } => *block,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 0 = first page (carries the header chrome).
    pub index: usize,
    pub fragments: Vec<Fragment>,
    /// Sum of the measured heights placed on this page.
    pub used_height: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Core function
// ────────────────────────────────────────────────────────────────────────────

/// Packs `document` into pages that respect `budget`.
///
/// Deterministic: identical inputs always yield identical pages.
pub fn paginate(
    document: &Document,
    budget: &PageBudget,
    measure: &dyn LayoutMeasurement,
) -> Vec<Page> {
    let mut fill = PageFill::new(budget);

    for (index, block) in document.blocks.iter().enumerate() {
        let block_height = sanitized(measure, block.id());

        if fill.fits(block_height) {
            fill.place(Fragment::Whole { block: index }, block_height);
            continue;
        }

        match block {
            Block::Fixed(_) => fill.place_on_fresh_page(index, block_height),
            Block::Splittable(section) if section.parts().is_some() => {
                fill.place_section(index, section, measure)
            }
            Block::Splittable(section) if section.is_hollow() => {
                debug!(block = index, "Skipping splittable block without heading or list");
            }
            Block::Splittable(_) => {
                // Heading or list missing: cannot split, treat as atomic.
                fill.place_on_fresh_page(index, block_height);
            }
        }
    }

    let mut pages = fill.finish();

    if pages.is_empty() && !document.is_empty() {
        debug!(
            blocks = document.blocks.len(),
            "Pagination produced no pages, falling back to a single unpaginated page"
        );
        pages.push(Page {
            index: 0,
            fragments: (0..document.blocks.len())
                .map(|block| Fragment::Whole { block })
                .collect(),
            used_height: document
                .blocks
                .iter()
                .map(|b| sanitized(measure, b.id()))
                .sum(),
        });
    }

    debug!(
        pages = pages.len(),
        blocks = document.blocks.len(),
        "Pagination pass complete"
    );
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Internal accumulator
// ────────────────────────────────────────────────────────────────────────────

struct PageFill<'a> {
    budget: &'a PageBudget,
    pages: Vec<Page>,
    fragments: Vec<Fragment>,
    height: f32,
}

impl<'a> PageFill<'a> {
    fn new(budget: &'a PageBudget) -> Self {
        Self {
            budget,
            pages: Vec::new(),
            fragments: Vec::new(),
            height: 0.0,
        }
    }

    /// Budget of the page currently being filled. Page 0 until the first flush.
    fn available(&self) -> f32 {
        self.budget.available(self.pages.len())
    }

    fn fits(&self, height: f32) -> bool {
        self.height + height <= self.available()
    }

    fn place(&mut self, fragment: Fragment, height: f32) {
        self.fragments.push(fragment);
        self.height += height;
    }

    fn place_on_fresh_page(&mut self, block: usize, height: f32) {
        self.flush();
        self.place(Fragment::Whole { block }, height);
    }

    /// Closes the current page. No-op when nothing has been placed yet.
    fn flush(&mut self) {
        if self.fragments.is_empty() {
            return;
        }
        self.pages.push(Page {
            index: self.pages.len(),
            fragments: std::mem::take(&mut self.fragments),
            used_height: self.height,
        });
        self.height = 0.0;
    }

    fn place_section(
        &mut self,
        block: usize,
        section: &Section,
        measure: &dyn LayoutMeasurement,
    ) {
        let Some((heading, list)) = section.parts() else {
            return;
        };

        let heading_height = sanitized(measure, heading.id);
        let first_item_height = list
            .items
            .first()
            .map(|item| sanitized(measure, item.id))
            .unwrap_or(0.0);

        // Orphan control: heading and first item travel together.
        if self.height > 0.0 && !self.fits(heading_height + first_item_height) {
            self.flush();
        }

        let mut open = OpenSection {
            block,
            with_heading: true,
            items: 0..0,
        };
        self.height += heading_height;

        for (index, item) in list.items.iter().enumerate() {
            let item_height = sanitized(measure, item.id);

            if !open.items.is_empty() && !self.fits(item_height) {
                self.fragments.push(open.close());
                self.flush();
                open = OpenSection {
                    block,
                    with_heading: false,
                    items: index..index,
                };
            }

            open.items.end = index + 1;
            self.height += item_height;
        }

        self.fragments.push(open.close());
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        self.pages
    }
}

/// The in-progress slice of a section on the current page.
struct OpenSection {
    block: usize,
    with_heading: bool,
    items: Range<usize>,
}

impl OpenSection {
    fn close(&self) -> Fragment {
        Fragment::Section {
            block: self.block,
            with_heading: self.with_heading,
            items: self.items.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
