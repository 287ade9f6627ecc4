//! Paginator: owns the last good page sequence and recomputes it on demand.
//!
//! A pass runs only when the renderer signals that layout is stable and hands
//! over a [`LayoutSnapshot`]. Every pass rebuilds the pages from scratch. A
//! snapshot missing its structural anchors aborts the pass and the previous
//! pages stay in place, marked stale.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pagination::budget::{PageBudget, PageGeometry};
use crate::pagination::document::{Document, Node};
use crate::pagination::engine::{paginate, Page};
use crate::pagination::measure::{sanitized, MeasuredHeights};

/// Everything a pass needs, captured once layout has settled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Persistent header banner (including its rule), page 0 only.
    pub header: Option<Node>,
    /// Persistent footer, every page.
    pub footer: Option<Node>,
    /// Main region content, unpaginated.
    pub main: Option<Document>,
    #[serde(default)]
    pub heights: MeasuredHeights,
    /// Main-region top padding as rendered, overriding the geometry default.
    #[serde(default)]
    pub main_padding_top: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Header,
    Footer,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    Paginated { pages: usize },
    /// Pass aborted; previous pages (if any) are kept.
    Skipped { missing: Anchor },
}

/// The result of the last successful pass, with everything needed to render it.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedView {
    pub header: Node,
    pub footer: Node,
    pub document: Document,
    pub budget: PageBudget,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    geometry: PageGeometry,
    current: Option<PaginatedView>,
    generation: u64,
    stale: bool,
}

impl Paginator {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            current: None,
            generation: 0,
            stale: false,
        }
    }

    /// Runs a pass over `snapshot`. Supersedes whatever the previous pass produced.
    pub fn layout_stable(&mut self, snapshot: LayoutSnapshot) -> PassOutcome {
        let LayoutSnapshot {
            header,
            footer,
            main,
            heights,
            main_padding_top,
        } = snapshot;

        let (header, footer, main) = match (header, footer, main) {
            (Some(header), Some(footer), Some(main)) => (header, footer, main),
            (header, footer, _) => {
                let missing = if header.is_none() {
                    Anchor::Header
                } else if footer.is_none() {
                    Anchor::Footer
                } else {
                    Anchor::Main
                };
                debug!(?missing, generation = self.generation, "Layout snapshot incomplete, keeping previous pages");
                self.stale = true;
                return PassOutcome::Skipped { missing };
            }
        };

        let mut geometry = self.geometry;
        if let Some(padding) = main_padding_top.filter(|p| p.is_finite()) {
            geometry.main_padding_top = padding.max(0.0);
        }
        let budget = PageBudget::from_geometry(
            &geometry,
            sanitized(&heights, header.id),
            sanitized(&heights, footer.id),
        );

        let pages = paginate(&main, &budget, &heights);
        let count = pages.len();

        self.generation += 1;
        self.stale = false;
        self.current = Some(PaginatedView {
            header,
            footer,
            document: main,
            budget,
            pages,
        });

        debug!(pages = count, generation = self.generation, "Pages recomputed");
        PassOutcome::Paginated { pages: count }
    }

    pub fn view(&self) -> Option<&PaginatedView> {
        self.current.as_ref()
    }

    /// Number of successful passes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the most recent pass was skipped.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
