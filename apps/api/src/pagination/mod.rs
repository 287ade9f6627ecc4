// Pagination: packs a measured, unpaginated document into fixed-height pages.
// The engine is synchronous and pure; measurement and markup are injected.

pub mod budget;
pub mod compositor;
pub mod document;
pub mod engine;
pub mod measure;
pub mod session;
pub mod text_metrics;

pub use budget::{PageBudget, PageGeometry};
pub use compositor::{HtmlCompositor, MarkupCompositor};
pub use document::{Block, Document, ListContainer, Node, NodeIds, Section};
pub use engine::Fragment;
pub use measure::MeasuredHeights;
pub use session::{LayoutSnapshot, PaginatedView, Paginator, PassOutcome};
