// Preview pipeline: resume data → on-campus document → pages → print HTML.
// Sessions hold the editable resume and the last good page sequence.

pub mod builder;
pub mod export;
pub mod handlers;
pub mod images;
pub mod markup;
pub mod render;
pub mod store;
