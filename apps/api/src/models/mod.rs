pub mod resume;
pub mod sample;
pub mod template;

pub use resume::{EditError, ResumeData, SectionKey};
pub use sample::{is_placeholder, sample_resume};
pub use template::Template;
