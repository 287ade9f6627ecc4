//! Export preflight: image checks and the suggested download name.

use crate::models::{is_placeholder, ResumeData, Template};

/// Returns the message to show when `template` still needs real images, or `None`.
pub fn validate_images(data: &ResumeData, template: Template) -> Option<&'static str> {
    let photo_missing =
        template.requires_photo() && is_placeholder(&data.personal_details.photo);
    let logo_missing = template.requires_logo() && is_placeholder(&data.personal_details.logo);

    match (photo_missing, logo_missing) {
        (true, true) => {
            Some("Please upload a profile photo and the institute logo before downloading.")
        }
        (true, false) => Some("Please upload a profile photo before downloading."),
        (false, true) => Some("Please upload the institute logo before downloading."),
        (false, false) => None,
    }
}

/// `JOHN DOE` → `JOHN_DOE_Resume.pdf`. Every whitespace character becomes `_`.
pub fn export_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}_Resume.pdf")
}
