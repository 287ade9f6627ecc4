use serde::{Deserialize, Serialize};

/// Export rules are template-specific; the preview layout is always on-campus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    OnCampus,
    ModernCreative,
    CorporateMinimal,
}

impl Template {
    pub fn requires_photo(&self) -> bool {
        matches!(self, Template::OnCampus | Template::ModernCreative)
    }

    pub fn requires_logo(&self) -> bool {
        matches!(self, Template::OnCampus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids_are_kebab_case() {
        let t: Template = serde_json::from_str("\"modern-creative\"").unwrap();
        assert_eq!(t, Template::ModernCreative);
        assert_eq!(serde_json::to_string(&Template::OnCampus).unwrap(), "\"on-campus\"");
    }

    #[test]
    fn test_image_requirements() {
        assert!(Template::OnCampus.requires_photo() && Template::OnCampus.requires_logo());
        assert!(Template::ModernCreative.requires_photo());
        assert!(!Template::ModernCreative.requires_logo());
        assert!(!Template::CorporateMinimal.requires_photo());
    }
}
