//! Page geometry and the per-page height budgets derived from it.
//!
//! All values are CSS pixels at 96dpi. An A4 sheet (297mm) is 1123px tall.

use serde::{Deserialize, Serialize};

/// A4 height in CSS pixels.
pub const A4_HEIGHT_PX: f32 = 1123.0;
/// A4 width in CSS pixels.
pub const A4_WIDTH_PX: f32 = 794.0;

/// Fixed page geometry. Header and footer heights are measured per pass and
/// passed separately to [`PageBudget::from_geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_height: f32,
    /// Top + bottom page padding on page 0 (pt-16 + pb-2).
    pub first_page_padding_y: f32,
    /// Top + bottom page padding on every later page (pt-10 + pb-2).
    pub continuation_padding_y: f32,
    /// Top padding of the main region, page 0 only.
    pub main_padding_top: f32,
    /// Absorbs sub-pixel rounding in reported measurements.
    pub safety_buffer: f32,
}

impl PageGeometry {
    /// Geometry of the on-campus A4 template.
    pub fn a4() -> Self {
        Self {
            page_height: A4_HEIGHT_PX,
            first_page_padding_y: 64.0 + 8.0,
            continuation_padding_y: 40.0 + 8.0,
            main_padding_top: 8.0,
            safety_buffer: 5.0,
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Available content height for the first page and for continuation pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBudget {
    pub first_page: f32,
    pub continuation_page: f32,
}

impl PageBudget {
    #[cfg(test)]
    pub fn new(first_page: f32, continuation_page: f32) -> Self {
        Self {
            first_page,
            continuation_page,
        }
    }

    /// Computes both budgets.
    ///
    /// `header_height` is the persistent header block (banner + rule) shown on
    /// page 0 only; `footer_height` is repeated on every page.
    pub fn from_geometry(geometry: &PageGeometry, header_height: f32, footer_height: f32) -> Self {
        let first_page = geometry.page_height
            - geometry.first_page_padding_y
            - header_height
            - footer_height
            - geometry.main_padding_top
            - geometry.safety_buffer;
        let continuation_page = geometry.page_height
            - geometry.continuation_padding_y
            - footer_height
            - geometry.safety_buffer;

        Self {
            first_page: first_page.max(0.0),
            continuation_page: continuation_page.max(0.0),
        }
    }

    /// Budget for the page at `page_index` (0 = first page).
    pub fn available(&self, page_index: usize) -> f32 {
        if page_index == 0 {
            self.first_page
        } else {
            self.continuation_page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_budgets_subtract_chrome() {
        let geometry = PageGeometry::a4();
        let budget = PageBudget::from_geometry(&geometry, 200.0, 60.0);
        // 1123 - 72 - 200 - 60 - 8 - 5
        assert!((budget.first_page - 778.0).abs() < 1e-3);
        // 1123 - 48 - 60 - 5
        assert!((budget.continuation_page - 1010.0).abs() < 1e-3);
    }

    #[test]
    fn test_first_page_is_tighter_than_continuation() {
        let budget = PageBudget::from_geometry(&PageGeometry::a4(), 150.0, 50.0);
        assert!(budget.first_page < budget.continuation_page);
        assert_eq!(budget.available(0), budget.first_page);
        assert_eq!(budget.available(1), budget.continuation_page);
        assert_eq!(budget.available(9), budget.continuation_page);
    }

    #[test]
    fn test_oversized_chrome_clamps_to_zero() {
        let budget = PageBudget::from_geometry(&PageGeometry::a4(), 5000.0, 5000.0);
        assert_eq!(budget.first_page, 0.0);
        assert_eq!(budget.continuation_page, 0.0);
    }
}
