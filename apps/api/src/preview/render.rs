//! Page rendering: wraps each composed page in its A4 container with chrome.

use serde::Serialize;

use crate::pagination::{Fragment, MarkupCompositor, PaginatedView};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub index: usize,
    pub used_height: f32,
    pub fragments: Vec<Fragment>,
    pub html: String,
}

/// Renders every page of `view`: header on page 0 only, footer on every page.
pub fn render_pages(view: &PaginatedView, compositor: &dyn MarkupCompositor) -> Vec<RenderedPage> {
    view.pages
        .iter()
        .map(|page| {
            let first = page.index == 0;
            let mut html = format!(
                "<div class=\"resume-page-container bg-white shadow-lg px-10 pb-2 w-[210mm] h-[297mm] \
                 flex flex-col text-black leading-relaxed {}\">",
                if first { "pt-16" } else { "pt-10" }
            );
            if first {
                html.push_str(&view.header.markup);
            }
            html.push_str(&format!(
                "<main class=\"text-[15px] flex-grow {}\">",
                if first { "pt-2" } else { "pt-0" }
            ));
            html.push_str(&compositor.compose(&view.document, page));
            html.push_str("</main>");
            html.push_str(&view.footer.markup);
            html.push_str("</div>");

            RenderedPage {
                index: page.index,
                used_height: page.used_height,
                fragments: page.fragments.clone(),
                html,
            }
        })
        .collect()
}

const PRINT_STYLES: &str = "\
@page { size: A4; margin: 0; }
body { margin: 0; font-family: 'Lato', sans-serif; }
.resume-page-container { box-sizing: border-box; overflow: hidden; page-break-after: always; break-after: page; }
.resume-page-container:last-child { page-break-after: auto; break-after: auto; }";

/// A standalone print document: one A4 sheet per page, ready for a PDF printer.
pub fn print_document(title: &str, pages: &[RenderedPage]) -> String {
    let mut html = String::from("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\" />");
    html.push_str("<title>");
    html.push_str(&crate::preview::markup::escape_html(title));
    html.push_str("</title>");
    html.push_str(
        "<link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css2?family=Lato:wght@400;700&display=swap\" />",
    );
    html.push_str("<style>");
    html.push_str(PRINT_STYLES);
    html.push_str("</style></head><body>");
    for page in pages {
        html.push_str(&page.html);
    }
    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_resume;
    use crate::pagination::{HtmlCompositor, PageGeometry, Paginator};
    use crate::preview::builder::build_preview;

    fn view() -> PaginatedView {
        let mut paginator = Paginator::new(PageGeometry::a4());
        paginator.layout_stable(build_preview(&sample_resume()));
        paginator.view().cloned().unwrap()
    }

    #[test]
    fn test_header_only_on_first_page_footer_everywhere() {
        let view = view();
        let pages = render_pages(&view, &HtmlCompositor);
        assert!(pages.len() >= 2);
        assert!(pages[0].html.contains("<header"));
        assert!(pages[0].html.contains("pt-16"));
        for page in &pages[1..] {
            assert!(!page.html.contains("<header"));
            assert!(page.html.contains("pt-10"));
        }
        assert!(pages.iter().all(|p| p.html.contains("<footer")));
    }

    #[test]
    fn test_print_document_contains_every_page() {
        let view = view();
        let pages = render_pages(&view, &HtmlCompositor);
        let doc = print_document("JOHN DOE <Resume>", &pages);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>JOHN DOE &lt;Resume&gt;</title>"));
        assert_eq!(doc.matches("class=\"resume-page-container").count(), pages.len());
    }
}
