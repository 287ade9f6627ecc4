//! Document builder: lays resume data out as the on-campus template's
//! unpaginated document, with a server-side height estimate for every node.
//!
//! Block order and splittability:
//!
//! | Section                              | Block      |
//! |--------------------------------------|------------|
//! | Educational Qualification            | fixed      |
//! | Academic Achievements                | splittable |
//! | Internship Experience                | splittable |
//! | Projects                             | splittable |
//! | Technical Skills and Certifications  | fixed      |
//! | Positions of Responsibility          | splittable |
//! | Extracurricular Activities           | splittable |
//!
//! Empty sections are left out. Heights are CSS pixels including vertical
//! margins, estimated from [`TextStyle`] word wrap plus the template's fixed
//! spacing. A client that reports real measurements replaces them.

use crate::models::resume::{
    Activity, Education, Internship, PersonalDetails, Position, Project, ResumeData, Skill,
};
use crate::pagination::budget::A4_WIDTH_PX;
use crate::pagination::text_metrics::{FontFamily, TextStyle};
use crate::pagination::{
    Block, Document, LayoutSnapshot, ListContainer, MeasuredHeights, Node, NodeIds, Section,
};
use crate::preview::markup::{
    escape_html, inline_rich_text, non_blank_lines, rich_text, visible_text,
};

// ────────────────────────────────────────────────────────────────────────────
// Template geometry (CSS px)
// ────────────────────────────────────────────────────────────────────────────

const PAGE_PADDING_X: f32 = 40.0;
pub const CONTENT_WIDTH_PX: f32 = A4_WIDTH_PX - 2.0 * PAGE_PADDING_X;
const BULLET_INDENT: f32 = 24.0;
const LIST_WIDTH: f32 = CONTENT_WIDTH_PX - BULLET_INDENT;

const SECTION_CLASS: &str = "mb-6 break-inside-avoid";
const SECTION_MARGIN_BOTTOM: f32 = 24.0;
/// h2 line (20px / 28px) + 4px padding + 6px row margin.
const HEADING_ROW_HEIGHT: f32 = 38.0;

const TABLE_MARGIN_TOP: f32 = 12.0;
const TABLE_ROW_MIN: f32 = 48.0;
const TABLE_CELL_PADDING: f32 = 8.0;
const TABLE_BORDER: f32 = 1.0;
const TABLE_COLUMNS: f32 = 4.0;

const SKILL_CATEGORY_WIDTH: f32 = 224.0;
const SKILL_SEPARATOR_WIDTH: f32 = 24.0;

const DATE_GAP: f32 = 16.0;
const NESTED_LIST_MARGIN: f32 = 4.0;

const LOGO_SIZE: f32 = 144.0;
const LOGO_GAP: f32 = 24.0;
const PHOTO_WIDTH: f32 = 134.0;
const PHOTO_HEIGHT: f32 = 144.0;
const PHOTO_GAP: f32 = 16.0;
const HEADER_PADDING_BOTTOM: f32 = 16.0;
const NAME_MARGIN_BOTTOM: f32 = 4.0;
/// `<hr>` under the header: 16px + 3px rule + 8px.
const HEADER_RULE_HEIGHT: f32 = 27.0;

const FOOTER_RULE_SPAN: f32 = 150.0;
const FOOTER_PADDING_BOTTOM: f32 = 20.0;
pub const FOOTER_LINES: [&str; 3] = [
    "Department of Training and Placement, NIT Trichy 620015",
    "Telephone : +91-431-2501081 | e-mail: tp@nitt.edu,",
    "tnp.nitt@gmail.com",
];

fn body_style() -> TextStyle {
    TextStyle::new(FontFamily::Lato, 15.0, 1.625)
}

fn contact_style() -> TextStyle {
    TextStyle::new(FontFamily::Lato, 15.0, 1.5)
}

fn name_style() -> TextStyle {
    TextStyle::new(FontFamily::Lato, 25.0, 1.0)
}

fn footer_style() -> TextStyle {
    TextStyle::new(FontFamily::Serif, 10.0 * 4.0 / 3.0, 1.2)
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Builds the header, footer and main document for `data`, with estimated heights.
pub fn build_preview(data: &ResumeData) -> LayoutSnapshot {
    let mut builder = DocumentBuilder::new();

    let header = builder.header(&data.personal_details);
    let footer = builder.footer();

    let mut blocks = Vec::new();
    if !data.education.is_empty() {
        blocks.push(builder.education(&data.education));
    }
    if !data.achievements.is_empty() {
        let items = data
            .achievements
            .iter()
            .map(|a| builder.bullet_item(&a.description))
            .collect();
        blocks.push(builder.splittable("Academic Achievements", "ul", BULLET_LIST_TIGHT, 4.0, items));
    }
    if !data.internships.is_empty() {
        let items = data.internships.iter().map(|i| builder.internship(i)).collect();
        blocks.push(builder.splittable("Internship Experience", "ul", BULLET_LIST_LOOSE, 16.0, items));
    }
    if !data.projects.is_empty() {
        let items = data.projects.iter().map(|p| builder.project(p)).collect();
        blocks.push(builder.splittable("Projects", "ul", BULLET_LIST_LOOSE, 16.0, items));
    }
    if !data.skills.is_empty() {
        blocks.push(builder.skills(&data.skills));
    }
    if !data.positions.is_empty() {
        let items = data.positions.iter().map(|p| builder.position(p)).collect();
        blocks.push(builder.splittable(
            "Positions of Responsibility",
            "ul",
            BULLET_LIST_LOOSE,
            16.0,
            items,
        ));
    }
    let activities: Vec<&Activity> = data
        .activities
        .iter()
        .filter(|a| !a.description.trim().is_empty())
        .collect();
    if !activities.is_empty() {
        let items = activities.into_iter().map(|a| builder.activity(a)).collect();
        blocks.push(builder.splittable("Extracurricular Activities", "div", "space-y-3", 12.0, items));
    }

    LayoutSnapshot {
        header: Some(header),
        footer: Some(footer),
        main: Some(Document::new(blocks)),
        heights: builder.heights,
        main_padding_top: None,
    }
}

const BULLET_LIST_TIGHT: &str = "custom-bullet-list technical-skills-list space-y-1 text-[15px]";
const BULLET_LIST_LOOSE: &str = "custom-bullet-list technical-skills-list space-y-4 text-[15px]";

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Markup of one list item and its height without the inter-item gap.
struct Item {
    markup: String,
    height: f32,
}

struct DocumentBuilder {
    ids: NodeIds,
    heights: MeasuredHeights,
    body: TextStyle,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            ids: NodeIds::default(),
            heights: MeasuredHeights::new(),
            body: body_style(),
        }
    }

    fn node(&mut self, markup: String, height: f32) -> Node {
        let id = self.ids.next();
        self.heights.insert(id, height);
        Node::new(id, markup)
    }

    /// Height of `text` as body copy at `width`, at least one line.
    fn line_box(&self, text: &str, width: f32) -> f32 {
        self.body
            .height_px(text, width)
            .max(self.body.line_height_px)
    }

    fn fixed(&mut self, title: &str, content: String, content_height: f32) -> Block {
        let markup = format!(
            "<div class=\"{SECTION_CLASS}\" data-splittable=\"false\">{}{content}</div>",
            heading_markup(title)
        );
        let height = HEADING_ROW_HEIGHT + content_height + SECTION_MARGIN_BOTTOM;
        Block::Fixed(self.node(markup, height))
    }

    /// `gap` is the list's `space-y` margin, applied above every item but the first.
    fn splittable(&mut self, title: &str, tag: &str, class: &str, gap: f32, items: Vec<Item>) -> Block {
        let heading = self.node(heading_markup(title), HEADING_ROW_HEIGHT);
        let mut total = HEADING_ROW_HEIGHT + SECTION_MARGIN_BOTTOM;
        let nodes = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let height = if i == 0 { item.height } else { item.height + gap };
                total += height;
                self.node(item.markup, height)
            })
            .collect();

        let id = self.ids.next();
        self.heights.insert(id, total);
        Block::Splittable(Section {
            id,
            class: SECTION_CLASS.to_string(),
            heading: Some(heading),
            list: Some(ListContainer {
                tag: tag.to_string(),
                class: class.to_string(),
                items: nodes,
            }),
        })
    }

    // ── Sections ────────────────────────────────────────────────────────────

    fn education(&mut self, rows: &[Education]) -> Block {
        let cell_width = CONTENT_WIDTH_PX / TABLE_COLUMNS - 2.0 * TABLE_CELL_PADDING;
        let mut html = String::from(
            "<div class=\"mt-3\"><table class=\"w-full border-collapse border border-black text-black text-center text-[15px]\">\
             <thead><tr>",
        );
        for label in ["Year", "Degree/Examination", "Institution/Board", "CGPA/Percentage"] {
            html.push_str("<th class=\"border border-black p-2 font-bold h-[0.5in]\">");
            html.push_str(label);
            html.push_str("</th>");
        }
        html.push_str("</tr></thead><tbody>");

        let mut height = TABLE_MARGIN_TOP + TABLE_ROW_MIN + TABLE_BORDER;
        for row in rows {
            let cells = [&row.year, &row.degree, &row.institution, &row.grade];
            let tallest = cells
                .iter()
                .map(|c| self.line_box(c, cell_width))
                .fold(0.0_f32, f32::max);
            height += (tallest + 2.0 * TABLE_CELL_PADDING).max(TABLE_ROW_MIN) + TABLE_BORDER;

            html.push_str("<tr>");
            for cell in cells {
                html.push_str("<td class=\"border border-black p-2 h-[0.5in]\">");
                html.push_str(&escape_html(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table></div>");

        self.fixed("Educational Qualification", html, height)
    }

    fn skills(&mut self, skills: &[Skill]) -> Block {
        let value_width = LIST_WIDTH - SKILL_CATEGORY_WIDTH - SKILL_SEPARATOR_WIDTH;
        let mut html = String::from("<ul class=\"custom-bullet-list technical-skills-list\">");
        let mut height = 0.0;
        for skill in skills {
            height += self
                .line_box(&skill.category, SKILL_CATEGORY_WIDTH)
                .max(self.line_box(&skill.skills, value_width));
            html.push_str(&format!(
                "<li class=\"flex items-start\">\
                 <span class=\"w-56 flex-shrink-0 break-words\">{}</span>\
                 <span class=\"mx-2 flex-shrink-0\">:</span>\
                 <span class=\"flex-1 break-words\">{}</span></li>",
                escape_html(&skill.category),
                escape_html(&skill.skills)
            ));
        }
        html.push_str("</ul>");

        self.fixed("Technical Skills and Certifications", html, height)
    }

    // ── Items ───────────────────────────────────────────────────────────────

    fn bullet_item(&self, text: &str) -> Item {
        Item {
            markup: format!("<li>{}</li>", rich_text(text)),
            height: self.line_box(&visible_text(text), LIST_WIDTH),
        }
    }

    /// Title row with a right-aligned date; the title wraps in what the date leaves.
    fn title_row(&self, title: &str, date: &str) -> (String, f32) {
        let date_width = self.body.width_px(date.trim());
        let title_width = (LIST_WIDTH - date_width - DATE_GAP).max(LIST_WIDTH / 3.0);
        let markup = format!(
            "<div class=\"flex justify-between items-baseline\">\
             <h3 class=\"font-bold text-[15px]\">{}</h3>\
             <p class=\"flex-shrink-0 ml-4 text-right\">{}</p></div>",
            escape_html(title),
            escape_html(date)
        );
        (markup, self.line_box(title, title_width))
    }

    fn paragraph(&self, text: &str) -> (String, f32) {
        let markup = format!("<div>{}</div>", rich_text(text));
        let height = self.body.height_px(&visible_text(text), LIST_WIDTH);
        (markup, height)
    }

    fn dated_item(&self, title: &str, date: &str, description: &str) -> Item {
        let (row, row_height) = self.title_row(title, date);
        let (body, body_height) = self.paragraph(description);
        Item {
            markup: format!("<li>{row}{body}</li>"),
            height: row_height + body_height,
        }
    }

    fn internship(&self, internship: &Internship) -> Item {
        self.dated_item(&internship.title, &internship.date, &internship.description)
    }

    fn position(&self, position: &Position) -> Item {
        self.dated_item(&position.title, &position.date, &position.description)
    }

    /// Multi-line project descriptions render as a nested list, one line per bullet.
    fn project(&self, project: &Project) -> Item {
        if !project.description.contains('\n') {
            return self.dated_item(&project.name, &project.date, &project.description);
        }

        let (row, row_height) = self.title_row(&project.name, &project.date);
        let (lines, lines_height) = self.nested_list("custom-square-list mt-1", &project.description);
        Item {
            markup: format!("<li>{row}{lines}</li>"),
            height: row_height + lines_height,
        }
    }

    fn activity(&self, activity: &Activity) -> Item {
        let title_height = self.line_box(&activity.title, CONTENT_WIDTH_PX);
        let (lines, lines_height) = self.nested_list(
            "custom-bullet-list technical-skills-list mt-1",
            &activity.description,
        );
        Item {
            markup: format!(
                "<div><h3 class=\"font-bold text-[15px]\">{}</h3>{lines}</div>",
                escape_html(&activity.title)
            ),
            height: title_height + lines_height,
        }
    }

    fn nested_list(&self, class: &str, text: &str) -> (String, f32) {
        let width = LIST_WIDTH - BULLET_INDENT;
        let mut markup = format!("<ul class=\"{class}\">");
        let mut height = NESTED_LIST_MARGIN;
        for line in non_blank_lines(text) {
            markup.push_str("<li>");
            markup.push_str(&inline_rich_text(line));
            markup.push_str("</li>");
            height += self.line_box(&visible_text(line), width);
        }
        markup.push_str("</ul>");
        (markup, height)
    }

    // ── Chrome ──────────────────────────────────────────────────────────────

    /// Header banner plus the rule beneath it, as one node.
    fn header(&mut self, details: &PersonalDetails) -> Node {
        let has_logo = !details.logo.trim().is_empty();
        let has_photo = !details.photo.trim().is_empty();

        let mut text_width = CONTENT_WIDTH_PX;
        if has_logo {
            text_width -= LOGO_SIZE + LOGO_GAP;
        }
        if has_photo {
            text_width -= PHOTO_WIDTH + PHOTO_GAP;
        }

        let contact = contact_style();
        let contact_lines = [
            format!("Gender: {}", details.gender),
            format!("Date of Birth: {}", details.dob),
            format!("E-mail: {}", details.email),
            format!("Contact : {}", details.contact),
        ];
        let name_height = name_style()
            .height_px(&details.name, text_width)
            .max(name_style().line_height_px);
        let text_height = name_height
            + NAME_MARGIN_BOTTOM
            + self.line_box(&details.degree, text_width)
            + contact_lines
                .iter()
                .map(|l| contact.height_px(l, text_width).max(contact.line_height_px))
                .sum::<f32>();

        let mut banner = text_height;
        if has_logo {
            banner = banner.max(LOGO_SIZE);
        }
        if has_photo {
            banner = banner.max(PHOTO_HEIGHT);
        }
        let height = banner + HEADER_PADDING_BOTTOM + HEADER_RULE_HEIGHT;

        let mut markup = String::from(
            "<header class=\"flex items-start justify-between pb-4 text-[15px]\">\
             <div class=\"flex items-center flex-grow min-w-0\">",
        );
        if has_logo {
            markup.push_str(&format!(
                "<img src=\"{}\" alt=\"Institute Logo\" class=\"h-36 w-36 mr-6 flex-shrink-0\" />",
                escape_html(&details.logo)
            ));
        }
        markup.push_str(&format!(
            "<div class=\"flex-grow min-w-0\">\
             <h1 class=\"font-bold tracking-wide break-words text-[25px] leading-none mb-1\">{}</h1>\
             <p>{}</p><div class=\"leading-normal\">",
            escape_html(&details.name),
            escape_html(&details.degree)
        ));
        for line in &contact_lines {
            markup.push_str("<p>");
            markup.push_str(&escape_html(line));
            markup.push_str("</p>");
        }
        markup.push_str("</div></div></div>");
        if has_photo {
            markup.push_str(&format!(
                "<img src=\"{}\" alt=\"Profile\" class=\"h-[140px] w-[130px] object-cover border-2 border-black ml-4 flex-shrink-0\" />",
                escape_html(&details.photo)
            ));
        }
        markup.push_str("</header><hr class=\"border-t-[3px] border-black mt-4 mb-2 -mx-10\" />");

        self.node(markup, height)
    }

    fn footer(&mut self) -> Node {
        let style = footer_style();
        let width = CONTENT_WIDTH_PX - 2.0 * FOOTER_RULE_SPAN;
        let height = FOOTER_LINES
            .iter()
            .map(|l| style.height_px(l, width))
            .sum::<f32>()
            + FOOTER_PADDING_BOTTOM;

        let rule = "<div style=\"border-top: 1px solid #808080; width: 130px; margin: 0 10px\"></div>";
        let mut markup = String::from(
            "<footer class=\"flex items-center justify-center text-center w-full\" \
             style=\"font-family: Cambria, serif; font-size: 10pt; color: #808080; line-height: 1.2; padding-bottom: 20px\">",
        );
        markup.push_str(rule);
        markup.push_str("<div class=\"px-1\">");
        for line in FOOTER_LINES {
            markup.push_str("<p style=\"margin: 0\">");
            markup.push_str(line);
            markup.push_str("</p>");
        }
        markup.push_str("</div>");
        markup.push_str(rule);
        markup.push_str("</footer>");

        self.node(markup, height)
    }
}

fn heading_markup(title: &str) -> String {
    format!(
        "<div class=\"flex items-center mb-1.5\">\
         <h2 class=\"text-xl font-bold pr-4 flex-shrink-0\" style=\"padding-bottom: 4px\">{}</h2>\
         <div class=\"flex-grow border-t-[4px]\" style=\"border-color: #C00000\"></div></div>",
        escape_html(title)
    )
}
