//! Static font metrics for estimating rendered text height without a browser.
//!
//! Character widths are in em units. This is an approximation: real shaping
//! applies kerning and ligatures, but greedy word wrap over these tables lands
//! within a line or so of the browser on typical resume text. The page safety
//! buffer absorbs the remainder, and a client that reports real measurements
//! always supersedes the estimate.
//!
//! Tables cover ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Body text of the on-campus template.
    Lato,
    /// Footer text (Cambria); approximated by a transitional serif table.
    Serif,
}

/// Character-width table for one family.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Width used for codepoints outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

/// A concrete text style: family, size and line box height, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size_px: f32,
    pub line_height_px: f32,
}

impl TextStyle {
    pub fn new(font: FontFamily, size_px: f32, line_height: f32) -> Self {
        Self {
            font,
            size_px,
            line_height_px: size_px * line_height,
        }
    }

    fn metrics(&self) -> &'static FontMetricTable {
        get_metrics(self.font)
    }

    /// Rendered width of `s` in pixels.
    pub fn width_px(&self, s: &str) -> f32 {
        self.metrics().measure_str(s) * self.size_px
    }

    /// Number of lines `text` wraps to inside `max_width_px` (greedy word wrap).
    ///
    /// Explicit newlines start a new line; blank input is zero lines.
    pub fn line_count(&self, text: &str, max_width_px: f32) -> usize {
        text.lines().map(|line| self.wrap(line, max_width_px)).sum()
    }

    /// Height of `text` wrapped inside `max_width_px`.
    pub fn height_px(&self, text: &str, max_width_px: f32) -> f32 {
        self.line_count(text, max_width_px) as f32 * self.line_height_px
    }

    fn wrap(&self, line: &str, max_width_px: f32) -> usize {
        let metrics = self.metrics();
        let space = metrics.space_width * self.size_px;
        let mut lines = 0usize;
        let mut current = 0.0_f32;

        for word in line.split_whitespace() {
            let word_w = metrics.measure_str(word) * self.size_px;
            if lines == 0 {
                lines = 1;
                current = word_w;
            } else if current + space + word_w > max_width_px {
                lines += 1;
                current = word_w;
            } else {
                current += space + word_w;
            }
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static LATO_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.26, 0.32, 0.40, 0.59, 0.59, 0.94, 0.70, 0.23, 0.35, 0.35, 0.41, 0.62, 0.29, 0.35, 0.29, 0.33,
        // 0     1     2     3     4     5     6     7     8     9
        0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59, 0.59,
        // :     ;     <     =     >     ?     @
        0.29, 0.29, 0.62, 0.62, 0.62, 0.53, 1.07,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.70, 0.64, 0.64, 0.70, 0.59, 0.53, 0.70, 0.70, 0.26, 0.41, 0.64, 0.56, 0.82,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.70, 0.76, 0.59, 0.76, 0.64, 0.53, 0.59, 0.70, 0.70, 0.94, 0.64, 0.64, 0.59,
        // [     \     ]     ^     _     `
        0.29, 0.33, 0.29, 0.49, 0.59, 0.36,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.59, 0.59, 0.53, 0.59, 0.59, 0.33, 0.59, 0.59, 0.23, 0.23, 0.56, 0.23, 0.87,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.59, 0.59, 0.59, 0.59, 0.35, 0.46, 0.41, 0.59, 0.53, 0.76, 0.53, 0.53, 0.46,
        // {     |     }     ~
        0.35, 0.27, 0.35, 0.62,
    ],
    average_char_width: 0.55,
    space_width: 0.26,
};

static SERIF_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.23, 0.27, 0.34, 0.50, 0.50, 0.80, 0.60, 0.20, 0.30, 0.30, 0.35, 0.53, 0.25, 0.30, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.25, 0.25, 0.53, 0.53, 0.53, 0.45, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.60, 0.55, 0.55, 0.60, 0.50, 0.45, 0.60, 0.60, 0.23, 0.35, 0.55, 0.48, 0.70,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.60, 0.65, 0.50, 0.65, 0.55, 0.45, 0.50, 0.60, 0.60, 0.80, 0.55, 0.55, 0.50,
        // [     \     ]     ^     _     `
        0.25, 0.28, 0.25, 0.42, 0.50, 0.31,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.50, 0.50, 0.45, 0.50, 0.50, 0.28, 0.50, 0.50, 0.20, 0.20, 0.48, 0.20, 0.75,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.30, 0.40, 0.35, 0.50, 0.45, 0.65, 0.45, 0.45, 0.40,
        // {     |     }     ~
        0.30, 0.23, 0.30, 0.53,
    ],
    average_char_width: 0.47,
    space_width: 0.23,
};

pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Lato => &LATO_TABLE,
        FontFamily::Serif => &SERIF_TABLE,
    }
}
