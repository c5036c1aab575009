//! PDF rendering of report documents

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::layout::{Block, ReportDocument};
use crate::error::{AppError, AppResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.5;

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 13.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::Internal(format!("PDF rendering failed: {:?}", e))
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.4
}

/// Characters of body text that fit in `width` millimetres
fn chars_for_width(width: f32, size: f32) -> usize {
    ((width / (size * PT_TO_MM * GLYPH_WIDTH)).floor() as usize).max(1)
}

/// Greedy word wrap; words longer than a line are split
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cut a cell to its column, marking the cut with "..."
pub(crate) fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter<'_> {
    /// Start a new page when `height` does not fit on the current one
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
            self.pages += 1;
        }
    }

    fn text_at(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        for line in wrap(text, chars_for_width(width, size)) {
            let height = line_height(size);
            self.reserve(height);
            self.y -= height;
            self.text_at(&line, size, MARGIN, bold);
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn fields(&mut self, fields: &[(String, String)]) {
        let label_width = 55.0;
        let value_width = PAGE_WIDTH - 2.0 * MARGIN - label_width;
        for (label, value) in fields {
            let lines = wrap(value, chars_for_width(value_width, BODY_SIZE));
            for (i, line) in lines.iter().enumerate() {
                let height = line_height(BODY_SIZE);
                self.reserve(height);
                self.y -= height;
                if i == 0 {
                    self.text_at(&format!("{}:", label), BODY_SIZE, MARGIN, true);
                }
                self.text_at(line, BODY_SIZE, MARGIN + label_width, false);
            }
        }
    }

    fn row(&mut self, cells: &[String], widths: &[f32], bold: bool) {
        let height = line_height(BODY_SIZE);
        self.reserve(height);
        self.y -= height;
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths) {
            let text = fit(cell, chars_for_width(width - 2.0, BODY_SIZE));
            self.text_at(&text, BODY_SIZE, x, bold);
            x += width;
        }
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let widths = column_widths(headers.len(), PAGE_WIDTH - 2.0 * MARGIN);
        // keep the header with at least one row
        self.reserve(2.0 * line_height(BODY_SIZE));
        self.row(headers, &widths, true);
        for row in rows {
            self.row(row, &widths, false);
        }
    }

    fn signatures(&mut self, captions: &[String]) {
        let height = 3.0 * line_height(BODY_SIZE);
        self.reserve(height + line_height(BODY_SIZE));
        self.y -= height;
        let width = (PAGE_WIDTH - 2.0 * MARGIN) / captions.len().max(1) as f32;
        let rule = "_".repeat(chars_for_width(width - 8.0, BODY_SIZE).min(40));
        let mut x = MARGIN;
        for _ in captions {
            self.text_at(&rule, BODY_SIZE, x, false);
            x += width;
        }
        self.y -= line_height(BODY_SIZE);
        let mut x = MARGIN;
        for caption in captions {
            self.text_at(caption, BODY_SIZE, x, false);
            x += width;
        }
    }
}

/// First column gets the remaining width, the others a fixed share
fn column_widths(columns: usize, total: f32) -> Vec<f32> {
    match columns {
        0 => Vec::new(),
        1 => vec![total],
        n => {
            let narrow = (total * 0.45 / (n - 1) as f32).min(40.0);
            let mut widths = vec![narrow; n];
            widths[0] = total - narrow * (n - 1) as f32;
            widths
        }
    }
}

/// Render a document to PDF bytes
pub fn render(document: &ReportDocument) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        document.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "content",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    {
        let mut writer = PageWriter {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };

        writer.paragraph(&document.title, TITLE_SIZE, true);
        if let Some(subtitle) = &document.subtitle {
            writer.paragraph(subtitle, SUBTITLE_SIZE, true);
        }
        writer.gap(4.0);

        for section in &document.sections {
            if let Some(title) = &section.title {
                writer.reserve(line_height(SECTION_SIZE) + 2.0 * line_height(BODY_SIZE));
                writer.gap(2.0);
                writer.paragraph(title, SECTION_SIZE, true);
            }
            for block in &section.blocks {
                match block {
                    Block::Text(text) => writer.paragraph(text, BODY_SIZE, false),
                    Block::Fields(fields) => writer.fields(fields),
                    Block::Table { headers, rows } => writer.table(headers, rows),
                    Block::Signatures(captions) => writer.signatures(captions),
                }
            }
            writer.gap(4.0);
        }

        tracing::debug!("Rendered '{}' on {} page(s)", document.title, writer.pages);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::layout::Section;

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_empty_text() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_fit_marks_cut() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("a much longer cell", 8), "a muc...");
    }

    #[test]
    fn test_column_widths_fill_the_page() {
        let widths = column_widths(4, 174.0);
        let total: f32 = widths.iter().sum();
        assert!((total - 174.0).abs() < 0.01);
        assert!(widths[0] > widths[1]);
    }

    #[test]
    fn test_render_produces_pdf() {
        let rows = (0..120)
            .map(|i| vec![format!("Item {}", i), i.to_string()])
            .collect();
        let document = ReportDocument {
            title: "Material Dispatch Guide".to_string(),
            subtitle: Some("Operation: Test".to_string()),
            sections: vec![Section {
                title: Some("Equipment".to_string()),
                blocks: vec![
                    Block::Fields(vec![("Client".to_string(), "Acme".to_string())]),
                    Block::Table {
                        headers: vec!["Item / Model".to_string(), "Quantity".to_string()],
                        rows,
                    },
                    Block::Signatures(vec!["Checked by".to_string(), "Received by".to_string()]),
                ],
            }],
            file_name: "guide.pdf".to_string(),
        };

        let bytes = render(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
