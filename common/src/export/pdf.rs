// PDF export: landscape table of the non-empty columns with a header and footer on every page

use super::{cell_text, non_empty_columns, ReportDocument};
use crate::errors::ExportError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};
use std::io::Write;
use std::ops::Range;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");
const LOGO: Name<'static> = Name(b"Im1");

/// Page geometry and styling of the PDF export
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_w: f32,
    pub page_h: f32,
    pub margin: f32,
    /// Distance from the top edge to the table header row
    pub table_top: f32,
    /// Baseline distance of wrapped lines inside a cell
    pub line_h: f32,
    pub cell_padding: f32,
    pub font_size: f32,
    pub title_font_size: f32,
    pub date_font_size: f32,
    pub footer_font_size: f32,
    /// Logo box, top-left: width and height
    pub logo_size: (f32, f32),
    pub header_fill: (f32, f32, f32),
    pub stripe_fill: (f32, f32, f32),
}

impl Default for PdfLayout {
    /// A4 landscape in points
    fn default() -> Self {
        Self {
            page_w: 842.0,
            page_h: 595.0,
            margin: 40.0,
            table_top: 70.0,
            line_h: 10.0,
            cell_padding: 3.0,
            font_size: 8.0,
            title_font_size: 12.0,
            date_font_size: 9.0,
            footer_font_size: 8.0,
            logo_size: (50.0, 20.0),
            header_fill: (212.0 / 255.0, 160.0 / 255.0, 23.0 / 255.0),
            stripe_fill: (240.0 / 255.0, 240.0 / 255.0, 240.0 / 255.0),
        }
    }
}

impl PdfLayout {
    /// Height of a row whose tallest cell has `lines` lines
    pub fn row_height(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.line_h + 2.0 * self.cell_padding
    }

    /// Characters of the body font that fit in a column of width `col_w`
    fn chars_per_line(&self, col_w: f32) -> usize {
        ((col_w - 2.0 * self.cell_padding) / char_width(self.font_size))
            .floor()
            .max(1.0) as usize
    }
}

/// Decoded logo, stored deflated and ready to embed as an image XObject
#[derive(Debug, Clone)]
pub struct LogoImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl LogoImage {
    /// Decode a PNG or JPEG file
    pub fn decode(bytes: &[u8]) -> Result<Self, ExportError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ExportError::Pdf(format!("Invalid logo image: {}", e)))?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let translucent = alpha.iter().any(|a| *a != u8::MAX);

        Ok(Self {
            width,
            height,
            rgb: deflate(&rgb)?,
            alpha: if translucent { Some(deflate(&alpha)?) } else { None },
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Row after wrapping: one list of lines per column
struct WrappedRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

/// Write the document as a PDF
///
/// Columns that are empty in every row are left out. The column set is
/// computed once for the whole document so every page shows the same columns.
/// Cell text wraps inside its column; a row is as tall as its tallest cell.
pub fn write_pdf(document: &ReportDocument<'_>, layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let headers = non_empty_columns(document.rows);
    if headers.is_empty() {
        return Err(ExportError::Pdf("every column is empty".to_string()));
    }

    let body: Vec<Vec<String>> = document
        .rows
        .iter()
        .map(|row| headers.iter().map(|h| cell_text(row, h)).collect())
        .collect();
    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut writer = PdfTableWriter::new(layout.clone(), document.logo_image);
    let col_widths = writer.compute_col_widths(&header_row, &body);

    let header = wrap_row(layout, &col_widths, &header_row);
    let rows: Vec<WrappedRow> = body.iter().map(|cells| wrap_row(layout, &col_widths, cells)).collect();
    let pages = paginate(layout, header.height, &rows);

    let total_pages = pages.len();
    let generated = format!(
        "Fecha de Generación: {}",
        document.generated_on.format("%d/%m/%Y")
    );

    for (page_idx, range) in pages.into_iter().enumerate() {
        let mut content = writer.new_page();
        writer.draw_page_header_footer(&mut content, document, &generated, page_idx + 1, total_pages);
        writer.draw_table(&mut content, &col_widths, &header, &rows, range);
        writer.finalize_page(content);
    }

    Ok(writer.finish())
}

fn wrap_row(layout: &PdfLayout, col_widths: &[f32], cells: &[String]) -> WrappedRow {
    let cells: Vec<Vec<String>> = cells
        .iter()
        .zip(col_widths)
        .map(|(text, w)| wrap_text(text, layout.chars_per_line(*w)))
        .collect();
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
    WrappedRow {
        height: layout.row_height(lines),
        cells,
    }
}

/// Split rows into pages by the vertical space they use. A row taller than
/// a whole page still gets a page of its own.
fn paginate(layout: &PdfLayout, header_h: f32, rows: &[WrappedRow]) -> Vec<Range<usize>> {
    let top = layout.page_h - layout.table_top - header_h;
    let mut pages = Vec::new();
    let mut start = 0;
    let mut y = top;

    for (i, row) in rows.iter().enumerate() {
        if y - row.height < layout.margin && i > start {
            pages.push(start..i);
            start = i;
            y = top;
        }
        y -= row.height;
    }
    pages.push(start..rows.len());
    pages
}

/// Greedy word wrap; words longer than a line are broken at the line width
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_len = word.chars().count();
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };

            if needed <= max_chars {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(max_chars).peekable();
            while let Some(piece) = pieces.next() {
                if pieces.peek().is_some() {
                    lines.push(piece.iter().collect());
                } else {
                    current = piece.iter().collect();
                    current_len = piece.len();
                }
            }
        }
        lines.push(current);
    }

    lines
}

struct PdfTableWriter {
    pdf: Pdf,
    layout: PdfLayout,
    catalog_id: Ref,
    pages_id: Ref,
    regular_id: Ref,
    bold_id: Ref,
    logo_id: Option<Ref>,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,
    next_id: i32,
}

impl PdfTableWriter {
    fn new(layout: PdfLayout, logo: Option<&LogoImage>) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut writer = Self {
            pdf,
            layout,
            catalog_id,
            pages_id,
            regular_id,
            bold_id,
            logo_id: None,
            page_refs: Vec::new(),
            current_content_id: None,
            next_id: 5,
        };
        if let Some(logo) = logo {
            writer.embed_logo(logo);
        }
        writer
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn embed_logo(&mut self, logo: &LogoImage) {
        let image_id = self.fresh_ref();
        let mask_id = logo.alpha.as_ref().map(|_| self.fresh_ref());

        let mut image = self.pdf.image_xobject(image_id, &logo.rgb);
        image.filter(Filter::FlateDecode);
        image.width(logo.width as i32);
        image.height(logo.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(alpha)) = (mask_id, &logo.alpha) {
            let mut mask = self.pdf.image_xobject(mask_id, alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(logo.width as i32);
            mask.height(logo.height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            mask.finish();
        }

        self.logo_id = Some(image_id);
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.layout.page_w, self.layout.page_h))
            .contents(content_id);
        {
            let mut resources = page.resources();
            resources
                .fonts()
                .pair(REGULAR, self.regular_id)
                .pair(BOLD, self.bold_id);
            if let Some(logo_id) = self.logo_id {
                resources.x_objects().pair(LOGO, logo_id);
            }
        }
        drop(page);

        self.current_content_id = Some(content_id);
        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .kids(self.page_refs.iter().copied())
            .count(count);
        self.pdf.finish()
    }

    /// Widths proportional to the longest text per column, scaled to the usable width
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let char_w = char_width(self.layout.font_size);
        let pad = 2.0 * self.layout.cell_padding;

        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * char_w + pad)
            .collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count() as f32 * char_w + pad);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.layout.page_w - 2.0 * self.layout.margin;
        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }
        widths
    }

    fn draw_page_header_footer(
        &self,
        content: &mut Content,
        document: &ReportDocument<'_>,
        generated: &str,
        page: usize,
        total_pages: usize,
    ) {
        let l = &self.layout;
        let right = l.page_w - l.margin;
        let (w, h) = l.logo_size;
        let (x, y) = (l.margin, l.page_h - 20.0 - h);

        // Logo, top-left
        if self.logo_id.is_some() {
            content.save_state();
            content.transform([w, 0.0, 0.0, h, x, y]);
            content.x_object(LOGO);
            content.restore_state();
        } else if !document.logo_text.is_empty() {
            content.save_state();
            content.set_fill_rgb(l.header_fill.0, l.header_fill.1, l.header_fill.2);
            content.rect(x, y, w, h);
            content.fill_nonzero();
            content.restore_state();

            let size = l.title_font_size - 2.0;
            let text_w = text_width(document.logo_text, size);
            content.save_state();
            content.set_fill_rgb(1.0, 1.0, 1.0);
            draw_text(content, BOLD, size, x + (w - text_w).max(0.0) / 2.0, y + 6.0, document.logo_text);
            content.restore_state();
        }

        content.save_state();
        content.set_fill_gray(40.0 / 255.0);
        draw_text_right(content, REGULAR, l.title_font_size, right, l.page_h - 30.0, document.title);
        content.set_fill_gray(100.0 / 255.0);
        draw_text_right(content, REGULAR, l.date_font_size, right, l.page_h - 45.0, generated);
        content.set_fill_gray(150.0 / 255.0);
        let footer = format!("Página {} de {}", page, total_pages);
        draw_text_right(content, REGULAR, l.footer_font_size, right, 30.0, &footer);
        content.restore_state();
    }

    fn draw_table(
        &self,
        content: &mut Content,
        col_widths: &[f32],
        header: &WrappedRow,
        rows: &[WrappedRow],
        range: Range<usize>,
    ) {
        let l = &self.layout;
        let table_w: f32 = col_widths.iter().sum();
        let mut y = l.page_h - l.table_top - header.height;

        content.save_state();
        content.set_fill_rgb(l.header_fill.0, l.header_fill.1, l.header_fill.2);
        content.rect(l.margin, y, table_w, header.height);
        content.fill_nonzero();
        content.set_fill_rgb(1.0, 1.0, 1.0);
        self.draw_row(content, BOLD, y, col_widths, header);
        content.restore_state();
        self.draw_grid_row(content, y, header.height, col_widths);

        for i in range {
            let row = &rows[i];
            y -= row.height;

            if i % 2 == 1 {
                content.save_state();
                content.set_fill_rgb(l.stripe_fill.0, l.stripe_fill.1, l.stripe_fill.2);
                content.rect(l.margin, y, table_w, row.height);
                content.fill_nonzero();
                content.restore_state();
            }

            content.save_state();
            content.set_fill_gray(0.0);
            self.draw_row(content, REGULAR, y, col_widths, row);
            content.restore_state();
            self.draw_grid_row(content, y, row.height, col_widths);
        }
    }

    /// Draw every line of every cell, vertically centred in the row
    fn draw_row(&self, content: &mut Content, font: Name<'_>, y: f32, col_widths: &[f32], row: &WrappedRow) {
        let l = &self.layout;
        let row_top = y + row.height;
        let mut x = l.margin;

        for (lines, w) in row.cells.iter().zip(col_widths) {
            let block_h = lines.len() as f32 * l.line_h;
            let block_top = row_top - (row.height - block_h) / 2.0;
            for (n, line) in lines.iter().enumerate() {
                let baseline = block_top - (n + 1) as f32 * l.line_h + (l.line_h - l.font_size) / 2.0 + l.font_size * 0.2;
                draw_text(content, font, l.font_size, x + l.cell_padding, baseline, line);
            }
            x += w;
        }
    }

    fn draw_grid_row(&self, content: &mut Content, y: f32, height: f32, col_widths: &[f32]) {
        let mut x = self.layout.margin;
        content.save_state();
        content.set_line_width(0.5);
        content.set_stroke_gray(0.6);
        for w in col_widths {
            content.rect(x, y, *w, height);
            x += w;
        }
        content.stroke();
        content.restore_state();
    }
}

fn draw_text(content: &mut Content, font: Name<'_>, size: f32, x: f32, y: f32, text: &str) {
    let encoded = encode_win_ansi(text);
    content.begin_text();
    content.set_font(font, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(&encoded));
    content.end_text();
}

fn draw_text_right(content: &mut Content, font: Name<'_>, size: f32, right: f32, y: f32, text: &str) {
    let x = right - text_width(text, size);
    draw_text(content, font, size, x, y, text);
}

/// Upper bound of the Helvetica advance width, used for wrapping
fn char_width(size: f32) -> f32 {
    size * 0.55
}

/// Approximate Helvetica advance width
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

/// Latin-1 characters map to themselves in WinAnsiEncoding; anything else becomes `?`
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '…' => 0x85,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportRow;
    use chrono::NaiveDate;
    use serde_json::json;

    fn document<'a>(rows: &'a [ReportRow]) -> ReportDocument<'a> {
        ReportDocument {
            title: "Usuarios por Rol",
            rows,
            generated_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            logo_text: "BRC",
            logo_image: None,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    /// Text shown on a page, written either as a literal or as a hex string
    fn shows_text(pdf: &[u8], text: &str) -> bool {
        let encoded = encode_win_ansi(text);
        let hex: String = encoded.iter().map(|b| format!("{:02x}", b)).collect();
        let lowered = pdf.to_ascii_lowercase();
        contains(pdf, &encoded) || contains(&lowered, hex.as_bytes())
    }

    /// Every string operand in the file, decoded and concatenated in order
    fn drawn_text(pdf: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < pdf.len() {
            match pdf[i] {
                b'(' => {
                    i += 1;
                    while i < pdf.len() && pdf[i] != b')' {
                        if pdf[i] == b'\\' {
                            i += 1;
                        }
                        if i < pdf.len() {
                            out.push(pdf[i]);
                        }
                        i += 1;
                    }
                }
                b'<' if pdf.get(i + 1) == Some(&b'<') => i += 1,
                b'<' => {
                    let end = pdf[i..].iter().position(|b| *b == b'>').map_or(pdf.len(), |p| i + p);
                    let digits: Vec<u8> = pdf[i + 1..end].iter().copied().filter(u8::is_ascii_hexdigit).collect();
                    for pair in digits.chunks(2) {
                        let text = std::str::from_utf8(pair).unwrap_or("00");
                        out.push(u8::from_str_radix(text, 16).unwrap_or(0));
                    }
                    i = end;
                }
                _ => {}
            }
            i += 1;
        }
        out
    }

    fn tiny_png(alpha: u8) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(4, 2, image::Rgba([212, 160, 23, alpha]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_pdf_excludes_empty_columns() {
        let rows: Vec<ReportRow> = serde_json::from_value(json!([
            {"Usuario": "ana", "Vacia": "", "Rol": "admin"},
            {"Usuario": "luis", "Vacia": null, "Rol": "lector"},
        ]))
        .unwrap();

        let bytes = write_pdf(&document(&rows), &PdfLayout::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(shows_text(&bytes, "Usuario"));
        assert!(shows_text(&bytes, "Rol"));
        assert!(!shows_text(&bytes, "Vacia"));
    }

    #[test]
    fn test_pdf_numbers_pages() {
        // Single-line rows are 16pt; 469pt of table body fits 29 of them
        let rows: Vec<ReportRow> = (0..100)
            .map(|i| serde_json::from_value(json!({"n": i})).unwrap())
            .collect();

        let bytes = write_pdf(&document(&rows), &PdfLayout::default()).unwrap();
        assert!(shows_text(&bytes, "Página 1 de 4"));
        assert!(shows_text(&bytes, "Página 4 de 4"));
        assert!(!shows_text(&bytes, "Página 5 de"));
        assert!(shows_text(&bytes, "Fecha de Generación: 01/05/2024"));
    }

    #[test]
    fn test_wide_report_keeps_every_value() {
        let row: ReportRow = (0..10)
            .map(|i| (format!("Columna{}", i), json!(format!("usuario.numero{}@bancouno.example.com", i))))
            .collect();
        let rows = vec![row];

        let bytes = write_pdf(&document(&rows), &PdfLayout::default()).unwrap();
        let text = drawn_text(&bytes);
        for i in 0..10 {
            let value = format!("usuario.numero{}@bancouno.example.com", i);
            assert!(contains(&text, value.as_bytes()), "{} not drawn in full", value);
        }
        assert!(!contains(&text, &[0x85]));
    }

    #[test]
    fn test_tall_rows_paginate_by_height() {
        let long = "palabra ".repeat(60);
        let rows: Vec<ReportRow> = (0..12)
            .map(|i| serde_json::from_value(json!({"id": i, "detalle": long.clone(), "otro": long.clone()})).unwrap())
            .collect();
        let layout = PdfLayout::default();

        let bytes = write_pdf(&document(&rows), &layout).unwrap();
        assert!(!shows_text(&bytes, "Página 1 de 1"));
        assert!(shows_text(&bytes, "Página 2 de"));
    }

    #[test]
    fn test_paginate_keeps_oversized_row_alone() {
        let layout = PdfLayout::default();
        let rows: Vec<WrappedRow> = [1, 100, 1]
            .iter()
            .map(|lines| WrappedRow {
                cells: vec![vec![String::new(); *lines]],
                height: layout.row_height(*lines),
            })
            .collect();

        let pages = paginate(&layout, layout.row_height(1), &rows);
        assert_eq!(pages, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("abc", 10), vec!["abc"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("uno dos tres", 7), vec!["uno dos", "tres"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a abcdefgh b", 4), vec!["a", "abcd", "efgh", "b"]);
        assert_eq!(wrap_text("uno\ndos", 20), vec!["uno", "dos"]);
    }

    #[test]
    fn test_pdf_rejects_all_empty_columns() {
        let rows: Vec<ReportRow> = serde_json::from_value(json!([{"a": "", "b": null}])).unwrap();
        assert!(matches!(
            write_pdf(&document(&rows), &PdfLayout::default()),
            Err(ExportError::Pdf(_))
        ));
    }

    #[test]
    fn test_logo_image_is_embedded() {
        let rows: Vec<ReportRow> = serde_json::from_value(json!([{"a": "1"}])).unwrap();
        let logo = LogoImage::decode(&tiny_png(128)).unwrap();
        assert_eq!(logo.dimensions(), (4, 2));
        assert!(logo.alpha.is_some());

        let mut doc = document(&rows);
        doc.logo_image = Some(&logo);
        let bytes = write_pdf(&doc, &PdfLayout::default()).unwrap();

        assert!(contains(&bytes, b"/Subtype /Image"));
        assert!(contains(&bytes, b"/SMask"));
        assert!(contains(&bytes, b"/Im1 Do"));
        assert!(!shows_text(&bytes, "BRC"));
    }

    #[test]
    fn test_opaque_logo_has_no_mask() {
        let logo = LogoImage::decode(&tiny_png(255)).unwrap();
        assert!(logo.alpha.is_none());
    }

    #[test]
    fn test_invalid_logo_is_rejected() {
        assert!(matches!(LogoImage::decode(b"not an image"), Err(ExportError::Pdf(_))));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Página"), b"P\xe1gina".to_vec());
        assert_eq!(encode_win_ansi("→"), b"?".to_vec());
    }
}
