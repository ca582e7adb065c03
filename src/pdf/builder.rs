use image::DynamicImage;
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use crate::core::{ColumnAlign, PdfConfig, TableData};
use crate::pdf::fonts::{encode_win_ansi, PdfFont};

const CELL_PADDING_X: f32 = 6.0;
const CELL_PADDING_Y: f32 = 3.0;
const LEADING_FACTOR: f32 = 1.2;
const GRID_WIDTH: f32 = 1.0;
const SHADE_GRAY: f32 = 0.827; // lightgrey

/// Raster image embedded as an XObject.
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

/// Output of the builder: one operation list per page.
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Vec<Operation>>,
    pub images: Vec<PdfImage>,
}

impl PdfLayout {
    /// Text shown on a page, in drawing order.
    pub fn page_text(&self, page: usize) -> Vec<String> {
        self.pages
            .get(page)
            .map(|ops| {
                ops.iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(bytes.iter().map(|&b| b as char).collect::<String>())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Lays out blocks top-down, starting a new page when a block or table row
/// does not fit above the bottom margin.
pub struct PdfBuilder {
    config: PdfConfig,
    pages: Vec<Vec<Operation>>,
    images: Vec<PdfImage>,
    cursor_y: f32,
}

impl PdfBuilder {
    pub fn new(config: PdfConfig) -> Self {
        let (_, page_height) = config.page_dimensions();
        let cursor_y = page_height - config.margin.top;
        PdfBuilder {
            config,
            pages: vec![Vec::new()],
            images: Vec::new(),
            cursor_y,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn top_of_frame(&self) -> f32 {
        self.config.page_dimensions().1 - self.config.margin.top
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor_y = self.top_of_frame();
    }

    /// Moves to a new page unless `height` fits. A block taller than a whole
    /// frame is placed at the top of a page anyway.
    fn ensure_space(&mut self, height: f32) {
        let at_top = (self.cursor_y - self.top_of_frame()).abs() < f32::EPSILON;
        if !at_top && self.cursor_y - height < self.config.margin.bottom {
            self.new_page();
        }
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// A spacer that does not fit ends the current frame; the next block
    /// starts the new page.
    pub fn add_spacer(&mut self, height: f32) -> &mut Self {
        self.cursor_y = (self.cursor_y - height).max(self.config.margin.bottom);
        self
    }

    pub fn add_title(&mut self, title: &str, size: f32) -> &mut Self {
        let leading = size * LEADING_FACTOR;
        self.ensure_space(leading);

        let width = PdfFont::Bold.text_width(title, size);
        let x = self.config.margin.left + (self.config.frame_width() - width) / 2.0;
        let baseline = self.cursor_y - size;
        push_text(self.ops(), PdfFont::Bold, size, x, baseline, title);

        self.cursor_y -= leading;
        self
    }

    /// Scales the image to `height` points keeping its aspect ratio and
    /// centres it horizontally.
    pub fn add_image(&mut self, image: &DynamicImage, height: f32) -> &mut Self {
        let (px_w, px_h) = (image.width(), image.height());
        if px_w == 0 || px_h == 0 {
            return self;
        }
        let aspect = px_w as f32 / px_h as f32;
        let width = (height * aspect).min(self.config.frame_width());
        let height = width / aspect;

        self.ensure_space(height);

        let name = format!("Im{}", self.images.len() + 1);
        self.images.push(to_pdf_image(&name, image));

        let x = self.config.margin.left + (self.config.frame_width() - width) / 2.0;
        let y = self.cursor_y - height;
        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));

        self.cursor_y = y;
        self
    }

    pub fn add_table(&mut self, table: &TableData) -> &mut Self {
        let columns = table.column_count();
        if columns == 0 {
            return self;
        }

        let widths: Vec<f32> = match &table.column_widths {
            Some(w) if w.len() >= columns => w[..columns].to_vec(),
            _ => vec![self.config.frame_width() / columns as f32; columns],
        };
        let table_width: f32 = widths.iter().sum();
        let x0 = self.config.margin.left + (self.config.frame_width() - table_width) / 2.0;

        let mut rows: Vec<(&[String], RowKind)> = Vec::new();
        if !table.headers.is_empty() {
            rows.push((table.headers.as_slice(), RowKind::Header));
        }
        let last = table.rows.len().saturating_sub(1);
        for (i, row) in table.rows.iter().enumerate() {
            let kind = if table.emphasize_last_row && i == last {
                RowKind::Emphasized
            } else {
                RowKind::Body
            };
            rows.push((row.as_slice(), kind));
        }

        for (cells, kind) in rows {
            self.draw_row(table, &widths, x0, cells, kind);
        }
        self
    }

    fn draw_row(&mut self, table: &TableData, widths: &[f32], x0: f32, cells: &[String], kind: RowKind) {
        let size = match kind {
            RowKind::Emphasized => self.config.font_size + 2.0,
            _ => self.config.font_size,
        };
        let leading = size * LEADING_FACTOR;
        let max_lines = cells.iter().map(|c| c.lines().count().max(1)).max().unwrap_or(1);
        let row_height = max_lines as f32 * leading + 2.0 * CELL_PADDING_Y;

        self.ensure_space(row_height);
        let top = self.cursor_y;
        let bottom = top - row_height;

        let mut x = x0;
        for (col, width) in widths.iter().enumerate() {
            let shaded = kind != RowKind::Body || table.shaded_columns.contains(&col);
            let text = cells.get(col).map(String::as_str).unwrap_or("");
            let align = table.align_for(col);

            let ops = self.ops();
            if shaded {
                push_fill(ops, x, bottom, *width, row_height);
            }
            push_stroke(ops, x, bottom, *width, row_height);

            for (line_no, line) in text.lines().enumerate() {
                let font = match kind {
                    RowKind::Header | RowKind::Emphasized => PdfFont::Bold,
                    RowKind::Body if table.bold_first_line && line_no == 0 => PdfFont::Bold,
                    RowKind::Body => PdfFont::Regular,
                };
                let text_width = font.text_width(line, size);
                let tx = match align {
                    ColumnAlign::Left => x + CELL_PADDING_X,
                    ColumnAlign::Right => x + width - CELL_PADDING_X - text_width,
                    ColumnAlign::Center => x + (width - text_width) / 2.0,
                };
                let baseline = top - CELL_PADDING_Y - size - line_no as f32 * leading;
                push_text(ops, font, size, tx, baseline, line);
            }
            x += width;
        }

        self.cursor_y = bottom;
    }

    pub fn build(self) -> PdfLayout {
        let (page_width, page_height) = self.config.page_dimensions();
        PdfLayout {
            page_width,
            page_height,
            pages: self.pages,
            images: self.images,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    Body,
    Emphasized,
}

pub(crate) fn real(value: f32) -> Object {
    Object::from(value)
}

fn push_text(ops: &mut Vec<Operation>, font: PdfFont, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.resource_name().as_bytes().to_vec()), real(size)],
    ));
    ops.push(Operation::new("Td", vec![real(x), real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn push_fill(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("g", vec![real(SHADE_GRAY)]));
    ops.push(Operation::new("re", vec![real(x), real(y), real(w), real(h)]));
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

fn push_stroke(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("w", vec![real(GRID_WIDTH)]));
    ops.push(Operation::new("re", vec![real(x), real(y), real(w), real(h)]));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

/// Splits an image into RGB samples and, when it has transparency, an
/// alpha mask.
fn to_pdf_image(name: &str, image: &DynamicImage) -> PdfImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    let opaque = alpha.iter().all(|&a| a == u8::MAX);

    PdfImage {
        name: name.to_string(),
        width,
        height,
        rgb,
        alpha: if opaque { None } else { Some(alpha) },
    }
}
