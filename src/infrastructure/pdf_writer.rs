// PDF document writer - lays figures out as A4 landscape pages
use crate::application::document_writer::DocumentWriter;
use crate::domain::error::{ReportError, Result};
use crate::domain::figure::{DisplayColor, Figure};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};
use std::io::{BufWriter, Write};
use std::path::Path;

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const PT_PER_MM: f32 = 2.834_646;
const TICK_INTERVALS: usize = 4;
const BAR_FILL: f32 = 0.7;
// Rough average glyph width for Helvetica, in ems
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Plot area of a page, in millimetres from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub plot_left: f32,
    pub plot_right: f32,
    pub plot_bottom: f32,
    pub plot_top: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            plot_left: 95.0,
            plot_right: 280.0,
            plot_bottom: 32.0,
            plot_top: 185.0,
        }
    }
}

/// Where a bar and its label land on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_baseline: f32,
}

impl PageLayout {
    fn plot_width(&self) -> f32 {
        self.plot_right - self.plot_left
    }

    fn slot_height(&self, bars: usize) -> f32 {
        (self.plot_top - self.plot_bottom) / bars.max(1) as f32
    }

    /// Label font size in points, shrinking as bars get thinner
    pub fn label_size(&self, bars: usize) -> f32 {
        (self.slot_height(bars) * PT_PER_MM * 0.6).clamp(3.0, 9.0)
    }

    pub fn value_x(&self, value: f64, axis_max: f64) -> f32 {
        let fraction = (value / axis_max).clamp(0.0, 1.0) as f32;
        self.plot_left + fraction * self.plot_width()
    }

    /// Bars stacked top to bottom by slot, so slot 0 sits highest
    pub fn bars(&self, figure: &Figure) -> Vec<BarGeometry> {
        let slot_height = self.slot_height(figure.bars.len());
        let height = slot_height * BAR_FILL;
        let axis_max = figure.axis_max();
        let label_size_mm = self.label_size(figure.bars.len()) / PT_PER_MM;

        figure
            .bars
            .iter()
            .map(|bar| {
                let slot_top = self.plot_top - bar.slot as f32 * slot_height;
                let y = slot_top - (slot_height - height) / 2.0 - height;
                BarGeometry {
                    x: self.plot_left,
                    y,
                    width: self.value_x(bar.value, axis_max) - self.plot_left,
                    height,
                    label_baseline: y + height / 2.0 - label_size_mm / 3.0,
                }
            })
            .collect()
    }

    /// Longest label, in characters, that fits the gutter left of the plot
    pub fn label_capacity(&self, font_size: f32) -> usize {
        let gutter_pt = (self.plot_left - 12.0) * PT_PER_MM;
        (gutter_pt / (font_size * GLYPH_WIDTH_EM)) as usize
    }
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_EM / PT_PER_MM
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

// Builtin fonts are WinAnsi encoded; anything outside it prints as '?'
const WINANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

pub fn winansi_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c,
            _ if WINANSI_EXTRAS.contains(c) => c,
            _ => '?',
        })
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn rgb(color: DisplayColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn line(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Writes figures as one PDF, staged in a temporary file beside the target
#[derive(Debug, Clone, Default)]
pub struct PdfDocumentWriter {
    layout: PageLayout,
}

impl PdfDocumentWriter {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    fn draw_page(
        &self,
        layer: &PdfLayerReference,
        figure: &Figure,
        fonts: &Fonts,
        footer: &str,
    ) {
        let layout = &self.layout;

        let title_size = 16.0;
        let title = winansi_text(&figure.title);
        let title_x = (PAGE_WIDTH_MM - text_width_mm(&title, title_size)) / 2.0;
        layer.set_fill_color(black());
        layer.use_text(
            title,
            title_size,
            Mm(title_x),
            Mm(layout.plot_top + 10.0),
            &fonts.bold,
        );

        let label_size = layout.label_size(figure.bars.len());
        let capacity = layout.label_capacity(label_size);
        for (bar, geometry) in figure.bars.iter().zip(layout.bars(figure)) {
            layer.set_fill_color(rgb(bar.color));
            layer.add_rect(Rect::new(
                Mm(geometry.x),
                Mm(geometry.y),
                Mm(geometry.x + geometry.width),
                Mm(geometry.y + geometry.height),
            ));

            let label = truncate_label(&winansi_text(&bar.label), capacity);
            let label_x = layout.plot_left - 2.0 - text_width_mm(&label, label_size);
            layer.set_fill_color(black());
            layer.use_text(
                label,
                label_size,
                Mm(label_x),
                Mm(geometry.label_baseline),
                &fonts.regular,
            );
        }

        if figure.is_empty() {
            layer.set_fill_color(black());
            layer.use_text(
                "No data",
                12.0,
                Mm(layout.plot_left + 5.0),
                Mm((layout.plot_top + layout.plot_bottom) / 2.0),
                &fonts.regular,
            );
        }

        layer.set_outline_color(black());
        layer.set_outline_thickness(0.75);
        layer.add_line(line(
            (layout.plot_left, layout.plot_bottom),
            (layout.plot_right, layout.plot_bottom),
        ));
        layer.add_line(line(
            (layout.plot_left, layout.plot_bottom),
            (layout.plot_left, layout.plot_top),
        ));

        let axis_max = figure.axis_max();
        layer.set_fill_color(black());
        for tick in figure.ticks(TICK_INTERVALS) {
            let x = layout.value_x(tick, axis_max);
            layer.add_line(line((x, layout.plot_bottom), (x, layout.plot_bottom - 1.5)));
            let text = format_tick(tick);
            layer.use_text(
                text.as_str(),
                8.0,
                Mm(x - text_width_mm(&text, 8.0) / 2.0),
                Mm(layout.plot_bottom - 5.5),
                &fonts.regular,
            );
        }

        let axis_label_size = 11.0;
        let centre = (layout.plot_left + layout.plot_right) / 2.0;
        layer.use_text(
            figure.x_axis_label.as_str(),
            axis_label_size,
            Mm(centre - text_width_mm(&figure.x_axis_label, axis_label_size) / 2.0),
            Mm(layout.plot_bottom - 13.0),
            &fonts.regular,
        );

        layer.use_text(footer, 7.0, Mm(10.0), Mm(8.0), &fonts.regular);
    }
}

impl DocumentWriter for PdfDocumentWriter {
    fn write(&self, figures: &[Figure], path: &Path) -> Result<()> {
        if figures.is_empty() {
            return Err(ReportError::NoFigures);
        }

        let render_err = |e: printpdf::Error| ReportError::Render(e.to_string());
        let width = Mm(PAGE_WIDTH_MM);
        let height = Mm(PAGE_HEIGHT_MM);

        let (doc, first_page, first_layer) =
            PdfDocument::new("Security Event Report", width, height, "chart");
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(render_err)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(render_err)?,
        };

        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z");
        for (index, figure) in figures.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, "chart")
            };
            let footer = format!(
                "Generated {} - page {} of {}",
                generated_at,
                index + 1,
                figures.len()
            );
            tracing::debug!("Laying out page {}: {}", index + 1, figure.title);
            self.draw_page(&doc.get_page(page).get_layer(layer), figure, &fonts, &footer);
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::Builder::new()
            .prefix(".alert-report")
            .suffix(".pdf")
            .tempfile_in(dir)
            .map_err(|e| ReportError::output(path, e))?;

        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            doc.save(&mut writer).map_err(render_err)?;
            writer.flush().map_err(|e| ReportError::output(path, e))?;
        }

        staged
            .persist(path)
            .map_err(|e| ReportError::output(path, e.error))?;
        Ok(())
    }
}
