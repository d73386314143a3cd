//! Frame titles, laid out and shaped by `usvg` and rasterized with `resvg`.

use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{FloodError, FloodResult};

/// Premultiplied RGBA8 raster of a title band.
#[derive(Clone, Debug)]
pub struct TitleImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

/// Rasterizes single-line, centered titles with a font database loaded once.
pub struct TitleRenderer {
    options: usvg::Options<'static>,
    size_px: f64,
    color: Rgb8,
}

impl TitleRenderer {
    /// System fonts, plus any font files directly inside `font_dir`.
    #[tracing::instrument(skip_all)]
    pub fn new(size_px: f64, color: Rgb8, font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        if db.is_empty() {
            tracing::warn!("no fonts available; frame titles will be blank");
        }

        let options = usvg::Options {
            fontdb: Arc::new(db),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        Self {
            options,
            size_px,
            color,
        }
    }

    /// Draw `text` centered on `anchor` (baseline) into a `width x height` transparent raster.
    pub fn rasterize(
        &self,
        text: &str,
        width: u32,
        height: u32,
        anchor: Point,
    ) -> FloodResult<TitleImage> {
        let svg = title_svg(text, width, height, anchor, self.size_px, self.color);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| FloodError::render(format!("title svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| FloodError::render("failed to allocate title pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(TitleImage {
            width,
            height,
            rgba8_premul: pixmap.data().to_vec(),
        })
    }
}

/// Standalone SVG document holding one centered `<text>` element.
pub fn title_svg(
    text: &str,
    width: u32,
    height: u32,
    anchor: Point,
    size_px: f64,
    color: Rgb8,
) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{x}" y="{y}" font-family="DejaVu Sans, Arial, sans-serif" font-size="{size_px}" fill="{fill}" text-anchor="middle">{body}</text></svg>"#,
        x = anchor.x,
        y = anchor.y,
        fill = color.to_hex(),
        body = escape_xml(text),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for path in rd.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if is_font && let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping font file");
        }
    }
}

/// Requested families first, then generic sans-serif, then any face at all.
fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/title.rs"]
mod tests;
