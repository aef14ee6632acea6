use crate::canvas::{Canvas, EllipseCollection, Extent, Layer, LineCollection, Surface, TextAnnotation, ViewTransform};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const TICK_COUNT: usize = 5;
const TICK_LENGTH: f64 = 3.5;

pub fn render_svg(canvas: &Canvas, surface: &Surface, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = canvas.width_px();
    let height = canvas.height_px();
    let transform = surface.view_transform(canvas);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));

    if theme.background != "none" {
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&theme.background)
        ));
    }

    let clip = svg_rect(&transform.extent, height);
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<clipPath id=\"surface-clip\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
        clip.0, clip.1, clip.2, clip.3
    ));
    svg.push_str("</defs>");

    for layer in surface.paint_order() {
        match layer {
            Layer::Lines(lines) => svg.push_str(&lines_svg(lines, &transform, canvas)),
            Layer::Ellipses(ellipses) => svg.push_str(&ellipses_svg(ellipses, &transform, canvas)),
            Layer::Text(text) => svg.push_str(&text_svg(text, &transform, theme)),
        }
    }

    if surface.axis_visible {
        svg.push_str(&decorations_svg(surface, &transform, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn lines_svg(lines: &LineCollection, transform: &ViewTransform, canvas: &Canvas) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"links\" clip-path=\"url(#surface-clip)\" stroke=\"{}\" stroke-opacity=\"{}\" fill=\"none\" stroke-linecap=\"butt\">",
        escape_xml(lines.color.as_str()),
        lines.alpha
    ));
    for (idx, [a, b]) in lines.segments.iter().enumerate() {
        let (x1, y1) = transform.to_px(*a);
        let (x2, y2) = transform.to_px(*b);
        let points = lines.linewidths.get(idx).copied().unwrap_or(1.0);
        out.push_str(&format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke-width=\"{}\"/>",
            format_width(canvas.points_to_px(points))
        ));
    }
    out.push_str("</g>");
    out
}

fn ellipses_svg(ellipses: &EllipseCollection, transform: &ViewTransform, canvas: &Canvas) -> String {
    let scale = transform.x_scale();
    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"nodes\" clip-path=\"url(#surface-clip)\" stroke=\"{}\" stroke-width=\"{}\">",
        escape_xml(ellipses.edgecolor.as_str()),
        format_width(canvas.points_to_px(ellipses.linewidth))
    ));
    for (idx, offset) in ellipses.offsets.iter().enumerate() {
        let (cx, cy) = transform.to_px(*offset);
        let rx = ellipses.widths.get(idx).copied().unwrap_or(0.0) * scale / 2.0;
        let ry = ellipses.heights.get(idx).copied().unwrap_or(0.0) * scale / 2.0;
        let fill = ellipses
            .facecolor(idx)
            .map(|color| color.as_str())
            .unwrap_or("none");
        let angle = ellipses.angles.get(idx).copied().unwrap_or(0.0);
        let rotate = if angle != 0.0 {
            // SVG rotates clockwise with y pointing down
            format!(" transform=\"rotate({:.2} {cx:.2} {cy:.2})\"", -angle)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "<ellipse cx=\"{cx:.2}\" cy=\"{cy:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" fill=\"{}\"{rotate}/>",
            escape_xml(fill)
        ));
    }
    out.push_str("</g>");
    out
}

fn text_svg(text: &TextAnnotation, transform: &ViewTransform, theme: &Theme) -> String {
    let (x, y) = transform.to_px(text.pos);
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.text_color),
        escape_xml(&text.text)
    )
}

fn decorations_svg(surface: &Surface, transform: &ViewTransform, theme: &Theme) -> String {
    let decorations = surface.decorations;
    let extent = &transform.extent;
    let (left, top, w, h) = svg_rect(extent, transform.canvas_height_px);
    let bottom = top + h;
    let mut out = String::new();

    if decorations.spines {
        out.push_str(&format!(
            "<rect class=\"spine\" x=\"{left:.2}\" y=\"{top:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            escape_xml(&theme.text_color)
        ));
    }

    if decorations.ticks || decorations.tick_labels {
        let font_size = theme.font_size;
        for idx in 0..TICK_COUNT {
            let frac = idx as f64 / (TICK_COUNT - 1) as f64;
            let xv = transform.xlim[0] + frac * (transform.xlim[1] - transform.xlim[0]);
            let yv = transform.ylim[0] + frac * (transform.ylim[1] - transform.ylim[0]);
            let tx = left + frac * w;
            let ty = bottom - frac * h;
            if decorations.ticks {
                out.push_str(&format!(
                    "<line class=\"tick\" x1=\"{tx:.2}\" y1=\"{bottom:.2}\" x2=\"{tx:.2}\" y2=\"{:.2}\" stroke=\"{}\"/>",
                    bottom + TICK_LENGTH,
                    escape_xml(&theme.text_color)
                ));
                out.push_str(&format!(
                    "<line class=\"tick\" x1=\"{left:.2}\" y1=\"{ty:.2}\" x2=\"{:.2}\" y2=\"{ty:.2}\" stroke=\"{}\"/>",
                    left - TICK_LENGTH,
                    escape_xml(&theme.text_color)
                ));
            }
            if decorations.tick_labels {
                out.push_str(&format!(
                    "<text class=\"tick-label\" x=\"{tx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
                    bottom + TICK_LENGTH + font_size as f64,
                    escape_xml(&theme.font_family),
                    escape_xml(&theme.text_color),
                    format_tick(xv)
                ));
                out.push_str(&format!(
                    "<text class=\"tick-label\" x=\"{:.2}\" y=\"{ty:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
                    left - TICK_LENGTH - 2.0,
                    escape_xml(&theme.font_family),
                    escape_xml(&theme.text_color),
                    format_tick(yv)
                ));
            }
        }
    }

    out
}

/// Extent as an SVG rectangle `(x, y, width, height)` with y pointing down.
fn svg_rect(extent: &Extent, canvas_height: f64) -> (f64, f64, f64, f64) {
    (
        extent.x0,
        canvas_height - extent.y0 - extent.height,
        extent.width,
        extent.height,
    )
}

fn format_tick(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

/// Stroke widths keep six decimals, enough for hairlines far below one pixel.
fn format_width(px: f64) -> String {
    let text = format!("{px:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, canvas: &Canvas) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(canvas.width_px() as f32, canvas.height_px() as f32)
        .ok_or_else(|| anyhow::anyhow!("Canvas has no drawable area"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
