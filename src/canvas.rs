//! Drawing target model: a `Canvas` (the figure, sized in inches at a given
//! dpi) and a `Surface` (a coordinate-mapped region of it holding batched
//! layers). Layers keep positions in data units; stroke widths are in points.

use crate::properties::Color;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl Canvas {
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    pub fn square(size_in: f64, dpi: f64) -> Self {
        Self::new(size_in, size_in, dpi)
    }

    pub fn width_px(&self) -> f64 {
        self.width_in * self.dpi
    }

    pub fn height_px(&self) -> f64 {
        self.height_in * self.dpi
    }

    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspect {
    /// Fill the surface rectangle, scaling the axes independently.
    Auto,
    /// One data unit spans the same length on both axes; the drawing box
    /// shrinks to fit and stays centered in the surface rectangle.
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
    pub spines: bool,
    pub ticks: bool,
    pub tick_labels: bool,
}

impl Decorations {
    pub fn visible() -> Self {
        Self {
            spines: true,
            ticks: true,
            tick_labels: true,
        }
    }

    pub fn hidden() -> Self {
        Self {
            spines: false,
            ticks: false,
            tick_labels: false,
        }
    }
}

/// Realized drawing box in device pixels, origin at the canvas' lower left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCollection {
    pub segments: Vec<[[f64; 2]; 2]>,
    /// Per-segment stroke width in points.
    pub linewidths: Vec<f64>,
    pub color: Color,
    pub alpha: f64,
    pub zorder: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCollection {
    /// Centers in data units.
    pub offsets: Vec<[f64; 2]>,
    /// Full widths and heights in x data units.
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
    /// Rotation in degrees, counter-clockwise.
    pub angles: Vec<f64>,
    pub facecolors: Vec<Color>,
    /// Outline width in points.
    pub linewidth: f64,
    pub edgecolor: Color,
    pub zorder: f64,
}

impl EllipseCollection {
    /// Fill for the ellipse at `idx`. Short color lists repeat their last
    /// entry; `None` only when there are no face colors at all.
    pub fn facecolor(&self, idx: usize) -> Option<&Color> {
        self.facecolors.get(idx).or_else(|| self.facecolors.last())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub pos: [f64; 2],
    pub text: String,
    pub zorder: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Lines(LineCollection),
    Ellipses(EllipseCollection),
    Text(TextAnnotation),
}

impl Layer {
    pub fn zorder(&self) -> f64 {
        match self {
            Layer::Lines(lines) => lines.zorder,
            Layer::Ellipses(ellipses) => ellipses.zorder,
            Layer::Text(text) => text.zorder,
        }
    }

    /// Data-space bounding box `[xmin, xmax, ymin, ymax]`, if the layer has
    /// any content.
    fn data_bounds(&self) -> Option<[f64; 4]> {
        let mut bounds: Option<[f64; 4]> = None;
        let mut include = |x: f64, y: f64| {
            let b = bounds.get_or_insert([x, x, y, y]);
            b[0] = b[0].min(x);
            b[1] = b[1].max(x);
            b[2] = b[2].min(y);
            b[3] = b[3].max(y);
        };
        match self {
            Layer::Lines(lines) => {
                for [a, b] in &lines.segments {
                    include(a[0], a[1]);
                    include(b[0], b[1]);
                }
            }
            Layer::Ellipses(ellipses) => {
                for (idx, [x, y]) in ellipses.offsets.iter().enumerate() {
                    let rx = ellipses.widths.get(idx).copied().unwrap_or(0.0) / 2.0;
                    let ry = ellipses.heights.get(idx).copied().unwrap_or(0.0) / 2.0;
                    include(x - rx, y - ry);
                    include(x + rx, y + ry);
                }
            }
            Layer::Text(text) => include(text.pos[0], text.pos[1]),
        }
        bounds
    }
}

/// Maps data coordinates onto SVG pixel coordinates (y pointing down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub extent: Extent,
    pub xlim: [f64; 2],
    pub ylim: [f64; 2],
    pub canvas_height_px: f64,
}

impl ViewTransform {
    pub fn to_px(&self, point: [f64; 2]) -> (f64, f64) {
        let fx = (point[0] - self.xlim[0]) / (self.xlim[1] - self.xlim[0]);
        let fy = (point[1] - self.ylim[0]) / (self.ylim[1] - self.ylim[0]);
        let x = self.extent.x0 + fx * self.extent.width;
        let y = self.extent.y0 + fy * self.extent.height;
        (x, self.canvas_height_px - y)
    }

    /// Pixels per x data unit.
    pub fn x_scale(&self) -> f64 {
        self.extent.width / (self.xlim[1] - self.xlim[0]).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// `[left, bottom, width, height]` as fractions of the canvas.
    pub rect: [f64; 4],
    pub xlim: Option<[f64; 2]>,
    pub ylim: Option<[f64; 2]>,
    pub aspect: Aspect,
    pub axis_visible: bool,
    pub decorations: Decorations,
    /// Padding added around autoscaled limits, as a fraction of the data range.
    pub margins: [f64; 2],
    layers: Vec<Layer>,
}

impl Surface {
    pub fn new(rect: [f64; 4]) -> Self {
        Self {
            rect,
            xlim: None,
            ylim: None,
            aspect: Aspect::Auto,
            axis_visible: true,
            decorations: Decorations::visible(),
            margins: [0.05, 0.05],
            layers: Vec::new(),
        }
    }

    /// Surface covering the whole canvas with spines, ticks and tick labels
    /// removed.
    pub fn bare() -> Self {
        Self {
            decorations: Decorations::hidden(),
            ..Self::new([0.0, 0.0, 1.0, 1.0])
        }
    }

    pub fn set_xlim(&mut self, xlim: [f64; 2]) {
        self.xlim = Some(xlim);
    }

    pub fn set_ylim(&mut self, ylim: [f64; 2]) {
        self.ylim = Some(ylim);
    }

    pub fn set_aspect(&mut self, aspect: Aspect) {
        self.aspect = aspect;
    }

    pub fn set_margins(&mut self, margin: f64) {
        self.margins = [margin, margin];
    }

    pub fn set_axis_visible(&mut self, visible: bool) {
        self.axis_visible = visible;
    }

    pub fn add_lines(&mut self, lines: LineCollection) {
        self.layers.push(Layer::Lines(lines));
    }

    pub fn add_ellipses(&mut self, ellipses: EllipseCollection) {
        self.layers.push(Layer::Ellipses(ellipses));
    }

    pub fn add_text(&mut self, pos: [f64; 2], text: impl Into<String>, zorder: f64) {
        self.layers.push(Layer::Text(TextAnnotation {
            pos,
            text: text.into(),
            zorder,
        }));
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers in paint order: ascending zorder, insertion order among equals.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().collect();
        layers.sort_by(|a, b| a.zorder().total_cmp(&b.zorder()));
        layers
    }

    /// Explicit limits, or limits fitted around the layer content.
    pub fn view_limits(&self) -> ([f64; 2], [f64; 2]) {
        let fitted = self.fitted_limits();
        let xlim = self.xlim.unwrap_or([fitted[0], fitted[1]]);
        let ylim = self.ylim.unwrap_or([fitted[2], fitted[3]]);
        (xlim, ylim)
    }

    fn fitted_limits(&self) -> [f64; 4] {
        let bounds = self
            .layers
            .iter()
            .filter_map(Layer::data_bounds)
            .reduce(|a, b| [a[0].min(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].max(b[3])]);
        let Some([x0, x1, y0, y1]) = bounds else {
            return [0.0, 1.0, 0.0, 1.0];
        };
        let (x0, x1) = pad_range(x0, x1, self.margins[0]);
        let (y0, y1) = pad_range(y0, y1, self.margins[1]);
        [x0, x1, y0, y1]
    }

    /// The drawing box in device pixels on `canvas`, after aspect adjustment.
    pub fn window_extent(&self, canvas: &Canvas) -> Extent {
        let box_x = self.rect[0] * canvas.width_px();
        let box_y = self.rect[1] * canvas.height_px();
        let box_w = self.rect[2] * canvas.width_px();
        let box_h = self.rect[3] * canvas.height_px();
        if self.aspect == Aspect::Auto || box_w <= 0.0 || box_h <= 0.0 {
            return Extent {
                x0: box_x,
                y0: box_y,
                width: box_w,
                height: box_h,
            };
        }

        let (xlim, ylim) = self.view_limits();
        let data_ratio = (ylim[1] - ylim[0]).abs() / (xlim[1] - xlim[0]).abs();
        let (width, height) = if data_ratio > box_h / box_w {
            (box_h / data_ratio, box_h)
        } else {
            (box_w, box_w * data_ratio)
        };
        Extent {
            x0: box_x + (box_w - width) / 2.0,
            y0: box_y + (box_h - height) / 2.0,
            width,
            height,
        }
    }

    pub fn view_transform(&self, canvas: &Canvas) -> ViewTransform {
        let (xlim, ylim) = self.view_limits();
        ViewTransform {
            extent: self.window_extent(canvas),
            xlim,
            ylim,
            canvas_height_px: canvas.height_px(),
        }
    }
}

fn pad_range(lo: f64, hi: f64, margin: f64) -> (f64, f64) {
    if hi - lo <= f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * margin;
    (lo - pad, hi + pad)
}
