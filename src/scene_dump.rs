use crate::canvas::{Canvas, Extent, Layer, Surface};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A drawn scene flattened into device pixels, in paint order.
#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub width: f64,
    pub height: f64,
    pub extent: Extent,
    pub xlim: [f64; 2],
    pub ylim: [f64; 2],
    pub segments: Vec<SegmentDump>,
    pub circles: Vec<CircleDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct SegmentDump {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub stroke_width: f64,
    pub color: String,
    pub alpha: f64,
}

#[derive(Debug, Serialize)]
pub struct CircleDump {
    pub center: [f64; 2],
    pub rx: f64,
    pub ry: f64,
    pub fill: Option<String>,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub pos: [f64; 2],
    pub text: String,
}

impl SceneDump {
    pub fn from_scene(canvas: &Canvas, surface: &Surface) -> Self {
        let transform = surface.view_transform(canvas);
        let scale = transform.x_scale();
        let px = |point: [f64; 2]| {
            let (x, y) = transform.to_px(point);
            [x, y]
        };

        let mut segments = Vec::new();
        let mut circles = Vec::new();
        let mut labels = Vec::new();
        for layer in surface.paint_order() {
            match layer {
                Layer::Lines(lines) => {
                    for (idx, [a, b]) in lines.segments.iter().enumerate() {
                        segments.push(SegmentDump {
                            from: px(*a),
                            to: px(*b),
                            stroke_width: canvas
                                .points_to_px(lines.linewidths.get(idx).copied().unwrap_or(1.0)),
                            color: lines.color.to_string(),
                            alpha: lines.alpha,
                        });
                    }
                }
                Layer::Ellipses(ellipses) => {
                    for (idx, offset) in ellipses.offsets.iter().enumerate() {
                        circles.push(CircleDump {
                            center: px(*offset),
                            rx: ellipses.widths.get(idx).copied().unwrap_or(0.0) * scale / 2.0,
                            ry: ellipses.heights.get(idx).copied().unwrap_or(0.0) * scale / 2.0,
                            fill: ellipses.facecolor(idx).map(|color| color.to_string()),
                            stroke: ellipses.edgecolor.to_string(),
                            stroke_width: canvas.points_to_px(ellipses.linewidth),
                        });
                    }
                }
                Layer::Text(text) => labels.push(LabelDump {
                    pos: px(text.pos),
                    text: text.text.clone(),
                }),
            }
        }

        SceneDump {
            width: canvas.width_px(),
            height: canvas.height_px(),
            extent: transform.extent,
            xlim: transform.xlim,
            ylim: transform.ylim,
            segments,
            circles,
            labels,
        }
    }
}

pub fn write_scene_dump(path: &Path, dump: &SceneDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}
