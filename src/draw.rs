use crate::canvas::{Aspect, Canvas, EllipseCollection, LineCollection, POINTS_PER_INCH, Surface};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::properties::{NetworkProperties, NodeId};

pub const LINK_ZORDER: f64 = -1.0;
pub const NODE_ZORDER: f64 = 1.0;
pub const LABEL_ZORDER: f64 = 2.0;

/// Redraws a computed network layout onto a fresh square canvas, sized from
/// `config.figure_size`, with a bare full-canvas surface.
///
/// The targets are returned so callers can keep annotating them, e.g. with
/// [`label_nodes`]. Use [`draw_network_onto`] to draw into targets the caller
/// already owns.
pub fn draw_network(props: &NetworkProperties, config: &RenderConfig) -> Result<(Canvas, Surface)> {
    let canvas = Canvas::square(config.square_side(), config.dpi);
    let mut surface = Surface::bare();
    draw_network_onto(props, &canvas, &mut surface)?;
    Ok((canvas, surface))
}

/// Redraws a computed network layout onto `surface`: links as one batched
/// line layer beneath one batched circle layer.
///
/// Drawing onto a surface that already holds layers adds to them. The layout
/// is validated and every link endpoint resolved before the surface is
/// touched, so on error `surface` is left exactly as it was.
pub fn draw_network_onto(
    props: &NetworkProperties,
    canvas: &Canvas,
    surface: &mut Surface,
) -> Result<()> {
    let _span = tracing::debug_span!(
        "draw_network",
        nodes = props.nodes.len(),
        links = props.links.len()
    )
    .entered();

    props.validate()?;

    let positions = props.positions();
    let endpoint = |id: &NodeId| {
        positions.get(id).copied().ok_or_else(|| {
            tracing::trace!(id = %id, "link endpoint missing from nodes");
            Error::MissingNodeReference {
                id: id.clone(),
                context: "layout nodes",
            }
        })
    };
    let segments = props
        .links
        .iter()
        .map(|link| -> Result<[[f64; 2]; 2]> {
            Ok([endpoint(&link.link[0])?, endpoint(&link.link[1])?])
        })
        .collect::<Result<Vec<_>>>()?;

    surface.set_aspect(Aspect::Equal);
    surface.set_axis_visible(false);
    surface.set_margins(0.0);
    surface.set_xlim(props.xlim);
    surface.set_ylim(props.ylim);

    // sizes arrive in data units; line widths are drawn in points
    let extent = surface.window_extent(canvas);
    let points_per_unit = extent.width / props.x_range() * POINTS_PER_INCH / canvas.dpi;
    tracing::debug!(points_per_unit, extent_width = extent.width, "unit conversion");

    surface.add_lines(LineCollection {
        segments,
        linewidths: props
            .links
            .iter()
            .map(|link| link.width * points_per_unit)
            .collect(),
        color: props.link_color.clone(),
        alpha: props.link_alpha,
        zorder: LINK_ZORDER,
    });

    let diameters: Vec<f64> = props.nodes.iter().map(|node| 2.0 * node.radius).collect();
    surface.add_ellipses(EllipseCollection {
        offsets: props.nodes.iter().map(|node| node.pos).collect(),
        widths: diameters.clone(),
        heights: diameters,
        angles: vec![0.0; props.nodes.len()],
        facecolors: props.nodes.iter().map(|node| node.color.clone()).collect(),
        linewidth: props.node_stroke_width * points_per_unit,
        edgecolor: props.node_stroke_color.clone(),
        zorder: NODE_ZORDER,
    });

    Ok(())
}

/// Writes each node's id at its position, above the drawn nodes.
pub fn label_nodes(surface: &mut Surface, props: &NetworkProperties) {
    for node in &props.nodes {
        surface.add_text(node.pos, node.id.to_string(), LABEL_ZORDER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Decorations, Layer};
    use crate::properties::{Color, LinkProperties, NodeProperties};

    fn color(value: &str) -> Color {
        Color::parse(value).unwrap()
    }

    fn node(id: &str, x: f64, y: f64, radius: f64) -> NodeProperties {
        NodeProperties {
            id: NodeId::from(id),
            pos: [x, y],
            radius,
            color: color("#79aaa0"),
        }
    }

    fn props(nodes: Vec<NodeProperties>, links: Vec<LinkProperties>) -> NetworkProperties {
        NetworkProperties {
            nodes,
            links,
            xlim: [0.0, 10.0],
            ylim: [0.0, 10.0],
            link_alpha: 0.5,
            link_color: color("#7c7c7c"),
            node_stroke_width: 0.5,
            node_stroke_color: color("#555555"),
        }
    }

    fn link(u: &str, v: &str, width: f64) -> LinkProperties {
        LinkProperties {
            link: [NodeId::from(u), NodeId::from(v)],
            width,
        }
    }

    fn lines(surface: &Surface) -> &LineCollection {
        surface
            .layers()
            .iter()
            .find_map(|layer| match layer {
                Layer::Lines(lines) => Some(lines),
                _ => None,
            })
            .unwrap()
    }

    fn ellipses(surface: &Surface) -> &EllipseCollection {
        surface
            .layers()
            .iter()
            .find_map(|layer| match layer {
                Layer::Ellipses(ellipses) => Some(ellipses),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn single_node_one_circle_no_segments() {
        let layout = props(vec![node("a", 5.0, 5.0, 1.0)], Vec::new());
        let (_, surface) = draw_network(&layout, &RenderConfig::default()).unwrap();
        assert!(lines(&surface).segments.is_empty());
        let circles = ellipses(&surface);
        assert_eq!(circles.offsets, vec![[5.0, 5.0]]);
        assert_eq!(circles.widths, vec![2.0]);
        assert_eq!(circles.heights, vec![2.0]);
        assert_eq!(circles.angles, vec![0.0]);
    }

    #[test]
    fn link_becomes_segment_beneath_nodes() {
        let layout = props(
            vec![node("a", 1.0, 2.0, 0.5), node("b", 8.0, 9.0, 0.5)],
            vec![link("a", "b", 0.25)],
        );
        let (_, surface) = draw_network(&layout, &RenderConfig::default()).unwrap();
        assert_eq!(lines(&surface).segments, vec![[[1.0, 2.0], [8.0, 9.0]]]);
        let order = surface.paint_order();
        assert!(matches!(order[0], Layer::Lines(_)));
        assert!(matches!(order[1], Layer::Ellipses(_)));
    }

    #[test]
    fn widths_convert_to_points() {
        // 4.8in square at 100dpi: 480px across 10 data units = 48px/unit = 34.56pt/unit
        let layout = props(
            vec![node("a", 1.0, 2.0, 0.5), node("b", 8.0, 9.0, 0.5)],
            vec![link("a", "b", 0.25)],
        );
        let (canvas, surface) = draw_network(&layout, &RenderConfig::default()).unwrap();
        let width = lines(&surface).linewidths[0];
        assert!((width - 0.25 * 34.56).abs() < 1e-9);
        assert!((canvas.points_to_px(width) - 12.0).abs() < 1e-9);
        assert!((ellipses(&surface).linewidth - 0.5 * 34.56).abs() < 1e-9);
    }

    #[test]
    fn default_target_is_square_and_bare() {
        let layout = props(vec![node("a", 5.0, 5.0, 1.0)], Vec::new());
        let (canvas, surface) = draw_network(&layout, &RenderConfig::default()).unwrap();
        assert_eq!(canvas.width_in, 4.8);
        assert_eq!(canvas.width_px(), canvas.height_px());
        assert_eq!(surface.decorations, Decorations::hidden());
        assert!(!surface.axis_visible);
        assert_eq!(surface.xlim, Some([0.0, 10.0]));
        assert_eq!(surface.aspect, Aspect::Equal);
    }

    #[test]
    fn missing_link_endpoint_is_reported() {
        let layout = props(vec![node("a", 1.0, 1.0, 0.5)], vec![link("a", "nope", 1.0)]);
        let err = draw_network(&layout, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingNodeReference { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn drawing_twice_is_additive() {
        let layout = props(vec![node("a", 5.0, 5.0, 1.0)], Vec::new());
        let config = RenderConfig::default();
        let (canvas, mut surface) = draw_network(&layout, &config).unwrap();
        draw_network_onto(&layout, &canvas, &mut surface).unwrap();
        assert_eq!(surface.layers().len(), 4);
    }

    #[test]
    fn styling_changes_leave_geometry_alone() {
        let layout = props(
            vec![node("a", 1.0, 2.0, 0.5), node("b", 8.0, 9.0, 0.7)],
            vec![link("a", "b", 0.25)],
        );
        let mut restyled = layout.clone();
        restyled.link_color = color("red");
        restyled.node_stroke_color = color("blue");
        let config = RenderConfig::default();
        let (_, first) = draw_network(&layout, &config).unwrap();
        let (_, second) = draw_network(&restyled, &config).unwrap();
        assert_eq!(lines(&first).segments, lines(&second).segments);
        assert_eq!(lines(&first).linewidths, lines(&second).linewidths);
        assert_eq!(ellipses(&first).offsets, ellipses(&second).offsets);
        assert_eq!(ellipses(&first).widths, ellipses(&second).widths);
        assert_eq!(lines(&second).color, color("red"));
        assert_eq!(ellipses(&second).edgecolor, color("blue"));
    }

    #[test]
    fn labels_sit_on_nodes() {
        let layout = props(vec![node("a", 1.0, 2.0, 0.5)], Vec::new());
        let (_, mut surface) = draw_network(&layout, &RenderConfig::default()).unwrap();
        label_nodes(&mut surface, &layout);
        let last = surface.paint_order().pop().unwrap();
        assert!(matches!(last, Layer::Text(text) if text.text == "a" && text.pos == [1.0, 2.0]));
    }

    #[test]
    fn failed_draw_leaves_existing_layers_alone() {
        let layout = props(vec![node("a", 1.0, 1.0, 0.5)], vec![link("a", "nope", 1.0)]);
        let canvas = Canvas::new(6.0, 3.0, 100.0);
        let mut surface = Surface::new([0.0, 0.0, 0.5, 1.0]);
        surface.add_text([0.0, 0.0], "kept", 5.0);
        let before = surface.clone();

        let err = draw_network_onto(&layout, &canvas, &mut surface).unwrap_err();
        assert!(matches!(err, Error::MissingNodeReference { .. }));
        assert_eq!(surface, before);
        assert!(matches!(&surface.layers()[0], Layer::Text(text) if text.text == "kept"));
    }

    #[test]
    fn degenerate_limits_are_rejected_before_drawing() {
        let mut layout = props(vec![node("a", 3.0, 3.0, 0.5)], Vec::new());
        layout.xlim = [3.0, 3.0];
        let err = draw_network(&layout, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedLayoutResult { .. }));

        let canvas = Canvas::square(4.0, 100.0);
        let mut surface = Surface::bare();
        assert!(draw_network_onto(&layout, &canvas, &mut surface).is_err());
        assert!(surface.layers().is_empty());
        assert_eq!(surface.xlim, None);
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let layout = props(vec![node("a", f64::NAN, 3.0, 0.5)], Vec::new());
        let err = draw_network(&layout, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedLayoutResult { .. }));
    }
}
