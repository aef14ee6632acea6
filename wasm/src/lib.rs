use netwulf_render::{RenderConfig, RenderOptions, Theme, render_network_svg as render_svg_document};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkRenderOptions {
    theme: Option<String>,
    figure_size: Option<f64>,
    dpi: Option<f64>,
    labels: Option<bool>,
}

fn build_render_options(options: NetworkRenderOptions) -> RenderOptions {
    let theme = options
        .theme
        .as_deref()
        .and_then(Theme::from_name)
        .unwrap_or_default();

    let mut render = RenderConfig::default();
    if let Some(size) = options.figure_size.filter(|size| *size > 0.0) {
        render.figure_size = (size, size);
    }
    if let Some(dpi) = options.dpi.filter(|dpi| *dpi > 0.0) {
        render.dpi = dpi;
    }

    RenderOptions {
        theme,
        render,
        labels: options.labels.unwrap_or(false),
    }
}

#[wasm_bindgen]
pub fn render_network_svg(props_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<NetworkRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        NetworkRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_svg_document(props_json, &render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use netwulf_render::render_network_svg;

    use crate::{NetworkRenderOptions, build_render_options};

    const TRIANGLE: &str = r##"{
        "xlim": [0, 3], "ylim": [0, 3],
        "linkColor": "#7c7c7c", "linkAlpha": 0.5,
        "nodeStrokeColor": "#555555", "nodeStrokeWidth": 0.02,
        "links": [
            {"link": ["x", "y"], "width": 0.05},
            {"link": ["y", "z"], "width": 0.05},
            {"link": ["z", "x"], "width": 0.05}
        ],
        "nodes": [
            {"id": "x", "pos": [0.5, 0.5], "radius": 0.2, "color": "#79aaa0"},
            {"id": "y", "pos": [2.5, 0.5], "radius": 0.2, "color": "#79aaa0"},
            {"id": "z", "pos": [1.5, 2.5], "radius": 0.2, "color": "#79aaa0"}
        ]
    }"##;

    #[test]
    fn renders_triangle_with_labels() {
        let options: NetworkRenderOptions =
            serde_json::from_str(r#"{"theme": "transparent", "figureSize": 3, "dpi": 50, "labels": true}"#)
                .unwrap();
        let render_options = build_render_options(options);
        assert_eq!(render_options.render.figure_size, (3.0, 3.0));

        let svg = render_network_svg(TRIANGLE, &render_options).expect("triangle should render");

        assert!(svg.contains("width=\"150.00\""));
        assert_eq!(svg.matches("<ellipse").count(), 3);
        assert!(svg.contains(">z</text>"));
        assert!(!svg.contains("<rect width=\"100%\""));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let options = build_render_options(NetworkRenderOptions {
            theme: Some("neon".to_string()),
            ..Default::default()
        });
        assert_eq!(options.theme.background, "#FFFFFF");
        assert!(!options.labels);
    }
}
