pub mod bind;
pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod draw;
pub mod error;
pub mod network;
pub mod properties;
pub mod render;
pub mod scene_dump;
pub mod theme;

pub use bind::bind_positions;
pub use canvas::{Canvas, Surface};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig};
pub use draw::{draw_network, draw_network_onto, label_nodes};
pub use error::{Error, Result};
pub use network::{Network, NodeAttributeStore};
pub use properties::{NetworkProperties, NodeId};
pub use render::render_svg;
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub render: RenderConfig,
    /// Write each node id next to its circle.
    pub labels: bool,
}

/// Decodes a network properties payload and renders it to an SVG document on
/// a fresh square canvas.
pub fn render_network_svg(input: &str, options: &RenderOptions) -> Result<String> {
    let props = NetworkProperties::from_json_str(input)?;
    let (canvas, mut surface) = draw_network(&props, &options.render)?;
    if options.labels {
        label_nodes(&mut surface, &props);
    }
    Ok(render_svg(&canvas, &surface, &options.theme))
}
