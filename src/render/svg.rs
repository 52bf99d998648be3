use crate::config::PlotConfig;
use crate::error::RenderError;
use crate::reader::electric::ElectricNetwork;
use crate::render::scale::WidthScale;

/// The map is laid out as a 10 inch figure, so one point is this fraction of
/// the long side of the drawing.
const FIGURE_POINTS: f64 = 720.0;
const UNFRAMED_MARGIN: f64 = 20.0;

/// Background image placed at the origin of the map, in its own pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub href: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// The background's pixel grid, or the stations' bounding box with a
    /// margin when drawing without one.
    pub fn for_map(network: &ElectricNetwork, background: Option<&Background>) -> Option<Self> {
        if let Some(bg) = background {
            return Some(Self {
                min_x: 0.0,
                min_y: 0.0,
                width: bg.width as f64,
                height: bg.height as f64,
            });
        }
        let (lo_x, lo_y, hi_x, hi_y) = network.nodes().iter().map(|n| n.value()).fold(
            None,
            |acc: Option<(f64, f64, f64, f64)>, p| {
                Some(match acc {
                    None => (p.x, p.y, p.x, p.y),
                    Some((lx, ly, hx, hy)) => (lx.min(p.x), ly.min(p.y), hx.max(p.x), hy.max(p.y)),
                })
            },
        )?;
        Some(Self {
            min_x: lo_x - UNFRAMED_MARGIN,
            min_y: lo_y - UNFRAMED_MARGIN,
            width: hi_x - lo_x + 2.0 * UNFRAMED_MARGIN,
            height: hi_y - lo_y + 2.0 * UNFRAMED_MARGIN,
        })
    }

    fn point(&self) -> f64 {
        self.width.max(self.height) / FIGURE_POINTS
    }
}

/// Builds the SVG map: background, one line per connection, one label per
/// station. Station coordinates are used as they are, align them first.
pub fn map_svg(
    network: &ElectricNetwork,
    config: &PlotConfig,
    background: Option<&Background>,
    host: Option<&str>,
) -> Result<String, RenderError> {
    let view = Viewport::for_map(network, background).ok_or(RenderError::EmptyNetwork)?;
    let pt = view.point();
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         viewBox=\"{} {} {} {}\" width=\"{}\" height=\"{}\">\n",
        view.min_x, view.min_y, view.width, view.height, view.width, view.height
    ));
    if let Some(host) = host {
        svg.push_str(&format!("<metadata>a={}</metadata>\n", escape(host)));
    }
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        view.min_x, view.min_y, view.width, view.height
    ));
    if let Some(bg) = background {
        svg.push_str(&format!(
            "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" xlink:href=\"{}\"/>\n",
            bg.width,
            bg.height,
            escape(&bg.href)
        ));
    }

    if let Some(scale) = WidthScale::for_network(network, config) {
        let [r, g, b] = config.line_color;
        svg.push_str(&format!(
            "<g class=\"connections\" stroke=\"rgb({r},{g},{b})\" stroke-linecap=\"round\" fill=\"none\">\n"
        ));
        for arc in network.arcs() {
            let (Some(from), Some(to)) = (network.node(arc.from()), network.node(arc.to())) else {
                continue;
            };
            let (from, to) = (from.value(), to.value());
            svg.push_str(&format!(
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-width=\"{:.3}\"/>\n",
                from.x,
                from.y,
                to.x,
                to.y,
                scale.width(arc.weight()) * pt
            ));
        }
        svg.push_str("</g>\n");
    }

    let font = config.label_font_size * pt;
    svg.push_str(&format!(
        "<g class=\"stations\" font-family=\"sans-serif\" font-size=\"{font:.3}\" text-anchor=\"middle\">\n"
    ));
    for node in network.nodes() {
        let p = node.value();
        let chars = node.name().chars().count().max(1) as f64;
        let (w, h) = (chars * 0.62 * font + font * 0.6, font * 1.5);
        svg.push_str(&format!(
            "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{w:.3}\" height=\"{h:.3}\" rx=\"{:.3}\" \
             fill=\"white\" stroke=\"black\" stroke-width=\"{:.3}\"/>\n",
            p.x - w / 2.0,
            p.y - h / 2.0,
            h / 3.0,
            pt
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" dominant-baseline=\"central\">{}</text>\n",
            p.x,
            p.y,
            escape(node.name())
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    Ok(svg)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
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
