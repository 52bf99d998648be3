use std::path::PathBuf;

pub const DEFAULT_BACKGROUND: &str = "bg.png";

#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Coastline image the stations are drawn over. Its pixel grid is the
    /// coordinate system of the map.
    pub background: PathBuf,
    /// Stroke width of the lowest weighted connection.
    pub min_line_width: f64,
    /// Stroke width of the highest weighted connection.
    pub max_line_width: f64,
    /// Long side of a rasterized map, in pixels.
    pub size_px: u32,
    pub line_color: [u8; 3],
    pub label_font_size: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from(DEFAULT_BACKGROUND),
            min_line_width: 0.5,
            max_line_width: 10.0,
            size_px: 3000,
            line_color: [153, 153, 153],
            label_font_size: 10.0,
        }
    }
}
