pub mod image;
pub mod scale;
pub mod svg;
pub mod tui;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::PlotConfig;
use crate::error::RenderError;
use crate::reader::electric::ElectricNetwork;

/// Moves every station onto the background map. Stations that were already
/// moved are left alone; returns how many moved this time.
pub fn align_stations(network: &mut ElectricNetwork) -> usize {
    network
        .values_mut()
        .map(|p| p.align_to_background())
        .filter(|moved| *moved)
        .count()
}

/// Draws the network over the background map. With a destination the map is
/// written there, as SVG for a `.svg` path and PNG otherwise; without one it
/// is shown in the terminal.
pub fn plot_network(
    network: &mut ElectricNetwork,
    destination: Option<&Path>,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    align_stations(network);

    let Some(destination) = destination else {
        return tui::show(network, config);
    };

    let background = image::load_background(&config.background)?;
    let host = image::host_name();
    let document = svg::map_svg(network, config, Some(&background), host.as_deref())?;

    let is_svg = destination
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        fs::write(destination, document).map_err(|source| RenderError::Io {
            path: destination.to_path_buf(),
            source,
        })?;
    } else {
        let pixmap = image::rasterize(&document, config.size_px)?;
        image::write_png(&pixmap, destination, host.as_deref())?;
    }

    info!(
        path = %destination.display(),
        stations = network.node_count(),
        connections = network.arc_count(),
        "wrote map"
    );
    Ok(())
}
