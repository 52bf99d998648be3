use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tiny_skia::{Color, Pixmap, Transform};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::render::svg::Background;

/// Keyword of the PNG text chunk carrying the host name.
pub const HOST_KEY: &str = "a";

pub fn load_background(path: &Path) -> Result<Background, RenderError> {
    let pixmap = Pixmap::load_png(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "background decode failed");
        RenderError::Background {
            path: path.to_path_buf(),
        }
    })?;
    let href = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Ok(Background {
        href: href.display().to_string(),
        width: pixmap.width(),
        height: pixmap.height(),
    })
}

/// Rasterizes `svg` so that its long side is `size_px` pixels, on white.
pub fn rasterize(svg: &str, size_px: u32) -> Result<Pixmap, RenderError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size();
    let scale = size_px as f32 / size.width().max(size.height()).max(1.0);
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Writes `pixmap` as an 8-bit RGBA PNG, tagged with `host` when known.
pub fn write_png(pixmap: &Pixmap, path: &Path, host: Option<&str>) -> Result<(), RenderError> {
    let file = File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    if let Some(host) = host {
        encoder.add_text_chunk(HOST_KEY.to_string(), host.to_string())?;
    }

    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect::<Vec<u8>>();

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

/// Host name for image metadata: `COMPUTERNAME`, then the system host name.
/// `None` when neither is available.
pub fn host_name() -> Option<String> {
    let host = pick_host(env::var("COMPUTERNAME").ok(), || {
        hostname::get().ok().and_then(|h| h.into_string().ok())
    });
    if host.is_none() {
        warn!("host name unavailable, writing image without metadata");
    }
    host
}

fn pick_host(computer_name: Option<String>, system: impl FnOnce() -> Option<String>) -> Option<String> {
    let clean = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };
    computer_name.and_then(clean).or_else(|| system().and_then(clean))
}
