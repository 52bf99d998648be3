use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ReadError;
use crate::graph::Network;
use crate::reader::reader::NetworkReader;

pub const CONNECTIONS_DIR: &str = "connections";
pub const STATION_FILE: &str = "station_data.txt";

pub type ElectricNetwork = Network<Coordinates>;

/// Station position. `aligned` is set once the position has been moved onto
/// the background map, see [`Coordinates::align_to_background`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    aligned: bool,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, aligned: false }
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// Empirical shift onto the background image. The intermediate values are
    /// truncated to whole pixels. Returns `false` if already applied.
    pub fn align_to_background(&mut self) -> bool {
        if self.aligned {
            return false;
        }
        self.y = ((self.y + 10.0) * 1.06).trunc();
        self.x -= (50.0 * self.y / 800.0).trunc();
        self.aligned = true;
        true
    }
}

/// Reads the electricity grid directory layout:
///
/// ```text
/// <root>/<any station dir>/station_data.txt
/// <root>/connections/<from>-<to>.csv
/// ```
///
/// Stations are read first so that every connection can resolve both ends
/// without duplicate checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElectricReader;

impl NetworkReader<Coordinates> for ElectricReader {
    fn read_into(&self, network: &mut ElectricNetwork, source: &Path) -> Result<(), ReadError> {
        let mut stations = 0;
        for entry in sorted_entries(source)? {
            if entry.file_name() == Some(OsStr::new(CONNECTIONS_DIR)) {
                continue;
            }
            if !entry.is_dir() {
                debug!(path = %entry.display(), "skipping non-directory entry");
                continue;
            }
            let (code, position) = read_station(&entry.join(STATION_FILE))?;
            debug!(code = %code, x = position.x, y = position.y, "station");
            network.add_node(code, position);
            stations += 1;
        }

        let connections_dir = source.join(CONNECTIONS_DIR);
        let mut connections = 0;
        if connections_dir.is_dir() {
            for file in sorted_entries(&connections_dir)? {
                if !file.is_file() {
                    continue;
                }
                let (from_name, to_name) = connection_endpoints(&file)?;
                let weight = mean_capacity(&file)?;
                let unknown = |name: &str| ReadError::UnknownStation {
                    path: file.clone(),
                    name: name.to_string(),
                };
                let from = network.node_id(&from_name).ok_or_else(|| unknown(&from_name))?;
                let to = network.node_id(&to_name).ok_or_else(|| unknown(&to_name))?;
                debug!(from = %from_name, to = %to_name, weight, "connection");
                network.add_arc(from, to, weight)?;
                connections += 1;
            }
        } else {
            warn!(path = %connections_dir.display(), "no connections directory, network has no arcs");
        }

        info!(path = %source.display(), stations, connections, "read electricity network");
        Ok(())
    }
}

/// Directory entries sorted by path, without dot-files such as `.DS_Store`.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| ReadError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ReadError::io(dir, e))?;
    entries.retain(|path| {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            debug!(path = %path.display(), "skipping hidden entry");
        }
        !hidden
    });
    entries.sort();
    Ok(entries)
}

fn read_station(path: &Path) -> Result<(String, Coordinates), ReadError> {
    let contents = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
    let bad = |reason: String| ReadError::StationData {
        path: path.to_path_buf(),
        reason,
    };

    let values = contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            l.split_whitespace()
                .nth(1)
                .ok_or_else(|| bad(format!("line {l:?} has no value")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [code, x, y] = values.as_slice() else {
        return Err(bad(format!(
            "expected 3 lines (code, x, y), found {}",
            values.len()
        )));
    };
    let coordinate = |label: &str, text: &str| {
        text.parse::<f64>()
            .map_err(|_| bad(format!("{label} {text:?} is not a number")))
    };
    let position = Coordinates::new(coordinate("x", x)?, coordinate("y", y)?);
    Ok((code.to_string(), position))
}

fn connection_endpoints(path: &Path) -> Result<(String, String), ReadError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.split('-').collect::<Vec<_>>().as_slice() {
        [from, to] if !from.is_empty() && !to.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => Err(ReadError::ConnectionName {
            path: path.to_path_buf(),
        }),
    }
}

/// Mean of the second column of a `time,capacity` series, header skipped.
fn mean_capacity(path: &Path) -> Result<f64, ReadError> {
    let contents = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;

    let (sum, count) = contents
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| !row.trim().is_empty())
        .map(|(i, row)| {
            let columns = row.split(',').map(str::trim).collect::<Vec<_>>();
            let [_, capacity] = columns.as_slice() else {
                return Err(ReadError::malformed(
                    path,
                    i + 1,
                    format!("expected 2 columns, found {}", columns.len()),
                ));
            };
            capacity.parse::<f64>().map_err(|_| {
                ReadError::malformed(path, i + 1, format!("capacity {capacity:?} is not a number"))
            })
        })
        .try_fold((0.0, 0usize), |(sum, count), capacity| {
            capacity.map(|c| (sum + c, count + 1))
        })?;

    if count == 0 {
        return Err(ReadError::EmptySeries {
            path: path.to_path_buf(),
        });
    }
    Ok(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn add_station(root: &Path, dir: &str, code: &str, x: f64, y: f64) {
        let station = root.join(dir);
        fs::create_dir_all(&station).unwrap();
        fs::write(
            station.join(STATION_FILE),
            format!("code: {code}\nx: {x}\ny: {y}\n"),
        )
        .unwrap();
    }

    fn add_connection(root: &Path, file: &str, contents: &str) {
        let connections = root.join(CONNECTIONS_DIR);
        fs::create_dir_all(&connections).unwrap();
        fs::write(connections.join(file), contents).unwrap();
    }

    fn two_stations() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        add_station(dir.path(), "Station A", "A", 100.0, 200.0);
        add_station(dir.path(), "Station B", "B", 300.0, 400.0);
        dir
    }

    #[test]
    fn test_read_fixture() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/grid");
        let network = ElectricReader.read_network(&root).unwrap();

        assert_eq!(3, network.node_count());
        assert_eq!(2, network.arc_count());
        let ota = network.get_node("OTA").unwrap();
        assert_relative_eq!(435.0, ota.value().x);
        assert_relative_eq!(245.0, ota.value().y);
        assert!(!ota.value().is_aligned());
        assert_eq!(1, ota.arcs_in().len());
        assert_eq!(1, ota.arcs_out().len());
        assert_eq!(
            "arc:(HEN)--250.0-->(OTA)",
            network.display_arc(ota.arcs_in()[0]).to_string()
        );
    }

    #[test]
    fn test_arc_weight_is_mean_capacity() {
        let dir = two_stations();
        add_connection(dir.path(), "A-B.csv", "time, capacity\n1, 10\n2, 20\n3, 30\n");

        let network = ElectricReader.read_network(dir.path()).unwrap();

        assert_eq!(1, network.arc_count());
        let arc = &network.arcs()[0];
        assert_eq!(20.0, arc.weight());
        assert_eq!(network.node_id("A").unwrap(), arc.from());
        assert_eq!(network.node_id("B").unwrap(), arc.to());
    }

    #[test]
    fn test_station_values() {
        let dir = two_stations();

        let network = ElectricReader.read_network(dir.path()).unwrap();

        let b = network.get_node("B").unwrap();
        assert_eq!(Coordinates::new(300.0, 400.0), *b.value());
        assert_eq!(0, network.arc_count());
    }

    #[test]
    fn test_connection_without_extension() {
        let dir = two_stations();
        add_connection(dir.path(), "B-A", "t,c\n0,1.5\n1,2.5\n\n");

        let network = ElectricReader.read_network(dir.path()).unwrap();

        assert_relative_eq!(2.0, network.arcs()[0].weight());
        assert_eq!(network.node_id("B").unwrap(), network.arcs()[0].from());
    }

    #[test]
    fn test_loose_files_in_root_are_ignored() {
        let dir = two_stations();
        fs::write(dir.path().join("README"), "not a station").unwrap();

        let network = ElectricReader.read_network(dir.path()).unwrap();

        assert_eq!(2, network.node_count());
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let dir = two_stations();
        add_connection(dir.path(), "A-B.csv", "t,c\n0,4\n");
        add_connection(dir.path(), ".DS_Store", "\0\0binary");
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join(STATION_FILE), "garbage").unwrap();

        let network = ElectricReader.read_network(dir.path()).unwrap();

        assert_eq!(2, network.node_count());
        assert_eq!(1, network.arc_count());
    }

    #[test]
    fn test_connection_name_needs_one_dash() {
        for name in ["AB.csv", "A-B-C.csv", "-B.csv"] {
            let dir = two_stations();
            add_connection(dir.path(), name, "t,c\n0,1\n");

            let err = ElectricReader.read_network(dir.path()).unwrap_err();
            assert!(matches!(err, ReadError::ConnectionName { .. }), "{name}: {err}");
        }
    }

    #[test]
    fn test_unknown_station() {
        let dir = two_stations();
        add_connection(dir.path(), "A-Z.csv", "t,c\n0,1\n");

        let err = ElectricReader.read_network(dir.path()).unwrap_err();

        match err {
            ReadError::UnknownStation { name, .. } => assert_eq!("Z", name),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_series() {
        let dir = two_stations();
        add_connection(dir.path(), "A-B.csv", "time, capacity\n");

        let err = ElectricReader.read_network(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::EmptySeries { .. }));
    }

    #[test]
    fn test_bad_capacity_row() {
        let dir = two_stations();
        add_connection(dir.path(), "A-B.csv", "time, capacity\n1, 10\n2\n");

        let err = ElectricReader.read_network(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_station_file_needs_three_lines() {
        let dir = two_stations();
        let station = dir.path().join("Station C");
        fs::create_dir_all(&station).unwrap();
        fs::write(station.join(STATION_FILE), "code: C\nx: 1\n").unwrap();

        let err = ElectricReader.read_network(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::StationData { .. }));
    }

    #[test]
    fn test_station_coordinate_must_be_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let station = dir.path().join("Station C");
        fs::create_dir_all(&station).unwrap();
        fs::write(station.join(STATION_FILE), "code: C\nx: east\ny: 1\n").unwrap();

        let err = ElectricReader.read_network(dir.path()).unwrap_err();
        assert!(err.to_string().contains("\"east\""), "{err}");
    }

    #[test]
    fn test_station_dir_without_data_file() {
        let dir = two_stations();
        fs::create_dir_all(dir.path().join("Empty")).unwrap();

        let err = ElectricReader.read_network(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }

    #[test]
    fn test_align_to_background() {
        let mut position = Coordinates::new(100.0, 40.0);

        assert!(position.align_to_background());
        assert_relative_eq!(53.0, position.y);
        assert_relative_eq!(97.0, position.x);
        assert!(position.is_aligned());
    }

    #[test]
    fn test_align_to_background_runs_once() {
        let mut position = Coordinates::new(100.0, 40.0);
        position.align_to_background();
        let aligned = position;

        assert!(!position.align_to_background());
        assert_eq!(aligned, position);
    }
}
