use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::ReadError;
use crate::graph::{Network, NodeId};
use crate::reader::reader::NetworkReader;

/// Reads the comma separated adjacency format:
///
/// ```text
/// A,B;5,C;1
/// B,C;2
/// ```
///
/// The first field of a line names the source node, every following field is
/// `<destination>;<weight>`. Weights are parsed as `f64`. Blank lines are
/// skipped, so neither a trailing newline nor a missing one changes the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextReader;

/// One line of the file: a source name and its `(destination, weight)` arcs.
type Record = (String, Vec<(String, f64)>);

impl<V: Default> NetworkReader<V> for TextReader {
    /// The whole file is parsed before the network is touched, so a malformed
    /// line leaves `network` as it was.
    fn read_into(&self, network: &mut Network<V>, source: &Path) -> Result<(), ReadError> {
        let records = parse_records(source)?;
        let arcs_before = network.arc_count();

        for (origin, arcs) in &records {
            let origin = get_or_add(network, origin);
            for (destination, weight) in arcs {
                let destination = get_or_add(network, destination);
                network.add_arc(origin, destination, *weight)?;
            }
        }

        info!(
            path = %source.display(),
            nodes = network.node_count(),
            arcs = network.arc_count() - arcs_before,
            "read network"
        );
        Ok(())
    }
}

fn parse_records(source: &Path) -> Result<Vec<Record>, ReadError> {
    let file = File::open(source).map_err(|e| ReadError::io(source, e))?;
    let mut records = Vec::new();

    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| ReadError::io(source, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let (origin, arcs) = match line.split_once(',') {
            Some((origin, rest)) => {
                let arcs = rest
                    .split(',')
                    .map(|field| {
                        parse_arc_field(field)
                            .map(|(destination, weight)| (destination.to_string(), weight))
                            .map_err(|reason| ReadError::malformed(source, i + 1, reason))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (origin, arcs)
            }
            None => (line.as_str(), Vec::new()),
        };
        records.push((origin.to_string(), arcs));
    }
    Ok(records)
}

fn get_or_add<V: Default>(network: &mut Network<V>, name: &str) -> NodeId {
    match network.node_id(name) {
        Some(id) => id,
        None => {
            debug!(name, "new node");
            network.add_node(name, V::default())
        }
    }
}

fn parse_arc_field(field: &str) -> Result<(&str, f64), String> {
    let mut parts = field.split(';');
    let (Some(destination), Some(weight), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected <destination>;<weight>, found {field:?}"));
    };
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("weight {:?} of arc to {destination:?} is not a number", weight.trim()))?;
    Ok((destination, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    type TextNetwork = Network<Option<String>>;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/network.txt")
    }

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn read(contents: &str) -> Result<TextNetwork, ReadError> {
        let file = write_file(contents);
        TextReader.read_network(file.path())
    }

    #[test]
    fn test_read_fixture() {
        let network: TextNetwork = TextReader.read_network(&fixture()).unwrap();

        assert_eq!("A", network.get_node("A").unwrap().name());
        assert_eq!("B", network.get_node("B").unwrap().name());
        assert_eq!(9, network.arc_count());
        assert_eq!(6, network.node_count());
        assert!(network.nodes().iter().all(|n| n.value().is_none()));
    }

    #[test]
    fn test_arcs_follow_file_order() {
        let network = read("A,B;5,C;1\nB,C;2.5\n").unwrap();

        let rendered = network
            .arcs()
            .iter()
            .map(|a| network.display_arc(a.id()).to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            vec!["arc:(A)--5.0-->(B)", "arc:(A)--1.0-->(C)", "arc:(B)--2.5-->(C)"],
            rendered
        );
        let b = network.node_id("B").unwrap();
        assert_eq!(1, network.incoming(b).len());
        assert_eq!(1, network.outgoing(b).len());
    }

    #[test]
    fn test_name_seen_as_destination_then_source_is_one_node() {
        let network = read("A,B;1\nB,A;2\nA,B;3\n").unwrap();

        assert_eq!(2, network.node_count());
        assert_eq!(3, network.arc_count());
        let a = network.node_id("A").unwrap();
        assert_eq!(2, network.outgoing(a).len());
        assert_eq!(1, network.incoming(a).len());
    }

    #[test]
    fn test_trailing_blank_lines_add_nothing() {
        let with = read("A,B;1\n\n\n").unwrap();
        let without = read("A,B;1").unwrap();

        for network in [with, without] {
            assert_eq!(2, network.node_count());
            assert_eq!(1, network.arc_count());
            assert!(network.get_node("").is_none());
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let network = read("A,B;1\r\nB,C;2\r\n").unwrap();

        assert!(network.get_node("B").is_some());
        assert!(network.get_node("B\r").is_none());
        let weights = network.arcs().iter().map(|a| a.weight()).collect::<Vec<_>>();
        assert_eq!(vec![1.0, 2.0], weights);
    }

    #[test]
    fn test_source_without_arcs() {
        let network = read("A\nB,A;4\n").unwrap();

        assert_eq!(2, network.node_count());
        assert_eq!(1, network.arc_count());
        assert_relative_eq!(4.0, network.arcs()[0].weight());
    }

    #[test]
    fn test_missing_separator_reports_line() {
        let err = read("A,B;1\nB,C\n").unwrap_err();

        match err {
            ReadError::MalformedRecord { line, reason, .. } => {
                assert_eq!(2, line);
                assert!(reason.contains("\"C\""), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_separator_is_rejected() {
        let err = read("A,B;1;2\n").unwrap_err();
        assert!(matches!(err, ReadError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_non_numeric_weight_is_rejected() {
        let err = read("A,B;heavy\n").unwrap_err();
        assert!(matches!(err, ReadError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<TextNetwork, _> = TextReader.read_network(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(ReadError::Io { .. })));
    }

    #[test]
    fn test_bad_line_leaves_network_untouched() {
        let file = write_file("A,B;1,C;2\nC,D;3,E\n");
        let mut network = TextNetwork::new();
        network.add_node("Z", None);

        let err = TextReader.read_into(&mut network, file.path()).unwrap_err();

        assert!(matches!(err, ReadError::MalformedRecord { line: 2, .. }));
        assert_eq!(1, network.node_count());
        assert_eq!(0, network.arc_count());
    }

    #[test]
    fn test_trailing_comma_is_malformed() {
        let err = read("A,\n").unwrap_err();
        assert!(matches!(err, ReadError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_reading_twice_merges() {
        let file = write_file("A,B;1\n");
        let mut network = TextNetwork::new();

        TextReader.read_into(&mut network, file.path()).unwrap();
        TextReader.read_into(&mut network, file.path()).unwrap();

        assert_eq!(2, network.node_count());
        assert_eq!(2, network.arc_count());
    }
}
