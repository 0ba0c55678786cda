//! Building nested trees from flat property paths.

use serde_yaml::{Mapping, Value};
use tracing::trace;

use super::PropertyEntry;

/// Build the nested mapping spelled by `entries`.
///
/// Entries are applied in order. Intermediate mappings are created on
/// demand; when a later entry collides with an earlier one the later write
/// wins, whether it replaces a subtree with a leaf or a leaf with a subtree.
/// Entries with an empty path are ignored.
///
/// ```
/// use stratum_config::{PropertyEntry, source::tree::build};
///
/// let tree = build(&[
///     PropertyEntry::new(["server", "port"], "80"),
///     PropertyEntry::new(["server", "host"], "localhost"),
/// ]);
/// assert_eq!(tree["server"]["port"], serde_yaml::Value::from("80"));
/// ```
#[must_use]
pub fn build(entries: &[PropertyEntry]) -> Value {
    let mut root = Value::Mapping(Mapping::new());
    for entry in entries.iter().filter(|entry| !entry.path.is_empty()) {
        trace!(path = ?entry.path, "placing property");
        place(&mut root, &entry.path, &entry.value);
    }
    root
}

fn place(node: &mut Value, path: &[String], value: &str) {
    let Some((head, rest)) = path.split_first() else {
        *node = Value::from(value);
        return;
    };
    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = node {
        let child = map
            .entry(Value::from(head.as_str()))
            .or_insert(Value::Null);
        place(child, rest, value);
    }
}
