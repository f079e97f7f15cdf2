//! Wait-for graph between files and packages, used to reject import cycles.
//!
//! A file waits on every live package it imported; a live package waits on each of its
//! outstanding member files. Completed packages wait on nothing, so paths through them are cut.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::messages::UnitName;
use super::package_unit::PackageUnit;

#[derive(Debug, Default)]
pub(crate) struct ImportGraph {
    imports: HashMap<String, BTreeSet<String>>,
}

impl ImportGraph {
    /// Record that `file` imports `package`.
    pub fn record(&mut self, file: &str, package: &str) {
        self.imports
            .entry(file.to_string())
            .or_default()
            .insert(package.to_string());
    }

    /// Shortest wait path from `from` to `to`, both ends included.
    pub fn path(
        &self,
        from: UnitName,
        to: &UnitName,
        units: &HashMap<String, PackageUnit>,
    ) -> Option<Vec<UnitName>> {
        let mut parents: HashMap<UnitName, UnitName> = HashMap::new();
        let mut seen: HashSet<UnitName> = HashSet::from([from.clone()]);
        let mut queue = VecDeque::from([from.clone()]);

        while let Some(node) = queue.pop_front() {
            for next in self.successors(&node, units) {
                if !seen.insert(next.clone()) {
                    continue;
                }
                parents.insert(next.clone(), node.clone());
                if &next == to {
                    return Some(unwind(&parents, &from, next));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn successors(&self, node: &UnitName, units: &HashMap<String, PackageUnit>) -> Vec<UnitName> {
        let live = |name: &str| units.get(name).filter(|unit| !unit.status().is_complete());
        match node {
            UnitName::File(file) => self
                .imports
                .get(file)
                .into_iter()
                .flatten()
                .filter(|package| live(package).is_some())
                .map(|package| UnitName::Package(package.clone()))
                .collect(),
            UnitName::Package(package) => live(package)
                .map(|unit| unit.outstanding().map(|m| UnitName::File(m.clone())).collect())
                .unwrap_or_default(),
        }
    }
}

fn unwind(parents: &HashMap<UnitName, UnitName>, from: &UnitName, last: UnitName) -> Vec<UnitName> {
    let mut path = vec![last];
    while let Some(parent) = path.last().and_then(|node| parents.get(node)) {
        path.push(parent.clone());
        if parent == from {
            break;
        }
    }
    path.reverse();
    path
}

/// Package names along a wait path, in order.
pub(crate) fn packages_on(path: &[UnitName]) -> Vec<String> {
    path.iter()
        .filter_map(|node| match node {
            UnitName::Package(name) => Some(name.clone()),
            UnitName::File(_) => None,
        })
        .collect()
}
