//! Static graph validation.
//!
//! Walks the declared dependency edges of every provider visible from a
//! container, without materializing anything, and reports missing
//! identifiers and declared cycles before the first resolution hits them.
//! Queued providers count as visible here; validation answers for the
//! post-flush graph.

use std::collections::HashMap;

use crate::container::Container;
use crate::key::Key;
use crate::provider::ProviderKind;

/// Outcome of a [`validate`](Container::validate) pass.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that would surface as resolution errors.
    pub errors: Vec<String>,
    /// Findings that cannot be checked statically.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Whether validation found no errors. Warnings do not fail validation.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

impl Container {
    /// Statically checks the declared dependency graph visible from this
    /// container.
    ///
    /// Reports missing dependencies and cycles among declared edges as
    /// errors, and providers whose dependencies are opaque (raw providers
    /// resolve through their own get function) as warnings. Handle-typed
    /// dependencies are checked for existence but do not form cycle edges,
    /// since taking a handle materializes nothing.
    ///
    /// ```rust
    /// use wirecore::{Container, FactoryOptions, asset};
    ///
    /// let core = Container::new();
    /// core.factory("a", FactoryOptions::new().inject(["missing"]), |_| {
    ///     Ok(asset(()))
    /// })
    /// .unwrap();
    ///
    /// let report = core.validate();
    /// assert!(!report.is_ok());
    /// ```
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Nearest registration wins, exactly like lookup.
        let mut graph: HashMap<String, Vec<Key>> = HashMap::new();
        let mut host = Some(self.clone());
        while let Some(core) = host {
            // Queued records first: they carry the real dependency lists for
            // this container's claimed slots.
            for record in core.inner.provider_queue.borrow().iter() {
                if !graph.contains_key(record.id()) {
                    graph.insert(record.id().to_string(), record.deps().to_vec());
                }
            }
            for (id, slot) in core.inner.registry.borrow().iter() {
                if graph.contains_key(id) {
                    continue;
                }
                match slot {
                    Some(record) => {
                        if record.kind() == ProviderKind::Custom && id != "injector" {
                            result.warnings.push(format!(
                                "\"{}\" is a raw provider; its dependencies cannot be checked",
                                id
                            ));
                        }
                        graph.insert(id.to_string(), record.deps().to_vec());
                    }
                    None => {
                        graph.insert(id.to_string(), Vec::new());
                    }
                }
            }
            host = core.parent();
        }

        for (id, deps) in &graph {
            for key in deps {
                if !graph.contains_key(key.id()) {
                    result.errors.push(format!(
                        "dependency \"{}\" of \"{}\" not found",
                        key.id(),
                        id
                    ));
                }
            }
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut ids: Vec<&str> = graph.keys().map(String::as_str).collect();
        ids.sort_unstable();
        for id in ids {
            let mut path = Vec::new();
            visit(id, &graph, &mut marks, &mut path, &mut result.errors);
        }

        result
    }
}

fn visit<'a>(
    id: &'a str,
    graph: &'a HashMap<String, Vec<Key>>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    errors: &mut Vec<String>,
) {
    match marks.get(id) {
        Some(Mark::Done) => return,
        Some(Mark::Visiting) => {
            let start = path.iter().position(|p| *p == id).unwrap_or(0);
            let mut cycle: Vec<&str> = path[start..].to_vec();
            cycle.push(id);
            errors.push(format!("cyclic dependency \"{}\"", cycle.join(" -> ")));
            return;
        }
        None => {}
    }
    let Some((key, deps)) = graph.get_key_value(id) else {
        return;
    };
    marks.insert(key.as_str(), Mark::Visiting);
    path.push(key.as_str());
    for dep in deps {
        // Handle-typed deps are not materialization edges.
        if !dep.wants_provider() {
            visit_key(dep.id(), graph, marks, path, errors);
        }
    }
    path.pop();
    marks.insert(key.as_str(), Mark::Done);
}

fn visit_key<'a>(
    id: &str,
    graph: &'a HashMap<String, Vec<Key>>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    errors: &mut Vec<String>,
) {
    if let Some((key, _)) = graph.get_key_value(id) {
        visit(key.as_str(), graph, marks, path, errors);
    }
}
