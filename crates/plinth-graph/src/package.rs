use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{GraphError, Result};
use crate::target::BuildTarget;

/// Targets declared by one build definition file.
///
/// The package only groups targets; identity and linking are owned by
/// [`crate::BuildGraph`].
pub struct Package {
    pub name: String,
    targets: RwLock<IndexMap<String, Arc<BuildTarget>>>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: RwLock::new(IndexMap::new()),
        }
    }

    /// Add a target declared in this package.
    ///
    /// Fails if the package already holds a target with the same name.
    pub fn add_target(&self, target: Arc<BuildTarget>) -> Result<()> {
        let mut targets = self.targets.write();
        let name = target.label.name().to_string();
        if targets.contains_key(&name) {
            return Err(GraphError::DuplicateTarget {
                label: target.label.clone(),
            });
        }
        targets.insert(name, target);
        Ok(())
    }

    /// Look up a target by its name within the package.
    pub fn target(&self, name: &str) -> Option<Arc<BuildTarget>> {
        self.targets.read().get(name).cloned()
    }

    /// All targets in the package, sorted by name.
    pub fn all_targets(&self) -> Vec<Arc<BuildTarget>> {
        let mut targets: Vec<_> = self.targets.read().values().cloned().collect();
        targets.sort_by(|a, b| a.label.name().cmp(b.label.name()));
        targets
    }

    pub fn len(&self) -> usize {
        self.targets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.read().is_empty()
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("targets", &self.targets.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
