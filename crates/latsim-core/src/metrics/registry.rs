use std::sync::Arc;

use crate::error::{LatSimError, Result};

/// A metric family that can render itself into the text exposition format.
pub trait Collector: Send + Sync {
    fn name(&self) -> &str;
    fn encode(&self, out: &mut String);
}

/// Owns every registered family.
///
/// Families are registered through `&mut self` while the process boots; once
/// the registry is shared (usually behind an `Arc`) the set of families is
/// frozen and only the series inside them grow.
#[derive(Default)]
pub struct Registry {
    families: Vec<Arc<dyn Collector>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Fails if a family with the same name exists.
    pub fn register<C: Collector + 'static>(&mut self, family: Arc<C>) -> Result<()> {
        if self.families.iter().any(|f| f.name() == family.name()) {
            return Err(LatSimError::DuplicateFamily(family.name().to_string()));
        }
        tracing::debug!(metric = %family.name(), "metric family registered");
        self.families.push(family);
        Ok(())
    }

    pub fn family_names(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.name()).collect()
    }

    /// Render every family, in registration order.
    pub fn export(&self) -> String {
        let mut out = String::new();
        for family in &self.families {
            family.encode(&mut out);
        }
        out
    }
}
