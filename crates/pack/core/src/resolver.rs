//! Dependency resolution: load-order computation and compatibility gating.
//!
//! Given every manifest discovered in one load session, the resolver produces
//! a deterministic, cycle-free, dependency-respecting order and gates each
//! pack against the host engine version and capability set. The order is a
//! pure function of the input set: same packs and versions in, same order
//! out, on every platform and every run.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::{CompatibilityError, DependencyError, ResolveError};
use crate::manifest::PackManifest;
use crate::version::SemanticVersion;

/// Host-side facts the resolver gates against: the engine's version and the
/// capability tokens its rules engine declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostContext {
    pub engine_version: SemanticVersion,
    pub capabilities: BTreeSet<String>,
}

impl HostContext {
    pub fn new(engine_version: SemanticVersion) -> Self {
        Self {
            engine_version,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }
}

/// Computes the resolved load order for a set of discovered manifests.
pub struct DependencyResolver;

impl DependencyResolver {
    /// Orders `manifests` so every dependency strictly precedes its
    /// dependents, then gates each pack against `host`.
    ///
    /// Ties among simultaneously-ready packs break by ascending pack id.
    /// That tie-break is a hard determinism guarantee, not a nicety: merge
    /// errors downstream depend on the order being reproducible.
    pub fn resolve(
        manifests: &[PackManifest],
        host: &HostContext,
    ) -> Result<Vec<PackManifest>, ResolveError> {
        let mut by_id: BTreeMap<&str, &PackManifest> = BTreeMap::new();
        for manifest in manifests {
            if by_id.insert(manifest.pack_id.as_str(), manifest).is_some() {
                return Err(DependencyError::DuplicatePackId {
                    pack_id: manifest.pack_id.clone(),
                }
                .into());
            }
        }

        // Edge dependency -> dependent. Iterating the id-sorted map keeps
        // edge construction (and thus error order) input-order independent.
        let mut in_degree: BTreeMap<&str, usize> =
            by_id.keys().map(|&id| (id, 0usize)).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (&id, manifest) in &by_id {
            for dependency in &manifest.dependencies {
                let Some(target) = by_id.get(dependency.pack_id.as_str()) else {
                    return Err(DependencyError::DependencyNotFound {
                        pack_id: id.to_string(),
                        dependency_id: dependency.pack_id.clone(),
                    }
                    .into());
                };
                if !dependency.range.satisfies(target.version) {
                    return Err(DependencyError::DependencyVersionMismatch {
                        pack_id: id.to_string(),
                        dependency_id: dependency.pack_id.clone(),
                        required: dependency.range,
                        actual: target.version,
                    }
                    .into());
                }
                dependents
                    .entry(dependency.pack_id.as_str())
                    .or_default()
                    .push(id);
                *in_degree.get_mut(id).expect("node registered above") += 1;
            }
        }

        // Kahn's algorithm. The ready set is a BTreeSet so the smallest
        // pack id always leaves first.
        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut order: Vec<&str> = Vec::with_capacity(by_id.len());
        let mut pending: VecDeque<&str> = VecDeque::new();

        while let Some(id) = ready.pop_first() {
            order.push(id);
            pending.extend(dependents.get(id).into_iter().flatten().copied());
            while let Some(dependent) = pending.pop_front() {
                let degree = in_degree
                    .get_mut(dependent)
                    .expect("dependent registered above");
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != by_id.len() {
            let sorted: BTreeSet<&str> = order.iter().copied().collect();
            let members: Vec<String> = by_id
                .keys()
                .filter(|id| !sorted.contains(*id))
                .map(|id| id.to_string())
                .collect();
            return Err(DependencyError::DependencyCycle { members }.into());
        }

        // Gates run in resolved order so every pack's dependencies are
        // already known good when it is checked.
        for &id in &order {
            let manifest = by_id[id];
            if !manifest.is_compatible_with_engine(host.engine_version) {
                return Err(CompatibilityError::IncompatibleCoreVersion {
                    pack_id: id.to_string(),
                    required: manifest.core_version_range(),
                    actual: host.engine_version,
                }
                .into());
            }
            for capability in &manifest.required_capabilities {
                if !host.capabilities.contains(capability) {
                    return Err(CompatibilityError::MissingCapability {
                        pack_id: id.to_string(),
                        capability: capability.clone(),
                    }
                    .into());
                }
            }
        }

        tracing::debug!(?order, "resolved pack load order");

        Ok(order.into_iter().map(|id| by_id[id].clone()).collect())
    }
}
