//! The merged content registry and its lifecycle.
//!
//! A registry is built once per load session by sequential [`merge`] calls in
//! resolved order, validated, frozen, and handed to the engine read-only.
//! Switching the active pack set builds a fresh registry and swaps the
//! reference; a frozen registry is never mutated in place.
//!
//! [`merge`]: ContentRegistry::merge

use std::collections::BTreeMap;

use crate::domain::{ContentDescriptor, ContentDomain, ContentRef};
use crate::error::RegistryError;

/// Lifecycle of a registry.
///
/// `Building` accepts merges, `Validating` runs the referential pass,
/// `Frozen` answers queries, `Failed` is terminal with diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RegistryState {
    Building,
    Validating,
    Frozen,
    Failed,
}

/// The queryable store of every typed definition contributed by the resolved
/// pack set, keyed by `(domain, id)`.
#[derive(Debug)]
pub struct ContentRegistry {
    state: RegistryState,
    domains: BTreeMap<ContentDomain, BTreeMap<String, ContentDescriptor>>,
    merged_packs: Vec<String>,
    failure: Option<RegistryError>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self {
            state: RegistryState::Building,
            domains: BTreeMap::new(),
            merged_packs: Vec::new(),
            failure: None,
        }
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// The diagnostic that moved the registry to `Failed`, if any.
    pub fn failure(&self) -> Option<&RegistryError> {
        self.failure.as_ref()
    }

    /// Pack ids merged so far, in merge order.
    pub fn merged_packs(&self) -> &[String] {
        &self.merged_packs
    }

    /// Merges one pack's descriptors for one domain.
    ///
    /// Ids must be globally unique within a domain; a collision is a hard
    /// error, never a silent override or auto-rename, and moves the registry
    /// to `Failed`.
    pub fn merge(
        &mut self,
        pack_id: &str,
        domain: ContentDomain,
        descriptors: Vec<ContentDescriptor>,
    ) -> Result<(), RegistryError> {
        if self.state != RegistryState::Building {
            return Err(RegistryError::NotBuilding { state: self.state });
        }

        let entries = self.domains.entry(domain).or_default();
        for descriptor in descriptors {
            debug_assert_eq!(descriptor.domain, domain);
            debug_assert_eq!(descriptor.pack_id, pack_id);
            if let Some(existing) = entries.get(&descriptor.id) {
                let err = RegistryError::DuplicateContentId {
                    domain,
                    id: descriptor.id.clone(),
                    first_owner: existing.pack_id.clone(),
                    second_owner: pack_id.to_string(),
                };
                tracing::error!(%err, "registry merge failed");
                self.fail(err.clone());
                return Err(err);
            }
            entries.insert(descriptor.id.clone(), descriptor);
        }

        if self.merged_packs.last().map(String::as_str) != Some(pack_id) {
            self.merged_packs.push(pack_id.to_string());
        }
        Ok(())
    }

    /// Merges a full pack, grouping descriptors by their domain tag.
    pub fn merge_pack(
        &mut self,
        pack_id: &str,
        descriptors: Vec<ContentDescriptor>,
    ) -> Result<(), RegistryError> {
        let mut by_domain: BTreeMap<ContentDomain, Vec<ContentDescriptor>> = BTreeMap::new();
        for descriptor in descriptors {
            by_domain.entry(descriptor.domain).or_default().push(descriptor);
        }
        for (domain, batch) in by_domain {
            self.merge(pack_id, domain, batch)?;
        }
        Ok(())
    }

    /// Runs the referential-integrity pass and freezes the registry.
    ///
    /// Every cross-domain reference embedded in any merged record must
    /// resolve to an existing descriptor in the target domain. The first
    /// dangling reference fails the whole registry.
    pub fn finalize(&mut self) -> Result<(), RegistryError> {
        if self.state != RegistryState::Building {
            return Err(RegistryError::NotBuilding { state: self.state });
        }
        self.state = RegistryState::Validating;

        for entries in self.domains.values() {
            for descriptor in entries.values() {
                for reference in descriptor.record.references() {
                    if !self.contains(&reference) {
                        let err = RegistryError::DanglingReference {
                            domain: descriptor.domain,
                            id: descriptor.id.clone(),
                            referenced_domain: reference.domain,
                            referenced_id: reference.id,
                        };
                        tracing::error!(%err, "referential integrity pass failed");
                        self.fail(err.clone());
                        return Err(err);
                    }
                }
            }
        }

        self.state = RegistryState::Frozen;
        tracing::info!(
            packs = self.merged_packs.len(),
            records = self.domains.values().map(BTreeMap::len).sum::<usize>(),
            "content registry frozen"
        );
        Ok(())
    }

    /// The only read path exposed to the engine. Answers only once frozen.
    pub fn lookup(&self, domain: ContentDomain, id: &str) -> Option<&ContentDescriptor> {
        if self.state != RegistryState::Frozen {
            return None;
        }
        self.domains.get(&domain)?.get(id)
    }

    /// Number of records in a domain (any state, used for reporting).
    pub fn domain_len(&self, domain: ContentDomain) -> usize {
        self.domains.get(&domain).map_or(0, BTreeMap::len)
    }

    /// Iterates a frozen domain's descriptors in id order.
    pub fn iter_domain(
        &self,
        domain: ContentDomain,
    ) -> impl Iterator<Item = &ContentDescriptor> + '_ {
        self.domains
            .get(&domain)
            .filter(|_| self.state == RegistryState::Frozen)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    fn contains(&self, reference: &ContentRef) -> bool {
        self.domains
            .get(&reference.domain)
            .is_some_and(|entries| entries.contains_key(&reference.id))
    }

    fn fail(&mut self, err: RegistryError) {
        self.state = RegistryState::Failed;
        self.failure = Some(err);
    }
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
