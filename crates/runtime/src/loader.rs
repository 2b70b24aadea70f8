//! Load-session orchestration.
//!
//! One [`PackLoader::load`] call drives a full session: parse and validate
//! every discovered manifest, resolve the load order, decode artifacts on a
//! bounded worker pool, merge strictly in resolved order, and freeze the
//! registry. Any fatal error aborts the session; the caller never sees a
//! partially built registry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};

use pack_core::{
    ContentDescriptor, ContentDomain, ContentRegistry, DependencyResolver, PackLoadError,
    PackManifest, RegistryError,
};
use pack_content::ManifestParser;

use crate::config::LoadOptions;
use crate::discovery::{PackCandidate, discover_packs};
use crate::reader::BinaryPackReader;
use crate::report::LoadReport;
use crate::workers::MergeSequencer;

/// A successfully loaded session: the frozen registry plus any warnings
/// gathered along the way.
#[derive(Debug)]
pub struct LoadedContent {
    pub registry: Arc<ContentRegistry>,
    pub report: LoadReport,
}

/// Drives content loading for one pack set.
pub struct PackLoader {
    options: LoadOptions,
}

impl PackLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Discovers packs under `packs_dir` and loads them.
    pub async fn load_dir(&self, packs_dir: &Path) -> Result<LoadedContent, LoadReport> {
        let candidates = match discover_packs(packs_dir) {
            Ok(candidates) => candidates,
            Err(err) => {
                let mut report = LoadReport::new();
                report.push_error(None, err);
                return Err(report);
            }
        };
        self.load(candidates).await
    }

    /// Loads an explicit candidate set.
    ///
    /// On failure the returned report carries every diagnostic gathered
    /// before the abort, one entry per failing pack where attributable.
    pub async fn load(&self, candidates: Vec<PackCandidate>) -> Result<LoadedContent, LoadReport> {
        let mut report = LoadReport::new();

        // Parse and validate every manifest before deciding anything, so the
        // report names all broken packs at once instead of the first.
        let mut parsed: Vec<(PackCandidate, PackManifest)> = Vec::new();
        for candidate in candidates {
            match ManifestParser::parse_file(&candidate.manifest_path) {
                Ok(manifest) => {
                    report.push_issues(ManifestParser::validate(&manifest));
                    parsed.push((candidate, manifest));
                }
                Err(err) => report.push_error(pack_hint(&candidate), err.into()),
            }
        }
        if report.is_fatal() {
            return Err(report);
        }

        let manifests: Vec<PackManifest> = parsed.iter().map(|(_, m)| m.clone()).collect();
        let order = match DependencyResolver::resolve(&manifests, &self.options.host) {
            Ok(order) => order,
            Err(err) => {
                report.push_error(None, err.into());
                return Err(report);
            }
        };

        let artifact_paths: BTreeMap<String, PathBuf> = parsed
            .iter()
            .map(|(candidate, manifest)| {
                (manifest.pack_id.clone(), candidate.artifact_path.clone())
            })
            .collect();

        match self.decode_and_merge(&order, &artifact_paths).await {
            Ok(registry) => Ok(LoadedContent {
                registry: Arc::new(registry),
                report,
            }),
            Err((pack_id, err)) => {
                report.push_error(pack_id, err);
                Err(report)
            }
        }
    }

    /// Bounded parallel decode with ordered fan-in into the sequential merge.
    async fn decode_and_merge(
        &self,
        order: &[PackManifest],
        artifact_paths: &BTreeMap<String, PathBuf>,
    ) -> Result<ContentRegistry, (Option<String>, PackLoadError)> {
        type DecodeResult = Result<Vec<ContentDescriptor>, PackLoadError>;

        let semaphore = Arc::new(Semaphore::new(self.options.max_decode_workers));
        let (tx, mut rx) = mpsc::channel::<(usize, DecodeResult)>(order.len().max(1));

        for (position, manifest) in order.iter().enumerate() {
            let path = artifact_paths[&manifest.pack_id].clone();
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = tokio::task::spawn_blocking(move || BinaryPackReader::read(&path))
                    .await
                    .unwrap_or_else(|e| {
                        Err(PackLoadError::Io(format!("decode task failed: {e}")))
                    });
                // The receiver drops early when another pack already failed.
                let _ = tx.send((position, result)).await;
            });
        }
        drop(tx);

        let mut sequencer = MergeSequencer::new(order.len());
        let mut registry = ContentRegistry::new();

        while let Some((position, result)) = rx.recv().await {
            let batch = match result {
                Ok(batch) => batch,
                Err(err) => return Err((Some(order[position].pack_id.clone()), err)),
            };
            for (ready, descriptors) in sequencer.accept(position, batch) {
                let owner = order[ready].pack_id.as_str();
                tracing::debug!(position = ready, pack_id = owner, "merging pack");
                registry
                    .merge_pack(owner, descriptors)
                    .map_err(|e| (Some(owner.to_string()), PackLoadError::from(e)))?;
            }
        }
        debug_assert!(sequencer.is_drained());

        registry
            .finalize()
            .map_err(|e| (None, PackLoadError::from(e)))?;

        // Entry points come from manifests, not records, so they are checked
        // here against the frozen registry.
        for manifest in order {
            let entries = [
                (ContentDomain::Regions, &manifest.entry_region_id),
                (ContentDomain::Quests, &manifest.entry_quest_id),
            ];
            for (domain, entry) in entries {
                if let Some(id) = entry
                    && registry.lookup(domain, id).is_none()
                {
                    return Err((
                        Some(manifest.pack_id.clone()),
                        RegistryError::MissingEntryPoint {
                            pack_id: manifest.pack_id.clone(),
                            referenced_domain: domain,
                            referenced_id: id.clone(),
                        }
                        .into(),
                    ));
                }
            }
        }

        tracing::info!(packs = order.len(), "load session complete");
        Ok(registry)
    }
}

fn pack_hint(candidate: &PackCandidate) -> Option<String> {
    candidate
        .root
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
