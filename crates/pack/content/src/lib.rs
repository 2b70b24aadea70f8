//! Authoring-side pack tooling: manifest parsing, JSON domain loaders, and
//! the JSON-to-binary content compiler.
//!
//! This crate is the expensive half of the two-tier pipeline. Everything that
//! can be validated without the full resolved pack set is validated here at
//! build time; the runtime loader consumes the compiled artifacts this crate
//! produces and stays fast and fail-fast.

pub mod artifact;
pub mod compiler;
pub mod loaders;

pub use artifact::{
    ARTIFACT_FILE_NAME, ARTIFACT_FORMAT_VERSION, ARTIFACT_MAGIC, ArtifactHeader, PackArtifact,
    SectionData, SectionEntry, encode_artifact,
};
pub use compiler::{CompileError, CompiledPack, ContentCompiler};
pub use loaders::{LoadResult, ManifestParser, manifest::MANIFEST_FILE_NAME, parse_domain};
