//! Code generators for the LabStor C++ tree.
//!
//! The singleton generator is the core: a [`SingletonRegistry`] is filled with
//! `(namespace, class, include)` triples and writes a header of accessor macros
//! plus a translation unit with one storage slot per singleton. The config
//! embedder, macro expander and preamble injector are smaller build-time tools
//! driven by the same manifest.

pub mod config_embed;
pub mod emit;
pub mod fs_utils;
pub mod macro_expand;
pub mod orchestration;
pub mod preamble;
pub mod project_config;
pub mod registry;
pub mod types;
pub mod utils;

// Re-export key types
pub use config_embed::{embed_config, render_config_header};
pub use emit::{emit_header, emit_translation_unit, header_guard, render_lines, CppLine};
pub use macro_expand::{expand_template, render_macro_header, MacroTemplate};
pub use orchestration::{run_manifest, GenerationSummary};
pub use preamble::{apply_preamble, inject_preamble, PreambleOptions, PreambleReport};
pub use project_config::CodegenManifest;
pub use registry::{GeneratedSources, SingletonRegistry};
pub use types::{SingletonDef, SingletonStyle};
pub use utils::{to_camel_case, to_snake_case};

use crate::error::Result;

/// Generate everything a labstor_codegen.yaml manifest declares
///
/// Relative paths resolve against the manifest's directory.
///
/// # Example
///
/// ```rust,no_run
/// labstor_codegen::codegen::generate_from_yaml("labstor_codegen.yaml")
///     .expect("Code generation failed");
/// ```
pub fn generate_from_yaml(yaml_path: impl AsRef<std::path::Path>) -> Result<GenerationSummary> {
    let yaml_path = yaml_path.as_ref();
    tracing::info!("Loading manifest from {}", yaml_path.display());

    let manifest = CodegenManifest::from_file(yaml_path)?;
    run_manifest(&manifest, &CodegenManifest::root_of(yaml_path))
}
