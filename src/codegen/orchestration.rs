//! Runs every generator a manifest declares.

use crate::codegen::config_embed::embed_config;
use crate::codegen::macro_expand::{expand_template, MacroTemplate};
use crate::codegen::preamble::{inject_preamble, PreambleReport};
use crate::codegen::project_config::CodegenManifest;
use crate::error::Result;
use std::path::Path;

/// Summary of one manifest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub singleton_sets: usize,
    pub singletons: usize,
    pub configs: usize,
    pub macros: usize,
    pub preamble: Option<PreambleReport>,
}

/// Generate all artifacts of `manifest`, resolving paths against `root`
///
/// Order: singleton sets, embedded configs, macro templates, preamble pass.
/// The first failure aborts the run; files written before it are left as-is.
pub fn run_manifest(manifest: &CodegenManifest, root: &Path) -> Result<GenerationSummary> {
    for warning in manifest.validate()? {
        tracing::warn!("{}", warning);
    }

    let mut summary = GenerationSummary::default();

    for set in &manifest.singletons {
        let registry = set.to_registry(&manifest.style)?;
        registry.generate_in(root, &set.source, &set.header)?;
        summary.singleton_sets += 1;
        summary.singletons += registry.len();
    }

    for config in &manifest.configs {
        embed_config(
            &root.join(&config.yaml),
            &config.variable,
            &root.join(&config.output),
            &config.macro_name,
        )?;
        summary.configs += 1;
    }

    for template in &manifest.macros {
        expand_template(
            &root.join(&template.template),
            &root.join(&template.output),
            &MacroTemplate {
                macro_name: &template.name,
                placeholders: &template.placeholders,
                guard: &template.guard,
            },
        )?;
        summary.macros += 1;
    }

    if let Some(preamble) = &manifest.preamble {
        let options = preamble.to_options(root)?;
        summary.preamble = Some(inject_preamble(&root.join(&preamble.root), &options)?);
    }

    tracing::info!(
        "Generated {} singleton sets ({} singletons), {} configs, {} macro headers",
        summary.singleton_sets,
        summary.singletons,
        summary.configs,
        summary.macros
    );
    Ok(summary)
}
