//! Manifest schema for labstor_codegen.yaml
//!
//! The manifest lists every generated artifact of a source tree: singleton
//! sets, embedded default configs, container macro templates and the license
//! preamble pass. Paths are relative to the manifest's root directory.

use crate::codegen::fs_utils::read_file;
use crate::codegen::preamble::PreambleOptions;
use crate::codegen::registry::SingletonRegistry;
use crate::codegen::types::SingletonStyle;
use crate::error::{CodegenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level manifest
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CodegenManifest {
    #[serde(default)]
    pub style: SingletonStyle,
    #[serde(default)]
    pub singletons: Vec<SingletonSetConfig>,
    #[serde(default)]
    pub configs: Vec<ConfigEmbedConfig>,
    #[serde(default)]
    pub macros: Vec<MacroTemplateConfig>,
    #[serde(default)]
    pub preamble: Option<PreambleConfig>,
}

/// One translation unit + header pair
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SingletonSetConfig {
    /// Generated translation unit, e.g. `src/singleton.cc`
    pub source: String,
    /// Generated header, e.g. `include/labstor/constants/singleton_macros.h`
    pub header: String,
    #[serde(default)]
    pub entries: Vec<SingletonEntry>,
}

/// One singleton declaration in a manifest
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SingletonEntry {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(rename = "class")]
    pub class_name: String,
    pub include: String,
}

/// A YAML file embedded as a C string constant
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigEmbedConfig {
    pub yaml: String,
    pub variable: String,
    pub output: String,
    #[serde(rename = "macro")]
    pub macro_name: String,
}

/// A container template expanded into a macro
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MacroTemplateConfig {
    pub template: String,
    pub output: String,
    pub name: String,
    pub placeholders: Vec<String>,
    pub guard: String,
}

/// License preamble pass
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreambleConfig {
    #[serde(default = "default_preamble_root")]
    pub root: String,
    #[serde(default = "default_preamble_extensions")]
    pub extensions: Vec<String>,
    /// File holding the preamble text; the LabStor license when absent
    #[serde(default)]
    pub text_file: Option<String>,
}

fn default_preamble_root() -> String {
    ".".to_string()
}

fn default_preamble_extensions() -> Vec<String> {
    vec!["cc".to_string(), "h".to_string()]
}

impl SingletonSetConfig {
    /// Build the registry for this set
    pub fn to_registry(&self, style: &SingletonStyle) -> Result<SingletonRegistry> {
        let mut registry = SingletonRegistry::with_style(style.clone());
        for entry in &self.entries {
            registry.add(entry.namespace.as_deref(), &entry.class_name, &entry.include)?;
        }
        Ok(registry)
    }
}

impl PreambleConfig {
    /// Resolve the preamble options, reading `text_file` relative to `root`
    pub fn to_options(&self, root: &Path) -> Result<PreambleOptions> {
        let mut options = PreambleOptions {
            extensions: self.extensions.clone(),
            ..PreambleOptions::default()
        };
        if let Some(text_file) = &self.text_file {
            options.preamble = read_file(root.join(text_file))?;
        }
        Ok(options)
    }
}

impl CodegenManifest {
    /// Load a manifest from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = read_file(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Directory that relative paths in the manifest at `path` resolve against
    pub fn root_of(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// The two singleton sets of the LabStor tree
    pub fn labstor_default() -> Self {
        fn entry(namespace: &str, class_name: &str, include: &str) -> SingletonEntry {
            SingletonEntry {
                namespace: Some(namespace.to_string()),
                class_name: class_name.to_string(),
                include: include.to_string(),
            }
        }

        Self {
            singletons: vec![
                SingletonSetConfig {
                    source: "src/singleton.cc".to_string(),
                    header: "include/labstor/constants/singleton_macros.h".to_string(),
                    entries: vec![
                        entry("labstor", "IpcManager", "labstor/ipc_manager/ipc_manager.h"),
                        entry(
                            "labstor",
                            "ConfigurationManager",
                            "labstor/runtime/configuration_manager.h",
                        ),
                    ],
                },
                SingletonSetConfig {
                    source: "src/data_structure_singleton.cc".to_string(),
                    header: "include/labstor/constants/data_structure_singleton_macros.h".to_string(),
                    entries: vec![
                        entry("labstor", "SystemInfo", "labstor/introspect/system_info.h"),
                        entry("labstor::ipc", "MemoryManager", "labstor/memory/memory_manager.h"),
                        entry("labstor", "ThreadManager", "labstor/thread/thread_manager.h"),
                    ],
                },
            ],
            ..Self::default()
        }
    }

    /// Check required fields; returns warnings that do not block generation
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.style.macro_prefix.is_empty() {
            return Err(CodegenError::Config("style.macro_prefix cannot be empty".to_string()));
        }

        for (idx, set) in self.singletons.iter().enumerate() {
            if set.source.is_empty() || set.header.is_empty() {
                return Err(CodegenError::Config(format!(
                    "singletons[{}]: source and header are required",
                    idx
                )));
            }
            let registry = set.to_registry(&self.style)?;
            if registry.is_empty() {
                warnings.push(format!("{}: no singletons declared", set.header));
            }
            for (macro_name, count) in registry.duplicate_macro_names() {
                warnings.push(format!(
                    "{}: macro {} is defined {} times",
                    set.header, macro_name, count
                ));
            }
        }

        for (idx, config) in self.configs.iter().enumerate() {
            if config.yaml.is_empty() || config.output.is_empty() {
                return Err(CodegenError::Config(format!(
                    "configs[{}]: yaml and output are required",
                    idx
                )));
            }
        }

        for (idx, template) in self.macros.iter().enumerate() {
            if template.template.is_empty() || template.output.is_empty() {
                return Err(CodegenError::Config(format!(
                    "macros[{}]: template and output are required",
                    idx
                )));
            }
        }

        Ok(warnings)
    }
}
