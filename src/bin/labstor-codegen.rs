//! labstor-codegen CLI - build-time source generators for LabStor
//!
//! Generates singleton accessor macros, embedded default configs and container
//! macro headers, and maintains license preambles.

use clap::{Parser, Subcommand};
use labstor_codegen::codegen::{
    self, embed_config, expand_template, inject_preamble, run_manifest, CodegenManifest,
    MacroTemplate, PreambleOptions, SingletonRegistry, SingletonStyle,
};
use labstor_codegen::{CodegenError, SingletonDef};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labstor-codegen")]
#[command(version, about = "Build-time source generators for LabStor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every artifact declared in a manifest
    Generate {
        /// Path to the manifest
        #[arg(short, long, default_value = "labstor_codegen.yaml")]
        manifest: PathBuf,

        /// Directory relative paths resolve against (default: the manifest's directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Generate the built-in LabStor singleton sets
    Defaults {
        /// LabStor source tree root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// Generate one singleton header and translation unit from the command line
    Singletons {
        /// Singleton as `namespace::Class=include/path.h` (repeatable, order kept)
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// Generated header path
        #[arg(long)]
        header: String,

        /// Generated translation unit path (echoed to stdout when omitted)
        #[arg(long)]
        source: Option<String>,

        /// Macro prefix
        #[arg(long, default_value = "LABSTOR")]
        prefix: String,

        /// Print both files to stdout instead of writing them
        #[arg(long)]
        print: bool,
    },

    /// Embed a YAML config file into a C++ header as a string constant
    EmbedConfig {
        #[arg(long)]
        yaml: PathBuf,

        /// Name of the generated `const char*`
        #[arg(long)]
        variable: String,

        #[arg(short, long)]
        output: PathBuf,

        /// Guard infix, e.g. CLIENT or SERVER
        #[arg(long = "macro")]
        macro_name: String,
    },

    /// Expand a container template header into a parameterized macro
    ExpandMacro {
        #[arg(long)]
        template: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Name of the generated macro
        #[arg(long)]
        name: String,

        /// Placeholder tokens, in parameter order
        #[arg(long, value_delimiter = ',', required = true)]
        placeholders: Vec<String>,

        /// Include guard of the generated header
        #[arg(long)]
        guard: String,
    },

    /// Ensure every C++ source under a directory starts with the license preamble
    Preamble {
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// File extensions to process
        #[arg(long, value_delimiter = ',', default_value = "cc,h")]
        extensions: Vec<String>,

        /// File with the preamble text (default: LabStor license)
        #[arg(long)]
        text_file: Option<PathBuf>,
    },

    /// Validate a manifest without generating anything
    Validate {
        #[arg(short, long, default_value = "labstor_codegen.yaml")]
        manifest: PathBuf,
    },

    /// Print the derived names of every singleton in a manifest as JSON
    Names {
        #[arg(short, long, default_value = "labstor_codegen.yaml")]
        manifest: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { manifest, root } => generate(manifest, root),
        Commands::Defaults { root } => {
            run_manifest(&CodegenManifest::labstor_default(), &root).map(|_| ())
        }
        Commands::Singletons { entries, header, source, prefix, print } => {
            singletons(entries, header, source, prefix, print)
        }
        Commands::EmbedConfig { yaml, variable, output, macro_name } => {
            embed_config(&yaml, &variable, &output, &macro_name)
        }
        Commands::ExpandMacro { template, output, name, placeholders, guard } => expand_template(
            &template,
            &output,
            &MacroTemplate {
                macro_name: &name,
                placeholders: &placeholders,
                guard: &guard,
            },
        ),
        Commands::Preamble { root, extensions, text_file } => preamble(root, extensions, text_file),
        Commands::Validate { manifest } => validate(manifest),
        Commands::Names { manifest } => names(manifest),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn generate(manifest: PathBuf, root: Option<PathBuf>) -> Result<(), CodegenError> {
    match root {
        Some(root) => {
            let loaded = CodegenManifest::from_file(&manifest)?;
            run_manifest(&loaded, &root)?;
        }
        None => {
            codegen::generate_from_yaml(&manifest)?;
        }
    }
    Ok(())
}

/// Split `ns::Class=include` into its parts; the namespace is optional
fn parse_entry(spec: &str) -> Result<(Option<&str>, &str, &str), CodegenError> {
    let (qualified, include) = spec.split_once('=').ok_or_else(|| {
        CodegenError::Config(format!(
            "entry '{}' must look like namespace::Class=include/path.h",
            spec
        ))
    })?;
    Ok(match qualified.rsplit_once("::") {
        Some((namespace, class_name)) => (Some(namespace), class_name, include),
        None => (None, qualified, include),
    })
}

fn singletons(
    entries: Vec<String>,
    header: String,
    source: Option<String>,
    prefix: String,
    print: bool,
) -> Result<(), CodegenError> {
    let style = SingletonStyle {
        macro_prefix: prefix,
        ..SingletonStyle::default()
    };
    let mut registry = SingletonRegistry::with_style(style);
    for spec in &entries {
        let (namespace, class_name, include) = parse_entry(spec)?;
        registry.add(namespace, class_name, include)?;
    }

    if print {
        return registry.print(&header);
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // without --source the translation unit is echoed instead of written
    registry.generate_to(Path::new(""), source.as_deref(), &header, &mut handle)
}

fn preamble(
    root: PathBuf,
    extensions: Vec<String>,
    text_file: Option<PathBuf>,
) -> Result<(), CodegenError> {
    let mut options = PreambleOptions {
        extensions,
        ..PreambleOptions::default()
    };
    if let Some(text_file) = text_file {
        options.preamble = codegen::fs_utils::read_file(&text_file)?;
    }
    inject_preamble(&root, &options)?;
    Ok(())
}

fn validate(manifest: PathBuf) -> Result<(), CodegenError> {
    let loaded = CodegenManifest::from_file(&manifest)?;
    let warnings = loaded.validate()?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        "{} is valid: {} singleton sets, {} configs, {} macro templates, {} warnings",
        manifest.display(),
        loaded.singletons.len(),
        loaded.configs.len(),
        loaded.macros.len(),
        warnings.len()
    );
    Ok(())
}

/// Derived names of one singleton set, in manifest order
#[derive(Serialize)]
struct SetNames<'a> {
    source: &'a str,
    header: &'a str,
    definitions: Vec<SingletonDef>,
}

fn names_json(manifest: &CodegenManifest) -> Result<String, CodegenError> {
    let mut sets = Vec::with_capacity(manifest.singletons.len());
    for set in &manifest.singletons {
        let registry = set.to_registry(&manifest.style)?;
        sets.push(SetNames {
            source: &set.source,
            header: &set.header,
            definitions: registry.definitions().to_vec(),
        });
    }
    serde_json::to_string_pretty(&sets)
        .map_err(|e| CodegenError::Config(format!("Failed to serialize names: {}", e)))
}

fn names(manifest: PathBuf) -> Result<(), CodegenError> {
    let loaded = CodegenManifest::from_file(&manifest)?;
    println!("{}", names_json(&loaded)?);
    Ok(())
}
