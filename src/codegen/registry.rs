//! Ordered registry of singleton definitions and the generation entry point.
//!
//! Insertion order is preserved verbatim into both generated files.

use crate::codegen::emit::{emit_header, emit_translation_unit, render_lines};
use crate::codegen::fs_utils::{save_lines, write_lines};
use crate::codegen::types::{SingletonDef, SingletonStyle};
use crate::error::{CodegenError, Result};
use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::Path;

/// Rendered text of one singleton set, one entry per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    pub header: Vec<String>,
    pub translation_unit: Vec<String>,
}

/// Collects singleton definitions and generates the macro header and the
/// translation unit from them
#[derive(Debug, Clone, Default)]
pub struct SingletonRegistry {
    defs: Vec<SingletonDef>,
    style: SingletonStyle,
}

impl SingletonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: SingletonStyle) -> Self {
        Self {
            defs: Vec::new(),
            style,
        }
    }

    /// Append a definition
    ///
    /// Duplicates are accepted as-is; see [`SingletonRegistry::duplicate_macro_names`].
    pub fn add(&mut self, namespace: Option<&str>, class_name: &str, include: &str) -> Result<&mut Self> {
        let def = SingletonDef::with_prefix(namespace, class_name, include, &self.style.macro_prefix)?;
        self.defs.push(def);
        Ok(self)
    }

    pub fn definitions(&self) -> &[SingletonDef] {
        &self.defs
    }

    pub fn style(&self) -> &SingletonStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Render both artifacts without touching the filesystem
    ///
    /// `header_path` is the project-relative header path; it determines the
    /// include guard and the include line of the translation unit.
    pub fn render(&self, header_path: &str) -> GeneratedSources {
        GeneratedSources {
            header: render_lines(&emit_header(&self.defs, header_path, &self.style)),
            translation_unit: render_lines(&emit_translation_unit(
                &self.defs,
                header_path,
                &self.style,
            )),
        }
    }

    /// Write the header to `h_path` and the translation unit to `cc_path`
    pub fn generate(&self, cc_path: &str, h_path: &str) -> Result<()> {
        self.generate_in(Path::new(""), cc_path, h_path)
    }

    /// Like [`SingletonRegistry::generate`], with both paths relative to `root`
    pub fn generate_in(&self, root: &Path, cc_path: &str, h_path: &str) -> Result<()> {
        self.generate_to(root, Some(cc_path), h_path, &mut io::sink())
    }

    /// Write the header under `root`; write the translation unit to `cc_path`
    /// under `root`, or to `echo` when no translation unit path is given
    pub fn generate_to<W: Write>(
        &self,
        root: &Path,
        cc_path: Option<&str>,
        h_path: &str,
        echo: &mut W,
    ) -> Result<()> {
        let sources = self.render(h_path);

        let header_out = root.join(h_path);
        save_lines(&sources.header, Some(header_out.as_path()))?;
        tracing::info!(
            "Generated {} ({} singletons)",
            header_out.display(),
            self.defs.len()
        );

        match cc_path {
            Some(cc_path) => {
                let cc_out = root.join(cc_path);
                save_lines(&sources.translation_unit, Some(cc_out.as_path()))?;
                tracing::info!("Generated {}", cc_out.display());
            }
            None => write_lines(&sources.translation_unit, echo)
                .map_err(|e| CodegenError::io("<echo>", e))?,
        }

        Ok(())
    }

    /// Echo both artifacts to stdout, header first
    pub fn print(&self, h_path: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(h_path, &mut handle)
    }

    /// Write both artifacts to `out`, header first
    pub fn write_to<W: Write>(&self, h_path: &str, out: &mut W) -> Result<()> {
        let sources = self.render(h_path);
        write_lines(&sources.header, out).map_err(|e| CodegenError::io("<echo>", e))?;
        write_lines(&sources.translation_unit, out).map_err(|e| CodegenError::io("<echo>", e))
    }

    /// Macro names used by more than one definition, in first-seen order
    ///
    /// Generation never checks this; the generated header would carry
    /// conflicting `#define`s.
    pub fn duplicate_macro_names(&self) -> Vec<(String, usize)> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for def in &self.defs {
            *counts.entry(def.macro_name.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_order() {
        let mut registry = SingletonRegistry::new();
        registry
            .add(Some("labstor"), "IpcManager", "a.h")
            .unwrap()
            .add(Some("labstor"), "ConfigurationManager", "b.h")
            .unwrap();

        let names: Vec<_> = registry.definitions().iter().map(|d| d.macro_name.as_str()).collect();
        assert_eq!(names, vec!["LABSTOR_IPC_MANAGER", "LABSTOR_CONFIGURATION_MANAGER"]);
    }

    #[test]
    fn test_add_rejects_empty_class() {
        let mut registry = SingletonRegistry::new();
        assert!(registry.add(Some("labstor"), "", "a.h").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept_and_reported() {
        let mut registry = SingletonRegistry::new();
        registry.add(Some("a"), "Manager", "a.h").unwrap();
        registry.add(Some("b"), "Manager", "b.h").unwrap();
        registry.add(None, "Other", "c.h").unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.duplicate_macro_names(),
            vec![("LABSTOR_MANAGER".to_string(), 2)]
        );

        let header = registry.render("include/x.h").header;
        let defines = header.iter().filter(|l| l.starts_with("#define LABSTOR_MANAGER ")).count();
        assert_eq!(defines, 2);
    }

    #[test]
    fn test_write_to_puts_header_first() {
        let mut registry = SingletonRegistry::new();
        registry.add(Some("labstor"), "IpcManager", "labstor/ipc_manager/ipc_manager.h").unwrap();

        let mut out: Vec<u8> = Vec::new();
        registry.write_to("include/labstor/constants/singleton_macros.h", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let sources = registry.render("include/labstor/constants/singleton_macros.h");
        let expected = format!(
            "{}\n{}\n",
            sources.header.join("\n"),
            sources.translation_unit.join("\n")
        );
        assert_eq!(text, expected);
        assert!(text.starts_with("#ifndef LABSTOR_"));
        assert!(text.ends_with("::obj_ = nullptr;\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_generate_to_echoes_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("include")).unwrap();
        let mut registry = SingletonRegistry::new();
        registry.add(None, "SystemInfo", "labstor/introspect/system_info.h").unwrap();

        let mut echo: Vec<u8> = Vec::new();
        registry
            .generate_to(dir.path(), None, "include/macros.h", &mut echo)
            .unwrap();

        let header = std::fs::read_to_string(dir.path().join("include/macros.h")).unwrap();
        assert!(header.contains("#define LABSTOR_SYSTEM_INFO_T SystemInfo*\n"));
        assert_eq!(
            String::from_utf8(echo).unwrap(),
            "#include <labstor/constants/macros.h>\n\
             #include <labstor/util/singleton.h>\n\
             #include <macros.h>\n\
             \n\
             template<> std::unique_ptr<SystemInfo> scs::Singleton<SystemInfo>::obj_ = nullptr;\n"
        );
    }

    #[test]
    fn test_style_prefix_applies() {
        let style = SingletonStyle {
            macro_prefix: "HERMES".to_string(),
            ..SingletonStyle::default()
        };
        let mut registry = SingletonRegistry::with_style(style);
        registry.add(Some("hermes"), "Mdm", "hermes/mdm.h").unwrap();

        let header = registry.render("include/hermes/singletons.h").header;
        assert_eq!(header[0], "#ifndef HERMES_INCLUDE_HERMES_SINGLETONS_H_H");
        assert!(header.contains(&"#define HERMES_MDM_T hermes::Mdm*".to_string()));
    }
}
