//! Header and translation unit emitters.
//!
//! Emission is split in two steps: the emitters turn an ordered list of
//! [`SingletonDef`]s into typed [`CppLine`] records, and [`render_lines`]
//! formats those records into text. Naming stays in `types`, layout stays here.

use crate::codegen::types::{SingletonDef, SingletonStyle};
use crate::codegen::utils::to_snake_case;
use std::fmt;

/// One line of generated C++
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CppLine {
    /// `#ifndef <guard>`
    IfNdef(String),
    /// `#define <name>` or `#define <name> <value>`
    Define { name: String, value: Option<String> },
    /// `#include <path>`
    Include(String),
    /// Zero-initialized owning storage slot for one singleton
    SingletonSlot { template: String, class: String },
    /// `#endif  // <comment>`
    EndIf(String),
    Blank,
}

impl fmt::Display for CppLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CppLine::IfNdef(guard) => write!(f, "#ifndef {}", guard),
            CppLine::Define { name, value: Some(value) } => write!(f, "#define {} {}", name, value),
            CppLine::Define { name, value: None } => write!(f, "#define {}", name),
            CppLine::Include(path) => write!(f, "#include <{}>", path),
            CppLine::SingletonSlot { template, class } => write!(
                f,
                "template<> std::unique_ptr<{class}> {template}<{class}>::obj_ = nullptr;",
                class = class,
                template = template
            ),
            CppLine::EndIf(comment) => write!(f, "#endif  // {}", comment),
            CppLine::Blank => Ok(()),
        }
    }
}

/// Render records to one text line each
pub fn render_lines(lines: &[CppLine]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

/// Guard token of a header path, without the prefix and `_H` suffix
///
/// `include/labstor/constants/singleton_macros.h` ->
/// `INCLUDE_LABSTOR_CONSTANTS_SINGLETON_MACROS_H`
pub fn header_guard(header_path: &str) -> String {
    to_snake_case(header_path)
        .replace(['/', '\\'], "_")
        .to_uppercase()
}

/// Path under which other sources include the generated header
///
/// Everything up to and including the last `include` directory is dropped.
pub fn header_include_path(header_path: &str) -> String {
    let normalized = header_path.replace('\\', "/");
    let components: Vec<&str> = normalized.split('/').collect();
    match components.iter().rposition(|c| *c == "include") {
        Some(pos) if pos + 1 < components.len() => components[pos + 1..].join("/"),
        _ => normalized,
    }
}

/// Emit the accessor-macro header
pub fn emit_header(defs: &[SingletonDef], header_path: &str, style: &SingletonStyle) -> Vec<CppLine> {
    let guard = header_guard(header_path);
    let guard_macro = format!("{}_{}_H", style.macro_prefix, guard);

    let mut lines = vec![
        CppLine::IfNdef(guard_macro.clone()),
        CppLine::Define { name: guard_macro, value: None },
        CppLine::Blank,
        CppLine::Include(style.singleton_header.clone()),
        CppLine::Blank,
    ];

    for def in defs {
        lines.push(CppLine::Include(def.include.clone()));
        lines.push(CppLine::Define {
            name: def.macro_name.clone(),
            value: Some(format!(
                "{}<{}>::GetInstance()",
                style.singleton_template, def.qualified_class_name
            )),
        });
        lines.push(CppLine::Define {
            name: def.type_name.clone(),
            value: Some(format!("{}*", def.qualified_class_name)),
        });
        lines.push(CppLine::Blank);
    }

    lines.push(CppLine::EndIf(guard));
    lines
}

/// Emit the translation unit holding one storage slot per singleton
pub fn emit_translation_unit(
    defs: &[SingletonDef],
    header_path: &str,
    style: &SingletonStyle,
) -> Vec<CppLine> {
    let mut lines = vec![
        CppLine::Include(style.macros_header.clone()),
        CppLine::Include(style.singleton_header.clone()),
        CppLine::Include(header_include_path(header_path)),
        CppLine::Blank,
    ];

    lines.extend(defs.iter().map(|def| CppLine::SingletonSlot {
        template: style.singleton_template.clone(),
        class: def.qualified_class_name.clone(),
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "include/labstor/constants/singleton_macros.h";

    fn ipc() -> SingletonDef {
        SingletonDef::new(Some("labstor"), "IpcManager", "labstor/ipc_manager/ipc_manager.h").unwrap()
    }

    #[test]
    fn test_header_guard() {
        let guard = header_guard(HEADER);
        assert_eq!(guard, "INCLUDE_LABSTOR_CONSTANTS_SINGLETON_MACROS_H");
        assert!(guard.contains("SINGLETON_MACROS"));
    }

    #[test]
    fn test_header_include_path() {
        assert_eq!(header_include_path(HEADER), "labstor/constants/singleton_macros.h");
        assert_eq!(
            header_include_path("/home/u/labstor/include/labstor/x.h"),
            "labstor/x.h"
        );
        assert_eq!(header_include_path("gen/macros.h"), "gen/macros.h");
    }

    #[test]
    fn test_render_slot() {
        let line = CppLine::SingletonSlot {
            template: "scs::Singleton".to_string(),
            class: "labstor::IpcManager".to_string(),
        };
        assert_eq!(
            line.to_string(),
            "template<> std::unique_ptr<labstor::IpcManager> scs::Singleton<labstor::IpcManager>::obj_ = nullptr;"
        );
    }

    #[test]
    fn test_header_layout() {
        let lines = render_lines(&emit_header(&[ipc()], HEADER, &SingletonStyle::default()));
        assert_eq!(
            lines,
            vec![
                "#ifndef LABSTOR_INCLUDE_LABSTOR_CONSTANTS_SINGLETON_MACROS_H_H",
                "#define LABSTOR_INCLUDE_LABSTOR_CONSTANTS_SINGLETON_MACROS_H_H",
                "",
                "#include <labstor/util/singleton.h>",
                "",
                "#include <labstor/ipc_manager/ipc_manager.h>",
                "#define LABSTOR_IPC_MANAGER scs::Singleton<labstor::IpcManager>::GetInstance()",
                "#define LABSTOR_IPC_MANAGER_T labstor::IpcManager*",
                "",
                "#endif  // INCLUDE_LABSTOR_CONSTANTS_SINGLETON_MACROS_H",
            ]
        );
    }

    #[test]
    fn test_translation_unit_layout() {
        let lines = render_lines(&emit_translation_unit(&[ipc()], HEADER, &SingletonStyle::default()));
        assert_eq!(
            lines,
            vec![
                "#include <labstor/constants/macros.h>",
                "#include <labstor/util/singleton.h>",
                "#include <labstor/constants/singleton_macros.h>",
                "",
                "template<> std::unique_ptr<labstor::IpcManager> scs::Singleton<labstor::IpcManager>::obj_ = nullptr;",
            ]
        );
    }

    #[test]
    fn test_empty_definitions() {
        let style = SingletonStyle::default();
        let header = emit_header(&[], HEADER, &style);
        assert_eq!(header.len(), 6);
        assert!(matches!(header.first(), Some(CppLine::IfNdef(_))));
        assert!(matches!(header.last(), Some(CppLine::EndIf(_))));

        let tu = emit_translation_unit(&[], HEADER, &style);
        assert!(tu.iter().all(|l| matches!(l, CppLine::Include(_) | CppLine::Blank)));
    }
}
