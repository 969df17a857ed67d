//! Core type definitions for singleton code generation.
//!
//! A [`SingletonDef`] is one declared singleton plus the names derived from it.
//! Derived names are computed once, at construction.

use crate::codegen::utils::to_snake_case;
use crate::error::{CodegenError, Result};
use serde::{Deserialize, Serialize};

/// Naming and include conventions of the generated C++
///
/// The defaults match the LabStor tree. A manifest can override any of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SingletonStyle {
    /// Prefix of every accessor macro (`LABSTOR` -> `LABSTOR_IPC_MANAGER`)
    pub macro_prefix: String,
    /// Generic singleton accessor template
    pub singleton_template: String,
    /// Header declaring the generic singleton accessor
    pub singleton_header: String,
    /// Header with project-wide macro constants, included by the translation unit
    pub macros_header: String,
}

impl Default for SingletonStyle {
    fn default() -> Self {
        Self {
            macro_prefix: "LABSTOR".to_string(),
            singleton_template: "scs::Singleton".to_string(),
            singleton_header: "labstor/util/singleton.h".to_string(),
            macros_header: "labstor/constants/macros.h".to_string(),
        }
    }
}

/// One singleton declaration with its derived names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingletonDef {
    pub namespace: Option<String>,
    pub class_name: String,
    /// Project-relative include path, stored verbatim
    pub include: String,
    /// `LABSTOR_<SNAKE>`
    pub macro_name: String,
    /// `<macro_name>_T`
    pub type_name: String,
    /// `namespace::class_name`, or just `class_name` without a namespace
    pub qualified_class_name: String,
}

impl SingletonDef {
    /// Build a definition with the default `LABSTOR` macro prefix
    pub fn new(namespace: Option<&str>, class_name: &str, include: &str) -> Result<Self> {
        Self::with_prefix(namespace, class_name, include, &SingletonStyle::default().macro_prefix)
    }

    /// Build a definition with an explicit macro prefix
    ///
    /// An empty namespace is treated the same as no namespace. An empty class
    /// name is rejected.
    pub fn with_prefix(
        namespace: Option<&str>,
        class_name: &str,
        include: &str,
        macro_prefix: &str,
    ) -> Result<Self> {
        if class_name.trim().is_empty() {
            return Err(CodegenError::InvalidIdentifier(format!(
                "singleton class name cannot be empty (include: '{}')",
                include
            )));
        }

        let namespace = namespace.filter(|ns| !ns.is_empty());
        let snake = to_snake_case(class_name).to_uppercase();
        let macro_name = format!("{}_{}", macro_prefix, snake);
        let type_name = format!("{}_T", macro_name);
        let qualified_class_name = match namespace {
            Some(ns) => format!("{}::{}", ns, class_name),
            None => class_name.to_string(),
        };

        Ok(Self {
            namespace: namespace.map(str::to_string),
            class_name: class_name.to_string(),
            include: include.to_string(),
            macro_name,
            type_name,
            qualified_class_name,
        })
    }
}
