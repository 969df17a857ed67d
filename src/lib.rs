//! # labstor-codegen: build-time generators for LabStor
//!
//! LabStor reaches its process-wide managers through generated accessor
//! macros. This crate produces those sources, plus a few other generated
//! headers of the tree.
//!
//! ## Example: singleton accessors
//!
//! ```rust,no_run
//! use labstor_codegen::SingletonRegistry;
//!
//! let mut registry = SingletonRegistry::new();
//! registry.add(Some("labstor"), "IpcManager", "labstor/ipc_manager/ipc_manager.h")?;
//! registry.add(Some("labstor"), "ConfigurationManager", "labstor/runtime/configuration_manager.h")?;
//! registry.generate("src/singleton.cc", "include/labstor/constants/singleton_macros.h")?;
//! # Ok::<(), labstor_codegen::CodegenError>(())
//! ```
//!
//! The header then carries
//!
//! ```text
//! #include <labstor/ipc_manager/ipc_manager.h>
//! #define LABSTOR_IPC_MANAGER scs::Singleton<labstor::IpcManager>::GetInstance()
//! #define LABSTOR_IPC_MANAGER_T labstor::IpcManager*
//! ```
//!
//! ## Example: manifest
//!
//! ```yaml
//! singletons:
//!   - source: src/singleton.cc
//!     header: include/labstor/constants/singleton_macros.h
//!     entries:
//!       - namespace: labstor
//!         class: IpcManager
//!         include: labstor/ipc_manager/ipc_manager.h
//! configs:
//!   - yaml: config/labstor_client_default.yaml
//!     variable: kClientDefaultConfigStr
//!     output: include/labstor/config/config_client_default.h
//!     macro: CLIENT
//! ```

pub mod codegen;
pub mod error;

// Re-export key types
pub use codegen::{CodegenManifest, SingletonDef, SingletonRegistry, SingletonStyle};
pub use error::CodegenError;
