// Tue Jan 13 2026 - Alex

pub mod binary;
pub mod error;
pub mod manifest;
pub mod module;
pub mod traits;

pub use binary::BinaryInspector;
pub use error::LoadFault;
pub use manifest::TypeManifest;
pub use module::{ExportedType, InspectedModule, TypeKind, Visibility};
pub use traits::ModuleInspector;
