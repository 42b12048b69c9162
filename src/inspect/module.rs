// Tue Jan 15 2026 - Alex

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// A type declared by an inspected module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedType {
    /// Fully qualified type name
    pub name: String,
    pub kind: TypeKind,
    /// Abstract classes cannot satisfy an assignability requirement on their own
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub visibility: Visibility,
    /// Direct base class, if any
    #[serde(default)]
    pub base: Option<String>,
    /// Directly implemented interfaces
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl ExportedType {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: TypeKind::Class,
            is_abstract: false,
            visibility: Visibility::Public,
            base: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(name: &str) -> Self {
        Self {
            kind: TypeKind::Interface,
            is_abstract: true,
            ..Self::class(name)
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn as_internal(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    pub fn is_exported(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_concrete(&self) -> bool {
        self.kind != TypeKind::Interface && !self.is_abstract
    }

    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.base
            .iter()
            .map(String::as_str)
            .chain(self.interfaces.iter().map(String::as_str))
    }
}

enum ModuleImage {
    Mapped(Mmap),
    Detached,
}

/// Non-executing view of a candidate's exported types.
///
/// The handle owns whatever backs the inspection (for binaries, the
/// memory map) and gives it back when dropped.
pub struct InspectedModule {
    path: PathBuf,
    name: String,
    types: Vec<ExportedType>,
    index: HashMap<String, usize>,
    image: ModuleImage,
    release_hook: Option<Box<dyn FnOnce() + Send>>,
}

impl InspectedModule {
    pub fn new(path: &Path, name: &str, types: Vec<ExportedType>) -> Self {
        let index = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        Self {
            path: path.to_path_buf(),
            name: name.to_string(),
            types,
            index,
            image: ModuleImage::Detached,
            release_hook: None,
        }
    }

    pub fn with_image(mut self, mmap: Mmap) -> Self {
        self.image = ModuleImage::Mapped(mmap);
        self
    }

    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.release_hook = Some(Box::new(hook));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[ExportedType] {
        &self.types
    }

    pub fn exported_types(&self) -> impl Iterator<Item = &ExportedType> {
        self.types.iter().filter(|t| t.is_exported())
    }

    pub fn find_type(&self, name: &str) -> Option<&ExportedType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn image_bytes(&self) -> Option<&[u8]> {
        match &self.image {
            ModuleImage::Mapped(mmap) => Some(mmap.as_ref()),
            ModuleImage::Detached => None,
        }
    }

    /// Walks base classes and interfaces declared inside this module.
    /// Supertypes defined elsewhere are matched by name only.
    pub fn is_assignable_to(&self, ty: &ExportedType, target: &str) -> bool {
        if ty.name == target {
            return true;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = ty.supertypes().collect();

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(parent) = self.find_type(current) {
                queue.extend(parent.supertypes());
            }
        }

        false
    }

    pub fn concrete_types_assignable_to<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = &'a ExportedType> + 'a {
        self.exported_types()
            .filter(|t| t.is_concrete())
            .filter(move |t| self.is_assignable_to(t, target))
    }
}

impl fmt::Debug for InspectedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectedModule")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("types", &self.types.len())
            .field("mapped", &matches!(self.image, ModuleImage::Mapped(_)))
            .finish()
    }
}

impl Drop for InspectedModule {
    fn drop(&mut self) {
        log::trace!("Releasing inspection handle for {}", self.path.display());
        if let Some(hook) = self.release_hook.take() {
            hook();
        }
    }
}
