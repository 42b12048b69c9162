// Tue Jan 13 2026 - Alex

use crate::inspect::{InspectedModule, LoadFault, ModuleInspector, TypeManifest};
use goblin::elf::section_header::SHT_NOBITS;
use goblin::mach::Mach;
use goblin::Object;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

pub const ELF_MANIFEST_SECTION: &str = ".modtype";
pub const PE_MANIFEST_SECTION: &str = ".modtype";
pub const MACHO_MANIFEST_SECTION: &str = "__modtype";

/// Reads the type manifest straight out of ELF, PE and Mach-O containers.
pub struct BinaryInspector {
    check_dependencies: bool,
}

impl BinaryInspector {
    pub fn new() -> Self {
        Self {
            check_dependencies: true,
        }
    }

    pub fn with_dependency_check(mut self, enabled: bool) -> Self {
        self.check_dependencies = enabled;
        self
    }

    fn map_file(path: &Path) -> Result<Mmap, LoadFault> {
        let file = File::open(path).map_err(|e| LoadFault::from_io(path, e))?;
        let len = file.metadata().map_err(|e| LoadFault::from_io(path, e))?.len();
        if len == 0 {
            return Err(LoadFault::malformed(path, "empty file"));
        }

        // read-only private mapping, nothing in it is ever executed
        unsafe { Mmap::map(&file) }.map_err(|e| LoadFault::from_io(path, e))
    }

    fn manifest_section<'a>(path: &Path, bytes: &'a [u8]) -> Result<Option<&'a [u8]>, LoadFault> {
        let object = Object::parse(bytes).map_err(|e| LoadFault::malformed(path, e.to_string()))?;

        match object {
            Object::Elf(elf) => {
                for sh in &elf.section_headers {
                    if sh.sh_type == SHT_NOBITS {
                        continue;
                    }
                    if elf.shdr_strtab.get_at(sh.sh_name) == Some(ELF_MANIFEST_SECTION) {
                        return section_slice(path, bytes, sh.sh_offset, sh.sh_size).map(Some);
                    }
                }
                Ok(None)
            }
            Object::PE(pe) => {
                for section in &pe.sections {
                    if section.name().ok() != Some(PE_MANIFEST_SECTION) {
                        continue;
                    }
                    let size = if section.virtual_size > 0 {
                        section.size_of_raw_data.min(section.virtual_size)
                    } else {
                        section.size_of_raw_data
                    };
                    return section_slice(path, bytes, section.pointer_to_raw_data as u64, size as u64)
                        .map(Some);
                }
                Ok(None)
            }
            Object::Mach(Mach::Binary(macho)) => {
                for segment in &macho.segments {
                    for section_result in segment.into_iter() {
                        let (section, _data) =
                            section_result.map_err(|e| LoadFault::malformed(path, e.to_string()))?;
                        let sectname = std::str::from_utf8(&section.sectname)
                            .unwrap_or("")
                            .trim_end_matches('\0');
                        if sectname == MACHO_MANIFEST_SECTION {
                            return section_slice(path, bytes, section.offset as u64, section.size).map(Some);
                        }
                    }
                }
                Ok(None)
            }
            Object::Mach(Mach::Fat(_)) => Err(LoadFault::unsupported(path, "fat Mach-O")),
            Object::Archive(_) => Err(LoadFault::unsupported(path, "static archive")),
            Object::Unknown(magic) => {
                Err(LoadFault::unsupported(path, format!("unknown magic 0x{:x}", magic)))
            }
            _ => Err(LoadFault::unsupported(path, "unrecognized container")),
        }
    }

    fn verify_dependencies(path: &Path, manifest: &TypeManifest) -> Result<(), LoadFault> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        for dependency in &manifest.requires {
            if !dir.join(dependency).is_file() {
                return Err(LoadFault::MissingDependency {
                    path: path.to_path_buf(),
                    dependency: dependency.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for BinaryInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleInspector for BinaryInspector {
    fn name(&self) -> &str {
        "binary"
    }

    fn inspect(&self, path: &Path) -> Result<InspectedModule, LoadFault> {
        let mmap = Self::map_file(path)?;

        let manifest = match Self::manifest_section(path, &mmap)? {
            Some(section) => TypeManifest::parse(path, section)?,
            None => {
                log::debug!("{} carries no type manifest", path.display());
                TypeManifest::default()
            }
        };

        if self.check_dependencies {
            Self::verify_dependencies(path, &manifest)?;
        }

        let name = match &manifest.module {
            Some(name) => name.clone(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        Ok(InspectedModule::new(path, &name, manifest.types).with_image(mmap))
    }
}

fn section_slice<'a>(path: &Path, bytes: &'a [u8], offset: u64, size: u64) -> Result<&'a [u8], LoadFault> {
    let start = offset as usize;
    let end = start
        .checked_add(size as usize)
        .ok_or_else(|| LoadFault::malformed(path, "manifest section size overflows"))?;

    bytes
        .get(start..end)
        .ok_or_else(|| LoadFault::malformed(path, format!("manifest section 0x{:x}..0x{:x} out of bounds", start, end)))
}
