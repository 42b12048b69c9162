// Tue Jan 13 2026 - Alex

use crate::inspect::{ExportedType, InspectedModule, LoadFault, ModuleInspector, TypeManifest};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Outcome {
    Types(Vec<ExportedType>),
    Fault(&'static str),
    MissingDependency(&'static str),
    Panic,
}

/// Inspector whose result per file name is fixed up front. Unscripted
/// files load with no types.
pub struct ScriptedInspector {
    outcomes: HashMap<String, Outcome>,
    calls: Mutex<HashMap<String, usize>>,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl ScriptedInspector {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            opened: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with(mut self, file_name: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(file_name.to_string(), outcome);
        self
    }

    pub fn calls_for(&self, file_name: &str) -> usize {
        self.calls.lock().get(file_name).copied().unwrap_or(0)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ModuleInspector for ScriptedInspector {
    fn name(&self) -> &str {
        "scripted"
    }

    fn inspect(&self, path: &Path) -> Result<InspectedModule, LoadFault> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        *self.calls.lock().entry(file_name.clone()).or_insert(0) += 1;

        let types = match self.outcomes.get(&file_name) {
            None => Vec::new(),
            Some(Outcome::Types(types)) => types.clone(),
            Some(Outcome::Fault(message)) => return Err(LoadFault::malformed(path, *message)),
            Some(Outcome::MissingDependency(dependency)) => {
                return Err(LoadFault::MissingDependency {
                    path: path.to_path_buf(),
                    dependency: dependency.to_string(),
                })
            }
            Some(Outcome::Panic) => panic!("scripted inspector panic for {}", file_name),
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let released = self.released.clone();
        self.opened.fetch_add(1, Ordering::SeqCst);

        Ok(InspectedModule::new(path, &stem, types).on_release(move || {
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

pub struct CapturingLogger {
    level: LevelFilter,
    lines: Mutex<Vec<(Level, String)>>,
}

impl CapturingLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

const EHDR_SIZE: usize = 64;
const SHDR_SIZE: usize = 64;
const SHT_PROGBITS: u32 = 1;
const SHT_STRTAB: u32 = 3;

/// Writes a relocatable ELF64 object whose only payload is a `.modtype`
/// section holding `manifest`.
pub fn write_elf_module(path: &Path, manifest: &TypeManifest) -> io::Result<()> {
    let payload = manifest.to_bytes();
    let shstrtab: &[u8] = b"\0.modtype\0.shstrtab\0";
    let modtype_name = 1u32;
    let shstrtab_name = 10u32;

    let payload_offset = EHDR_SIZE;
    let shstrtab_offset = payload_offset + payload.len();
    let shoff = (shstrtab_offset + shstrtab.len() + 7) & !7;

    let mut out = Vec::with_capacity(shoff + 3 * SHDR_SIZE);

    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&1u16.to_le_bytes()); // ET_REL
    out.extend_from_slice(&62u16.to_le_bytes()); // EM_X86_64
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes()); // e_entry
    out.extend_from_slice(&0u64.to_le_bytes()); // e_phoff
    out.extend_from_slice(&(shoff as u64).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&56u16.to_le_bytes()); // e_phentsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&(SHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&3u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&2u16.to_le_bytes()); // e_shstrndx
    debug_assert_eq!(out.len(), EHDR_SIZE);

    out.extend_from_slice(&payload);
    out.extend_from_slice(shstrtab);
    out.resize(shoff, 0);

    out.extend_from_slice(&[0u8; SHDR_SIZE]);
    push_section_header(&mut out, modtype_name, SHT_PROGBITS, payload_offset, payload.len());
    push_section_header(&mut out, shstrtab_name, SHT_STRTAB, shstrtab_offset, shstrtab.len());

    fs::write(path, out)
}

fn push_section_header(out: &mut Vec<u8>, name: u32, kind: u32, offset: usize, size: usize) {
    out.extend_from_slice(&name.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes()); // sh_flags
    out.extend_from_slice(&0u64.to_le_bytes()); // sh_addr
    out.extend_from_slice(&(offset as u64).to_le_bytes());
    out.extend_from_slice(&(size as u64).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // sh_link
    out.extend_from_slice(&0u32.to_le_bytes()); // sh_info
    out.extend_from_slice(&1u64.to_le_bytes()); // sh_addralign
    out.extend_from_slice(&0u64.to_le_bytes()); // sh_entsize
}
