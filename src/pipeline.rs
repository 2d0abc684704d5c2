//! Generation pipeline: table source → registry → active sequence → consumer artifacts → files.
//!
//! ```text
//! source ──load──▶ Registry ──classify──▶ ActiveSequence ──consumers──▶ Artifacts ──emit──▶ GeneratedFiles
//! ```
//!
//! Every emitted artifact is produced under the same [`SlotPolicy`](nodekind_core::SlotPolicy) and checked for
//! alignment against the opcode artifact before rendering, so the files of one run always agree on order and length.
//!
//! ## Notes
//! - Only [`GeneratedFiles::write_to`] and [`GeneratedFiles::check_against`] touch the filesystem.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nodekind_core::{ActiveSequence, Classifier, Registry, RegistryError, expand};
use nodekind_syntax::{LoadedTable, TableError};
use thiserror::Error;

use crate::config::{GenerateConfig, Output};
use crate::consumers::{ForwardDecls, Manifest, ManifestDocument, NameTable, OpcodeEnum};
use crate::emit::{self, EmitError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("cannot access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// User-facing rendering; table errors include the offending source lines.
    pub fn render(&self) -> String {
        match self {
            PipelineError::Table(e) => e.render(),
            other => format!("error: {other}"),
        }
    }
}

/// Parse `source` and freeze it into a registry validated against `config.gates`.
pub fn load(source: &str, origin: &str, config: &GenerateConfig) -> Result<LoadedTable, PipelineError> {
    Ok(nodekind_syntax::load(origin, source, &config.gates)?)
}

/// Classify `registry` with the gate values and soft fallback of `config`.
pub fn classify<'r>(registry: &'r Registry, config: &GenerateConfig) -> Result<ActiveSequence<'r>, PipelineError> {
    let classifier = Classifier::new().with_soft_fallback(config.soft_fallback);
    Ok(classifier.classify(registry, &config.gates)?)
}

/// Run every consumer selected by `config` over `sequence` and render the files.
///
/// ## Errors
/// - [`EmitError::NameCollision`] when visitor method names collide.
/// - [`EmitError::Misaligned`] if any artifact disagrees with the opcode artifact on length.
#[tracing::instrument(skip_all, fields(active = sequence.len(), policy = ?config.slot_policy))]
pub fn emit(sequence: &ActiveSequence<'_>, config: &GenerateConfig) -> Result<GeneratedFiles, PipelineError> {
    let policy = config.slot_policy;
    let mut files = GeneratedFiles::default();

    let opcodes = expand::run(sequence, &mut OpcodeEnum::new().with_slot_policy(policy));
    if config.wants(Output::Opcodes) {
        files.insert(Output::Opcodes, emit::emit_opcodes(&opcodes)?);
    }
    if config.wants(Output::Names) {
        let names = expand::run(sequence, &mut NameTable::new().with_slot_policy(policy));
        emit::ensure_aligned(&opcodes, &names)?;
        files.insert(Output::Names, emit::emit_names(&names)?);
    }
    if config.wants(Output::Stubs) {
        let stubs = expand::run(sequence, &mut ForwardDecls::new().with_slot_policy(policy));
        emit::ensure_aligned(&opcodes, &stubs)?;
        files.insert(Output::Stubs, emit::emit_stubs(&stubs)?);
    }
    if config.wants(Output::Visitor) {
        let table = emit::visitor_table(sequence, policy)?;
        emit::ensure_aligned(&opcodes, &table)?;
        files.insert(Output::Visitor, emit::emit_visitor(&table)?);
    }
    if config.wants(Output::Manifest) {
        let rows = expand::run(sequence, &mut Manifest::new().with_slot_policy(policy));
        emit::ensure_aligned(&opcodes, &rows)?;
        let document = ManifestDocument::new(sequence, &config.gates, config.soft_fallback, rows);
        files.insert(Output::Manifest, document.to_json().map_err(EmitError::from)?);
    }

    tracing::info!(files = files.len(), "generated artifacts");
    Ok(files)
}

/// Full pipeline over one table.
///
/// ## Examples
/// ```rust
/// use nodekind::config::GenerateConfig;
///
/// let config = GenerateConfig::new().with_gate("X", false);
/// let files = nodekind::pipeline::generate("A\nB if(X)\nC\n", "demo.nk", &config).unwrap();
/// assert!(files.get("names.rs").unwrap().contains(r#"["A", "C"]"#));
/// ```
#[tracing::instrument(skip_all, fields(origin = %origin))]
pub fn generate(source: &str, origin: &str, config: &GenerateConfig) -> Result<GeneratedFiles, PipelineError> {
    let loaded = load(source, origin, config)?;
    let sequence = classify(&loaded.registry, config)?;
    emit(&sequence, config)
}

/// `opcode  name  inclusion` for every declared entry; excluded entries show `-`.
pub fn listing(sequence: &ActiveSequence<'_>) -> String {
    let width = sequence.registry().iter().map(|e| e.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for (entry, decision) in sequence.decisions() {
        let opcode = sequence
            .opcode_of(entry.name())
            .map_or_else(|| "-".to_string(), |opcode| opcode.to_string());
        let _ = writeln!(out, "{opcode:<6}{:<width$}  {decision}", entry.name());
    }
    let _ = writeln!(
        out,
        "{} active / {} declared",
        sequence.len(),
        sequence.registry().len()
    );
    out
}

/// Generated file contents keyed by file name, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    files: BTreeMap<String, String>,
}

/// How an on-disk file differs from what would be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    Missing,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub file: String,
    pub kind: DriftKind,
    /// Current contents on disk (`None` when missing).
    pub actual: Option<String>,
    pub expected: String,
}

impl Drift {
    pub fn diff(&self) -> String {
        line_diff(self.actual.as_deref().unwrap_or(""), &self.expected)
    }
}

impl GeneratedFiles {
    fn insert(&mut self, output: Output, contents: String) {
        self.files.insert(output.file_name().to_string(), contents);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Write every file into `dir` (created if needed). Files whose contents are already current are left untouched.
    ///
    /// Returns the paths that were written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for (name, contents) in &self.files {
            let path = dir.join(name);
            if read_existing(&path)?.as_deref() == Some(contents.as_str()) {
                continue;
            }
            fs::write(&path, contents).map_err(|source| PipelineError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }

    /// Compare against files already in `dir`. An empty result means `dir` is up to date.
    pub fn check_against(&self, dir: &Path) -> Result<Vec<Drift>, PipelineError> {
        let mut drift = Vec::new();
        for (name, expected) in &self.files {
            let actual = read_existing(&dir.join(name))?;
            let kind = match &actual {
                None => DriftKind::Missing,
                Some(actual) if actual != expected => DriftKind::Stale,
                Some(_) => continue,
            };
            drift.push(Drift {
                file: name.clone(),
                kind,
                actual,
                expected: expected.clone(),
            });
        }
        Ok(drift)
    }
}

fn read_existing(path: &Path) -> Result<Option<String>, PipelineError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Line-by-line diff, `-` for the old line and `+` for the new one.
pub fn line_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let mut diff = String::new();

    for i in 0..old_lines.len().max(new_lines.len()) {
        let before = old_lines.get(i).copied();
        let after = new_lines.get(i).copied();
        if before == after {
            continue;
        }
        if let Some(line) = before {
            let _ = writeln!(diff, "-{:4} | {}", i + 1, line);
        }
        if let Some(line) = after {
            let _ = writeln!(diff, "+{:4} | {}", i + 1, line);
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodekind_core::{SlotPolicy, SoftFallback};

    const SOURCE: &str = "A\nB if(X)\nC\nD soft(Y)\n";

    fn config(x: bool) -> GenerateConfig {
        GenerateConfig::new().with_gate("X", x).with_gate("Y", false)
    }

    #[test]
    fn generates_every_output_by_default() {
        let files = generate(SOURCE, "t.nk", &config(false)).unwrap();
        let names: Vec<&str> = files.file_names().collect();
        assert_eq!(names, ["manifest.json", "names.rs", "opcodes.rs", "stubs.rs", "visitor.rs"]);
        assert!(files.get("names.rs").unwrap().contains(r#"["A", "C"]"#));
    }

    #[test]
    fn soft_fallback_include_keeps_soft_entries() {
        let config = config(true).with_soft_fallback(SoftFallback::Include);
        let files = generate(SOURCE, "t.nk", &config).unwrap();
        assert!(files.get("names.rs").unwrap().contains(r#"["A", "B", "C", "D"]"#));
    }

    #[test]
    fn reserve_policy_keeps_positions() {
        let config = config(false).with_slot_policy(SlotPolicy::Reserve);
        let files = generate(SOURCE, "t.nk", &config).unwrap();
        let opcodes = files.get("opcodes.rs").unwrap();
        assert!(opcodes.contains("C = 2,"));
        assert!(opcodes.contains("pub const OPCODE_COUNT: usize = 4;"));
    }

    #[test]
    fn output_selection() {
        let config = config(true).with_outputs([Output::Manifest]);
        let files = generate(SOURCE, "t.nk", &config).unwrap();
        assert_eq!(files.file_names().collect::<Vec<_>>(), ["manifest.json"]);
    }

    #[test]
    fn unknown_gate_fails_at_load() {
        let err = generate(SOURCE, "t.nk", &GenerateConfig::new().with_gate("X", true)).unwrap_err();
        assert!(matches!(err, PipelineError::Table(_)));
        assert!(err.render().contains("references unknown gate `Y`"));
    }

    #[test]
    fn classify_rechecks_gates() {
        let loaded = load(SOURCE, "t.nk", &config(true)).unwrap();
        let err = classify(&loaded.registry, &GenerateConfig::new().with_gate("X", true)).unwrap_err();
        assert!(matches!(err, PipelineError::Registry(RegistryError::UnknownGate { .. })));
    }

    #[test]
    fn listing_uses_sequence_opcodes() {
        let loaded = load(SOURCE, "t.nk", &config(false)).unwrap();
        let sequence = classify(&loaded.registry, &config(false)).unwrap();
        let listing = listing(&sequence);
        let lines: Vec<&str> = listing.lines().collect();
        for (line, entry) in lines.iter().zip(loaded.registry.iter()) {
            let expected = sequence
                .opcode_of(entry.name())
                .map_or_else(|| "-".to_string(), |opcode| opcode.to_string());
            assert_eq!(line.split_whitespace().next(), Some(expected.as_str()), "{line}");
        }
        assert!(lines[2].starts_with("1     C"), "{listing}");
        assert_eq!(lines[4], "2 active / 4 declared");
    }

    #[test]
    fn line_diff_marks_changed_lines() {
        let diff = line_diff("a\nb\nc\n", "a\nB\nc\nd\n");
        assert_eq!(diff, "-   2 | b\n+   2 | B\n+   4 | d\n");
    }

    #[test]
    fn write_then_check_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let files = generate(SOURCE, "t.nk", &config(false)).unwrap();

        let missing = files.check_against(dir.path()).unwrap();
        assert_eq!(missing.len(), files.len());
        assert!(missing.iter().all(|d| d.kind == DriftKind::Missing));

        assert_eq!(files.write_to(dir.path()).unwrap().len(), files.len());
        assert!(files.check_against(dir.path()).unwrap().is_empty());
        assert!(files.write_to(dir.path()).unwrap().is_empty());

        let regenerated = generate(SOURCE, "t.nk", &config(true)).unwrap();
        let stale = regenerated.check_against(dir.path()).unwrap();
        assert!(stale.iter().all(|d| d.kind == DriftKind::Stale));
        let names = stale.iter().find(|d| d.file == "names.rs").unwrap();
        assert!(names.diff().contains(r#"["A", "B", "C"]"#));
    }
}
