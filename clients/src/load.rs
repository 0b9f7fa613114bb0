//! File loaders.
//!
//! Two inputs feed a run. The ontology arrives as a JSON snapshot of already
//! parsed terms; OBO and OWL parsing happen upstream. Annotations arrive as
//! tab-separated rows in one of three layouts, read lazily so large GAF
//! files never sit in memory.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use anyhow::{Context, Result};
use phenocat::{AnnotationRecord, Aspect, MalformedRecord, Ontology, Term, TermId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// On-disk form of an ontology: the materialized term list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every term, canonical ids only; aliases ride on `alt_ids`.
    pub terms: Vec<Term>,
}

/// Loads a JSON ontology snapshot and builds the graph.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a snapshot, or
/// describes an inconsistent ontology (duplicates, dangling parents, cycles).
pub fn ontology_snapshot(path: &Path) -> Result<Ontology> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as an ontology snapshot", path.display()))?;
    let ontology = Ontology::from_terms(snapshot.terms)
        .with_context(|| format!("Invalid ontology in {}", path.display()))?;
    info!(
        path = %path.display(),
        terms = ontology.len(),
        aliases = ontology.alias_count(),
        "ontology loaded"
    );
    Ok(ontology)
}

/// Column layout of an annotation file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationFormat {
    /// `entity<TAB>term[<TAB>aspect]`.
    #[default]
    Plain,
    /// GAF 2.x gene association file.
    Gaf,
    /// HPO `phenotype.hpoa` disease annotations.
    Hpoa,
    /// Legacy HPO `phenotype_annotation.tab`, with the disease id split
    /// over the first two columns.
    #[serde(rename = "hpo-tab")]
    HpoTab,
}

impl AnnotationFormat {
    /// Minimum number of columns a data row needs.
    fn min_columns(self) -> usize {
        match self {
            AnnotationFormat::Plain => 2,
            AnnotationFormat::Gaf => 9,
            AnnotationFormat::Hpoa => 4,
            AnnotationFormat::HpoTab => 5,
        }
    }

    /// Column positions (zero-based) of entity, term, qualifier, and aspect.
    fn layout(self) -> (usize, usize, Option<usize>, Option<usize>) {
        match self {
            AnnotationFormat::Plain => (0, 1, None, Some(2)),
            AnnotationFormat::Gaf => (1, 4, Some(3), Some(8)),
            AnnotationFormat::Hpoa => (0, 3, Some(2), None),
            AnnotationFormat::HpoTab => (1, 4, Some(3), None),
        }
    }
}

/// Opens an annotation file for lazy reading.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_annotations(
    path: &Path,
    format: AnnotationFormat,
) -> Result<AnnotationReader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    info!(path = %path.display(), ?format, "reading annotations");
    Ok(AnnotationReader::new(BufReader::new(file), format))
}

/// Lazy iterator over annotation rows.
///
/// Comment lines (`#`, `!`), blank lines, header rows and negated (`NOT`)
/// annotations produce nothing. Every other line produces either a record
/// or a [`MalformedRecord`] naming the line, including lines that are not
/// valid UTF-8. Only a failing read ends the stream early.
pub struct AnnotationReader<R> {
    reader: R,
    buf: Vec<u8>,
    format: AnnotationFormat,
    line: usize,
    done: bool,
}

impl<R: BufRead> AnnotationReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R, format: AnnotationFormat) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            format,
            line: 0,
            done: false,
        }
    }

    /// The layout being parsed.
    pub fn format(&self) -> AnnotationFormat {
        self.format
    }

    fn parse(&self, raw: &str) -> Option<Result<AnnotationRecord, MalformedRecord>> {
        let row = raw.trim_end_matches(['\r', '\n']);
        if row.trim().is_empty() || row.starts_with('#') || row.starts_with('!') {
            return None;
        }
        let columns: Vec<&str> = row.split('\t').map(str::trim).collect();
        if self.format == AnnotationFormat::Hpoa && columns[0].eq_ignore_ascii_case("database_id")
        {
            return None;
        }
        if columns.len() < self.format.min_columns() {
            return Some(Err(self.malformed(format!(
                "expected at least {} columns, found {}",
                self.format.min_columns(),
                columns.len()
            ))));
        }

        let (entity_col, term_col, qualifier_col, aspect_col) = self.format.layout();
        if let Some(qualifier) = qualifier_col.and_then(|i| columns.get(i)) {
            if qualifier.split('|').any(|q| q.eq_ignore_ascii_case("NOT")) {
                debug!(line = self.line, "skipping negated annotation");
                return None;
            }
        }

        let entity = columns[entity_col];
        if entity.is_empty() {
            return Some(Err(self.malformed("entity column is empty")));
        }
        let entity = match self.format {
            AnnotationFormat::HpoTab if !columns[0].is_empty() => {
                format!("{}:{}", columns[0], entity)
            }
            _ => entity.to_owned(),
        };
        let term = match columns[term_col].parse::<TermId>() {
            Ok(term) => term,
            Err(err) => return Some(Err(self.malformed(format!("bad term id: {err}")))),
        };
        let mut record = AnnotationRecord::new(entity, term);
        if let Some(code) = aspect_col.and_then(|i| columns.get(i)).filter(|c| !c.is_empty()) {
            match code.parse::<Aspect>() {
                Ok(aspect) => record = record.with_aspect(aspect),
                Err(err) => return Some(Err(self.malformed(err.to_string()))),
            }
        }
        Some(Ok(record))
    }

    fn malformed(&self, reason: impl Into<String>) -> MalformedRecord {
        MalformedRecord::new(self.line, reason)
    }
}

impl<R: BufRead> Iterator for AnnotationReader<R> {
    type Item = Result<AnnotationRecord, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let item = match std::str::from_utf8(&self.buf) {
                        Ok(raw) => self.parse(raw),
                        Err(err) => Some(Err(self.malformed(format!("not valid UTF-8: {err}")))),
                    };
                    if item.is_some() {
                        return item;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(self.malformed(format!("read error: {err}"))));
                }
            }
        }
        None
    }
}
