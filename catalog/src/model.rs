//! Core model types.
//!
//! These types represent ontology identifiers, terms, and annotation records
//! as plain owned Rust values. [`TermId`] is `Copy` so that graph traversals
//! can move identifiers around freely without touching the heap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of bytes in a [`Prefix`].
pub const PREFIX_CAPACITY: usize = 15;

/// Errors raised when parsing a [`TermId`] from its `PREFIX:CODE` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermIdError {
    /// The input was empty or whitespace only.
    #[error("term id is empty")]
    Empty,

    /// The input has no `:` separating prefix and code.
    #[error("term id {0:?} has no ':' separator")]
    MissingSeparator(String),

    /// The prefix is empty, too long, or contains non-alphanumeric bytes.
    #[error("term id prefix {0:?} is not 1-15 ASCII alphanumeric characters")]
    InvalidPrefix(String),

    /// The code is empty or contains non-digit characters.
    #[error("term id code {0:?} is not a decimal number")]
    InvalidCode(String),

    /// The code does not fit in 32 bits.
    #[error("term id code {0:?} is out of range")]
    CodeOutOfRange(String),
}

/// The namespace part of a [`TermId`] (e.g. `HP`, `GO`), stored inline.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    bytes: [u8; PREFIX_CAPACITY],
    len: u8,
}

impl Prefix {
    /// The Human Phenotype Ontology prefix.
    pub const HP: Prefix = Prefix::literal("HP");
    /// The Gene Ontology prefix.
    pub const GO: Prefix = Prefix::literal("GO");

    // Only called with known-good constants.
    const fn literal(s: &str) -> Self {
        let src = s.as_bytes();
        let mut bytes = [0u8; PREFIX_CAPACITY];
        let mut i = 0;
        while i < src.len() && i < PREFIX_CAPACITY {
            bytes[i] = src[i];
            i += 1;
        }
        Self {
            bytes,
            len: i as u8,
        }
    }

    /// Creates a prefix from a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`TermIdError::InvalidPrefix`] if `s` is empty, longer than
    /// [`PREFIX_CAPACITY`] bytes, or contains anything other than ASCII
    /// letters and digits.
    pub fn new(s: &str) -> Result<Self, TermIdError> {
        let valid = !s.is_empty()
            && s.len() <= PREFIX_CAPACITY
            && s.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(TermIdError::InvalidPrefix(s.to_owned()));
        }
        Ok(Self::literal(s))
    }

    /// Returns the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII.
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({})", self.as_str())
    }
}

/// An ontology identifier: a namespace prefix plus a numeric code.
///
/// Two ids are equal iff prefix and code match. The textual form pads the
/// code to seven digits, the convention shared by HPO and GO:
///
/// ```
/// use phenocat::TermId;
///
/// let id: TermId = "HP:0000118".parse().unwrap();
/// assert_eq!(id, TermId::hp(118));
/// assert_eq!(id.to_string(), "HP:0000118");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId {
    prefix: Prefix,
    code: u32,
}

impl TermId {
    /// Creates a term id from its parts.
    #[must_use]
    pub const fn new(prefix: Prefix, code: u32) -> Self {
        Self { prefix, code }
    }

    /// Creates an `HP:` term id.
    #[must_use]
    pub const fn hp(code: u32) -> Self {
        Self::new(Prefix::HP, code)
    }

    /// Creates a `GO:` term id.
    #[must_use]
    pub const fn go(code: u32) -> Self {
        Self::new(Prefix::GO, code)
    }

    /// Returns the namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Returns the numeric code.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.code
    }
}

impl FromStr for TermId {
    type Err = TermIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TermIdError::Empty);
        }
        let (prefix, code) = s
            .split_once(':')
            .ok_or_else(|| TermIdError::MissingSeparator(s.to_owned()))?;
        let prefix = Prefix::new(prefix)?;
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TermIdError::InvalidCode(code.to_owned()));
        }
        let code = code
            .parse::<u32>()
            .map_err(|_| TermIdError::CodeOutOfRange(code.to_owned()))?;
        Ok(Self::new(prefix, code))
    }
}

impl TryFrom<String> for TermId {
    type Error = TermIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TermId> for String {
    fn from(id: TermId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:07}", self.prefix, self.code)
    }
}

impl fmt::Debug for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermId({self})")
    }
}

/// A single ontology term as handed over by an ontology loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Canonical identifier.
    pub id: TermId,
    /// Human-readable label.
    pub label: String,
    /// Deprecated identifiers that resolve to `id`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_ids: Vec<TermId>,
    /// Direct `is_a` parents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<TermId>,
}

impl Term {
    /// Creates a term with no parents and no aliases.
    pub fn new(id: TermId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            alt_ids: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Sets the direct parents.
    #[must_use]
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = TermId>) -> Self {
        self.parents = parents.into_iter().collect();
        self
    }

    /// Sets the alias ids.
    #[must_use]
    pub fn with_alt_ids(mut self, alt_ids: impl IntoIterator<Item = TermId>) -> Self {
        self.alt_ids = alt_ids.into_iter().collect();
        self
    }
}

/// Gene Ontology aspect of an annotation (GAF column 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aspect {
    /// `P`: biological process.
    #[serde(rename = "P")]
    BiologicalProcess,
    /// `F`: molecular function.
    #[serde(rename = "F")]
    MolecularFunction,
    /// `C`: cellular component.
    #[serde(rename = "C")]
    CellularComponent,
}

/// Error returned when an aspect code is not one of `P`, `F`, `C`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aspect {0:?}; expected P, F, or C")]
pub struct AspectError(pub String);

impl Aspect {
    /// Returns the one-letter GAF code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Aspect::BiologicalProcess => "P",
            Aspect::MolecularFunction => "F",
            Aspect::CellularComponent => "C",
        }
    }

    /// Returns the sub-ontology name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Aspect::BiologicalProcess => "biological_process",
            Aspect::MolecularFunction => "molecular_function",
            Aspect::CellularComponent => "cellular_component",
        }
    }
}

impl FromStr for Aspect {
    type Err = AspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "P" => Ok(Aspect::BiologicalProcess),
            "F" => Ok(Aspect::MolecularFunction),
            "C" => Ok(Aspect::CellularComponent),
            other => Err(AspectError(other.to_owned())),
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One annotation: an external entity (gene or disease) linked to a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// External entity identifier (e.g. `UniProtKB:P12345`, `OMIM:154700`).
    pub entity_id: String,
    /// Annotated term, possibly an alias id.
    pub term: TermId,
    /// GO aspect, when the source carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
}

impl AnnotationRecord {
    /// Creates a record without an aspect.
    pub fn new(entity_id: impl Into<String>, term: TermId) -> Self {
        Self {
            entity_id: entity_id.into(),
            term,
            aspect: None,
        }
    }

    /// Sets the aspect.
    #[must_use]
    pub fn with_aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = Some(aspect);
        self
    }
}

/// A record an annotation source could not turn into an [`AnnotationRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed annotation record at line {line}: {reason}")]
pub struct MalformedRecord {
    /// 1-based line number in the source.
    pub line: usize,
    /// What was wrong with it.
    pub reason: String,
}

impl MalformedRecord {
    /// Creates a malformed-record error.
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}
