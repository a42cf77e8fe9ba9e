//! Interactive review of proposed field correspondences.
//!
//! A session runs `extract source -> extract target -> match -> review each
//! candidate -> emit`. Every candidate is shown to a [`Prompt`]; accepted
//! pairs form the `fields` of the emitted mapping entry.

use std::io::{self, BufRead, Write};
use std::path::Path;

use objmap_model::MappingEntry;
use tracing::{debug, info, info_span};

use crate::error::SuggestError;
use crate::extract::{FieldDecl, TypeOutline, extract_file};
use crate::matcher::{Candidate, match_fields};

/// Decides whether a candidate becomes part of the mapping.
pub trait Prompt {
    fn confirm(&mut self, candidate: &Candidate) -> io::Result<bool>;
}

/// Asks `y/n` on a line-oriented reader/writer pair. End of input rejects.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&mut self, candidate: &Candidate) -> io::Result<bool> {
        writeln!(self.writer, "Found potential match:")?;
        writeln!(self.writer, "  Source: {}", candidate.source)?;
        writeln!(self.writer, "  Target: {}", candidate.target)?;
        write!(self.writer, "Create this mapping? (y/n): ")?;
        self.writer.flush()?;

        let mut answer = String::new();
        if self.reader.read_line(&mut answer)? == 0 {
            writeln!(self.writer)?;
            return Ok(false);
        }
        let accepted = answer.trim().eq_ignore_ascii_case("y");
        if accepted {
            writeln!(self.writer, "Mapping added.")?;
        }
        writeln!(self.writer)?;
        Ok(accepted)
    }
}

/// Accepts every candidate without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Prompt for AcceptAll {
    fn confirm(&mut self, _candidate: &Candidate) -> io::Result<bool> {
        Ok(true)
    }
}

/// Outcome of a review session.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The mapping fragment built from accepted candidates.
    pub entry: MappingEntry,
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<Candidate>,
    /// Source fields no target came close to.
    pub unmatched: Vec<FieldDecl>,
}

impl Suggestion {
    /// The fragment as pretty-printed JSON, ready to paste into `mappings`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entry)
    }
}

/// Drives a review session with a prompt.
#[derive(Debug)]
pub struct Suggester<P> {
    prompt: P,
}

impl<P: Prompt> Suggester<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    /// Extracts both files and reviews the candidates.
    pub fn run(&mut self, source: &Path, target: &Path) -> Result<Suggestion, SuggestError> {
        let source = info_span!("extract_source").in_scope(|| extract_file(source))?;
        let target = info_span!("extract_target").in_scope(|| extract_file(target))?;
        self.review(&source, &target).map_err(SuggestError::Prompt)
    }

    /// Matches the fields of two outlines and asks about every candidate.
    pub fn review(&mut self, source: &TypeOutline, target: &TypeOutline) -> io::Result<Suggestion> {
        let matched = info_span!("match").in_scope(|| match_fields(&source.fields, &target.fields));
        info!(
            source_type = %source.name,
            target_type = %target.name,
            candidates = matched.candidates.len(),
            unmatched = matched.unmatched.len(),
            "fields matched"
        );

        let mut entry = MappingEntry::new(&source.name, &target.name);
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let _review = info_span!("review").entered();
        for candidate in matched.candidates {
            let answer = self.prompt.confirm(&candidate)?;
            debug!(
                source_field = %candidate.source.name,
                target_field = %candidate.target.name,
                kind = ?candidate.kind,
                accepted = answer,
                "candidate reviewed"
            );
            if answer {
                entry
                    .fields
                    .insert(&candidate.source.name, &candidate.target.name);
                accepted.push(candidate);
            } else {
                rejected.push(candidate);
            }
        }

        Ok(Suggestion {
            entry,
            accepted,
            rejected,
            unmatched: matched.unmatched,
        })
    }
}
