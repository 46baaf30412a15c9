//! Reassembly of program-list fragments into a [`Catalog`].
//!
//! A `listPrograms` response may span any number of binary frames.  Each
//! fragment carries newline-separated lines of the form:
//!
//! ```text
//! <id>\t<name>
//! ```
//!
//! Every fragment is line-complete: the device never splits one line across
//! two frames, so fragments are split on `\n` independently.
//!
//! # Line rules
//!
//! | Line                    | Result                      |
//! |-------------------------|-----------------------------|
//! | `"id\tname"`            | pattern `(id, name)`        |
//! | `""` / no tab at all    | skipped (blank or trailing) |
//! | `"id\tname\textra"`     | [`ParseError`]              |

use thiserror::Error;
use tracing::debug;

use crate::domain::pattern::{Catalog, Pattern};
use crate::protocol::frame::ProgramListFragment;

/// Errors raised while parsing program-list text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A line contained a tab but did not split into exactly `id` and `name`.
    #[error("malformed program list line {line:?}: expected 2 tab-separated fields, found {fields}")]
    MalformedLine { line: String, fields: usize },
}

/// Progress of an in-flight catalog assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    /// More fragments are expected.
    Incomplete,
    /// The final-flagged fragment has been consumed.
    Complete,
}

/// Collects program-list fragments until the final one arrives.
///
/// The assembler never exposes a partial list: [`CatalogAssembler::finish`]
/// returns `None` until a fragment with `is_final` set has been pushed.
///
/// # Example
///
/// ```rust
/// use pixelblaze_core::protocol::catalog::{AssemblyState, CatalogAssembler};
/// use pixelblaze_core::protocol::frame::ProgramListFragment;
///
/// let mut assembler = CatalogAssembler::new();
/// let state = assembler
///     .push(ProgramListFragment { text: "1\tRainbow\n2\tFire", is_final: false })
///     .unwrap();
/// assert_eq!(state, AssemblyState::Incomplete);
///
/// assembler
///     .push(ProgramListFragment { text: "3\tSolid", is_final: true })
///     .unwrap();
/// let catalog = assembler.finish().unwrap();
/// assert_eq!(catalog.get(0).unwrap().name, "Fire");
/// ```
#[derive(Debug, Default)]
pub struct CatalogAssembler {
    patterns: Vec<Pattern>,
    fragments: usize,
    complete: bool,
}

impl CatalogAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one fragment and appends its patterns.
    ///
    /// Fragments pushed after completion are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] if any line of the fragment has
    /// more than one tab.  The assembler should be discarded afterwards.
    pub fn push(&mut self, fragment: ProgramListFragment<'_>) -> Result<AssemblyState, ParseError> {
        if self.complete {
            debug!("program list fragment after final frame ignored");
            return Ok(AssemblyState::Complete);
        }

        parse_lines(fragment.text, &mut self.patterns)?;
        self.fragments += 1;

        if fragment.is_final {
            debug!(
                "program list complete: {} patterns in {} fragments",
                self.patterns.len(),
                self.fragments
            );
            self.complete = true;
            Ok(AssemblyState::Complete)
        } else {
            Ok(AssemblyState::Incomplete)
        }
    }

    /// Returns `true` once the final fragment has been pushed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of fragments consumed so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Consumes the assembler, returning the sorted catalog if it is complete.
    pub fn finish(self) -> Option<Catalog> {
        self.complete
            .then(|| Catalog::from_arrival_order(self.patterns))
    }
}

fn parse_lines(text: &str, out: &mut Vec<Pattern>) -> Result<(), ParseError> {
    for line in text.split('\n') {
        let Some((id, name)) = line.split_once('\t') else {
            continue;
        };
        if name.contains('\t') {
            return Err(ParseError::MalformedLine {
                line: line.to_string(),
                fields: line.split('\t').count(),
            });
        }
        out.push(Pattern::new(id, name));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, is_final: bool) -> ProgramListFragment<'_> {
        ProgramListFragment { text, is_final }
    }

    /// Runs `texts` through an assembler, flagging the last one final.
    fn assemble(texts: &[&str]) -> Result<Catalog, ParseError> {
        let mut assembler = CatalogAssembler::new();
        for (n, text) in texts.iter().enumerate() {
            assembler.push(fragment(text, n + 1 == texts.len()))?;
        }
        Ok(assembler.finish().unwrap())
    }

    fn pairs(catalog: &Catalog) -> Vec<(&str, &str)> {
        catalog
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect()
    }

    #[test]
    fn test_two_fragment_scenario_sorted_by_name() {
        // Arrange
        let mut assembler = CatalogAssembler::new();

        // Act
        let first = assembler.push(fragment("1\tRainbow\n2\tFire", false)).unwrap();
        let second = assembler.push(fragment("3\tSolid", true)).unwrap();
        let catalog = assembler.finish().unwrap();

        // Assert
        assert_eq!(first, AssemblyState::Incomplete);
        assert_eq!(second, AssemblyState::Complete);
        assert_eq!(
            pairs(&catalog),
            [("2", "Fire"), ("1", "Rainbow"), ("3", "Solid")]
        );
    }

    #[test]
    fn test_finish_before_final_fragment_returns_none() {
        let mut assembler = CatalogAssembler::new();
        assembler.push(fragment("1\tRainbow\n", false)).unwrap();

        assert!(!assembler.is_complete());
        assert!(assembler.finish().is_none());
    }

    #[test]
    fn test_empty_assembler_is_not_complete() {
        assert!(CatalogAssembler::new().finish().is_none());
    }

    #[test]
    fn test_blank_and_tabless_lines_are_skipped() {
        let mut assembler = CatalogAssembler::new();
        assembler
            .push(fragment("\n1\tA\n\nnot a pattern\n2\tB\n", true))
            .unwrap();

        let catalog = assembler.finish().unwrap();

        assert_eq!(pairs(&catalog), [("1", "A"), ("2", "B")]);
    }

    #[test]
    fn test_line_with_extra_tab_fails() {
        let mut assembler = CatalogAssembler::new();

        let result = assembler.push(fragment("1\tA\n2\tB\tC\n", true));

        assert_eq!(
            result,
            Err(ParseError::MalformedLine {
                line: "2\tB\tC".to_string(),
                fields: 3,
            })
        );
    }

    #[test]
    fn test_empty_name_and_id_are_kept() {
        // A tab is present, so the line is a pattern even with empty fields.
        let catalog = assemble(&["\tUnnamed id\nx\t"]).unwrap();

        assert_eq!(pairs(&catalog), [("x", ""), ("", "Unnamed id")]);
    }

    #[test]
    fn test_final_header_only_fragment_completes() {
        let mut assembler = CatalogAssembler::new();
        assembler.push(fragment("1\tA\n", false)).unwrap();
        assembler.push(fragment("", true)).unwrap();

        assert_eq!(assembler.fragment_count(), 2);
        assert_eq!(assembler.finish().unwrap().len(), 1);
    }

    #[test]
    fn test_fragments_after_final_are_ignored() {
        let mut assembler = CatalogAssembler::new();
        assembler.push(fragment("1\tA", true)).unwrap();

        let state = assembler.push(fragment("2\tB", true)).unwrap();

        assert_eq!(state, AssemblyState::Complete);
        assert_eq!(assembler.finish().unwrap().len(), 1);
    }

    #[test]
    fn test_catalog_is_independent_of_fragment_grouping() {
        let lines = ["a\tDelta", "b\tAlpha", "c\tCharlie", "d\tBravo"];
        let expected = assemble(&[lines.join("\n").as_str()]).unwrap();

        for split in 1..lines.len() {
            let head = lines[..split].join("\n");
            let tail = lines[split..].join("\n");
            let catalog = assemble(&[head.as_str(), tail.as_str()]).unwrap();
            assert_eq!(catalog, expected, "split at {split}");
        }
    }
}
