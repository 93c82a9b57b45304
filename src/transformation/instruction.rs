//! Instruction prompt regions
//!
//! Restricts edits to selected regions of an instruction-style prompt of the form
//!
//! ```text
//! Definition: ... Negative Examples: ... Positive Examples: ... Explanation: ...
//! Input: ... Output:
//! ```
//!
//! A region whose markers are missing contributes no modifiable positions.

use std::collections::BTreeSet;
use std::ops::Range;

use tracing::warn;

use crate::text::attacked_text::AttackedText;
use crate::transformation::traits::PreTransformationConstraint;

const DEFINITION: &str = "Definition:";
const NEGATIVE_EXAMPLES: &str = "Negative Examples:";
const POSITIVE_EXAMPLES: &str = "Positive Examples:";
const EXPLANATION: &str = "Explanation:";
const INPUT: &str = "Input:";
const OUTPUT: &str = "Output:";

/// Which regions of an instruction prompt may be modified
#[derive(Clone, Copy, Debug)]
pub struct InstructionModification {
    /// Allow edits inside the task definition
    pub modify_definition: bool,
    /// Allow edits inside the final task input
    pub modify_task_input: bool,
    /// Allow edits inside example explanations
    pub modify_explanation: bool,
}

impl Default for InstructionModification {
    fn default() -> Self {
        Self {
            modify_definition: true,
            modify_task_input: true,
            modify_explanation: true,
        }
    }
}

/// Word range covered by the first occurrence of `segment` in `text`
///
/// `text` must be single-space separated. A byte position maps to the number of
/// spaces up to and including it; a segment running to the end of `text` extends
/// past the last word.
fn word_range(text: &str, segment: &str) -> Option<Range<usize>> {
    let start = text.find(segment)?;
    let end = start + segment.len();
    let bytes = text.as_bytes();
    let spaces_through = |pos: usize| -> usize {
        if pos >= bytes.len() {
            bytes.iter().filter(|&&b| b == b' ').count() + 1
        } else {
            bytes[..=pos].iter().filter(|&&b| b == b' ').count()
        }
    };
    Some(spaces_through(start)..spaces_through(end))
}

impl InstructionModification {
    /// Create with every region enabled
    pub fn new() -> Self {
        Self::default()
    }

    fn definition_segment(text: &str) -> Option<&str> {
        let (_, rest) = text.split_once(DEFINITION)?;
        rest.split(NEGATIVE_EXAMPLES).next()
    }

    fn task_input_segment(text: &str) -> Option<&str> {
        let (_, rest) = text.rsplit_once(INPUT)?;
        rest.split(OUTPUT).next()
    }

    fn explanation_segments(text: &str) -> Vec<String> {
        let without_marker = text.replace(POSITIVE_EXAMPLES, "");
        let parts: Vec<&str> = without_marker.split(EXPLANATION).collect();
        if parts.len() < 2 {
            return Vec::new();
        }
        let mut segments: Vec<String> = parts[1..parts.len() - 1]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(last) = parts.last() {
            segments.push(last.split(INPUT).next().unwrap_or_default().to_string());
        }
        segments
    }

    fn extend_with(indices: &mut BTreeSet<usize>, text: &str, segment: &str, region: &str) {
        match word_range(text, segment) {
            Some(range) => indices.extend(range),
            None => warn!(region, "instruction region not found in text"),
        }
    }
}

impl PreTransformationConstraint for InstructionModification {
    fn name(&self) -> &str {
        "instruction-modification"
    }

    fn modifiable_indices(&self, text: &AttackedText) -> BTreeSet<usize> {
        let joined = text.text();
        let mut indices = BTreeSet::new();

        if self.modify_definition {
            match Self::definition_segment(&joined) {
                Some(segment) => Self::extend_with(&mut indices, &joined, segment, "definition"),
                None => warn!("no definition found in instruction text"),
            }
        }

        if self.modify_task_input {
            match Self::task_input_segment(&joined) {
                Some(segment) => Self::extend_with(&mut indices, &joined, segment, "task input"),
                None => warn!("no task input found in instruction text"),
            }
        }

        if self.modify_explanation {
            let segments = Self::explanation_segments(&joined);
            if segments.is_empty() {
                warn!("no explanations found in instruction text");
            }
            for segment in &segments {
                Self::extend_with(&mut indices, &joined, segment, "explanation");
            }
        }

        indices.retain(|&i| i < text.num_words());
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(definition: bool, task_input: bool, explanation: bool) -> InstructionModification {
        InstructionModification {
            modify_definition: definition,
            modify_task_input: task_input,
            modify_explanation: explanation,
        }
    }

    #[test]
    fn test_word_range() {
        let text = "Definition: swap words Input: the cat Output:";
        // " the cat " covers words 4..6
        assert_eq!(word_range(text, " the cat "), Some(4..6));
        assert_eq!(word_range(text, "missing"), None);
    }

    #[test]
    fn test_definition_and_task_input() {
        let text =
            AttackedText::new("Definition: swap words Negative Examples: none Input: the cat Output:");

        assert_eq!(
            only(true, false, false).modifiable_indices(&text),
            BTreeSet::from([1, 2])
        );
        assert_eq!(
            only(false, true, false).modifiable_indices(&text),
            BTreeSet::from([7, 8])
        );
        assert_eq!(
            InstructionModification::new().modifiable_indices(&text),
            BTreeSet::from([1, 2, 7, 8])
        );
    }

    #[test]
    fn test_explanation_region() {
        let text = AttackedText::new(
            "Definition: d Positive Examples: Explanation: it works Input: go Output:",
        );
        assert_eq!(
            only(false, false, true).modifiable_indices(&text),
            BTreeSet::from([5, 6])
        );
    }

    #[test]
    fn test_missing_markers_fail_closed() {
        let text = AttackedText::new("just a plain sentence");
        assert!(InstructionModification::new()
            .modifiable_indices(&text)
            .is_empty());
    }
}
