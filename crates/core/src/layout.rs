//! Pagination of normalized lines into slide groups.
//!
//! Lines are grouped two per slide in input order; a trailing odd line
//! gets a slide of its own.

use crate::types::SlideGroup;

/// Number of lyric lines shown on one slide.
pub const LINES_PER_SLIDE: usize = 2;

/// Split lines into slide groups of at most [`LINES_PER_SLIDE`] lines.
pub fn paginate(lines: &[String]) -> Vec<SlideGroup> {
    lines
        .chunks(LINES_PER_SLIDE)
        .enumerate()
        .map(|(idx, chunk)| SlideGroup::new(idx + 1, chunk.to_vec()))
        .collect()
}

/// Number of slides needed for `line_count` lines.
pub fn slide_count(line_count: usize) -> usize {
    line_count.div_ceil(LINES_PER_SLIDE)
}

/// Render slide groups as a plain-text outline.
///
/// Each group's lines are joined with a newline and groups are separated
/// by a blank line.
///
/// # Example output
/// ```text
/// Amazing grace how sweet the sound
/// That saved a wretch like me
///
/// I once was lost but now am found
/// ```
pub fn format_outline(groups: &[SlideGroup]) -> String {
    groups
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}
