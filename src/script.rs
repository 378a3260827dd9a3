use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::file::{is_blank_line, line_content, FileView};
use crate::options::Options;

/// One atomic edit: `deleted` lines removed at `line0` in the old file and
/// `inserted` lines added at `line1` in the new file.
///
/// Line numbers are internal origin-0 indices. When `deleted` is zero,
/// `line0` is the line before which the insertion happens; symmetrically
/// for `inserted` and `line1`. A change always touches at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub line0: i64,
    pub line1: i64,
    pub deleted: i64,
    pub inserted: i64,
    /// Set by [`mark_ignorable`] when every line this change touches is
    /// ignorable under the active options.
    pub ignore: bool,
}

impl Change {
    pub fn new(line0: i64, line1: i64, deleted: i64, inserted: i64) -> Self {
        debug_assert!(deleted + inserted > 0, "change touching no lines");
        Change {
            line0,
            line1,
            deleted,
            inserted,
            ignore: false,
        }
    }
}

/// What kind of lines a hunk contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Nothing worth showing: every line the hunk touches is ignorable.
    Unchanged,
    /// Deletions only.
    Old,
    /// Insertions only.
    New,
    /// Both deletions and insertions.
    Changed,
}

impl ChangeKind {
    pub fn has_old(self) -> bool {
        matches!(self, ChangeKind::Old | ChangeKind::Changed)
    }

    pub fn has_new(self) -> bool {
        matches!(self, ChangeKind::New | ChangeKind::Changed)
    }
}

/// Extents of one displayed hunk, before context expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    pub kind: ChangeKind,
    pub first0: i64,
    pub last0: i64,
    pub first1: i64,
    pub last1: i64,
}

/// Compute the edit script for a pair of file views with a Myers line
/// diff. Indices in the result use the views' internal numbering.
pub fn build_script(old: &FileView<'_>, new: &FileView<'_>) -> Vec<Change> {
    let ops = capture_diff_slices(Algorithm::Myers, old.lines(), new.lines());
    let base0 = old.prefix_lines();
    let base1 = new.prefix_lines();

    ops.iter()
        .filter_map(|op| match *op {
            DiffOp::Equal { .. } => None,
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => Some(Change::new(
                old_index as i64 - base0,
                new_index as i64 - base1,
                old_len as i64,
                0,
            )),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => Some(Change::new(
                old_index as i64 - base0,
                new_index as i64 - base1,
                0,
                new_len as i64,
            )),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => Some(Change::new(
                old_index as i64 - base0,
                new_index as i64 - base1,
                old_len as i64,
                new_len as i64,
            )),
        })
        .collect()
}

/// Classify a run of adjacent changes and compute the extents it spans in
/// each file.
///
/// A side that contributes no lines gets an empty range positioned at the
/// point of change, with `last` equal to `first - 1`.
pub fn analyze_hunk(run: &[Change], files: [&FileView<'_>; 2], options: &Options) -> Hunk {
    let first0 = run[0].line0;
    let first1 = run[0].line1;
    let mut last0 = first0 - 1;
    let mut last1 = first1 - 1;
    let mut show_from = 0;
    let mut show_to = 0;
    let mut trivial = options.ignore_blank_lines || options.ignore_regex.is_some();

    for change in run {
        last0 = change.line0 + change.deleted - 1;
        last1 = change.line1 + change.inserted - 1;
        show_from += change.deleted;
        show_to += change.inserted;

        if trivial {
            let deleted = (change.line0..=last0).map(|i| files[0].line(i));
            let inserted = (change.line1..=last1).map(|j| files[1].line(j));
            if !deleted.chain(inserted).all(|line| ignorable(line, options)) {
                trivial = false;
            }
        }
    }

    let kind = if trivial {
        ChangeKind::Unchanged
    } else {
        match (show_from > 0, show_to > 0) {
            (true, true) => ChangeKind::Changed,
            (true, false) => ChangeKind::Old,
            (false, true) => ChangeKind::New,
            (false, false) => ChangeKind::Unchanged,
        }
    };

    Hunk {
        kind,
        first0,
        last0,
        first1,
        last1,
    }
}

/// A line drops out of consideration when it is blank (and blank lines are
/// being ignored) or when the ignore pattern matches its content.
fn ignorable(line: &[u8], options: &Options) -> bool {
    (options.ignore_blank_lines && is_blank_line(line))
        || options
            .ignore_regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(line_content(line)))
}

/// Recompute the `ignore` flag of every change in the script: true when
/// all of its lines are ignorable. With no ignore options active, every
/// flag is cleared.
pub fn mark_ignorable(script: &mut [Change], files: [&FileView<'_>; 2], options: &Options) {
    if !options.ignore_blank_lines && options.ignore_regex.is_none() {
        for change in script.iter_mut() {
            change.ignore = false;
        }
        return;
    }

    for index in 0..script.len() {
        let kind = analyze_hunk(&script[index..=index], files, options).kind;
        script[index].ignore = kind == ChangeKind::Unchanged;
    }
}

/// Index of the last change belonging to the hunk that starts at `start`.
///
/// Changes are grouped while fewer unchanged lines separate them than the
/// threshold: `context` lines when the following change is ignorable,
/// `2 * context + 1` otherwise.
pub fn hunk_end(script: &[Change], start: usize, options: &Options) -> usize {
    let ignorable_threshold = options.context;
    let non_ignorable_threshold = 2 * options.context + 1;

    let mut prev = start;
    loop {
        let top0 = script[prev].line0 + script[prev].deleted;
        let top1 = script[prev].line1 + script[prev].inserted;
        let Some(next) = script.get(prev + 1) else {
            return prev;
        };

        // The gap must look the same from both files; a mismatch means the
        // script producer handed us garbage.
        assert!(
            next.line0 - top0 == next.line1 - top1,
            "inconsistent edit script: gap of {} lines in old file, {} in new file",
            next.line0 - top0,
            next.line1 - top1,
        );

        let threshold = if next.ignore {
            ignorable_threshold
        } else {
            non_ignorable_threshold
        };
        if next.line0 - top0 < threshold {
            prev += 1;
        } else {
            return prev;
        }
    }
}
