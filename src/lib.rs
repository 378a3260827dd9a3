//! Line-oriented file comparison with classic context and unified output.
//!
//! The heart of the crate is an edit script, a list of [`Change`] records
//! describing how to turn one file into the other, and an [`Emitter`] that
//! renders such a script against two [`FileView`]s in either output style.
//! [`build_script`] produces a script for a pair of views; producers with
//! their own differ can hand the emitter any consistent script.

use error_set::error_set;

mod emit;
mod file;
mod options;
mod script;

pub use emit::Emitter;
pub use file::FileView;
pub use options::{Options, OutputStyle};
pub use script::{
    analyze_hunk, build_script, hunk_end, mark_ignorable, Change, ChangeKind, Hunk,
};

error_set! {
    /// Top-level error for linediff operations
    DiffError = {
        #[display("Failed to read {path}: {message}")]
        ReadFile { path: String, message: String },
        #[display("Invalid pattern '{pattern}': {message}")]
        BadPattern { pattern: String, message: String },
    } || EmitError;

    /// Errors raised while writing diff output
    EmitError = {
        Io(std::io::Error),
    };
}

/// Compare two file views and print their differences to `out`.
///
/// Returns true when the files differ visibly under `options`; identical
/// files, and files whose differences are all ignorable, write nothing.
///
/// # Examples
/// ```
/// use linediff::{FileView, Options, OutputStyle};
///
/// let old = FileView::new("old.txt", b"a\nb\n");
/// let new = FileView::new("new.txt", b"a\nc\n");
/// let mut out = Vec::new();
/// let changed =
///     linediff::print_diff(&mut out, &old, &new, &Options::default(), OutputStyle::Unified)
///         .unwrap();
/// assert!(changed);
/// ```
pub fn print_diff<W: std::io::Write>(
    out: W,
    old: &FileView<'_>,
    new: &FileView<'_>,
    options: &Options,
    style: OutputStyle,
) -> Result<bool, EmitError> {
    let mut script = build_script(old, new);
    let mut emitter = Emitter::new(out, [old, new], options, style);
    Ok(emitter.print_script(&mut script)?)
}
