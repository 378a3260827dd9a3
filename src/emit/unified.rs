use std::io::{self, Write};

use super::Emitter;
use crate::file::FileView;
use crate::script::{analyze_hunk, Change, ChangeKind};

impl<'a, W: Write> Emitter<'a, W> {
    /// Print one hunk in unified format: the `@@` header, then old-file
    /// context interleaved with `-` and `+` runs.
    pub(super) fn unified_hunk(&mut self, run: &[Change]) -> io::Result<()> {
        let mut hunk = analyze_hunk(run, self.files, self.options);
        if hunk.kind == ChangeKind::Unchanged {
            return Ok(());
        }
        self.expand_bounds(&mut hunk);

        let function = self.find_function(hunk.first0);

        self.begin_output()?;
        self.out.write_all(b"@@ -")?;
        self.unified_range(self.files[0], hunk.first0, hunk.last0)?;
        self.out.write_all(b" +")?;
        self.unified_range(self.files[1], hunk.first1, hunk.last1)?;
        self.out.write_all(b" @@")?;
        if let Some(index) = function {
            self.write_function_label(index)?;
        }
        self.out.write_all(b"\n")?;

        let old = self.files[0];
        let new = self.files[1];
        let mut next = 0usize;
        let mut i = hunk.first0;
        let mut j = hunk.first1;

        while i <= hunk.last0 || j <= hunk.last1 {
            match run.get(next) {
                Some(change) if i >= change.line0 => {
                    for _ in 0..change.deleted {
                        let line = old.line(i);
                        self.out.write_all(b"-")?;
                        if self.options.initial_tab && !self.suppressed_blank(line) {
                            self.out.write_all(b"\t")?;
                        }
                        self.print_line(None, old, i)?;
                        i += 1;
                    }
                    for _ in 0..change.inserted {
                        let line = new.line(j);
                        self.out.write_all(b"+")?;
                        if self.options.initial_tab && !self.suppressed_blank(line) {
                            self.out.write_all(b"\t")?;
                        }
                        self.print_line(None, new, j)?;
                        j += 1;
                    }
                    next += 1;
                }
                _ => {
                    // Not part of a change: copy context from the old file.
                    let line = old.line(i);
                    if !self.suppressed_blank(line) {
                        self.out
                            .write_all(if self.options.initial_tab { b"\t" } else { b" " })?;
                    }
                    self.print_line(None, old, i)?;
                    i += 1;
                    j += 1;
                }
            }
        }
        Ok(())
    }

    /// Render a translated line-number pair in unified style as start and
    /// length, with the shorthands patch relies on: a one-line range
    /// prints the bare number, a zero-line range prints the line before
    /// it with an explicit `,0`.
    fn unified_range(&mut self, file: &FileView<'_>, a: i64, b: i64) -> io::Result<()> {
        let (trans_a, trans_b) = file.translate_range(a, b);
        if trans_b < trans_a {
            write!(self.out, "{trans_b},0")
        } else if trans_b == trans_a {
            write!(self.out, "{trans_b}")
        } else {
            write!(self.out, "{trans_a},{}", trans_b - trans_a + 1)
        }
    }
}
