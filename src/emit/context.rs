use std::io::{self, Write};

use super::Emitter;
use crate::file::FileView;
use crate::script::{analyze_hunk, Change, ChangeKind};

impl<'a, W: Write> Emitter<'a, W> {
    /// Print one hunk in classic context format.
    ///
    /// Lines from the old file are flagged `-` for pure deletions and `!`
    /// where the covering change also inserts; new-file lines use `+` and
    /// `!` symmetrically. Unchanged context lines get a space.
    pub(super) fn context_hunk(&mut self, run: &[Change]) -> io::Result<()> {
        let mut hunk = analyze_hunk(run, self.files, self.options);
        if hunk.kind == ChangeKind::Unchanged {
            return Ok(());
        }
        self.expand_bounds(&mut hunk);

        let function = self.find_function(hunk.first0);

        self.begin_output()?;
        self.out.write_all(b"***************")?;
        if let Some(index) = function {
            self.write_function_label(index)?;
        }
        self.out.write_all(b"\n*** ")?;
        self.context_range(self.files[0], hunk.first0, hunk.last0)?;
        self.out.write_all(b" ****\n")?;

        if hunk.kind.has_old() {
            let old = self.files[0];
            let mut next = 0usize;
            for i in hunk.first0..=hunk.last0 {
                // Skip changes that end before line i in the old file.
                while next < run.len() && run[next].line0 + run[next].deleted <= i {
                    next += 1;
                }
                let flag = match run.get(next) {
                    Some(change) if change.line0 <= i => {
                        if change.inserted > 0 {
                            "!"
                        } else {
                            "-"
                        }
                    }
                    _ => " ",
                };
                self.print_line(Some(flag), old, i)?;
            }
        }

        self.out.write_all(b"--- ")?;
        self.context_range(self.files[1], hunk.first1, hunk.last1)?;
        self.out.write_all(b" ----\n")?;

        if hunk.kind.has_new() {
            let new = self.files[1];
            let mut next = 0usize;
            for j in hunk.first1..=hunk.last1 {
                while next < run.len() && run[next].line1 + run[next].inserted <= j {
                    next += 1;
                }
                let flag = match run.get(next) {
                    Some(change) if change.line1 <= j => {
                        if change.deleted > 0 {
                            "!"
                        } else {
                            "+"
                        }
                    }
                    _ => " ",
                };
                self.print_line(Some(flag), new, j)?;
            }
        }
        Ok(())
    }

    /// Render a translated line-number pair in context style. A range of
    /// no lines prints the single number before it.
    fn context_range(&mut self, file: &FileView<'_>, a: i64, b: i64) -> io::Result<()> {
        let (trans_a, trans_b) = file.translate_range(a, b);
        if trans_b <= trans_a {
            write!(self.out, "{trans_b}")
        } else {
            write!(self.out, "{trans_a},{trans_b}")
        }
    }
}
