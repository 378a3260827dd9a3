mod context;
mod unified;

use std::io::{self, Write};

use chrono::{Local, TimeZone};

use crate::file::{line_content, FileView};
use crate::options::{Options, OutputStyle};
use crate::script::{hunk_end, mark_ignorable, Change, Hunk};

/// Longest function label copied into a hunk header, in bytes.
const FUNCTION_LABEL_MAX: usize = 40;

/// Streams a prepared edit script to a byte sink in context or unified
/// format.
///
/// Nothing is written until the first hunk with visible lines is reached;
/// the two-line file header goes out immediately before it. A script whose
/// hunks are all ignorable therefore produces no output at all.
pub struct Emitter<'a, W> {
    out: W,
    files: [&'a FileView<'a>; 2],
    options: &'a Options,
    style: OutputStyle,
    header_written: bool,
    // Search memo for the function finder, valid for one script pass.
    last_search: i64,
    last_match: Option<i64>,
}

impl<'a, W: Write> Emitter<'a, W> {
    pub fn new(
        out: W,
        files: [&'a FileView<'a>; 2],
        options: &'a Options,
        style: OutputStyle,
    ) -> Self {
        Emitter {
            out,
            files,
            options,
            style,
            header_written: false,
            last_search: -files[0].prefix_lines(),
            last_match: None,
        }
    }

    /// Print the whole script, grouping adjacent changes into hunks.
    ///
    /// Ignore flags are recomputed first, so the script may be passed in
    /// any state. Returns true when any output was produced.
    pub fn print_script(&mut self, script: &mut [Change]) -> io::Result<bool> {
        mark_ignorable(script, self.files, self.options);
        self.last_search = -self.files[0].prefix_lines();
        self.last_match = None;

        let mut start = 0;
        while start < script.len() {
            let end = hunk_end(script, start, self.options);
            let run = &script[start..=end];
            match self.style {
                OutputStyle::Context => self.context_hunk(run)?,
                OutputStyle::Unified => self.unified_hunk(run)?,
            }
            start = end + 1;
        }
        Ok(self.header_written)
    }

    /// True once any bytes have gone out.
    pub fn wrote_output(&self) -> bool {
        self.header_written
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the two-line file header if it has not been written yet.
    fn begin_output(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;

        let (old, new) = (self.files[0], self.files[1]);
        match self.style {
            OutputStyle::Unified => {
                self.label_line("---", old)?;
                self.label_line("+++", new)
            }
            OutputStyle::Context => {
                self.label_line("***", old)?;
                self.label_line("---", new)
            }
        }
    }

    fn label_line(&mut self, mark: &str, file: &FileView<'_>) -> io::Result<()> {
        match file.label() {
            Some(label) => writeln!(self.out, "{mark} {label}"),
            None => {
                let (secs, nanos) = file.mtime();
                let stamp = format_timestamp(&self.options.time_format, secs, nanos);
                writeln!(self.out, "{mark} {}\t{}", file.name(), stamp)
            }
        }
    }

    /// Widen hunk bounds by the configured context, clamped to the file.
    fn expand_bounds(&self, hunk: &mut Hunk) {
        let context = self.options.context;
        let low = -self.files[0].prefix_lines();
        hunk.first0 = (hunk.first0 - context).max(low);
        hunk.first1 = (hunk.first1 - context).max(low);
        hunk.last0 = (hunk.last0 + context).min(self.files[0].line_count() - 1);
        hunk.last1 = (hunk.last1 + context).min(self.files[1].line_count() - 1);
    }

    /// Nearest line before `linenum` in the old file whose content matches
    /// the function pattern. The scan stops where the previous call
    /// started; if nothing new turns up, the previous match stays good.
    fn find_function(&mut self, linenum: i64) -> Option<i64> {
        let regex = self.options.function_regex.as_ref()?;
        let file = self.files[0];
        let previous = self.last_search;
        self.last_search = linenum;

        let mut i = linenum;
        loop {
            i -= 1;
            if i < previous {
                break;
            }
            if regex.is_match(line_content(file.line(i))) {
                self.last_match = Some(i);
                return Some(i);
            }
        }
        self.last_match
    }

    /// Append ` <label>` after a hunk marker: leading whitespace skipped,
    /// at most [`FUNCTION_LABEL_MAX`] bytes, stopped at the first newline
    /// and right-trimmed.
    fn write_function_label(&mut self, index: i64) -> io::Result<()> {
        let line = self.files[0].line(index);
        let mut start = 0;
        while start < line.len() && line[start].is_ascii_whitespace() && line[start] != b'\n' {
            start += 1;
        }
        let mut end = start;
        while end < line.len() && end < start + FUNCTION_LABEL_MAX && line[end] != b'\n' {
            end += 1;
        }
        while end > start && line[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        self.out.write_all(b" ")?;
        self.out.write_all(&line[start..end])
    }

    /// Write one line, preceded by `flag` and a separator when given,
    /// followed by the no-newline sentinel when the file ends here without
    /// one.
    fn print_line(
        &mut self,
        flag: Option<&str>,
        file: &FileView<'_>,
        index: i64,
    ) -> io::Result<()> {
        if let Some(flag) = flag {
            self.out.write_all(flag.as_bytes())?;
            self.out
                .write_all(if self.options.initial_tab { b"\t" } else { b" " })?;
        }
        self.output_line(file.line(index))?;
        if file.lacks_newline(index) {
            self.out.write_all(b"\n\\ No newline at end of file\n")?;
        }
        Ok(())
    }

    /// Copy a line's bytes to the sink, expanding tabs when configured.
    fn output_line(&mut self, line: &[u8]) -> io::Result<()> {
        if !self.options.expand_tabs {
            return self.out.write_all(line);
        }

        let tabsize = self.options.tabsize.max(1);
        let mut column = 0usize;
        for &byte in line {
            match byte {
                b'\t' => {
                    let spaces = tabsize - column % tabsize;
                    column += spaces;
                    for _ in 0..spaces {
                        self.out.write_all(b" ")?;
                    }
                }
                b'\r' => {
                    self.out.write_all(b"\r")?;
                    column = 0;
                }
                0x08 => {
                    // Backspace at the left margin is dropped.
                    if column > 0 {
                        column -= 1;
                        self.out.write_all(&[byte])?;
                    }
                }
                _ => {
                    column += usize::from(byte.is_ascii_graphic() || byte == b' ');
                    self.out.write_all(&[byte])?;
                }
            }
        }
        Ok(())
    }

    /// True when `line` is empty and empty output lines go unprefixed.
    fn suppressed_blank(&self, line: &[u8]) -> bool {
        self.options.suppress_blank_empty && line.first() == Some(&b'\n')
    }
}

/// Render a header timestamp, falling back to `seconds.nanoseconds` when
/// the format cannot be applied.
fn format_timestamp(format: &str, secs: i64, nanos: u32) -> String {
    use std::fmt::Write as _;

    if let Some(time) = Local.timestamp_opt(secs, nanos).single() {
        let mut buf = String::new();
        if write!(buf, "{}", time.format(format)).is_ok() {
            return buf;
        }
    }
    format!("{secs}.{nanos:09}")
}
