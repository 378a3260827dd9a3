/// Read-only, line-indexed view of one input file.
///
/// Lines are addressed by signed internal numbers: origin-0 indices where
/// the range `[-prefix_lines, 0)` covers leading lines a change producer
/// skipped as common prefix. User-visible line numbers are origin-1 and
/// come from [`FileView::translate_range`].
#[derive(Debug, Clone)]
pub struct FileView<'a> {
    name: String,
    label: Option<String>,
    lines: Vec<&'a [u8]>,
    prefix_lines: i64,
    missing_newline: bool,
    mtime_secs: i64,
    mtime_nanos: u32,
}

impl<'a> FileView<'a> {
    /// Build a view over `contents`, split into lines that keep their
    /// terminating newline.
    pub fn new(name: impl Into<String>, contents: &'a [u8]) -> Self {
        let mut lines = Vec::new();
        let mut rest = contents;
        while !rest.is_empty() {
            let end = rest
                .iter()
                .position(|&byte| byte == b'\n')
                .map_or(rest.len(), |pos| pos + 1);
            let (line, tail) = rest.split_at(end);
            lines.push(line);
            rest = tail;
        }

        FileView {
            name: name.into(),
            label: None,
            lines,
            prefix_lines: 0,
            missing_newline: contents.last().is_some_and(|&byte| byte != b'\n'),
            mtime_secs: 0,
            mtime_nanos: 0,
        }
    }

    /// Replace the header label. `None` shows the file name and time.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Set the modification time shown in the header.
    pub fn with_mtime(mut self, secs: i64, nanos: u32) -> Self {
        self.mtime_secs = secs;
        self.mtime_nanos = nanos;
        self
    }

    /// Declare the first `count` lines as skipped common prefix. Internal
    /// line numbers shift so that 0 addresses the first tracked line.
    pub fn with_prefix_lines(mut self, count: i64) -> Self {
        debug_assert!(count >= 0 && count <= self.lines.len() as i64);
        self.prefix_lines = count;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn mtime(&self) -> (i64, u32) {
        (self.mtime_secs, self.mtime_nanos)
    }

    /// Count of tracked lines, excluding the skipped prefix.
    pub fn line_count(&self) -> i64 {
        self.lines.len() as i64 - self.prefix_lines
    }

    /// Count of leading lines excluded from internal numbering.
    pub fn prefix_lines(&self) -> i64 {
        self.prefix_lines
    }

    /// The bytes of line `index`, terminating newline included when the
    /// file has one there. `index` may reach back into the prefix.
    pub fn line(&self, index: i64) -> &'a [u8] {
        self.lines[(index + self.prefix_lines) as usize]
    }

    /// True when `index` addresses the file's last line and that line has
    /// no final newline.
    pub fn lacks_newline(&self, index: i64) -> bool {
        self.missing_newline && index + self.prefix_lines + 1 == self.lines.len() as i64
    }

    /// True when the file's last line has no terminating newline.
    pub fn missing_newline(&self) -> bool {
        self.missing_newline
    }

    /// Map a pair of internal line numbers to origin-1 real line numbers.
    pub fn translate_range(&self, a: i64, b: i64) -> (i64, i64) {
        (a + self.prefix_lines + 1, b + self.prefix_lines + 1)
    }

    pub(crate) fn lines(&self) -> &[&'a [u8]] {
        &self.lines
    }
}

/// True for a line consisting solely of whitespace.
pub(crate) fn is_blank_line(line: &[u8]) -> bool {
    line.iter().all(|byte| byte.is_ascii_whitespace())
}

/// A line's content without its terminating newline.
pub(crate) fn line_content(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}
