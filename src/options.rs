use regex::bytes::Regex;

/// Which diff body format to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Classic context format with `***` / `---` stanzas.
    Context,
    /// Unified format with `@@` hunk markers.
    Unified,
}

/// Formatting options shared by the context and unified emitters.
#[derive(Debug, Clone)]
pub struct Options {
    /// Unchanged lines shown before and after each hunk.
    pub context: i64,
    /// Treat changes that only touch blank lines as ignorable.
    pub ignore_blank_lines: bool,
    /// Treat changes whose lines all match this pattern as ignorable.
    pub ignore_regex: Option<Regex>,
    /// Label each hunk with the nearest preceding old-file line matching
    /// this pattern.
    pub function_regex: Option<Regex>,
    /// Put a tab instead of a space between the line flag and the text.
    pub initial_tab: bool,
    /// Omit the space or tab in front of empty output lines.
    pub suppress_blank_empty: bool,
    /// Expand tabs to spaces in output lines.
    pub expand_tabs: bool,
    /// Columns between tab stops.
    pub tabsize: usize,
    /// strftime-style format for header timestamps.
    pub time_format: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            context: 3,
            ignore_blank_lines: false,
            ignore_regex: None,
            function_regex: None,
            initial_tab: false,
            suppress_blank_empty: false,
            expand_tabs: false,
            tabsize: 8,
            time_format: "%Y-%m-%d %H:%M:%S%.9f %z".to_string(),
        }
    }
}
