use clap::Parser;
use linediff::{DiffError, FileView, Options, OutputStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::UNIX_EPOCH;
use std::{env, fs};

#[derive(Parser)]
#[command(name = "linediff")]
#[command(about = "Compare two files line by line in unified or context format")]
struct Cli {
    /// Old file
    old: PathBuf,
    /// New file
    new: PathBuf,

    /// Use the classic context format instead of unified
    #[arg(short = 'c', long = "context")]
    context_format: bool,

    /// Show NUM lines of copied context around each hunk
    #[arg(
        short = 'n',
        long = "lines",
        value_name = "NUM",
        default_value_t = 3,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    lines: i64,

    /// Show the most recent line matching REGEX before each hunk
    #[arg(short = 'F', long = "show-function-line", value_name = "REGEX")]
    show_function_line: Option<String>,

    /// Ignore changes where every inserted or deleted line matches REGEX
    #[arg(short = 'I', long = "ignore-matching-lines", value_name = "REGEX")]
    ignore_matching_lines: Option<String>,

    /// Ignore changes that only insert or delete blank lines
    #[arg(short = 'B', long = "ignore-blank-lines")]
    ignore_blank_lines: bool,

    /// Put a tab rather than a space before the text of output lines
    #[arg(short = 'T', long = "initial-tab")]
    initial_tab: bool,

    /// Expand tabs to spaces in the output
    #[arg(short = 't', long = "expand-tabs")]
    expand_tabs: bool,

    /// Tab stops every NUM columns
    #[arg(
        long,
        value_name = "NUM",
        default_value_t = 8,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tabsize: u64,

    /// Use LABEL instead of the file name and time in the header; the
    /// first use applies to the old file, the second to the new
    #[arg(long, value_name = "LABEL")]
    label: Vec<String>,

    /// Format for header timestamps
    #[arg(long, value_name = "FORMAT", default_value = "%Y-%m-%d %H:%M:%S%.9f %z")]
    time_format: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("linediff: {error}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool, DiffError> {
    let (old_bytes, old_mtime) = load(&cli.old)?;
    let (new_bytes, new_mtime) = load(&cli.new)?;

    let mut labels = cli.label.iter().cloned();
    let old = FileView::new(cli.old.display().to_string(), &old_bytes)
        .with_mtime(old_mtime.0, old_mtime.1)
        .with_label(labels.next());
    let new = FileView::new(cli.new.display().to_string(), &new_bytes)
        .with_mtime(new_mtime.0, new_mtime.1)
        .with_label(labels.next());

    let options = Options {
        context: cli.lines,
        ignore_blank_lines: cli.ignore_blank_lines,
        ignore_regex: compile(cli.ignore_matching_lines.as_deref())?,
        function_regex: compile(cli.show_function_line.as_deref())?,
        initial_tab: cli.initial_tab,
        // POSIX wants a space even in front of empty context lines.
        suppress_blank_empty: env::var_os("POSIXLY_CORRECT").is_none(),
        expand_tabs: cli.expand_tabs,
        tabsize: cli.tabsize as usize,
        time_format: cli.time_format.clone(),
    };

    let style = if cli.context_format {
        OutputStyle::Context
    } else {
        OutputStyle::Unified
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let changed = linediff::print_diff(&mut out, &old, &new, &options, style)?;
    out.flush().map_err(DiffError::from)?;
    Ok(changed)
}

/// Read a file's bytes and modification time. A missing or unreadable
/// time falls back to the epoch rather than failing the comparison.
fn load(path: &Path) -> Result<(Vec<u8>, (i64, u32)), DiffError> {
    let bytes = fs::read(path).map_err(|error| DiffError::ReadFile {
        path: path.display().to_string(),
        message: error.to_string(),
    })?;

    let mtime = fs::metadata(path)
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| (elapsed.as_secs() as i64, elapsed.subsec_nanos()))
        .unwrap_or((0, 0));

    Ok((bytes, mtime))
}

fn compile(pattern: Option<&str>) -> Result<Option<regex::bytes::Regex>, DiffError> {
    pattern
        .map(|p| {
            regex::bytes::Regex::new(p).map_err(|error| DiffError::BadPattern {
                pattern: p.to_string(),
                message: error.to_string(),
            })
        })
        .transpose()
}
