//! cdoc CLI - Command-line interface for the cdoc documentation generator

use anyhow::{Context, Result};
use cdoc_core::{Format, PathResolver, RenderOptions, Report};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};

mod config;
mod logging;

use config::Config;
use logging::DebugFlags;

#[derive(Parser, Debug)]
#[command(name = "cdoc")]
#[command(version = cdoc_core::VERSION)]
#[command(about = "Generate documentation from /** */ comments in C sources", long_about = None)]
struct Cli {
    /// Source file to document; local includes marked `/** @include */` are followed
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (defaults to the output extension, else html)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Trace pipeline stages: scanner, sorter, semantic, render or all
    #[arg(short, long, value_name = "FLAGS")]
    debug: Option<String>,

    /// Settings file (defaults to cdoc.toml beside the input)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page title, written as documentation text
    #[arg(short, long)]
    title: Option<String>,

    /// Keep undocumented and static statements
    #[arg(long)]
    keep_all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Html,
    #[value(alias = "markdown")]
    Md,
    Json,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => Format::Html,
            FormatArg::Md => Format::Md,
            FormatArg::Json => Format::Json,
        }
    }
}

impl Cli {
    /// Flag, then config file, then output extension.
    fn format(&self, config: &Config) -> Format {
        self.format
            .map(Format::from)
            .or(config.format)
            .or_else(|| self.output.as_deref().and_then(Format::from_path))
            .unwrap_or_default()
    }

    fn debug_flags(&self, config: &Config) -> Result<DebugFlags> {
        match self.debug.as_deref().or(config.debug.as_deref()) {
            Some(list) => DebugFlags::parse(list),
            None => Ok(DebugFlags::empty()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), &cli.input)?;
    logging::init(cli.debug_flags(&config)?)?;

    let document = generate_documentation(&cli, &config)?;
    match &cli.output {
        Some(path) => std::fs::write(path, &document)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn generate_documentation(cli: &Cli, config: &Config) -> Result<String> {
    let mut resolver = PathResolver::new().with_input_dir(parent_dir(&cli.input));
    if let Some(output) = &cli.output {
        resolver = resolver.with_output_dir(parent_dir(output));
    }

    let mut report = Report::new().with_resolver(resolver.clone());
    report
        .scan_file(&cli.input)
        .with_context(|| format!("Failed to document '{}'", cli.input.display()))?;

    if !(cli.keep_all || config.keep_all) {
        report.cull();
    }
    report.check_params()?;
    report.warn_param_mismatch();

    let mut options = RenderOptions::new().with_resolver(resolver);
    if let Some(title) = cli.title.as_deref().or(config.title.as_deref()) {
        options = options.with_title(
            report
                .parse_doc("title", title)
                .context("Failed to read the title")?,
        );
    }

    Ok(cli.format(config).generate(&report, &options)?)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cdoc").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_format_precedence() {
        let config = Config {
            format: Some(Format::Json),
            ..Config::default()
        };

        let cli = parse(&["list.h", "-o", "out/list.md"]);
        assert_eq!(cli.format(&Config::default()), Format::Md);
        assert_eq!(cli.format(&config), Format::Json);

        let cli = parse(&["list.h", "-f", "markdown", "-o", "out/list.html"]);
        assert_eq!(cli.format(&config), Format::Md);

        let cli = parse(&["list.h"]);
        assert_eq!(cli.format(&Config::default()), Format::Html);
    }

    #[test]
    fn test_debug_flags() {
        let config = Config {
            debug: Some("semantic".to_string()),
            ..Config::default()
        };
        assert_eq!(
            parse(&["a.h", "-d", "scanner,render"])
                .debug_flags(&config)
                .unwrap(),
            DebugFlags::SCANNER | DebugFlags::RENDER
        );
        assert_eq!(
            parse(&["a.h"]).debug_flags(&config).unwrap(),
            DebugFlags::SEMANTIC
        );
        assert!(parse(&["a.h", "-d", "bogus"])
            .debug_flags(&Config::default())
            .is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cdoc", "a.h", "-f", "pdf"]).is_err());
    }

    #[test]
    fn test_generate_documentation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stack.h");
        fs::write(
            &input,
            "/** A stack. */\n\n/** Pushes `x`.\n @param[x] Value. */\nvoid push(int x);\n\nstatic int hidden;\n",
        )
        .unwrap();
        let input = input.to_string_lossy().into_owned();

        let cli = parse(&[input.as_str(), "-t", "Stack _API_"]);
        let html = generate_documentation(&cli, &Config::default()).unwrap();
        assert!(html.contains("<h1>Stack <em>API</em></h1>"));
        assert!(html.contains("id=\"fn:push\""));
        assert!(!html.contains("hidden"));

        let cli = parse(&[input.as_str(), "--keep-all", "-f", "json"]);
        let json = generate_documentation(&cli, &Config::default()).unwrap();
        assert!(json.contains("\"hidden\""));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.h").to_string_lossy().into_owned();
        let cli = parse(&[input.as_str()]);
        assert!(generate_documentation(&cli, &Config::default()).is_err());
    }
}
