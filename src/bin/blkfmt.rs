use anyhow::{Context, Result, bail, format_err};
use clap::{ArgAction, Parser};
use dialoguer::Confirm;
use indoc::indoc;
use log::{LevelFilter, info, warn};

use blkfmt::{FormatError, FormatOverrides, RenderContext, Renderer, TraceParser};

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

const FORMAT_HELP: &str = indoc!(
    r#"
    Sets the output format for a single action, as `<action>,<format>`.
    May be repeated. Registering `M` also applies to back merges (`B`).

    Actions: A B C D F G M P Q R S T U W X

    Fields (`%[-][width]<field>`):
        %a action        %c cpu           %C process name
        %d rwbs flags    %D major,minor   %e error
        %M major         %m minor         %n sectors
        %N bytes         %p pid           %P payload hex dump
        %s sequence      %S sector        %t nanoseconds
        %T seconds       %u elapsed (us)  %U payload integer

    Escapes: \b \n \r \t, and %% for a literal `%`.
    "#
);

#[derive(Parser, Debug)]
#[command(
    name = "blkfmt",
    version,
    about = "Utility to render binary block I/O trace records as text"
)]
struct Cli {
    /// Trace file to read, reads stdin when missing or `-`.
    input: Option<PathBuf>,

    #[arg(
        short = 'F',
        long = "format-spec",
        value_name = "ACTION,FORMAT",
        action = ArgAction::Append,
        help = "Sets the output format for a single action, as `<action>,<format>`",
        long_help = FORMAT_HELP
    )]
    format_specs: Vec<String>,

    /// Sets the output format for every action without a `--format-spec`.
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    format: Option<String>,

    /// Writes output to the file specified instead of stdout, errors will still be printed to stderr.
    /// Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`.
    /// Will create parent directories if needed.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// When set, will not ask for confirmation before overwriting files, useful for automation.
    #[arg(long = "no-confirm-overwrite")]
    no_confirm_overwrite: bool,

    /// -v - info, -vv - debug, -vvv - trace.
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

struct BlkFmt {
    renderer: Renderer,
    input: Option<PathBuf>,
    output: Box<dyn Write>,
}

impl BlkFmt {
    fn from_cli(cli: Cli) -> Result<Self> {
        let mut overrides = FormatOverrides::new();
        for spec in &cli.format_specs {
            overrides
                .register(spec)
                .with_context(|| format!("invalid `--format-spec {spec}`"))?;
        }
        if let Some(format) = &cli.format {
            overrides.fill_unset(format);
        }
        info!("{} actions use a custom format", overrides.len());

        let output: Box<dyn Write> = match &cli.output {
            Some(path) => Box::new(BufWriter::new(
                create_output_file(path, !cli.no_confirm_overwrite).with_context(|| {
                    format!("failed to create output file at `{}`", path.display())
                })?,
            )),
            None => Box::new(BufWriter::new(io::stdout())),
        };

        Ok(BlkFmt {
            renderer: Renderer::new(overrides),
            input: cli.input,
            output,
        })
    }

    fn open_input(&self) -> Result<Box<dyn Read>> {
        match self.input.as_deref() {
            None => Ok(Box::new(io::stdin().lock())),
            Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open trace file `{}`", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }

    /// Main entry point for `BlkFmt`
    fn run(&mut self) -> Result<()> {
        let input = self.open_input()?;
        let mut rendered = 0_u64;

        for record in TraceParser::new(input) {
            let record = record.context("failed to decode trace record")?;
            let cpu = record.cpu();
            let event = record.into_event();
            let ctx = RenderContext::new(cpu, &event);

            match self.renderer.render_event(&mut self.output, &ctx) {
                Ok(()) => rendered += 1,
                Err(e) if e.is_fatal() || matches!(e, FormatError::Io(_)) => {
                    return Err(e).context(format!(
                        "failed to render event {} on cpu {}",
                        event.sequence, cpu
                    ));
                }
                Err(e) => warn!("skipping event {} on cpu {}: {}", event.sequence, cpu, e),
            }
        }

        self.output.flush().context("failed to flush output")?;
        info!("rendered {rendered} events");

        Ok(())
    }
}

/// If `prompt` is passed, will display a confirmation prompt before overwriting files.
fn create_output_file(path: &Path, prompt: bool) -> Result<File> {
    if path.is_dir() {
        bail!(
            "There is a directory at {}, refusing to overwrite",
            path.display()
        );
    }

    if path.exists() && prompt {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to override output file at {}",
                path.display()
            ))
            .default(false)
            .interact()
            .context("failed to write confirmation prompt to term")?;

        if !confirmed {
            return Err(format_err!("Cancelled"));
        }
    }

    // Ok to assume path is not an existing directory.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(File::create(path)?)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3 => LevelFilter::Trace,
        _ => {
            eprintln!("using more than -vvv does not affect verbosity level");
            LevelFilter::Trace
        }
    };

    if let Err(e) = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = BlkFmt::from_cli(cli).and_then(|mut app| app.run());

    if let Err(e) = result {
        eprintln!("{e:?}");
        exit(1);
    }
}
