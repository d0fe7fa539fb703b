//! Purpose: `fsdjson` CLI entry point.
//! Role: Binary crate root; parses args, runs one conversion, reports errors on stderr.
//! Invariants: Fewer than three positionals prints `Missing arguments!` on stdout and exits 0.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use tracing_subscriber::EnvFilter;

mod diagnostics;

use diagnostics::emit_error;
use fsdjson::api::{
    ConvertRequest, Error, ErrorKind, ExecLoader, Loader, LoaderRegistry, convert, to_exit_code,
};

const MISSING_ARGUMENTS: &str = "Missing arguments!";

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

#[derive(Parser)]
#[command(
    name = "fsdjson",
    version,
    about = "Convert FSD shared-cache data into JSON",
    long_about = r#"Convert FSD shared-cache data into JSON.

A loader turns the input resource into a value graph, which is written to
OUTPUT as a single JSON document. Opaque maps become objects (keys encoded to
JSON text), opaque lists become arrays, and records become objects of their
public attributes.

Examples:
  $ fsdjson tree types.tree.json types.json
  $ fsdjson exec:./fsd-decode res:/staticdata/types.fsdbinary types.json \
      --shared-cache ~/EVE/SharedCache
  $ fsdjson --list-loaders"#
)]
struct Cli {
    #[arg(
        value_name = "LOADER",
        help = "Loader name (see --list-loaders) or exec:<program>"
    )]
    loader: Option<String>,
    #[arg(
        value_name = "INPUT",
        help = "Input path, or a res:/ or app:/ shared cache resource"
    )]
    input: Option<String>,
    #[arg(
        value_name = "OUTPUT",
        help = "JSON output path (created or truncated)",
        value_hint = ValueHint::FilePath
    )]
    output: Option<PathBuf>,
    #[arg(hide = true)]
    extra: Vec<String>,
    #[arg(
        long,
        env = "FSDJSON_SHARED_CACHE",
        help = "Game SharedCache directory used to resolve res:/ and app:/ inputs",
        value_hint = ValueHint::DirPath
    )]
    shared_cache: Option<PathBuf>,
    #[arg(long, help = "Indent the JSON output")]
    pretty: bool,
    #[arg(long, help = "List registered loaders and exit")]
    list_loaders: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `fsdjson --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };
    let color_mode = cli.color;
    execute(cli).map_err(|err| (err, color_mode))
}

fn execute(cli: Cli) -> Result<RunOutcome, Error> {
    let registry = LoaderRegistry::with_builtins();

    if cli.list_loaders {
        for loader in registry.loaders() {
            println!("{}\t{}", loader.name(), loader.summary());
        }
        let exec = ExecLoader::new("<program>");
        println!("{}\t{}", exec.name(), exec.summary());
        return Ok(RunOutcome::ok());
    }

    let (Some(loader), Some(input), Some(output)) = (cli.loader, cli.input, cli.output) else {
        println!("{MISSING_ARGUMENTS}");
        return Ok(RunOutcome::ok());
    };
    if !cli.extra.is_empty() {
        tracing::warn!(ignored = ?cli.extra, "ignoring extra arguments");
    }

    let mut request = ConvertRequest::new(&loader, &input, &output).with_pretty(cli.pretty);
    if let Some(dir) = cli.shared_cache.as_deref() {
        request = request.with_shared_cache(dir);
    }
    convert(&registry, &request)?;
    Ok(RunOutcome::ok())
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
