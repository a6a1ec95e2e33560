// ABOUTME: CLI for running IPS forum page schemas against saved HTML documents.
// ABOUTME: Extracts a page to JSON, Markdown or text, dumps the schemas and validates their selectors.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ipsforum_schema::{PageKind, Record};
use ipsforum_view::document::extract_charset;
use ipsforum_view::{decode_document, Engine, Html, Page};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ipsforum")]
#[command(about = "Extract structured data from saved IPS forum pages", long_about = None)]
struct Cli {
    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a page schema against an HTML document
    Extract(ExtractArgs),
    /// Print page schemas as JSON
    Schema {
        /// Only print this page (login, index, forum, topic)
        #[arg(long)]
        page: Option<PageKind>,
    },
    /// Compile every selector of every page schema
    Validate,
}

#[derive(clap::Args, Debug)]
struct ExtractArgs {
    /// Page type of the document (login, index, forum, topic)
    #[arg(long, required_unless_present = "schema", conflicts_with = "schema")]
    page: Option<PageKind>,

    /// Load the page schema from a JSON file instead
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Base URL that relative links are resolved against
    #[arg(long)]
    base_url: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print the generic extraction tree instead of the typed record
    #[arg(long)]
    raw: bool,

    /// Fail on missing required fields and ambiguous matches
    #[arg(long)]
    strict: bool,

    /// Document charset or a full Content-Type value, when the file does not declare one
    #[arg(long)]
    charset: Option<String>,

    /// Output compact JSON instead of pretty
    #[arg(long)]
    compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to read. Use "-" or leave out to read stdin.
    input: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    #[value(alias = "md")]
    Markdown,
    #[value(alias = "txt")]
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Extract(args) => run_extract(&args),
        Command::Schema { page } => run_schema(page),
        Command::Validate => run_validate(),
    }
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let mut builder = Engine::builder().strict(args.strict);
    if let Some(base) = &args.base_url {
        builder = builder.base_url_str(base)?;
    }
    let engine = builder.build();

    let bytes = load_bytes(args.input.as_deref())?;
    let charset = args
        .charset
        .as_deref()
        .map(|c| extract_charset(c).unwrap_or_else(|| c.to_string()));
    let html = decode_document(&bytes, charset.as_deref());
    let doc = Html::parse_document(&html);
    debug!(bytes = bytes.len(), "document loaded");

    let output = match (&args.schema, args.page) {
        (Some(path), _) => {
            if args.format != Format::Json {
                bail!("--schema only supports json output");
            }
            let page = load_schema(path)?;
            let values = engine.extract_page(&doc, &page)?;
            to_json(&values, args.compact)?
        }
        (None, Some(kind)) => {
            let values = engine.extract_page(&doc, kind.schema())?;
            if args.raw {
                if args.format != Format::Json {
                    bail!("--raw only supports json output");
                }
                to_json(&values, args.compact)?
            } else {
                let record = Record::from_values(kind, &values)?;
                match args.format {
                    Format::Json => to_json(&record, args.compact)?,
                    Format::Markdown => record.to_markdown(),
                    Format::Text => record.to_text(),
                }
            }
        }
        (None, None) => bail!("one of --page or --schema is required"),
    };

    write_output(args.output.as_deref(), &output)
}

fn run_schema(page: Option<PageKind>) -> Result<()> {
    let output = match page {
        Some(kind) => to_json(kind.schema(), false)?,
        None => {
            let pages: Vec<&Page> = PageKind::ALL.iter().map(|k| k.schema()).collect();
            to_json(&pages, false)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn run_validate() -> Result<()> {
    let engine = Engine::default();
    let mut failed = 0;

    for kind in PageKind::ALL {
        let page = kind.schema();
        match engine.validate(page) {
            Ok(()) => println!("ok      {} ({} locators)", kind, page.locators().len()),
            Err(e) => {
                println!("failed  {}: {}", kind, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} page schema(s) failed validation", failed);
    }
    info!("all page schemas valid");
    Ok(())
}

fn load_bytes(input: Option<&str>) -> Result<Vec<u8>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
        Some(target) => {
            let path = PathBuf::from(target);
            if !path.exists() {
                return Err(anyhow!("file not found: {}", target));
            }
            fs::read(&path).with_context(|| format!("reading {}", target))
        }
    }
}

fn load_schema(path: &Path) -> Result<Page> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading schema {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing schema {}", path.display()))
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{}", output),
    }
    Ok(())
}
