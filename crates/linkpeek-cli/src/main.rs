use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkpeek_core::PreviewError;
use linkpeek_local::{classify, text, Settings, TextRange, Toolkit};

#[derive(Parser, Debug)]
#[command(name = "linkpeek")]
#[command(about = "Normalize and classify text pulled out of web pages", long_about = None)]
struct Cli {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", global = true, default_value = "json")]
    output: String,
    /// Substring clamp policy: legacy|length
    #[arg(long, global = true, env = "LINKPEEK_CLAMP")]
    clamp: Option<String>,
    /// Where HTML rendering runs: inline|thread
    #[arg(long, global = true, env = "LINKPEEK_RENDER")]
    render: Option<String>,
    /// Extra type declarations (JSON array) merged into the built-in table.
    #[arg(long, global = true, env = "LINKPEEK_TYPES_FILE")]
    types_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print version info.
    Version,
    /// Strip leading/trailing whitespace.
    Trim(TextArgs),
    /// Collapse whitespace runs to single spaces and trim.
    Squash(TextArgs),
    /// Remove markup tags, keeping text as is.
    StripTags(TextArgs),
    /// Render HTML to plain text, decoding entities.
    Decode(TextArgs),
    /// Extract a char range (either --start/--end or --location/--length).
    Substring(SubstringCmd),
    /// Report URL/image likeness of the input.
    Classify(TextArgs),
    /// Find the first URL in the input and resolve it.
    Url(UrlCmd),
    /// Resolve a filename extension or MIME type.
    Mime(MimeCmd),
}

#[derive(clap::Args, Debug)]
struct TextArgs {
    /// Input text. Read from stdin when omitted.
    text: Option<String>,
}

#[derive(clap::Args, Debug)]
struct SubstringCmd {
    #[command(flatten)]
    input: TextArgs,
    #[arg(long, default_value_t = 0, conflicts_with_all = ["location", "length"])]
    start: usize,
    #[arg(long, conflicts_with_all = ["location", "length"])]
    end: Option<usize>,
    #[arg(long)]
    location: Option<usize>,
    #[arg(long)]
    length: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct UrlCmd {
    #[command(flatten)]
    input: TextArgs,
    /// Base URL for relative candidates.
    #[arg(long)]
    base: Option<String>,
}

#[derive(clap::Args, Debug)]
#[command(group(clap::ArgGroup::new("tag").required(true).args(["ext", "mime"])))]
struct MimeCmd {
    /// Filename extension (or file name) to resolve.
    #[arg(long)]
    ext: Option<String>,
    /// MIME type to resolve.
    #[arg(long)]
    mime: Option<String>,
    /// Type identifier family to test against, e.g. public.image
    #[arg(long)]
    conforms: Option<String>,
}

fn load_env_file() {
    // Opt-in; never overrides variables already set in the process environment.
    let Ok(p) = std::env::var("LINKPEEK_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("LINKPEEK_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(args: TextArgs) -> Result<String> {
    match args.text {
        Some(t) => Ok(t),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read input from stdin")?;
            Ok(buf)
        }
    }
}

struct Printer {
    text: bool,
}

impl Printer {
    fn ok(&self, kind: &str, text_line: &str, fields: serde_json::Value) -> ExitCode {
        if self.text {
            println!("{text_line}");
        } else {
            let mut v = serde_json::json!({
                "schema_version": 1,
                "kind": kind,
                "ok": true,
            });
            if let (Some(obj), serde_json::Value::Object(extra)) = (v.as_object_mut(), fields) {
                obj.extend(extra);
            }
            println!("{v}");
        }
        ExitCode::SUCCESS
    }

    fn fail(&self, kind: &str, err: PreviewError) -> ExitCode {
        tracing::debug!(code = err.code(), context = ?err.context(), "preview error");
        if self.text {
            eprintln!("{err}");
        } else {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": kind,
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                    "context": err.context(),
                },
            });
            println!("{v}");
        }
        ExitCode::FAILURE
    }
}

fn main() -> Result<ExitCode> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_lookup(|k| match k {
        "LINKPEEK_CLAMP" => cli.clamp.clone(),
        "LINKPEEK_RENDER" => cli.render.clone(),
        "LINKPEEK_TYPES_FILE" => cli
            .types_file
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        _ => None,
    })?;
    let kit = Toolkit::from_settings(&settings)?;
    let out = Printer {
        text: cli.output.eq_ignore_ascii_case("text"),
    };

    let code = match cli.command {
        Commands::Version => out.ok(
            "version",
            &format!("linkpeek {}", env!("CARGO_PKG_VERSION")),
            serde_json::json!({
                "name": "linkpeek",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        Commands::Trim(args) => {
            let s = text::trim(&read_input(args)?);
            out.ok("trim", &s, serde_json::json!({ "text": s }))
        }
        Commands::Squash(args) => {
            let s = text::extended_trim(&read_input(args)?);
            out.ok("squash", &s, serde_json::json!({ "text": s }))
        }
        Commands::StripTags(args) => {
            let s = text::strip_tags(&read_input(args)?);
            out.ok("strip_tags", &s, serde_json::json!({ "text": s }))
        }
        Commands::Decode(args) => {
            let s = kit.decode_entities(&read_input(args)?);
            out.ok("decode", &s, serde_json::json!({ "text": s }))
        }
        Commands::Substring(args) => {
            let input = read_input(args.input)?;
            let s = if args.location.is_some() || args.length.is_some() {
                let range = TextRange::new(args.location.unwrap_or(0), args.length.unwrap_or(0));
                kit.substring_range(&input, range)
            } else {
                let end = args
                    .end
                    .context("substring needs --end (or --location/--length)")?;
                kit.substring(&input, args.start, end)
            };
            out.ok("substring", &s, serde_json::json!({ "text": s }))
        }
        Commands::Classify(args) => {
            let input = read_input(args)?;
            let is_url = classify::is_valid_url(&input);
            let is_image = classify::is_image(&input);
            let first = classify::first_url(&input);
            out.ok(
                "classify",
                &format!(
                    "url={is_url} image={is_image} first_url={}",
                    first.as_deref().unwrap_or("-")
                ),
                serde_json::json!({
                    "is_url": is_url,
                    "is_image": is_image,
                    "first_url": first,
                }),
            )
        }
        Commands::Url(args) => {
            let input = read_input(args.input)?;
            // A lone token is taken as the candidate itself; prose is searched.
            let trimmed = input.trim();
            let candidate = if !trimmed.is_empty() && !trimmed.contains(char::is_whitespace) {
                Some(trimmed.to_string())
            } else {
                classify::first_url(&input)
            };
            match candidate {
                None => {
                    let context = text::extended_trim(&input);
                    out.fail("url", PreviewError::NoUrlFound(Some(context)))
                }
                Some(candidate) => match classify::resolve_url(&candidate, args.base.as_deref()) {
                    None => out.fail("url", PreviewError::InvalidUrl(Some(candidate))),
                    Some(url) => out.ok(
                        "url",
                        &url,
                        serde_json::json!({
                            "url": url,
                            "candidate": candidate,
                            "is_image": classify::is_image(&url),
                        }),
                    ),
                },
            }
        }
        Commands::Mime(args) => {
            let (input, identifier) = match (&args.ext, &args.mime) {
                (Some(ext), _) => (ext.clone(), kit.types.identifier_for_extension(ext)),
                (None, Some(mime)) => (mime.clone(), kit.types.identifier_for_mime_type(mime)),
                (None, None) => anyhow::bail!("mime needs --ext or --mime"),
            };
            match identifier {
                None => out.fail("mime", PreviewError::InvalidMimeType(Some(input))),
                Some(id) => {
                    let mime_type = kit.types.mime_type_for_identifier(&id);
                    let extension = kit.types.extension_for_identifier(&id);
                    let conforms = args.conforms.as_deref().map(|family| match &args.ext {
                        Some(ext) => kit.types.extension_conforms_to(ext, family),
                        None => kit.types.mime_type_conforms_to(&input, family),
                    });
                    let line = format!(
                        "{id} {} {}{}",
                        mime_type.as_deref().unwrap_or("-"),
                        extension.as_deref().unwrap_or("-"),
                        conforms.map(|c| format!(" conforms={c}")).unwrap_or_default()
                    );
                    out.ok(
                        "mime",
                        &line,
                        serde_json::json!({
                            "identifier": id,
                            "mime_type": mime_type,
                            "extension": extension,
                            "conforms": conforms,
                        }),
                    )
                }
            }
        }
    };
    Ok(code)
}
