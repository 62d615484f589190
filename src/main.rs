mod debug_report;

use chrono::NaiveDate;
use std::io::{self, IsTerminal, Read};
use timex::{CategoryMask, Context, DocumentType, Language, Options, SentenceContainer, Tagger};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "TIMEX_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut options = Options::default();
    if config.temponyms {
        options.categories |= CategoryMask::TEMPONYM;
    }
    let tagger = match Tagger::new(config.language, options) {
        Ok(tagger) => tagger,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let context = Context { document_type: config.document_type, dct: config.dct };
    let sentences = SentenceContainer::split_document(&config.input);
    let result = tagger.tag_document(&sentences, &context);
    debug_report::print_run(&config.input, &tagger, &result, config.color);
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
}

struct CliConfig {
    input: String,
    language: Language,
    document_type: DocumentType,
    dct: Option<NaiveDate>,
    temponyms: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut language = Language::English;
    let mut document_type = DocumentType::Narrative;
    let mut dct: Option<NaiveDate> = None;
    let mut temponyms = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("timex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--temponyms" => temponyms = true,
            "--language" | "-l" => {
                let value = args.next().ok_or_else(|| "error: --language expects a value".to_string())?;
                language = parse_language(&value)?;
            }
            "--dct" => {
                let value = args.next().ok_or_else(|| "error: --dct expects a value".to_string())?;
                dct = Some(parse_dct(&value)?);
            }
            "--type" => {
                let value = args.next().ok_or_else(|| "error: --type expects a value".to_string())?;
                document_type = parse_document_type(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--language=") => language = parse_language(arg.trim_start_matches("--language="))?,
            _ if arg.starts_with("--dct=") => dct = Some(parse_dct(arg.trim_start_matches("--dct="))?),
            _ if arg.starts_with("--type=") => document_type = parse_document_type(arg.trim_start_matches("--type="))?,
            _ if arg.starts_with("--input=") => set_input(&mut input, arg.trim_start_matches("--input=").to_string())?,
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }
    if document_type == DocumentType::News && dct.is_none() {
        tracing::warn!("news document without --dct, relative expressions anchor on earlier mentions");
    }

    Ok(CliConfig { input, language, document_type, dct, temponyms, color })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|err| format!("error: {err}"))
}

fn parse_document_type(value: &str) -> Result<DocumentType, String> {
    value.parse().map_err(|err| format!("error: {err}"))
}

fn parse_dct(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("error: invalid --dct '{value}' (expected YYYY-MM-DD)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "timex {version}

Rule-based temporal expression tagger.

Usage:
  timex [OPTIONS] [--] <input...>
  timex [OPTIONS] --input <text>

Options:
  -i, --input <text>         Input text to tag. If omitted, reads remaining args
                             or stdin when no args are provided.
  -l, --language <name>      Rule language: english, german, french (or en, de, fr).
                             Default: english
  --type <news|narrative>    Document type. News documents anchor relative
                             expressions on --dct. Default: narrative
  --dct <date>               Document creation time in YYYY-MM-DD.
  --temponyms                Also run temponym rules.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                  Log filter (tracing EnvFilter syntax). Default: warn

Exit codes:
  0  Success.
  1  Rule set could not be built.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
