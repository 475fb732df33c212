// Command-line interface for multilogue
//
// This binary converts dialogues between their three shapes (script, HTML, chat messages) and
// drives the two halves of a model exchange from the shell. The conversions themselves live in
// the multilogue-babel crate; this crate only does I/O, configuration and error reporting.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  multilogue <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  multilogue convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  multilogue format <input>                  - Print the canonical form of a script
//  multilogue request <input>                 - Print the worker request for a dialogue
//  multilogue append <script> --reply <file>  - Apply a worker outcome to a script
//  multilogue generate-css                    - Print the default stylesheet
//  multilogue --list-formats                  - List available formats
//
// Extra Parameters:
//
// Parameters can be passed using --extra-<parameter-name> <value>.
// A few keys adjust the configuration (standalone, title, css, machine-name, worker,
// default-role); for convert the rest go to the target format, for request and append they
// become worker settings.
// Example:
//  multilogue request republic.plato --extra-temperature 0.4 --extra-model gpt-4o-mini

use clap::{Arg, ArgAction, Command, ValueHint};
use multilogue_babel::formats::messages::to_messages;
use multilogue_babel::transforms::normalize_script_with_rules;
use multilogue_babel::worker::{Exchange, Settings, WorkerOutcome};
use multilogue_babel::{
    default_css, FormatRegistry, HtmlFormat, HtmlOptions, MessagesFormat, Role, ScriptFormat,
    ScriptRules,
};
use multilogue_config::{Loader, MultilogueConfig};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MULTILOGUE_LOG";
const SUBCOMMANDS: &[&str] = &[
    "convert",
    "format",
    "request",
    "append",
    "generate-css",
    "help",
];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with("--") && next != "-");

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("multilogue")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert multi-party dialogues between scripts, HTML and chat messages")
        .long_about(
            "multilogue works with dialogue scripts: plain text where every turn starts\n\
            with a `Speaker (role):` header.\n\n\
            Commands:\n  \
            - convert:  Transform between script, html and messages (default command)\n  \
            - format:   Print the canonical form of a script\n  \
            - request:  Build the JSON request sent to a model worker\n  \
            - append:   Append a worker reply to a script\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass options and worker settings.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            multilogue republic.plato --to html                    # HTML turn blocks on stdout\n  \
            multilogue republic.plato --to html --extra-standalone # Complete page\n  \
            multilogue page.html --to script -o republic.plato     # Back to a script\n  \
            multilogue request republic.plato --extra-temperature 0.4",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a multilogue.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug details to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between dialogue formats (default command)")
                .long_about(
                    "Convert dialogues between formats.\n\n\
                    Supported formats:\n  \
                    - script:   Plain-text script (.plato, .txt, .text, .md)\n  \
                    - html:     HTML turn blocks, optionally a full page (.html, .htm)\n  \
                    - messages: Chat message list as JSON (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    HTML input is read leniently: turn blocks that cannot be read are\n\
                    skipped with a warning on stderr.",
                )
                .arg(input_arg("Input file path"))
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("format")
                .about("Format a script")
                .long_about(
                    "Parse a script and print it in canonical form: every header carries\n\
                    its role, lines are trimmed and exactly one blank line separates\n\
                    paragraphs and turns.\n\n\
                    Output is always written to stdout.",
                )
                .arg(input_arg("Script file path")),
        )
        .subcommand(
            Command::new("request")
                .about("Print the worker request built from a dialogue")
                .arg(input_arg("Input file path"))
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("append")
                .about("Append a worker reply to a script")
                .long_about(
                    "Read a worker outcome (JSON) and append its reply to the script as a new\n\
                    turn named after the configured machine.\n\n\
                    A worker error is reported on stderr and nothing is written.",
                )
                .arg(input_arg("Script file path"))
                .arg(
                    Arg::new("reply")
                        .long("reply")
                        .value_name("FILE")
                        .help("Worker outcome JSON, or '-' for stdin")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the default CSS used for standalone HTML")
                .long_about(
                    "Outputs the stylesheet embedded in standalone HTML pages.\n\n\
                    Use this as a starting point for custom styling, then pass the\n\
                    edited file via --extra-css to extend the default styles.",
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&config);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = required(sub_matches, "input");
            let to = required(sub_matches, "to");
            let from = resolve_from(input, sub_matches.get_one::<String>("from"), &config);
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("format", sub_matches)) => {
            let input = required(sub_matches, "input");
            handle_format_command(input, &config);
        }
        Some(("request", sub_matches)) => {
            let input = required(sub_matches, "input");
            let from = resolve_from(input, sub_matches.get_one::<String>("from"), &config);
            handle_request_command(input, &from, &extra_params, &config);
        }
        Some(("append", sub_matches)) => {
            let input = required(sub_matches, "input");
            let reply = required(sub_matches, "reply");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_append_command(input, reply, output, &extra_params, &config);
        }
        Some(("generate-css", _)) => {
            handle_generate_css_command();
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; `--verbose` wins over `MULTILOGUE_LOG`, which wins over `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn required<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(1);
        }
    }
}

/// Explicit `--from`, or the format registered for the input's extension
fn resolve_from(input: &str, explicit: Option<&String>, config: &MultilogueConfig) -> String {
    if let Some(from) = explicit {
        return from.to_string();
    }
    match registry_from_config(config).detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

/// Registry whose formats carry the configured script rules and HTML options
fn registry_from_config(config: &MultilogueConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(ScriptFormat::new(ScriptRules::from(&config.script)));
    registry.register(HtmlFormat::new(HtmlOptions::from(&config.html)));
    registry.register(MessagesFormat);
    registry
}

fn read_input(path: &str) -> String {
    if path == "-" {
        let mut source = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        }
        return source;
    }
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{text}"),
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &MultilogueConfig,
) {
    let registry = registry_from_config(config);

    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    debug!(turns = doc.len(), from, to, "parsed input");

    let result = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    write_output(output, &result);
}

/// Handle the format command
fn handle_format_command(input: &str, config: &MultilogueConfig) {
    let source = read_input(input);
    let rules = ScriptRules::from(&config.script);
    let formatted = normalize_script_with_rules(&source, &rules).unwrap_or_else(|e| {
        eprintln!("Error in '{input}': {e}");
        std::process::exit(1);
    });
    print!("{formatted}");
}

/// Handle the request command
fn handle_request_command(
    input: &str,
    from: &str,
    extra_params: &HashMap<String, String>,
    config: &MultilogueConfig,
) {
    let registry = registry_from_config(config);
    let source = read_input(input);
    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let mut exchange = exchange_from_config(config, extra_params);
    let request = exchange.begin(to_messages(&doc)).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let json = request.to_json().unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

/// Handle the append command
///
/// Each invocation replays the exchange: the request is rebuilt from the script
/// (always the first request of a fresh exchange, so its id matches what
/// `request` printed) and the outcome is resolved against that same script.
fn handle_append_command(
    input: &str,
    reply: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &MultilogueConfig,
) {
    let source = read_input(input);
    let rules = ScriptRules::from(&config.script);
    let registry = registry_from_config(config);
    let doc = registry.parse(&source, "script").unwrap_or_else(|e| {
        eprintln!("Error in '{input}': {e}");
        std::process::exit(1);
    });

    let outcome = WorkerOutcome::from_json(&read_input(reply)).unwrap_or_else(|e| {
        eprintln!("Invalid worker outcome: {e}");
        std::process::exit(1);
    });

    let mut exchange = exchange_from_config(config, extra_params).with_rules(rules);
    if let Err(e) = exchange.begin(to_messages(&doc)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let script = exchange
        .resolve_against(outcome, &source)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    write_output(output, &script);
}

/// Handle the generate-css command
fn handle_generate_css_command() {
    print!("{}", default_css());
}

/// Handle the list-formats command
fn handle_list_formats_command(config: &MultilogueConfig) {
    let registry = registry_from_config(config);
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {:<10} {} (.{})",
                name,
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }
}

fn exchange_from_config(
    config: &MultilogueConfig,
    extra_params: &HashMap<String, String>,
) -> Exchange {
    let mut settings = Settings::from(&config.settings);
    settings.merge(Settings::from_pairs(extra_params));
    Exchange::new(config.machine.clone(), settings)
}

fn load_cli_config(explicit_path: Option<&str>) -> MultilogueConfig {
    let loader = Loader::new().with_optional_file("multilogue.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(
    config: &mut MultilogueConfig,
    extra_params: &mut HashMap<String, String>,
) {
    if let Some(raw) = extra_params.remove("standalone") {
        config.html.standalone = parse_bool_arg("standalone", &raw);
    }
    if let Some(title) = extra_params.remove("title") {
        config.html.title = Some(title);
    }
    if let Some(path) = take_override(extra_params, &["css", "css-path"]) {
        let css = fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("Error reading CSS file '{path}': {e}");
            std::process::exit(1);
        });
        config.html.custom_css = Some(css);
    }

    if let Some(name) = take_override(extra_params, &["machine-name", "name"]) {
        config.machine.name = name;
    }
    if let Some(worker) = extra_params.remove("worker") {
        config.machine.worker = Some(worker);
    }

    if let Some(raw) = take_override(extra_params, &["default-role", "role"]) {
        config.script.default_role = Role::new(&raw).unwrap_or_else(|e| {
            eprintln!("Invalid value for --extra-default-role: {e}");
            std::process::exit(1);
        });
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
