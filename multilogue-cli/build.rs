use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the format names registered in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_FORMATS: &[&str] = &["script", "html", "messages"];

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("multilogue")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert multi-party dialogues between scripts, HTML and chat messages")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a multilogue.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between dialogue formats")
                .arg(input_arg())
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format").required(true))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("format")
                .about("Format a script")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("request")
                .about("Print the worker request built from a dialogue")
                .arg(input_arg())
                .arg(format_arg("from", "Source format")),
        )
        .subcommand(
            Command::new("append")
                .about("Append a worker reply to a script")
                .arg(input_arg())
                .arg(
                    Arg::new("reply")
                        .long("reply")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("generate-css").about("Output the default CSS used for standalone HTML"),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "multilogue", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "multilogue", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "multilogue", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
