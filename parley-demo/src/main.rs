use std::process::ExitCode;

use anyhow::Context;
use lazy_format::lazy_format;
use parley::{
    ActionKind, Argument, ArgumentParser, ConfigError, Converter, Dispatcher, NArgs, Namespace,
    ParseError, Subcommand,
};
use tracing::debug;

mod error;

fn build_parser() -> Result<ArgumentParser, ConfigError> {
    let mut parser = ArgumentParser::builder()
        .prog("notes")
        .description("Keep a small list of notes.")
        .epilog("Set RUST_LOG=parley=debug to trace argument matching.")
        .version("{prog} 0.1.0")
        .build();

    parser.add_argument(
        Argument::new(["-v", "--verbose"])
            .action(ActionKind::Count)
            .default(0)
            .help("print more detail; repeat for even more"),
    )?;
    parser.add_argument(Argument::new(["-V", "--version"]).action(ActionKind::Version))?;
    parser.add_argument(
        Argument::new(["--color"])
            .action(ActionKind::BooleanOptional)
            .default(true)
            .help("colorize output (default: {default})"),
    )?;

    parser.add_subparsers(
        Dispatcher::default()
            .title("commands")
            .dest("command")
            .required(true),
    )?;

    let add = parser.add_subparser(Subcommand::new("add").help("add a note"))?;
    add.add_argument(Argument::new(["text"]).nargs(NArgs::OneOrMore).help("the note itself"))?;
    add.add_argument(
        Argument::new(["-t", "--tag"])
            .action(ActionKind::Append)
            .help("tag the note; may be given more than once"),
    )?;
    add.add_argument(
        Argument::new(["-p", "--priority"])
            .converter(Converter::int())
            .choices([1, 2, 3])
            .default(2)
            .help("how urgent the note is (default: {default})"),
    )?;

    let list = parser.add_subparser(
        Subcommand::new("list")
            .alias("ls")
            .help("list notes"),
    )?;
    list.add_argument(
        Argument::new(["-n", "--limit"])
            .converter(Converter::int())
            .default("10")
            .help("show at most N notes")
            .metavar("N"),
    )?;
    let mut filters = list.add_mutually_exclusive_group(false);
    filters.add_argument(Argument::new(["--tag"]).help("only notes with this tag"))?;
    filters.add_argument(
        Argument::new(["--untagged"])
            .action(ActionKind::StoreTrue)
            .help("only notes without tags"),
    )?;

    let remove = parser.add_subparser(
        Subcommand::new("remove")
            .alias("rm")
            .help("remove notes by number"),
    )?;
    remove.add_argument(
        Argument::new(["ids"])
            .nargs(NArgs::OneOrMore)
            .converter(Converter::int())
            .metavar("ID"),
    )?;

    parser.add_subparser(
        Subcommand::new("purge")
            .help("remove every note")
            .deprecated(true),
    )?;

    Ok(parser)
}

fn describe(namespace: &Namespace) -> anyhow::Result<String> {
    let command = error::string(namespace, "command")?;

    let summary = match command {
        "add" => {
            let text = error::strings(namespace, "text")?.join(" ");
            let tags = error::strings(namespace, "tag")?;
            let priority = error::int(namespace, "priority")?;

            format!(
                "add {text:?} at priority {priority}{}",
                lazy_format!(match (tags.is_empty()) {
                    true => (""),
                    false => (" tagged {}", tags.join(", ")),
                })
            )
        }
        "list" | "ls" => {
            let limit = error::int(namespace, "limit")?;
            let tag = namespace.get("tag").and_then(|tag| tag.as_str());
            let filter = match (tag, error::flag(namespace, "untagged")?) {
                (Some(tag), _) => format!(" tagged {tag}"),
                (None, true) => " without tags".to_owned(),
                (None, false) => String::new(),
            };

            format!("list up to {limit} notes{filter}")
        }
        "remove" | "rm" => {
            let ids = namespace.get("ids").context("no note ids were parsed")?;
            format!("remove notes {ids}")
        }
        other => format!("{other} every note"),
    };

    Ok(summary)
}

fn exit_code(status: i32) -> ExitCode {
    u8::try_from(status).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn run() -> anyhow::Result<ExitCode> {
    let parser = build_parser().context("failed to declare the command line")?;

    let namespace = match parser.parse_args(std::env::args().skip(1)) {
        Ok(namespace) => namespace,
        Err(ParseError::Exit(exit)) => {
            print!("{}", exit.output);
            return Ok(exit_code(exit.status));
        }
        Err(error) => {
            eprint!("{}", parser.format_error(&error));
            return Ok(exit_code(error.status()));
        }
    };

    debug!(arguments = namespace.len(), "parsed the command line");

    for warning in namespace.warnings() {
        eprintln!("{}: warning: {warning}", parser.prog());
    }

    if error::int(&namespace, "verbose")? > 0 {
        for (dest, value) in namespace.iter() {
            eprintln!("{dest} = {}", value.repr());
        }
    }

    println!("{}", describe(&namespace)?);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
