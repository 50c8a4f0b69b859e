use std::error::Error;
use std::fs;
use std::io::{self, Read};

use clap::{Parser, ValueEnum};
use jsoncast::{CastingLevel, DebugLevel, Definition, Item, Model, ParseOptions};

#[derive(Parser, Debug)]
#[command(name = "jsoncast", version, about = "jsoncast document checker")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Diagnostic level: simple, warning, info (default: simple).
    #[arg(long, value_enum, value_name = "level", default_value_t = DebugArg::Simple)]
    debug: DebugArg,

    /// Root type of the document, e.g. Integer or String.
    #[arg(long, value_name = "name")]
    root: Option<String>,

    /// Print the parsed item tree instead of `ok`.
    #[arg(long)]
    outline: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DebugArg {
    Simple,
    Warning,
    Info,
}

impl From<DebugArg> for DebugLevel {
    fn from(value: DebugArg) -> Self {
        match value {
            DebugArg::Simple => DebugLevel::Simple,
            DebugArg::Warning => DebugLevel::Warning,
            DebugArg::Info => DebugLevel::Info,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if args.debug != DebugArg::Simple {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .init();
    }

    let input = read_input(args.input.as_deref())?;
    let definition = Definition::new(Model::basic("cli"), CastingLevel::Never)?;
    let options = ParseOptions::new().with_debug_level(args.debug.into());
    let root = args.root.as_deref();
    let item = jsoncast::parse_reader(input.as_bytes(), &definition, root, &options)?;

    if args.outline {
        let mut out = String::new();
        write_outline(&mut out, &item, 0);
        print!("{out}");
    } else {
        println!("ok");
    }
    Ok(())
}

fn read_input(input: Option<&str>) -> Result<String, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

fn write_outline(out: &mut String, item: &Item, depth: usize) {
    match item {
        Item::Value(value) if value.is_quoted() => {
            out.push_str(&format!("{} {:?}\n", item.print_class_name(), value.value()));
        }
        Item::Value(value) => {
            out.push_str(&format!("{} {}\n", item.print_class_name(), value.value()));
        }
        Item::Object(object) => {
            out.push_str(&format!("{} ({} keys)\n", item.print_class_name(), object.len()));
            for key in object.keys() {
                let Some(param) = object.param(key) else {
                    continue;
                };
                push_indent(out, depth + 1);
                out.push_str(key);
                out.push_str(": ");
                write_outline(out, param, depth + 1);
            }
        }
        Item::List(list) => {
            out.push_str(&format!("{} ({} items)\n", item.print_class_name(), list.items().len()));
            for element in list.items() {
                push_indent(out, depth + 1);
                out.push_str("- ");
                write_outline(out, element, depth + 1);
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
