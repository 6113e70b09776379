//! Punto de entrada ("driver").
//!
//! Este módulo lee una gramática y una cadena de entrada, ejecuta el
//! análisis y presenta la traza de pasos junto con el código generado.

use anyhow::{self, bail, Context};
use bitflags::bitflags;
use clap::{crate_version, Arg, Command};
use shiftreduce::{
    codegen,
    error::Diagnostics,
    grammar,
    parse::{self, Step, Trace},
    source::Source,
};

use std::{
    fs,
    io::{self, Read, Write},
    process,
};

bitflags! {
    /// Secciones del reporte.
    struct Sections: u32 {
        const STEPS = 0b01;
        const CODE  = 0b10;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parsing de CLI
    let args = Command::new("shiftreduce")
        .version(crate_version!())
        .about("Shift-reduce parser driven by a user grammar")
        .arg(
            Arg::new("grammar")
                .short('g')
                .long("grammar")
                .value_name("FILE")
                .takes_value(true)
                .required(true)
                .help("Grammar file, one `A -> rhs` rule per line ('-' for stdin)"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("TOKENS")
                .takes_value(true)
                .help("Space-separated input tokens (read from stdin if absent)"),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .value_name("SYMBOL")
                .takes_value(true)
                .help("Require the input to reduce to this symbol"),
        )
        .arg(
            Arg::new("steps-only")
                .long("steps-only")
                .conflicts_with("code-only")
                .help("Print only the step table"),
        )
        .arg(
            Arg::new("code-only")
                .long("code-only")
                .help("Print only the three-address code"),
        )
        .get_matches();

    let grammar_path = args.value_of("grammar").unwrap_or("-");
    let input = args.value_of("input");

    if grammar_path == "-" && input.is_none() {
        bail!("Grammar and input cannot both be read from stdin");
    }

    let mut sections = Sections::all();
    if args.is_present("steps-only") {
        sections = Sections::STEPS;
    } else if args.is_present("code-only") {
        sections = Sections::CODE;
    }

    // Compilación de la gramática
    let (name, text) = match grammar_path {
        "-" => ("<stdin>", read_stdin().context("Failed to read grammar from stdin")?),
        path => (
            path,
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read grammar: {}", path))?,
        ),
    };

    let table = match grammar::compile_source(&Source::new(name, &text)) {
        Ok(table) => table,
        Err(error) => {
            eprint!("{}", Diagnostics::from(error).kind("Grammar error"));
            process::exit(1);
        }
    };

    // Análisis
    let input = match input {
        Some(input) => input.to_owned(),
        None => read_stdin()
            .context("Failed to read input from stdin")?
            .lines()
            .collect::<Vec<_>>()
            .join(" "),
    };

    let trace = parse::parse(&input, &table);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    report(&trace, sections, &mut stdout).context("Failed to write report")?;

    if let Some(start) = args.value_of("start") {
        if !trace.accepts(start) {
            bail!("Input was not reduced to `{}`", start);
        }
    }

    Ok(())
}

fn read_stdin() -> io::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn report<W: Write>(trace: &Trace, sections: Sections, output: &mut W) -> io::Result<()> {
    if sections.contains(Sections::STEPS) {
        let rows: Vec<_> = trace.steps().iter().map(row).collect();

        let stack_width = column_width("Stack", rows.iter().map(|row| &row[0]));
        let input_width = column_width("Input", rows.iter().map(|row| &row[1]));

        writeln!(
            output,
            "{:stack_width$}  {:input_width$}  Action",
            "Stack",
            "Input",
            stack_width = stack_width,
            input_width = input_width
        )?;

        for [stack, input, action] in &rows {
            writeln!(
                output,
                "{:stack_width$}  {:input_width$}  {}",
                stack,
                input,
                action,
                stack_width = stack_width,
                input_width = input_width
            )?;
        }
    }

    if sections.contains(Sections::CODE) {
        if sections.contains(Sections::STEPS) {
            writeln!(output)?;
        }

        codegen::write(trace.code(), output)?;
    }

    Ok(())
}

fn row(step: &Step) -> [String; 3] {
    [
        join_or_empty(&step.stack),
        join_or_empty(&step.buffer),
        step.action.to_string(),
    ]
}

fn join_or_empty<S: AsRef<str>>(symbols: &[S]) -> String {
    if symbols.is_empty() {
        String::from("(empty)")
    } else {
        symbols
            .iter()
            .map(|symbol| symbol.as_ref())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

fn column_width<'a, I>(header: &str, cells: I) -> usize
where
    I: Iterator<Item = &'a String>,
{
    cells
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
