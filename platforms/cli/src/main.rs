use clap::Parser;
use std::path::Path;
use std::process;
use tmsim::loader::DescriptionLoader;
use tmsim::machine::Machine;
use tmsim::{Catalog, DescriptionError};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine description file to run (.tm or .json)
    #[clap(short, long)]
    machine: Option<String>,

    /// The name of a built-in machine
    #[clap(short, long)]
    name: Option<String>,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// The input strings to simulate
    #[clap(short, long)]
    input: Vec<String>,

    /// Give up on inputs that have not halted after this many steps
    #[clap(short = 's', long)]
    max_steps: Option<usize>,

    /// Print the machine description before running
    #[clap(short, long)]
    describe: bool,

    /// Print the state after each transition
    #[clap(short, long)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DescriptionError> {
    if cli.list {
        for name in Catalog::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let description = match (&cli.machine, &cli.name) {
        (Some(path), _) => DescriptionLoader::load(Path::new(path))?,
        (None, Some(name)) => Catalog::by_name(name)?,
        (None, None) => {
            return Err(DescriptionError::Validation(
                "No machine given: pass --machine <file> or --name <built-in>".to_string(),
            ))
        }
    };

    let machine = Machine::new(description);

    if cli.describe {
        print!("{machine}");
    }

    for input in &cli.input {
        let shown = if input.is_empty() { "(empty)" } else { input };
        println!("{} => {}", shown, simulate(&machine, input, cli));
    }

    Ok(())
}

fn simulate(machine: &Machine<char>, input: &str, cli: &Cli) -> &'static str {
    if cli.trace {
        let mut run = machine.run(input.chars());
        println!("step {:>5}  state {}", run.steps(), run.state());

        while !run.halted() {
            if cli.max_steps.is_some_and(|max| run.steps() == max) {
                return "gave up";
            }
            run.step();
            println!("step {:>5}  state {}", run.steps(), run.state());
        }
        verdict(run.accepted())
    } else if let Some(max) = cli.max_steps {
        match machine.simulate_with_limit(input.chars(), max) {
            Some(accepted) => verdict(accepted),
            None => "gave up",
        }
    } else {
        verdict(machine.simulate(input.chars()))
    }
}

fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "accepted"
    } else {
        "rejected"
    }
}
