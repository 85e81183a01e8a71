//! `avm-exec`: runs a binary instruction stream and optionally exports the
//! final memory state as a sparse CSV dump.

use std::fs;
use std::process;

use clap::Parser;

use avm::Machine;

#[derive(Debug, Parser)]
#[clap(name = "avm-exec", about = "Execute a binary instruction stream")]
struct ExecCli {
  /// Binary instruction stream to execute
  #[clap(short, long, value_name = "FILE")]
  input: String,

  /// Write a CSV dump of the non-zero memory cells
  #[clap(short, long, value_name = "FILE")]
  output: Option<String>,

  /// Trace every instruction and print the final machine state
  #[clap(short, long)]
  verbose: bool,
}

fn main() {
  let cli = ExecCli::parse();
  if let Err(message) = run(&cli) {
    eprintln!("error: {}", message);
    process::exit(1);
  }
}

fn run(cli: &ExecCli) -> Result<(), String> {
  let binary = fs::read(&cli.input)
                  .map_err(|e| format!("cannot read {}: {}", cli.input, e))?;

  let program = Machine::load_program(&binary).map_err(|e| e.to_string())?;
  println!("Loaded {} instructions ({} bytes)", program.len(), binary.len());

  let mut machine = Machine::new();
  machine.set_trace(cli.verbose);
  machine.execute(&program).map_err(|e| e.to_string())?;

  println!("Executed {} instructions. ACC = {}", program.len(), machine.accumulator());
  if cli.verbose {
    println!("{}", machine);
  }

  if let Some(path) = &cli.output {
    let mut dump = Vec::new();
    machine.dump_csv(&mut dump)
           .map_err(|e| format!("cannot render dump: {}", e))?;
    fs::write(path, &dump)
       .map_err(|e| format!("cannot write {}: {}", path, e))?;
    println!("Memory dump saved to {}", path);
  }

  Ok(())
}
