//! `avm-asm`: assembles a YAML program description into a binary instruction
//! stream.

use std::fs;
use std::process;

use clap::Parser;

use avm::{assemble, hex_listing, parse_program};

#[derive(Debug, Parser)]
#[clap(name = "avm-asm", about = "Assemble a YAML program description into binary")]
struct AsmCli {
  /// YAML file with the program description
  #[clap(short, long, value_name = "FILE")]
  input: String,

  /// Output path for the binary instruction stream
  #[clap(short, long, value_name = "FILE")]
  output: String,

  /// Print a hex listing of the encoded bytes
  #[clap(short, long)]
  verbose: bool,
}

fn main() {
  let cli = AsmCli::parse();
  if let Err(message) = run(&cli) {
    eprintln!("error: {}", message);
    process::exit(1);
  }
}

fn run(cli: &AsmCli) -> Result<(), String> {
  let source = fs::read_to_string(&cli.input)
                  .map_err(|e| format!("cannot read {}: {}", cli.input, e))?;

  let instructions = parse_program(&source).map_err(|e| e.to_string())?;
  let binary       = assemble(&instructions);

  if cli.verbose {
    println!("{}", hex_listing(&binary));
  }

  fs::write(&cli.output, &binary)
     .map_err(|e| format!("cannot write {}: {}", cli.output, e))?;

  println!("Assembled {} instructions → {} bytes", instructions.len(), binary.len());
  Ok(())
}
