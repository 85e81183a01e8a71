/*!
  The human readable form of a program is a YAML document holding an ordered
  list of single-key mappings under the `program` key:

  ```yaml
  program:
    - load: 10
    - write: 0
    - div: 1
  ```

  Mnemonics are case-insensitive and resolved through the `strum` derives on
  `Opcode`. Operands are masked to their field width during encoding, never
  rejected.
*/

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::bytecode::{encode_instruction, Instruction, Opcode};

#[derive(Debug, Deserialize)]
struct ProgramDescription {
  program: Vec<BTreeMap<String, i64>>,
}

/// Failure modes of the program loader. Both abort assembly before any bytes
/// are emitted.
#[derive(Debug, Error)]
pub enum AssemblyError {
  #[error("unknown mnemonic '{0}'")]
  UnknownMnemonic(String),

  #[error("malformed program description: {0}")]
  Malformed(#[from] serde_yaml::Error),
}

/**
  Parses a YAML program description into an instruction list. Entries are
  processed in document order; an unknown mnemonic fails the whole parse.
*/
pub fn parse_program(source: &str) -> Result<Vec<Instruction>, AssemblyError> {
  let description: ProgramDescription = serde_yaml::from_str(source)?;

  let mut instructions = Vec::new();
  for entry in &description.program {
    for (mnemonic, operand) in entry {
      instructions.push(instruction_for(mnemonic, *operand)?);
    }
  }
  Ok(instructions)
}

fn instruction_for(mnemonic: &str, operand: i64) -> Result<Instruction, AssemblyError> {
  let opcode = Opcode::from_str(&mnemonic.to_uppercase())
                      .map_err(|_| AssemblyError::UnknownMnemonic(mnemonic.to_string()))?;

  // Operands wrap to the field width; `encode_instruction` masks again, so an
  // out-of-range value truncates rather than fails.
  let instruction = match opcode {
    Opcode::Load  => Instruction::Load  { constant: operand as u32 },
    Opcode::Read  => Instruction::Read  { address: operand as u16 },
    Opcode::Write => Instruction::Write { address: operand as u16 },
    Opcode::Div   => Instruction::Div   { address: operand as u16 },
  };
  Ok(instruction)
}

/// Encodes the instruction list into a flat binary stream: a concatenation of
/// little-endian words in program order, with no header or padding.
pub fn assemble(instructions: &[Instruction]) -> Vec<u8> {
  let mut code = Vec::new();
  for instruction in instructions {
    encode_instruction(instruction).emit(&mut code);
  }
  code
}

/// Renders the encoded bytes as a hex listing, e.g. `0xA8, 0x00, 0x00, 0x00`.
pub fn hex_listing(code: &[u8]) -> String {
  code.iter()
      .map(|byte| format!("0x{:02X}", byte))
      .collect::<Vec<String>>()
      .join(", ")
}
