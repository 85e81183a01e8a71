/*!
  This module is responsible for the encoding and decoding of binary
  instructions.

*/
use std::convert::TryFrom;

use thiserror::Error;

use super::{Instruction, Opcode};

// If you change these you must also change the layout diagram in `mod.rs`.
pub const OPCODE_BITS:   u32 = 5;
pub const OPCODE_MASK:   u8  = 0x1F;
/// Mask for LOAD's 27-bit immediate constant.
pub const CONSTANT_MASK: u32 = 0x07FF_FFFF;
/// Mask for the 11-bit memory address of the narrow instructions.
pub const ADDRESS_MASK:  u16 = 0x07FF;

/// An `Either` type for an encoded instruction, allowing the instruction to
/// be either a wide (4 byte) or a narrow (2 byte) little-endian word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodedInstruction {
  Word(u32),
  HalfWord(u16),
}

impl EncodedInstruction {
  /// Appends the little-endian bytes of the word to `code`.
  pub fn emit(&self, code: &mut Vec<u8>) {
    match self {
      EncodedInstruction::Word(word)      => code.extend_from_slice(&word.to_le_bytes()),
      EncodedInstruction::HalfWord(word)  => code.extend_from_slice(&word.to_le_bytes()),
    }
  }
}

/// Failure modes of the decoder. Encoding cannot fail: out-of-range operands
/// are masked to the field width, not rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CodecError {
  #[error("unknown opcode {0}")]
  UnknownOpcode(u8),

  #[error("truncated {opcode} instruction: {expected} bytes needed, {available} remain")]
  TruncatedInstruction {
    opcode:    Opcode,
    expected:  usize,
    available: usize,
  },
}

/**
  Encodes the instruction into its binary form. Operands are masked to the
  field width (27 bits for LOAD's constant, 11 bits for an address) with
  unsigned truncation; encoding never fails.
*/
pub fn encode_instruction(instruction: &Instruction) -> EncodedInstruction {
  match instruction {

    Instruction::Load { constant } => {
      // [Constant:27][OpCode:5]
      EncodedInstruction::Word(
        (Opcode::Load.code() as u32)
          | ((constant & CONSTANT_MASK) << OPCODE_BITS)
      )
    }

    Instruction::Read  { address } => EncodedInstruction::HalfWord(pack_narrow(Opcode::Read,  *address)),
    Instruction::Write { address } => EncodedInstruction::HalfWord(pack_narrow(Opcode::Write, *address)),
    Instruction::Div   { address } => EncodedInstruction::HalfWord(pack_narrow(Opcode::Div,   *address)),
  }
}

// [Address:11][OpCode:5]
fn pack_narrow(opcode: Opcode, address: u16) -> u16 {
  (opcode.code() as u16) | ((address & ADDRESS_MASK) << OPCODE_BITS)
}

/**
  Decodes the instruction starting at `offset`, returning it together with the
  number of bytes consumed (4 or 2) so the caller can advance its cursor.
  Returns `Ok(None)` when `offset` is at or past the end of the buffer, the
  normal loop-termination condition rather than an error.
*/
pub fn decode_instruction(code: &[u8], offset: usize)
  -> Result<Option<(Instruction, usize)>, CodecError>
{
  if offset >= code.len() {
    return Ok(None);
  }

  let raw_opcode = code[offset] & OPCODE_MASK;
  let opcode = Opcode::try_from(raw_opcode)
                      .map_err(|_| CodecError::UnknownOpcode(raw_opcode))?;

  let width     = opcode.width();
  let available = code.len() - offset;
  if available < width {
    return Err(CodecError::TruncatedInstruction { opcode, expected: width, available });
  }

  let instruction = match opcode {

    Opcode::Load => {
      let word = u32::from_le_bytes([
        code[offset], code[offset + 1], code[offset + 2], code[offset + 3]
      ]);
      Instruction::Load { constant: (word >> OPCODE_BITS) & CONSTANT_MASK }
    }

    _ => {
      let word    = u16::from_le_bytes([code[offset], code[offset + 1]]);
      let address = (word >> OPCODE_BITS) & ADDRESS_MASK;
      match opcode {
        Opcode::Read  => Instruction::Read  { address },
        Opcode::Write => Instruction::Write { address },
        Opcode::Div   => Instruction::Div   { address },
        Opcode::Load  => unreachable!("wide opcode in narrow branch"),
      }
    }

  };

  Ok(Some((instruction, width)))
}

/**
  Decodes an entire binary stream into an instruction list, advancing the
  cursor by each instruction's width until the buffer is exhausted. The first
  malformed instruction aborts the whole decode; no partial program is
  produced.
*/
pub fn decode_program(code: &[u8]) -> Result<Vec<Instruction>, CodecError> {
  let mut program = Vec::new();
  let mut offset  = 0;

  while let Some((instruction, width)) = decode_instruction(code, offset)? {
    program.push(instruction);
    offset += width;
  }

  Ok(program)
}


#[cfg(test)]
mod tests {
  use super::*;

  fn encode_to_bytes(instruction: &Instruction) -> Vec<u8> {
    let mut code = Vec::new();
    encode_instruction(instruction).emit(&mut code);
    code
  }

  #[test]
  fn load_5_encodes_to_the_worked_example() {
    // 8 | (5 << 5) = 168 = 0xA8 in the low byte.
    assert_eq!(
      encode_to_bytes(&Instruction::Load { constant: 5 }),
      vec![0xA8, 0x00, 0x00, 0x00]
    );
  }

  #[test]
  fn round_trip_preserves_every_opcode_and_reports_its_width() {
    let cases = [
      (Instruction::Load  { constant: 0x07FF_FFFF }, 4),
      (Instruction::Load  { constant: 0 },           4),
      (Instruction::Read  { address: 1023 },         2),
      (Instruction::Write { address: 0 },            2),
      (Instruction::Div   { address: 2047 },         2),
    ];
    for (instruction, width) in cases.iter() {
      let code = encode_to_bytes(instruction);
      assert_eq!(code.len(), *width);
      assert_eq!(decode_instruction(&code, 0), Ok(Some((*instruction, *width))));
    }
  }

  #[test]
  fn operands_are_masked_to_the_field_width() {
    assert_eq!(
      encode_to_bytes(&Instruction::Load { constant: 0xFFFF_FFFF }),
      encode_to_bytes(&Instruction::Load { constant: 0x07FF_FFFF })
    );
    assert_eq!(
      encode_to_bytes(&Instruction::Read { address: 0x0FFF }),
      encode_to_bytes(&Instruction::Read { address: 0x07FF })
    );
  }

  #[test]
  fn decode_past_the_end_signals_end_of_stream() {
    assert_eq!(decode_instruction(&[], 0), Ok(None));
    let code = encode_to_bytes(&Instruction::Write { address: 1 });
    assert_eq!(decode_instruction(&code, 2), Ok(None));
  }

  #[test]
  fn truncated_load_fails() {
    // Claims opcode 8 (LOAD, 4 bytes) but only 2 bytes are present.
    assert_eq!(
      decode_instruction(&[0x08, 0x00], 0),
      Err(CodecError::TruncatedInstruction { opcode: Opcode::Load, expected: 4, available: 2 })
    );
  }

  #[test]
  fn unknown_opcode_fails_with_its_value() {
    assert_eq!(decode_instruction(&[0x03], 0), Err(CodecError::UnknownOpcode(3)));
    // Only the low 5 bits discriminate: 0xE8 & 0x1F == 8, a valid LOAD.
    assert_eq!(
      decode_instruction(&[0xE8, 0, 0, 0], 0),
      Ok(Some((Instruction::Load { constant: 7 }, 4)))
    );
  }

  #[test]
  fn decode_program_walks_heterogeneous_widths() {
    let mut code = Vec::new();
    encode_instruction(&Instruction::Load  { constant: 10 }).emit(&mut code);
    encode_instruction(&Instruction::Write { address: 0 }).emit(&mut code);
    encode_instruction(&Instruction::Div   { address: 0 }).emit(&mut code);

    let program = decode_program(&code).unwrap();
    assert_eq!(program, vec![
      Instruction::Load  { constant: 10 },
      Instruction::Write { address: 0 },
      Instruction::Div   { address: 0 },
    ]);
  }

  #[test]
  fn decode_program_aborts_on_the_first_malformed_instruction() {
    let mut code = Vec::new();
    encode_instruction(&Instruction::Load { constant: 1 }).emit(&mut code);
    code.push(0x03); // not a valid opcode
    assert_eq!(decode_program(&code), Err(CodecError::UnknownOpcode(3)));
  }
}
