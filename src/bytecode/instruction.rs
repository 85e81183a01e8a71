use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

/**
  Opcodes of the virtual machine. The five-bit codes are fixed by the binary
  format, so the discriminants are explicit rather than consecutive. The
  encoded width of an instruction is a function of its opcode alone: LOAD is
  the only wide (4 byte) instruction, the rest are narrow (2 bytes).
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "WRITE")] Write = 4,
  #[strum(serialize = "LOAD")]  Load  = 8,
  #[strum(serialize = "READ")]  Read  = 25,
  #[strum(serialize = "DIV")]   Div   = 27,
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The encoded size of an instruction with this opcode, in bytes.
  pub fn width(&self) -> usize {
    match self {
      Opcode::Load => 4,
      _            => 2,
    }
  }
}

/// Holds the unencoded components of an instruction: one variant per
/// mnemonic, carrying either an immediate constant or a memory address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [Constant:27][OpCode:5] — loads the constant into the accumulator.
  Load { constant: u32 },
  /// [Address:11][OpCode:5] — loads the addressed cell into the accumulator.
  Read { address: u16 },
  /// [Address:11][OpCode:5] — stores the accumulator into the addressed cell.
  Write { address: u16 },
  /// [Address:11][OpCode:5] — floor-divides the accumulator by the addressed cell.
  Div { address: u16 },
}

impl Instruction {
  pub fn opcode(&self) -> Opcode {
    match self {
      Instruction::Load  { .. } => Opcode::Load,
      Instruction::Read  { .. } => Opcode::Read,
      Instruction::Write { .. } => Opcode::Write,
      Instruction::Div   { .. } => Opcode::Div,
    }
  }

  pub fn mnemonic(&self) -> &'static str {
    self.opcode().into()
  }

  /// The operand, regardless of whether it is a constant or an address.
  pub fn operand(&self) -> u32 {
    match self {
      Instruction::Load { constant } => *constant,
      | Instruction::Read  { address }
      | Instruction::Write { address }
      | Instruction::Div   { address } => *address as u32,
    }
  }

  /// The encoded size of this instruction, in bytes.
  pub fn width(&self) -> usize {
    self.opcode().width()
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}({})", self.opcode(), self.operand())
  }
}
