//! Structures and functions for the virtual machine: a single accumulator
//! register and a flat store of 1024 signed memory cells, executing a
//! straight-line instruction list.

use std::fmt::{Display, Formatter};
use std::io;

use prettytable::{format as TableFormat, Table};
use thiserror::Error;

use crate::bytecode::{decode_program, CodecError, Instruction};

/// Number of memory cells. Valid addresses are [0, 1023].
pub const MEMORY_SIZE: usize = 1024;

/// Failure modes of the execute loop. The machine is fail-fast: the first
/// error aborts the run, and the state at the failure point is not valid
/// output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ExecutionError {
  #[error("address {0} is outside the memory range [0, 1023]")]
  AddressOutOfRange(u16),

  #[error("division by zero: memory[{0}] holds 0")]
  DivisionByZero(u16),
}

pub struct Machine {
  memory      : Vec<i64>, // The flat data store, `MEMORY_SIZE` cells
  accumulator : i64,      // The single scalar register
  trace       : bool,     // Print each instruction's effect as it executes
}

impl Machine {

  // region Construction and state access

  pub fn new() -> Machine {
    Machine {
      memory      : vec![0; MEMORY_SIZE],
      accumulator : 0,
      trace       : false,
    }
  }

  pub fn set_trace(&mut self, trace: bool) {
    self.trace = trace;
  }

  pub fn accumulator(&self) -> i64 {
    self.accumulator
  }

  pub fn memory(&self) -> &[i64] {
    &self.memory
  }

  // endregion

  // region Loading and execution

  /// Decodes a binary stream into an instruction list, propagating codec
  /// errors unchanged. A malformed stream yields no partial program.
  pub fn load_program(code: &[u8]) -> Result<Vec<Instruction>, CodecError> {
    decode_program(code)
  }

  /**
    Executes the program strictly in sequence. There is no control flow: the
    instruction list index is the program counter, and the only exits are
    exhausting the list or hitting the first error.
  */
  pub fn execute(&mut self, program: &[Instruction]) -> Result<(), ExecutionError> {
    for (index, instruction) in program.iter().enumerate() {
      self.step(instruction)?;

      if self.trace {
        println!("[{}] {} → ACC = {}", index, instruction, self.accumulator);
      }
    }
    Ok(())
  }

  fn step(&mut self, instruction: &Instruction) -> Result<(), ExecutionError> {
    match instruction {

      Instruction::Load { constant } => {
        self.accumulator = *constant as i64;
      }

      Instruction::Read { address } => {
        self.accumulator = self.memory[Self::checked_index(*address)?];
      }

      Instruction::Write { address } => {
        self.memory[Self::checked_index(*address)?] = self.accumulator;
      }

      Instruction::Div { address } => {
        let divisor = self.memory[Self::checked_index(*address)?];
        if divisor == 0 {
          return Err(ExecutionError::DivisionByZero(*address));
        }
        self.accumulator = floor_div(self.accumulator, divisor);
      }

    }
    Ok(())
  }

  fn checked_index(address: u16) -> Result<usize, ExecutionError> {
    match (address as usize) < MEMORY_SIZE {
      true  => Ok(address as usize),
      false => Err(ExecutionError::AddressOutOfRange(address)),
    }
  }

  // endregion

  // region Export

  /// The non-zero memory cells in ascending address order.
  pub fn nonzero_cells(&self) -> Vec<(usize, i64)> {
    self.memory
        .iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(address, value)| (address, *value))
        .collect()
  }

  /// Writes the sparse memory dump: an `address,value` header followed by one
  /// row per non-zero cell. Zero cells are omitted by design.
  pub fn dump_csv<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "address,value")?;
    for (address, value) in self.nonzero_cells() {
      writeln!(writer, "{},{}", address, value)?;
    }
    Ok(())
  }

  // endregion

}

/**
  Integer division rounding toward negative infinity. The machine's division
  is floor division, which differs from Rust's `/` (truncation toward zero)
  whenever exactly one operand is negative, and from `div_euclid` for negative
  divisors.
*/
fn floor_div(dividend: i64, divisor: i64) -> i64 {
  let quotient = dividend / divisor;
  match dividend % divisor != 0 && (dividend < 0) != (divisor < 0) {
    true  => quotient - 1,
    false => quotient,
  }
}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Cell", ubl->"Contents"]);

    table.add_row(row![r->"ACC =", format!("{}", self.accumulator)]);
    for (address, value) in self.nonzero_cells() {
      table.add_row(row![r->format!("MEM[{}] =", address), format!("{}", value)]);
    }

    write!(f, "{}", table)
  }
}
