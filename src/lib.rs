//! An assembler and interpreter for a minimal fixed-width accumulator ISA.
//!
//! The machine has a single accumulator register and 1024 signed memory cells.
//! Programs are straight-line sequences of four instructions (LOAD, READ,
//! WRITE, DIV) packed into a headerless little-endian byte stream; position in
//! the stream is the implicit instruction pointer.

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod machine;
pub mod program;

pub use bytecode::{Instruction, Opcode, CodecError};
pub use machine::{Machine, ExecutionError, MEMORY_SIZE};
pub use program::{parse_program, assemble, hex_listing, AssemblyError};


#[cfg(test)]
mod tests {
  use super::*;

  // The whole pipeline: YAML description -> bytes -> instructions -> final state -> dump.
  #[test]
  fn assemble_execute_dump_pipeline() {
    let source = "\
program:
  - load: 10
  - write: 0
  - load: 3
  - write: 1
  - read: 0
  - div: 1
";
    let instructions = parse_program(source).unwrap();
    let binary = assemble(&instructions);
    assert_eq!(binary.len(), 4 + 2 + 4 + 2 + 2 + 2);

    let decoded = Machine::load_program(&binary).unwrap();
    assert_eq!(decoded, instructions);

    let mut machine = Machine::new();
    machine.execute(&decoded).unwrap();
    assert_eq!(machine.accumulator(), 3); // 10 div 3, floored

    let mut dump = Vec::new();
    machine.dump_csv(&mut dump).unwrap();
    let dump = String::from_utf8(dump).unwrap();
    assert_eq!(dump, "address,value\n0,10\n1,3\n");
  }
}
