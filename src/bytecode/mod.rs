/*!

  Instructions share a universal layout: the low 5 bits of the first byte hold
  the opcode, and the remaining high bits hold the single operand. Two physical
  widths exist, both little-endian:

    Wide form   (4 bytes):  [Operand:27][OpCode:5]   LOAD's immediate constant
    Narrow form (2 bytes):  [Operand:11][OpCode:5]   a memory address

  Which width applies is determined solely by the opcode, so a decoder must
  read the opcode byte first to learn how many further bytes to consume.
  Instructions carry no address field of their own; their position in the
  stream is the implicit instruction pointer, which is why encoded output must
  be concatenated in strict program order.

  One design decision that needed to be made is whether an instruction is a
  bare (opcode, operand) pair or an enum with one variant per operation. The
  opcode table is fixed and closed, and the operand's meaning (immediate
  constant versus memory address) follows from the opcode, so a tagged enum
  per mnemonic carries that distinction in the type while the opcode itself
  remains a one-byte `#[repr(u8)]` enum for numeric conversion.

*/

mod binary;
mod instruction;

pub use binary::{encode_instruction, decode_instruction, decode_program,
                 EncodedInstruction, CodecError,
                 OPCODE_BITS, OPCODE_MASK, CONSTANT_MASK, ADDRESS_MASK};
pub use instruction::{Instruction, Opcode};
