//! Instruction text decoder.
//!
//! Turns one line of assembly text into an [`Instruction`]. Fields may be
//! separated by whitespace, commas, or both, and mnemonics and register names
//! are case-insensitive:
//!
//! ```text
//! ADD    R1, R2, R3
//! ADDI   R1 R2 -4
//! MULT.D F0, F2, F4
//! LD     F6, 2(R1)
//! SD     F6, 0(R3)
//! ```

use crate::common::{ArchReg, SimError};
use crate::isa::instruction::Instruction;
use crate::isa::opcode::Opcode;

/// Splits a line into fields on whitespace and commas.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Decodes one instruction line.
///
/// # Arguments
///
/// * `line` - 1-based line number, used in error reports.
/// * `text` - The instruction text (comments already stripped).
///
/// # Errors
///
/// `UnknownOpcode` for an unrecognized mnemonic, `MalformedRegister` /
/// `MalformedOperand` for bad operands, and `Parse` for a wrong operand count.
pub fn decode_line(line: usize, text: &str) -> Result<Instruction, SimError> {
    let fields = tokenize(text);
    let Some((&mnemonic, operands)) = fields.split_first() else {
        return Err(SimError::Parse {
            line,
            message: "empty instruction".into(),
        });
    };
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| SimError::UnknownOpcode {
        line,
        mnemonic: mnemonic.to_string(),
    })?;

    let expected = if opcode.is_memory() { 2 } else { 3 };
    if operands.len() != expected {
        return Err(SimError::Parse {
            line,
            message: format!(
                "{} takes {expected} operands, found {}",
                opcode.mnemonic(),
                operands.len()
            ),
        });
    }

    let inst = match opcode {
        Opcode::Addi => {
            let rd = operands[0].parse()?;
            let rs = operands[1].parse()?;
            let imm = parse_immediate(line, operands[2])?;
            Instruction::addi(rd, rs, imm)
        }
        Opcode::Ld => {
            let rd = operands[0].parse()?;
            let (offset, base) = parse_memory_operand(line, operands[1])?;
            Instruction::load(rd, offset, base)
        }
        Opcode::Sd => {
            let rs = operands[0].parse()?;
            let (offset, base) = parse_memory_operand(line, operands[1])?;
            Instruction::store(rs, offset, base)
        }
        _ => {
            let rd = operands[0].parse()?;
            let rs = operands[1].parse()?;
            let rt = operands[2].parse()?;
            Instruction::arith(opcode, rd, rs, rt)
        }
    };
    Ok(inst)
}

/// Parses a signed decimal or `0x` hexadecimal immediate.
fn parse_immediate(line: usize, text: &str) -> Result<i64, SimError> {
    let malformed = || SimError::MalformedOperand {
        line,
        operand: text.to_string(),
    };
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).map_err(|_| malformed())?,
        None => digits.parse::<i64>().map_err(|_| malformed())?,
    };
    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses `off(base)`; a missing offset (`(R2)`) means zero.
fn parse_memory_operand(line: usize, text: &str) -> Result<(i64, ArchReg), SimError> {
    let malformed = || SimError::MalformedOperand {
        line,
        operand: text.to_string(),
    };
    let open = text.find('(').ok_or_else(malformed)?;
    let inner = text[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
    let offset_text = &text[..open];
    let offset = if offset_text.is_empty() {
        0
    } else {
        parse_immediate(line, offset_text)?
    };
    let base = inner.parse()?;
    Ok((offset, base))
}
