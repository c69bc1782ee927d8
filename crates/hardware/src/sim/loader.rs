//! Program loader.
//!
//! This module reads the textual program format. It performs:
//! 1. **Seeding:** `REG <reg> <value>` and `MEM <address> <value>` lines set initial state.
//! 2. **Decoding:** Every other non-blank line is an instruction, decoded up front so an
//!    unknown opcode is reported before any cycle is simulated.
//! 3. **Comments:** Everything from `#` to the end of a line is ignored.

use std::fs;
use std::path::Path;

use crate::common::{ArchReg, MemAddr, SimError, Value};
use crate::isa::Instruction;
use crate::isa::decode::{decode_line, tokenize};

/// A decoded program plus the state it starts from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// Instructions in program order.
    pub instructions: Vec<Instruction>,
    /// Initial register values.
    pub registers: Vec<(ArchReg, Value)>,
    /// Initial memory contents.
    pub memory: Vec<(MemAddr, Value)>,
}

/// Parses program text.
///
/// # Errors
///
/// The first decoding error, tagged with its 1-based line number.
pub fn parse_program(text: &str) -> Result<Program, SimError> {
    let mut program = Program::default();
    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let body = raw.split('#').next().unwrap_or_default().trim();
        if body.is_empty() {
            continue;
        }
        let fields = tokenize(body);
        let Some(first) = fields.first() else {
            continue;
        };
        match first.to_ascii_uppercase().as_str() {
            "REG" => {
                let [_, reg, value] = fields[..] else {
                    return Err(directive_error(line, "REG <register> <value>"));
                };
                program
                    .registers
                    .push((reg.parse()?, parse_value(line, value)?));
            }
            "MEM" => {
                let [_, addr, value] = fields[..] else {
                    return Err(directive_error(line, "MEM <address> <value>"));
                };
                let addr = addr.parse::<i64>().map_err(|_| SimError::MalformedOperand {
                    line,
                    operand: addr.to_string(),
                })?;
                program
                    .memory
                    .push((MemAddr(addr), parse_value(line, value)?));
            }
            _ => program.instructions.push(decode_line(line, body)?),
        }
    }
    Ok(program)
}

/// Reads and parses a program file.
///
/// # Errors
///
/// `Io` if the file cannot be read, otherwise as [`parse_program`].
pub fn load_program(path: impl AsRef<Path>) -> Result<Program, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_program(&text)
}

fn parse_value(line: usize, text: &str) -> Result<Value, SimError> {
    text.parse().map_err(|_| SimError::MalformedOperand {
        line,
        operand: text.to_string(),
    })
}

fn directive_error(line: usize, usage: &str) -> SimError {
    SimError::Parse {
        line,
        message: format!("expected `{usage}`"),
    }
}
