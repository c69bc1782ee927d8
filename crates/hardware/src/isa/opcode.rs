//! Opcodes and functional-unit classes.
//!
//! Every opcode is served by exactly one [`UnitClass`]. Arithmetic classes own a
//! pool of reservation stations; the load/store class is fed by the load-store
//! queue instead.

use std::fmt;

/// A functional-unit class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitClass {
    /// Integer add/subtract unit.
    IntAdder,
    /// Floating-point add/subtract unit.
    FpAdder,
    /// Floating-point multiplier.
    FpMultiplier,
    /// Floating-point divider.
    FpDivider,
    /// Address-generation unit for loads and stores.
    LoadStore,
}

impl UnitClass {
    /// Classes served by reservation stations, in pool order.
    pub const ARITHMETIC: [Self; 4] = [
        Self::IntAdder,
        Self::FpAdder,
        Self::FpMultiplier,
        Self::FpDivider,
    ];

    /// Every class, in pool order.
    pub const ALL: [Self; 5] = [
        Self::IntAdder,
        Self::FpAdder,
        Self::FpMultiplier,
        Self::FpDivider,
        Self::LoadStore,
    ];

    /// Dense index of the class, matching the order of [`UnitClass::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::IntAdder => 0,
            Self::FpAdder => 1,
            Self::FpMultiplier => 2,
            Self::FpDivider => 3,
            Self::LoadStore => 4,
        }
    }

    /// Short unit name used in hazard annotations.
    pub fn name(self) -> &'static str {
        match self {
            Self::IntAdder => "Int FU",
            Self::FpAdder => "FP Add FU",
            Self::FpMultiplier => "FP Mul FU",
            Self::FpDivider => "FP Div FU",
            Self::LoadStore => "Load/Store FU",
        }
    }

    /// Key of the class in the `units` section of the configuration.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::IntAdder => "int_adder",
            Self::FpAdder => "fp_adder",
            Self::FpMultiplier => "fp_multiplier",
            Self::FpDivider => "fp_divider",
            Self::LoadStore => "load_store",
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation the engine can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `ADD rd, rs, rt` (integer).
    Add,
    /// `SUB rd, rs, rt` (integer).
    Sub,
    /// `ADDI rd, rs, imm` (integer).
    Addi,
    /// `ADD.D fd, fs, ft`.
    AddD,
    /// `SUB.D fd, fs, ft`.
    SubD,
    /// `MULT.D fd, fs, ft` (also accepted as `MUL.D`).
    MulD,
    /// `DIV.D fd, fs, ft`.
    DivD,
    /// `LD rd, off(base)`.
    Ld,
    /// `SD rs, off(base)`.
    Sd,
}

impl Opcode {
    /// Looks up a mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        let op = match text.to_ascii_uppercase().as_str() {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "ADDI" => Self::Addi,
            "ADD.D" => Self::AddD,
            "SUB.D" => Self::SubD,
            "MULT.D" | "MUL.D" => Self::MulD,
            "DIV.D" => Self::DivD,
            "LD" => Self::Ld,
            "SD" => Self::Sd,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Addi => "ADDI",
            Self::AddD => "ADD.D",
            Self::SubD => "SUB.D",
            Self::MulD => "MULT.D",
            Self::DivD => "DIV.D",
            Self::Ld => "LD",
            Self::Sd => "SD",
        }
    }

    /// The functional-unit class that executes this operation.
    pub fn unit_class(self) -> UnitClass {
        match self {
            Self::Add | Self::Sub | Self::Addi => UnitClass::IntAdder,
            Self::AddD | Self::SubD => UnitClass::FpAdder,
            Self::MulD => UnitClass::FpMultiplier,
            Self::DivD => UnitClass::FpDivider,
            Self::Ld | Self::Sd => UnitClass::LoadStore,
        }
    }

    /// True for loads and stores.
    #[inline]
    pub fn is_memory(self) -> bool {
        matches!(self, Self::Ld | Self::Sd)
    }

    /// True for loads.
    #[inline]
    pub fn is_load(self) -> bool {
        self == Self::Ld
    }

    /// True for stores.
    #[inline]
    pub fn is_store(self) -> bool {
        self == Self::Sd
    }

    /// True when the operation produces a register value.
    #[inline]
    pub fn writes_register(self) -> bool {
        !self.is_store()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
