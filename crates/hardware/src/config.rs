//! Configuration system for the Tomasulo simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! engine. It provides:
//! 1. **Defaults:** Baseline capacities and latencies for every structure.
//! 2. **Structures:** Hierarchical config for general settings, the reorder buffer, and each
//!    functional-unit class.
//! 3. **Validation:** Rejection of configurations that could never make progress.
//!
//! Configuration is supplied as JSON (`Config::from_json` / `Config::from_file`) or taken
//! from `Config::default()`. Every field is optional in JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::SimError;
use crate::isa::UnitClass;

/// Default configuration constants for the simulator.
mod defaults {
    /// Cycle bound after which a run is declared non-convergent.
    pub const MAX_CYCLES: u64 = 10_000;

    /// Multiplier applied to the constant in `off(base)` address operands.
    pub const OFFSET_SCALE: i64 = 4;

    /// Reorder buffer entries.
    pub const ROB_ENTRIES: usize = 128;

    /// Integer adder: reservation stations, latency, units.
    pub const INT_ADDER: (usize, u64, usize) = (2, 1, 1);

    /// FP adder: reservation stations, latency, units.
    pub const FP_ADDER: (usize, u64, usize) = (3, 4, 1);

    /// FP multiplier: reservation stations, latency, units.
    pub const FP_MULTIPLIER: (usize, u64, usize) = (2, 8, 1);

    /// FP divider: reservation stations, latency, units.
    pub const FP_DIVIDER: (usize, u64, usize) = (2, 15, 1);

    /// Load-store queue entries.
    pub const LSQ_ENTRIES: usize = 3;

    /// Address-generation latency in cycles.
    pub const LS_EX_LATENCY: u64 = 1;

    /// Memory access latency in cycles (loads and committed stores).
    pub const LS_MEM_LATENCY: u64 = 4;

    /// Address-generation units.
    pub const LS_UNITS: usize = 1;
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings.
    pub general: GeneralConfig,
    /// Reorder buffer sizing.
    pub rob: RobConfig,
    /// Functional-unit classes.
    pub units: UnitsConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Rejects configurations under which no instruction could ever complete.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.general.max_cycles == 0 {
            return Err(SimError::Config("general.max_cycles must be non-zero".into()));
        }
        if self.general.offset_scale == 0 {
            return Err(SimError::Config("general.offset_scale must be non-zero".into()));
        }
        if self.rob.entries == 0 {
            return Err(SimError::Config("rob.entries must be non-zero".into()));
        }
        for class in UnitClass::ARITHMETIC {
            let unit = self.units.arithmetic(class);
            if unit.rs_entries == 0 || unit.latency == 0 || unit.count == 0 {
                return Err(SimError::Config(format!(
                    "units.{}: rs_entries, latency and count must be non-zero",
                    class.config_key()
                )));
            }
        }
        let ls = &self.units.load_store;
        if ls.queue_entries == 0 || ls.ex_latency == 0 || ls.mem_latency == 0 || ls.count == 0 {
            return Err(SimError::Config(
                "units.load_store: queue_entries, ex_latency, mem_latency and count must be non-zero"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Log a snapshot of every structure each cycle (at `debug` level).
    #[serde(default)]
    pub trace: bool,

    /// Convergence bound: a run still in flight after this many cycles fails.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Effective address of `off(base)` is `off * offset_scale + base`.
    #[serde(default = "GeneralConfig::default_offset_scale")]
    pub offset_scale: i64,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    fn default_offset_scale() -> i64 {
        defaults::OFFSET_SCALE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            max_cycles: defaults::MAX_CYCLES,
            offset_scale: defaults::OFFSET_SCALE,
        }
    }
}

/// Reorder buffer sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RobConfig {
    /// Number of in-flight instructions the ROB can hold.
    #[serde(default = "RobConfig::default_entries")]
    pub entries: usize,
}

impl RobConfig {
    fn default_entries() -> usize {
        defaults::ROB_ENTRIES
    }
}

impl Default for RobConfig {
    fn default() -> Self {
        Self {
            entries: defaults::ROB_ENTRIES,
        }
    }
}

/// Parameters of one arithmetic functional-unit class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnitConfig {
    /// Reservation-station entries in this class's pool.
    pub rs_entries: usize,
    /// Cycles an operation occupies a unit.
    pub latency: u64,
    /// Number of identical units.
    pub count: usize,
}

impl UnitConfig {
    const fn from_tuple((rs_entries, latency, count): (usize, u64, usize)) -> Self {
        Self {
            rs_entries,
            latency,
            count,
        }
    }
}

/// Parameters of the load/store path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadStoreConfig {
    /// Load-store queue entries.
    pub queue_entries: usize,
    /// Address-generation latency.
    pub ex_latency: u64,
    /// Memory access latency.
    pub mem_latency: u64,
    /// Number of address-generation units.
    pub count: usize,
}

impl Default for LoadStoreConfig {
    fn default() -> Self {
        Self {
            queue_entries: defaults::LSQ_ENTRIES,
            ex_latency: defaults::LS_EX_LATENCY,
            mem_latency: defaults::LS_MEM_LATENCY,
            count: defaults::LS_UNITS,
        }
    }
}

/// Functional-unit classes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnitsConfig {
    /// Integer add/subtract.
    #[serde(default = "UnitsConfig::default_int_adder")]
    pub int_adder: UnitConfig,
    /// Floating-point add/subtract.
    #[serde(default = "UnitsConfig::default_fp_adder")]
    pub fp_adder: UnitConfig,
    /// Floating-point multiply.
    #[serde(default = "UnitsConfig::default_fp_multiplier")]
    pub fp_multiplier: UnitConfig,
    /// Floating-point divide.
    #[serde(default = "UnitsConfig::default_fp_divider")]
    pub fp_divider: UnitConfig,
    /// Loads and stores.
    #[serde(default)]
    pub load_store: LoadStoreConfig,
}

impl UnitsConfig {
    fn default_int_adder() -> UnitConfig {
        UnitConfig::from_tuple(defaults::INT_ADDER)
    }

    fn default_fp_adder() -> UnitConfig {
        UnitConfig::from_tuple(defaults::FP_ADDER)
    }

    fn default_fp_multiplier() -> UnitConfig {
        UnitConfig::from_tuple(defaults::FP_MULTIPLIER)
    }

    fn default_fp_divider() -> UnitConfig {
        UnitConfig::from_tuple(defaults::FP_DIVIDER)
    }

    /// Returns the parameters of an arithmetic class.
    ///
    /// For `UnitClass::LoadStore` this synthesizes an equivalent view of the
    /// load/store path (queue entries, address latency, unit count).
    pub fn arithmetic(&self, class: UnitClass) -> UnitConfig {
        match class {
            UnitClass::IntAdder => self.int_adder,
            UnitClass::FpAdder => self.fp_adder,
            UnitClass::FpMultiplier => self.fp_multiplier,
            UnitClass::FpDivider => self.fp_divider,
            UnitClass::LoadStore => UnitConfig {
                rs_entries: self.load_store.queue_entries,
                latency: self.load_store.ex_latency,
                count: self.load_store.count,
            },
        }
    }

    /// Mutable access to an arithmetic class.
    ///
    /// Returns `None` for `UnitClass::LoadStore`, whose parameters live in `load_store`.
    pub fn arithmetic_mut(&mut self, class: UnitClass) -> Option<&mut UnitConfig> {
        match class {
            UnitClass::IntAdder => Some(&mut self.int_adder),
            UnitClass::FpAdder => Some(&mut self.fp_adder),
            UnitClass::FpMultiplier => Some(&mut self.fp_multiplier),
            UnitClass::FpDivider => Some(&mut self.fp_divider),
            UnitClass::LoadStore => None,
        }
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            int_adder: Self::default_int_adder(),
            fp_adder: Self::default_fp_adder(),
            fp_multiplier: Self::default_fp_multiplier(),
            fp_divider: Self::default_fp_divider(),
            load_store: LoadStoreConfig::default(),
        }
    }
}
