use tomasim_core::Simulator;
use tomasim_core::common::{ArchReg, MemAddr, SimError, Value};
use tomasim_core::config::Config;
use tomasim_core::core::arch::{MemoryStore, RegisterStore};
use tomasim_core::core::pipeline::timing::TimingEntry;
use tomasim_core::sim::parse_program;

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub struct TestContext {
    pub sim: Simulator,
}

impl TestContext {
    /// Parses `source` and builds a simulator with the default configuration.
    pub fn new(source: &str) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: &str, config: Config) -> Self {
        init_tracing();
        let program = parse_program(source).expect("program parses");
        let sim = Simulator::new(config, program).expect("config is valid");
        Self { sim }
    }

    /// Runs to completion and returns the number of working cycles.
    pub fn run(&mut self) -> u64 {
        self.sim.run().expect("run converges")
    }

    pub fn try_run(&mut self) -> Result<u64, SimError> {
        self.sim.run()
    }

    pub fn reg(&self, name: &str) -> Value {
        let reg: ArchReg = name.parse().expect("register name");
        self.sim.engine().registers().read(reg)
    }

    pub fn mem(&self, addr: i64) -> Value {
        self.sim.engine().memory().read(MemAddr(addr))
    }

    /// Timing row of the instruction at `index`.
    pub fn row(&self, index: usize) -> &TimingEntry {
        self.sim
            .engine()
            .timing()
            .get(index)
            .expect("instruction was issued")
    }

    /// First cycle of the execute span of `index`.
    pub fn ex(&self, index: usize) -> u64 {
        self.row(index).execute.expect("instruction executed").begin
    }

    pub fn wb(&self, index: usize) -> u64 {
        self.row(index).write_back.expect("instruction wrote back")
    }

    /// First cycle of the commit span of `index`.
    pub fn cm(&self, index: usize) -> u64 {
        self.row(index).commit.expect("instruction committed").begin
    }
}
