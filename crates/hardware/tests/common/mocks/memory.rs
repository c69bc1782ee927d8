use mockall::mock;
use tomasim_core::common::{MemAddr, Value};
use tomasim_core::core::arch::MemoryStore;

mock! {
    pub DataMemory {}
    impl MemoryStore for DataMemory {
        fn read(&self, addr: MemAddr) -> Value;
        fn write(&mut self, addr: MemAddr, value: Value);
    }
}
