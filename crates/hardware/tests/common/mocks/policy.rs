use mockall::mock;
use microcache_core::cache::{CacheLine, ReplacementPolicy};

mock! {
    pub Policy {}
    impl ReplacementPolicy for Policy {
        fn get_victim(&self, set: &[CacheLine]) -> usize;
    }
}
