//! Fixed-value backend for tests and platforms without a native backend.

use super::{HardLimit, Identity, KernelStats, SchedPolicy, SystemFacts};
use crate::error::ResolveError;
use crate::source::{Cache, CacheAttr, CacheParam, ResourceLimit};
use std::collections::HashMap;

/// A [`SystemFacts`] whose answers are plain fields.
///
/// The default value provides nothing: every query is `Ok(None)`.
#[derive(Debug, Clone, Default)]
pub struct MockFacts {
    pub caches: HashMap<CacheParam, u64>,
    pub processor_count: Option<u64>,
    pub processor_name: Option<String>,
    pub processor_frequency: Option<u64>,
    /// When set, `processor_frequency` fails as if this text had been read.
    pub unparseable_frequency: Option<String>,
    pub identity: Option<Identity>,
    pub kernel_stats: KernelStats,
    /// Raw Linux policy value.
    pub policy: Option<i32>,
    pub priority: Option<i32>,
    pub hard_limits: HashMap<ResourceLimit, HardLimit>,
}

impl MockFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// A four-core x86 host with the same processor as
    /// [`MockFs::typical_host`](crate::collector::MockFs::typical_host).
    pub fn typical_host() -> Self {
        let mut facts = Self::new();

        for (cache, size, ways) in [
            (Cache::L1Instruction, 32 * 1024, 8),
            (Cache::L1Data, 32 * 1024, 8),
            (Cache::L2, 256 * 1024, 4),
            (Cache::L3, 12 * 1024 * 1024, 16),
        ] {
            facts.caches.insert(CacheParam::new(cache, CacheAttr::Size), size);
            facts.caches.insert(CacheParam::new(cache, CacheAttr::Associativity), ways);
            facts.caches.insert(CacheParam::new(cache, CacheAttr::LineSize), 64);
        }

        facts.processor_count = Some(4);
        facts.processor_name = Some("Example CPU @ 3.00GHz".to_string());
        facts.processor_frequency = Some(3_000_000_000);
        facts.identity = Some(Identity {
            system_name: "Linux".to_string(),
            node_name: "testhost".to_string(),
            release: "6.1.0-test".to_string(),
            version: "#1 SMP PREEMPT_DYNAMIC".to_string(),
            machine: "x86_64".to_string(),
        });
        facts.kernel_stats = KernelStats {
            uptime: Some(86400),
            loads: Some([0.15, 0.3, 0.45]),
            total_ram: Some(16_777_216_000),
            free_ram: Some(8_388_608_000),
            shared_ram: Some(65_536_000),
            buffer_ram: Some(524_288_000),
            total_swap: Some(4_194_304_000),
            free_swap: Some(4_194_304_000),
            procs: Some(312),
            total_high: Some(0),
            free_high: Some(0),
            mem_unit: Some(1),
        };
        facts.policy = Some(0);
        facts.priority = Some(0);

        facts.hard_limits.extend([
            (ResourceLimit::AddressSpace, HardLimit::Unlimited),
            (ResourceLimit::Core, HardLimit::Unlimited),
            (ResourceLimit::Cpu, HardLimit::Unlimited),
            (ResourceLimit::Data, HardLimit::Unlimited),
            (ResourceLimit::FileSize, HardLimit::Unlimited),
            (ResourceLimit::Locks, HardLimit::Unlimited),
            (ResourceLimit::MemLock, HardLimit::Finite(8_388_608)),
            (ResourceLimit::MsgQueue, HardLimit::Finite(819_200)),
            (ResourceLimit::Nice, HardLimit::Finite(0)),
            (ResourceLimit::NoFile, HardLimit::Finite(524_288)),
            (ResourceLimit::NProc, HardLimit::Finite(63_704)),
            (ResourceLimit::Rss, HardLimit::Unlimited),
            (ResourceLimit::RtPrio, HardLimit::Finite(0)),
            (ResourceLimit::RtTime, HardLimit::Unlimited),
            (ResourceLimit::SigPending, HardLimit::Finite(63_704)),
            (ResourceLimit::Stack, HardLimit::Unlimited),
        ]);

        facts
    }
}

impl SystemFacts for MockFacts {
    fn cache_parameter(&self, param: CacheParam) -> Result<Option<u64>, ResolveError> {
        Ok(self.caches.get(&param).copied())
    }

    fn processor_count(&self) -> Result<Option<u64>, ResolveError> {
        Ok(self.processor_count)
    }

    fn processor_name(&self) -> Result<Option<String>, ResolveError> {
        Ok(self.processor_name.clone())
    }

    fn processor_frequency(&self) -> Result<Option<u64>, ResolveError> {
        if let Some(text) = &self.unparseable_frequency {
            return Err(ResolveError::Frequency { text: text.clone() });
        }
        Ok(self.processor_frequency)
    }

    fn identity(&self) -> Result<Option<Identity>, ResolveError> {
        Ok(self.identity.clone())
    }

    fn kernel_stats(&self) -> Result<KernelStats, ResolveError> {
        Ok(self.kernel_stats.clone())
    }

    fn scheduler_policy(&self) -> Result<Option<String>, ResolveError> {
        self.policy
            .map(|raw| SchedPolicy::from_raw(raw).map(|p| p.as_str().to_string()))
            .transpose()
    }

    fn priority(&self) -> Result<Option<i32>, ResolveError> {
        Ok(self.priority)
    }

    fn hard_limit(&self, limit: ResourceLimit) -> Result<Option<HardLimit>, ResolveError> {
        Ok(self.hard_limits.get(&limit).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provides_nothing() {
        let facts = MockFacts::new();

        assert_eq!(facts.processor_count().unwrap(), None);
        assert_eq!(facts.identity().unwrap(), None);
        assert_eq!(facts.scheduler_policy().unwrap(), None);
        assert_eq!(facts.hard_limit(ResourceLimit::Stack).unwrap(), None);
        assert_eq!(facts.kernel_stats().unwrap(), KernelStats::default());
    }

    #[test]
    fn test_typical_host() {
        let facts = MockFacts::typical_host();

        assert_eq!(
            facts
                .cache_parameter(CacheParam::new(Cache::L1Data, CacheAttr::LineSize))
                .unwrap(),
            Some(64)
        );
        assert_eq!(
            facts
                .cache_parameter(CacheParam::new(Cache::L4, CacheAttr::Size))
                .unwrap(),
            None
        );
        assert_eq!(facts.scheduler_policy().unwrap().as_deref(), Some("SCHED_OTHER"));
        assert_eq!(
            facts.hard_limit(ResourceLimit::AddressSpace).unwrap(),
            Some(HardLimit::Unlimited)
        );
    }

    #[test]
    fn test_unparseable_frequency() {
        let facts = MockFacts {
            unparseable_frequency: Some("n/a".to_string()),
            ..MockFacts::typical_host()
        };

        assert!(facts.processor_frequency().unwrap_err().is_fatal());
    }

    #[test]
    fn test_unknown_policy() {
        let facts = MockFacts {
            policy: Some(6),
            ..MockFacts::new()
        };

        assert!(matches!(
            facts.scheduler_policy(),
            Err(ResolveError::UnknownPolicy(6))
        ));
    }
}
