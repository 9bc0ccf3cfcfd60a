//! 수집 이력 버퍼.
//!
//! 용량이 고정된 FIFO 큐. 가득 차면 가장 오래된 스냅샷을 버리고 새 스냅샷을 넣는다.
//! 추가와 조회는 하나의 `RwLock` 아래에서 수행되므로 조회자는 추가 전 또는
//! 추가 후 상태만 관찰한다.

use hostwatch_core::models::snapshot::MetricSnapshot;
use parking_lot::RwLock;
use std::collections::VecDeque;
use tracing::trace;

/// 기본 이력 용량
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// 스냅샷 이력 저장소 (FIFO, 최대 크기 제한)
#[derive(Debug)]
pub struct HistoryStore {
    entries: RwLock<VecDeque<MetricSnapshot>>,
    capacity: usize,
}

impl HistoryStore {
    /// 새 이력 저장소 생성 (용량 0은 1로 보정)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// 스냅샷 추가 (가득 차면 가장 오래된 항목 제거)
    pub fn append(&self, snapshot: MetricSnapshot) {
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(snapshot);
        trace!(len = entries.len(), "이력 추가");
    }

    /// 현재 내용의 복사본 (오래된 순)
    pub fn recent(&self) -> Vec<MetricSnapshot> {
        self.entries.read().iter().cloned().collect()
    }

    /// 저장된 스냅샷 수
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 최대 용량
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
