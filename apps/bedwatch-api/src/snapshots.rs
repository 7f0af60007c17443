//! 最近一次发布的层级快照（供 HTTP 读取）。

use bedwatch_realtime::RealtimeService;
use domain::HierarchyNode;
use std::sync::{Arc, PoisonError, RwLock};

/// 订阅数据流并保留最新的节点列表。
#[derive(Debug, Default)]
pub struct LatestHierarchy {
    latest: RwLock<Arc<Vec<HierarchyNode>>>,
}

impl LatestHierarchy {
    /// 创建并订阅服务的数据发布；订阅随进程存活。
    pub fn attach(service: &RealtimeService) -> Arc<Self> {
        let snapshots = Arc::new(Self::default());
        let target = Arc::downgrade(&snapshots);
        let _subscription = service.subscribe_to_data(move |nodes| {
            if let Some(snapshots) = target.upgrade() {
                snapshots.store(nodes);
            }
        });
        snapshots
    }

    pub fn store(&self, nodes: &[HierarchyNode]) {
        let nodes = Arc::new(nodes.to_vec());
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = nodes;
    }

    pub fn nodes(&self) -> Arc<Vec<HierarchyNode>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
