// ==========================================
// 库存呆滞分析系统 - 单价表缓存
// ==========================================
// 职责: 按最大有效期缓存 物料号 → 单价 映射
// 红线: 引擎不感知缓存, 只接收调用方传入的 PriceMap
// ==========================================

use crate::domain::stock::PriceMap;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

// ==========================================
// PriceMapSource Trait
// ==========================================
// 实现者: MaterialPriceRepository
#[async_trait]
pub trait PriceMapSource: Send + Sync {
    /// 加载完整单价表
    async fn load_price_map(&self) -> RepositoryResult<PriceMap>;
}

#[derive(Debug)]
struct CachedPriceMap {
    map: Arc<PriceMap>,
    loaded_at: Instant,
}

// ==========================================
// PriceMapCache
// ==========================================
pub struct PriceMapCache<S: PriceMapSource> {
    source: Arc<S>,
    state: RwLock<Option<CachedPriceMap>>,
}

impl<S: PriceMapSource> PriceMapCache<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            state: RwLock::new(None),
        }
    }

    /// 取缓存的单价表; 缓存为空或超过 max_age 时从数据源重新加载
    ///
    /// 加载失败时保留旧缓存并返回错误。
    pub async fn get_or_refresh(&self, max_age: Duration) -> RepositoryResult<Arc<PriceMap>> {
        {
            let state = self.state.read().await;
            if let Some(cached) = state.as_ref() {
                if cached.loaded_at.elapsed() <= max_age {
                    return Ok(Arc::clone(&cached.map));
                }
            }
        }

        let mut state = self.state.write().await;
        // 等待写锁期间可能已被其他调用刷新
        if let Some(cached) = state.as_ref() {
            if cached.loaded_at.elapsed() <= max_age {
                return Ok(Arc::clone(&cached.map));
            }
        }

        let map = Arc::new(self.source.load_price_map().await?);
        tracing::debug!(materials = map.len(), "单价表缓存已刷新");
        *state = Some(CachedPriceMap {
            map: Arc::clone(&map),
            loaded_at: Instant::now(),
        });

        Ok(map)
    }

    /// 清空缓存（单价导入后调用）
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        *state = None;
    }

    /// 当前是否有缓存
    pub async fn is_cached(&self) -> bool {
        self.state.read().await.is_some()
    }
}
