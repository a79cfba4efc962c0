// ==========================================
// 库存呆滞分析系统 - 分析 API
// ==========================================
// 职责: 并发加载四类输入 → 富化 → 残余报表 / 驾驶舱汇总
// 红线: 富化结果不落库, 每次调用重新计算
// ==========================================

use crate::analytics::{
    aging_stats, financial_summary, filter_by_tier, residual_only, residual_stats,
    sort_by_priority, AgingStats, AgingThresholds, FinancialSummary, ResidualStats,
};
use crate::api::error::{ApiError, ApiResult};
use crate::cache::PriceMapCache;
use crate::config::{AnalysisConfigReader, ResidualConfig};
use crate::domain::stock::{EnrichedRow, StockRecord};
use crate::domain::types::ResidualTier;
use crate::engine::RowEnricher;
use crate::repository::{
    MaterialPriceRepository, RepositoryResult, ShipmentLineRepository, StockPositionRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// 驾驶舱默认展示的高金额明细条数
pub const DEFAULT_TOP_N: usize = 10;

// ==========================================
// 响应类型
// ==========================================

/// 残余报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidualReport {
    /// 等级过滤条件（None = 全部等级）
    pub tier_filter: Option<ResidualTier>,
    /// 残余行（按处理优先级排序）
    pub rows: Vec<EnrichedRow>,
    /// 统计（基于过滤后的行）
    pub stats: ResidualStats,
}

/// 驾驶舱汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub aging: AgingStats,
    pub financial: FinancialSummary,
    pub residual: ResidualStats,
    pub thresholds: AgingThresholds,
}

// ==========================================
// AnalysisApi
// ==========================================
pub struct AnalysisApi {
    stock_repo: Arc<StockPositionRepository>,
    shipment_repo: Arc<ShipmentLineRepository>,
    price_cache: Arc<PriceMapCache<MaterialPriceRepository>>,
    config_reader: Arc<dyn AnalysisConfigReader>,
    enricher: RowEnricher,
}

impl AnalysisApi {
    pub fn new(
        stock_repo: Arc<StockPositionRepository>,
        shipment_repo: Arc<ShipmentLineRepository>,
        price_cache: Arc<PriceMapCache<MaterialPriceRepository>>,
        config_reader: Arc<dyn AnalysisConfigReader>,
    ) -> Self {
        Self {
            stock_repo,
            shipment_repo,
            price_cache,
            config_reader,
            enricher: RowEnricher::new(),
        }
    }

    /// 富化全部库存行
    ///
    /// 库存行 / 交货单行 / 单价表 / 残余配置 四路并发加载
    #[instrument(skip(self))]
    pub async fn enriched_rows(&self) -> ApiResult<Vec<EnrichedRow>> {
        let max_age = self.config_reader.get_price_cache_max_age().await?;

        let stock_repo = Arc::clone(&self.stock_repo);
        let shipment_repo = Arc::clone(&self.shipment_repo);

        let (records, shipments, prices, (config, eligible_class)) = tokio::try_join!(
            join_blocking(tokio::task::spawn_blocking(move || stock_repo.list_all())),
            join_blocking(tokio::task::spawn_blocking(move || shipment_repo.list_all())),
            async { self.price_cache.get_or_refresh(max_age).await.map_err(ApiError::from) },
            self.load_residual_settings(),
        )?;

        let rows = self
            .enricher
            .enrich(&records, &config, &prices, &shipments, &eligible_class);

        info!(
            rows = rows.len(),
            residual = rows.iter().filter(|r| r.is_residual).count(),
            eligible_class = %eligible_class,
            "富化完成"
        );
        Ok(rows)
    }

    /// 残余报表: 仅残余行, 可按等级过滤, 按处理优先级排序
    #[instrument(skip(self))]
    pub async fn residual_report(&self, tier: Option<ResidualTier>) -> ApiResult<ResidualReport> {
        let rows = self.enriched_rows().await?;

        let filtered = filter_by_tier(&residual_only(&rows), tier);
        let sorted = sort_by_priority(&filtered);
        let stats = residual_stats(&sorted);

        Ok(ResidualReport {
            tier_filter: tier,
            rows: sorted,
            stats,
        })
    }

    /// 驾驶舱: 库龄统计 + 金额汇总 + 残余统计
    #[instrument(skip(self))]
    pub async fn dashboard(&self, top_n: usize) -> ApiResult<DashboardResponse> {
        let (rows, thresholds) = tokio::try_join!(self.enriched_rows(), self.load_aging_thresholds())?;

        let records: Vec<StockRecord> = rows.iter().map(|r| r.record.clone()).collect();

        Ok(DashboardResponse {
            aging: aging_stats(&records, &thresholds),
            financial: financial_summary(&rows, &thresholds, top_n),
            residual: residual_stats(&rows),
            thresholds,
        })
    }

    // ==========================================
    // 内部加载
    // ==========================================

    async fn load_residual_settings(&self) -> ApiResult<(ResidualConfig, String)> {
        let config = self.config_reader.get_residual_config().await?;
        let eligible_class = self.config_reader.get_eligible_storage_class().await?;
        Ok((config, eligible_class))
    }

    async fn load_aging_thresholds(&self) -> ApiResult<AgingThresholds> {
        let alert = self.config_reader.get_aging_alert_days().await?;
        let critical = self.config_reader.get_aging_critical_days().await?;
        Ok(AgingThresholds::new(alert, critical))
    }
}

/// 等待阻塞读取任务并展开两层错误
async fn join_blocking<T>(handle: JoinHandle<RepositoryResult<T>>) -> ApiResult<T> {
    Ok(handle.await??)
}
