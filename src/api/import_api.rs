// ==========================================
// 库存呆滞分析系统 - 表格导入 API
// ==========================================
// 职责: 解析表格 → 落库 → 记录导入批次
// 流程: UniversalFileParser → SheetAdapter → Repository → ImportBatch
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::cache::PriceMapCache;
use crate::domain::stock::ImportBatch;
use crate::domain::types::ImportKind;
use crate::importer::{
    PriceSheetAdapter, SheetAdapter, ShipmentSheetAdapter, StockSheetAdapter, UniversalFileParser,
};
use crate::perf::PerfGuard;
use crate::repository::{
    ImportBatchRepository, MaterialPriceRepository, RepositoryResult, ShipmentLineRepository,
    StockPositionRepository,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入批次ID
    pub batch_id: String,
    /// 导入类型
    pub kind: ImportKind,
    /// 源文件名
    pub file_name: Option<String>,
    /// 写入的记录数
    pub imported: usize,
    /// 被跳过的行数
    pub skipped_rows: usize,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl From<&ImportBatch> for ImportApiResponse {
    fn from(batch: &ImportBatch) -> Self {
        Self {
            batch_id: batch.batch_id.clone(),
            kind: batch.kind,
            file_name: batch.file_name.clone(),
            imported: batch.row_count,
            skipped_rows: batch.skipped_rows,
            elapsed_ms: batch.elapsed_ms,
        }
    }
}

// ==========================================
// ImportApi - 表格导入 API
// ==========================================
pub struct ImportApi {
    stock_repo: Arc<StockPositionRepository>,
    shipment_repo: Arc<ShipmentLineRepository>,
    price_repo: Arc<MaterialPriceRepository>,
    batch_repo: Arc<ImportBatchRepository>,
    price_cache: Arc<PriceMapCache<MaterialPriceRepository>>,
    parser: UniversalFileParser,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(
        stock_repo: Arc<StockPositionRepository>,
        shipment_repo: Arc<ShipmentLineRepository>,
        price_repo: Arc<MaterialPriceRepository>,
        batch_repo: Arc<ImportBatchRepository>,
        price_cache: Arc<PriceMapCache<MaterialPriceRepository>>,
    ) -> Self {
        Self {
            stock_repo,
            shipment_repo,
            price_repo,
            batch_repo,
            price_cache,
            parser: UniversalFileParser,
        }
    }

    /// 导入库存明细（整表替换）
    ///
    /// # 参数
    /// - file_path: 文件路径（.xlsx/.xls/.csv）
    /// - today: 库龄计算基准日
    #[instrument(skip(self))]
    pub fn import_stock_file(&self, file_path: &str, today: NaiveDate) -> ApiResult<ImportApiResponse> {
        let _perf = PerfGuard::new("import_stock_file");
        let adapter = StockSheetAdapter::new(today);
        self.run_import(ImportKind::Stock, file_path, &adapter, |records, batch_id| {
            self.stock_repo.replace_all(records, Some(batch_id))
        })
    }

    /// 导入交货单（整表替换）
    #[instrument(skip(self))]
    pub fn import_shipment_file(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let _perf = PerfGuard::new("import_shipment_file");
        let adapter = ShipmentSheetAdapter;
        self.run_import(ImportKind::Shipment, file_path, &adapter, |records, batch_id| {
            self.shipment_repo.replace_all(records, Some(batch_id))
        })
    }

    /// 导入物料单价（按物料号覆盖），完成后使单价缓存失效
    #[instrument(skip(self))]
    pub async fn import_price_file(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let response = {
            let _perf = PerfGuard::new("import_price_file");
            let adapter = PriceSheetAdapter::new(Utc::now());
            self.run_import(ImportKind::Price, file_path, &adapter, |records, _batch_id| {
                self.price_repo.upsert_batch(records)
            })?
        };

        self.price_cache.invalidate().await;
        Ok(response)
    }

    /// 最近的导入批次
    pub fn recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        Ok(self.batch_repo.list_recent(limit)?)
    }

    /// 某类型最近一次导入
    pub fn latest_batch(&self, kind: ImportKind) -> ApiResult<Option<ImportBatch>> {
        Ok(self.batch_repo.latest(kind)?)
    }

    // ==========================================
    // 内部流程
    // ==========================================

    fn run_import<A, F>(
        &self,
        kind: ImportKind,
        file_path: &str,
        adapter: &A,
        persist: F,
    ) -> ApiResult<ImportApiResponse>
    where
        A: SheetAdapter,
        F: FnOnce(&[A::Record], &str) -> RepositoryResult<usize>,
    {
        let start = Instant::now();

        let grid = self.parser.parse(file_path)?;
        let outcome = adapter.adapt(&grid)?;

        let batch_id = Uuid::new_v4().to_string();
        let row_count = persist(&outcome.records, &batch_id)?;

        let batch = ImportBatch {
            batch_id,
            kind,
            file_name: Path::new(file_path)
                .file_name()
                .map(|name| name.to_string_lossy().to_string()),
            row_count,
            skipped_rows: outcome.skipped_rows,
            imported_at: Utc::now(),
            elapsed_ms: start.elapsed().as_millis() as i64,
        };
        self.batch_repo.insert(&batch)?;

        info!(
            kind = %kind,
            batch_id = %batch.batch_id,
            rows = row_count,
            skipped = batch.skipped_rows,
            elapsed_ms = batch.elapsed_ms,
            "导入完成"
        );

        Ok(ImportApiResponse::from(&batch))
    }
}
