// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::error::Error;
use std::sync::Arc;
use tempfile::NamedTempFile;

use stock_aging::api::{AnalysisApi, ConfigApi, ImportApi};
use stock_aging::cache::PriceMapCache;
use stock_aging::config::{AnalysisConfigReader, ConfigManager};
use stock_aging::repository::{
    ImportBatchRepository, MaterialPriceRepository, ShipmentLineRepository, StockPositionRepository,
};

/// API测试环境
///
/// 所有仓储与API共享同一个连接
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub stock_repo: Arc<StockPositionRepository>,
    pub shipment_repo: Arc<ShipmentLineRepository>,
    pub price_repo: Arc<MaterialPriceRepository>,
    pub batch_repo: Arc<ImportBatchRepository>,
    pub config_manager: Arc<ConfigManager>,
    pub price_cache: Arc<PriceMapCache<MaterialPriceRepository>>,
    pub import_api: ImportApi,
    pub analysis_api: AnalysisApi,
    pub config_api: ConfigApi,
}

impl ApiTestEnv {
    /// 使用数据库中的配置（ConfigManager）
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::build(None)
    }

    /// 使用外部配置读取器（用于 Mock）
    pub fn with_config_reader(reader: Arc<dyn AnalysisConfigReader>) -> Result<Self, Box<dyn Error>> {
        Self::build(Some(reader))
    }

    fn build(reader: Option<Arc<dyn AnalysisConfigReader>>) -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let conn = test_helpers::open_shared_connection(&db_path)?;

        let stock_repo = Arc::new(StockPositionRepository::from_connection(conn.clone()));
        let shipment_repo = Arc::new(ShipmentLineRepository::from_connection(conn.clone()));
        let price_repo = Arc::new(MaterialPriceRepository::from_connection(conn.clone()));
        let batch_repo = Arc::new(ImportBatchRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn)?);
        let price_cache = Arc::new(PriceMapCache::new(price_repo.clone()));

        let import_api = ImportApi::new(
            stock_repo.clone(),
            shipment_repo.clone(),
            price_repo.clone(),
            batch_repo.clone(),
            price_cache.clone(),
        );

        let reader: Arc<dyn AnalysisConfigReader> = match reader {
            Some(r) => r,
            None => config_manager.clone(),
        };
        let analysis_api = AnalysisApi::new(
            stock_repo.clone(),
            shipment_repo.clone(),
            price_cache.clone(),
            reader,
        );

        let config_api = ConfigApi::new(config_manager.clone());

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            stock_repo,
            shipment_repo,
            price_repo,
            batch_repo,
            config_manager,
            price_cache,
            import_api,
            analysis_api,
            config_api,
        })
    }
}
