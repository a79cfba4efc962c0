// ==========================================
// 库存呆滞分析系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AnalysisApi, ConfigApi, ImportApi};
use crate::cache::PriceMapCache;
use crate::config::{AnalysisConfigReader, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{
    ImportBatchRepository, MaterialPriceRepository, ShipmentLineRepository, StockPositionRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 表格导入API
    pub import_api: Arc<ImportApi>,

    /// 分析API
    pub analysis_api: Arc<AnalysisApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表
    /// 2. 初始化所有Repository与单价缓存
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let stock_repo = Arc::new(StockPositionRepository::from_connection(conn.clone()));
        let shipment_repo = Arc::new(ShipmentLineRepository::from_connection(conn.clone()));
        let price_repo = Arc::new(MaterialPriceRepository::from_connection(conn.clone()));
        let batch_repo = Arc::new(ImportBatchRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let price_cache = Arc::new(PriceMapCache::new(price_repo.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let import_api = Arc::new(ImportApi::new(
            stock_repo.clone(),
            shipment_repo.clone(),
            price_repo,
            batch_repo,
            price_cache.clone(),
        ));

        let config_reader: Arc<dyn AnalysisConfigReader> = config_manager.clone();
        let analysis_api = Arc::new(AnalysisApi::new(
            stock_repo,
            shipment_repo,
            price_cache,
            config_reader,
        ));

        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            import_api,
            analysis_api,
            config_api,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - `STOCK_AGING_DB_PATH` 环境变量（非空时）
/// - 开发环境: 用户数据目录/stock-aging-dev/stock_aging.db
/// - 生产环境: 用户数据目录/stock-aging/stock_aging.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STOCK_AGING_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stock_aging.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("stock-aging-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("stock-aging");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("stock_aging.db");
    }

    path.to_string_lossy().to_string()
}
