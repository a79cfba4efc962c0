// ==========================================
// 库存呆滞分析系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 库存残余余额分级 + 库龄/金额分析
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 残余分级与富化（纯计算）
pub mod engine;

// 分析视图层 - 残余视图 / 库龄 / 金额
pub mod analytics;

// 导入层 - 电子表格
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 单价缓存
pub mod cache;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计（SQL 计数 / 慢 SQL）
pub mod perf;

// API 层 - 用例接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AgingCriticality, ImportKind, MassUnit, ResidualTier};

// 领域实体
pub use domain::stock::{EnrichedRow, ImportBatch, MaterialPrice, PriceMap, ShipmentRecord, StockRecord};

// 配置
pub use config::ResidualConfig;

// 引擎
pub use engine::{enrich, RowEnricher};

// API
pub use api::{AnalysisApi, ConfigApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存呆滞分析系统";
