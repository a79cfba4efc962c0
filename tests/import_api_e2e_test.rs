// ==========================================
// ImportApi 端到端测试
// ==========================================
// 测试范围:
// 1. 库存明细 / 交货单 / 单价表 CSV 导入
// 2. 导入批次记录
// 3. 单价导入后缓存失效
// 4. 错误路径（文件不存在 / 格式不支持 / 无有效行 / 缺列）
// 5. 导入 → 分析 全流程
// ==========================================

mod helpers;

use chrono::NaiveDate;
use helpers::api_test_helper::ApiTestEnv;
use std::time::Duration;
use stock_aging::api::ApiError;
use stock_aging::domain::types::{ImportKind, ResidualTier};
use tempfile::NamedTempFile;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
}

fn stock_csv() -> NamedTempFile {
    test_helpers::write_csv(&[
        "Relatório de estoque;;",
        "Data: 25/03/2024;;",
        ";;",
        "Material;Texto breve material;UMB;Lote;Centro;Depósito;Tipo de depósito;Posição no depósito;Estoque disponível;Data do vencimento;Último movimento;Tipo de estoque;Última entrada dep.",
        "M100;Fio;KG;L1;1000;PES;SHELF;A-01;0,05;;15/03/2024;Livre;01/03/2024",
        "M100;Fio;KG;L2;1000;PES;SHELF;A-02;1.500,000;;2024-03-01;Livre;",
        "M200;Parafuso;;L9;1000;EXP;SHELF;B-01;0,3;;;;",
        ";;;;;;;;;;;;",
        "Total;;;;;;;;1.500,35;;;;",
        "Gerado em;;",
        "Usuário;;",
        "Fim;;",
    ])
    .unwrap()
}

fn shipment_csv() -> NamedTempFile {
    test_helpers::write_csv(&[
        ";Lista de remessas;;",
        ";LExp;;",
        ";Remessa;;",
        ";;;",
        ";SNVM;20.03.2024;;1.234,5;;;;;;;;;;;",
        ";800000001;;10;;21.03.2024;2,5;;;KG;M100;;;1000;PES;Fio",
        ";800000001;;20;;21.03.2024;0;;;KG;M200;;;1000;PES;Parafuso",
        ";800000002;;10;;22.03.2024;1;;;KG;M100;;;1000;PES;Fio",
        ";Total;;;;;;;;;;;;;;",
    ])
    .unwrap()
}

fn price_csv() -> NamedTempFile {
    test_helpers::write_csv(&[
        "Material;Texto breve material;Valor unitário",
        "M100;Fio;12,50",
        "M200;Parafuso;abc",
        ";Sem material;1,0",
        "M300;Arruela;-1",
    ])
    .unwrap()
}

// ==========================================
// 库存明细导入
// ==========================================

#[test]
fn test_import_stock_file() {
    let env = ApiTestEnv::new().unwrap();
    let file = stock_csv();

    let response = env
        .import_api
        .import_stock_file(&test_helpers::path_of(&file), today())
        .unwrap();

    assert_eq!(response.kind, ImportKind::Stock);
    assert_eq!(response.imported, 3);
    assert_eq!(response.skipped_rows, 0);
    assert!(response.file_name.unwrap().ends_with(".csv"));

    let records = env.stock_repo.list_all().unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].material_code, "M100");
    assert_eq!(records[0].lot_id, "L1");
    assert_eq!(records[0].storage_location_class, "PES");
    assert!((records[0].quantity_available - 0.05).abs() < 1e-9);
    assert_eq!(records[0].aging_days, 10);
    assert_eq!(records[0].last_movement.as_deref(), Some("15/03/2024"));
    assert_eq!(records[0].last_entry.as_deref(), Some("01/03/2024"));
    assert_eq!(records[0].stock_type.as_deref(), Some("Livre"));

    assert_eq!(records[1].quantity_available, 1500.0);
    assert_eq!(records[1].aging_days, 24);

    // UMB 为空时默认 KG, 无移动日期时库龄为 0
    assert_eq!(records[2].unit_of_measure, "KG");
    assert_eq!(records[2].aging_days, 0);

    let latest = env.import_api.latest_batch(ImportKind::Stock).unwrap().unwrap();
    assert_eq!(latest.batch_id, response.batch_id);
    assert_eq!(latest.row_count, 3);
}

#[test]
fn test_reimport_stock_replaces_previous_rows() {
    let env = ApiTestEnv::new().unwrap();
    let file = stock_csv();
    let path = test_helpers::path_of(&file);

    env.import_api.import_stock_file(&path, today()).unwrap();
    env.import_api.import_stock_file(&path, today()).unwrap();

    assert_eq!(env.stock_repo.count().unwrap(), 3);
    assert_eq!(env.import_api.recent_batches(10).unwrap().len(), 2);
}

#[test]
fn test_import_stock_missing_key_columns_keeps_existing_rows() {
    let env = ApiTestEnv::new().unwrap();
    env.import_api
        .import_stock_file(&test_helpers::path_of(&stock_csv()), today())
        .unwrap();

    let bad = test_helpers::write_csv(&[
        "titulo;;",
        ";;",
        ";;",
        "Produto;Quantidade;",
        "X;1;",
        "a;;",
        "b;;",
        "c;;",
        "d;;",
    ])
    .unwrap();

    let err = env
        .import_api
        .import_stock_file(&test_helpers::path_of(&bad), today())
        .unwrap_err();

    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(env.stock_repo.count().unwrap(), 3);
}

// ==========================================
// 交货单导入
// ==========================================

#[test]
fn test_import_shipment_file() {
    let env = ApiTestEnv::new().unwrap();
    let file = shipment_csv();

    let response = env
        .import_api
        .import_shipment_file(&test_helpers::path_of(&file))
        .unwrap();

    assert_eq!(response.kind, ImportKind::Shipment);
    assert_eq!(response.imported, 2);
    assert_eq!(response.skipped_rows, 1);

    let lines = env.shipment_repo.list_all().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].shipment_number, "800000001");
    assert_eq!(lines[0].item, "10");
    assert_eq!(lines[0].material_code, "M100");
    assert_eq!(lines[0].quantity, 2.5);
    assert_eq!(lines[0].picking_date.as_deref(), Some("20/03/2024"));
    assert_eq!(lines[0].shipment_total_weight, Some(1234.5));
    assert_eq!(lines[0].availability_date.as_deref(), Some("21/03/2024"));
    assert_eq!(lines[1].shipment_number, "800000002");
}

// ==========================================
// 单价导入
// ==========================================

#[tokio::test]
async fn test_import_price_file_invalidates_cache() {
    let env = ApiTestEnv::new().unwrap();
    let max_age = Duration::from_secs(3600);

    let before = env.price_cache.get_or_refresh(max_age).await.unwrap();
    assert!(before.is_empty());
    assert!(env.price_cache.is_cached().await);

    let response = env
        .import_api
        .import_price_file(&test_helpers::path_of(&price_csv()))
        .await
        .unwrap();

    assert_eq!(response.kind, ImportKind::Price);
    assert_eq!(response.imported, 1);
    assert_eq!(response.skipped_rows, 3);
    assert!(!env.price_cache.is_cached().await);

    let after = env.price_cache.get_or_refresh(max_age).await.unwrap();
    assert_eq!(after.get("M100"), Some(&12.5));
    assert_eq!(after.len(), 1);
}

#[tokio::test]
async fn test_import_price_file_without_valid_rows_fails() {
    let env = ApiTestEnv::new().unwrap();
    let file = test_helpers::write_csv(&["Material;Valor unitário", "M1;x", ";2,0"]).unwrap();

    let err = env
        .import_api
        .import_price_file(&test_helpers::path_of(&file))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ImportError(_)));
    assert!(env.import_api.latest_batch(ImportKind::Price).unwrap().is_none());
}

// ==========================================
// 错误路径
// ==========================================

#[test]
fn test_import_missing_file_is_not_found() {
    let env = ApiTestEnv::new().unwrap();

    let err = env
        .import_api
        .import_shipment_file("/nonexistent/dir/remessas.csv")
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_import_unsupported_extension() {
    let env = ApiTestEnv::new().unwrap();
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();

    let err = env
        .import_api
        .import_stock_file(&test_helpers::path_of(&file), today())
        .unwrap_err();

    assert!(matches!(err, ApiError::ImportError(_)));
}

#[test]
fn test_recent_batches_rejects_zero_limit() {
    let env = ApiTestEnv::new().unwrap();
    assert!(matches!(
        env.import_api.recent_batches(0),
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// 导入 → 分析 全流程
// ==========================================

#[tokio::test]
async fn test_full_flow_import_then_residual_report() {
    let env = ApiTestEnv::new().unwrap();

    env.import_api
        .import_stock_file(&test_helpers::path_of(&stock_csv()), today())
        .unwrap();
    env.import_api
        .import_shipment_file(&test_helpers::path_of(&shipment_csv()))
        .unwrap();
    env.import_api
        .import_price_file(&test_helpers::path_of(&price_csv()))
        .await
        .unwrap();

    let report = env.analysis_api.residual_report(None).await.unwrap();

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.record.material_code, "M100");
    assert_eq!(row.record.lot_id, "L1");
    assert_eq!(row.tier, Some(ResidualTier::Tier1));
    assert_eq!(row.unit_price, 12.5);
    assert!((row.total_value - 0.625).abs() < 1e-9);
    assert_eq!(row.open_shipment_count, 2);
    assert!(!row.is_single_lot);

    assert_eq!(report.stats.total, 1);
    assert_eq!(report.stats.tier1, 1);
}
