// ==========================================
// ConfigApi 集成测试
// ==========================================
// 测试范围:
// 1. 默认配置查询
// 2. 残余阈值更新与校验
// 3. 例外物料维护
// 4. 合格库位 / 库龄阈值
// 5. 配置快照: get_config_snapshot, restore_from_snapshot
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use stock_aging::api::ApiError;
use stock_aging::config::ResidualConfig;

// ==========================================
// 配置查询
// ==========================================

#[test]
fn test_get_settings_defaults() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let settings = env.config_api.get_settings().unwrap();

    assert_eq!(settings.residual, ResidualConfig::default());
    assert_eq!(settings.residual.tier1_max_grams, 100.0);
    assert_eq!(settings.residual.tier2_max_grams, 900.0);
    assert_eq!(settings.residual.tier3_max_grams, 999.0);
    assert!(settings.residual.excluded_materials.is_empty());
    assert_eq!(settings.eligible_storage_class, "PES");
    assert_eq!(settings.aging.alert_days, 10);
    assert_eq!(settings.aging.critical_days, 20);
    assert_eq!(settings.price_cache_max_age_secs, 300);
}

// ==========================================
// 残余阈值
// ==========================================

#[test]
fn test_update_residual_config_rejects_bad_order() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let bad = ResidualConfig::with_thresholds(500.0, 100.0, 999.0);
    let err = env.config_api.update_residual_config(&bad).unwrap_err();

    assert!(matches!(err, ApiError::ValidationError(_)));
    assert_eq!(env.config_api.get_residual_config().unwrap(), ResidualConfig::default());
}

#[test]
fn test_update_residual_config_rejects_nan() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .config_api
        .update_thresholds(f64::NAN, 900.0, 999.0)
        .unwrap_err();

    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[test]
fn test_update_thresholds_keeps_exclusions() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.config_api.add_excluded_material("M1").unwrap();

    let updated = env.config_api.update_thresholds(50.0, 500.0, 800.0).unwrap();

    assert_eq!(updated.tier1_max_grams, 50.0);
    assert!(updated.excluded_materials.contains("M1"));

    let stored = env.config_api.get_residual_config().unwrap();
    assert_eq!(stored, updated);
}

// ==========================================
// 例外物料
// ==========================================

#[test]
fn test_excluded_material_add_and_remove() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let config = env.config_api.add_excluded_material(" M1 ").unwrap();
    assert!(config.excluded_materials.contains("M1"));

    // 重复添加
    let err = env.config_api.add_excluded_material("M1").unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 空白物料号忽略
    let config = env.config_api.add_excluded_material("   ").unwrap();
    assert_eq!(config.excluded_materials.len(), 1);

    let config = env.config_api.remove_excluded_material("M1").unwrap();
    assert!(config.excluded_materials.is_empty());

    // 不存在时无变化
    let config = env.config_api.remove_excluded_material("M9").unwrap();
    assert!(config.excluded_materials.is_empty());
}

// ==========================================
// 合格库位 / 库龄阈值
// ==========================================

#[test]
fn test_eligible_storage_class() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    env.config_api.set_eligible_storage_class(" EXP ").unwrap();
    assert_eq!(env.config_api.get_eligible_storage_class().unwrap(), "EXP");

    let err = env.config_api.set_eligible_storage_class("  ").unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(env.config_api.get_eligible_storage_class().unwrap(), "EXP");
}

#[test]
fn test_aging_thresholds_validation() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    assert!(matches!(
        env.config_api.update_aging_thresholds(-1, 5),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.config_api.update_aging_thresholds(30, 10),
        Err(ApiError::InvalidInput(_))
    ));

    let thresholds = env.config_api.update_aging_thresholds(7, 14).unwrap();
    assert_eq!(thresholds.alert_days, 7);
    assert_eq!(env.config_api.get_aging_thresholds().unwrap(), thresholds);
}

// ==========================================
// 配置快照
// ==========================================

#[test]
fn test_snapshot_and_restore() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.config_api.update_thresholds(10.0, 20.0, 30.0).unwrap();
    env.config_api.add_excluded_material("M1").unwrap();

    let snapshot = env.config_api.get_config_snapshot().unwrap();

    env.config_api.update_thresholds(1.0, 2.0, 3.0).unwrap();
    env.config_api.remove_excluded_material("M1").unwrap();

    let restored = env.config_api.restore_from_snapshot(&snapshot).unwrap();
    assert!(restored >= 4);

    let config = env.config_api.get_residual_config().unwrap();
    assert_eq!(config.tier3_max_grams, 30.0);
    assert!(config.excluded_materials.contains("M1"));
}

#[test]
fn test_restore_rejects_empty_and_malformed_snapshot() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    assert!(matches!(
        env.config_api.restore_from_snapshot("  "),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.config_api.restore_from_snapshot("{not json"),
        Err(ApiError::ValidationError(_))
    ));
}

#[test]
fn test_restore_rejects_out_of_order_snapshot() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.config_api.update_thresholds(10.0, 20.0, 30.0).unwrap();

    let snapshot = r#"{"residual_tier1_max_grams":"900","residual_tier2_max_grams":"100","residual_tier3_max_grams":"-5"}"#;
    let err = env.config_api.restore_from_snapshot(snapshot).unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let bad_aging = r#"{"aging_alert_days":"-1"}"#;
    assert!(matches!(
        env.config_api.restore_from_snapshot(bad_aging),
        Err(ApiError::ValidationError(_))
    ));

    // 原配置保持不变
    let config = env.config_api.get_residual_config().unwrap();
    assert_eq!(config.tier1_max_grams, 10.0);
    assert_eq!(config.tier3_max_grams, 30.0);
    assert_eq!(env.config_api.get_aging_thresholds().unwrap().alert_days, 10);
}
