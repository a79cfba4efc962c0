// ==========================================
// 库存呆滞分析系统 - 残余分级配置
// ==========================================
// 三个递增阈值（克, 上界包含） + 例外物料清单
// 红线: 引擎不校验阈值顺序, 只在写入配置时校验
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 默认阈值（克）
pub const DEFAULT_TIER1_MAX_GRAMS: f64 = 100.0;
pub const DEFAULT_TIER2_MAX_GRAMS: f64 = 900.0;
pub const DEFAULT_TIER3_MAX_GRAMS: f64 = 999.0;

/// 默认合格库位类别
pub const DEFAULT_ELIGIBLE_STORAGE_CLASS: &str = "PES";

// ==========================================
// ResidualConfig - 残余分级配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualConfig {
    pub tier1_max_grams: f64, // Tier1 上界（含）
    pub tier2_max_grams: f64, // Tier2 上界（含）
    pub tier3_max_grams: f64, // 残余上限（含）, 超过即正常库存
    pub excluded_materials: BTreeSet<String>, // 高价值物料, 永不判为残余
}

impl Default for ResidualConfig {
    fn default() -> Self {
        Self {
            tier1_max_grams: DEFAULT_TIER1_MAX_GRAMS,
            tier2_max_grams: DEFAULT_TIER2_MAX_GRAMS,
            tier3_max_grams: DEFAULT_TIER3_MAX_GRAMS,
            excluded_materials: BTreeSet::new(),
        }
    }
}

impl ResidualConfig {
    /// 构造不含例外物料的配置
    pub fn with_thresholds(tier1: f64, tier2: f64, tier3: f64) -> Self {
        Self {
            tier1_max_grams: tier1,
            tier2_max_grams: tier2,
            tier3_max_grams: tier3,
            excluded_materials: BTreeSet::new(),
        }
    }

    /// 追加例外物料（builder 风格）
    pub fn exclude(mut self, material_code: &str) -> Self {
        self.excluded_materials.insert(material_code.to_string());
        self
    }

    /// 校验阈值: 有限、非负、0 ≤ t1 ≤ t2 ≤ t3
    ///
    /// # 返回
    /// - Ok(()): 合法
    /// - Err(String): 违规原因
    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [
            ("tier1_max_grams", self.tier1_max_grams),
            ("tier2_max_grams", self.tier2_max_grams),
            ("tier3_max_grams", self.tier3_max_grams),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(format!("{} 必须为有限数值, 实际 {}", name, value));
            }
            if value < 0.0 {
                return Err(format!("{} 不能为负数, 实际 {}", name, value));
            }
        }

        if self.tier1_max_grams > self.tier2_max_grams {
            return Err(format!(
                "阈值顺序错误: tier1_max_grams={} > tier2_max_grams={}",
                self.tier1_max_grams, self.tier2_max_grams
            ));
        }
        if self.tier2_max_grams > self.tier3_max_grams {
            return Err(format!(
                "阈值顺序错误: tier2_max_grams={} > tier3_max_grams={}",
                self.tier2_max_grams, self.tier3_max_grams
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResidualConfig::default();
        assert_eq!(config.tier1_max_grams, 100.0);
        assert_eq!(config.tier2_max_grams, 900.0);
        assert_eq!(config.tier3_max_grams, 999.0);
        assert!(config.excluded_materials.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_order() {
        let config = ResidualConfig::with_thresholds(500.0, 100.0, 999.0);
        let err = config.validate().unwrap_err();
        assert!(err.contains("tier1_max_grams"));

        let config = ResidualConfig::with_thresholds(100.0, 900.0, 800.0);
        let err = config.validate().unwrap_err();
        assert!(err.contains("tier3_max_grams"));
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        assert!(ResidualConfig::with_thresholds(-1.0, 900.0, 999.0).validate().is_err());
        assert!(ResidualConfig::with_thresholds(100.0, f64::NAN, 999.0).validate().is_err());
    }

    #[test]
    fn test_equal_thresholds_are_valid() {
        let config = ResidualConfig::with_thresholds(100.0, 100.0, 100.0);
        assert!(config.validate().is_ok());
    }
}
