// ==========================================
// 库存呆滞分析系统 - 残余分级判定
// ==========================================
// 红线: 等级制, 上界包含（等于阈值归入较轻等级）
// 规则:
// - q > tier3_max        → None（正常库存）
// - q ≤ tier1_max        → Tier1
// - q ≤ tier2_max        → Tier2
// - 其余                 → Tier3
// ==========================================

use crate::config::ResidualConfig;
use crate::domain::types::ResidualTier;

/// 按克数判定残余等级
///
/// 不校验阈值顺序；NaN 无法参与比较, 判为 None。
/// 旧版比较链会把 NaN 落入 Tier3（vermelho）, 此处有意不沿用。
pub fn classify(normalized_grams: f64, config: &ResidualConfig) -> Option<ResidualTier> {
    if normalized_grams.is_nan() || normalized_grams > config.tier3_max_grams {
        return None;
    }

    if normalized_grams <= config.tier1_max_grams {
        Some(ResidualTier::Tier1)
    } else if normalized_grams <= config.tier2_max_grams {
        Some(ResidualTier::Tier2)
    } else {
        Some(ResidualTier::Tier3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ResidualConfig {
        ResidualConfig::default()
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let config = cfg();
        assert_eq!(classify(0.0, &config), Some(ResidualTier::Tier1));
        assert_eq!(classify(100.0, &config), Some(ResidualTier::Tier1));
        assert_eq!(classify(100.0001, &config), Some(ResidualTier::Tier2));
        assert_eq!(classify(900.0, &config), Some(ResidualTier::Tier2));
        assert_eq!(classify(900.5, &config), Some(ResidualTier::Tier3));
        assert_eq!(classify(999.0, &config), Some(ResidualTier::Tier3));
        assert_eq!(classify(999.0001, &config), None);
    }

    #[test]
    fn test_negative_quantity_is_tier1() {
        assert_eq!(classify(-5.0, &cfg()), Some(ResidualTier::Tier1));
    }

    #[test]
    fn test_nan_is_none() {
        assert_eq!(classify(f64::NAN, &cfg()), None);
    }

    #[test]
    fn test_out_of_order_config_is_honored() {
        // tier2 < tier1: Tier2 永远不可达, 但不报错
        let config = ResidualConfig::with_thresholds(500.0, 200.0, 999.0);
        assert_eq!(classify(300.0, &config), Some(ResidualTier::Tier1));
        assert_eq!(classify(600.0, &config), Some(ResidualTier::Tier3));
    }

    #[test]
    fn test_equal_thresholds_collapse_tiers() {
        let config = ResidualConfig::with_thresholds(100.0, 100.0, 100.0);
        assert_eq!(classify(100.0, &config), Some(ResidualTier::Tier1));
        assert_eq!(classify(100.5, &config), None);
    }
}
