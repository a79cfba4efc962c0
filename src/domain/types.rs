// ==========================================
// 库存呆滞分析系统 - 领域类型定义
// ==========================================
// 残余等级 / 质量单位 / 库龄等级 / 导入类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 残余等级 (Residual Tier)
// ==========================================
// 红线: 等级制, 顺序 Tier1 < Tier2 < Tier3
// "不适用" 用 Option::None 表达, 不作为枚举值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidualTier {
    Tier1, // 绿 (verde) - 最轻
    Tier2, // 黄 (amarelo)
    Tier3, // 红 (vermelho) - 最重
}

impl fmt::Display for ResidualTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidualTier::Tier1 => write!(f, "TIER1"),
            ResidualTier::Tier2 => write!(f, "TIER2"),
            ResidualTier::Tier3 => write!(f, "TIER3"),
        }
    }
}

impl ResidualTier {
    /// 从字符串解析等级（兼容源系统的颜色命名）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TIER1" | "VERDE" | "GREEN" => Some(ResidualTier::Tier1),
            "TIER2" | "AMARELO" | "YELLOW" => Some(ResidualTier::Tier2),
            "TIER3" | "VERMELHO" | "RED" => Some(ResidualTier::Tier3),
            _ => None,
        }
    }

    /// 排序优先级（越大越优先处理）
    pub fn priority(&self) -> u8 {
        match self {
            ResidualTier::Tier1 => 1,
            ResidualTier::Tier2 => 2,
            ResidualTier::Tier3 => 3,
        }
    }
}

// ==========================================
// 质量单位 (Mass Unit)
// ==========================================
// 只有这些单位可以换算为克; 其余单位按原值透传
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MassUnit {
    Milligram,
    Gram,
    Kilogram,
    Tonne,
}

impl MassUnit {
    /// 解析单位代码（忽略大小写与首尾空白）
    pub fn parse(unit: &str) -> Option<Self> {
        match unit.trim().to_uppercase().as_str() {
            "MG" => Some(MassUnit::Milligram),
            "G" => Some(MassUnit::Gram),
            "KG" => Some(MassUnit::Kilogram),
            "T" | "TON" => Some(MassUnit::Tonne),
            _ => None,
        }
    }

    /// 换算到克
    pub fn to_grams(&self, quantity: f64) -> f64 {
        match self {
            MassUnit::Milligram => quantity / 1000.0,
            MassUnit::Gram => quantity,
            MassUnit::Kilogram => quantity * 1000.0,
            MassUnit::Tonne => quantity * 1_000_000.0,
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MassUnit::Milligram => write!(f, "MG"),
            MassUnit::Gram => write!(f, "G"),
            MassUnit::Kilogram => write!(f, "KG"),
            MassUnit::Tonne => write!(f, "TON"),
        }
    }
}

// ==========================================
// 库龄等级 (Aging Criticality)
// ==========================================
// 顺序: Normal < Alert < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgingCriticality {
    Normal,   // 正常
    Alert,    // 关注
    Critical, // 严重
}

impl fmt::Display for AgingCriticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgingCriticality::Normal => write!(f, "NORMAL"),
            AgingCriticality::Alert => write!(f, "ALERT"),
            AgingCriticality::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 导入类型 (Import Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportKind {
    Stock,    // 库存明细
    Shipment, // 交货单 (remessa)
    Price,    // 物料单价
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl ImportKind {
    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ImportKind::Stock => "STOCK",
            ImportKind::Shipment => "SHIPMENT",
            ImportKind::Price => "PRICE",
        }
    }

    /// 从字符串解析导入类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STOCK" => Some(ImportKind::Stock),
            "SHIPMENT" => Some(ImportKind::Shipment),
            "PRICE" => Some(ImportKind::Price),
            _ => None,
        }
    }
}
