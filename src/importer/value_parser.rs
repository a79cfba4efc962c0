// ==========================================
// 库存呆滞分析系统 - 单元格值解析
// ==========================================
// 职责: 巴西数字格式 / 日期（ISO, DD/MM/YYYY, DD.MM.YYYY, Excel 序列号）/ 库龄天数
// ==========================================

use crate::importer::importer_trait::RawCell;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Excel 日期序列号纪元（序列号 1 = 1899-12-31, 兼容 1900 闰年缺陷）
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// 清理文本（去首尾空白）
pub fn clean_text(cell: &RawCell) -> String {
    cell.as_text().trim().to_string()
}

/// 编码类文本（物料号/单号）: 整数值单元格不带小数输出
pub fn code_text(cell: &RawCell) -> String {
    match cell {
        RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        _ => clean_text(cell),
    }
}

/// 解析巴西数字格式（"1.234,5" → 1234.5）
///
/// 文本去掉千分位点后将逗号换为小数点; 数值单元格原样返回。
pub fn parse_br_number(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Empty => None,
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => {
            let normalized = s.trim().replace('.', "").replace(',', ".");
            normalized.parse::<f64>().ok().filter(|v| v.is_finite())
        }
    }
}

/// 解析逗号小数（"12,5" → 12.5, "12.5" → 12.5）
///
/// 用于单价表: 只替换逗号, 点仍视为小数点。
pub fn parse_decimal_comma(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Empty => None,
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
    }
}

/// 解析数量: 含逗号按巴西格式, 否则点视为小数点
pub fn parse_quantity(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Text(s) if s.contains(',') => parse_br_number(cell),
        _ => parse_decimal_comma(cell),
    }
}

/// Excel 可表示的最大序列号（9999-12-31）
pub const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Excel 序列号 → 日期（超出 Excel 日期范围视为无法解析）
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let days = serial.floor() as i64;
    excel_epoch()?.checked_add_signed(Duration::days(days))
}

/// 解析日期文本
fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // CSV 中的 Excel 序列号
    s.parse::<f64>().ok().and_then(excel_serial_to_date)
}

/// 解析日期单元格
pub fn parse_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Empty => None,
        RawCell::Number(n) => excel_serial_to_date(*n),
        RawCell::Text(s) => parse_date_text(s),
    }
}

/// 日期格式化为 DD/MM/YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// 日期单元格 → 展示文本
///
/// 可解析则统一为 DD/MM/YYYY, 否则保留原文; 空单元格为 None。
pub fn display_date(cell: &RawCell) -> Option<String> {
    if cell.is_empty() {
        return None;
    }
    Some(match parse_date(cell) {
        Some(date) => format_date(date),
        None => clean_text(cell),
    })
}

/// 库龄天数 = today - 最后移动日期（无日期为 0, 未来日期截断为 0）
pub fn aging_days(last_movement: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match last_movement {
        Some(date) => (today - date).num_days().max(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_br_number() {
        assert_eq!(parse_br_number(&text("1.234,5")), Some(1234.5));
        assert_eq!(parse_br_number(&text("12,000")), Some(12.0));
        assert_eq!(parse_br_number(&text("1.000")), Some(1000.0));
        assert_eq!(parse_br_number(&RawCell::Number(3.25)), Some(3.25));
        assert_eq!(parse_br_number(&text("abc")), None);
        assert_eq!(parse_br_number(&RawCell::Empty), None);
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_decimal_comma(&text("12,5")), Some(12.5));
        assert_eq!(parse_decimal_comma(&text("12.5")), Some(12.5));
        assert_eq!(parse_decimal_comma(&text("-")), None);
    }

    #[test]
    fn test_quantity() {
        assert_eq!(parse_quantity(&text("0.05")), Some(0.05));
        assert_eq!(parse_quantity(&text("1.234,5")), Some(1234.5));
        assert_eq!(parse_quantity(&text("0,050")), Some(0.05));
        assert_eq!(parse_quantity(&RawCell::Number(7.0)), Some(7.0));
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse_date(&text("2024-03-15")), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&text("15/03/2024")), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&text("15.03.2024")), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&RawCell::Number(45366.0)), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&text("45366")), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date(&text("sem data")), None);
    }

    #[test]
    fn test_out_of_range_serial_is_unparsable() {
        assert_eq!(parse_date(&RawCell::Number(1e15)), None);
        assert_eq!(parse_date(&text("99999999999999999")), None);
        assert_eq!(parse_date(&RawCell::Number(MAX_EXCEL_SERIAL)), Some(ymd(9999, 12, 31)));
        assert_eq!(parse_date(&RawCell::Number(MAX_EXCEL_SERIAL + 1.0)), None);

        let today = ymd(2024, 3, 25);
        assert_eq!(aging_days(parse_date(&RawCell::Number(1e15)), today), 0);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(&RawCell::Number(45366.0)), Some("15/03/2024".to_string()));
        assert_eq!(display_date(&text("n/a")), Some("n/a".to_string()));
        assert_eq!(display_date(&RawCell::Empty), None);
    }

    #[test]
    fn test_aging_days() {
        let today = ymd(2024, 3, 25);
        assert_eq!(aging_days(Some(ymd(2024, 3, 15)), today), 10);
        assert_eq!(aging_days(Some(ymd(2024, 4, 1)), today), 0);
        assert_eq!(aging_days(None, today), 0);
    }
}
