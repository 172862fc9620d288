//! 单据编号生成工具
//!
//! 票据、支出、付款凭证和MR号均为固定前缀加零填充序号。序号本身由
//! 数据库侧的计数器原子分配，这里只负责作用域和格式化。

/// 票据编号前缀（5位序号）
pub const RECEIPT_PREFIX: &str = "OPD";
pub const RECEIPT_WIDTH: usize = 5;

/// 支出编号前缀（4位序号）
pub const EXPENSE_PREFIX: &str = "EXP";
pub const EXPENSE_WIDTH: usize = 4;

/// 付款凭证编号前缀（4位序号）
pub const PAYMENT_PREFIX: &str = "PAY";
pub const PAYMENT_WIDTH: usize = 4;

/// MR号序号位数
pub const MR_WIDTH: usize = 5;

/// 按前缀与位数格式化编号，如 format_code("OPD", 5, 1) -> "OPD00001"
pub fn format_code(prefix: &str, width: usize, seq: i64) -> String {
    format!("{}{:0>width$}", prefix, seq, width = width)
}

/// MR号计数器作用域，按自然年隔离，如 "MR-2026"
pub fn mr_scope(year: i32) -> String {
    format!("MR-{}", year)
}

/// 格式化MR号，如 format_mr_number(2026, 1) -> "MR-2026-00001"
pub fn format_mr_number(year: i32, seq: i64) -> String {
    format!("{}-{:0>width$}", mr_scope(year), seq, width = MR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_codes_match_documented_seeds() {
        assert_eq!(format_code(RECEIPT_PREFIX, RECEIPT_WIDTH, 1), "OPD00001");
        assert_eq!(format_code(EXPENSE_PREFIX, EXPENSE_WIDTH, 1), "EXP0001");
        assert_eq!(format_code(PAYMENT_PREFIX, PAYMENT_WIDTH, 1), "PAY0001");
        assert_eq!(format_mr_number(2026, 1), "MR-2026-00001");
    }

    #[test]
    fn test_sequence_increments_preserve_order() {
        // 连续序号格式化后保持字典序递增
        let a = format_code(RECEIPT_PREFIX, RECEIPT_WIDTH, 41);
        let b = format_code(RECEIPT_PREFIX, RECEIPT_WIDTH, 42);
        assert_eq!(a, "OPD00041");
        assert_eq!(b, "OPD00042");
        assert!(a < b);
    }

    #[test]
    fn test_width_overflow_keeps_full_number() {
        // 序号超过位宽时不截断
        assert_eq!(format_code(EXPENSE_PREFIX, EXPENSE_WIDTH, 123456), "EXP123456");
    }

    #[test]
    fn test_mr_scope_is_year_bound() {
        assert_eq!(mr_scope(2025), "MR-2025");
        assert_ne!(mr_scope(2025), mr_scope(2026));
    }
}
