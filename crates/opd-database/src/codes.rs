//! 单据编号原子分配
//!
//! 原实现读取最后一条编号再加一，两次并发创建会算出同一个下一号。
//! 这里换成 code_counters 表上的单条 upsert-returning 语句，由数据库
//! 保证序号分配的原子性，应用侧只做格式化。

use crate::connection::DatabasePool;
use chrono::{Datelike, Utc};
use opd_core::codes::{
    format_code, format_mr_number, mr_scope, EXPENSE_PREFIX, EXPENSE_WIDTH, PAYMENT_PREFIX,
    PAYMENT_WIDTH, RECEIPT_PREFIX, RECEIPT_WIDTH,
};
use opd_core::{OpdError, Result};

/// 编号分配器
pub struct CodeAllocator<'a> {
    pool: &'a DatabasePool,
}

impl<'a> CodeAllocator<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 在指定作用域内原子取下一个序号
    async fn next_seq(&self, scope: &str) -> Result<i64> {
        let (seq,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO code_counters (scope, last_value) VALUES ($1, 1)
            ON CONFLICT (scope) DO UPDATE SET last_value = code_counters.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(scope)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(seq)
    }

    /// 下一个票据编号，如 OPD00001
    pub async fn next_receipt_id(&self) -> Result<String> {
        let seq = self.next_seq(RECEIPT_PREFIX).await?;
        Ok(format_code(RECEIPT_PREFIX, RECEIPT_WIDTH, seq))
    }

    /// 下一个支出编号，如 EXP0001
    pub async fn next_expense_id(&self) -> Result<String> {
        let seq = self.next_seq(EXPENSE_PREFIX).await?;
        Ok(format_code(EXPENSE_PREFIX, EXPENSE_WIDTH, seq))
    }

    /// 下一个付款凭证编号，如 PAY0001
    pub async fn next_payment_id(&self) -> Result<String> {
        let seq = self.next_seq(PAYMENT_PREFIX).await?;
        Ok(format_code(PAYMENT_PREFIX, PAYMENT_WIDTH, seq))
    }

    /// 下一个MR号，按当前自然年隔离，如 MR-2026-00001
    pub async fn next_mr_number(&self) -> Result<String> {
        let year = Utc::now().year();
        let seq = self.next_seq(&mr_scope(year)).await?;
        Ok(format_mr_number(year, seq))
    }
}
