//! 班次生命周期管理
//!
//! 开班的三个前置检查按顺序执行以给出与界面约定一致的错误信息；
//! 并发竞态最终由存储层约束（全局唯一未关闭班次、日期+类型唯一）兜底。
//! 关班是全系统唯一的多语句事务，七个步骤要么全部生效要么全部回滚。

use crate::connection::DatabasePool;
use crate::models::{DbExpenseAggregates, DbOpdAggregates, DbShift};
use crate::{is_unique_violation, map_sql_err};
use chrono::{NaiveDate, Utc};
use opd_core::{OpdError, Result, Shift, ShiftCashSummary, ShiftType};
use sqlx::{Postgres, QueryBuilder};

/// 班次列表过滤条件
#[derive(Debug, Default)]
pub struct ShiftFilter {
    pub date: Option<NaiveDate>,
    pub is_closed: Option<bool>,
}

/// 班次查询操作接口
pub struct ShiftQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ShiftQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 按条件列出班次
    pub async fn list(&self, filter: &ShiftFilter) -> Result<Vec<Shift>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM shifts WHERE 1=1");
        if let Some(date) = filter.date {
            qb.push(" AND shift_date = ").push_bind(date);
        }
        if let Some(is_closed) = filter.is_closed {
            qb.push(" AND is_closed = ").push_bind(is_closed);
        }
        qb.push(" ORDER BY shift_date DESC, shift_id DESC");

        let rows: Vec<DbShift> = qb
            .build_query_as()
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Shift::from).collect())
    }

    /// 根据ID查找班次
    pub async fn by_id(&self, shift_id: i64) -> Result<Shift> {
        let row: Option<DbShift> = sqlx::query_as("SELECT * FROM shifts WHERE shift_id = $1")
            .bind(shift_id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(Shift::from)
            .ok_or_else(|| OpdError::NotFound("Shift not found".to_string()))
    }

    /// 某日期的全部班次
    pub async fn by_date(&self, date: NaiveDate) -> Result<Vec<Shift>> {
        let rows: Vec<DbShift> =
            sqlx::query_as("SELECT * FROM shifts WHERE shift_date = $1 ORDER BY shift_type")
                .bind(date)
                .fetch_all(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Shift::from).collect())
    }

    /// 当前唯一未关闭的班次，每次调用都重新读取
    pub async fn current(&self) -> Result<Option<Shift>> {
        let row: Option<DbShift> = sqlx::query_as(
            "SELECT * FROM shifts WHERE is_closed = FALSE ORDER BY shift_id DESC LIMIT 1",
        )
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(row.map(Shift::from))
    }

    /// 开班
    ///
    /// 前置条件: 无未关闭班次；该日期该类型尚无班次；该日期班次少于3个。
    pub async fn open(
        &self,
        shift_date: NaiveDate,
        shift_type: ShiftType,
        opened_by: &str,
    ) -> Result<Shift> {
        if let Some(current) = self.current().await? {
            return Err(OpdError::OpenShiftExists(Box::new(current)));
        }

        let duplicate: Option<(i64,)> =
            sqlx::query_as("SELECT shift_id FROM shifts WHERE shift_date = $1 AND shift_type = $2")
                .bind(shift_date)
                .bind(shift_type.as_str())
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        if duplicate.is_some() {
            return Err(OpdError::Conflict(format!(
                "{} shift already exists for {}",
                shift_type.as_str(),
                shift_date
            )));
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shifts WHERE shift_date = $1")
            .bind(shift_date)
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if count >= 3 {
            return Err(OpdError::Conflict(
                "Maximum 3 shifts allowed per day".to_string(),
            ));
        }

        // 并发竞态下由唯一约束拦截，冲突归入业务冲突
        let row: DbShift = sqlx::query_as(
            r#"
            INSERT INTO shifts (shift_date, shift_type, shift_start_time, opened_by, is_closed)
            VALUES ($1, $2, NOW(), $3, FALSE)
            RETURNING *
            "#,
        )
        .bind(shift_date)
        .bind(shift_type.as_str())
        .bind(opened_by)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                OpdError::Conflict("This shift already exists for the date".to_string())
            } else {
                map_sql_err(e)
            }
        })?;

        tracing::info!(shift_id = row.shift_id, "Shift opened");
        Ok(row.into())
    }

    /// 关班，返回现金结算记录
    ///
    /// 单事务七步: 读班次 → 聚合票据 → 聚合支出 → 守卫式关闭（受影响行数
    /// 为0说明已被并发关闭）→ 级联子表 shift_closed → 插入唯一结算记录
    /// （shift_id 唯一约束拦截重复关班）→ 提交。
    pub async fn close(&self, shift_id: i64, closed_by: &str) -> Result<ShiftCashSummary> {
        let mut tx = self
            .pool
            .pool()
            .begin()
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;

        // 1. 读取班次
        let shift: Shift = sqlx::query_as::<_, DbShift>("SELECT * FROM shifts WHERE shift_id = $1")
            .bind(shift_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?
            .map(Shift::from)
            .ok_or_else(|| OpdError::NotFound("Shift not found".to_string()))?;

        // 2. 聚合本班次票据，排除作废，空集合一律归零
        let opd: DbOpdAggregates = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_quantity,
                MIN(receipt_id) AS receipt_from,
                MAX(receipt_id) AS receipt_to,
                COALESCE(SUM(total_amount), 0) AS total_amount,
                COALESCE(SUM(discount_amount), 0) AS total_discount_amount,
                COALESCE(SUM(paid), 0) AS total_paid,
                COALESCE(SUM(balance), 0) AS total_balance,
                COUNT(*) FILTER (WHERE opd_discount) AS discount_qty
            FROM opd_patient_data
            WHERE shift_id = $1 AND opd_cancelled = FALSE
            "#,
        )
        .bind(shift_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        // 3. 聚合本班次支出
        let expenses: DbExpenseAggregates = sqlx::query_as(
            r#"
            SELECT
                MIN(expense_id) AS expense_from,
                MAX(expense_id) AS expense_to,
                COALESCE(SUM(expense_amount), 0) AS total_expenses
            FROM expenses
            WHERE shift_id = $1
            "#,
        )
        .bind(shift_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        // 4. 守卫式关闭，只在尚未关闭时生效
        let updated = sqlx::query(
            r#"
            UPDATE shifts
            SET is_closed = TRUE, shift_end_time = NOW(), closed_by = $1
            WHERE shift_id = $2 AND is_closed = FALSE
            "#,
        )
        .bind(closed_by)
        .bind(shift_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
            return Err(OpdError::Conflict("Shift already closed".to_string()));
        }

        // 5. 级联子表的 shift_closed 标志（幂等批量更新）
        sqlx::query("UPDATE opd_patient_data SET shift_closed = TRUE WHERE shift_id = $1")
            .bind(shift_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        sqlx::query("UPDATE consultant_payments SET shift_closed = TRUE WHERE shift_id = $1")
            .bind(shift_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;

        // 6. 组装并插入现金结算记录
        let mut summary = ShiftCashSummary::compose(
            &shift,
            &opd.into(),
            &expenses.into(),
            closed_by,
            Utc::now().time(),
        );

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO opd_shift_cash (
                shift_id, shift_date, shift_time, shift_type, submit_by,
                receipt_from, receipt_to, expense_from, expense_to,
                total_amount, total_quantity, total_collected,
                total_discount_quantity, total_discount_amount, total_paid, total_balance,
                service_head, service_qty, service_amount,
                service_discount_qty, service_discount_amount, service_paid, service_balance,
                service_invoice_from, service_invoice_to
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            RETURNING srl_no
            "#,
        )
        .bind(summary.shift_id)
        .bind(summary.shift_date)
        .bind(summary.shift_time)
        .bind(summary.shift_type.as_str())
        .bind(&summary.submit_by)
        .bind(&summary.receipt_from)
        .bind(&summary.receipt_to)
        .bind(&summary.expense_from)
        .bind(&summary.expense_to)
        .bind(summary.total_amount)
        .bind(summary.total_quantity)
        .bind(summary.total_collected)
        .bind(summary.total_discount_quantity)
        .bind(summary.total_discount_amount)
        .bind(summary.total_paid)
        .bind(summary.total_balance)
        .bind(&summary.service_head)
        .bind(summary.service_qty)
        .bind(summary.service_amount)
        .bind(summary.service_discount_qty)
        .bind(summary.service_discount_amount)
        .bind(summary.service_paid)
        .bind(summary.service_balance)
        .bind(&summary.service_invoice_from)
        .bind(&summary.service_invoice_to)
        .fetch_one(&mut *tx)
        .await;

        summary.srl_no = match inserted {
            Ok(srl_no) => srl_no,
            Err(e) if is_unique_violation(&e) => {
                tx.rollback()
                    .await
                    .map_err(|e| OpdError::Database(e.to_string()))?;
                return Err(OpdError::Conflict("Shift already closed".to_string()));
            }
            Err(e) => return Err(OpdError::Database(e.to_string())),
        };

        // 7. 提交，任一失败则整体回滚
        tx.commit()
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;

        tracing::info!(shift_id, closed_by, "Shift closed");
        Ok(summary)
    }
}
