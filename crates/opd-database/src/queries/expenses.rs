//! 支出查询操作

use crate::codes::CodeAllocator;
use crate::connection::DatabasePool;
use crate::models::{DbExpense, ExpenseUpdate, NewExpense};
use crate::map_sql_err;
use chrono::NaiveDate;
use opd_core::{Expense, OpdError, Result};
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

/// 支出列表过滤条件
#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub shift_date: Option<NaiveDate>,
    /// "All" 表示不过滤班次
    pub shift_type: Option<String>,
}

/// 按班次分组的日支出汇总行
#[derive(Debug, Serialize, FromRow)]
pub struct ExpenseShiftTotal {
    pub expense_shift: String,
    pub expense_count: i64,
    pub total_amount: f64,
}

/// 支出查询操作接口
pub struct ExpenseQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ExpenseQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 按条件列出支出
    pub async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM expenses WHERE 1=1");
        if let Some(date) = filter.date {
            qb.push(" AND expense_date = ").push_bind(date);
        }
        if let Some(shift_id) = filter.shift_id {
            qb.push(" AND shift_id = ").push_bind(shift_id);
        }
        if let Some(shift_date) = filter.shift_date {
            qb.push(" AND shift_date = ").push_bind(shift_date);
        }
        if let Some(shift_type) = &filter.shift_type {
            if shift_type != "All" {
                qb.push(" AND expense_shift = ").push_bind(shift_type.clone());
            }
        }
        qb.push(" ORDER BY expense_date DESC, expense_time DESC");

        let rows: Vec<DbExpense> = qb
            .build_query_as()
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// 根据流水号查找支出
    pub async fn by_id(&self, srl_no: i64) -> Result<Expense> {
        let row: Option<DbExpense> = sqlx::query_as("SELECT * FROM expenses WHERE srl_no = $1")
            .bind(srl_no)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(Expense::from)
            .ok_or_else(|| OpdError::NotFound("Expense not found".to_string()))
    }

    /// 某班次的全部支出
    pub async fn by_shift(&self, shift_id: i64) -> Result<Vec<Expense>> {
        let rows: Vec<DbExpense> =
            sqlx::query_as("SELECT * FROM expenses WHERE shift_id = $1 ORDER BY expense_time")
                .bind(shift_id)
                .fetch_all(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// 某日按班次分组的支出汇总
    pub async fn summary_by_date(&self, date: NaiveDate) -> Result<Vec<ExpenseShiftTotal>> {
        sqlx::query_as(
            r#"
            SELECT expense_shift,
                   COUNT(*) AS expense_count,
                   COALESCE(SUM(expense_amount), 0) AS total_amount
            FROM expenses
            WHERE expense_date = $1
            GROUP BY expense_shift
            ORDER BY expense_shift
            "#,
        )
        .bind(date)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))
    }

    /// 登记支出，编号由计数器原子分配
    pub async fn create(&self, new: &NewExpense) -> Result<Expense> {
        let expense_id = CodeAllocator::new(self.pool).next_expense_id().await?;

        let row: DbExpense = sqlx::query_as(
            r#"
            INSERT INTO expenses (
                expense_id, expense_date, expense_time, expense_shift,
                expense_description, expense_name, expense_amount, expense_by,
                shift_id, shift_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&expense_id)
        .bind(new.expense_date)
        .bind(new.expense_time)
        .bind(&new.expense_shift)
        .bind(&new.expense_description)
        .bind(&new.expense_name)
        .bind(new.expense_amount)
        .bind(&new.expense_by)
        .bind(new.shift_id)
        .bind(new.shift_date)
        .fetch_one(self.pool.pool())
        .await
        .map_err(map_sql_err)?;

        tracing::info!(expense_id = %row.expense_id, amount = row.expense_amount, "expense recorded");
        Ok(row.into())
    }

    /// 整体更新支出
    pub async fn update(&self, srl_no: i64, update: &ExpenseUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE expenses SET
                expense_date = $1, expense_time = $2, expense_shift = $3,
                expense_description = $4, expense_name = $5,
                expense_amount = $6, expense_by = $7
            WHERE srl_no = $8
            "#,
        )
        .bind(update.expense_date)
        .bind(update.expense_time)
        .bind(&update.expense_shift)
        .bind(&update.expense_description)
        .bind(&update.expense_name)
        .bind(update.expense_amount)
        .bind(&update.expense_by)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Expense not found".to_string()));
        }
        Ok(())
    }

    /// 删除支出
    pub async fn delete(&self, srl_no: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE srl_no = $1")
            .bind(srl_no)
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Expense not found".to_string()));
        }
        Ok(())
    }
}
