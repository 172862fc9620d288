//! 班次现金结算查询操作

use crate::connection::DatabasePool;
use crate::models::{DbShiftCash, ShiftCashCorrection};
use chrono::NaiveDate;
use opd_core::{OpdError, Result, ShiftCashSummary};
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

/// 结算记录过滤条件
#[derive(Debug, Default)]
pub struct ShiftCashFilter {
    pub date: Option<NaiveDate>,
    pub shift_type: Option<String>,
}

/// 全天现金日报：各班次结算行加汇总
#[derive(Debug, Serialize)]
pub struct DailyCashReport {
    pub date: NaiveDate,
    pub shifts: Vec<ShiftCashSummary>,
    pub totals: DailyCashTotals,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct DailyCashTotals {
    pub total_quantity: i64,
    pub total_amount: f64,
    pub total_discount_amount: f64,
    pub total_paid: f64,
    pub total_collected: f64,
}

/// 把各班次结算行折叠成全天汇总
pub fn fold_daily_totals(shifts: &[ShiftCashSummary]) -> DailyCashTotals {
    shifts.iter().fold(DailyCashTotals::default(), |mut acc, s| {
        acc.total_quantity += s.total_quantity;
        acc.total_amount += s.total_amount;
        acc.total_discount_amount += s.total_discount_amount;
        acc.total_paid += s.total_paid;
        acc.total_collected += s.total_collected;
        acc
    })
}

/// 结算记录查询操作接口
pub struct ShiftCashQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ShiftCashQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 按条件列出结算记录
    pub async fn list(&self, filter: &ShiftCashFilter) -> Result<Vec<ShiftCashSummary>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM opd_shift_cash WHERE 1=1");
        if let Some(date) = filter.date {
            qb.push(" AND shift_date = ").push_bind(date);
        }
        if let Some(shift_type) = &filter.shift_type {
            qb.push(" AND shift_type = ").push_bind(shift_type.clone());
        }
        qb.push(" ORDER BY shift_date DESC, srl_no DESC");

        let rows: Vec<DbShiftCash> = qb
            .build_query_as()
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(ShiftCashSummary::from).collect())
    }

    /// 根据流水号查找结算记录
    pub async fn by_id(&self, srl_no: i64) -> Result<ShiftCashSummary> {
        let row: Option<DbShiftCash> =
            sqlx::query_as("SELECT * FROM opd_shift_cash WHERE srl_no = $1")
                .bind(srl_no)
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(ShiftCashSummary::from)
            .ok_or_else(|| OpdError::NotFound("Shift cash record not found".to_string()))
    }

    /// 根据班次号查找结算记录（每班次至多一条）
    pub async fn by_shift_id(&self, shift_id: i64) -> Result<ShiftCashSummary> {
        let row: Option<DbShiftCash> =
            sqlx::query_as("SELECT * FROM opd_shift_cash WHERE shift_id = $1")
                .bind(shift_id)
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(ShiftCashSummary::from)
            .ok_or_else(|| OpdError::NotFound("Shift cash record not found".to_string()))
    }

    /// 全天现金日报
    pub async fn daily(&self, date: NaiveDate) -> Result<DailyCashReport> {
        let rows: Vec<DbShiftCash> =
            sqlx::query_as("SELECT * FROM opd_shift_cash WHERE shift_date = $1 ORDER BY srl_no")
                .bind(date)
                .fetch_all(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        let shifts: Vec<ShiftCashSummary> =
            rows.into_iter().map(ShiftCashSummary::from).collect();
        let totals = fold_daily_totals(&shifts);
        Ok(DailyCashReport { date, shifts, totals })
    }

    /// 事后更正结算记录（仅白名单字段，shift_id不可改）
    pub async fn correct(&self, srl_no: i64, correction: &ShiftCashCorrection) -> Result<()> {
        let mut qb = match build_correction(srl_no, correction) {
            Some(qb) => qb,
            None => return Err(OpdError::Validation("No fields to update".to_string())),
        };
        let result = qb
            .build()
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Shift cash record not found".to_string()));
        }
        tracing::info!(srl_no, "shift cash record corrected");
        Ok(())
    }
}

/// 白名单式更正语句构造，没有可更正字段时返回None
fn build_correction(
    srl_no: i64,
    correction: &ShiftCashCorrection,
) -> Option<QueryBuilder<'static, Postgres>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE opd_shift_cash SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        macro_rules! set_field {
            ($field:ident, $column:literal) => {
                if let Some(v) = &correction.$field {
                    sep.push(concat!($column, " = "));
                    sep.push_bind_unseparated(v.clone());
                    any = true;
                }
            };
        }
        set_field!(submit_by, "submit_by");
        set_field!(receipt_from, "receipt_from");
        set_field!(receipt_to, "receipt_to");
        set_field!(expense_from, "expense_from");
        set_field!(expense_to, "expense_to");
        set_field!(total_amount, "total_amount");
        set_field!(total_quantity, "total_quantity");
        set_field!(total_collected, "total_collected");
        set_field!(total_discount_quantity, "total_discount_quantity");
        set_field!(total_discount_amount, "total_discount_amount");
        set_field!(total_paid, "total_paid");
        set_field!(total_balance, "total_balance");
    }
    if !any {
        return None;
    }
    qb.push(" WHERE srl_no = ").push_bind(srl_no);
    Some(qb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use opd_core::{OpdAggregates, ShiftType};

    fn summary(paid: f64, expenses: f64, qty: i64) -> ShiftCashSummary {
        let shift = opd_core::Shift {
            shift_id: 1,
            shift_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            shift_type: ShiftType::Morning,
            shift_start_time: Utc::now(),
            shift_end_time: None,
            opened_by: "cashier".to_string(),
            closed_by: None,
            is_closed: false,
        };
        let opd = OpdAggregates {
            total_quantity: qty,
            total_paid: paid,
            total_amount: paid,
            ..Default::default()
        };
        let exp = opd_core::ExpenseAggregates {
            total_expenses: expenses,
            ..Default::default()
        };
        ShiftCashSummary::compose(
            &shift,
            &opd,
            &exp,
            "cashier",
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_daily_totals_fold_across_shifts() {
        let shifts = vec![summary(750.0, 100.0, 3), summary(500.0, 0.0, 2)];
        let totals = fold_daily_totals(&shifts);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_paid, 1250.0);
        assert_eq!(totals.total_collected, 1150.0);
    }

    #[test]
    fn test_daily_totals_empty_day() {
        assert_eq!(fold_daily_totals(&[]), DailyCashTotals::default());
    }

    #[test]
    fn test_correction_builder_never_touches_shift_id() {
        let correction = ShiftCashCorrection {
            total_collected: Some(900.0),
            submit_by: Some("supervisor".to_string()),
            ..Default::default()
        };
        let mut qb = build_correction(4, &correction).unwrap();
        let sql = qb.sql();
        assert!(sql.contains("submit_by = $1"));
        assert!(sql.contains("total_collected = $2"));
        assert!(!sql.contains("shift_id"));
        assert!(sql.ends_with("WHERE srl_no = $3"));
    }

    #[test]
    fn test_correction_builder_rejects_empty_update() {
        assert!(build_correction(1, &ShiftCashCorrection::default()).is_none());
    }
}
