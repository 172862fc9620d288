//! 经营报表查询
//!
//! 报表只读，基于票据、支出、付款凭证和现金结算表即时聚合。金额口径与
//! 关班结算一致: 净实收 = 实缴合计 - 支出合计。日报按班次类型分组呈现，
//! 作废张数与退费金额单列；月报年报剔除作废票据后按日/按月分解。

use crate::connection::DatabasePool;
use crate::models::{DbConsultantPayment, DbExpense, DbOpdReceipt, DbShift, DbShiftCash};
use crate::queries::expenses::ExpenseShiftTotal;
use chrono::NaiveDate;
use opd_core::{
    ConsultantPayment, Expense, OpdError, OpdReceipt, Result, Shift, ShiftCashSummary,
};
use serde::Serialize;
use sqlx::FromRow;

/// 日报中按班次类型聚合的OPD收入行（含作废票据，金额照列，作废另计张数）
#[derive(Debug, Default, Serialize, FromRow)]
pub struct ShiftTypeOpdRow {
    pub shift_type: String,
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_dr_share: f64,
    pub total_hospital_share: f64,
    pub cancelled_count: i64,
    pub total_refund: f64,
}

/// 日报分班行之上的当日总计
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_dr_share: f64,
    pub total_hospital_share: f64,
}

/// 日报: 某日全部班次的经营全景
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub shifts: Vec<Shift>,
    pub opd_summary: Vec<ShiftTypeOpdRow>,
    pub expenses: Vec<ExpenseShiftTotal>,
    pub shift_cash: Vec<ShiftCashSummary>,
    pub totals: DailyTotals,
}

/// 班次报表的汇总块
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ShiftReportSummary {
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_expenses: f64,
    pub total_dr_payments: f64,
    pub cancelled_count: i64,
    pub refund_amount: f64,
    pub net_collection: f64,
}

/// 班次报表: 班次信息加全部流水明细
#[derive(Debug, Serialize)]
pub struct ShiftReport {
    pub shift: Shift,
    pub opd_records: Vec<OpdReceipt>,
    pub expenses: Vec<Expense>,
    pub payments: Vec<ConsultantPayment>,
    pub shift_cash: Option<ShiftCashSummary>,
    pub summary: ShiftReportSummary,
}

/// 月报中的按日分解行（不含作废票据）
#[derive(Debug, Serialize, FromRow)]
pub struct DailyBreakdownRow {
    pub shift_date: NaiveDate,
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
}

/// 月报中的按日支出行
#[derive(Debug, Serialize, FromRow)]
pub struct DailyExpenseRow {
    pub shift_date: NaiveDate,
    pub total_expense: f64,
}

/// 年报中的按月分解行（不含作废票据）
#[derive(Debug, Serialize, FromRow)]
pub struct MonthlyBreakdownRow {
    pub month: i64,
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
}

/// 年报中的按月支出行
#[derive(Debug, Serialize, FromRow)]
pub struct MonthlyExpenseRow {
    pub month: i64,
    pub total_expense: f64,
}

/// 分解行之上的期间总计
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ReportGrandTotals {
    pub patient_count: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_expense: f64,
    pub net_collection: f64,
}

/// 月报
#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub daily_summaries: Vec<DailyBreakdownRow>,
    pub expense_summary: Vec<DailyExpenseRow>,
    pub totals: ReportGrandTotals,
}

/// 年报
#[derive(Debug, Serialize)]
pub struct YearlyReport {
    pub year: i32,
    pub monthly_summaries: Vec<MonthlyBreakdownRow>,
    pub expense_summary: Vec<MonthlyExpenseRow>,
    pub totals: ReportGrandTotals,
}

/// 服务报表行: 某日的票据张数与服务费合计
#[derive(Debug, Serialize, FromRow)]
pub struct ServiceUsageRow {
    pub report_date: NaiveDate,
    pub record_count: i64,
    pub total_service_amount: f64,
}

/// 把日报分班行折叠成当日总计（作废张数与退费不进总计）
pub fn fold_daily_totals<'r>(rows: impl Iterator<Item = &'r ShiftTypeOpdRow>) -> DailyTotals {
    rows.fold(DailyTotals::default(), |mut acc, row| {
        acc.patient_count += row.patient_count;
        acc.total_amount += row.total_amount;
        acc.total_discount += row.total_discount;
        acc.total_paid += row.total_paid;
        acc.total_balance += row.total_balance;
        acc.total_dr_share += row.total_dr_share;
        acc.total_hospital_share += row.total_hospital_share;
        acc
    })
}

/// 把期间分解行与支出合计折叠成期间总计
pub fn fold_grand_totals(
    rows: impl Iterator<Item = (i64, f64, f64, f64, f64)>,
    total_expense: f64,
) -> ReportGrandTotals {
    let mut acc = rows.fold(
        ReportGrandTotals::default(),
        |mut acc, (patients, amount, discount, paid, balance)| {
            acc.patient_count += patients;
            acc.total_amount += amount;
            acc.total_discount += discount;
            acc.total_paid += paid;
            acc.total_balance += balance;
            acc
        },
    );
    acc.total_expense = total_expense;
    acc.net_collection = acc.total_paid - acc.total_expense;
    acc
}

/// 从班次明细流水汇总班次报表。张数与票面金额只统计未作废票据，
/// 折扣、实缴和欠款照全体票据统计，与关班结算保持同一口径。
pub fn summarize_shift(
    records: &[OpdReceipt],
    expenses: &[Expense],
    payments: &[ConsultantPayment],
) -> ShiftReportSummary {
    let mut summary = ShiftReportSummary::default();
    for r in records {
        if r.opd_cancelled {
            summary.cancelled_count += 1;
        } else {
            summary.patient_count += 1;
            summary.total_amount += r.total_amount;
        }
        if r.opd_refund {
            summary.refund_amount += r.refund_amount;
        }
        summary.total_discount += r.discount_amount;
        summary.total_paid += r.paid;
        summary.total_balance += r.balance;
    }
    summary.total_expenses = expenses.iter().map(|e| e.expense_amount).sum();
    summary.total_dr_payments = payments.iter().map(|p| p.payment_amount).sum();
    summary.net_collection = summary.total_paid - summary.total_expenses;
    summary
}

/// 报表查询接口
pub struct ReportQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ReportQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 某日经营日报: 班次、分班OPD汇总、分班支出、现金结算与当日总计
    pub async fn daily(&self, date: NaiveDate) -> Result<DailyReport> {
        let pool = self.pool.pool();

        let shifts: Vec<DbShift> =
            sqlx::query_as("SELECT * FROM shifts WHERE shift_date = $1 ORDER BY shift_id")
                .bind(date)
                .fetch_all(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;

        let opd_summary: Vec<ShiftTypeOpdRow> = sqlx::query_as(
            r#"
            SELECT shift_type,
                   COUNT(*) AS patient_count,
                   COALESCE(SUM(total_amount), 0) AS total_amount,
                   COALESCE(SUM(discount_amount), 0) AS total_discount,
                   COALESCE(SUM(paid), 0) AS total_paid,
                   COALESCE(SUM(balance), 0) AS total_balance,
                   COALESCE(SUM(dr_share_amount), 0) AS total_dr_share,
                   COALESCE(SUM(hospital_share), 0) AS total_hospital_share,
                   COUNT(*) FILTER (WHERE opd_cancelled) AS cancelled_count,
                   COALESCE(SUM(refund_amount) FILTER (WHERE opd_refund), 0) AS total_refund
            FROM opd_patient_data
            WHERE shift_date = $1
            GROUP BY shift_type
            ORDER BY CASE shift_type
                WHEN 'Morning' THEN 1 WHEN 'Evening' THEN 2 ELSE 3 END
            "#,
        )
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let expenses: Vec<ExpenseShiftTotal> = sqlx::query_as(
            r#"
            SELECT expense_shift,
                   COUNT(*) AS expense_count,
                   COALESCE(SUM(expense_amount), 0) AS total_amount
            FROM expenses
            WHERE shift_date = $1
            GROUP BY expense_shift
            ORDER BY expense_shift
            "#,
        )
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let cash_rows: Vec<DbShiftCash> =
            sqlx::query_as("SELECT * FROM opd_shift_cash WHERE shift_date = $1 ORDER BY srl_no")
                .bind(date)
                .fetch_all(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;

        let totals = fold_daily_totals(opd_summary.iter());
        Ok(DailyReport {
            date,
            shifts: shifts.into_iter().map(Shift::from).collect(),
            opd_summary,
            expenses,
            shift_cash: cash_rows.into_iter().map(ShiftCashSummary::from).collect(),
            totals,
        })
    }

    /// 某班次经营报表: 班次信息、全部流水明细、现金结算（已关班时）与汇总
    pub async fn shift(&self, shift_id: i64) -> Result<ShiftReport> {
        let pool = self.pool.pool();

        let shift: Option<DbShift> = sqlx::query_as("SELECT * FROM shifts WHERE shift_id = $1")
            .bind(shift_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        let shift = shift
            .map(Shift::from)
            .ok_or_else(|| OpdError::NotFound("Shift not found".to_string()))?;

        let records: Vec<DbOpdReceipt> =
            sqlx::query_as("SELECT * FROM opd_patient_data WHERE shift_id = $1 ORDER BY time")
                .bind(shift_id)
                .fetch_all(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        let opd_records: Vec<OpdReceipt> = records.into_iter().map(OpdReceipt::from).collect();

        let expense_rows: Vec<DbExpense> =
            sqlx::query_as("SELECT * FROM expenses WHERE shift_id = $1 ORDER BY expense_time")
                .bind(shift_id)
                .fetch_all(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        let expenses: Vec<Expense> = expense_rows.into_iter().map(Expense::from).collect();

        let payment_rows: Vec<DbConsultantPayment> = sqlx::query_as(
            "SELECT * FROM consultant_payments WHERE shift_id = $1 ORDER BY payment_time",
        )
        .bind(shift_id)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        let payments: Vec<ConsultantPayment> =
            payment_rows.into_iter().map(ConsultantPayment::from).collect();

        let cash: Option<DbShiftCash> =
            sqlx::query_as("SELECT * FROM opd_shift_cash WHERE shift_id = $1")
                .bind(shift_id)
                .fetch_optional(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;

        let summary = summarize_shift(&opd_records, &expenses, &payments);
        Ok(ShiftReport {
            shift,
            opd_records,
            expenses,
            payments,
            shift_cash: cash.map(ShiftCashSummary::from),
            summary,
        })
    }

    /// 月报: 按日分解、按日支出与月度总计
    pub async fn monthly(&self, year: i32, month: u32) -> Result<MonthlyReport> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| OpdError::Validation("Invalid year or month".to_string()))?;
        let end = month_end(start);
        let pool = self.pool.pool();

        let daily_summaries: Vec<DailyBreakdownRow> = sqlx::query_as(
            r#"
            SELECT shift_date,
                   COUNT(*) AS patient_count,
                   COALESCE(SUM(total_amount), 0) AS total_amount,
                   COALESCE(SUM(discount_amount), 0) AS total_discount,
                   COALESCE(SUM(paid), 0) AS total_paid,
                   COALESCE(SUM(balance), 0) AS total_balance
            FROM opd_patient_data
            WHERE shift_date BETWEEN $1 AND $2 AND opd_cancelled = FALSE
            GROUP BY shift_date
            ORDER BY shift_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let expense_summary: Vec<DailyExpenseRow> = sqlx::query_as(
            r#"
            SELECT shift_date,
                   COALESCE(SUM(expense_amount), 0) AS total_expense
            FROM expenses
            WHERE shift_date BETWEEN $1 AND $2
            GROUP BY shift_date
            ORDER BY shift_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let total_expense = expense_summary.iter().map(|r| r.total_expense).sum();
        let totals = fold_grand_totals(
            daily_summaries.iter().map(|d| {
                (d.patient_count, d.total_amount, d.total_discount, d.total_paid, d.total_balance)
            }),
            total_expense,
        );
        Ok(MonthlyReport { year, month, daily_summaries, expense_summary, totals })
    }

    /// 年报: 按月分解、按月支出与年度总计
    pub async fn yearly(&self, year: i32) -> Result<YearlyReport> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| OpdError::Validation("Invalid year".to_string()))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| OpdError::Validation("Invalid year".to_string()))?;
        let pool = self.pool.pool();

        let monthly_summaries: Vec<MonthlyBreakdownRow> = sqlx::query_as(
            r#"
            SELECT EXTRACT(MONTH FROM shift_date)::bigint AS month,
                   COUNT(*) AS patient_count,
                   COALESCE(SUM(total_amount), 0) AS total_amount,
                   COALESCE(SUM(discount_amount), 0) AS total_discount,
                   COALESCE(SUM(paid), 0) AS total_paid,
                   COALESCE(SUM(balance), 0) AS total_balance
            FROM opd_patient_data
            WHERE shift_date BETWEEN $1 AND $2 AND opd_cancelled = FALSE
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let expense_summary: Vec<MonthlyExpenseRow> = sqlx::query_as(
            r#"
            SELECT EXTRACT(MONTH FROM shift_date)::bigint AS month,
                   COALESCE(SUM(expense_amount), 0) AS total_expense
            FROM expenses
            WHERE shift_date BETWEEN $1 AND $2
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        let total_expense = expense_summary.iter().map(|r| r.total_expense).sum();
        let totals = fold_grand_totals(
            monthly_summaries.iter().map(|m| {
                (m.patient_count, m.total_amount, m.total_discount, m.total_paid, m.total_balance)
            }),
            total_expense,
        );
        Ok(YearlyReport { year, monthly_summaries, expense_summary, totals })
    }

    /// 服务报表: 日期范围内按接诊日统计票据张数与服务费合计
    pub async fn services(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ServiceUsageRow>> {
        sqlx::query_as(
            r#"
            SELECT date AS report_date,
                   COUNT(*) AS record_count,
                   COALESCE(SUM(service_amount), 0) AS total_service_amount
            FROM opd_patient_data
            WHERE date BETWEEN $1 AND $2 AND opd_cancelled = FALSE
            GROUP BY date
            ORDER BY report_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))
    }
}

/// 所在月份最后一天
fn month_end(first_day: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    let (year, month) = if first_day.month() == 12 {
        (first_day.year() + 1, 1)
    } else {
        (first_day.year(), first_day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use opd_core::ShiftType;

    fn receipt(total: f64, paid: f64, cancelled: bool, refund: f64) -> OpdReceipt {
        OpdReceipt {
            srl_no: 1,
            receipt_id: "OPD00001".to_string(),
            patient_mr_number: "MR-2026-00001".to_string(),
            patient_name: "Test Patient".to_string(),
            phone_number: None,
            patient_age: None,
            patient_gender: None,
            patient_address: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            emergency_paid: false,
            patient_token_appointment: false,
            patient_checked: false,
            patient_requested_discount: false,
            opd_service: None,
            service_detail: None,
            service_details: None,
            service_amount: total,
            total_amount: total,
            discount: 0.0,
            opd_discount: false,
            discount_amount: 10.0,
            discount_reason: None,
            discount_id: None,
            payable: total - 10.0,
            paid,
            balance: total - 10.0 - paid,
            dr_share: 0.0,
            dr_share_amount: 0.0,
            hospital_share: 0.0,
            paid_to_doctor: false,
            opd_cancelled: cancelled,
            cancel_details: None,
            opd_refund: refund > 0.0,
            refund_reason: None,
            refund_amount: refund,
            shift_closed: false,
            shift_id: 1,
            shift_type: ShiftType::Morning,
            shift_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    fn expense(amount: f64) -> Expense {
        Expense {
            srl_no: 1,
            expense_id: "EXP0001".to_string(),
            expense_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            expense_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            expense_shift: "Morning".to_string(),
            expense_description: None,
            expense_name: "Supplies".to_string(),
            expense_amount: amount,
            expense_by: None,
            shift_id: 1,
            shift_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    fn payment(amount: f64) -> ConsultantPayment {
        ConsultantPayment {
            srl_no: 1,
            payment_id: "PAY0001".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            payment_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            doctor_name: "Dr. Khan".to_string(),
            payment_department: None,
            total: amount,
            payment_share: 100.0,
            payment_amount: amount,
            patient_id: None,
            patient_date: None,
            patient_service: None,
            patient_name: None,
            shift_id: 1,
            shift_type: ShiftType::Morning,
            shift_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            shift_closed: false,
        }
    }

    #[test]
    fn test_summarize_shift_excludes_cancelled_from_count_and_amount() {
        let records = vec![
            receipt(500.0, 490.0, false, 0.0),
            receipt(300.0, 290.0, true, 0.0),
        ];
        let summary = summarize_shift(&records, &[], &[]);
        assert_eq!(summary.patient_count, 1);
        assert_eq!(summary.cancelled_count, 1);
        assert_eq!(summary.total_amount, 500.0);
        // 折扣与实缴按全体票据统计，与关班口径一致
        assert_eq!(summary.total_discount, 20.0);
        assert_eq!(summary.total_paid, 780.0);
    }

    #[test]
    fn test_summarize_shift_net_collection() {
        let records = vec![receipt(1000.0, 990.0, false, 0.0)];
        let expenses = vec![expense(150.0), expense(50.0)];
        let payments = vec![payment(300.0)];
        let summary = summarize_shift(&records, &expenses, &payments);
        assert_eq!(summary.total_expenses, 200.0);
        assert_eq!(summary.total_dr_payments, 300.0);
        assert_eq!(summary.net_collection, 790.0);
    }

    #[test]
    fn test_summarize_shift_refund_totals() {
        let records = vec![
            receipt(400.0, 390.0, false, 100.0),
            receipt(200.0, 190.0, true, 190.0),
        ];
        let summary = summarize_shift(&records, &[], &[]);
        assert_eq!(summary.refund_amount, 290.0);
    }

    #[test]
    fn test_fold_daily_totals() {
        let rows = vec![
            ShiftTypeOpdRow {
                shift_type: "Morning".to_string(),
                patient_count: 3,
                total_amount: 900.0,
                total_discount: 50.0,
                total_paid: 850.0,
                total_balance: 0.0,
                total_dr_share: 400.0,
                total_hospital_share: 450.0,
                cancelled_count: 1,
                total_refund: 120.0,
            },
            ShiftTypeOpdRow {
                shift_type: "Evening".to_string(),
                patient_count: 2,
                total_amount: 400.0,
                total_discount: 0.0,
                total_paid: 400.0,
                total_balance: 0.0,
                total_dr_share: 200.0,
                total_hospital_share: 200.0,
                cancelled_count: 0,
                total_refund: 0.0,
            },
        ];
        let totals = fold_daily_totals(rows.iter());
        assert_eq!(totals.patient_count, 5);
        assert_eq!(totals.total_amount, 1300.0);
        assert_eq!(totals.total_paid, 1250.0);
        assert_eq!(totals.total_dr_share, 600.0);
        assert_eq!(totals.total_hospital_share, 650.0);
    }

    #[test]
    fn test_fold_grand_totals_with_expenses() {
        let rows = vec![
            (3_i64, 900.0, 50.0, 850.0, 0.0),
            (2_i64, 400.0, 0.0, 400.0, 0.0),
        ];
        let totals = fold_grand_totals(rows.into_iter(), 300.0);
        assert_eq!(totals.patient_count, 5);
        assert_eq!(totals.total_paid, 1250.0);
        assert_eq!(totals.total_expense, 300.0);
        assert_eq!(totals.net_collection, 950.0);
    }

    #[test]
    fn test_fold_grand_totals_empty_can_go_negative() {
        // 支出超过收入时净实收为负，报表如实呈现
        let totals = fold_grand_totals(std::iter::empty(), 250.0);
        assert_eq!(totals.patient_count, 0);
        assert_eq!(totals.net_collection, -250.0);
    }

    #[test]
    fn test_month_end_regular_and_december() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(month_end(jan), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let dec = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(month_end(dec), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_summarize_shift_empty() {
        let summary = summarize_shift(&[], &[], &[]);
        assert_eq!(summary, ShiftReportSummary::default());
    }
}
