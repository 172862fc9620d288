//! 金额计算与关班汇总组装
//!
//! 票据金额分解与班次现金汇总都在这里以纯函数形式实现，便于在不依赖
//! 数据库的情况下验证不变量。

use crate::models::{Shift, ShiftCashSummary};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// 票据金额分解
///
/// 不变量: payable = max(total - discount, 0)，balance = max(payable - paid, 0)。
/// 服务端据此从 total/discount/paid 重新推导，不信任调用方给出的
/// payable/balance（原实现直接落库，属于已知校验缺口）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    pub total_amount: f64,
    pub discount: f64,
    pub payable: f64,
    pub paid: f64,
    pub balance: f64,
}

impl ReceiptTotals {
    /// 由调用方提供的毛额、折扣和实缴金额推导出完整分解，负值一律钳为0
    pub fn normalized(total_amount: f64, discount: f64, paid: f64) -> Self {
        let total_amount = total_amount.max(0.0);
        let discount = discount.max(0.0);
        let paid = paid.max(0.0);
        let payable = (total_amount - discount).max(0.0);
        let balance = (payable - paid).max(0.0);
        Self {
            total_amount,
            discount,
            payable,
            paid,
            balance,
        }
    }
}

/// 班次内OPD票据聚合（排除已作废票据，空集合一律归零）
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpdAggregates {
    pub total_quantity: i64,
    pub receipt_from: Option<String>,
    pub receipt_to: Option<String>,
    pub total_amount: f64,
    pub total_discount_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub discount_qty: i64,
}

/// 班次内支出聚合
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseAggregates {
    pub expense_from: Option<String>,
    pub expense_to: Option<String>,
    pub total_expenses: f64,
}

impl ShiftCashSummary {
    /// 由班次元数据与两组聚合组装关班现金记录
    ///
    /// total_collected 为净实收（实缴合计减去班次支出合计）。service_* 字段
    /// 是同一组OPD聚合在单服务类目下的投影，类目头固定为 "OPD"。
    pub fn compose(
        shift: &Shift,
        opd: &OpdAggregates,
        expenses: &ExpenseAggregates,
        submit_by: &str,
        shift_time: NaiveTime,
    ) -> Self {
        Self {
            srl_no: 0, // 插入后由数据库回填
            shift_id: shift.shift_id,
            shift_date: shift.shift_date,
            shift_time,
            shift_type: shift.shift_type,
            submit_by: submit_by.to_string(),
            receipt_from: opd.receipt_from.clone(),
            receipt_to: opd.receipt_to.clone(),
            expense_from: expenses.expense_from.clone(),
            expense_to: expenses.expense_to.clone(),
            total_amount: opd.total_amount,
            total_quantity: opd.total_quantity,
            total_collected: opd.total_paid - expenses.total_expenses,
            total_discount_quantity: opd.discount_qty,
            total_discount_amount: opd.total_discount_amount,
            total_paid: opd.total_paid,
            total_balance: opd.total_balance,
            service_head: "OPD".to_string(),
            service_qty: opd.total_quantity,
            service_amount: opd.total_amount,
            service_discount_qty: opd.discount_qty,
            service_discount_amount: opd.total_discount_amount,
            service_paid: opd.total_paid,
            service_balance: opd.total_balance,
            service_invoice_from: opd.receipt_from.clone(),
            service_invoice_to: opd.receipt_to.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn morning_shift() -> Shift {
        Shift {
            shift_id: 7,
            shift_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            shift_type: ShiftType::Morning,
            shift_start_time: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
            shift_end_time: None,
            opened_by: "reception".to_string(),
            closed_by: None,
            is_closed: false,
        }
    }

    #[test]
    fn server_recomputes_payable_and_balance_ignoring_caller_values() {
        // 决策记录: 不沿用原实现的"信任调用方分解"，payable/balance 一律服务端重算
        let t = ReceiptTotals::normalized(500.0, 50.0, 400.0);
        assert_eq!(t.payable, 450.0);
        assert_eq!(t.balance, 50.0);
        assert_eq!(t.total_amount - t.discount, t.payable);
        assert_eq!(t.payable - t.paid, t.balance);
    }

    #[test]
    fn test_totals_clamped_non_negative() {
        // 折扣超过毛额、实缴超过应缴时钳为0，而不是记负数
        let t = ReceiptTotals::normalized(100.0, 150.0, 30.0);
        assert_eq!(t.payable, 0.0);
        assert_eq!(t.balance, 0.0);

        let t = ReceiptTotals::normalized(200.0, 0.0, 250.0);
        assert_eq!(t.payable, 200.0);
        assert_eq!(t.balance, 0.0);
    }

    #[test]
    fn test_compose_scenario_two_receipts_one_expense() {
        // 500 + 300 两张票据（折扣 0 / 50，全额实缴），一笔支出 100
        let shift = morning_shift();
        let opd = OpdAggregates {
            total_quantity: 2,
            receipt_from: Some("OPD00001".to_string()),
            receipt_to: Some("OPD00002".to_string()),
            total_amount: 800.0,
            total_discount_amount: 50.0,
            total_paid: 750.0,
            total_balance: 0.0,
            discount_qty: 1,
        };
        let expenses = ExpenseAggregates {
            expense_from: Some("EXP0001".to_string()),
            expense_to: Some("EXP0001".to_string()),
            total_expenses: 100.0,
        };
        let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();

        let summary = ShiftCashSummary::compose(&shift, &opd, &expenses, "cashier", time);
        assert_eq!(summary.shift_id, 7);
        assert_eq!(summary.shift_type, ShiftType::Morning);
        assert_eq!(summary.total_amount, 800.0);
        assert_eq!(summary.total_discount_amount, 50.0);
        assert_eq!(summary.total_paid, 750.0);
        assert_eq!(summary.total_collected, 650.0);
        assert_eq!(summary.expense_from.as_deref(), Some("EXP0001"));
        assert_eq!(summary.expense_to.as_deref(), Some("EXP0001"));
        assert_eq!(summary.service_qty, 2);
        assert_eq!(summary.service_invoice_from.as_deref(), Some("OPD00001"));
    }

    #[test]
    fn test_compose_empty_shift_defaults_to_zero() {
        // 空班次: 所有金额为0，编号区间为空
        let shift = morning_shift();
        let summary = ShiftCashSummary::compose(
            &shift,
            &OpdAggregates::default(),
            &ExpenseAggregates::default(),
            "cashier",
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        );
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.total_amount, 0.0);
        assert_eq!(summary.total_collected, 0.0);
        assert!(summary.receipt_from.is_none());
        assert!(summary.expense_to.is_none());
    }
}
