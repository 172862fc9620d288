//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// 班次类型枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShiftType {
    Morning, // 早班
    Evening, // 中班
    Night,   // 夜班
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "Morning",
            ShiftType::Evening => "Evening",
            ShiftType::Night => "Night",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Morning" => Some(ShiftType::Morning),
            "Evening" => Some(ShiftType::Evening),
            "Night" => Some(ShiftType::Night),
            _ => None,
        }
    }
}

/// 班次信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub shift_type: ShiftType,
    pub shift_start_time: DateTime<Utc>,
    pub shift_end_time: Option<DateTime<Utc>>,
    pub opened_by: String,
    pub closed_by: Option<String>,
    pub is_closed: bool,
}

/// OPD收费票据（门诊账目记录）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdReceipt {
    pub srl_no: i64,
    pub receipt_id: String, // 形如 OPD00001
    pub patient_mr_number: String,
    pub patient_name: String,
    pub phone_number: Option<String>,
    pub patient_age: Option<String>,
    pub patient_gender: Option<String>,
    pub patient_address: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub emergency_paid: bool,
    pub patient_token_appointment: bool,
    pub patient_checked: bool,
    pub patient_requested_discount: bool,
    pub opd_service: Option<String>,
    pub service_detail: Option<String>,
    pub service_details: Option<serde_json::Value>, // 逐项服务明细
    pub service_amount: f64,
    pub total_amount: f64,
    pub discount: f64,
    pub opd_discount: bool,
    pub discount_amount: f64,
    pub discount_reason: Option<String>,
    pub discount_id: Option<String>,
    pub payable: f64,
    pub paid: f64,
    pub balance: f64,
    pub dr_share: f64,
    pub dr_share_amount: f64,
    pub hospital_share: f64,
    pub paid_to_doctor: bool,
    pub opd_cancelled: bool,
    pub cancel_details: Option<String>,
    pub opd_refund: bool,
    pub refund_reason: Option<String>,
    pub refund_amount: f64,
    pub shift_closed: bool,
    pub shift_id: i64,
    pub shift_type: ShiftType,
    pub shift_date: NaiveDate,
}

/// 支出记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub srl_no: i64,
    pub expense_id: String, // 形如 EXP0001
    pub expense_date: NaiveDate,
    pub expense_time: NaiveTime,
    pub expense_shift: String,
    pub expense_description: Option<String>,
    pub expense_name: String,
    pub expense_amount: f64,
    pub expense_by: Option<String>,
    pub shift_id: i64,
    pub shift_date: NaiveDate,
}

/// 会诊医生分成付款凭证
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultantPayment {
    pub srl_no: i64,
    pub payment_id: String, // 形如 PAY0001
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    pub doctor_name: String,
    pub payment_department: Option<String>,
    pub total: f64,
    pub payment_share: f64, // 分成百分比
    pub payment_amount: f64,
    pub patient_id: Option<String>,
    pub patient_date: Option<NaiveDate>,
    pub patient_service: Option<String>,
    pub patient_name: Option<String>,
    pub shift_id: i64,
    pub shift_type: ShiftType,
    pub shift_date: NaiveDate,
    pub shift_closed: bool,
}

/// 班次现金结算记录（关班产物，每班唯一）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCashSummary {
    pub srl_no: i64,
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub shift_time: NaiveTime,
    pub shift_type: ShiftType,
    pub submit_by: String,
    pub receipt_from: Option<String>,
    pub receipt_to: Option<String>,
    pub expense_from: Option<String>,
    pub expense_to: Option<String>,
    pub total_amount: f64, // 毛收入
    pub total_quantity: i64,
    pub total_collected: f64, // 实收 = total_paid - 班次支出
    pub total_discount_quantity: i64,
    pub total_discount_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub service_head: String,
    pub service_qty: i64,
    pub service_amount: f64,
    pub service_discount_qty: i64,
    pub service_discount_amount: f64,
    pub service_paid: f64,
    pub service_balance: f64,
    pub service_invoice_from: Option<String>,
    pub service_invoice_to: Option<String>,
}

/// 医生主数据（软删除）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub srl_no: i64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialization: Option<String>,
    pub doctor_department: Option<String>,
    pub doctor_qualification: Option<String>,
    pub doctor_phone: Option<String>,
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_share: f64, // 分成百分比
    pub consultation_fee: f64,
    pub is_active: bool,
}

/// OPD服务项目主数据（软删除）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdService {
    pub srl_no: i64,
    pub service_id: String,
    pub service_name: String,
    pub service_head: String, // 服务类别
    pub service_rate: f64,
    pub required_consultant: bool,
    pub price_editable: bool,
    pub is_active: bool,
}

/// 患者主索引记录（MR档案）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrPatient {
    pub id: i64,
    pub mr_number: String, // 形如 MR-2026-00001
    pub first_name: String,
    pub last_name: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub cnic: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub blood_group: Option<String>,
    pub profession: Option<String>,
    pub status: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_type_round_trip() {
        for ty in [ShiftType::Morning, ShiftType::Evening, ShiftType::Night] {
            assert_eq!(ShiftType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_shift_type_rejects_unknown() {
        assert_eq!(ShiftType::parse("Afternoon"), None);
        assert_eq!(ShiftType::parse("morning"), None);
        assert_eq!(ShiftType::parse(""), None);
    }
}
