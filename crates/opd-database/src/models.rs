//! 数据库模型

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use opd_core::models::*;
use serde::Deserialize;
use sqlx::FromRow;

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 数据库班次表
#[derive(Debug, FromRow)]
pub struct DbShift {
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub shift_type: String, // 存储为字符串，转换为ShiftType枚举
    pub shift_start_time: DateTime<Utc>,
    pub shift_end_time: Option<DateTime<Utc>>,
    pub opened_by: String,
    pub closed_by: Option<String>,
    pub is_closed: bool,
}

impl From<DbShift> for Shift {
    fn from(db: DbShift) -> Self {
        Shift {
            shift_id: db.shift_id,
            shift_date: db.shift_date,
            // CHECK约束保证只有三个合法值，解析失败回退早班
            shift_type: ShiftType::parse(&db.shift_type).unwrap_or(ShiftType::Morning),
            shift_start_time: db.shift_start_time,
            shift_end_time: db.shift_end_time,
            opened_by: db.opened_by,
            closed_by: db.closed_by,
            is_closed: db.is_closed,
        }
    }
}

/// 数据库OPD票据表
#[derive(Debug, FromRow)]
pub struct DbOpdReceipt {
    pub srl_no: i64,
    pub receipt_id: String,
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
    pub service_details: Option<serde_json::Value>,
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
    pub shift_type: String,
    pub shift_date: NaiveDate,
}

impl From<DbOpdReceipt> for OpdReceipt {
    fn from(db: DbOpdReceipt) -> Self {
        OpdReceipt {
            srl_no: db.srl_no,
            receipt_id: db.receipt_id,
            patient_mr_number: db.patient_mr_number,
            patient_name: db.patient_name,
            phone_number: db.phone_number,
            patient_age: db.patient_age,
            patient_gender: db.patient_gender,
            patient_address: db.patient_address,
            date: db.date,
            time: db.time,
            emergency_paid: db.emergency_paid,
            patient_token_appointment: db.patient_token_appointment,
            patient_checked: db.patient_checked,
            patient_requested_discount: db.patient_requested_discount,
            opd_service: db.opd_service,
            service_detail: db.service_detail,
            service_details: db.service_details,
            service_amount: db.service_amount,
            total_amount: db.total_amount,
            discount: db.discount,
            opd_discount: db.opd_discount,
            discount_amount: db.discount_amount,
            discount_reason: db.discount_reason,
            discount_id: db.discount_id,
            payable: db.payable,
            paid: db.paid,
            balance: db.balance,
            dr_share: db.dr_share,
            dr_share_amount: db.dr_share_amount,
            hospital_share: db.hospital_share,
            paid_to_doctor: db.paid_to_doctor,
            opd_cancelled: db.opd_cancelled,
            cancel_details: db.cancel_details,
            opd_refund: db.opd_refund,
            refund_reason: db.refund_reason,
            refund_amount: db.refund_amount,
            shift_closed: db.shift_closed,
            shift_id: db.shift_id,
            shift_type: ShiftType::parse(&db.shift_type).unwrap_or(ShiftType::Morning),
            shift_date: db.shift_date,
        }
    }
}

/// 数据库支出表
#[derive(Debug, FromRow)]
pub struct DbExpense {
    pub srl_no: i64,
    pub expense_id: String,
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

impl From<DbExpense> for Expense {
    fn from(db: DbExpense) -> Self {
        Expense {
            srl_no: db.srl_no,
            expense_id: db.expense_id,
            expense_date: db.expense_date,
            expense_time: db.expense_time,
            expense_shift: db.expense_shift,
            expense_description: db.expense_description,
            expense_name: db.expense_name,
            expense_amount: db.expense_amount,
            expense_by: db.expense_by,
            shift_id: db.shift_id,
            shift_date: db.shift_date,
        }
    }
}

/// 数据库会诊付款表
#[derive(Debug, FromRow)]
pub struct DbConsultantPayment {
    pub srl_no: i64,
    pub payment_id: String,
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    pub doctor_name: String,
    pub payment_department: Option<String>,
    pub total: f64,
    pub payment_share: f64,
    pub payment_amount: f64,
    pub patient_id: Option<String>,
    pub patient_date: Option<NaiveDate>,
    pub patient_service: Option<String>,
    pub patient_name: Option<String>,
    pub shift_id: i64,
    pub shift_type: String,
    pub shift_date: NaiveDate,
    pub shift_closed: bool,
}

impl From<DbConsultantPayment> for ConsultantPayment {
    fn from(db: DbConsultantPayment) -> Self {
        ConsultantPayment {
            srl_no: db.srl_no,
            payment_id: db.payment_id,
            payment_date: db.payment_date,
            payment_time: db.payment_time,
            doctor_name: db.doctor_name,
            payment_department: db.payment_department,
            total: db.total,
            payment_share: db.payment_share,
            payment_amount: db.payment_amount,
            patient_id: db.patient_id,
            patient_date: db.patient_date,
            patient_service: db.patient_service,
            patient_name: db.patient_name,
            shift_id: db.shift_id,
            shift_type: ShiftType::parse(&db.shift_type).unwrap_or(ShiftType::Morning),
            shift_date: db.shift_date,
            shift_closed: db.shift_closed,
        }
    }
}

/// 数据库班次现金结算表
#[derive(Debug, FromRow)]
pub struct DbShiftCash {
    pub srl_no: i64,
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub shift_time: NaiveTime,
    pub shift_type: String,
    pub submit_by: String,
    pub receipt_from: Option<String>,
    pub receipt_to: Option<String>,
    pub expense_from: Option<String>,
    pub expense_to: Option<String>,
    pub total_amount: f64,
    pub total_quantity: i64,
    pub total_collected: f64,
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

impl From<DbShiftCash> for ShiftCashSummary {
    fn from(db: DbShiftCash) -> Self {
        ShiftCashSummary {
            srl_no: db.srl_no,
            shift_id: db.shift_id,
            shift_date: db.shift_date,
            shift_time: db.shift_time,
            shift_type: ShiftType::parse(&db.shift_type).unwrap_or(ShiftType::Morning),
            submit_by: db.submit_by,
            receipt_from: db.receipt_from,
            receipt_to: db.receipt_to,
            expense_from: db.expense_from,
            expense_to: db.expense_to,
            total_amount: db.total_amount,
            total_quantity: db.total_quantity,
            total_collected: db.total_collected,
            total_discount_quantity: db.total_discount_quantity,
            total_discount_amount: db.total_discount_amount,
            total_paid: db.total_paid,
            total_balance: db.total_balance,
            service_head: db.service_head,
            service_qty: db.service_qty,
            service_amount: db.service_amount,
            service_discount_qty: db.service_discount_qty,
            service_discount_amount: db.service_discount_amount,
            service_paid: db.service_paid,
            service_balance: db.service_balance,
            service_invoice_from: db.service_invoice_from,
            service_invoice_to: db.service_invoice_to,
        }
    }
}

/// 数据库医生表
#[derive(Debug, FromRow)]
pub struct DbDoctor {
    pub srl_no: i64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialization: Option<String>,
    pub doctor_department: Option<String>,
    pub doctor_qualification: Option<String>,
    pub doctor_phone: Option<String>,
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_share: f64,
    pub consultation_fee: f64,
    pub is_active: bool,
}

impl From<DbDoctor> for Doctor {
    fn from(db: DbDoctor) -> Self {
        Doctor {
            srl_no: db.srl_no,
            doctor_id: db.doctor_id,
            doctor_name: db.doctor_name,
            doctor_specialization: db.doctor_specialization,
            doctor_department: db.doctor_department,
            doctor_qualification: db.doctor_qualification,
            doctor_phone: db.doctor_phone,
            doctor_email: db.doctor_email,
            doctor_address: db.doctor_address,
            doctor_share: db.doctor_share,
            consultation_fee: db.consultation_fee,
            is_active: db.is_active,
        }
    }
}

/// 数据库服务项目表
#[derive(Debug, FromRow)]
pub struct DbOpdService {
    pub srl_no: i64,
    pub service_id: String,
    pub service_name: String,
    pub service_head: String,
    pub service_rate: f64,
    pub required_consultant: bool,
    pub price_editable: bool,
    pub is_active: bool,
}

impl From<DbOpdService> for OpdService {
    fn from(db: DbOpdService) -> Self {
        OpdService {
            srl_no: db.srl_no,
            service_id: db.service_id,
            service_name: db.service_name,
            service_head: db.service_head,
            service_rate: db.service_rate,
            required_consultant: db.required_consultant,
            price_editable: db.price_editable,
            is_active: db.is_active,
        }
    }
}

/// 数据库患者主索引表
#[derive(Debug, FromRow)]
pub struct DbMrPatient {
    pub id: i64,
    pub mr_number: String,
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

impl From<DbMrPatient> for MrPatient {
    fn from(db: DbMrPatient) -> Self {
        MrPatient {
            id: db.id,
            mr_number: db.mr_number,
            first_name: db.first_name,
            last_name: db.last_name,
            guardian_name: db.guardian_name,
            guardian_relation: db.guardian_relation,
            cnic: db.cnic,
            age: db.age,
            gender: db.gender,
            phone: db.phone,
            email: db.email,
            address: db.address,
            city: db.city,
            blood_group: db.blood_group,
            profession: db.profession,
            status: db.status,
        }
    }
}

/// 班次OPD聚合行（关班事务第2步）
#[derive(Debug, FromRow)]
pub struct DbOpdAggregates {
    pub total_quantity: i64,
    pub receipt_from: Option<String>,
    pub receipt_to: Option<String>,
    pub total_amount: f64,
    pub total_discount_amount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub discount_qty: i64,
}

impl From<DbOpdAggregates> for opd_core::OpdAggregates {
    fn from(db: DbOpdAggregates) -> Self {
        opd_core::OpdAggregates {
            total_quantity: db.total_quantity,
            receipt_from: db.receipt_from,
            receipt_to: db.receipt_to,
            total_amount: db.total_amount,
            total_discount_amount: db.total_discount_amount,
            total_paid: db.total_paid,
            total_balance: db.total_balance,
            discount_qty: db.discount_qty,
        }
    }
}

/// 班次支出聚合行（关班事务第3步）
#[derive(Debug, FromRow)]
pub struct DbExpenseAggregates {
    pub expense_from: Option<String>,
    pub expense_to: Option<String>,
    pub total_expenses: f64,
}

impl From<DbExpenseAggregates> for opd_core::ExpenseAggregates {
    fn from(db: DbExpenseAggregates) -> Self {
        opd_core::ExpenseAggregates {
            expense_from: db.expense_from,
            expense_to: db.expense_to,
            total_expenses: db.total_expenses,
        }
    }
}

// 插入模型 - 用于创建新记录（编号与派生金额由服务端生成）

/// 新票据插入模型，payable/balance 不从请求读取而是服务端重算
#[derive(Debug, Deserialize)]
pub struct NewReceipt {
    pub patient_mr_number: String,
    pub patient_name: String,
    pub phone_number: Option<String>,
    pub patient_age: Option<String>,
    pub patient_gender: Option<String>,
    pub patient_address: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub emergency_paid: bool,
    #[serde(default)]
    pub patient_token_appointment: bool,
    #[serde(default)]
    pub patient_checked: bool,
    #[serde(default)]
    pub patient_requested_discount: bool,
    pub opd_service: Option<String>,
    pub service_detail: Option<String>,
    pub service_details: Option<serde_json::Value>,
    #[serde(default)]
    pub service_amount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub opd_discount: bool,
    #[serde(default)]
    pub discount_amount: f64,
    pub discount_reason: Option<String>,
    pub discount_id: Option<String>,
    #[serde(default)]
    pub paid: f64,
    #[serde(default)]
    pub dr_share: f64,
    #[serde(default)]
    pub dr_share_amount: f64,
    #[serde(default)]
    pub hospital_share: f64,
    pub shift_id: i64,
    pub shift_type: ShiftType,
    pub shift_date: NaiveDate,
}

/// 票据部分更新模型（显式白名单，金额分解与状态标志不在其中）
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptUpdate {
    pub patient_name: Option<String>,
    pub phone_number: Option<String>,
    pub patient_age: Option<String>,
    pub patient_gender: Option<String>,
    pub patient_address: Option<String>,
    pub patient_checked: Option<bool>,
    pub emergency_paid: Option<bool>,
    pub patient_token_appointment: Option<bool>,
    pub opd_service: Option<String>,
    pub service_detail: Option<String>,
    pub service_details: Option<serde_json::Value>,
    pub discount_reason: Option<String>,
    pub dr_share: Option<f64>,
    pub dr_share_amount: Option<f64>,
    pub hospital_share: Option<f64>,
}

/// 新支出插入模型
#[derive(Debug, Deserialize)]
pub struct NewExpense {
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

/// 支出整体更新模型
#[derive(Debug, Deserialize)]
pub struct ExpenseUpdate {
    pub expense_date: NaiveDate,
    pub expense_time: NaiveTime,
    pub expense_shift: String,
    pub expense_description: Option<String>,
    pub expense_name: String,
    pub expense_amount: f64,
    pub expense_by: Option<String>,
}

/// 新付款凭证插入模型
#[derive(Debug, Deserialize)]
pub struct NewPayment {
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    pub doctor_name: String,
    pub payment_department: Option<String>,
    pub total: f64,
    pub payment_share: f64,
    /// 缺省时按 total × share% 计算
    pub payment_amount: Option<f64>,
    pub patient_id: Option<String>,
    pub patient_date: Option<NaiveDate>,
    pub patient_service: Option<String>,
    pub patient_name: Option<String>,
    pub shift_id: i64,
    pub shift_type: ShiftType,
    pub shift_date: NaiveDate,
}

/// 付款凭证整体更新模型
#[derive(Debug, Deserialize)]
pub struct PaymentUpdate {
    pub payment_date: NaiveDate,
    pub payment_time: NaiveTime,
    pub doctor_name: String,
    pub payment_department: Option<String>,
    pub total: f64,
    pub payment_share: f64,
    pub payment_amount: f64,
    pub patient_id: Option<String>,
    pub patient_date: Option<NaiveDate>,
    pub patient_service: Option<String>,
    pub patient_name: Option<String>,
}

/// 新医生插入模型
#[derive(Debug, Deserialize)]
pub struct NewDoctor {
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialization: Option<String>,
    pub doctor_department: Option<String>,
    pub doctor_qualification: Option<String>,
    pub doctor_phone: Option<String>,
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    #[serde(default)]
    pub doctor_share: f64,
    #[serde(default)]
    pub consultation_fee: f64,
}

/// 医生整体更新模型
#[derive(Debug, Deserialize)]
pub struct DoctorUpdate {
    pub doctor_name: String,
    pub doctor_specialization: Option<String>,
    pub doctor_department: Option<String>,
    pub doctor_qualification: Option<String>,
    pub doctor_phone: Option<String>,
    pub doctor_email: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_share: f64,
    pub consultation_fee: f64,
    pub is_active: bool,
}

/// 新服务项目插入模型
#[derive(Debug, Deserialize)]
pub struct NewOpdService {
    pub service_id: String,
    pub service_name: String,
    pub service_head: String,
    pub service_rate: f64,
    #[serde(default)]
    pub required_consultant: bool,
    #[serde(default)]
    pub price_editable: bool,
}

/// 服务项目整体更新模型
#[derive(Debug, Deserialize)]
pub struct ServiceUpdate {
    pub service_name: String,
    pub service_head: String,
    pub service_rate: f64,
    pub required_consultant: bool,
    pub price_editable: bool,
    pub is_active: bool,
}

/// 新患者建档模型，支持前端新旧两套字段名
#[derive(Debug, Deserialize)]
pub struct NewMrPatient {
    /// 手工指定MR号，缺省时按年度序列自动生成
    pub mr_number: Option<String>,
    pub patient_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub guardian_name: Option<String>,
    pub father_husband_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub cnic: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub blood_group: Option<String>,
    pub profession: Option<String>,
}

/// 患者档案部分更新模型（白名单，mr_number与id不可更新）
#[derive(Debug, Default, Deserialize)]
pub struct MrPatientUpdate {
    pub patient_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub guardian_name: Option<String>,
    pub father_husband_name: Option<String>,
    pub guardian_relation: Option<String>,
    pub cnic: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub blood_group: Option<String>,
    pub profession: Option<String>,
}

/// 现金结算更正模型（白名单，srl_no与shift_id不可更正）
#[derive(Debug, Default, Deserialize)]
pub struct ShiftCashCorrection {
    pub submit_by: Option<String>,
    pub receipt_from: Option<String>,
    pub receipt_to: Option<String>,
    pub expense_from: Option<String>,
    pub expense_to: Option<String>,
    pub total_amount: Option<f64>,
    pub total_quantity: Option<i64>,
    pub total_collected: Option<f64>,
    pub total_discount_quantity: Option<i64>,
    pub total_discount_amount: Option<f64>,
    pub total_paid: Option<f64>,
    pub total_balance: Option<f64>,
}
