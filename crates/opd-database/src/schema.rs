//! 表结构初始化
//!
//! 启动时创建业务表、约束和索引。并发相关的不变量（全局唯一未关闭班次、
//! 每日每类型唯一班次、每班唯一现金结算）全部落在存储层约束上，应用层
//! 检查只负责给出友好的错误信息。

use crate::connection::DatabasePool;
use opd_core::{OpdError, Result};

/// 表结构管理
pub struct DatabaseSchema<'a> {
    pool: &'a DatabasePool,
}

impl<'a> DatabaseSchema<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建业务表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        // 班次表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS shifts (
                shift_id BIGSERIAL PRIMARY KEY,
                shift_date DATE NOT NULL,
                shift_type VARCHAR(10) NOT NULL CHECK (shift_type IN ('Morning', 'Evening', 'Night')),
                shift_start_time TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                shift_end_time TIMESTAMP WITH TIME ZONE,
                opened_by VARCHAR(100) NOT NULL,
                closed_by VARCHAR(100),
                is_closed BOOLEAN NOT NULL DEFAULT FALSE,
                UNIQUE (shift_date, shift_type)
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // OPD票据表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS opd_patient_data (
                srl_no BIGSERIAL PRIMARY KEY,
                receipt_id VARCHAR(16) UNIQUE NOT NULL,
                patient_mr_number VARCHAR(20) NOT NULL,
                patient_name VARCHAR(255) NOT NULL,
                phone_number VARCHAR(20),
                patient_age VARCHAR(10),
                patient_gender VARCHAR(10),
                patient_address TEXT,
                date DATE NOT NULL,
                time TIME NOT NULL,
                emergency_paid BOOLEAN NOT NULL DEFAULT FALSE,
                patient_token_appointment BOOLEAN NOT NULL DEFAULT FALSE,
                patient_checked BOOLEAN NOT NULL DEFAULT FALSE,
                patient_requested_discount BOOLEAN NOT NULL DEFAULT FALSE,
                opd_service VARCHAR(255),
                service_detail TEXT,
                service_details JSONB,
                service_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                total_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                discount DOUBLE PRECISION NOT NULL DEFAULT 0,
                opd_discount BOOLEAN NOT NULL DEFAULT FALSE,
                discount_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                discount_reason VARCHAR(255),
                discount_id VARCHAR(64),
                payable DOUBLE PRECISION NOT NULL DEFAULT 0,
                paid DOUBLE PRECISION NOT NULL DEFAULT 0,
                balance DOUBLE PRECISION NOT NULL DEFAULT 0,
                dr_share DOUBLE PRECISION NOT NULL DEFAULT 0,
                dr_share_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                hospital_share DOUBLE PRECISION NOT NULL DEFAULT 0,
                paid_to_doctor BOOLEAN NOT NULL DEFAULT FALSE,
                opd_cancelled BOOLEAN NOT NULL DEFAULT FALSE,
                cancel_details TEXT,
                opd_refund BOOLEAN NOT NULL DEFAULT FALSE,
                refund_reason TEXT,
                refund_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                shift_closed BOOLEAN NOT NULL DEFAULT FALSE,
                shift_id BIGINT NOT NULL REFERENCES shifts(shift_id),
                shift_type VARCHAR(10) NOT NULL,
                shift_date DATE NOT NULL
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 支出表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS expenses (
                srl_no BIGSERIAL PRIMARY KEY,
                expense_id VARCHAR(16) UNIQUE NOT NULL,
                expense_date DATE NOT NULL,
                expense_time TIME NOT NULL,
                expense_shift VARCHAR(10) NOT NULL,
                expense_description TEXT,
                expense_name VARCHAR(255) NOT NULL,
                expense_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                expense_by VARCHAR(100),
                shift_id BIGINT NOT NULL REFERENCES shifts(shift_id),
                shift_date DATE NOT NULL
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 会诊付款凭证表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS consultant_payments (
                srl_no BIGSERIAL PRIMARY KEY,
                payment_id VARCHAR(16) UNIQUE NOT NULL,
                payment_date DATE NOT NULL,
                payment_time TIME NOT NULL,
                doctor_name VARCHAR(255) NOT NULL,
                payment_department VARCHAR(100),
                total DOUBLE PRECISION NOT NULL DEFAULT 0,
                payment_share DOUBLE PRECISION NOT NULL DEFAULT 0,
                payment_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                patient_id VARCHAR(20),
                patient_date DATE,
                patient_service VARCHAR(255),
                patient_name VARCHAR(255),
                shift_id BIGINT NOT NULL REFERENCES shifts(shift_id),
                shift_type VARCHAR(10) NOT NULL,
                shift_date DATE NOT NULL,
                shift_closed BOOLEAN NOT NULL DEFAULT FALSE
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 班次现金结算表，shift_id唯一约束是关班幂等的再入闸门
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS opd_shift_cash (
                srl_no BIGSERIAL PRIMARY KEY,
                shift_id BIGINT UNIQUE NOT NULL REFERENCES shifts(shift_id),
                shift_date DATE NOT NULL,
                shift_time TIME NOT NULL,
                shift_type VARCHAR(10) NOT NULL,
                submit_by VARCHAR(100) NOT NULL,
                receipt_from VARCHAR(16),
                receipt_to VARCHAR(16),
                expense_from VARCHAR(16),
                expense_to VARCHAR(16),
                total_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                total_quantity BIGINT NOT NULL DEFAULT 0,
                total_collected DOUBLE PRECISION NOT NULL DEFAULT 0,
                total_discount_quantity BIGINT NOT NULL DEFAULT 0,
                total_discount_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                total_paid DOUBLE PRECISION NOT NULL DEFAULT 0,
                total_balance DOUBLE PRECISION NOT NULL DEFAULT 0,
                service_head VARCHAR(20) NOT NULL DEFAULT 'OPD',
                service_qty BIGINT NOT NULL DEFAULT 0,
                service_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                service_discount_qty BIGINT NOT NULL DEFAULT 0,
                service_discount_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                service_paid DOUBLE PRECISION NOT NULL DEFAULT 0,
                service_balance DOUBLE PRECISION NOT NULL DEFAULT 0,
                service_invoice_from VARCHAR(16),
                service_invoice_to VARCHAR(16),
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 医生主数据表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS doctors (
                srl_no BIGSERIAL PRIMARY KEY,
                doctor_id VARCHAR(20) UNIQUE NOT NULL,
                doctor_name VARCHAR(255) NOT NULL,
                doctor_specialization VARCHAR(255),
                doctor_department VARCHAR(100),
                doctor_qualification VARCHAR(255),
                doctor_phone VARCHAR(20),
                doctor_email VARCHAR(255),
                doctor_address TEXT,
                doctor_share DOUBLE PRECISION NOT NULL DEFAULT 0,
                consultation_fee DOUBLE PRECISION NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // OPD服务项目表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS opd_services (
                srl_no BIGSERIAL PRIMARY KEY,
                service_id VARCHAR(20) UNIQUE NOT NULL,
                service_name VARCHAR(255) NOT NULL,
                service_head VARCHAR(100) NOT NULL,
                service_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                required_consultant BOOLEAN NOT NULL DEFAULT FALSE,
                price_editable BOOLEAN NOT NULL DEFAULT FALSE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 患者主索引表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS mr_data (
                id BIGSERIAL PRIMARY KEY,
                mr_number VARCHAR(20) UNIQUE NOT NULL,
                first_name VARCHAR(100) NOT NULL,
                last_name VARCHAR(100),
                guardian_name VARCHAR(255),
                guardian_relation VARCHAR(50),
                cnic VARCHAR(20) UNIQUE,
                age VARCHAR(10),
                gender VARCHAR(10),
                phone VARCHAR(20),
                email VARCHAR(255),
                address TEXT,
                city VARCHAR(100),
                blood_group VARCHAR(5),
                profession VARCHAR(100),
                status SMALLINT NOT NULL DEFAULT 1
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        // 单据编号计数器表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS code_counters (
                scope VARCHAR(20) PRIMARY KEY,
                last_value BIGINT NOT NULL
            )
        "#).execute(pool).await.map_err(|e| OpdError::Database(e.to_string()))?;

        self.create_indexes().await?;

        tracing::info!("Database tables created successfully");
        Ok(())
    }

    /// 创建索引与部分唯一约束
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        let indexes = vec![
            // 全局至多一个未关闭班次
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_shifts_single_open ON shifts ((TRUE)) WHERE NOT is_closed",
            "CREATE INDEX IF NOT EXISTS idx_shifts_date ON shifts(shift_date)",
            "CREATE INDEX IF NOT EXISTS idx_opd_receipt_id ON opd_patient_data(receipt_id)",
            "CREATE INDEX IF NOT EXISTS idx_opd_mr_number ON opd_patient_data(patient_mr_number)",
            "CREATE INDEX IF NOT EXISTS idx_opd_shift_id ON opd_patient_data(shift_id)",
            "CREATE INDEX IF NOT EXISTS idx_opd_shift_date ON opd_patient_data(shift_date)",
            "CREATE INDEX IF NOT EXISTS idx_expenses_shift_id ON expenses(shift_id)",
            "CREATE INDEX IF NOT EXISTS idx_expenses_shift_date ON expenses(shift_date)",
            "CREATE INDEX IF NOT EXISTS idx_payments_shift_id ON consultant_payments(shift_id)",
            "CREATE INDEX IF NOT EXISTS idx_payments_doctor ON consultant_payments(doctor_name)",
            "CREATE INDEX IF NOT EXISTS idx_shift_cash_date ON opd_shift_cash(shift_date)",
            "CREATE INDEX IF NOT EXISTS idx_doctors_department ON doctors(doctor_department)",
            "CREATE INDEX IF NOT EXISTS idx_services_head ON opd_services(service_head)",
            "CREATE INDEX IF NOT EXISTS idx_mr_data_mr_number ON mr_data(mr_number)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql)
                .execute(pool)
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        }

        tracing::info!("Database indexes created successfully");
        Ok(())
    }
}
