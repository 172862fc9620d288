//! OPD票据查询操作

use crate::codes::CodeAllocator;
use crate::connection::DatabasePool;
use crate::models::{DbOpdReceipt, NewReceipt, ReceiptUpdate};
use crate::map_sql_err;
use chrono::NaiveDate;
use opd_core::{OpdError, OpdReceipt, ReceiptTotals, Result};
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

/// 票据列表过滤条件
#[derive(Debug, Default)]
pub struct ReceiptFilter {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub shift_date: Option<NaiveDate>,
    pub mr_number: Option<String>,
    pub opd_cancelled: Option<bool>,
}

/// 班次OPD汇总（票据创建流程之外的只读视图）
#[derive(Debug, Serialize, FromRow)]
pub struct OpdShiftSummary {
    pub total_patients: i64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_dr_share: f64,
    pub total_hospital_share: f64,
    pub cancelled_count: i64,
    pub total_refund: f64,
}

/// 票据查询操作接口
pub struct ReceiptQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ReceiptQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 按条件列出票据
    pub async fn list(&self, filter: &ReceiptFilter) -> Result<Vec<OpdReceipt>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM opd_patient_data WHERE 1=1");
        if let Some(date) = filter.date {
            qb.push(" AND date = ").push_bind(date);
        }
        if let Some(shift_id) = filter.shift_id {
            qb.push(" AND shift_id = ").push_bind(shift_id);
        }
        if let Some(shift_date) = filter.shift_date {
            qb.push(" AND shift_date = ").push_bind(shift_date);
        }
        if let Some(mr_number) = &filter.mr_number {
            qb.push(" AND patient_mr_number = ").push_bind(mr_number.clone());
        }
        if let Some(cancelled) = filter.opd_cancelled {
            qb.push(" AND opd_cancelled = ").push_bind(cancelled);
        }
        qb.push(" ORDER BY date DESC, time DESC");

        let rows: Vec<DbOpdReceipt> = qb
            .build_query_as()
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(OpdReceipt::from).collect())
    }

    /// 根据流水号查找票据
    pub async fn by_id(&self, srl_no: i64) -> Result<OpdReceipt> {
        let row: Option<DbOpdReceipt> =
            sqlx::query_as("SELECT * FROM opd_patient_data WHERE srl_no = $1")
                .bind(srl_no)
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(OpdReceipt::from)
            .ok_or_else(|| OpdError::NotFound("Record not found".to_string()))
    }

    /// 某MR号的全部就诊票据
    pub async fn by_mr_number(&self, mr_number: &str) -> Result<Vec<OpdReceipt>> {
        let rows: Vec<DbOpdReceipt> = sqlx::query_as(
            "SELECT * FROM opd_patient_data WHERE patient_mr_number = $1 ORDER BY date DESC, time DESC",
        )
        .bind(mr_number)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(OpdReceipt::from).collect())
    }

    /// 某班次的全部票据
    pub async fn by_shift(&self, shift_id: i64) -> Result<Vec<OpdReceipt>> {
        let rows: Vec<DbOpdReceipt> =
            sqlx::query_as("SELECT * FROM opd_patient_data WHERE shift_id = $1 ORDER BY time")
                .bind(shift_id)
                .fetch_all(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(OpdReceipt::from).collect())
    }

    /// 班次OPD汇总，金额项只统计未作废票据
    pub async fn shift_summary(&self, shift_id: i64) -> Result<OpdShiftSummary> {
        sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE NOT opd_cancelled) AS total_patients,
                COALESCE(SUM(total_amount) FILTER (WHERE NOT opd_cancelled), 0) AS total_amount,
                COALESCE(SUM(discount_amount) FILTER (WHERE NOT opd_cancelled), 0) AS total_discount,
                COALESCE(SUM(paid) FILTER (WHERE NOT opd_cancelled), 0) AS total_paid,
                COALESCE(SUM(balance) FILTER (WHERE NOT opd_cancelled), 0) AS total_balance,
                COALESCE(SUM(dr_share_amount) FILTER (WHERE NOT opd_cancelled), 0) AS total_dr_share,
                COALESCE(SUM(hospital_share) FILTER (WHERE NOT opd_cancelled), 0) AS total_hospital_share,
                COUNT(*) FILTER (WHERE opd_cancelled) AS cancelled_count,
                COALESCE(SUM(refund_amount) FILTER (WHERE opd_refund), 0) AS total_refund
            FROM opd_patient_data
            WHERE shift_id = $1
            "#,
        )
        .bind(shift_id)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))
    }

    /// 创建票据
    ///
    /// 编号由计数器原子分配；payable/balance 由服务端从毛额、折扣和实缴
    /// 重算并钳为非负，不采用请求体里的分解值。
    pub async fn create(&self, new: &NewReceipt) -> Result<OpdReceipt> {
        let receipt_id = CodeAllocator::new(self.pool).next_receipt_id().await?;
        let totals = ReceiptTotals::normalized(new.total_amount, new.discount, new.paid);

        let row: DbOpdReceipt = sqlx::query_as(
            r#"
            INSERT INTO opd_patient_data (
                receipt_id, patient_mr_number, patient_name, phone_number,
                patient_age, patient_gender, patient_address, date, time,
                emergency_paid, patient_token_appointment, patient_checked,
                patient_requested_discount, opd_service, service_detail, service_details,
                service_amount, total_amount, discount, opd_discount, discount_amount,
                discount_reason, discount_id, payable, paid, balance,
                dr_share, dr_share_amount, hospital_share,
                paid_to_doctor, opd_cancelled, opd_refund, shift_closed,
                shift_id, shift_type, shift_date
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25,
                $26, $27, $28, $29, FALSE, FALSE, FALSE, FALSE, $30, $31, $32
            )
            RETURNING *
            "#,
        )
        .bind(&receipt_id)
        .bind(&new.patient_mr_number)
        .bind(&new.patient_name)
        .bind(&new.phone_number)
        .bind(&new.patient_age)
        .bind(&new.patient_gender)
        .bind(&new.patient_address)
        .bind(new.date)
        .bind(new.time)
        .bind(new.emergency_paid)
        .bind(new.patient_token_appointment)
        .bind(new.patient_checked)
        .bind(new.patient_requested_discount)
        .bind(&new.opd_service)
        .bind(&new.service_detail)
        .bind(&new.service_details)
        .bind(new.service_amount)
        .bind(totals.total_amount)
        .bind(totals.discount)
        .bind(new.opd_discount)
        .bind(new.discount_amount)
        .bind(&new.discount_reason)
        .bind(&new.discount_id)
        .bind(totals.payable)
        .bind(totals.paid)
        .bind(totals.balance)
        .bind(new.dr_share)
        .bind(new.dr_share_amount)
        .bind(new.hospital_share)
        .bind(new.shift_id)
        .bind(new.shift_type.as_str())
        .bind(new.shift_date)
        .fetch_one(self.pool.pool())
        .await
        .map_err(map_sql_err)?;

        tracing::info!(receipt_id = %row.receipt_id, "OPD receipt created");
        Ok(row.into())
    }

    /// 部分更新票据（仅白名单字段）
    pub async fn update(&self, srl_no: i64, update: &ReceiptUpdate) -> Result<()> {
        let mut qb = match build_receipt_update(srl_no, update) {
            Some(qb) => qb,
            None => return Err(OpdError::Validation("No fields to update".to_string())),
        };
        let result = qb
            .build()
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }

    /// 作废票据
    pub async fn cancel(&self, srl_no: i64, cancel_details: Option<&str>) -> Result<()> {
        let result = sqlx::query(
            "UPDATE opd_patient_data SET opd_cancelled = TRUE, cancel_details = $1 WHERE srl_no = $2",
        )
        .bind(cancel_details)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }

    /// 登记退费
    pub async fn refund(&self, srl_no: i64, reason: Option<&str>, amount: f64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE opd_patient_data SET opd_refund = TRUE, refund_reason = $1, refund_amount = $2 WHERE srl_no = $3",
        )
        .bind(reason)
        .bind(amount)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }

    /// 标记医生分成已付
    pub async fn mark_paid_to_doctor(&self, srl_no: i64) -> Result<()> {
        let result = sqlx::query("UPDATE opd_patient_data SET paid_to_doctor = TRUE WHERE srl_no = $1")
            .bind(srl_no)
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Record not found".to_string()));
        }
        Ok(())
    }
}

/// 白名单式更新语句构造，没有可更新字段时返回None
fn build_receipt_update(
    srl_no: i64,
    update: &ReceiptUpdate,
) -> Option<QueryBuilder<'static, Postgres>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE opd_patient_data SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        macro_rules! set_field {
            ($field:ident, $column:literal) => {
                if let Some(v) = &update.$field {
                    sep.push(concat!($column, " = "));
                    sep.push_bind_unseparated(v.clone());
                    any = true;
                }
            };
        }
        set_field!(patient_name, "patient_name");
        set_field!(phone_number, "phone_number");
        set_field!(patient_age, "patient_age");
        set_field!(patient_gender, "patient_gender");
        set_field!(patient_address, "patient_address");
        set_field!(patient_checked, "patient_checked");
        set_field!(emergency_paid, "emergency_paid");
        set_field!(patient_token_appointment, "patient_token_appointment");
        set_field!(opd_service, "opd_service");
        set_field!(service_detail, "service_detail");
        set_field!(service_details, "service_details");
        set_field!(discount_reason, "discount_reason");
        set_field!(dr_share, "dr_share");
        set_field!(dr_share_amount, "dr_share_amount");
        set_field!(hospital_share, "hospital_share");
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

    #[test]
    fn test_update_builder_rejects_empty_update() {
        assert!(build_receipt_update(1, &ReceiptUpdate::default()).is_none());
    }

    #[test]
    fn test_update_builder_emits_only_known_columns() {
        let update = ReceiptUpdate {
            patient_name: Some("Ali".to_string()),
            dr_share_amount: Some(120.0),
            ..Default::default()
        };
        let mut qb = build_receipt_update(9, &update).unwrap();
        let sql = qb.sql();
        assert!(sql.contains("patient_name = $1"));
        assert!(sql.contains("dr_share_amount = $2"));
        assert!(sql.ends_with("WHERE srl_no = $3"));
        // 金额分解与生命周期标志不可经由部分更新触达
        assert!(!sql.contains("payable"));
        assert!(!sql.contains("balance"));
        assert!(!sql.contains("shift_closed"));
        assert!(!sql.contains("receipt_id"));
    }
}
