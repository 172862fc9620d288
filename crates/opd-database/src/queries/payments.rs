//! 会诊付款查询操作

use crate::codes::CodeAllocator;
use crate::connection::DatabasePool;
use crate::models::{DbConsultantPayment, NewPayment, PaymentUpdate};
use crate::map_sql_err;
use chrono::NaiveDate;
use opd_core::{ConsultantPayment, OpdError, Result};
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};

/// 付款列表过滤条件
#[derive(Debug, Default)]
pub struct PaymentFilter {
    pub date: Option<NaiveDate>,
    pub shift_id: Option<i64>,
    pub doctor_name: Option<String>,
}

/// 按医生汇总的付款行
#[derive(Debug, Serialize, FromRow)]
pub struct DoctorPaymentTotal {
    pub doctor_name: String,
    pub payment_count: i64,
    pub total_paid: f64,
}

/// 分成金额：缺省时按 total × share% 计算
pub fn resolve_payment_amount(total: f64, share_percent: f64, explicit: Option<f64>) -> f64 {
    match explicit {
        Some(amount) => amount,
        None => total * share_percent / 100.0,
    }
}

/// 会诊付款查询操作接口
pub struct PaymentQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> PaymentQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 按条件列出付款凭证
    pub async fn list(&self, filter: &PaymentFilter) -> Result<Vec<ConsultantPayment>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM consultant_payments WHERE 1=1");
        if let Some(date) = filter.date {
            qb.push(" AND payment_date = ").push_bind(date);
        }
        if let Some(shift_id) = filter.shift_id {
            qb.push(" AND shift_id = ").push_bind(shift_id);
        }
        if let Some(doctor_name) = &filter.doctor_name {
            qb.push(" AND doctor_name = ").push_bind(doctor_name.clone());
        }
        qb.push(" ORDER BY payment_date DESC, payment_time DESC");

        let rows: Vec<DbConsultantPayment> = qb
            .build_query_as()
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(ConsultantPayment::from).collect())
    }

    /// 根据流水号查找付款凭证
    pub async fn by_id(&self, srl_no: i64) -> Result<ConsultantPayment> {
        let row: Option<DbConsultantPayment> =
            sqlx::query_as("SELECT * FROM consultant_payments WHERE srl_no = $1")
                .bind(srl_no)
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(ConsultantPayment::from)
            .ok_or_else(|| OpdError::NotFound("Payment not found".to_string()))
    }

    /// 尚未随班次结算的付款凭证
    pub async fn pending(&self) -> Result<Vec<ConsultantPayment>> {
        let rows: Vec<DbConsultantPayment> = sqlx::query_as(
            "SELECT * FROM consultant_payments WHERE shift_closed = FALSE ORDER BY payment_date, payment_time",
        )
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(ConsultantPayment::from).collect())
    }

    /// 某医生的全部付款凭证
    pub async fn by_doctor(&self, doctor_name: &str) -> Result<Vec<ConsultantPayment>> {
        let rows: Vec<DbConsultantPayment> = sqlx::query_as(
            "SELECT * FROM consultant_payments WHERE doctor_name = $1 ORDER BY payment_date DESC, payment_time DESC",
        )
        .bind(doctor_name)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(ConsultantPayment::from).collect())
    }

    /// 日期范围内按医生汇总付款
    pub async fn doctor_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DoctorPaymentTotal>> {
        sqlx::query_as(
            r#"
            SELECT doctor_name,
                   COUNT(*) AS payment_count,
                   COALESCE(SUM(payment_amount), 0) AS total_paid
            FROM consultant_payments
            WHERE payment_date BETWEEN $1 AND $2
            GROUP BY doctor_name
            ORDER BY total_paid DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))
    }

    /// 登记会诊付款，编号由计数器原子分配
    pub async fn create(&self, new: &NewPayment) -> Result<ConsultantPayment> {
        let payment_id = CodeAllocator::new(self.pool).next_payment_id().await?;
        let payment_amount =
            resolve_payment_amount(new.total, new.payment_share, new.payment_amount);

        let row: DbConsultantPayment = sqlx::query_as(
            r#"
            INSERT INTO consultant_payments (
                payment_id, payment_date, payment_time, doctor_name,
                payment_department, total, payment_share, payment_amount,
                patient_id, patient_date, patient_service, patient_name,
                shift_id, shift_type, shift_date, shift_closed
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, FALSE)
            RETURNING *
            "#,
        )
        .bind(&payment_id)
        .bind(new.payment_date)
        .bind(new.payment_time)
        .bind(&new.doctor_name)
        .bind(&new.payment_department)
        .bind(new.total)
        .bind(new.payment_share)
        .bind(payment_amount)
        .bind(&new.patient_id)
        .bind(new.patient_date)
        .bind(&new.patient_service)
        .bind(&new.patient_name)
        .bind(new.shift_id)
        .bind(new.shift_type.as_str())
        .bind(new.shift_date)
        .fetch_one(self.pool.pool())
        .await
        .map_err(map_sql_err)?;

        tracing::info!(payment_id = %row.payment_id, doctor = %row.doctor_name, "consultant payment recorded");
        Ok(row.into())
    }

    /// 整体更新付款凭证
    pub async fn update(&self, srl_no: i64, update: &PaymentUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE consultant_payments SET
                payment_date = $1, payment_time = $2, doctor_name = $3,
                payment_department = $4, total = $5, payment_share = $6,
                payment_amount = $7, patient_id = $8, patient_date = $9,
                patient_service = $10, patient_name = $11
            WHERE srl_no = $12
            "#,
        )
        .bind(update.payment_date)
        .bind(update.payment_time)
        .bind(&update.doctor_name)
        .bind(&update.payment_department)
        .bind(update.total)
        .bind(update.payment_share)
        .bind(update.payment_amount)
        .bind(&update.patient_id)
        .bind(update.patient_date)
        .bind(&update.patient_service)
        .bind(&update.patient_name)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Payment not found".to_string()));
        }
        Ok(())
    }

    /// 删除付款凭证
    pub async fn delete(&self, srl_no: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM consultant_payments WHERE srl_no = $1")
            .bind(srl_no)
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Payment not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_amount_defaults_to_share_of_total() {
        assert_eq!(resolve_payment_amount(1000.0, 40.0, None), 400.0);
    }

    #[test]
    fn test_explicit_payment_amount_wins() {
        assert_eq!(resolve_payment_amount(1000.0, 40.0, Some(350.0)), 350.0);
    }
}
