//! 医生档案查询操作

use crate::connection::DatabasePool;
use crate::models::{DbDoctor, DoctorUpdate, NewDoctor};
use crate::{is_unique_violation, map_sql_err};
use opd_core::{Doctor, OpdError, Result};

/// 医生档案查询操作接口
pub struct DoctorQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> DoctorQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 全部在职医生
    pub async fn list_active(&self) -> Result<Vec<Doctor>> {
        let rows: Vec<DbDoctor> =
            sqlx::query_as("SELECT * FROM doctors WHERE is_active = TRUE ORDER BY doctor_name")
                .fetch_all(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    /// 根据流水号查找医生
    pub async fn by_id(&self, srl_no: i64) -> Result<Doctor> {
        let row: Option<DbDoctor> = sqlx::query_as("SELECT * FROM doctors WHERE srl_no = $1")
            .bind(srl_no)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(Doctor::from)
            .ok_or_else(|| OpdError::NotFound("Doctor not found".to_string()))
    }

    /// 某科室的在职医生
    pub async fn by_department(&self, department: &str) -> Result<Vec<Doctor>> {
        let rows: Vec<DbDoctor> = sqlx::query_as(
            "SELECT * FROM doctors WHERE doctor_department = $1 AND is_active = TRUE ORDER BY doctor_name",
        )
        .bind(department)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    /// 去重后的科室列表
    pub async fn departments(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT doctor_department FROM doctors WHERE doctor_department IS NOT NULL AND is_active = TRUE ORDER BY doctor_department",
        )
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|(d,)| d).collect())
    }

    /// 建立医生档案
    pub async fn create(&self, new: &NewDoctor) -> Result<Doctor> {
        let row: DbDoctor = sqlx::query_as(
            r#"
            INSERT INTO doctors (
                doctor_id, doctor_name, doctor_specialization, doctor_department,
                doctor_qualification, doctor_phone, doctor_email, doctor_address,
                doctor_share, consultation_fee, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE)
            RETURNING *
            "#,
        )
        .bind(&new.doctor_id)
        .bind(&new.doctor_name)
        .bind(&new.doctor_specialization)
        .bind(&new.doctor_department)
        .bind(&new.doctor_qualification)
        .bind(&new.doctor_phone)
        .bind(&new.doctor_email)
        .bind(&new.doctor_address)
        .bind(new.doctor_share)
        .bind(new.consultation_fee)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                OpdError::Conflict("Doctor ID already exists".to_string())
            } else {
                map_sql_err(e)
            }
        })?;

        tracing::info!(doctor_id = %row.doctor_id, "doctor registered");
        Ok(row.into())
    }

    /// 整体更新医生档案
    pub async fn update(&self, srl_no: i64, update: &DoctorUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE doctors SET
                doctor_name = $1, doctor_specialization = $2, doctor_department = $3,
                doctor_qualification = $4, doctor_phone = $5, doctor_email = $6,
                doctor_address = $7, doctor_share = $8, consultation_fee = $9,
                is_active = $10
            WHERE srl_no = $11
            "#,
        )
        .bind(&update.doctor_name)
        .bind(&update.doctor_specialization)
        .bind(&update.doctor_department)
        .bind(&update.doctor_qualification)
        .bind(&update.doctor_phone)
        .bind(&update.doctor_email)
        .bind(&update.doctor_address)
        .bind(update.doctor_share)
        .bind(update.consultation_fee)
        .bind(update.is_active)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Doctor not found".to_string()));
        }
        Ok(())
    }

    /// 停用医生档案，历史票据与付款保留引用
    pub async fn soft_delete(&self, srl_no: i64) -> Result<()> {
        let result = sqlx::query("UPDATE doctors SET is_active = FALSE WHERE srl_no = $1")
            .bind(srl_no)
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Doctor not found".to_string()));
        }
        Ok(())
    }
}
