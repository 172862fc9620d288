//! 服务项目查询操作

use crate::connection::DatabasePool;
use crate::models::{DbOpdService, NewOpdService, ServiceUpdate};
use crate::{is_unique_violation, map_sql_err};
use opd_core::{OpdError, OpdService, Result};

/// 服务项目查询操作接口
pub struct ServiceQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> ServiceQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 全部启用的服务项目
    pub async fn list_active(&self) -> Result<Vec<OpdService>> {
        let rows: Vec<DbOpdService> = sqlx::query_as(
            "SELECT * FROM opd_services WHERE is_active = TRUE ORDER BY service_head, service_name",
        )
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(OpdService::from).collect())
    }

    /// 去重后的服务大类列表
    pub async fn heads(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT service_head FROM opd_services WHERE is_active = TRUE ORDER BY service_head",
        )
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|(h,)| h).collect())
    }

    /// 某大类下的启用项目
    pub async fn by_head(&self, head: &str) -> Result<Vec<OpdService>> {
        let rows: Vec<DbOpdService> = sqlx::query_as(
            "SELECT * FROM opd_services WHERE service_head = $1 AND is_active = TRUE ORDER BY service_name",
        )
        .bind(head)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(OpdService::from).collect())
    }

    /// 根据流水号查找服务项目
    pub async fn by_id(&self, srl_no: i64) -> Result<OpdService> {
        let row: Option<DbOpdService> =
            sqlx::query_as("SELECT * FROM opd_services WHERE srl_no = $1")
                .bind(srl_no)
                .fetch_optional(self.pool.pool())
                .await
                .map_err(|e| OpdError::Database(e.to_string()))?;
        row.map(OpdService::from)
            .ok_or_else(|| OpdError::NotFound("Service not found".to_string()))
    }

    /// 新建服务项目
    pub async fn create(&self, new: &NewOpdService) -> Result<OpdService> {
        let row: DbOpdService = sqlx::query_as(
            r#"
            INSERT INTO opd_services (
                service_id, service_name, service_head, service_rate,
                required_consultant, price_editable, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING *
            "#,
        )
        .bind(&new.service_id)
        .bind(&new.service_name)
        .bind(&new.service_head)
        .bind(new.service_rate)
        .bind(new.required_consultant)
        .bind(new.price_editable)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                OpdError::Conflict("Service ID already exists".to_string())
            } else {
                map_sql_err(e)
            }
        })?;

        tracing::info!(service_id = %row.service_id, "service registered");
        Ok(row.into())
    }

    /// 整体更新服务项目
    pub async fn update(&self, srl_no: i64, update: &ServiceUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE opd_services SET
                service_name = $1, service_head = $2, service_rate = $3,
                required_consultant = $4, price_editable = $5, is_active = $6
            WHERE srl_no = $7
            "#,
        )
        .bind(&update.service_name)
        .bind(&update.service_head)
        .bind(update.service_rate)
        .bind(update.required_consultant)
        .bind(update.price_editable)
        .bind(update.is_active)
        .bind(srl_no)
        .execute(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Service not found".to_string()));
        }
        Ok(())
    }

    /// 停用服务项目，历史票据保留引用
    pub async fn soft_delete(&self, srl_no: i64) -> Result<()> {
        let result = sqlx::query("UPDATE opd_services SET is_active = FALSE WHERE srl_no = $1")
            .bind(srl_no)
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Service not found".to_string()));
        }
        Ok(())
    }
}
