//! 患者主索引查询操作

use crate::codes::CodeAllocator;
use crate::connection::DatabasePool;
use crate::models::{DbMrPatient, DbOpdReceipt, MrPatientUpdate, NewMrPatient};
use crate::{is_unique_violation, map_sql_err};
use opd_core::{MrPatient, OpdError, OpdReceipt, Result};
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

/// 患者档案与最近就诊记录
#[derive(Debug, Serialize)]
pub struct MrPatientProfile {
    pub patient: MrPatient,
    pub recent_visits: Vec<OpdReceipt>,
}

/// 路径参数里的患者键: 纯数字按档案id解释，否则按MR号解释。
/// MR号形如 MR-2026-00001，不会与数字id混淆。
#[derive(Debug, PartialEq)]
pub enum MrKey {
    Id(i64),
    Number(String),
}

impl MrKey {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => MrKey::Id(id),
            Err(_) => MrKey::Number(raw.to_string()),
        }
    }
}

/// 归一化后的姓名字段，兼容前端整名与分段两种提交方式
#[derive(Debug, PartialEq)]
pub struct NormalizedName {
    pub first_name: String,
    pub last_name: Option<String>,
}

/// 解析姓名：优先分段字段，否则把整名按首个空格切分
pub fn normalize_name(
    patient_name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Option<NormalizedName> {
    if let Some(first) = first_name {
        let first = first.trim();
        if !first.is_empty() {
            return Some(NormalizedName {
                first_name: first.to_string(),
                last_name: last_name
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty()),
            });
        }
    }
    let full = patient_name?.trim();
    if full.is_empty() {
        return None;
    }
    match full.split_once(' ') {
        Some((first, rest)) => Some(NormalizedName {
            first_name: first.to_string(),
            last_name: Some(rest.trim().to_string()),
        }),
        None => Some(NormalizedName {
            first_name: full.to_string(),
            last_name: None,
        }),
    }
}

/// 患者主索引查询操作接口
pub struct MrDataQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> MrDataQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 模糊检索在档患者，最多返回50条
    pub async fn search(&self, term: &str) -> Result<Vec<MrPatient>> {
        let pattern = format!("%{}%", term);
        let rows: Vec<DbMrPatient> = sqlx::query_as(
            r#"
            SELECT * FROM mr_data
            WHERE status = 1
              AND (mr_number ILIKE $1
                   OR first_name ILIKE $1
                   OR last_name ILIKE $1
                   OR phone ILIKE $1
                   OR cnic ILIKE $1)
            ORDER BY id DESC
            LIMIT 50
            "#,
        )
        .bind(&pattern)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(MrPatient::from).collect())
    }

    /// 按MR号或档案id查档，并附最近5次就诊票据
    pub async fn profile(&self, key: &MrKey) -> Result<MrPatientProfile> {
        let row: Option<DbMrPatient> = match key {
            MrKey::Id(id) => {
                sqlx::query_as("SELECT * FROM mr_data WHERE id = $1 AND status = 1")
                    .bind(id)
                    .fetch_optional(self.pool.pool())
                    .await
            }
            MrKey::Number(mr) => {
                sqlx::query_as("SELECT * FROM mr_data WHERE mr_number = $1 AND status = 1")
                    .bind(mr)
                    .fetch_optional(self.pool.pool())
                    .await
            }
        }
        .map_err(|e| OpdError::Database(e.to_string()))?;
        let patient = row
            .map(MrPatient::from)
            .ok_or_else(|| OpdError::NotFound("Patient not found".to_string()))?;

        let visits: Vec<DbOpdReceipt> = sqlx::query_as(
            "SELECT * FROM opd_patient_data WHERE patient_mr_number = $1 ORDER BY date DESC, time DESC LIMIT 5",
        )
        .bind(&patient.mr_number)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| OpdError::Database(e.to_string()))?;

        Ok(MrPatientProfile {
            patient,
            recent_visits: visits.into_iter().map(OpdReceipt::from).collect(),
        })
    }

    /// 建档：MR号可手工指定（查重），缺省时按年度序列自动生成
    pub async fn create(&self, new: &NewMrPatient) -> Result<MrPatient> {
        let name = normalize_name(
            new.patient_name.as_deref(),
            new.first_name.as_deref(),
            new.last_name.as_deref(),
        )
        .ok_or_else(|| OpdError::Validation("Patient name is required".to_string()))?;

        let mr_number = match &new.mr_number {
            Some(manual) => {
                let exists: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM mr_data WHERE mr_number = $1")
                        .bind(manual)
                        .fetch_optional(self.pool.pool())
                        .await
                        .map_err(|e| OpdError::Database(e.to_string()))?;
                if exists.is_some() {
                    return Err(OpdError::Conflict("MR Number already exists".to_string()));
                }
                manual.clone()
            }
            None => CodeAllocator::new(self.pool).next_mr_number().await?,
        };

        let guardian = new
            .guardian_name
            .clone()
            .or_else(|| new.father_husband_name.clone());
        let phone = new.phone.clone().or_else(|| new.phone_number.clone());

        let row: DbMrPatient = sqlx::query_as(
            r#"
            INSERT INTO mr_data (
                mr_number, first_name, last_name, guardian_name, guardian_relation,
                cnic, age, gender, phone, email, address, city, blood_group,
                profession, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 1)
            RETURNING *
            "#,
        )
        .bind(&mr_number)
        .bind(&name.first_name)
        .bind(&name.last_name)
        .bind(&guardian)
        .bind(&new.guardian_relation)
        .bind(&new.cnic)
        .bind(&new.age)
        .bind(&new.gender)
        .bind(&phone)
        .bind(&new.email)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.blood_group)
        .bind(&new.profession)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| {
            // 并发建档撞号时与预检同样回答
            if is_unique_violation(&e) {
                OpdError::Conflict("MR Number already exists".to_string())
            } else {
                map_sql_err(e)
            }
        })?;

        tracing::info!(mr_number = %row.mr_number, "patient registered");
        Ok(row.into())
    }

    /// 部分更新患者档案（仅白名单字段，MR号不可改）
    pub async fn update(&self, key: &MrKey, update: &MrPatientUpdate) -> Result<()> {
        let mut qb = match build_mr_update(key, update) {
            Some(qb) => qb,
            None => return Err(OpdError::Validation("No fields to update".to_string())),
        };
        let result = qb
            .build()
            .execute(self.pool.pool())
            .await
            .map_err(|e| OpdError::Database(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(OpdError::NotFound("Patient not found".to_string()));
        }
        Ok(())
    }
}

/// 白名单式更新语句构造，没有可更新字段时返回None
fn build_mr_update(
    key: &MrKey,
    update: &MrPatientUpdate,
) -> Option<QueryBuilder<'static, Postgres>> {
    let name = normalize_name(
        update.patient_name.as_deref(),
        update.first_name.as_deref(),
        update.last_name.as_deref(),
    );
    let guardian = update
        .guardian_name
        .clone()
        .or_else(|| update.father_husband_name.clone());
    let phone = update.phone.clone().or_else(|| update.phone_number.clone());

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE mr_data SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        if let Some(name) = &name {
            sep.push("first_name = ");
            sep.push_bind_unseparated(name.first_name.clone());
            sep.push("last_name = ");
            sep.push_bind_unseparated(name.last_name.clone());
            any = true;
        }
        if let Some(guardian) = guardian {
            sep.push("guardian_name = ");
            sep.push_bind_unseparated(guardian);
            any = true;
        }
        if let Some(phone) = phone {
            sep.push("phone = ");
            sep.push_bind_unseparated(phone);
            any = true;
        }
        macro_rules! set_field {
            ($field:ident, $column:literal) => {
                if let Some(v) = &update.$field {
                    sep.push(concat!($column, " = "));
                    sep.push_bind_unseparated(v.clone());
                    any = true;
                }
            };
        }
        set_field!(guardian_relation, "guardian_relation");
        set_field!(cnic, "cnic");
        set_field!(age, "age");
        set_field!(gender, "gender");
        set_field!(email, "email");
        set_field!(address, "address");
        set_field!(city, "city");
        set_field!(blood_group, "blood_group");
        set_field!(profession, "profession");
    }
    if !any {
        return None;
    }
    match key {
        MrKey::Id(id) => {
            qb.push(" WHERE id = ").push_bind(*id);
        }
        MrKey::Number(mr) => {
            qb.push(" WHERE mr_number = ").push_bind(mr.clone());
        }
    }
    Some(qb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_full_name_at_first_space() {
        let name = normalize_name(Some("Muhammad Ahmed Khan"), None, None).unwrap();
        assert_eq!(name.first_name, "Muhammad");
        assert_eq!(name.last_name.as_deref(), Some("Ahmed Khan"));
    }

    #[test]
    fn test_single_word_name_has_no_last_name() {
        let name = normalize_name(Some("Fatima"), None, None).unwrap();
        assert_eq!(name.first_name, "Fatima");
        assert!(name.last_name.is_none());
    }

    #[test]
    fn test_split_fields_take_precedence_over_full_name() {
        let name = normalize_name(Some("Ignored Name"), Some("Ali"), Some("Raza")).unwrap();
        assert_eq!(name.first_name, "Ali");
        assert_eq!(name.last_name.as_deref(), Some("Raza"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(normalize_name(Some("   "), None, None).is_none());
        assert!(normalize_name(None, None, None).is_none());
    }

    #[test]
    fn test_mr_key_numeric_is_id_otherwise_mr_number() {
        assert_eq!(MrKey::parse("42"), MrKey::Id(42));
        assert_eq!(
            MrKey::parse("MR-2026-00001"),
            MrKey::Number("MR-2026-00001".to_string())
        );
    }

    #[test]
    fn test_mr_update_builder_never_touches_mr_number() {
        let update = MrPatientUpdate {
            patient_name: Some("Sara Bibi".to_string()),
            city: Some("Lahore".to_string()),
            ..Default::default()
        };
        let mut qb = build_mr_update(&MrKey::Id(7), &update).unwrap();
        let sql = qb.sql();
        assert!(sql.contains("first_name = $1"));
        assert!(sql.contains("last_name = $2"));
        assert!(sql.contains("city = $3"));
        assert!(!sql.contains("mr_number"));
        assert!(sql.ends_with("WHERE id = $4"));
    }

    #[test]
    fn test_mr_update_builder_keys_by_mr_number_when_not_numeric() {
        let update = MrPatientUpdate {
            city: Some("Multan".to_string()),
            ..Default::default()
        };
        let key = MrKey::parse("MR-2026-00009");
        let mut qb = build_mr_update(&key, &update).unwrap();
        assert!(qb.sql().ends_with("WHERE mr_number = $2"));
    }

    #[test]
    fn test_mr_update_builder_rejects_empty_update() {
        assert!(build_mr_update(&MrKey::Id(1), &MrPatientUpdate::default()).is_none());
    }
}
