//! Database operations for the `companies` table.

use chrono::{DateTime, Utc};
use leadgen_core::Company;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `companies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            email_inferred: row.email.is_some(),
            name: row.name,
            address: row.address,
            phone: row.phone,
            website: row.website,
            email: row.email,
            description: row.description,
        }
    }
}

/// Insert one company, tagged with the keywords of the search that found it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_company(
    pool: &PgPool,
    company: &Company,
    keywords: &[String],
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO companies \
             (name, address, phone, website, email, description, keywords) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(&company.name)
    .bind(company.address.as_deref())
    .bind(company.phone.as_deref())
    .bind(company.website.as_deref())
    .bind(company.email.as_deref())
    .bind(company.description.as_deref())
    .bind(keywords)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List the most recently saved companies, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_companies(pool: &PgPool, limit: i64) -> Result<Vec<CompanyRow>, DbError> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, address, phone, website, email, description, keywords, created_at \
         FROM companies \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
