//! Command handlers, called from `main` once config and logging are set up.

use leadgen_core::{AppConfig, Company, SearchRequest};
use leadgen_db::PoolConfig;
use leadgen_search::{AuthClient, CompanySearch, NoopStore, PgStore};

/// Run one search and print the company list as pretty JSON on stdout.
///
/// The CLI has no caller identity, so no search history is recorded. With
/// `no_persist` the database is never touched; otherwise companies are saved
/// through a lazily connected pool, and a database outage only produces
/// warnings.
///
/// # Errors
///
/// Returns an error if the request has no keywords, the provider is not
/// configured, or the provider text search fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    keywords: Vec<String>,
    location: Option<String>,
    no_persist: bool,
) -> anyhow::Result<()> {
    let request = SearchRequest::new(keywords, location);

    let companies: Vec<Company> = if no_persist {
        let search = CompanySearch::from_config(config, NoopStore, None::<AuthClient>)?;
        search.search(&request, None).await?
    } else {
        let pool = leadgen_db::connect_pool_lazy(
            &config.database_url,
            PoolConfig::from_app_config(config),
        )?;
        let search = CompanySearch::from_config(config, PgStore::new(pool), None::<AuthClient>)?;
        search.search(&request, None).await?
    };

    println!("{}", serde_json::to_string_pretty(&companies)?);
    Ok(())
}

/// Print the most recently saved companies, newest first.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub(crate) async fn run_companies(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let rows = leadgen_db::list_recent_companies(&pool, limit.clamp(1, 200)).await?;

    if rows.is_empty() {
        println!("No saved companies.");
        return Ok(());
    }

    println!(
        "{:<32} {:<32} {:<36} {:<16}",
        "Name", "Website", "Email", "Saved"
    );
    println!("{}", "-".repeat(119));
    for row in rows {
        println!(
            "{:<32} {:<32} {:<36} {:<16}",
            truncate(&row.name, 32),
            truncate(row.website.as_deref().unwrap_or("-"), 32),
            truncate(row.email.as_deref().unwrap_or("-"), 36),
            row.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    leadgen_db::run_migrations(&pool).await?;
    tracing::info!("migrations applied");
    println!("Migrations applied.");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = leadgen_db::connect_pool(
        &config.database_url,
        PoolConfig::from_app_config(config),
    )
    .await?;
    Ok(pool)
}

/// Shortens `value` to at most `width` characters, marking the cut with `~`.
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("acme", 10), "acme");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("未来科技有限公司", 5), "未来科技~");
        assert_eq!(truncate("未来科技", 4), "未来科技");
    }
}
