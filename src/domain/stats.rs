//! Aggregate dashboard counters

use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct VideoCounts {
    total: i64,
    published: i64,
    total_views: i64,
    pending: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub videos_created: i64,
    pub published_count: i64,
    pub total_views: i64,
    pub success_rate: i64,
    pub queue_count: i64,
}

pub async fn get_dashboard_stats(db: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    let counts: VideoCounts = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE status = 'published') AS published,
               COALESCE(SUM(views) FILTER (WHERE status = 'published'), 0)::BIGINT AS total_views,
               COUNT(*) FILTER (WHERE status = 'pending') AS pending
        FROM videos
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(DashboardStats {
        videos_created: counts.total,
        published_count: counts.published,
        total_views: counts.total_views,
        success_rate: success_rate(counts.published, counts.total),
        queue_count: counts.pending,
    })
}

/// Published share of all videos as a whole percentage; 0 when there are none.
fn success_rate(published: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((published as f64 / total as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_rounds_to_whole_percent() {
        assert_eq!(success_rate(0, 0), 0);
        assert_eq!(success_rate(0, 5), 0);
        assert_eq!(success_rate(5, 5), 100);
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(2, 3), 67);
    }
}
