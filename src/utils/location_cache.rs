use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::work_location::WorkLocation;

/// Work locations are read on every ONSITE clock-in but change only by admin
/// action, so they are cached with a short TTL. Invalidation on archive is
/// in-process only; a second service instance observes an archive no later
/// than the TTL.
pub static LOCATION_CACHE: Lazy<Cache<String, WorkLocation>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(600)) // 10 min TTL
        .build()
});

/// Fetch a non-archived work location, serving from the cache when possible.
pub async fn get_location(
    pool: &MySqlPool,
    location_id: &str,
) -> Result<Option<WorkLocation>, sqlx::Error> {
    if let Some(hit) = LOCATION_CACHE.get(location_id).await {
        return Ok(Some(hit));
    }

    let location = sqlx::query_as::<_, WorkLocation>(
        r#"
        SELECT *
        FROM work_locations
        WHERE id = ? AND archived = 0
        "#,
    )
    .bind(location_id)
    .fetch_optional(pool)
    .await?;

    if let Some(loc) = &location {
        LOCATION_CACHE.insert(loc.id.clone(), loc.clone()).await;
    }

    Ok(location)
}

/// Drop a location from the cache after an admin edit or archive.
pub async fn invalidate(location_id: &str) {
    LOCATION_CACHE.invalidate(location_id).await;
}

/// Batch insert locations into the cache
async fn batch_insert(locations: &[WorkLocation]) {
    let futures: Vec<_> = locations
        .iter()
        .map(|loc| LOCATION_CACHE.insert(loc.id.clone(), loc.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load all active work locations into the in-memory cache (batched)
pub async fn warmup_location_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, WorkLocation>(
        r#"
        SELECT *
        FROM work_locations
        WHERE archived = 0
        ORDER BY updated_at DESC
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let location = row?;
        batch.push(location);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_insert(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_insert(&batch).await;
    }

    log::info!(
        "Work location cache warmup complete: {} active locations",
        total_count
    );

    Ok(())
}
