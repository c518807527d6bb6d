/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Looks `$key` up in `$cache`; on a hit the cached value is the result. On a
/// miss `$load` (a future yielding `AppResult<T>`) is awaited, its value is
/// queued for a background write with `$ttl` seconds to live, and returned.
/// Errors from the lookup or the loader propagate with `?`, so the macro must
/// be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let videos: Vec<Video> = cached!(self.cache, CacheKey::Catalog, self.ttl, self.inner.all_videos())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $load:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => {
                ::tracing::debug!(key = %key, "Cache hit");
                Ok::<_, $crate::error::AppError>(hit)
            }
            None => {
                ::tracing::debug!(key = %key, "Cache miss");
                let value = $load.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok::<_, $crate::error::AppError>(value)
            }
        }
    }};
}
