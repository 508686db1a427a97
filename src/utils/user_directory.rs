use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::MySqlPool;
use std::collections::HashMap;
use std::time::Duration;

/// id -> email lookup used to label leaves on the review list.
#[derive(Clone)]
pub struct UserDirectory {
    cache: Cache<u64, String>,
}

impl UserDirectory {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(100_000) // tune based on memory
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn remember(&self, user_id: u64, email: &str) {
        self.cache.insert(user_id, email.to_string()).await;
    }

    pub async fn cached(&self, user_id: u64) -> Option<String> {
        self.cache.get(&user_id).await
    }

    /// Emails for every id in `ids`. Misses are loaded from the database in
    /// one query; ids without a user are absent from the result.
    pub async fn emails_for(
        &self,
        pool: &MySqlPool,
        ids: impl IntoIterator<Item = u64>,
    ) -> Result<HashMap<u64, String>, sqlx::Error> {
        let mut found = HashMap::new();
        let mut missing = Vec::new();

        for id in ids {
            if found.contains_key(&id) || missing.contains(&id) {
                continue;
            }
            match self.cache.get(&id).await {
                Some(email) => {
                    found.insert(id, email);
                }
                None => missing.push(id),
            }
        }

        if missing.is_empty() {
            return Ok(found);
        }

        let placeholders = vec!["?"; missing.len()].join(", ");
        let sql = format!("SELECT id, email FROM users WHERE id IN ({placeholders})");
        let mut query = sqlx::query_as::<_, (u64, String)>(&sql);
        for id in &missing {
            query = query.bind(*id);
        }

        for (id, email) in query.fetch_all(pool).await? {
            self.cache.insert(id, email.clone()).await;
            found.insert(id, email);
        }

        Ok(found)
    }

    /// Load every user into the directory (batched)
    pub async fn warmup(&self, pool: &MySqlPool, batch_size: usize) -> Result<()> {
        let mut stream =
            sqlx::query_as::<_, (u64, String)>("SELECT id, email FROM users").fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total_count = 0usize;

        while let Some(row) = stream.next().await {
            batch.push(row?);
            total_count += 1;

            if batch.len() >= batch_size {
                self.insert_batch(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch).await;
        }

        log::info!("User directory warmup complete: {} users", total_count);

        Ok(())
    }

    async fn insert_batch(&self, users: &[(u64, String)]) {
        let futures: Vec<_> = users
            .iter()
            .map(|(id, email)| self.cache.insert(*id, email.clone()))
            .collect();

        // Await all insertions concurrently
        futures::future::join_all(futures).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::mysql::MySqlPoolOptions;

    #[actix_web::test]
    async fn remembered_users_are_served_from_cache() {
        let directory = UserDirectory::new(Duration::from_secs(60));
        directory.remember(2, "two@corp.io").await;

        // never connects: every id is already cached
        let pool = MySqlPoolOptions::new()
            .connect_lazy("mysql://nobody@127.0.0.1:1/none")
            .unwrap();
        let emails = directory.emails_for(&pool, [2, 2]).await.unwrap();

        assert_eq!(emails.get(&2).map(String::as_str), Some("two@corp.io"));
        assert_eq!(directory.cached(3).await, None);
    }
}
