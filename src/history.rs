//! Per-user record of generated blogs.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::prompt::BlogConfig;

/// What the pipeline hands over after a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub user_id: Uuid,
    pub website_url: String,
    pub keywords: Vec<String>,
    pub generated_blog: String,
    pub blog_config: BlogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub website_url: String,
    pub keywords: Vec<String>,
    pub generated_blog: String,
    pub blog_config: BlogConfig,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Store a record, assigning its id and timestamp.
    async fn create(&self, record: NewHistoryRecord) -> Result<HistoryRecord>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid, limit: usize, skip: usize)
    -> Result<Vec<HistoryRecord>>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize>;

    /// `None` when the record does not exist or belongs to someone else.
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<HistoryRecord>>;
}

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: DashMap<Uuid, (u64, HistoryRecord)>,
    sequence: AtomicU64,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn create(&self, record: NewHistoryRecord) -> Result<HistoryRecord> {
        let stored = HistoryRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            website_url: record.website_url,
            keywords: record.keywords,
            generated_blog: record.generated_blog,
            blog_config: record.blog_config,
            created_at: Utc::now(),
        };
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.records.insert(stored.id, (seq, stored.clone()));
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<HistoryRecord>> {
        let mut owned: Vec<(u64, HistoryRecord)> = self
            .records
            .iter()
            .filter(|entry| entry.value().1.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        // insertion order breaks timestamp ties
        owned.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));

        Ok(owned
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(_, record)| record)
            .collect())
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().1.user_id == user_id)
            .count())
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<HistoryRecord>> {
        Ok(self
            .records
            .get(&id)
            .map(|entry| entry.value().1.clone())
            .filter(|record| record.user_id == user_id))
    }
}
