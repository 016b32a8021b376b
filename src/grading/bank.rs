//! 题库加载（带缓存）

use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

pub struct QuestionBank<'a> {
    storage: &'a dyn Storage,
    cache: Option<&'a dyn ObjectCache>,
}

impl<'a> QuestionBank<'a> {
    pub fn new(storage: &'a dyn Storage, cache: Option<&'a dyn ObjectCache>) -> Self {
        Self { storage, cache }
    }

    fn cache_key(assignment_id: i64) -> String {
        format!("assignment:{assignment_id}")
    }

    /// 加载作业及其题库，不存在时返回 `AssignmentNotFound`
    pub async fn load(&self, assignment_id: i64) -> Result<Assignment> {
        let key = Self::cache_key(assignment_id);

        if let Some(cache) = self.cache
            && let CacheResult::Found(json) = cache.get_raw(&key).await
        {
            match serde_json::from_str::<Assignment>(&json) {
                Ok(assignment) => return Ok(assignment),
                Err(e) => {
                    warn!("题库缓存反序列化失败，回源查询: {}", e);
                    cache.remove(&key).await;
                }
            }
        }

        let assignment = self
            .storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                HWSystemError::assignment_not_found(format!("作业 {assignment_id} 不存在"))
            })?;

        if let Some(cache) = self.cache {
            match serde_json::to_string(&assignment) {
                Ok(json) => cache.insert_raw(key, json, 0).await,
                Err(e) => debug!("题库未写入缓存: {}", e),
            }
        }

        Ok(assignment)
    }

    /// 新建作业后预热缓存
    pub async fn prime(&self, assignment: &Assignment) {
        if let Some(cache) = self.cache
            && let Ok(json) = serde_json::to_string(assignment)
        {
            cache
                .insert_raw(Self::cache_key(assignment.id), json, 0)
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::config::CacheConfig;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, single_choice, test_request};

    #[tokio::test]
    async fn test_missing_assignment_is_not_found() {
        let storage = memory_storage().await;
        let err = QuestionBank::new(&storage, None).load(5).await.unwrap_err();
        assert!(matches!(err, HWSystemError::AssignmentNotFound(_)));
    }

    #[tokio::test]
    async fn test_loaded_bank_is_cached() {
        let storage = memory_storage().await;
        let cache = MokaCacheWrapper::with_config(&CacheConfig::default());
        let course_id = storage.seed_course(7).await;
        let created = storage
            .create_assignment(7, test_request(course_id, vec![single_choice(5)]))
            .await
            .unwrap();

        let bank = QuestionBank::new(&storage, Some(&cache));
        let loaded = bank.load(created.id).await.unwrap();
        assert_eq!(loaded, created);

        match cache.get_raw(&format!("assignment:{}", created.id)).await {
            CacheResult::Found(json) => {
                let cached: Assignment = serde_json::from_str(&json).unwrap();
                assert_eq!(cached, created);
            }
            CacheResult::NotFound => panic!("bank should be cached after load"),
        }

        // 第二次读取命中缓存
        assert_eq!(bank.load(created.id).await.unwrap(), created);
    }
}
