use crate::cache::{ObjectCache, register::get_object_cache_plugin, register_builtin_plugins};
use crate::config::AppConfig;
use crate::errors::{HWSystemError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

/// 所有后端都不可用时使用的内存缓存
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称从插件表构造缓存后端
async fn construct_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        HWSystemError::cache_plugin_not_found(format!("Cache backend '{name}' not found in registry"))
    })?;
    constructor().await.map(Arc::from)
}

/// 创建题库缓存，配置的后端不可用时回退到内存缓存
pub(crate) async fn create_cache(cache_type: &str) -> Result<Arc<dyn ObjectCache>> {
    warn!("Attempting to create {} cache backend", cache_type);

    match construct_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("{}; falling back to {} cache", e, FALLBACK_CACHE);
            construct_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储（连接并迁移）与缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // 注册内置缓存插件
    register_builtin_plugins();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let config = AppConfig::get();
    let cache = create_cache(&config.cache.cache_type)
        .await
        .expect("Failed to create cache");
    warn!(
        "Cache backend initialized (question bank TTL: {}s)",
        config.cache.default_ttl
    );

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResult;

    #[tokio::test]
    async fn test_unknown_backend_falls_back_to_memory() {
        register_builtin_plugins();

        let cache = create_cache("redis").await.unwrap();
        cache.insert_raw("k".to_string(), "v".to_string(), 0).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));
    }

    #[tokio::test]
    async fn test_configured_backend_is_used() {
        register_builtin_plugins();
        assert!(create_cache(FALLBACK_CACHE).await.is_ok());
    }
}
