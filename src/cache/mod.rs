//! 对象缓存
//!
//! 缓存后端以插件形式注册到全局表中，启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    // ttl 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件，生成 `register_plugin()` 供启动时显式注册
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub fn register_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::HWSystemError>(
                            Box::new(cache),
                        )
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

/// 注册内置缓存后端
pub fn register_builtin_plugins() {
    object_cache::moka::register_plugin();
}
