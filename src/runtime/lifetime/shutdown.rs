use crate::storage::Storage;
use std::sync::Arc;
use tokio::signal;
use tracing::warn;

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}

/// 停机时释放存储连接
pub async fn release_resources(storage: Arc<dyn Storage>) {
    match storage.close().await {
        Ok(()) => warn!("Storage connections closed"),
        Err(e) => warn!("Failed to close storage: {}", e),
    }
}
