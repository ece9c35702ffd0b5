use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 创建进程内缓存
fn create_cache(config: &AppConfig) -> Arc<dyn ObjectCache> {
    debug!(
        "Creating Moka cache backend (capacity: {}, ttl: {}s)",
        config.cache.memory.max_capacity, config.cache.default_ttl
    );
    Arc::new(MokaCacheWrapper::from_config(config))
}

/// 首次启动时写入默认权限目录与内置角色
async fn seed_permissions(storage: &Arc<dyn Storage>) {
    match storage.seed_default_permissions().await {
        Ok(true) => info!("Default permission catalogue and roles seeded"),
        Ok(false) => debug!("Permission catalogue already present, skipping seed"),
        Err(e) => warn!("Failed to seed default permissions: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和默认数据
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    if config.app.seed_permissions {
        seed_permissions(&storage).await;
    }

    let cache = create_cache(config);
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
