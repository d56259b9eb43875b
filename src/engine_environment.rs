use crate::config::{ConfigError, EngineConfig};
use buffer::buffer::BufferManager;
use disk::disk_file_manager::DiskFileManager;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("failed to open the database file")]
    Io(#[from] std::io::Error),
}

/// Owner of the singleton-like instances that are needed for the entire
/// lifetime of the engine: the disk manager and the buffer pool every heap
/// file shares.
#[derive(Debug)]
pub struct EngineEnvironment {
    pub disk: Arc<DiskFileManager>,
    pub buffer: Arc<BufferManager<DiskFileManager>>,
    pub engine_config: EngineConfig,
}

impl EngineEnvironment {
    pub fn new(config: EngineConfig) -> Result<Self, EnvironmentError> {
        let policy = config.replacement_policy()?;
        let disk = Arc::new(DiskFileManager::new(
            config.storage.data_dir.join("heapdb.db"),
        )?);
        let buffer = Arc::new(BufferManager::new(
            disk.clone(),
            config.storage.buffer_pages.get(),
            policy,
        ));
        Ok(Self {
            disk,
            buffer,
            engine_config: config,
        })
    }
}
