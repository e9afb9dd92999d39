//! Test helpers for optimizer and coordinator unit tests
//!
//! Recording mocks for the storage gateway, filesystems and optimizer
//! service. Every mock appends to a shared [`CallLog`] so tests can assert
//! the exact order of collaborator calls.

use crate::error::{OptimizerError, OptimizerResult};
use crate::optimizer::Optimizer;
use crate::service::OptimizerService;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mediaopt_storage::{
    AdapterType, ByteStream, Filesystem, ScratchFilesystem, StorageError, StorageGateway,
    StorageResult,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared, ordered record of collaborator calls
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

/// Mock optimizer that records its runs
#[derive(Debug)]
pub struct MockOptimizer {
    name: String,
    mime_types: Vec<String>,
    runnable: bool,
    runs: Mutex<Vec<PathBuf>>,
}

impl MockOptimizer {
    pub fn new(name: &str, mime_types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            mime_types: mime_types.iter().map(|m| m.to_string()).collect(),
            runnable: true,
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_runnable(mut self, runnable: bool) -> Self {
        self.runnable = runnable;
        self
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.runs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Optimizer for MockOptimizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_mime_types(&self) -> &[String] {
        &self.mime_types
    }

    fn is_runnable(&self) -> bool {
        self.runnable
    }

    async fn run(&self, path: &Path) -> OptimizerResult<()> {
        self.runs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Mock optimizer service (the selector role)
pub struct MockOptimizerService {
    log: CallLog,
    optimizers: Vec<Arc<dyn Optimizer>>,
    by_mime_type: HashMap<String, Arc<dyn Optimizer>>,
    fail_optimize: bool,
    paths: Mutex<Vec<PathBuf>>,
}

impl MockOptimizerService {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            optimizers: Vec::new(),
            by_mime_type: HashMap::new(),
            fail_optimize: false,
            paths: Mutex::new(Vec::new()),
        }
    }

    pub fn with_optimizers(mut self, optimizers: Vec<Arc<dyn Optimizer>>) -> Self {
        self.optimizers = optimizers;
        self
    }

    pub fn with_mime_type(mut self, mime_type: &str, optimizer: Arc<dyn Optimizer>) -> Self {
        self.by_mime_type.insert(mime_type.to_string(), optimizer);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_optimize = true;
        self
    }

    pub fn optimized_paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl OptimizerService for MockOptimizerService {
    async fn optimize(&self, path: &Path) -> OptimizerResult<()> {
        self.log.record("optimizer.optimize");
        self.paths.lock().unwrap().push(path.to_path_buf());

        if self.fail_optimize {
            return Err(OptimizerError::CommandFailed {
                name: "mock".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "corrupt image".to_string(),
            });
        }
        Ok(())
    }

    fn optimizer_by_mime_type(&self, mime_type: &str) -> OptimizerResult<Arc<dyn Optimizer>> {
        self.log.record("optimizer.optimizer_by_mime_type");
        self.by_mime_type
            .get(mime_type)
            .cloned()
            .ok_or_else(|| OptimizerError::OptimizerNotFound {
                mime_type: mime_type.to_string(),
            })
    }

    fn optimizers(&self) -> Vec<Arc<dyn Optimizer>> {
        self.log.record("optimizer.optimizers");
        self.optimizers.clone()
    }
}

/// Mock filesystem that records calls under a label (`remote`, `scratch`)
pub struct MockFilesystem {
    label: &'static str,
    log: CallLog,
    content: Mutex<HashMap<String, Vec<u8>>>,
    read_error: Mutex<Option<StorageError>>,
    write_error: Mutex<Option<StorageError>>,
    delete_error: Mutex<Option<StorageError>>,
}

impl MockFilesystem {
    pub fn new(label: &'static str, log: CallLog) -> Self {
        Self {
            label,
            log,
            content: Mutex::new(HashMap::new()),
            read_error: Mutex::new(None),
            write_error: Mutex::new(None),
            delete_error: Mutex::new(None),
        }
    }

    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.content
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
        self
    }

    /// Fail the next read with `error`
    pub fn fail_read(self, error: StorageError) -> Self {
        *self.read_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail the next write with `error`
    pub fn fail_write(self, error: StorageError) -> Self {
        *self.write_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail the next delete with `error`
    pub fn fail_delete(self, error: StorageError) -> Self {
        *self.delete_error.lock().unwrap() = Some(error);
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.content.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.content.lock().unwrap().keys().cloned().collect()
    }

    fn record(&self, operation: &str) {
        self.log.record(format!("{}.{}", self.label, operation));
    }
}

#[async_trait]
impl Filesystem for MockFilesystem {
    async fn read_stream(&self, path: &str) -> StorageResult<ByteStream> {
        self.record("read_stream");

        let injected = self.read_error.lock().unwrap().take();
        if let Some(error) = injected {
            return Err(error);
        }

        let data = self
            .file(path)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        let chunk: Result<Bytes, StorageError> = Ok(Bytes::from(data));
        Ok(Box::pin(futures::stream::iter(vec![chunk])))
    }

    async fn write_stream(&self, path: &str, mut stream: ByteStream) -> StorageResult<u64> {
        self.record("write_stream");

        let injected = self.write_error.lock().unwrap().take();
        if let Some(error) = injected {
            return Err(error);
        }

        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        let size = data.len() as u64;
        self.content.lock().unwrap().insert(path.to_string(), data);
        Ok(size)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.record("delete");

        let injected = self.delete_error.lock().unwrap().take();
        if let Some(error) = injected {
            return Err(error);
        }

        self.content.lock().unwrap().remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.record("exists");
        Ok(self.content.lock().unwrap().contains_key(path))
    }

    fn backend_type(&self) -> AdapterType {
        AdapterType::Other(self.label.to_string())
    }
}

impl ScratchFilesystem for MockFilesystem {
    fn path_of(&self, path: &str) -> StorageResult<PathBuf> {
        Ok(PathBuf::from("/scratch").join(path))
    }
}

/// Mock storage gateway
pub struct MockGateway {
    log: CallLog,
    adapter_type: AdapterType,
    filesystem: Option<Arc<dyn Filesystem>>,
    local_path_error: Mutex<Option<StorageError>>,
}

impl MockGateway {
    pub fn local(log: CallLog) -> Self {
        Self {
            log,
            adapter_type: AdapterType::Local,
            filesystem: None,
            local_path_error: Mutex::new(None),
        }
    }

    pub fn remote(log: CallLog, adapter_type: AdapterType, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            log,
            adapter_type,
            filesystem: Some(filesystem),
            local_path_error: Mutex::new(None),
        }
    }

    /// Fail the next local path resolution with `error`
    pub fn fail_local_path(self, error: StorageError) -> Self {
        *self.local_path_error.lock().unwrap() = Some(error);
        self
    }
}

impl StorageGateway for MockGateway {
    fn adapter_type(&self) -> AdapterType {
        self.log.record("gateway.adapter_type");
        self.adapter_type.clone()
    }

    fn filesystem(&self) -> Arc<dyn Filesystem> {
        self.log.record("gateway.filesystem");
        match &self.filesystem {
            Some(filesystem) => Arc::clone(filesystem),
            None => panic!("filesystem() called on a gateway without a remote filesystem"),
        }
    }

    fn local_path(&self, resource: &str) -> StorageResult<PathBuf> {
        self.log.record("gateway.local_path");

        let injected = self.local_path_error.lock().unwrap().take();
        if let Some(error) = injected {
            return Err(error);
        }

        Ok(PathBuf::from("/media").join(resource))
    }
}
