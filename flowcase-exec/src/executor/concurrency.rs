use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::executor::result::ExecutionError;

#[derive(Clone)]
pub struct ConcurrencyLimits {
    global: Arc<Semaphore>,
}

impl ConcurrencyLimits {
    pub fn new(global_limit: usize) -> Self {
        Self {
            global: Arc::new(Semaphore::new(global_limit.max(1))),
        }
    }

    pub async fn acquire(&self) -> Result<ConcurrencyPermit, ExecutionError> {
        let global = self
            .global
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ExecutionError::LimiterClosed)?;
        Ok(ConcurrencyPermit { _global: global })
    }

    pub fn available(&self) -> usize {
        self.global.available_permits()
    }
}

pub struct ConcurrencyPermit {
    _global: OwnedSemaphorePermit,
}
