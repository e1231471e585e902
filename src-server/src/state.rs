//! Application state management
use std::sync::Arc;

use tubeseg_core::{Config, Dispatcher, Engine, Result};

/// Thread-safe application state shared by every request
pub struct AppState<E: Engine> {
    dispatcher: Dispatcher<E>,
}

impl<E: Engine> AppState<E> {
    pub fn new(engine: E, config: Config) -> Self {
        Self {
            dispatcher: Dispatcher::with_engine(Arc::new(engine), config),
        }
    }

    pub fn with_dispatcher<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Dispatcher<E>) -> Result<T>,
    {
        f(&self.dispatcher)
    }
}

impl<E: Engine> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}
