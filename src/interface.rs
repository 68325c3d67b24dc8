//! Shared access to one interpreter.
//!
//! The interpreter is single-writer: queries are run one at a time under a
//! mutex, each one getting a sequential id. Callers on other threads (the
//! HTTP server, a REPL) share the interface behind an `Arc`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::datatype::Value;
use crate::error::{KispError, Result};
use crate::interpreter::Interpreter;

/// Opaque query identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryId(pub u64);

/// The value a query evaluated to and how long it took.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub id: QueryId,
    pub value: Value,
    pub elapsed: Duration,
}

/// A failed query keeps its id and timing as well.
#[derive(Debug)]
pub struct QueryFailure {
    pub id: QueryId,
    pub error: KispError,
    pub elapsed: Duration,
}

pub struct QueryInterface {
    interpreter: Mutex<Interpreter>,
    next_id: AtomicU64,
    last_elapsed: Mutex<Option<Duration>>,
}

impl QueryInterface {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter: Mutex::new(interpreter), next_id: AtomicU64::new(0), last_elapsed: Mutex::new(None) }
    }

    fn allocate_id(&self) -> QueryId {
        QueryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Interpreter>> {
        self.interpreter.lock().map_err(|e| KispError::Lock(e.to_string()))
    }

    /// Runs one query to completion on the calling thread.
    pub fn run(&self, query: &str) -> std::result::Result<QueryOutcome, QueryFailure> {
        let id = self.allocate_id();
        let started = Instant::now();
        let result = self.lock().and_then(|mut interpreter| interpreter.exec(query));
        let elapsed = started.elapsed();
        if let Ok(mut last) = self.last_elapsed.lock() {
            *last = Some(elapsed);
        }
        match result {
            Ok(value) => Ok(QueryOutcome { id, value, elapsed }),
            Err(error) => Err(QueryFailure { id, error, elapsed }),
        }
    }

    /// Evaluation time of the most recent query, if any ran.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed.lock().ok().and_then(|last| *last)
    }

    /// Gives exclusive access to the interpreter, e.g. for cache controls or scripts.
    pub fn with<T>(&self, f: impl FnOnce(&mut Interpreter) -> T) -> Result<T> {
        let mut interpreter = self.lock()?;
        Ok(f(&mut interpreter))
    }
}
