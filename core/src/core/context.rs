//! The shared, lockable context a flow executes against, and the handler
//! type aliases that operate on it.

use crate::core::control::StageControl;
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A wrapper for context data providing shared ownership and interior
/// mutability via `parking_lot::RwLock`.
///
/// IMPORTANT: lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points in asynchronous code.
#[derive(Debug)]
pub struct FlowContext<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowContext<T> {
    pub fn new(data: T) -> Self {
        FlowContext(Arc::new(RwLock::new(data)))
    }

    /// Acquires a read lock. The guard MUST be dropped before any `.await`.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Acquires a write lock. The guard MUST be dropped before any `.await`.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Attempts to acquire a read lock without blocking.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
        self.0.try_read()
    }

    /// Attempts to acquire a write lock without blocking.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
        self.0.try_write()
    }

    /// Guard over a single field of the context, under a read lock.
    pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
    where
        F: FnOnce(&T) -> &U,
    {
        RwLockReadGuard::map(self.read(), f)
    }

    /// Guard over a single field of the context, under a write lock.
    pub fn map_write<F, U: ?Sized>(&self, f: F) -> MappedRwLockWriteGuard<'_, U>
    where
        F: FnOnce(&mut T) -> &mut U,
    {
        RwLockWriteGuard::map(self.write(), f)
    }
}

impl<T: Send + Sync + 'static> Clone for FlowContext<T> {
    fn clone(&self) -> Self {
        FlowContext(Arc::clone(&self.0))
    }
}

impl<T: Send + Sync + 'static + Default> Default for FlowContext<T> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

/// Type alias for a flow stage handler.
///
/// A handler is an asynchronous function taking a clone of the shared
/// `FlowContext<TData>` and resolving to `Result<StageControl, Err>`.
///
/// Handlers are responsible for:
/// 1. Acquiring locks (`.read()` / `.write()`) to access or modify state.
/// 2. Ensuring lock guards are dropped BEFORE any `.await` suspension point.
/// 3. Returning `StageControl::Continue` to proceed or `StageControl::Halt`
///    to stop the flow gracefully.
pub type Handler<TData, Err> = Box<
    dyn Fn(FlowContext<TData>) -> Pin<Box<dyn Future<Output = Result<StageControl, Err>> + Send>>
        + Send
        + Sync,
>;

/// Type alias for a stage compensation handler.
///
/// Invoked when the stage it is registered for fails; repairs whatever
/// partial state earlier stages left behind. Its own failure is logged and
/// swallowed by the engine, and the stage's original error propagates.
pub type Compensation<TData, Err> = Box<
    dyn Fn(FlowContext<TData>) -> Pin<Box<dyn Future<Output = Result<(), Err>> + Send>>
        + Send
        + Sync,
>;
