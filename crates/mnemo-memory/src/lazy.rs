// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Load-once holder for local models.

use std::sync::Arc;

use futures::future::BoxFuture;
use mnemo_core::MnemoError;
use tokio::sync::OnceCell;

/// Async constructor for a model.
pub type ModelLoader<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Arc<T>, MnemoError>> + Send + Sync>;

/// A model loaded on first use.
///
/// Concurrent first callers share one load. A failed load is not remembered:
/// the next caller tries again.
pub struct LazyModel<T: ?Sized> {
    cell: OnceCell<Arc<T>>,
    loader: ModelLoader<T>,
}

impl<T: ?Sized + Send + Sync + 'static> LazyModel<T> {
    pub fn new(loader: ModelLoader<T>) -> Self {
        Self {
            cell: OnceCell::new(),
            loader,
        }
    }

    /// An already loaded model.
    pub fn ready(model: Arc<T>) -> Self {
        let fallback = Arc::clone(&model);
        Self {
            cell: OnceCell::from(model),
            loader: Arc::new(move || -> BoxFuture<'static, Result<Arc<T>, MnemoError>> {
                let model = Arc::clone(&fallback);
                Box::pin(async move { Ok(model) })
            }),
        }
    }

    pub async fn get(&self) -> Result<Arc<T>, MnemoError> {
        self.cell
            .get_or_try_init(|| (self.loader)())
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
