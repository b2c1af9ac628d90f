//! Narrow contracts to the external services plus their concrete clients.
//!
//! Traits are synchronous so the workflow reads as the linear sequence it is;
//! implementations bridge onto the async SDKs with [`block_on`].

use std::future::Future;

pub mod fetch;
pub mod mail;
pub mod object_store;
pub mod record_store;

/// Drives `future` to completion from synchronous code.
///
/// Must be called from within a multi-threaded tokio runtime.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
