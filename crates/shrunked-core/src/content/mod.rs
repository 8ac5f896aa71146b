//! Content side: watches file inputs, sends requests, applies results.
//!
//! Runs on the page's single event loop. A request is registered before it
//! is sent; its result is routed back by correlation index, so results may
//! arrive in any order.

mod interceptor;
mod registry;
mod substitute;

pub use interceptor::{ContentInterceptor, FileSelectionRequest, SelectionMode};
pub use registry::RequestRegistry;
