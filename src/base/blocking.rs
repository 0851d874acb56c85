//! Drives async work to completion on the calling thread.
//!
//! Every public entry point of the crate is blocking. Each call builds its
//! own current-thread runtime, runs the future with `block_on` and shuts the
//! runtime down before returning, so nothing outlives the call and no state
//! is shared between calls.
//!
//! Calling these entry points from inside an async context panics, the same
//! way nesting any tokio runtime does.

use crate::base::neterror::NetError;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Builder;

/// Run `future` on a fresh current-thread runtime owned by this call.
pub(crate) fn block_on<F, T>(future: F) -> Result<T, NetError>
where
    F: Future<Output = Result<T, NetError>>,
{
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| NetError::Runtime(Arc::new(e)))?;

    let result = runtime.block_on(future);

    // A getaddrinfo call that outlived its timeout still sits on the
    // blocking pool; let it finish on its own instead of waiting for it.
    runtime.shutdown_background();
    result
}
