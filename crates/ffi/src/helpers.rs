use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, FireFrontErrorCode};
use crate::instance::FireFrontInstance;
use fire_front_core::MultiFireCoordinator;
use std::ffi::CString;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error in thread-local storage and return its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> FireFrontErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error after a successful call.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireFrontErrorCode::Ok;
    });
}

/// Record the error of a failed result, passing successes through.
pub(crate) fn track_result<T>(result: Result<T, DefaultFfiError>) -> Result<T, FireFrontErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(err) => Err(track_error(&err)),
    }
}

/// Run an FFI body and collapse its outcome to an error code.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> FireFrontErrorCode
where
    F: FnOnce() -> Result<(), DefaultFfiError>,
{
    match track_result(body()) {
        Ok(()) => FireFrontErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind an opaque pointer.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const FireFrontInstance,
) -> Result<&'a FireFrontInstance, DefaultFfiError> {
    // SAFETY: non-null pointers handed to the API come from `fire_front_new_flat`
    // and stay valid until `fire_front_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFfiError::null_pointer("ptr"))
}

/// Run `func` under the coordinator read lock.
pub(crate) fn with_coordinator<F, T>(instance: &FireFrontInstance, func: F) -> Result<T, DefaultFfiError>
where
    F: FnOnce(&MultiFireCoordinator) -> T,
{
    let coordinator = instance
        .coordinator
        .read()
        .map_err(|_| DefaultFfiError::lock_poisoned("coordinator RwLock"))?;
    Ok(func(&coordinator))
}

/// Run `func` under the coordinator write lock.
pub(crate) fn with_coordinator_mut<F, T>(
    instance: &FireFrontInstance,
    func: F,
) -> Result<T, DefaultFfiError>
where
    F: FnOnce(&mut MultiFireCoordinator) -> T,
{
    let mut coordinator = instance
        .coordinator
        .write()
        .map_err(|_| DefaultFfiError::lock_poisoned("coordinator RwLock"))?;
    Ok(func(&mut coordinator))
}

