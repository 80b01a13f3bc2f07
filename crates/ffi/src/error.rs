use fire_front_core::FireError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` is returned to the caller
/// - `msg()` is kept in thread-local storage for `fire_front_get_last_error`
pub(crate) trait FfiError {
    fn code(&self) -> FireFrontErrorCode;

    fn msg(&self) -> &str;
}

/// Error code plus message, built from FFI argument checks or a core [`FireError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: FireFrontErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Null pointer passed where non-null is required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g. `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireFrontErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Lock poisoned by a panic on another thread.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireFrontErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Terrain dimension that is not finite and positive.
    pub fn invalid_terrain_parameter(param_name: &str, value: f32) -> Self {
        Self {
            code: FireFrontErrorCode::InvalidTerrainParameters,
            msg: format!("Terrain parameter {param_name}: must be finite and positive, got {value}"),
        }
    }

    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireFrontErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> FireFrontErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<FireError> for DefaultFfiError {
    fn from(error: FireError) -> Self {
        let code = match error {
            FireError::OutOfDomain { .. } => FireFrontErrorCode::OutOfDomain,
            FireError::InvalidWeatherSample { .. } => FireFrontErrorCode::InvalidWeatherSample,
            FireError::InconsistentFireState { .. } => FireFrontErrorCode::InconsistentFireState,
            FireError::UnknownFire(_) => FireFrontErrorCode::UnknownFire,
            FireError::UnknownZone(_) => FireFrontErrorCode::UnknownZone,
            FireError::InvalidConfig(_) => FireFrontErrorCode::InvalidConfig,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by `fire_front_*` functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireFrontErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// Internal lock was poisoned by a panic.
    LockPoisoned = 2,

    /// Terrain width, height or resolution is not finite and positive.
    InvalidTerrainParameters = 3,

    /// Invalid parameter passed to function (e.g. unknown fuel code).
    InvalidParameter = 4,

    /// Location outside terrain coverage.
    OutOfDomain = 5,

    /// Weather reading out of range; the previous sample stays in effect.
    InvalidWeatherSample = 6,

    /// A perimeter sector would have shrunk. Logic-invariant violation.
    InconsistentFireState = 7,

    /// No active fire with this id.
    UnknownFire = 8,

    /// No structure zone with this id.
    UnknownZone = 9,

    /// Configuration failed validation.
    InvalidConfig = 10,
}

impl From<DefaultFfiError> for FireFrontErrorCode {
    fn from(error: DefaultFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is kept here so the pointer handed to C stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, FireFrontErrorCode)> = const { RefCell::new((None, FireFrontErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireFrontErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireFrontErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns null if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next `fire_front_*` call on this
/// thread. **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// FireFrontErrorCode err = fire_front_ignite(sim, x, y, &fire_id);
/// if (err != FireFrontErrorCode::Ok) {
///     const char* error = fire_front_get_last_error();
///     if (error) {
///         printf("Ignition failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_front_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code on this thread.
#[no_mangle]
pub extern "C" fn fire_front_get_last_error_code() -> FireFrontErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
