//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::Arc;

use mall_core::http::HttpMethod;
use mall_core::{HttpRequest, Interceptor, MemberStore, Outcome, PipelineConfig, UploadRequest};

/// Opaque handle to a configured pipeline. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiPipeline {
    pub(crate) config: PipelineConfig,
    pub(crate) store: Arc<MemberStore>,
    pub(crate) interceptor: Interceptor,
}

impl FfiPipeline {
    pub(crate) fn new(config: PipelineConfig) -> Self {
        let store = Arc::new(MemberStore::new());
        let interceptor = Interceptor::new(&config, store.clone());
        Self {
            config,
            store,
            interceptor,
        }
    }
}

/// Convert to an owned C string, dropping interior NULs.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

fn opt_c_string(s: Option<&str>) -> *mut c_char {
    s.map(to_c_string).unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Head = 4,
    Options = 5,
    Patch = 6,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Options => FfiHttpMethod::Options,
            HttpMethod::Patch => FfiHttpMethod::Patch,
        }
    }
}

/// Caller-owned header passed into `mall_prepare_request`. Read, never freed.
#[repr(C)]
pub struct FfiHeaderInput {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// A single HTTP header as a key-value pair of library-owned C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An intercepted request, ready for the host to execute.
///
/// `data` is the JSON payload (or null). When `data_as_query` is true the
/// host sends the payload's fields as query parameters, otherwise as a JSON
/// body. `timeout_ms` is the deadline the host must enforce.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub data: *mut c_char,
    pub data_as_query: bool,
    pub timeout_ms: u64,
}

/// Move key-value pairs into a heap array of `FfiHeader`. Null when empty.
fn pairs_to_ffi(pairs: &[(String, String)]) -> (*mut FfiHeader, u32) {
    if pairs.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let ffi_pairs: Vec<FfiHeader> = pairs
        .iter()
        .map(|(k, v)| FfiHeader {
            key: to_c_string(k),
            value: to_c_string(v),
        })
        .collect();
    // Length and capacity must match for `Vec::from_raw_parts` on free.
    (Box::into_raw(ffi_pairs.into_boxed_slice()) as *mut FfiHeader, pairs.len() as u32)
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = to_c_string(&req.url);
        let data = match &req.data {
            Some(d) => to_c_string(&d.to_string()),
            None => std::ptr::null_mut(),
        };
        let (headers, headers_len) = pairs_to_ffi(&req.headers);

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            data,
            data_as_query: req.method.sends_data_as_query(),
            timeout_ms: req.timeout_ms.unwrap_or(0),
        });
        Box::into_raw(ffi_req)
    }
}

/// An intercepted multipart upload, ready for the host to execute.
#[repr(C)]
pub struct FfiUploadRequest {
    pub url: *mut c_char,
    pub file_path: *mut c_char,
    pub name: *mut c_char,
    pub form_data: *mut FfiHeader,
    pub form_data_len: u32,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub timeout_ms: u64,
}

impl FfiUploadRequest {
    pub(crate) fn from_core(upload: UploadRequest) -> *mut Self {
        let (form_data, form_data_len) = pairs_to_ffi(&upload.form_data);
        let (headers, headers_len) = pairs_to_ffi(&upload.headers);
        Box::into_raw(Box::new(FfiUploadRequest {
            url: to_c_string(&upload.url),
            file_path: to_c_string(&upload.file_path),
            name: to_c_string(&upload.name),
            form_data,
            form_data_len,
            headers,
            headers_len,
            timeout_ms: upload.timeout_ms.unwrap_or(0),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `mall_handle_response`. The FFI layer reads but does
/// not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

/// Transport failure kinds accepted by `mall_handle_transport_error`.
pub const TRANSPORT_TIMEOUT: u32 = 0;
pub const TRANSPORT_DNS: u32 = 1;
pub const TRANSPORT_CONNECT: u32 = 2;
pub const TRANSPORT_IO: u32 = 3;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Classification of a finished call, plus the two argument/panic failures
/// of the FFI layer itself.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOutcomeKind {
    Success = 0,
    AuthExpired = 1,
    ServerError = 2,
    TransportError = 3,
    NullArg = 4,
    Panic = 5,
}

/// Result of handing a response (or transport failure) back to the library.
///
/// The session has already been cleared for `AuthExpired`. A non-null
/// `toast` must be shown to the user; a non-null `navigate_to` must be
/// navigated to. `body` is the raw response body for any outcome that had a
/// response. `error_message` describes transport and FFI failures.
#[repr(C)]
pub struct FfiOutcome {
    pub kind: FfiOutcomeKind,
    pub http_status: u16,
    pub toast: *mut c_char,
    pub navigate_to: *mut c_char,
    pub body: *mut c_char,
    pub error_message: *mut c_char,
}

impl FfiOutcome {
    /// Build from a classified outcome and the effects captured for it.
    pub(crate) fn from_core(outcome: &Outcome, toast: Option<&str>, navigate_to: Option<&str>) -> *mut Self {
        let (kind, http_status, body, error_message) = match outcome {
            Outcome::Success(r) => (FfiOutcomeKind::Success, r.status, Some(r.body.as_str()), None),
            Outcome::AuthExpired(r) => (FfiOutcomeKind::AuthExpired, r.status, Some(r.body.as_str()), None),
            Outcome::ServerError { response, .. } => (
                FfiOutcomeKind::ServerError,
                response.status,
                Some(response.body.as_str()),
                None,
            ),
            Outcome::TransportError(err) => (FfiOutcomeKind::TransportError, 0, None, Some(err.to_string())),
        };
        Box::into_raw(Box::new(FfiOutcome {
            kind,
            http_status,
            toast: opt_c_string(toast),
            navigate_to: opt_c_string(navigate_to),
            body: opt_c_string(body),
            error_message: opt_c_string(error_message.as_deref()),
        }))
    }

    fn failure(kind: FfiOutcomeKind, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            kind,
            http_status: 0,
            toast: std::ptr::null_mut(),
            navigate_to: std::ptr::null_mut(),
            body: std::ptr::null_mut(),
            error_message: to_c_string(msg),
        }))
    }

    /// Build an outcome for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiOutcomeKind::NullArg, &format!("null argument: {name}"))
    }

    /// Build an outcome for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiOutcomeKind::Panic, msg)
    }
}
