//! C-ABI wrapper around `mall-core`.
//!
//! # Overview
//! Exposes the request pipeline in host-does-IO form: the host asks the
//! library to prepare (intercept) a request, executes it with its own HTTP
//! stack, then hands the response or transport failure back and receives a
//! classified outcome telling it which toast to show and where to navigate.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Session state lives inside the pipeline handle; a 401 clears it before
//!   `mall_handle_response` returns.
//! - Effects are captured per call instead of performed, so concurrent calls
//!   on one handle never see each other's toasts.
//! - The C caller owns all returned pointers and must call the matching
//!   `mall_free_*` function to release them.

pub mod types;

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use mall_core::http::HttpMethod;
use mall_core::{
    classify, Effects, HttpRequest, HttpResponse, Navigator, Notifier, Outcome, PipelineConfig, Profile,
    SessionStore, TransportError, UploadRequest,
};

use types::*;

/// Borrow a C string as `&str`, treating invalid UTF-8 as empty.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string that outlives the
/// returned slice.
unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(s) }.to_str().unwrap_or(""))
    }
}

/// Read a C string that carries data rather than an identifier; invalid
/// UTF-8 is replaced, not dropped. Null reads as empty.
///
/// # Safety
/// Same as `c_str`.
unsafe fn c_text<'a>(s: *const c_char) -> Cow<'a, str> {
    if s.is_null() {
        Cow::Borrowed("")
    } else {
        unsafe { CStr::from_ptr(s) }.to_string_lossy()
    }
}

/// Copy a caller-owned array of key-value inputs. `None` if any pointer is
/// null.
///
/// # Safety
/// `pairs` must be null or point to `len` readable `FfiHeaderInput`s.
unsafe fn read_pairs(pairs: *const FfiHeaderInput, len: u32) -> Option<Vec<(String, String)>> {
    if len == 0 {
        return Some(Vec::new());
    }
    if pairs.is_null() {
        return None;
    }
    let inputs = unsafe { std::slice::from_raw_parts(pairs, len as usize) };
    inputs
        .iter()
        .map(|h| {
            let key = unsafe { c_str(h.key) }?;
            let value = unsafe { c_str(h.value) }?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline lifecycle
// ---------------------------------------------------------------------------

/// Create a new pipeline bound to `base_url`, logged out.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `mall_pipeline_free`.
#[unsafe(no_mangle)]
pub extern "C" fn mall_pipeline_new(base_url: *const c_char) -> *mut FfiPipeline {
    catch_unwind(|| {
        let Some(url) = (unsafe { c_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let config = PipelineConfig::new(url);
        Box::into_raw(Box::new(FfiPipeline::new(config)))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a pipeline created by `mall_pipeline_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_pipeline_free(pipeline: *mut FfiPipeline) {
    if !pipeline.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(pipeline) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Store `token` as the logged-in member's token. Returns false on null
/// arguments.
#[unsafe(no_mangle)]
pub extern "C" fn mall_session_set_token(pipeline: *const FfiPipeline, token: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return false;
        }
        let Some(token) = (unsafe { c_str(token) }) else {
            return false;
        };
        let pipeline = unsafe { &*pipeline };
        pipeline.store.set_profile(Profile::with_token(token));
        true
    }))
    .unwrap_or(false)
}

/// Log the member out. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_session_clear(pipeline: *const FfiPipeline) {
    if pipeline.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*pipeline }.store.clear();
    }));
}

/// Current token, or null when logged out.
///
/// The caller must free a non-null result with `mall_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn mall_session_token(pipeline: *const FfiPipeline) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &*pipeline }.store.token() {
            Some(token) => to_c_string(&token),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request preparation
// ---------------------------------------------------------------------------

/// Intercept a request: resolve `url` against the base URL, apply the
/// timeout, add the client header and the member's token.
///
/// `method` is an HTTP method name ("GET", "post", ...). `data_json` may be
/// null; otherwise it must be valid JSON. `headers` may be null when
/// `headers_len` is 0.
///
/// Returns null on null or invalid arguments. The caller must free the
/// returned pointer with `mall_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn mall_prepare_request(
    pipeline: *const FfiPipeline,
    method: *const c_char,
    url: *const c_char,
    data_json: *const c_char,
    headers: *const FfiHeaderInput,
    headers_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return std::ptr::null_mut();
        }
        let pipeline = unsafe { &*pipeline };
        let (Some(method), Some(url)) = (unsafe { c_str(method) }, unsafe { c_str(url) }) else {
            return std::ptr::null_mut();
        };
        let Some(method) = HttpMethod::parse(method) else {
            return std::ptr::null_mut();
        };

        let mut req = HttpRequest::new(method, url);
        if let Some(data) = unsafe { c_str(data_json) } {
            match serde_json::from_str(data) {
                Ok(value) => req.data = Some(value),
                Err(e) => {
                    tracing::debug!(target: "mall::ffi", error = %e, "rejecting invalid data_json");
                    return std::ptr::null_mut();
                }
            }
        }
        let Some(caller_headers) = (unsafe { read_pairs(headers, headers_len) }) else {
            return std::ptr::null_mut();
        };
        req.headers = caller_headers;

        pipeline.interceptor.intercept(&mut req);
        FfiHttpRequest::from_core(req)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Intercept a file upload the same way as `mall_prepare_request`.
///
/// `form_data` and `headers` may be null when their length is 0. Returns
/// null on null or invalid arguments. The caller must free the returned
/// pointer with `mall_free_upload`.
#[unsafe(no_mangle)]
pub extern "C" fn mall_prepare_upload(
    pipeline: *const FfiPipeline,
    url: *const c_char,
    file_path: *const c_char,
    name: *const c_char,
    form_data: *const FfiHeaderInput,
    form_data_len: u32,
    headers: *const FfiHeaderInput,
    headers_len: u32,
) -> *mut FfiUploadRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return std::ptr::null_mut();
        }
        let pipeline = unsafe { &*pipeline };
        let (Some(url), Some(file_path), Some(name)) =
            (unsafe { c_str(url) }, unsafe { c_str(file_path) }, unsafe { c_str(name) })
        else {
            return std::ptr::null_mut();
        };
        let (Some(form_data), Some(headers)) = (unsafe { read_pairs(form_data, form_data_len) }, unsafe {
            read_pairs(headers, headers_len)
        }) else {
            return std::ptr::null_mut();
        };

        let mut upload = UploadRequest::new(url, file_path, name);
        upload.form_data = form_data;
        upload.headers = headers;
        pipeline.interceptor.intercept(&mut upload);
        FfiUploadRequest::from_core(upload)
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Notifier and navigator that record the effect instead of performing it.
#[derive(Default)]
struct Captured {
    toast: Mutex<Option<String>>,
    navigate_to: Mutex<Option<String>>,
}

impl Notifier for Captured {
    fn show_toast(&self, text: &str) {
        if let Ok(mut slot) = self.toast.lock() {
            *slot = Some(text.to_string());
        }
    }
}

impl Navigator for Captured {
    fn navigate_to(&self, path: &str) {
        if let Ok(mut slot) = self.navigate_to.lock() {
            *slot = Some(path.to_string());
        }
    }
}

impl Captured {
    fn take(slot: &Mutex<Option<String>>) -> Option<String> {
        slot.lock().ok().and_then(|mut s| s.take())
    }
}

/// Classify a transport result, apply effects against the pipeline's session
/// and build the outcome handed back to C.
fn settle(pipeline: &FfiPipeline, result: Result<HttpResponse, TransportError>) -> *mut FfiOutcome {
    let outcome = classify(result, &pipeline.config.fallback_error_message);
    let captured = Arc::new(Captured::default());
    let effects = Effects::new(&pipeline.config, pipeline.store.clone(), captured.clone(), captured.clone());
    effects.apply(&outcome);

    if let Outcome::TransportError(err) = &outcome {
        tracing::warn!(target: "mall::ffi", error = %err, "transport failure reported by host");
    } else {
        tracing::debug!(target: "mall::ffi", kind = outcome.kind(), "response settled");
    }

    let toast = Captured::take(&captured.toast);
    let navigate_to = Captured::take(&captured.navigate_to);
    FfiOutcome::from_core(&outcome, toast.as_deref(), navigate_to.as_deref())
}

/// Classify the host's response to a prepared request.
///
/// On 401 the session is cleared before this returns and `navigate_to` holds
/// the login page. On any other non-2xx status `toast` holds the message to
/// show. The caller must free the result with `mall_free_outcome`.
#[unsafe(no_mangle)]
pub extern "C" fn mall_handle_response(
    pipeline: *const FfiPipeline,
    response: *const FfiHttpResponse,
) -> *mut FfiOutcome {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return FfiOutcome::null_arg("pipeline");
        }
        if response.is_null() {
            return FfiOutcome::null_arg("response");
        }
        let pipeline = unsafe { &*pipeline };
        let resp = unsafe { &*response };
        let body = unsafe { c_text(resp.body) };
        settle(pipeline, Ok(HttpResponse::new(resp.status, body.into_owned())))
    }))
    .unwrap_or_else(|_| FfiOutcome::panic("panic in mall_handle_response"))
}

/// Report that the host could not complete a prepared request.
///
/// `kind` is one of the `TRANSPORT_*` constants; unknown values are treated
/// as a generic failure. `message` may be null. The outcome always carries
/// the network-error toast and leaves the session untouched.
#[unsafe(no_mangle)]
pub extern "C" fn mall_handle_transport_error(
    pipeline: *const FfiPipeline,
    kind: u32,
    message: *const c_char,
) -> *mut FfiOutcome {
    catch_unwind(AssertUnwindSafe(|| {
        if pipeline.is_null() {
            return FfiOutcome::null_arg("pipeline");
        }
        let pipeline = unsafe { &*pipeline };
        let message = unsafe { c_text(message) }.into_owned();
        let err = match kind {
            TRANSPORT_TIMEOUT => TransportError::Timeout {
                timeout_ms: pipeline.config.timeout_ms,
            },
            TRANSPORT_DNS => TransportError::Dns(message),
            TRANSPORT_CONNECT => TransportError::Connect(message),
            TRANSPORT_IO => TransportError::Io(message),
            _ => TransportError::Other(message),
        };
        settle(pipeline, Err(err))
    }))
    .unwrap_or_else(|_| FfiOutcome::panic("panic in mall_handle_transport_error"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

fn free_pairs(pairs: *mut FfiHeader, len: u32) {
    if pairs.is_null() || len == 0 {
        return;
    }
    let pairs = unsafe { Vec::from_raw_parts(pairs, len as usize, len as usize) };
    for h in pairs {
        free_c_string(h.key);
        free_c_string(h.value);
    }
}

/// Free an `FfiHttpRequest` returned by `mall_prepare_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.data);
        free_pairs(req.headers, req.headers_len);
    }));
}

/// Free an `FfiUploadRequest` returned by `mall_prepare_upload`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_free_upload(upload: *mut FfiUploadRequest) {
    if upload.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let upload = unsafe { Box::from_raw(upload) };
        free_c_string(upload.url);
        free_c_string(upload.file_path);
        free_c_string(upload.name);
        free_pairs(upload.form_data, upload.form_data_len);
        free_pairs(upload.headers, upload.headers_len);
    }));
}

/// Free an `FfiOutcome` returned by `mall_handle_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_free_outcome(outcome: *mut FfiOutcome) {
    if outcome.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let outcome = unsafe { Box::from_raw(outcome) };
        free_c_string(outcome.toast);
        free_c_string(outcome.navigate_to);
        free_c_string(outcome.body);
        free_c_string(outcome.error_message);
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mall_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
