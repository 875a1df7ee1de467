// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Helpers shared by the functions that let other languages talk to this Rust
library.

Errors are reported by writing a message into a caller-provided buffer of
[`ERROR_BUFFER_LEN`] bytes, so that callers without any way to handle Rust
types (or exceptions) can still find out what went wrong.
 */

use std::{
    os::raw::c_char,
    panic::{self, AssertUnwindSafe},
    slice,
};

/// The number of bytes that callers must allocate for error messages. Longer
/// messages are truncated; the message is always null terminated.
pub const ERROR_BUFFER_LEN: usize = 200;

/// Write `msg` into the caller's error buffer. Nothing is done if the buffer is
/// null.
///
/// # Safety
///
/// `error_str` must be null or point to at least [`ERROR_BUFFER_LEN`] writable
/// bytes.
pub(crate) unsafe fn write_error(msg: &str, error_str: *mut c_char) {
    if error_str.is_null() {
        return;
    }

    // Don't cut a multi-byte character in half.
    let mut end = msg.len().min(ERROR_BUFFER_LEN - 1);
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    let buffer = slice::from_raw_parts_mut(error_str.cast::<u8>(), end + 1);
    buffer[..end].copy_from_slice(&msg.as_bytes()[..end]);
    // Add a trailing null so people using the string as a `char *` don't
    // accidentally read into garbage.
    buffer[end] = 0;
}

/// Evaluate a `Result`; on an error, write it into the error buffer and return
/// 1 from the enclosing function (or closure).
macro_rules! ffi_error {
    ($result:expr, $error_str:expr) => {{
        match $result {
            Ok(r) => r,
            Err(e) => {
                $crate::ffi::write_error(&e.to_string(), $error_str);
                return 1;
            }
        }
    }};
}
pub(crate) use ffi_error;

/// Run `f`, turning a panic into an exit code of -1 (with the panic message in
/// the error buffer). Panics must not unwind into foreign code.
///
/// # Safety
///
/// `error_str` must be null or point to at least [`ERROR_BUFFER_LEN`] writable
/// bytes.
pub(crate) unsafe fn guard<F: FnOnce() -> i32>(error_str: *mut c_char, f: F) -> i32 {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(code) => code,
        Err(payload) => {
            let msg = panic_message::panic_message(&payload);
            write_error(&format!("panic: {msg}"), error_str);
            -1
        }
    }
}

/// Interpret a C "boolean". Only 0 and 1 are accepted.
pub(crate) fn c_bool(name: &str, value: u8) -> Result<bool, String> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(format!("A value other than 0 or 1 was used for {name}")),
    }
}
