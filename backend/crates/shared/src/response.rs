//! Response Envelope
//!
//! Every JSON body produced by the panel API is wrapped in [`Msg`]:
//!
//! ```json
//! { "success": true, "msg": "", "obj": { ... } }
//! ```
//!
//! Failures carry `success: false`, a human-readable `msg` and `obj: null`.

use std::borrow::Cow;

use serde::Serialize;

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Msg<T = ()> {
    pub success: bool,
    pub msg: Cow<'static, str>,
    pub obj: Option<T>,
}

impl<T> Msg<T> {
    /// Successful envelope carrying a payload
    pub fn with_obj(obj: T) -> Self {
        Self {
            success: true,
            msg: Cow::Borrowed(""),
            obj: Some(obj),
        }
    }
}

impl Msg<()> {
    /// Payload-less envelope
    pub fn plain(success: bool, msg: impl Into<Cow<'static, str>>) -> Self {
        Self {
            success,
            msg: msg.into(),
            obj: None,
        }
    }
}

/// 200 OK with `obj` set to the payload
#[cfg(feature = "axum")]
pub fn json_obj<T: Serialize>(obj: T) -> axum::response::Response {
    use axum::Json;
    use axum::response::IntoResponse;

    (http::StatusCode::OK, Json(Msg::with_obj(obj))).into_response()
}

/// Arbitrary status with a payload-less envelope
#[cfg(feature = "axum")]
pub fn pure_json_msg(
    status: http::StatusCode,
    success: bool,
    msg: impl Into<Cow<'static, str>>,
) -> axum::response::Response {
    use axum::Json;
    use axum::response::IntoResponse;

    (status, Json(Msg::plain(success, msg))).into_response()
}
