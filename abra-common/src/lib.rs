//! Abra 的公共类型
//!
//! 不涉及任何 I/O：请求/响应描述、请求配置、拦截器链、响应体解码和错误类型都在这里定义，
//! 由 `abra` crate 负责真正的发送与执行。

pub mod error;
pub mod form;
pub mod interceptor;
pub mod payload;
pub mod types;

pub use error::{AbraError, Result};
pub use form::{FormData, FormField};
pub use interceptor::{Interceptor, InterceptorChain, InterceptorId, NoOpInterceptor, Placement};
pub use payload::Payload;
pub use types::{Body, ContentKind, HttpMethod, Params, Request, RequestOptions, Response};
