//! Abra：带有请求/响应拦截器管道的共享 HTTP 客户端
//!
//! ```ignore
//! use abra::{Abra, Placement, Request, RequestOptions};
//!
//! let abra = Abra::instance();
//! let token = abra.add_out_interceptor(
//!     |request: Request| request.with_header(AUTHORIZATION, HeaderValue::from_static("Bearer token")),
//!     Placement::default(),
//! );
//! let reply = abra.get::<User>("https://api.example.com/users/1", None).await?;
//! abra.remove_interceptor(token);
//! ```

pub mod client;
pub mod request;
pub mod resolver;
pub mod transport;

pub use abra_common::{
    AbraError, Body, ContentKind, FormData, FormField, HttpMethod, Interceptor, InterceptorId,
    NoOpInterceptor, Params, Payload, Placement, Request, RequestOptions, Response, Result,
};
pub use client::Abra;
pub use request::RequestBuilder;
pub use resolver::{Reply, ResponseResolver};
pub use transport::{ReqwestTransport, Transport};
