pub mod http;
pub mod message;
pub mod options;

pub use http::{ContentKind, HttpMethod};
pub use message::{Request, Response};
pub use options::{Body, Params, RequestOptions};
