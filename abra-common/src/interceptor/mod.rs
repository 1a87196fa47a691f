pub mod chain;
pub mod traits;

pub use chain::{InterceptorChain, InterceptorId, Placement, apply_all};
pub use traits::{Interceptor, NoOpInterceptor};
