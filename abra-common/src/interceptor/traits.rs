use crate::types::{Request, Response};

/// Abra 拦截器接口
///
/// 拦截器是一个同步的纯变换 `T -> T`，`T` 为 [`Request`] 或 [`Response`]。
/// 它可以修改传入的值后返回，也可以返回一个全新的值替换它。
/// 所有 `Fn(T) -> T + Send + Sync` 闭包都自动实现该 trait。
pub trait Interceptor<T>: Send + Sync {
    fn intercept(&self, value: T) -> T;
}

impl<T, F> Interceptor<T> for F
where
    F: Fn(T) -> T + Send + Sync,
{
    fn intercept(&self, value: T) -> T {
        self(value)
    }
}

/// 空拦截器实现，用于测试和默认情况
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpInterceptor;

impl Interceptor<Request> for NoOpInterceptor {
    fn intercept(&self, request: Request) -> Request {
        request
    }
}

impl Interceptor<Response> for NoOpInterceptor {
    fn intercept(&self, response: Response) -> Response {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use reqwest::StatusCode;
    use reqwest::header::{AUTHORIZATION, HeaderValue};

    #[test]
    fn test_no_op_interceptor() {
        let request = Request::new(HttpMethod::Get, "http://localhost/datas");
        let request = Interceptor::<Request>::intercept(&NoOpInterceptor, request);
        assert_eq!(request.url, "http://localhost/datas");
        assert!(request.headers.is_empty());

        let response = Response::new(StatusCode::OK, "http://localhost/datas").with_body("{}");
        let response = Interceptor::<Response>::intercept(&NoOpInterceptor, response);
        assert_eq!(response.body.as_ref(), b"{}");
    }

    #[test]
    fn test_closure_is_interceptor() {
        let auth = |request: Request| {
            request.with_header(AUTHORIZATION, HeaderValue::from_static("Bearer token"))
        };
        let request = auth.intercept(Request::new(HttpMethod::Get, "http://localhost/secret"));
        assert_eq!(request.header("authorization"), Some("Bearer token"));
    }

    #[test]
    fn test_closure_may_replace_value() {
        let replace = |_: Request| Request::new(HttpMethod::Delete, "http://localhost/other");
        let request = replace.intercept(Request::new(HttpMethod::Get, "http://localhost/datas"));
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "http://localhost/other");
    }
}
