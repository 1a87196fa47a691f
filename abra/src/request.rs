use abra_common::{Body, HttpMethod, Params, Request, RequestOptions, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;

/// 请求构建器
///
/// 负责根据 URL、请求配置和 HTTP 方法组装请求描述，包括查询参数拼接、头部设置、请求体编码和取消信号。
pub struct RequestBuilder;

impl RequestBuilder {
    /// 构建请求
    ///
    /// # 参数
    ///
    /// * `method` - HTTP 方法
    /// * `url` - 请求地址
    /// * `options` - 请求配置
    /// * `body` - 动词方法传入的请求体，优先于 `options.body`
    ///
    /// # 返回值
    ///
    /// 可交给拦截器和传输层的请求描述
    pub fn build(
        method: HttpMethod,
        url: &str,
        options: &RequestOptions,
        body: Option<Body>,
    ) -> Result<Request> {
        let url = Self::append_params(url, options.params.as_ref())?;
        let mut headers = Self::build_headers(options)?;

        let body = body
            .or_else(|| options.body.clone())
            .map(Body::into_bytes)
            .transpose()?;

        // 只在有请求体且调用方没有指定时默认为 JSON，不根据内容猜测编码
        if body.is_some() && !options.has_content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let signal = options.timeout.map(|_| CancellationToken::new());

        Ok(Request {
            method,
            url,
            headers,
            body,
            signal,
        })
    }

    /// 拼接查询参数
    ///
    /// 已编码的参数原样追加；键值对逐个编码（空格编码为 `+`），URL 已带查询串时用 `&` 连接。
    fn append_params(url: &str, params: Option<&Params>) -> Result<String> {
        match params {
            None => Ok(url.to_string()),
            Some(Params::Encoded(encoded)) => Ok(format!("{url}{encoded}")),
            Some(Params::Pairs(pairs)) if pairs.is_empty() => Ok(url.to_string()),
            Some(Params::Pairs(pairs)) => {
                let query = serde_urlencoded::to_string(pairs)?;
                let separator = if url.contains('?') { '&' } else { '?' };
                Ok(format!("{url}{separator}{query}"))
            }
        }
    }

    fn build_headers(options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(options.headers.len() + 1);
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let value = HeaderValue::from_str(value)?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}
