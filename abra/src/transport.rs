//! 传输层抽象与基于 reqwest 的默认实现

use abra_common::{AbraError, Request, Response, Result};
use async_trait::async_trait;

/// 传输层接口
///
/// 实现方必须遵守请求上的取消信号：信号被取消时中止请求并以 [`AbraError::Aborted`] 失败。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response>;
}

/// 基于 `reqwest::Client` 的传输层
///
/// 连接池、TLS、重定向等都交给 reqwest 处理。
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<reqwest::Url>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已配置好的 reqwest 客户端
    ///
    /// 代理、TLS 等传输层配置先在 `reqwest::ClientBuilder` 上完成再传入。
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// 设置基础地址，相对 URL 会基于它解析
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| AbraError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    fn resolve_url(&self, url: &str) -> Result<reqwest::Url> {
        let parsed = match &self.base_url {
            Some(base) => base.join(url),
            None => reqwest::Url::parse(url),
        };
        parsed.map_err(|e| AbraError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let url = self.resolve_url(&request.url)?;

        let mut native = reqwest::Request::new(request.method.into(), url);
        *native.headers_mut() = request.headers;
        if let Some(body) = request.body {
            *native.body_mut() = Some(body.into());
        }

        let response = self.client.execute(native).await.map_err(AbraError::transport)?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(AbraError::transport)?;

        Ok(Response {
            status,
            url,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: Request) -> Result<Response> {
        match request.signal.clone() {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => Err(AbraError::Aborted),
                result = self.send(request) => result,
            },
            None => self.send(request).await,
        }
    }
}
