use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use abra_common::interceptor::apply_all;
use abra_common::{
    Body, HttpMethod, Interceptor, InterceptorChain, InterceptorId, Payload, Placement, Request,
    RequestOptions, Response, Result,
};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::request::RequestBuilder;
use crate::resolver::{Reply, ResponseResolver};
use crate::transport::{ReqwestTransport, Transport};

static INSTANCE: OnceLock<Abra> = OnceLock::new();

/// 共享 HTTP 客户端
///
/// 持有出站（请求）和入站（响应）两条有序拦截器链。每次调用的流程：
///
/// 构建请求 → 出站拦截器 → 传输层发送（可选超时） → 入站拦截器 → 解码/校验
///
/// 可以通过 [`Abra::instance`] 获取进程级单例，也可以自行构造后注入到调用方。
pub struct Abra {
    transport: Arc<dyn Transport>,
    out_interceptors: RwLock<InterceptorChain<Request>>,
    in_interceptors: RwLock<InterceptorChain<Response>>,
}

impl Abra {
    /// 使用指定的传输层创建客户端
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// 多个客户端共享同一个传输层
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            out_interceptors: RwLock::new(InterceptorChain::new()),
            in_interceptors: RwLock::new(InterceptorChain::new()),
        }
    }

    /// 进程级单例，第一次调用时创建，此后始终返回同一个实例
    pub fn instance() -> &'static Abra {
        INSTANCE.get_or_init(Abra::default)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> Result<Reply<T>> {
        self.cadabra(HttpMethod::Get, url, options, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: impl Into<Body>,
        options: Option<RequestOptions>,
    ) -> Result<Reply<T>> {
        self.cadabra(HttpMethod::Post, url, options, Some(body.into()))
            .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        body: impl Into<Body>,
        options: Option<RequestOptions>,
    ) -> Result<Reply<T>> {
        self.cadabra(HttpMethod::Put, url, options, Some(body.into()))
            .await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        url: &str,
        body: impl Into<Body>,
        options: Option<RequestOptions>,
    ) -> Result<Reply<T>> {
        self.cadabra(HttpMethod::Patch, url, options, Some(body.into()))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> Result<Reply<T>> {
        self.cadabra(HttpMethod::Delete, url, options, None).await
    }

    /// 等待一组独立发起的调用全部完成，按传入顺序返回结果
    ///
    /// 任意一个失败则整体失败（返回传入顺序中第一个错误），但不会因此取消其他调用。
    pub async fn all<T, I>(&self, calls: I) -> Result<Vec<T>>
    where
        I: IntoIterator,
        I::Item: Future<Output = Result<T>>,
    {
        join_all(calls).await.into_iter().collect()
    }

    /// 注册出站（请求）拦截器
    pub fn add_out_interceptor<I>(&self, interceptor: I, placement: Placement) -> InterceptorId
    where
        I: Interceptor<Request> + 'static,
    {
        write(&self.out_interceptors).insert(Arc::new(interceptor), placement)
    }

    /// 注册入站（响应）拦截器
    pub fn add_in_interceptor<I>(&self, interceptor: I, placement: Placement) -> InterceptorId
    where
        I: Interceptor<Response> + 'static,
    {
        write(&self.in_interceptors).insert(Arc::new(interceptor), placement)
    }

    /// 从两条链中移除句柄对应的拦截器
    ///
    /// 未注册的句柄不会报错，返回 `false`。已经完成的调用不受影响。
    pub fn remove_interceptor(&self, id: InterceptorId) -> bool {
        let removed_out = write(&self.out_interceptors).remove(id);
        let removed_in = write(&self.in_interceptors).remove(id);
        removed_out || removed_in
    }

    /// 执行一次请求，返回未转换类型的响应体
    ///
    /// # 参数
    ///
    /// * `method` - HTTP 方法
    /// * `url` - 请求地址
    /// * `options` - 请求配置
    /// * `body` - 请求体，优先于 `options.body`
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        options: Option<RequestOptions>,
        body: Option<Body>,
    ) -> Result<Reply<Payload>> {
        self.perform(method, url, options, body)
            .await
            .inspect_err(|e| log::error!("{method} {url} failed: {e}"))
    }

    async fn cadabra<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        options: Option<RequestOptions>,
        body: Option<Body>,
    ) -> Result<Reply<T>> {
        self.execute(method, url, options, body)
            .await?
            .decode()
            .inspect_err(|e| log::error!("{method} {url} returned an undecodable body: {e}"))
    }

    async fn perform(
        &self,
        method: HttpMethod,
        url: &str,
        options: Option<RequestOptions>,
        body: Option<Body>,
    ) -> Result<Reply<Payload>> {
        let options = options.unwrap_or_default();
        let request = RequestBuilder::build(method, url, &options, body)?;
        let signal = request.signal.clone();

        // 请求按值交给出站拦截器，原始描述不会在管道中被观察或修改
        let request = self.apply_out_interceptors(request);

        #[cfg(debug_assertions)]
        log::debug!("Dispatching {} {}", request.method, request.url);

        let timer = signal
            .zip(options.timeout)
            .map(|(signal, after)| arm_timeout(signal, after));
        let response = self.transport.fetch(request).await;
        // 调用结束后撤销定时器，已完成的调用不会再被取消
        drop(timer);

        let response = self.apply_in_interceptors(response?);

        #[cfg(debug_assertions)]
        log::debug!("Received {} from {}", response.status, response.url);

        ResponseResolver::resolve(response).await
    }

    fn apply_out_interceptors(&self, request: Request) -> Request {
        let interceptors = read(&self.out_interceptors).snapshot();
        apply_all(&interceptors, request)
    }

    fn apply_in_interceptors(&self, response: Response) -> Response {
        let interceptors = read(&self.in_interceptors).snapshot();
        apply_all(&interceptors, response)
    }
}

impl Default for Abra {
    fn default() -> Self {
        Self::new(ReqwestTransport::new())
    }
}

impl fmt::Debug for Abra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Abra")
            .field("out_interceptors", &*read(&self.out_interceptors))
            .field("in_interceptors", &*read(&self.in_interceptors))
            .finish_non_exhaustive()
    }
}

/// 在 `after` 之后取消信号
///
/// 返回的守卫被丢弃时定时器随之撤销，不会留下悬挂的定时任务。
fn arm_timeout(signal: CancellationToken, after: Duration) -> DropGuard {
    let completed = CancellationToken::new();
    let guard = completed.clone().drop_guard();

    tokio::spawn(async move {
        tokio::select! {
            _ = completed.cancelled() => {}
            _ = tokio::time::sleep(after) => {
                log::debug!("Request timed out after {after:?}, cancelling");
                signal.cancel();
            }
        }
    });

    guard
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
