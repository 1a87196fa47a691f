use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use abra::{Abra, Placement, Request, Response};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::Deserialize;

const API: &str = "https://jsonplaceholder.typicode.com";

/// 用户数据结构
#[derive(Debug, Deserialize)]
struct User {
    id: u32,
    name: String,
}

/// 认证拦截器 - 自动添加认证头部
fn auth_interceptor(token: &str) -> anyhow::Result<impl Fn(Request) -> Request + Send + Sync + 'static> {
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))?;
    Ok(move |request: Request| {
        println!("🔐 AuthInterceptor: 添加认证头部");
        request.with_header(AUTHORIZATION, bearer.clone())
    })
}

/// 日志拦截器 - 记录请求信息
fn logging_interceptor(request: Request) -> Request {
    println!(
        "📝 LoggingInterceptor: {} {}，请求体大小: {} 字节",
        request.method,
        request.url,
        request.body.as_ref().map_or(0, |body| body.len())
    );
    request
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Abra Interceptor Usage Example ===\n");

    let abra = Abra::instance();

    // 日志拦截器放在最后，能看到其他拦截器修改后的请求
    let logging = abra.add_out_interceptor(logging_interceptor, Placement::Last);
    let auth = abra.add_out_interceptor(auth_interceptor("demo-token-12345")?, Placement::First);

    // 响应拦截器：统计响应数量并打上标记
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let marker = HeaderName::from_static("x-intercepted");
    let tagging = abra.add_in_interceptor(
        move |response: Response| {
            let count = seen.fetch_add(1, Ordering::SeqCst) + 1;
            println!("📊 ResponseInterceptor: 第 {count} 个响应，状态码 {}", response.status);
            response.with_header(marker.clone(), HeaderValue::from_static("true"))
        },
        Placement::default(),
    );

    println!("1. 带拦截器的请求");
    let reply = abra.get::<User>(&format!("{API}/users/1"), None).await?;
    if let Some(user) = &reply.data {
        println!("   ✅ 用户 #{}: {}", user.id, user.name);
    }
    println!("   x-intercepted: {:?}\n", reply.response.header("x-intercepted"));

    println!("2. 移除认证和响应拦截器后再次请求");
    abra.remove_interceptor(auth);
    abra.remove_interceptor(tagging);
    let reply = abra.get::<User>(&format!("{API}/users/2"), None).await?;
    println!("   x-intercepted: {:?}\n", reply.response.header("x-intercepted"));

    abra.remove_interceptor(logging);

    println!("响应拦截器共执行 {} 次", counter.load(Ordering::SeqCst));
    println!("🎉 拦截器示例运行完成！");

    Ok(())
}
