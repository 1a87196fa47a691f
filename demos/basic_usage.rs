use std::time::Duration;

use abra::{Abra, AbraError, Body, Params, RequestOptions};
use serde::{Deserialize, Serialize};

const API: &str = "https://jsonplaceholder.typicode.com";

/// 用户数据结构
#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    email: String,
}

/// 创建用户请求
#[derive(Serialize)]
struct CreateUserRequest {
    name: String,
    email: String,
}

/// 文章查询条件
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostQuery {
    user_id: u32,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: u32,
    title: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    env_logger::init();

    println!("=== Abra HTTP Client Basic Usage Example ===\n");

    let abra = Abra::instance();

    // 示例1：GET 请求
    println!("1. 获取用户信息");
    match abra.get::<User>(&format!("{API}/users/1"), None).await {
        Ok(reply) => println!(
            "   ✅ 状态码 {}，用户: {:?}\n",
            reply.response.status,
            reply.data.map(|user| user.name)
        ),
        Err(e) => println!("   ❌ 错误: {}\n", e),
    }

    // 示例2：带查询参数的 GET 请求
    println!("2. 按用户查询文章");
    let options = RequestOptions::new().params(Params::from_serialize(&PostQuery { user_id: 1 })?);
    let posts = abra
        .get::<Vec<Post>>(&format!("{API}/posts"), Some(options))
        .await?;
    println!("   请求地址: {}", posts.response.url);
    for post in posts.data.unwrap_or_default().iter().take(3) {
        println!("   - #{} {}", post.id, post.title);
    }
    println!();

    // 示例3：POST 请求，请求体默认按 JSON 发送
    println!("3. 创建新用户...");
    let new_user = CreateUserRequest {
        name: "张三".to_string(),
        email: "zhangsan@example.com".to_string(),
    };
    let created = abra
        .post::<User>(&format!("{API}/users"), Body::json(&new_user)?, None)
        .await?;
    println!("   ✅ 创建的用户: {:?}\n", created.data);

    // 示例4：并发请求，全部完成后按顺序返回
    println!("4. 并发获取多个用户");
    let users = abra
        .all((1..=3).map(|id| {
            let url = format!("{API}/users/{id}");
            async move { abra.get::<User>(&url, None).await }
        }))
        .await?;
    for reply in users {
        if let Some(user) = reply.data {
            println!("   - #{} {} <{}>", user.id, user.name, user.email);
        }
    }
    println!();

    // 示例5：失败的请求和超时
    println!("5. 错误处理");
    match abra.get::<User>(&format!("{API}/users/404"), None).await {
        Ok(reply) => println!("   意外成功: {:?}", reply.data),
        Err(e) => println!("   ❌ 状态码 {:?}，错误: {}", e.status(), e),
    }

    let options = RequestOptions::new().timeout(Duration::from_millis(1));
    match abra.get::<Vec<User>>(&format!("{API}/users"), Some(options)).await {
        Err(AbraError::Aborted) => println!("   ⏱️ 请求超时被取消\n"),
        Err(e) => println!("   ❌ 错误: {}\n", e),
        Ok(_) => println!("   请求在超时前完成\n"),
    }

    println!("🎉 所有示例运行完成！");

    Ok(())
}
