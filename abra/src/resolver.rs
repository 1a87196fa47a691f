use abra_common::{AbraError, Payload, Response, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// 一次调用的结果：解码后的数据和原始响应
///
/// 保留响应对象，调用方可以同时检查状态码和头部。
#[derive(Debug, Clone)]
pub struct Reply<T> {
    /// 响应体为空时为 `None`
    pub data: Option<T>,
    pub response: Response,
}

impl Reply<Payload> {
    /// 将解码后的响应体转换为调用方期望的类型
    pub fn decode<T: DeserializeOwned>(self) -> Result<Reply<T>> {
        let data = self.data.map(Payload::into_data).transpose()?;
        Ok(Reply {
            data,
            response: self.response,
        })
    }
}

/// 响应解析器
///
/// 检查 `ok` 标志并按内容类型解码响应体，失败的响应被转换为携带服务端 `message` 的错误。
pub struct ResponseResolver;

impl ResponseResolver {
    pub async fn resolve(response: Response) -> Result<Reply<Payload>> {
        if !response.ok() {
            // 错误响应体无法解析为 JSON 时，解析错误本身就是这次调用的错误
            let error: serde_json::Value = serde_json::from_slice(&response.body)?;
            return Err(AbraError::Server {
                status: response.status,
                message: Self::error_message(&error),
            });
        }

        // 这些状态码不携带响应体，其余成功响应即使为空也按内容类型解码
        if matches!(response.status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT) {
            return Ok(Reply {
                data: None,
                response,
            });
        }

        let payload = Payload::decode(response.mime().as_ref(), response.body.clone()).await?;

        Ok(Reply {
            data: Some(payload),
            response,
        })
    }

    /// 提取错误负载中的 `message` 字段
    fn error_message(error: &serde_json::Value) -> String {
        match error.get("message") {
            Some(serde_json::Value::String(message)) => message.clone(),
            None | Some(serde_json::Value::Null) => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
