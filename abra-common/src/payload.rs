use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;
use serde::de::value::{SeqDeserializer, StringDeserializer};

use crate::error::AbraError;
use crate::form::FormData;
use crate::types::ContentKind;

/// 解码后的响应体
///
/// 每个变体对应 [`ContentKind`] 的一条解码路径。
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
    Form(FormData),
    Binary(Bytes),
}

impl Payload {
    /// 按内容类型解码响应体
    ///
    /// 缺失的内容类型按二进制处理；multipart 从参数中读取 `boundary`。
    pub async fn decode(content_type: Option<&Mime>, body: Bytes) -> Result<Self, AbraError> {
        let kind = content_type.map_or(ContentKind::Binary, ContentKind::from_mime);
        match kind {
            ContentKind::Json => Ok(Payload::Json(serde_json::from_slice(&body)?)),
            ContentKind::Text => Ok(Payload::Text(String::from_utf8_lossy(&body).into_owned())),
            ContentKind::Form => {
                let form = match content_type.filter(|value| value.type_() == mime::MULTIPART) {
                    Some(multipart) => {
                        let boundary = multipart
                            .get_param(mime::BOUNDARY)
                            .ok_or(AbraError::Multipart(multer::Error::NoBoundary))?;
                        FormData::parse_multipart(body, boundary.as_str()).await?
                    }
                    None => FormData::parse_urlencoded(&body)?,
                };
                Ok(Payload::Form(form))
            }
            ContentKind::Binary => Ok(Payload::Binary(body)),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Payload::Json(_) => ContentKind::Json,
            Payload::Text(_) => ContentKind::Text,
            Payload::Form(_) => ContentKind::Form,
            Payload::Binary(_) => ContentKind::Binary,
        }
    }

    /// 转换为调用方期望的类型
    ///
    /// - JSON 直接反序列化
    /// - 文本作为字符串反序列化（适用于 `String`、`serde_json::Value` 等）
    /// - 表单见 [`FormData::deserialize`]
    /// - 二进制作为字节序列反序列化（适用于 `Vec<u8>`）
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, AbraError> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Text(text) => Ok(T::deserialize(StringDeserializer::<serde_json::Error>::new(text))?),
            Payload::Form(form) => form.deserialize(),
            Payload::Binary(bytes) => Ok(T::deserialize(SeqDeserializer::<_, serde_json::Error>::new(
                bytes.into_iter(),
            ))?),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Payload::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Message {
        message: String,
    }

    async fn decode(content_type: Option<&str>, body: &'static [u8]) -> Result<Payload, AbraError> {
        let content_type = content_type.map(|value| value.parse::<Mime>().unwrap());
        Payload::decode(content_type.as_ref(), Bytes::from_static(body)).await
    }

    #[tokio::test]
    async fn test_decode_json() {
        let payload = decode(Some("application/json"), br#"{"message":"Hello World"}"#)
            .await
            .unwrap();
        assert_eq!(payload.as_json(), Some(&json!({"message": "Hello World"})));

        let message: Message = payload.into_data().unwrap();
        assert_eq!(message, Message { message: "Hello World".to_string() });
    }

    #[tokio::test]
    async fn test_decode_malformed_json_fails() {
        let err = decode(Some("application/json"), b"{not json").await.unwrap_err();
        assert!(matches!(err, AbraError::Json(_)));

        let err = decode(Some("application/json"), b"").await.unwrap_err();
        assert!(matches!(err, AbraError::Json(_)));
    }

    #[tokio::test]
    async fn test_decode_text() {
        let payload = decode(Some("text/plain; charset=utf-8"), b"Bonjour le monde")
            .await
            .unwrap();
        assert_eq!(payload.kind(), ContentKind::Text);
        assert_eq!(payload.as_text(), Some("Bonjour le monde"));

        let text: String = payload.into_data().unwrap();
        assert_eq!(text, "Bonjour le monde");
    }

    #[tokio::test]
    async fn test_decode_xml_as_text() {
        let payload = decode(Some("application/xml"), b"<a>1</a>").await.unwrap();
        assert_eq!(payload.as_text(), Some("<a>1</a>"));
    }

    #[tokio::test]
    async fn test_decode_urlencoded_form() {
        let payload = decode(Some("application/x-www-form-urlencoded"), b"a=val_a&b=val_b")
            .await
            .unwrap();
        let form = payload.as_form().unwrap();
        assert_eq!(form.get("b").map(|field| field.value_str()).as_deref(), Some("val_b"));

        let map: std::collections::BTreeMap<String, String> = payload.into_data().unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("val_a"));
    }

    #[tokio::test]
    async fn test_decode_multipart_form() {
        let body = b"--b1\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nval_a\r\n--b1--\r\n";
        let payload = decode(Some("multipart/form-data; boundary=b1"), body)
            .await
            .unwrap();
        let form = payload.as_form().unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("a").map(|field| field.value_str()).as_deref(), Some("val_a"));
    }

    #[tokio::test]
    async fn test_decode_multipart_without_boundary_fails() {
        let err = decode(Some("multipart/form-data"), b"whatever").await.unwrap_err();
        assert!(matches!(err, AbraError::Multipart(multer::Error::NoBoundary)));
    }

    #[tokio::test]
    async fn test_decode_missing_content_type_as_binary() {
        let payload = decode(None, br#"{"message":"Hello World"}"#).await.unwrap();
        assert_eq!(payload.kind(), ContentKind::Binary);
        assert_eq!(
            payload.as_bytes().map(|bytes| bytes.as_ref()),
            Some(br#"{"message":"Hello World"}"#.as_slice())
        );

        let raw: Vec<u8> = payload.into_data().unwrap();
        assert_eq!(raw, br#"{"message":"Hello World"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_decode_empty_bodies() {
        let text = decode(Some("text/plain"), b"").await.unwrap();
        assert_eq!(text, Payload::Text(String::new()));

        let binary = decode(None, b"").await.unwrap();
        assert_eq!(binary, Payload::Binary(Bytes::new()));
    }
}
