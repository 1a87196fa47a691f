use std::convert::Infallible;

use bytes::Bytes;
use futures::stream;
use multer::Multipart;
use serde::de::DeserializeOwned;

use crate::error::AbraError;

/// 表单中的单个字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    /// multipart 文件字段的文件名
    pub filename: Option<String>,
    /// multipart 字段自带的内容类型
    pub content_type: Option<String>,
    pub value: Bytes,
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            value: Bytes::from(value.into()),
        }
    }

    /// 以 UTF-8 文本读取字段值（非法字节会被替换）
    pub fn value_str(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// 结构化表单数据，保持字段出现的顺序，允许重名字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub fields: Vec<FormField>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, field: FormField) {
        self.fields.push(field);
    }

    /// 第一个同名字段
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// 所有同名字段
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormField> + 'a {
        self.fields.iter().filter(move |field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 解析 `application/x-www-form-urlencoded` 响应体
    pub fn parse_urlencoded(body: &[u8]) -> Result<Self, AbraError> {
        let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)?;
        Ok(Self {
            fields: pairs
                .into_iter()
                .map(|(name, value)| FormField::text(name, value))
                .collect(),
        })
    }

    /// 解析 `multipart/form-data` 响应体
    ///
    /// 没有 `name` 的部分不属于表单字段，会被跳过。
    pub async fn parse_multipart(body: Bytes, boundary: &str) -> Result<Self, AbraError> {
        let body = stream::once(async move { Ok::<_, Infallible>(body) });
        let mut multipart = Multipart::new(body, boundary);

        let mut form = FormData::new();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                log::debug!("Skipping multipart part without a name");
                continue;
            };
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            let value = field.bytes().await?;

            form.append(FormField {
                name,
                filename,
                content_type,
                value,
            });
        }
        Ok(form)
    }

    /// 反序列化为指定类型
    ///
    /// 字段值按文本处理，经过 urlencoded 往返后交给 `serde_urlencoded`，
    /// 因此数字、布尔值等字段可以直接映射到结构体。
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, AbraError> {
        let pairs: Vec<(&str, String)> = self
            .fields
            .iter()
            .map(|field| (field.name.as_str(), field.value_str()))
            .collect();
        let encoded = serde_urlencoded::to_string(&pairs)?;
        Ok(serde_urlencoded::from_str(&encoded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const MULTIPART: &str = "--XyZ\r\n\
        Content-Disposition: form-data; name=\"a\"\r\n\
        \r\n\
        val_a\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        hello\r\nworld\r\n\
        --XyZ--\r\n";

    #[test]
    fn test_parse_urlencoded() {
        let form = FormData::parse_urlencoded(b"a=val_a&b=Hello+World&a=again").unwrap();
        assert_eq!(form.len(), 3);
        assert_eq!(form.get("a").map(FormField::value_str).as_deref(), Some("val_a"));
        assert_eq!(form.get("b").map(FormField::value_str).as_deref(), Some("Hello World"));
        assert_eq!(form.get_all("a").count(), 2);
    }

    #[tokio::test]
    async fn test_parse_multipart() {
        let form = FormData::parse_multipart(Bytes::from_static(MULTIPART.as_bytes()), "XyZ")
            .await
            .unwrap();
        assert_eq!(form.len(), 2);

        let a = form.get("a").unwrap();
        assert_eq!(a.value_str(), "val_a");
        assert_eq!(a.filename, None);

        let file = form.get("file").unwrap();
        assert_eq!(file.filename.as_deref(), Some("hello.txt"));
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(file.value.as_ref(), b"hello\r\nworld");
    }

    #[tokio::test]
    async fn test_parse_multipart_keeps_repeated_fields() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"tag\"\r\n\r\none\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"tag\"\r\n\r\ntwo\r\n\
            --XyZ--\r\n";
        let form = FormData::parse_multipart(Bytes::from_static(body.as_bytes()), "XyZ")
            .await
            .unwrap();

        let tags: Vec<String> = form.get_all("tag").map(FormField::value_str).collect();
        assert_eq!(tags, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_parse_multipart_rejects_truncated_body() {
        let body = "--XyZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nval_a";
        let err = FormData::parse_multipart(Bytes::from_static(body.as_bytes()), "XyZ")
            .await
            .unwrap_err();
        assert!(matches!(err, AbraError::Multipart(_)));
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Fields {
            id: u32,
            a: String,
        }

        let form = FormData::parse_urlencoded(b"id=1&a=val_a").unwrap();
        let fields: Fields = form.deserialize().unwrap();
        assert_eq!(fields, Fields { id: 1, a: "val_a".to_string() });
    }
}
