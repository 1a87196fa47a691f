use std::fmt;

use mime::Mime;

/// HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// 返回HTTP方法的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// 响应内容类型
///
/// 根据 `Content-Type` 头部选择唯一的解码路径，按以下顺序匹配（不区分大小写）：
/// - `application/json` → [`ContentKind::Json`]
/// - `text/*` 或 `application/xml` → [`ContentKind::Text`]
/// - `multipart/form-data` 或 `application/x-www-form-urlencoded` → [`ContentKind::Form`]
/// - 其他或缺失 → [`ContentKind::Binary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Text,
    Form,
    Binary,
}

impl ContentKind {
    /// 根据已解析的 MIME 类型选择解码路径
    pub fn from_mime(content_type: &Mime) -> Self {
        let (type_, subtype) = (content_type.type_(), content_type.subtype());

        if type_ == mime::APPLICATION && subtype == mime::JSON {
            ContentKind::Json
        } else if type_ == mime::TEXT || (type_ == mime::APPLICATION && subtype == mime::XML) {
            ContentKind::Text
        } else if (type_ == mime::MULTIPART && subtype == mime::FORM_DATA)
            || (type_ == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED)
        {
            ContentKind::Form
        } else {
            ContentKind::Binary
        }
    }
}
