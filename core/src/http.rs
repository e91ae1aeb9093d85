//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! `HttpRequest` is a declarative descriptor: a method, a resource path
//! template such as `Accounts/{AccountSid}/OutgoingCallerIds.json`, and a
//! list of named parameters tagged as either path segments or fields. The
//! core never touches the network. Executors hold an `AccountContext` and
//! call `AccountContext::render` to turn a descriptor into a concrete URL and
//! body, so the wire shape is still decided here and not by each transport.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

use crate::error::ApiError;

/// Versioned root of the provider's REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Placeholder bound from the executor's account context rather than from
/// request parameters.
pub const ACCOUNT_SID_PLACEHOLDER: &str = "AccountSid";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Characters left unescaped in a path segment (RFC 3986 unreserved set).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter ends up on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Substituted into a `{Name}` placeholder of the resource template.
    UrlSegment,
    /// Query string for GET/DELETE, form body for POST.
    Field,
}

/// A named request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub value: String,
    pub kind: ParameterKind,
}

/// An HTTP request described as plain data.
///
/// Built by `CallerIdClient::build_*` methods. `{AccountSid}` stays
/// unresolved in `resource`; it belongs to the executor's account context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub resource: String,
    pub parameters: Vec<Parameter>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, resource: &str) -> Self {
        Self {
            method,
            resource: resource.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn with_segment(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name,
            value: value.into(),
            kind: ParameterKind::UrlSegment,
        });
        self
    }

    pub fn with_field(mut self, name: &'static str, value: impl ToString) -> Self {
        self.parameters.push(Parameter {
            name,
            value: value.to_string(),
            kind: ParameterKind::Field,
        });
        self
    }

    /// Adds a field only when `value` is present.
    pub fn with_optional_field<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with_field(name, value),
            None => self,
        }
    }

    /// Value of the url-segment parameter `name`, if any.
    pub fn segment(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::UrlSegment && p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Value of the field parameter `name`, if any.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::Field && p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.kind == ParameterKind::Field)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the executor after performing the request, then passed to
/// `CallerIdClient::parse_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A fully resolved request, ready for any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Account-scoped configuration held by an executor.
///
/// Every resource path is rooted at the account, so the SID is bound here
/// once instead of being threaded through each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account_sid: String,
    base_url: String,
}

impl AccountContext {
    pub fn new(account_sid: &str) -> Self {
        Self::with_base_url(account_sid, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(account_sid: &str, base_url: &str) -> Self {
        Self {
            account_sid: account_sid.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the resource template and encode field parameters.
    ///
    /// Fails with `ApiError::MissingArgument` when a placeholder has no
    /// matching segment parameter or its value is empty.
    pub fn render(&self, request: &HttpRequest) -> Result<RenderedRequest, ApiError> {
        let path = self.resolve_template(request)?;
        let mut url = format!("{}/{}", self.base_url, path);
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];

        let encoded = encode_fields(request);
        let body = match request.method {
            HttpMethod::Post => {
                headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(encoded)
            }
            HttpMethod::Get | HttpMethod::Delete => {
                if !encoded.is_empty() {
                    url.push('?');
                    url.push_str(&encoded);
                }
                None
            }
        };

        Ok(RenderedRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    fn resolve_template(&self, request: &HttpRequest) -> Result<String, ApiError> {
        let mut out = String::with_capacity(request.resource.len() + 32);
        let mut rest = request.resource.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            out.push_str(&rest[..open]);
            let name = &rest[open + 1..close];
            let value = if name == ACCOUNT_SID_PLACEHOLDER {
                Some(self.account_sid.as_str())
            } else {
                request.segment(name)
            };
            match value {
                Some(v) if !v.is_empty() => {
                    out.extend(utf8_percent_encode(v, SEGMENT));
                }
                _ => return Err(ApiError::MissingArgument(name.to_string())),
            }
            rest = &rest[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn encode_fields(request: &HttpRequest) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for param in request.fields() {
        serializer.append_pair(param.name, &param.value);
    }
    serializer.finish()
}
