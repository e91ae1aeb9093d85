//! Stateless request builder and response parser for the Outgoing Caller IDs
//! resource.
//!
//! # Design
//! `CallerIdClient` holds no state at all. Each operation is split into a
//! `build_*` method that validates arguments and produces an `HttpRequest`
//! descriptor, and a `parse_*` method that consumes an `HttpResponse`. The
//! caller (or `CallerIdResourceClient`) performs the round-trip in between,
//! keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CallerIdListPage, CallerIdRecord, DeleteStatus, ListCallerIdsOptions, VerificationOptions,
    VerificationRequest, MAX_CALL_DELAY, MAX_FRIENDLY_NAME_LEN, MIN_CALL_DELAY,
};

/// Instance resource: a single caller ID.
pub const INSTANCE_RESOURCE: &str = "Accounts/{AccountSid}/OutgoingCallerIds/{OutgoingCallerIdSid}.json";

/// List resource: all caller IDs of the account.
pub const LIST_RESOURCE: &str = "Accounts/{AccountSid}/OutgoingCallerIds.json";

pub const OUTGOING_CALLER_ID_SID: &str = "OutgoingCallerIdSid";
pub const PHONE_NUMBER: &str = "PhoneNumber";
pub const FRIENDLY_NAME: &str = "FriendlyName";
pub const PAGE: &str = "Page";
pub const PAGE_SIZE: &str = "PageSize";
pub const CALL_DELAY: &str = "CallDelay";
pub const EXTENSION: &str = "Extension";
pub const STATUS_CALLBACK: &str = "StatusCallback";

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerIdClient;

impl CallerIdClient {
    pub fn new() -> Self {
        Self
    }

    /// GET one caller ID. The identifier is only checked when the executor
    /// resolves the template.
    pub fn build_get_caller_id(&self, sid: &str) -> HttpRequest {
        let req = HttpRequest::new(HttpMethod::Get, INSTANCE_RESOURCE).with_segment(OUTGOING_CALLER_ID_SID, sid);
        debug!(method = %req.method, resource = %req.resource, "built get caller id request");
        req
    }

    pub fn build_list_caller_ids(&self, options: &ListCallerIdsOptions) -> HttpRequest {
        let req = HttpRequest::new(HttpMethod::Get, LIST_RESOURCE)
            .with_optional_field(PHONE_NUMBER, non_empty(&options.phone_number))
            .with_optional_field(FRIENDLY_NAME, non_empty(&options.friendly_name))
            .with_optional_field(PAGE, options.page)
            .with_optional_field(PAGE_SIZE, options.page_size);
        debug!(
            method = %req.method,
            resource = %req.resource,
            fields = req.fields().count(),
            "built list caller ids request"
        );
        req
    }

    /// POST a new caller ID for verification.
    ///
    /// `friendly_name` length is left to the provider here, unlike
    /// `build_rename_caller_id`.
    pub fn build_request_verification(&self, options: &VerificationOptions) -> Result<HttpRequest, ApiError> {
        require(PHONE_NUMBER, &options.phone_number)?;
        if let Some(delay) = options.call_delay {
            check_range(CALL_DELAY, i64::from(delay), i64::from(MIN_CALL_DELAY), i64::from(MAX_CALL_DELAY))?;
        }

        let req = HttpRequest::new(HttpMethod::Post, LIST_RESOURCE)
            .with_field(PHONE_NUMBER, &options.phone_number)
            .with_optional_field(FRIENDLY_NAME, non_empty(&options.friendly_name))
            .with_optional_field(CALL_DELAY, options.call_delay)
            .with_optional_field(EXTENSION, non_empty(&options.extension))
            .with_optional_field(STATUS_CALLBACK, non_empty(&options.status_callback));
        debug!(method = %req.method, resource = %req.resource, "built verification request");
        Ok(req)
    }

    pub fn build_rename_caller_id(&self, sid: &str, friendly_name: &str) -> Result<HttpRequest, ApiError> {
        require(OUTGOING_CALLER_ID_SID, sid)?;
        require(FRIENDLY_NAME, friendly_name)?;
        let len = friendly_name.chars().count();
        check_range(FRIENDLY_NAME, len as i64, 0, MAX_FRIENDLY_NAME_LEN as i64)?;

        let req = HttpRequest::new(HttpMethod::Post, INSTANCE_RESOURCE)
            .with_segment(OUTGOING_CALLER_ID_SID, sid)
            .with_field(FRIENDLY_NAME, friendly_name);
        debug!(method = %req.method, resource = %req.resource, "built rename caller id request");
        Ok(req)
    }

    pub fn build_delete_caller_id(&self, sid: &str) -> Result<HttpRequest, ApiError> {
        require(OUTGOING_CALLER_ID_SID, sid)?;
        let req = HttpRequest::new(HttpMethod::Delete, INSTANCE_RESOURCE).with_segment(OUTGOING_CALLER_ID_SID, sid);
        debug!(method = %req.method, resource = %req.resource, "built delete caller id request");
        Ok(req)
    }

    pub fn parse_get_caller_id(&self, response: HttpResponse) -> Result<CallerIdRecord, ApiError> {
        decode(response)
    }

    pub fn parse_list_caller_ids(&self, response: HttpResponse) -> Result<CallerIdListPage, ApiError> {
        decode(response)
    }

    pub fn parse_request_verification(&self, response: HttpResponse) -> Result<VerificationRequest, ApiError> {
        decode(response)
    }

    pub fn parse_rename_caller_id(&self, response: HttpResponse) -> Result<CallerIdRecord, ApiError> {
        decode(response)
    }

    /// Collapse the status into a two-valued outcome. Never fails.
    pub fn parse_delete_caller_id(&self, response: HttpResponse) -> DeleteStatus {
        let status = DeleteStatus::from_status(response.status);
        if status == DeleteStatus::Failed {
            warn!(status = response.status, "delete caller id did not return 204");
        }
        status
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require(name: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::MissingArgument(name.to_string()));
    }
    Ok(())
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ApiError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ApiError::OutOfRange { name, value, min, max })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        400 | 422 => Err(ApiError::Validation {
            status: response.status,
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    debug!(status = response.status, "parsing response body");
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ParameterKind;

    const RECORD: &str = r#"{"sid":"PN1","account_sid":"AC1","friendly_name":"Office","phone_number":"+16175551212"}"#;

    fn client() -> CallerIdClient {
        CallerIdClient::new()
    }

    fn assert_missing(err: ApiError, expected: &str) {
        match err {
            ApiError::MissingArgument(name) => assert_eq!(name, expected),
            other => panic!("expected MissingArgument({expected}), got {other:?}"),
        }
    }

    #[test]
    fn build_get_caller_id_substitutes_single_segment() {
        let req = client().build_get_caller_id("PN123");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.resource, INSTANCE_RESOURCE);
        assert_eq!(req.parameters.len(), 1);
        assert_eq!(req.parameters[0].kind, ParameterKind::UrlSegment);
        assert_eq!(req.segment(OUTGOING_CALLER_ID_SID), Some("PN123"));
    }

    #[test]
    fn build_list_without_options_has_no_fields() {
        let req = client().build_list_caller_ids(&ListCallerIdsOptions::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.resource, LIST_RESOURCE);
        assert!(req.parameters.is_empty());
    }

    #[test]
    fn build_list_sends_only_present_fields() {
        let options = ListCallerIdsOptions::default()
            .phone_number("+16175551212")
            .page(2)
            .page_size(50);
        let req = client().build_list_caller_ids(&options);
        let fields: Vec<(&str, &str)> = req.fields().map(|p| (p.name, p.value.as_str())).collect();
        assert_eq!(
            fields,
            vec![(PHONE_NUMBER, "+16175551212"), (PAGE, "2"), (PAGE_SIZE, "50")]
        );
        assert_eq!(req.field(FRIENDLY_NAME), None);
    }

    #[test]
    fn build_list_treats_empty_filters_as_absent() {
        let options = ListCallerIdsOptions::default().phone_number("").friendly_name("");
        let req = client().build_list_caller_ids(&options);
        assert!(req.parameters.is_empty());
    }

    #[test]
    fn build_list_passes_oversized_page_size_through() {
        let req = client().build_list_caller_ids(&ListCallerIdsOptions::default().page_size(5000));
        assert_eq!(req.field(PAGE_SIZE), Some("5000"));
    }

    #[test]
    fn build_verification_requires_phone_number() {
        let variants = [
            VerificationOptions::new(""),
            VerificationOptions::new("").friendly_name("Office"),
            VerificationOptions::new("").call_delay(10),
            VerificationOptions::new("").call_delay(99),
            VerificationOptions::new("").extension("12").status_callback("https://example.com/cb"),
        ];
        for options in variants {
            let err = client().build_request_verification(&options).unwrap_err();
            assert_missing(err, PHONE_NUMBER);
        }
    }

    #[test]
    fn build_verification_call_delay_bounds() {
        for delay in [61, -1] {
            let err = client()
                .build_request_verification(&VerificationOptions::new("+16175551212").call_delay(delay))
                .unwrap_err();
            assert!(
                matches!(err, ApiError::OutOfRange { name: CALL_DELAY, value, min: 0, max: 60 } if value == i64::from(delay))
            );
        }
        for delay in [0, 60] {
            let req = client()
                .build_request_verification(&VerificationOptions::new("+16175551212").call_delay(delay))
                .unwrap();
            assert_eq!(req.field(CALL_DELAY), Some(delay.to_string().as_str()));
        }
    }

    #[test]
    fn build_verification_populates_fields_in_order() {
        let options = VerificationOptions::new("+16175551212")
            .friendly_name("Office")
            .call_delay(5)
            .extension("1234")
            .status_callback("https://example.com/cb");
        let req = client().build_request_verification(&options).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.resource, LIST_RESOURCE);
        let names: Vec<&str> = req.fields().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![PHONE_NUMBER, FRIENDLY_NAME, CALL_DELAY, EXTENSION, STATUS_CALLBACK]
        );
        assert_eq!(req.field(STATUS_CALLBACK), Some("https://example.com/cb"));
    }

    #[test]
    fn build_verification_does_not_check_friendly_name_length() {
        let long_name = "n".repeat(100);
        let req = client()
            .build_request_verification(&VerificationOptions::new("+16175551212").friendly_name(long_name.clone()))
            .unwrap();
        assert_eq!(req.field(FRIENDLY_NAME), Some(long_name.as_str()));
    }

    #[test]
    fn build_rename_checks_arguments() {
        assert_missing(client().build_rename_caller_id("", "Office").unwrap_err(), OUTGOING_CALLER_ID_SID);
        assert_missing(client().build_rename_caller_id("PN1", "").unwrap_err(), FRIENDLY_NAME);
    }

    #[test]
    fn build_rename_friendly_name_length_boundary() {
        let err = client().build_rename_caller_id("CAxxx", &"a".repeat(65)).unwrap_err();
        assert!(matches!(err, ApiError::OutOfRange { name: FRIENDLY_NAME, value: 65, .. }));

        let req = client().build_rename_caller_id("CAxxx", &"a".repeat(64)).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.resource, INSTANCE_RESOURCE);
        assert_eq!(req.segment(OUTGOING_CALLER_ID_SID), Some("CAxxx"));
        assert_eq!(req.field(FRIENDLY_NAME).map(str::len), Some(64));
    }

    #[test]
    fn build_rename_counts_characters_not_bytes() {
        // 64 two-byte characters
        let name = "é".repeat(64);
        assert!(client().build_rename_caller_id("PN1", &name).is_ok());
    }

    #[test]
    fn build_delete_caller_id_produces_correct_request() {
        let req = client().build_delete_caller_id("PN1").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.resource, INSTANCE_RESOURCE);
        assert_eq!(req.segment(OUTGOING_CALLER_ID_SID), Some("PN1"));
        assert_missing(client().build_delete_caller_id("").unwrap_err(), OUTGOING_CALLER_ID_SID);
    }

    #[test]
    fn parse_get_caller_id_success() {
        let record = client().parse_get_caller_id(HttpResponse::new(200, RECORD)).unwrap();
        assert_eq!(record.sid, "PN1");
        assert_eq!(record.friendly_name, "Office");
    }

    #[test]
    fn parse_get_caller_id_not_found() {
        let err = client().parse_get_caller_id(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_verification_rejected_by_provider() {
        let body = r#"{"code":21212,"message":"Invalid phone number","status":400}"#;
        let err = client().parse_request_verification(HttpResponse::new(400, body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation { status: 400, body: ref b } if b == body));
    }

    #[test]
    fn parse_rename_server_error() {
        let err = client()
            .parse_rename_caller_id(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list_caller_ids(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_delete_collapses_status() {
        assert_eq!(
            client().parse_delete_caller_id(HttpResponse::new(204, "")),
            DeleteStatus::Succeeded
        );
        for status in [200, 404, 500] {
            assert_eq!(
                client().parse_delete_caller_id(HttpResponse::new(status, "")),
                DeleteStatus::Failed
            );
        }
    }
}
