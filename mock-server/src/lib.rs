//! In-memory emulation of the provider's Outgoing Caller IDs API.
//!
//! Serves the `2010-04-01` resource paths with JSON responses and
//! form-encoded POST bodies. Verification requests register the number
//! immediately, as if the callee had entered the code.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const API_VERSION: &str = "2010-04-01";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const MAX_FRIENDLY_NAME_LEN: usize = 64;
pub const MAX_CALL_DELAY: i32 = 60;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerId {
    pub sid: String,
    pub account_sid: String,
    pub friendly_name: String,
    pub phone_number: String,
    pub uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub account_sid: String,
    pub phone_number: String,
    pub friendly_name: String,
    pub validation_code: String,
    pub call_sid: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallerIdPage {
    pub outgoing_caller_ids: Vec<CallerId>,
    pub page: u32,
    pub page_size: u32,
    pub num_pages: u32,
    pub total: u32,
    pub start: u32,
    pub end: u32,
    pub uri: String,
    pub first_page_uri: String,
    pub next_page_uri: Option<String>,
    pub previous_page_uri: Option<String>,
    pub last_page_uri: String,
}

/// Provider-style error payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderError {
    pub code: u32,
    pub message: String,
    pub status: u16,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(rename = "PhoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "FriendlyName")]
    pub friendly_name: Option<String>,
    #[serde(rename = "Page")]
    pub page: Option<u32>,
    #[serde(rename = "PageSize")]
    pub page_size: Option<u32>,
}

#[derive(Deserialize)]
pub struct CreateParams {
    #[serde(rename = "PhoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "FriendlyName")]
    pub friendly_name: Option<String>,
    #[serde(rename = "CallDelay")]
    pub call_delay: Option<i32>,
    #[serde(rename = "Extension")]
    pub extension: Option<String>,
    #[serde(rename = "StatusCallback")]
    pub status_callback: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameParams {
    #[serde(rename = "FriendlyName")]
    pub friendly_name: Option<String>,
}

/// Caller IDs per account, newest first.
pub type Db = Arc<RwLock<HashMap<String, Vec<CallerId>>>>;

type ApiResult<T> = Result<Json<T>, ApiFailure>;

pub struct ApiFailure(StatusCode, ProviderError);

impl ApiFailure {
    fn bad_request(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    fn not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            20404,
            format!("The requested resource {path} was not found"),
        )
    }

    fn new(status: StatusCode, code: u32, message: impl Into<String>) -> Self {
        Self(
            status,
            ProviderError {
                code,
                message: message.into(),
                status: status.as_u16(),
            },
        )
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(
            "/2010-04-01/Accounts/{account_sid}/OutgoingCallerIds.json",
            get(list_caller_ids).post(create_caller_id),
        )
        .route(
            "/2010-04-01/Accounts/{account_sid}/OutgoingCallerIds/{file}",
            get(get_caller_id).post(rename_caller_id).delete(delete_caller_id),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn list_uri(account_sid: &str) -> String {
    format!("/{API_VERSION}/Accounts/{account_sid}/OutgoingCallerIds.json")
}

fn instance_uri(account_sid: &str, sid: &str) -> String {
    format!("/{API_VERSION}/Accounts/{account_sid}/OutgoingCallerIds/{sid}.json")
}

fn page_uri(account_sid: &str, page: u32, page_size: u32) -> String {
    format!("{}?Page={page}&PageSize={page_size}", list_uri(account_sid))
}

/// Instance paths end in `{sid}.json`.
fn sid_from_file<'a>(account_sid: &str, file: &'a str) -> Result<&'a str, ApiFailure> {
    file.strip_suffix(".json")
        .filter(|sid| !sid.is_empty())
        .ok_or_else(|| ApiFailure::not_found(&format!("{}/{file}", list_uri(account_sid))))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn list_caller_ids(
    State(db): State<Db>,
    Path(account_sid): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<CallerIdPage> {
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ApiFailure::bad_request(
            20001,
            format!("PageSize must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }
    let page = params.page.unwrap_or(0);
    let phone_number = present(params.phone_number);
    let friendly_name = present(params.friendly_name);

    let accounts = db.read().await;
    let matching: Vec<&CallerId> = accounts
        .get(&account_sid)
        .map(|ids| {
            ids.iter()
                .filter(|c| phone_number.as_ref().map_or(true, |p| &c.phone_number == p))
                .filter(|c| friendly_name.as_ref().map_or(true, |n| &c.friendly_name == n))
                .collect()
        })
        .unwrap_or_default();

    let total = matching.len() as u32;
    let num_pages = total.div_ceil(page_size).max(1);
    let start = page.saturating_mul(page_size);
    let outgoing_caller_ids: Vec<CallerId> = matching
        .into_iter()
        .skip(start as usize)
        .take(page_size as usize)
        .cloned()
        .collect();
    let end = (start + outgoing_caller_ids.len() as u32).saturating_sub(1).max(start);

    Ok(Json(CallerIdPage {
        page,
        page_size,
        num_pages,
        total,
        start,
        end,
        uri: page_uri(&account_sid, page, page_size),
        first_page_uri: page_uri(&account_sid, 0, page_size),
        next_page_uri: (page.saturating_add(1) < num_pages).then(|| page_uri(&account_sid, page + 1, page_size)),
        previous_page_uri: (page > 0).then(|| page_uri(&account_sid, page - 1, page_size)),
        last_page_uri: page_uri(&account_sid, num_pages - 1, page_size),
        outgoing_caller_ids,
    }))
}

async fn create_caller_id(
    State(db): State<Db>,
    Path(account_sid): Path<String>,
    Form(params): Form<CreateParams>,
) -> ApiResult<ValidationRequest> {
    let phone_number = present(params.phone_number)
        .ok_or_else(|| ApiFailure::bad_request(21201, "No 'PhoneNumber' number is specified"))?;
    if let Some(delay) = params.call_delay {
        if !(0..=MAX_CALL_DELAY).contains(&delay) {
            return Err(ApiFailure::bad_request(
                21208,
                format!("CallDelay must be between 0 and {MAX_CALL_DELAY}"),
            ));
        }
    }
    let friendly_name = present(params.friendly_name).unwrap_or_else(|| phone_number.clone());
    if friendly_name.chars().count() > MAX_FRIENDLY_NAME_LEN {
        return Err(ApiFailure::bad_request(
            21209,
            format!("FriendlyName must be at most {MAX_FRIENDLY_NAME_LEN} characters"),
        ));
    }

    let mut accounts = db.write().await;
    let ids = accounts.entry(account_sid.clone()).or_default();
    if ids.iter().any(|c| c.phone_number == phone_number) {
        return Err(ApiFailure::bad_request(21450, "Phone number is already verified"));
    }

    let sid = format!("PN{}", Uuid::new_v4().simple());
    ids.insert(
        0,
        CallerId {
            uri: instance_uri(&account_sid, &sid),
            sid,
            account_sid: account_sid.clone(),
            friendly_name: friendly_name.clone(),
            phone_number: phone_number.clone(),
        },
    );
    info!(
        %account_sid,
        %phone_number,
        extension = params.extension.as_deref(),
        status_callback = params.status_callback.as_deref(),
        "registered caller id"
    );

    let code = Uuid::new_v4().as_u128() % 1_000_000;
    Ok(Json(ValidationRequest {
        account_sid,
        phone_number,
        friendly_name,
        validation_code: format!("{code:06}"),
        call_sid: format!("CA{}", Uuid::new_v4().simple()),
    }))
}

async fn get_caller_id(
    State(db): State<Db>,
    Path((account_sid, file)): Path<(String, String)>,
) -> ApiResult<CallerId> {
    let sid = sid_from_file(&account_sid, &file)?;
    let accounts = db.read().await;
    accounts
        .get(&account_sid)
        .and_then(|ids| ids.iter().find(|c| c.sid == sid))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found(&instance_uri(&account_sid, sid)))
}

async fn rename_caller_id(
    State(db): State<Db>,
    Path((account_sid, file)): Path<(String, String)>,
    Form(params): Form<RenameParams>,
) -> ApiResult<CallerId> {
    let sid = sid_from_file(&account_sid, &file)?;
    let friendly_name = present(params.friendly_name)
        .ok_or_else(|| ApiFailure::bad_request(20001, "FriendlyName is required"))?;
    if friendly_name.chars().count() > MAX_FRIENDLY_NAME_LEN {
        return Err(ApiFailure::bad_request(
            21209,
            format!("FriendlyName must be at most {MAX_FRIENDLY_NAME_LEN} characters"),
        ));
    }

    let mut accounts = db.write().await;
    let caller_id = accounts
        .get_mut(&account_sid)
        .and_then(|ids| ids.iter_mut().find(|c| c.sid == sid))
        .ok_or_else(|| ApiFailure::not_found(&instance_uri(&account_sid, sid)))?;
    caller_id.friendly_name = friendly_name;
    info!(%account_sid, %sid, "renamed caller id");
    Ok(Json(caller_id.clone()))
}

async fn delete_caller_id(
    State(db): State<Db>,
    Path((account_sid, file)): Path<(String, String)>,
) -> Result<StatusCode, ApiFailure> {
    let sid = sid_from_file(&account_sid, &file)?;
    let mut accounts = db.write().await;
    let ids = accounts
        .get_mut(&account_sid)
        .ok_or_else(|| ApiFailure::not_found(&instance_uri(&account_sid, sid)))?;
    let before = ids.len();
    ids.retain(|c| c.sid != sid);
    if ids.len() == before {
        return Err(ApiFailure::not_found(&instance_uri(&account_sid, sid)));
    }
    info!(%account_sid, %sid, "deleted caller id");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_id_serializes_to_provider_json() {
        let caller_id = CallerId {
            sid: "PN1".to_string(),
            account_sid: "AC1".to_string(),
            friendly_name: "Office".to_string(),
            phone_number: "+16175551212".to_string(),
            uri: instance_uri("AC1", "PN1"),
        };
        let json = serde_json::to_value(&caller_id).unwrap();
        assert_eq!(json["sid"], "PN1");
        assert_eq!(json["friendly_name"], "Office");
        assert_eq!(json["uri"], "/2010-04-01/Accounts/AC1/OutgoingCallerIds/PN1.json");
    }

    #[test]
    fn create_params_use_provider_names() {
        let params: CreateParams = serde_json::from_str(
            r#"{"PhoneNumber":"+16175551212","CallDelay":5,"StatusCallback":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(params.phone_number.as_deref(), Some("+16175551212"));
        assert_eq!(params.call_delay, Some(5));
        assert!(params.friendly_name.is_none());
        assert!(params.extension.is_none());
    }

    #[test]
    fn list_params_all_optional() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert!(params.phone_number.is_none());
        assert!(params.page.is_none());
        assert!(params.page_size.is_none());
    }

    #[test]
    fn sid_from_file_requires_json_suffix() {
        assert_eq!(sid_from_file("AC1", "PN1.json").ok(), Some("PN1"));
        assert!(sid_from_file("AC1", "PN1").is_err());
        assert!(sid_from_file("AC1", ".json").is_err());
    }

    #[test]
    fn page_uri_carries_paging() {
        assert_eq!(
            page_uri("AC1", 2, 10),
            "/2010-04-01/Accounts/AC1/OutgoingCallerIds.json?Page=2&PageSize=10"
        );
    }
}
