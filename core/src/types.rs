//! Domain types for the Outgoing Caller IDs resource.
//!
//! # Design
//! Records mirror the provider's JSON (snake_case wire names) and are only
//! ever produced by deserializing a response; nothing here is mutated
//! locally. Optional arguments for list and create live in option structs
//! with builder-style setters instead of long positional argument lists.

use serde::{Deserialize, Serialize};

/// Longest friendly name the provider accepts, in characters.
pub const MAX_FRIENDLY_NAME_LEN: usize = 64;

/// Inclusive bounds for the verification call delay, in seconds.
pub const MIN_CALL_DELAY: i32 = 0;
pub const MAX_CALL_DELAY: i32 = 60;

/// A validated outgoing caller ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerIdRecord {
    pub sid: String,
    pub account_sid: String,
    pub friendly_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// One page of caller IDs plus the provider's paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerIdListPage {
    #[serde(default)]
    pub outgoing_caller_ids: Vec<CallerIdRecord>,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub num_pages: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub end: Option<u32>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub first_page_uri: Option<String>,
    #[serde(default)]
    pub next_page_uri: Option<String>,
    #[serde(default)]
    pub previous_page_uri: Option<String>,
    #[serde(default)]
    pub last_page_uri: Option<String>,
}

impl CallerIdListPage {
    pub fn has_next_page(&self) -> bool {
        self.next_page_uri.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        self.previous_page_uri.is_some()
    }
}

/// Returned when a new caller ID registration is initiated. The callee must
/// key in `validation_code` during the provider's verification call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationRequest {
    #[serde(default)]
    pub account_sid: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    pub validation_code: String,
    #[serde(default)]
    pub call_sid: Option<String>,
}

/// Outcome of a delete. Only `204 No Content` counts as `Succeeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Succeeded,
    Failed,
}

impl DeleteStatus {
    pub fn from_status(status: u16) -> Self {
        if status == 204 {
            DeleteStatus::Succeeded
        } else {
            DeleteStatus::Failed
        }
    }

    pub fn is_success(self) -> bool {
        self == DeleteStatus::Succeeded
    }
}

/// Filters and paging for listing caller IDs. Every field is optional and
/// only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCallerIdsOptions {
    pub phone_number: Option<String>,
    pub friendly_name: Option<String>,
    /// Zero-based page index; provider default is the first page.
    pub page: Option<u32>,
    /// Provider default is 50 and the provider caps it at 1000.
    pub page_size: Option<u32>,
}

impl ListCallerIdsOptions {
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Arguments for starting a caller ID verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOptions {
    /// E.164 (`+16175551212`) or a locally formatted number. Required.
    pub phone_number: String,
    /// Defaults provider-side to a formatted version of the number.
    pub friendly_name: Option<String>,
    /// Seconds to wait before placing the call, 0 through 60. Defaults to 0.
    pub call_delay: Option<i32>,
    /// Digits to dial once the verification call connects.
    pub extension: Option<String>,
    /// URL the provider calls with the verification outcome.
    pub status_callback: Option<String>,
}

impl VerificationOptions {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            ..Self::default()
        }
    }

    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    pub fn call_delay(mut self, seconds: i32) -> Self {
        self.call_delay = Some(seconds);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn status_callback(mut self, url: impl Into<String>) -> Self {
        self.status_callback = Some(url.into());
        self
    }
}
