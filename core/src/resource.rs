//! Executing client for the Outgoing Caller IDs resource.
//!
//! # Design
//! `CallerIdResourceClient` composes `CallerIdClient::build_*`, one call to
//! the injected `RequestExecutor`, and `CallerIdClient::parse_*`. It holds
//! nothing but the executor, so it is `Send + Sync` whenever the executor is
//! and concurrent calls need no locking. Nothing is retried.

use tracing::instrument;

use crate::client::CallerIdClient;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::types::{
    CallerIdListPage, CallerIdRecord, DeleteStatus, ListCallerIdsOptions, VerificationOptions,
    VerificationRequest,
};

#[derive(Debug, Clone)]
pub struct CallerIdResourceClient<E> {
    requests: CallerIdClient,
    executor: E,
}

impl<E: RequestExecutor> CallerIdResourceClient<E> {
    pub fn new(executor: E) -> Self {
        Self {
            requests: CallerIdClient::new(),
            executor,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Fetch one caller ID by SID.
    #[instrument(skip(self))]
    pub fn get_caller_id(&self, sid: &str) -> Result<CallerIdRecord, ApiError> {
        let req = self.requests.build_get_caller_id(sid);
        let response = self.executor.execute(&req)?;
        self.requests.parse_get_caller_id(response)
    }

    /// First page at the provider's default size, unfiltered.
    pub fn list_all_caller_ids(&self) -> Result<CallerIdListPage, ApiError> {
        self.list_caller_ids(&ListCallerIdsOptions::default())
    }

    #[instrument(skip(self))]
    pub fn list_caller_ids(&self, options: &ListCallerIdsOptions) -> Result<CallerIdListPage, ApiError> {
        let req = self.requests.build_list_caller_ids(options);
        let response = self.executor.execute(&req)?;
        self.requests.parse_list_caller_ids(response)
    }

    /// Start verification of a new caller ID.
    ///
    /// Returns as soon as the provider accepts the request. The provider then
    /// dials the number after `call_delay` seconds; the outcome is reported
    /// only through `status_callback`.
    #[instrument(skip(self))]
    pub fn request_verification(&self, options: &VerificationOptions) -> Result<VerificationRequest, ApiError> {
        let req = self.requests.build_request_verification(options)?;
        let response = self.executor.execute(&req)?;
        self.requests.parse_request_verification(response)
    }

    /// Rename a caller ID. The returned record is the provider's copy.
    #[instrument(skip(self))]
    pub fn rename_caller_id(&self, sid: &str, friendly_name: &str) -> Result<CallerIdRecord, ApiError> {
        let req = self.requests.build_rename_caller_id(sid, friendly_name)?;
        let response = self.executor.execute(&req)?;
        self.requests.parse_rename_caller_id(response)
    }

    /// Delete a caller ID.
    ///
    /// Any received response maps to a `DeleteStatus`; only a missing SID or
    /// an executor failure is an `Err`. Check the returned status.
    #[instrument(skip(self))]
    pub fn delete_caller_id(&self, sid: &str) -> Result<DeleteStatus, ApiError> {
        let req = self.requests.build_delete_caller_id(sid)?;
        let response = self.executor.execute(&req)?;
        Ok(self.requests.parse_delete_caller_id(response))
    }
}
