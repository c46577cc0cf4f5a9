//! CRUD verbs over [`ApiClient::fetch`].
//!
//! Each helper keeps the caller's headers and overrides only the method
//! (and the body, for `create`/`update`). Resource names and ids are not
//! validated; a bad one comes back as a backend error.

use wreq::Method;

use crate::error::ApiError;
use crate::fetch::{ApiClient, RequestBody, RequestOptions, ResponseBody};

pub fn item_path(resource: &str, id: &str) -> String {
    format!("{resource}/{id}")
}

impl ApiClient {
    pub async fn list(
        &self,
        resource: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.fetch(resource, RequestOptions { method: Method::GET, ..options })
            .await
    }

    pub async fn one(
        &self,
        resource: &str,
        id: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.fetch(
            &item_path(resource, id),
            RequestOptions { method: Method::GET, ..options },
        )
        .await
    }

    pub async fn create(
        &self,
        resource: &str,
        data: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.fetch(
            resource,
            RequestOptions {
                method: Method::POST,
                body: Some(data.into()),
                ..options
            },
        )
        .await
    }

    pub async fn update(
        &self,
        resource: &str,
        id: &str,
        data: impl Into<RequestBody>,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.fetch(
            &item_path(resource, id),
            RequestOptions {
                method: Method::PUT,
                body: Some(data.into()),
                ..options
            },
        )
        .await
    }

    pub async fn delete(
        &self,
        resource: &str,
        id: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        self.fetch(
            &item_path(resource, id),
            RequestOptions { method: Method::DELETE, ..options },
        )
        .await
    }
}
