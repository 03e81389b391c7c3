//! Backend calls and page navigations issued by the catalog UI.
//!
//! Nothing here performs I/O. Each builder returns an [`ApiRequest`]
//! describing the method, path, body and the page to open on success, for a
//! transport layer to execute.

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use crate::domains::{AlbumDraft, AlbumEdit, Credentials, Domain, Registration};
use crate::errors::{HerbariumError, Result};
use crate::fields::{Field, serialize_fields};
use crate::filters::{Filter, search_url};
use crate::form::FormData;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_VIEW_BASE: &str = "/view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RequestBody {
    Empty,
    Multipart(FormData),
    Json(JsonValue),
}

/// One backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Page to open once the call succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: String, body: RequestBody) -> Self {
        Self {
            method,
            path,
            body,
            redirect: None,
        }
    }

    #[inline]
    fn redirect_to(mut self, page: String) -> Self {
        self.redirect = Some(page);
        self
    }
}

/// Path builder rooted at the API and view prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub api_base: String,
    pub view_base: String,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_VIEW_BASE)
    }
}

impl RouteContext {
    pub fn new(api_base: impl Into<String>, view_base: impl Into<String>) -> Self {
        Self {
            api_base: trim_base(api_base.into()),
            view_base: trim_base(view_base.into()),
        }
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    pub fn view(&self, path: &str) -> String {
        format!("{}/{}", self.view_base, path)
    }

    // ========== Plants ==========

    pub fn plant_create(&self, fields: &[Field]) -> Result<ApiRequest> {
        let body = RequestBody::Multipart(serialize_fields(fields)?);
        Ok(ApiRequest::new(Method::Post, self.api("plant/create"), body).redirect_to(self.view("plants")))
    }

    pub fn plant_update(&self, id: Uuid, fields: &[Field]) -> Result<ApiRequest> {
        let body = RequestBody::Multipart(serialize_fields(fields)?);
        Ok(
            ApiRequest::new(Method::Put, self.api(&format!("plant/specification/{id}")), body)
                .redirect_to(self.view(&format!("plant/{id}"))),
        )
    }

    pub fn plant_delete(&self, id: Uuid) -> ApiRequest {
        ApiRequest::new(Method::Delete, self.api(&format!("plant/delete/{id}")), RequestBody::Empty)
            .redirect_to(self.view("plants"))
    }

    // ========== Posts ==========

    pub fn post_create(&self, fields: &[Field]) -> Result<ApiRequest> {
        let body = RequestBody::Multipart(serialize_fields(fields)?);
        Ok(ApiRequest::new(Method::Post, self.api("post/create"), body).redirect_to(self.view("posts")))
    }

    pub fn post_update_text(&self, id: Uuid, fields: &[Field]) -> Result<ApiRequest> {
        let body = RequestBody::Multipart(serialize_fields(fields)?);
        Ok(ApiRequest::new(Method::Put, self.api(&format!("post/text/{id}")), body).redirect_to(self.view("posts")))
    }

    pub fn post_delete(&self, id: Uuid) -> ApiRequest {
        ApiRequest::new(Method::Delete, self.api(&format!("post/delete/{id}")), RequestBody::Empty)
            .redirect_to(self.view("posts"))
    }

    // ========== Albums ==========

    pub fn album_create(&self, draft: &AlbumDraft) -> ApiRequest {
        let body = RequestBody::Multipart(draft.to_form_data());
        ApiRequest::new(Method::Post, self.api("album/create"), body).redirect_to(format!("{}/", self.view("albums")))
    }

    /// Calls that bring an album in line with `edit`: name, description,
    /// one removal per dropped plant, one addition per new plant. The last
    /// call carries the redirect to the album page.
    pub fn album_update(&self, id: Uuid, edit: &AlbumEdit) -> Vec<ApiRequest> {
        let diff = edit.selection_diff();
        let mut requests = Vec::with_capacity(2 + diff.added.len() + diff.removed.len());

        requests.push(ApiRequest::new(
            Method::Put,
            self.api(&format!("album/name/{id}")),
            RequestBody::Json(json!({ "name": edit.name })),
        ));
        requests.push(ApiRequest::new(
            Method::Put,
            self.api(&format!("album/description/{id}")),
            RequestBody::Json(json!({ "description": edit.description })),
        ));
        for plant_id in &diff.removed {
            requests.push(ApiRequest::new(
                Method::Delete,
                self.api(&format!("album/remove/{id}")),
                RequestBody::Json(json!({ "plant_id": plant_id })),
            ));
        }
        for plant_id in &diff.added {
            requests.push(ApiRequest::new(
                Method::Post,
                self.api(&format!("album/add/{id}")),
                RequestBody::Json(json!({ "plant_id": plant_id })),
            ));
        }

        if let Some(last) = requests.pop() {
            requests.push(last.redirect_to(self.view(&format!("album/{id}"))));
        }

        log::debug!(
            "album {id}: {} plants added, {} removed",
            diff.added.len(),
            diff.removed.len()
        );
        requests
    }

    pub fn album_delete(&self, id: Uuid) -> ApiRequest {
        ApiRequest::new(Method::Delete, self.api(&format!("album/delete/{id}")), RequestBody::Empty)
            .redirect_to(self.view("albums"))
    }

    // ========== Accounts ==========

    pub fn login(&self, credentials: &Credentials) -> Result<ApiRequest> {
        let body = RequestBody::Json(serde_json::to_value(credentials)?);
        Ok(ApiRequest::new(Method::Post, self.api("auth/login"), body).redirect_to(self.view_base.clone()))
    }

    /// Registration request, refused before sending when the password
    /// confirmation differs or the email has no `@`.
    pub fn register(&self, registration: &Registration) -> Result<ApiRequest> {
        registration.validate()?;
        let body = RequestBody::Json(json!({
            "email": registration.email,
            "username": registration.username,
            "password": registration.password,
        }));
        Ok(ApiRequest::new(Method::Post, self.api("auth/register"), body).redirect_to(self.view("login")))
    }

    // ========== Search ==========

    /// List page URL carrying the active filters.
    pub fn search_page(&self, domain: Domain, filters: &[Filter]) -> Result<String> {
        Ok(search_url(&self.view(domain.collection()), filters)?)
    }

    /// Plant autocomplete lookup used by the album editor. The query is
    /// passed through unencoded, like every other search parameter.
    pub fn plant_autocomplete(&self, query: &str) -> ApiRequest {
        let base = self.api("search/plants");
        let path = if query.is_empty() { base } else { format!("{base}?name={query}") };
        ApiRequest::new(Method::Get, path, RequestBody::Empty)
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

/// Entity id carried by a detail or edit page path such as
/// `/view/plant/<id>/update`: the fourth `/`-separated segment.
pub fn entity_id_from_path(path: &str) -> Result<Uuid> {
    path.split('/')
        .nth(3)
        .and_then(|segment| Uuid::parse_str(segment).ok())
        .ok_or_else(|| HerbariumError::InvalidEntityId { path: path.to_string() })
}
