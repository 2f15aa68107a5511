//! Browser implementations of the platform traits, built on `web-sys` fetch
//! and the `window` prompt/navigation APIs.

use super::{ApiError, HostPage, ReleaseApi};
use shared::{
    ApiAction, CreateReleaseParams, DeleteReleaseParams, ErrorEnvelope, ListEnvelope, Release,
    RevertParams, UpdateReleaseParams,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, UrlSearchParams, Window};

fn js_reason(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn transport(endpoint: &'static str, value: JsValue) -> ApiError {
    ApiError::Transport {
        endpoint,
        reason: js_reason(value),
    }
}

/// `ReleaseApi` over browser fetch. `base_url` is the host-configured API
/// prefix; endpoint names are appended verbatim.
pub struct FetchApi {
    window: Window,
    base_url: String,
}

impl FetchApi {
    pub fn new(window: Window, base_url: String) -> Self {
        Self { window, base_url }
    }

    async fn send(&self, request: Request, endpoint: &'static str) -> Result<Response, ApiError> {
        let value = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(|e| transport(endpoint, e))?;
        value.dyn_into::<Response>().map_err(|_| ApiError::Transport {
            endpoint,
            reason: "fetch did not resolve to a Response".to_string(),
        })
    }

    async fn post_action(
        &self,
        action: ApiAction,
        params: &impl serde::Serialize,
    ) -> Result<(), ApiError> {
        let endpoint = action.endpoint();
        let body = serde_json::to_string(params).map_err(|e| ApiError::Transport {
            endpoint,
            reason: format!("failed to encode request body: {e}"),
        })?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&body));
        let headers = Headers::new().map_err(|e| transport(endpoint, e))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| transport(endpoint, e))?;
        init.set_headers(headers.as_ref());

        let url = format!("{}{}", self.base_url, endpoint);
        let request =
            Request::new_with_str_and_init(&url, &init).map_err(|e| transport(endpoint, e))?;
        let response = self.send(request, endpoint).await?;

        if response.status() == 200 {
            Ok(())
        } else {
            Err(self.status_error(response, endpoint).await)
        }
    }

    /// Build the error for a non-200 response, reading the body best-effort
    /// so a structured `error.message` can be shown verbatim later.
    async fn status_error(&self, response: Response, endpoint: &'static str) -> ApiError {
        let status = response.status();
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        let message = ErrorEnvelope::message_from_body(&body);
        ApiError::Status {
            endpoint,
            status,
            message,
            body,
        }
    }
}

impl ReleaseApi for FetchApi {
    async fn list_releases(&self, dataset: &str) -> Result<Vec<Release>, ApiError> {
        let endpoint = ApiAction::ListReleases.endpoint();
        let query = UrlSearchParams::new().map_err(|e| transport(endpoint, e))?;
        query.append("dataset", dataset);
        let url = format!(
            "{}{}?{}",
            self.base_url,
            endpoint,
            String::from(query.to_string())
        );

        let value = JsFuture::from(self.window.fetch_with_str(&url))
            .await
            .map_err(|e| transport(endpoint, e))?;
        let response: Response = value.dyn_into().map_err(|_| ApiError::Transport {
            endpoint,
            reason: "fetch did not resolve to a Response".to_string(),
        })?;

        if response.status() != 200 {
            return Err(self.status_error(response, endpoint).await);
        }

        let json_promise = response.json().map_err(|e| transport(endpoint, e))?;
        let payload = JsFuture::from(json_promise)
            .await
            .map_err(|e| ApiError::MalformedBody {
                endpoint,
                reason: js_reason(e),
            })?;
        let envelope: ListEnvelope =
            serde_wasm_bindgen::from_value(payload).map_err(|e| ApiError::MalformedBody {
                endpoint,
                reason: e.to_string(),
            })?;
        Ok(envelope.result)
    }

    async fn create_release(&self, params: &CreateReleaseParams) -> Result<(), ApiError> {
        self.post_action(ApiAction::CreateRelease, params).await
    }

    async fn update_release(&self, params: &UpdateReleaseParams) -> Result<(), ApiError> {
        self.post_action(ApiAction::UpdateRelease, params).await
    }

    async fn delete_release(&self, params: &DeleteReleaseParams) -> Result<(), ApiError> {
        self.post_action(ApiAction::DeleteRelease, params).await
    }

    async fn revert_dataset(&self, params: &RevertParams) -> Result<(), ApiError> {
        self.post_action(ApiAction::Revert, params).await
    }
}

/// `HostPage` over the real browser window: native confirm/alert dialogs,
/// location-based navigation, and a flash banner for in-place success
/// notices.
pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl HostPage for BrowserPage {
    fn confirm(&self, message: &str) -> bool {
        self.window
            .confirm_with_message(message)
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            log::error!("alert suppressed by browser; message was: {message}");
        }
    }

    fn notify_success(&self, title: &str, message: &str) {
        let result = (|| -> Result<(), JsValue> {
            let document = self
                .window
                .document()
                .ok_or_else(|| JsValue::from_str("no document"))?;
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?;
            let banner = document.create_element("div")?;
            banner.set_class_name("alert alert-success release-controls__notice");
            let strong = document.create_element("strong")?;
            strong.set_text_content(Some(title));
            banner.append_child(&strong)?;
            banner.append_child(&document.create_text_node(&format!(" {message}")))?;
            body.insert_before(&banner, body.first_child().as_ref())?;
            Ok(())
        })();
        if let Err(e) = result {
            log::error!("failed to show success notice: {}", js_reason(e));
        }
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            log::error!("page reload failed: {}", js_reason(e));
        }
    }

    fn navigate_to(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            log::error!("navigation to {url} failed: {}", js_reason(e));
        }
    }

    fn scroll_to_top(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
