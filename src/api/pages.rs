// Page fragment and catalog retrieval from the static host.
use futures_util::future::LocalBoxFuture;

use crate::api::models::Catalog;
use crate::error::NavError;

/// `GET url → full HTML document text`. Anything but a 2xx is an error.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> LocalBoxFuture<'static, Result<String, NavError>>;
}

/// Fetches pages with the browser's `fetch`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct HttpPageFetcher;

#[cfg(target_arch = "wasm32")]
impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, url: &str) -> LocalBoxFuture<'static, Result<String, NavError>> {
        use futures_util::FutureExt;

        let url = url.to_string();
        async move {
            let response = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|e| NavError::Network(e.to_string()))?;
            if !response.ok() {
                return Err(NavError::Status(response.status()));
            }
            response
                .text()
                .await
                .map_err(|e| NavError::Network(e.to_string()))
        }
        .boxed_local()
    }
}

/// Load the catalog list published next to the pages.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_catalog(url: &str) -> Option<Catalog> {
    let response = match gloo_net::http::Request::get(url).send().await {
        Ok(response) if response.ok() => response,
        Ok(response) => {
            tracing::warn!(url, status = response.status(), "catalog request failed");
            return None;
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "catalog request failed");
            return None;
        }
    };
    let body = response.text().await.ok()?;
    parse_catalog(&body)
}

/// Parse catalog JSON, logging instead of failing so the player still boots
/// with an empty list.
pub fn parse_catalog(raw: &str) -> Option<Catalog> {
    match Catalog::from_json(raw) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            tracing::error!(error = %err, "catalog could not be parsed");
            None
        }
    }
}
