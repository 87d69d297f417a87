//! Fake HTTP transport for driving real adapters from integration tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use coinspread_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Canned responses keyed by full request URL; unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_owned(), Ok(HttpResponse::ok_json(body)));
        self
    }

    pub fn error(mut self, url: &str, error: HttpError) -> Self {
        self.routes.insert(url.to_owned(), Err(error));
        self
    }
}

impl HttpClient for FakeHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .get(&request.full_url())
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
        Box::pin(async move { response })
    }
}
