//! Scripted transport and a minimal executor for unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Maps full request URLs to canned responses; unknown URLs answer 404.
#[derive(Debug, Default)]
pub(crate) struct ScriptedHttpClient {
    routes: HashMap<String, Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_owned(), Ok(HttpResponse::ok_json(body)));
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_owned(), Ok(HttpResponse::with_status(status, "")));
        self
    }

    pub(crate) fn with_error(mut self, url: &str, error: HttpError) -> Self {
        self.routes.insert(url.to_owned(), Err(error));
        self
    }

    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let url = request.full_url();
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(url.clone());
        let response = self
            .routes
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
        Box::pin(async move { response })
    }
}

pub(crate) fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
