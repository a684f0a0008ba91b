//! Endpoint functions for the mall backend.
//!
//! Each function only describes its endpoint (method, path, payload) and
//! hands the request to `Pipeline::request`. Auth, base URL, timeout and
//! error handling all live in the pipeline.

pub mod cart;
pub mod category;
pub mod goods;
pub mod home;
pub mod hot;
pub mod pay;
pub mod profile;

use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;

/// Encode an endpoint payload as the request's `data`.
pub(crate) fn data<P: Serialize>(payload: &P) -> Result<Value, RequestError> {
    serde_json::to_value(payload).map_err(RequestError::Serialize)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::pipeline::Pipeline;
    use crate::transport::Transport;

    /// Answers every request with `body` and keeps the dispatched requests.
    pub(crate) struct Echo {
        pub body: String,
        pub seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Echo {
        async fn perform(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().push(req);
            Ok(HttpResponse::new(200, self.body.clone()))
        }
    }

    pub(crate) fn pipeline(result: &str) -> (Pipeline, Arc<Echo>) {
        let echo = Arc::new(Echo {
            body: format!(r#"{{"code":"1","msg":"操作成功","result":{result}}}"#),
            seen: Mutex::new(Vec::new()),
        });
        let pipeline = Pipeline::builder()
            .config(crate::PipelineConfig::new("http://mall.test"))
            .transport(echo.clone())
            .build();
        (pipeline, echo)
    }

    pub(crate) fn last(echo: &Echo) -> HttpRequest {
        echo.seen.lock().last().cloned().expect("no request dispatched")
    }
}
