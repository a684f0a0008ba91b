use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{CategoryTopItem, Envelope};

pub async fn get_category_top(http: &Pipeline) -> Result<Envelope<Vec<CategoryTopItem>>, RequestError> {
    http.request(HttpRequest::get("/category/top")).await
}
