use serde_json::json;

use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{Envelope, GoodsResult};

/// Goods detail. `id` travels as a query parameter.
pub async fn get_goods_by_id(http: &Pipeline, id: &str) -> Result<Envelope<GoodsResult>, RequestError> {
    http.request(HttpRequest::get("/goods").with_data(json!({ "id": id }))).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing::{last, pipeline};

    #[tokio::test]
    async fn sends_id_and_decodes_skus() {
        let (http, echo) = pipeline(
            r#"{"id":"1435025","name":"Kettle","price":"99.00","skus":[{"id":"s1","inventory":5,"specs":[{"name":"颜色","valueName":"白"}]}]}"#,
        );
        let env = get_goods_by_id(&http, "1435025").await.unwrap();
        assert_eq!(env.result.skus[0].specs[0].value_name, "白");
        assert!(env.result.details.pictures.is_empty());
        let req = last(&echo);
        assert_eq!(req.url, "http://mall.test/goods");
        assert_eq!(req.data, Some(json!({"id": "1435025"})));
    }
}
