use serde_json::json;

use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{AddCartParams, CartItem, Envelope, UpdateCartParams, Untyped};

use super::data;

/// Add a SKU to the member's cart.
pub async fn post_member_cart(http: &Pipeline, params: &AddCartParams) -> Result<Envelope<Untyped>, RequestError> {
    http.request(HttpRequest::post("/member/cart").with_data(data(params)?)).await
}

pub async fn get_member_cart(http: &Pipeline) -> Result<Envelope<Vec<CartItem>>, RequestError> {
    http.request(HttpRequest::get("/member/cart")).await
}

/// Remove the given cart lines. An empty `ids` list is sent as-is.
pub async fn delete_member_cart(http: &Pipeline, ids: &[String]) -> Result<Envelope<Untyped>, RequestError> {
    http.request(HttpRequest::delete("/member/cart").with_data(json!({ "ids": ids })))
        .await
}

pub async fn put_member_cart_by_sku_id(
    http: &Pipeline,
    sku_id: &str,
    params: &UpdateCartParams,
) -> Result<Envelope<Untyped>, RequestError> {
    http.request(HttpRequest::put(format!("/member/cart/{sku_id}")).with_data(data(params)?))
        .await
}

/// Select or deselect every cart line.
pub async fn put_member_cart_selected(http: &Pipeline, selected: bool) -> Result<Envelope<Untyped>, RequestError> {
    http.request(HttpRequest::put("/member/cart/selected").with_data(json!({ "selected": selected })))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::services::testing::{last, pipeline};

    #[tokio::test]
    async fn add_posts_sku_and_count() {
        let (http, echo) = pipeline("null");
        let params = AddCartParams { sku_id: "300".into(), count: 2 };
        post_member_cart(&http, &params).await.unwrap();
        let req = last(&echo);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://mall.test/member/cart");
        assert_eq!(req.data, Some(json!({"skuId": "300", "count": 2})));
    }

    #[tokio::test]
    async fn list_decodes_cart_items() {
        let (http, echo) = pipeline(r#"[{"id":"1","skuId":"300","name":"Mug","count":2,"selected":true}]"#);
        let env = get_member_cart(&http).await.unwrap();
        assert_eq!(env.result.len(), 1);
        assert_eq!(env.result[0].sku_id, "300");
        assert_eq!(last(&echo).method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn delete_sends_ids() {
        let (http, echo) = pipeline("null");
        delete_member_cart(&http, &["1".to_string(), "2".to_string()]).await.unwrap();
        let req = last(&echo);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.data, Some(json!({"ids": ["1", "2"]})));
    }

    #[tokio::test]
    async fn update_targets_sku_path() {
        let (http, echo) = pipeline("null");
        let params = UpdateCartParams { selected: Some(false), count: None };
        put_member_cart_by_sku_id(&http, "300", &params).await.unwrap();
        let req = last(&echo);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://mall.test/member/cart/300");
        assert_eq!(req.data, Some(json!({"selected": false})));
    }

    #[tokio::test]
    async fn select_all_sends_flag() {
        let (http, echo) = pipeline("null");
        put_member_cart_selected(&http, true).await.unwrap();
        let req = last(&echo);
        assert_eq!(req.url, "http://mall.test/member/cart/selected");
        assert_eq!(req.data, Some(json!({"selected": true})));
    }
}
