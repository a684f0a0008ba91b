use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_store, CartItem, Db, Envelope, UNAUTHORIZED_MSG};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, token);
    }
    builder.body(body.to_string()).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, token);
    }
    builder.body(String::new()).unwrap()
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", r#"{"account":"jack"}"#, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Value> = body_json(resp).await;
    env.result["token"].as_str().unwrap().to_string()
}

// --- public ---

#[tokio::test]
async fn banner_echoes_distribution_site() {
    let resp = app()
        .oneshot(get_request("/home/banner?distributionSite=2", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.code, "1");
    assert_eq!(env.result[0]["id"], "2-1");
}

#[tokio::test]
async fn guess_like_pages() {
    let resp = app()
        .oneshot(get_request("/home/goods/guessLike?page=2&pageSize=10", None))
        .await
        .unwrap();

    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.result["page"], 2);
    assert_eq!(env.result["items"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn hot_recommend_filters_sub_type() {
    let resp = app()
        .oneshot(get_request("/hot/preference?subType=912000342", None))
        .await
        .unwrap();

    let env: Envelope<Value> = body_json(resp).await;
    let sub_types = env.result["subTypes"].as_array().unwrap();
    assert_eq!(sub_types.len(), 1);
    assert_eq!(sub_types[0]["id"], "912000342");
}

#[tokio::test]
async fn goods_without_id_returns_400_envelope() {
    let resp = app().oneshot(get_request("/goods", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let env: Envelope<Value> = body_json(resp).await;
    assert!(!env.msg.is_empty());
}

// --- auth ---

#[tokio::test]
async fn cart_without_token_returns_401() {
    let resp = app().oneshot(get_request("/member/cart", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.msg, UNAUTHORIZED_MSG);
}

#[tokio::test]
async fn unknown_token_returns_401() {
    let resp = app()
        .oneshot(get_request("/member/profile", Some("forged")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_empty_account() {
    let resp = app()
        .oneshot(json_request("POST", "/login", r#"{"account":""}"#, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- debug ---

#[tokio::test]
async fn debug_status_returns_requested_code() {
    let resp = app().oneshot(get_request("/debug/status/503", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.msg, "status 503");
}

#[tokio::test]
async fn debug_status_bare_has_no_msg() {
    let resp = app()
        .oneshot(get_request("/debug/status/400/bare", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body.get("msg").is_none());
}

#[tokio::test]
async fn debug_redirect_points_at_banner() {
    let resp = app().oneshot(get_request("/debug/redirect", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[http::header::LOCATION], "/home/banner");
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn debug_no_content_has_empty_body() {
    let resp = app().oneshot(get_request("/debug/no-content", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn debug_echo_reflects_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/debug/echo?a=1")
                .header("source-client", "miniapp")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.result["headers"]["source-client"], "miniapp");
    assert_eq!(env.result["query"]["a"], "1");
}

// --- cart lifecycle ---

#[tokio::test]
async fn cart_lifecycle() {
    let app = app_with_store(Db::default());
    let token = login(&app).await;
    let token = Some(token.as_str());

    // add twice merges counts
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/member/cart", r#"{"skuId":"300","count":2}"#, token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app.clone().oneshot(get_request("/member/cart", token)).await.unwrap();
    let env: Envelope<Vec<CartItem>> = body_json(resp).await;
    assert_eq!(env.result.len(), 1);
    assert_eq!(env.result[0].count, 4);

    // update one line
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/member/cart/300", r#"{"selected":false}"#, token))
        .await
        .unwrap();
    let env: Envelope<CartItem> = body_json(resp).await;
    assert!(!env.result.selected);
    assert_eq!(env.result.count, 4); // unchanged

    // select all
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/member/cart/selected", r#"{"selected":true}"#, token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // update unknown sku
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/member/cart/999", r#"{"count":1}"#, token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete
    let resp = app
        .clone()
        .oneshot(json_request("DELETE", "/member/cart", r#"{"ids":["300"]}"#, token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_bytes(resp).await.is_empty());

    let resp = app.clone().oneshot(get_request("/member/cart", token)).await.unwrap();
    let env: Envelope<Vec<CartItem>> = body_json(resp).await;
    assert!(env.result.is_empty());
}

#[tokio::test]
async fn profile_update_is_partial() {
    let app = app_with_store(Db::default());
    let token = login(&app).await;
    let token = Some(token.as_str());

    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/member/profile", r#"{"nickname":"J"}"#, token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get_request("/member/profile", token)).await.unwrap();
    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.result["nickname"], "J");
    assert_eq!(env.result["account"], "jack");
    assert!(env.result["gender"].is_null());
}

#[tokio::test]
async fn mini_pay_requires_order_id() {
    let app = app_with_store(Db::default());
    let token = login(&app).await;

    let resp = app
        .clone()
        .oneshot(get_request("/pay/wxPay/miniPay", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(get_request("/pay/wxPay/miniPay?orderId=o-1", Some(&token)))
        .await
        .unwrap();
    let env: Envelope<Value> = body_json(resp).await;
    assert_eq!(env.result["package"], "prepay_id=o-1");
}
