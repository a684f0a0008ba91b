use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const OK_MSG: &str = "操作成功";
pub const UNAUTHORIZED_MSG: &str = "登录失效，请重新登录";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    pub msg: String,
    pub result: T,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub sku_id: String,
    pub name: String,
    pub attrs_text: String,
    pub picture: String,
    pub price: f64,
    pub now_price: f64,
    pub selected: bool,
    pub stock: u32,
    pub count: u32,
    pub is_effective: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub account: String,
    pub avatar: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub full_location: Option<String>,
    pub profession: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub account: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCart {
    pub sku_id: String,
    pub count: u32,
}

#[derive(Deserialize)]
pub struct DeleteCart {
    pub ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateCart {
    pub selected: Option<bool>,
    pub count: Option<u32>,
}

#[derive(Deserialize)]
pub struct SelectAll {
    pub selected: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub profession: Option<String>,
}

#[derive(Default)]
pub struct Store {
    pub tokens: HashSet<String>,
    pub cart: Vec<CartItem>,
    pub profiles: HashMap<String, Profile>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Db::default())
}

pub fn app_with_store(db: Db) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/home/banner", get(home_banner))
        .route("/home/category/mutli", get(home_category))
        .route("/home/hot/mutli", get(home_hot))
        .route("/home/goods/guessLike", get(guess_like))
        .route("/hot/{kind}", get(hot_recommend))
        .route("/category/top", get(category_top))
        .route("/goods", get(goods_detail))
        .route(
            "/member/cart",
            get(list_cart).post(add_cart).delete(delete_cart),
        )
        .route("/member/cart/selected", put(select_all))
        .route("/member/cart/{sku_id}", put(update_cart))
        .route("/member/profile", get(get_profile).put(update_profile))
        .route("/pay/mock", get(pay_mock))
        .route("/pay/wxPay/miniPay", get(pay_mini))
        .route("/debug/status/{code}", get(debug_status))
        .route("/debug/status/{code}/bare", get(debug_status_bare))
        .route("/debug/echo", get(debug_echo).post(debug_echo))
        .route("/debug/slow", get(debug_slow))
        .route("/debug/redirect", get(debug_redirect))
        .route("/debug/no-content", get(debug_no_content).delete(debug_no_content))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok<T: Serialize>(result: T) -> Json<Envelope<T>> {
    Json(Envelope {
        code: "1".to_string(),
        msg: OK_MSG.to_string(),
        result,
    })
}

fn error(status: StatusCode, msg: &str) -> Response {
    let body = Envelope {
        code: status.as_u16().to_string(),
        msg: msg.to_string(),
        result: Value::Null,
    };
    (status, Json(body)).into_response()
}

/// Resolve the `Authorization` header to a known token.
async fn authorize(db: &Db, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if db.read().await.tokens.contains(token) {
        Ok(token.to_string())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MSG))
    }
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Response {
    if input.account.is_empty() {
        return error(StatusCode::BAD_REQUEST, "账号不能为空");
    }
    let token = Uuid::new_v4().to_string();
    let profile = Profile {
        id: Uuid::new_v4().to_string(),
        account: input.account.clone(),
        avatar: "https://yanxuan-item.nosdn.127.net/avatar.png".to_string(),
        nickname: None,
        gender: None,
        birthday: None,
        full_location: None,
        profession: None,
    };
    let mut store = db.write().await;
    store.tokens.insert(token.clone());
    store.profiles.insert(token.clone(), profile.clone());
    ok(json!({
        "id": profile.id,
        "account": profile.account,
        "mobile": "13800000000",
        "token": token,
        "nickname": "",
        "avatar": profile.avatar,
    }))
    .into_response()
}

// --- home ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BannerQuery {
    distribution_site: Option<u32>,
}

async fn home_banner(Query(q): Query<BannerQuery>) -> impl IntoResponse {
    let site = q.distribution_site.unwrap_or(1);
    ok(json!([
        {"id": format!("{site}-1"), "imgUrl": format!("https://img.mall.test/banner/{site}-1.jpg"), "hrefUrl": "/pages/goods/goods?id=1435025", "type": 1},
        {"id": format!("{site}-2"), "imgUrl": format!("https://img.mall.test/banner/{site}-2.jpg"), "hrefUrl": "/pages/goods/goods?id=3997185", "type": 1}
    ]))
}

async fn home_category() -> impl IntoResponse {
    ok(json!([
        {"id": "1181622001", "name": "居家", "icon": "https://img.mall.test/icon/home.png"},
        {"id": "1181622006", "name": "美食", "icon": "https://img.mall.test/icon/food.png"}
    ]))
}

async fn home_hot() -> impl IntoResponse {
    ok(json!([
        {"id": "1", "type": 1, "title": "特惠推荐", "alt": "精选全攻略", "target": "1", "pictures": ["https://img.mall.test/hot/1.png"]},
        {"id": "2", "type": 2, "title": "爆款推荐", "alt": "最受欢迎", "target": "2", "pictures": ["https://img.mall.test/hot/2.png"]}
    ]))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    sub_type: Option<String>,
}

fn guess_page(page: u32, page_size: u32) -> Value {
    const COUNTS: u32 = 25;
    let pages = COUNTS.div_ceil(page_size.max(1));
    let start = (page.saturating_sub(1)) * page_size;
    let items: Vec<Value> = (start..COUNTS.min(start + page_size))
        .map(|i| {
            json!({
                "id": format!("{}", 4000000 + i),
                "name": format!("商品 {i}"),
                "desc": "好物推荐",
                "picture": format!("https://img.mall.test/goods/{i}.jpg"),
                "price": 19.9 + f64::from(i),
                "discount": null,
                "orderNum": i * 10
            })
        })
        .collect();
    json!({"counts": COUNTS, "page": page, "pages": pages, "pageSize": page_size, "items": items})
}

async fn guess_like(Query(q): Query<PageQuery>) -> impl IntoResponse {
    ok(guess_page(q.page.unwrap_or(1), q.page_size.unwrap_or(10)))
}

async fn hot_recommend(Path(kind): Path<String>, Query(q): Query<PageQuery>) -> impl IntoResponse {
    let page = guess_page(q.page.unwrap_or(1), q.page_size.unwrap_or(10));
    let sub_types: Vec<Value> = ["912000341", "912000342"]
        .iter()
        .filter(|id| q.sub_type.as_deref().is_none_or(|s| s == **id))
        .map(|id| json!({"id": id, "title": format!("分类 {id}"), "goodsItems": page}))
        .collect();
    ok(json!({
        "id": kind,
        "title": format!("{kind} 推荐"),
        "bannerPicture": format!("https://img.mall.test/hot/{kind}.png"),
        "subTypes": sub_types
    }))
}

async fn category_top() -> impl IntoResponse {
    ok(json!([
        {
            "id": "1005000",
            "name": "居家",
            "picture": "https://img.mall.test/cat/1005000.png",
            "imageBanners": ["https://img.mall.test/cat/banner.png"],
            "children": [
                {"id": "1008017", "name": "收纳", "picture": "https://img.mall.test/cat/1008017.png", "goods": []}
            ]
        }
    ]))
}

#[derive(Deserialize)]
struct GoodsQuery {
    id: Option<String>,
}

async fn goods_detail(Query(q): Query<GoodsQuery>) -> Response {
    let Some(id) = q.id.filter(|id| !id.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "商品id不能为空");
    };
    ok(json!({
        "id": id,
        "name": "手工吹制玻璃水壶",
        "desc": "耐高温",
        "price": "99.00",
        "oldPrice": "129.00",
        "mainPictures": ["https://img.mall.test/goods/main.jpg"],
        "specs": [{"name": "颜色", "values": [{"name": "白", "picture": null, "desc": ""}]}],
        "skus": [{"id": format!("{id}01"), "inventory": 20, "oldPrice": "129.00", "price": "99.00", "picture": "", "skuCode": "K1", "specs": [{"name": "颜色", "valueName": "白"}]}],
        "details": {"pictures": [], "properties": [{"name": "材质", "value": "玻璃"}]},
        "similarProducts": []
    }))
    .into_response()
}

// --- member cart ---

async fn list_cart(State(db): State<Db>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    ok(db.read().await.cart.clone()).into_response()
}

async fn add_cart(State(db): State<Db>, headers: HeaderMap, Json(input): Json<AddCart>) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    if input.count == 0 {
        return error(StatusCode::BAD_REQUEST, "数量必须大于0");
    }
    let mut store = db.write().await;
    if let Some(item) = store.cart.iter_mut().find(|i| i.sku_id == input.sku_id) {
        item.count += input.count;
        return ok(item.clone()).into_response();
    }
    let item = CartItem {
        id: Uuid::new_v4().to_string(),
        sku_id: input.sku_id.clone(),
        name: format!("商品 {}", input.sku_id),
        attrs_text: "颜色:白".to_string(),
        picture: "https://img.mall.test/goods/cart.jpg".to_string(),
        price: 99.0,
        now_price: 99.0,
        selected: true,
        stock: 100,
        count: input.count,
        is_effective: true,
    };
    store.cart.push(item.clone());
    ok(item).into_response()
}

async fn delete_cart(State(db): State<Db>, headers: HeaderMap, Json(input): Json<DeleteCart>) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    db.write().await.cart.retain(|i| !input.ids.contains(&i.sku_id));
    ok(Value::Null).into_response()
}

async fn update_cart(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(sku_id): Path<String>,
    Json(input): Json<UpdateCart>,
) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    let mut store = db.write().await;
    let Some(item) = store.cart.iter_mut().find(|i| i.sku_id == sku_id) else {
        return error(StatusCode::NOT_FOUND, "购物车中没有该商品");
    };
    if let Some(selected) = input.selected {
        item.selected = selected;
    }
    if let Some(count) = input.count {
        item.count = count;
    }
    ok(item.clone()).into_response()
}

async fn select_all(State(db): State<Db>, headers: HeaderMap, Json(input): Json<SelectAll>) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    for item in db.write().await.cart.iter_mut() {
        item.selected = input.selected;
    }
    ok(Value::Null).into_response()
}

// --- member profile ---

async fn get_profile(State(db): State<Db>, headers: HeaderMap) -> Response {
    let token = match authorize(&db, &headers).await {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    match db.read().await.profiles.get(&token) {
        Some(profile) => ok(profile.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "用户不存在"),
    }
}

async fn update_profile(State(db): State<Db>, headers: HeaderMap, Json(input): Json<UpdateProfile>) -> Response {
    let token = match authorize(&db, &headers).await {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    let mut store = db.write().await;
    let Some(profile) = store.profiles.get_mut(&token) else {
        return error(StatusCode::NOT_FOUND, "用户不存在");
    };
    if input.nickname.is_some() {
        profile.nickname = input.nickname;
    }
    if input.gender.is_some() {
        profile.gender = input.gender;
    }
    if input.birthday.is_some() {
        profile.birthday = input.birthday;
    }
    if input.profession.is_some() {
        profile.profession = input.profession;
    }
    ok(profile.clone()).into_response()
}

// --- pay ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderQuery {
    order_id: Option<String>,
}

async fn pay_mock(State(db): State<Db>, headers: HeaderMap, Query(q): Query<OrderQuery>) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    if q.order_id.is_none_or(|id| id.is_empty()) {
        return error(StatusCode::BAD_REQUEST, "订单id不能为空");
    }
    ok(Value::Null).into_response()
}

async fn pay_mini(State(db): State<Db>, headers: HeaderMap, Query(q): Query<OrderQuery>) -> Response {
    if let Err(resp) = authorize(&db, &headers).await {
        return resp;
    }
    let Some(order_id) = q.order_id.filter(|id| !id.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "订单id不能为空");
    };
    ok(json!({
        "timeStamp": "1700000000",
        "nonceStr": Uuid::new_v4().simple().to_string(),
        "package": format!("prepay_id={order_id}"),
        "signType": "RSA",
        "paySign": "mock-signature"
    }))
    .into_response()
}

// --- debug ---

async fn debug_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error(status, &format!("status {code}"))
}

async fn debug_status_bare(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"code": code.to_string()}))).into_response()
}

/// Echo request headers and query so tests can inspect what went on the wire.
async fn debug_echo(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    ok(json!({"headers": headers, "query": query}))
}

#[derive(Deserialize)]
struct SlowQuery {
    ms: Option<u64>,
}

async fn debug_slow(Query(q): Query<SlowQuery>) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(q.ms.unwrap_or(1000))).await;
    ok(Value::Null)
}

async fn debug_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/home/banner")]).into_response()
}

async fn debug_no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
