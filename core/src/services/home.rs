use serde_json::json;

use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{BannerItem, CategoryItem, Envelope, GuessItem, HotItem, PageParams, PageResult};

use super::data;

/// Where a banner is shown.
pub const SITE_HOME: u32 = 1;
pub const SITE_CATEGORY: u32 = 2;

/// Banners for a display site; the home page uses `SITE_HOME`.
pub async fn get_home_banner(http: &Pipeline, distribution_site: u32) -> Result<Envelope<Vec<BannerItem>>, RequestError> {
    http.request(HttpRequest::get("/home/banner").with_data(json!({ "distributionSite": distribution_site })))
        .await
}

pub async fn get_home_category(http: &Pipeline) -> Result<Envelope<Vec<CategoryItem>>, RequestError> {
    http.request(HttpRequest::get("/home/category/mutli")).await
}

pub async fn get_home_hot(http: &Pipeline) -> Result<Envelope<Vec<HotItem>>, RequestError> {
    http.request(HttpRequest::get("/home/hot/mutli")).await
}

pub async fn get_guess_like(
    http: &Pipeline,
    params: Option<PageParams>,
) -> Result<Envelope<PageResult<GuessItem>>, RequestError> {
    let mut req = HttpRequest::get("/home/goods/guessLike");
    if let Some(params) = params {
        req = req.with_data(data(&params)?);
    }
    http.request(req).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing::{last, pipeline};

    #[tokio::test]
    async fn banner_sends_distribution_site() {
        let (http, echo) = pipeline(r#"[{"id":"1","imgUrl":"a.png"}]"#);
        let env = get_home_banner(&http, SITE_CATEGORY).await.unwrap();
        assert_eq!(env.result[0].img_url, "a.png");
        assert_eq!(last(&echo).data, Some(json!({"distributionSite": 2})));
    }

    #[tokio::test]
    async fn category_and_hot_paths() {
        let (http, echo) = pipeline("[]");
        get_home_category(&http).await.unwrap();
        assert_eq!(last(&echo).url, "http://mall.test/home/category/mutli");
        get_home_hot(&http).await.unwrap();
        assert_eq!(last(&echo).url, "http://mall.test/home/hot/mutli");
    }

    #[tokio::test]
    async fn guess_like_without_params_sends_no_data() {
        let (http, echo) = pipeline(r#"{"items":[],"counts":0,"page":1,"pages":0,"pageSize":10}"#);
        let env = get_guess_like(&http, None).await.unwrap();
        assert!(env.result.items.is_empty());
        assert_eq!(last(&echo).data, None);
    }

    #[tokio::test]
    async fn guess_like_pages() {
        let (http, echo) = pipeline(
            r#"{"items":[{"id":"9","name":"Tea","price":12.5}],"counts":31,"page":2,"pages":4,"pageSize":10}"#,
        );
        let params = PageParams { page: Some(2), page_size: Some(10) };
        let env = get_guess_like(&http, Some(params)).await.unwrap();
        assert_eq!(env.result.pages, 4);
        assert_eq!(env.result.items[0].price, 12.5);
        assert_eq!(last(&echo).data, Some(json!({"page": 2, "pageSize": 10})));
    }
}
