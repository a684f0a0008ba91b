use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{Envelope, HotParams, HotResult};

use super::data;

/// Hot-recommendation page. `url` comes from the home feed's `HotItem::target`
/// mapping (e.g. `/hot/preference`) and may also be absolute.
pub async fn get_hot_recommend(
    http: &Pipeline,
    url: &str,
    params: Option<HotParams>,
) -> Result<Envelope<HotResult>, RequestError> {
    let mut req = HttpRequest::get(url);
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
    use crate::types::PageParams;

    #[tokio::test]
    async fn passes_url_and_sub_type() {
        let (http, echo) = pipeline(
            r#"{"id":"1","title":"特惠推荐","bannerPicture":"b.png","subTypes":[{"id":"7","title":"抢先尝鲜","goodsItems":{"items":[],"counts":0,"page":1,"pages":0,"pageSize":10}}]}"#,
        );
        let params = HotParams { page: PageParams { page: Some(1), page_size: None }, sub_type: Some("7".into()) };
        let env = get_hot_recommend(&http, "/hot/preference", Some(params)).await.unwrap();
        assert_eq!(env.result.sub_types[0].title, "抢先尝鲜");
        let req = last(&echo);
        assert_eq!(req.url, "http://mall.test/hot/preference");
        assert_eq!(req.data, Some(json!({"page": 1, "subType": "7"})));
    }

    #[tokio::test]
    async fn absolute_url_is_kept() {
        let (http, echo) = pipeline(r#"{"id":"2","title":"x"}"#);
        get_hot_recommend(&http, "https://cdn.mall.test/hot/new", None).await.unwrap();
        assert_eq!(last(&echo).url, "https://cdn.mall.test/hot/new");
    }
}
