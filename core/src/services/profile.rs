use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{Envelope, ProfileDetail, ProfileParams};

use super::data;

/// The token header is added by the pipeline; nothing to pass here.
pub async fn get_member_profile(http: &Pipeline) -> Result<Envelope<ProfileDetail>, RequestError> {
    http.request(HttpRequest::get("/member/profile")).await
}

pub async fn put_member_profile(http: &Pipeline, params: &ProfileParams) -> Result<Envelope<ProfileDetail>, RequestError> {
    http.request(HttpRequest::put("/member/profile").with_data(data(params)?))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::services::testing::{last, pipeline};

    const DETAIL: &str = r#"{"id":"1","account":"jack","avatar":"a.png","nickname":"J","gender":"男"}"#;

    #[tokio::test]
    async fn get_decodes_detail() {
        let (http, _echo) = pipeline(DETAIL);
        let env = get_member_profile(&http).await.unwrap();
        assert_eq!(env.result.account, "jack");
        assert_eq!(env.result.gender.as_deref(), Some("男"));
        assert_eq!(env.result.birthday, None);
    }

    #[tokio::test]
    async fn put_sends_only_changed_fields() {
        let (http, echo) = pipeline(DETAIL);
        let params = ProfileParams { nickname: Some("J".into()), ..Default::default() };
        put_member_profile(&http, &params).await.unwrap();
        let req = last(&echo);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.data, Some(json!({"nickname": "J"})));
    }
}
