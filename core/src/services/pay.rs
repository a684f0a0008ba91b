use crate::error::RequestError;
use crate::http::HttpRequest;
use crate::pipeline::Pipeline;
use crate::types::{Envelope, OrderParams, PaymentParams, Untyped};

use super::data;

/// Payment arguments for the mini-program pay sheet. Only works for the
/// backend's whitelisted app id with a WeChat-authorized login.
pub async fn get_pay_wx_pay_mini_pay(http: &Pipeline, order_id: &str) -> Result<Envelope<PaymentParams>, RequestError> {
    let params = OrderParams { order_id: order_id.to_string() };
    http.request(HttpRequest::get("/pay/wxPay/miniPay").with_data(data(&params)?))
        .await
}

/// Development-only simulated payment. The backend answers with a null result.
pub async fn get_pay_mock(http: &Pipeline, order_id: &str) -> Result<Envelope<Untyped>, RequestError> {
    let params = OrderParams { order_id: order_id.to_string() };
    http.request(HttpRequest::get("/pay/mock").with_data(data(&params)?)).await
}
