//! HTTP 传输实现
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心层的 `HttpClient`。

use async_trait::async_trait;
use cn19::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse};
use cn19_shared::protocol::{FilePart, HttpMethod, RequestBody};
use gloo_net::http::{Method, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// 浏览器 fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchClient;

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// 构造 multipart 表单（浏览器自动生成 boundary，不能手动设置 Content-Type）
fn form_data(part: &FilePart) -> Result<FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&part.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(&part.field, &blob, &part.filename)?;
    Ok(form)
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = RequestBuilder::new(&req.url).method(method_of(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(body) => builder.body(body),
            RequestBody::File(part) => {
                let form = form_data(&part)
                    .map_err(|e| ApiError::encode(format!("FormData: {:?}", e)))?;
                builder.body(form)
            }
        }
        .map_err(|e| ApiError::encode(e.to_string()))?;

        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = resp.status();
        // 错误响应可能没有正文，按空串处理
        let body = resp.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}
