//! 文件读取
//!
//! 照片以 `data:<mime>;base64,<...>` 形式随 JSON 发送，KML 以原始字节上传。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use leptos::ev::Event;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

/// 取 `<input type="file">` 的第一个文件
pub fn selected_file(ev: &Event) -> Option<File> {
    let input: HtmlInputElement = event_target(ev);
    input.files()?.get(0)
}

pub async fn read_bytes(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?;
    let array = js_sys::Uint8Array::new(&buffer);
    Ok(array.to_vec())
}

/// 编码为 data URL
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub async fn read_data_url(file: &File) -> Result<String, String> {
    let bytes = read_bytes(file).await?;
    Ok(to_data_url(&file.type_(), &bytes))
}

/// 清空文件输入框，允许再次选择同一文件
pub fn reset_input(ev: &Event) {
    if let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}
