//! LocalStorage 凭据存储
//!
//! 直接读写原始字符串，不经过 JSON 编码，与已有的 `token` 键保持兼容。

use cn19::CredentialStore;
use gloo_storage::{LocalStorage, Storage};

#[derive(Clone, Copy, Default)]
pub struct BrowserCredentialStore;

impl CredentialStore for BrowserCredentialStore {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok()?
    }

    fn save(&self, key: &str, value: &str) -> bool {
        LocalStorage::raw().set_item(key, value).is_ok()
    }

    fn remove(&self, key: &str) -> bool {
        LocalStorage::raw().remove_item(key).is_ok()
    }
}
