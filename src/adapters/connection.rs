use crate::adapters::firestore::FirestoreStore;
use crate::config::toml_config::FirebaseConfig;
use std::sync::OnceLock;

static STORE: OnceLock<FirestoreStore> = OnceLock::new();

/// 取得行程內唯一的 Firestore 連線。
///
/// 第一次呼叫時依設定建立，之後的呼叫忽略參數並回傳同一個連線。
pub fn initialize(config: &FirebaseConfig) -> &'static FirestoreStore {
    STORE.get_or_init(|| {
        tracing::info!(
            "🔌 Connecting to Firestore project '{}' (database {})",
            config.project_id,
            config.database
        );
        FirestoreStore::new(config)
    })
}
