use crate::adapters::connection;
use crate::adapters::firestore::FirestoreStore;
use crate::config::toml_config::FirebaseConfig;
use crate::core::{matching, statistics};
use crate::domain::model::{DrawRecord, DrawStatistics, NumberSet, TicketMatchResult};
use crate::domain::ports::{CollectionQuery, Direction, DocumentStore};
use crate::utils::error::Result;
use std::sync::OnceLock;

pub const DRAWS_COLLECTION: &str = "scraping_results";
pub const DRAW_DATE_FIELD: &str = "conteudo.data_sorteio";
pub const RECENT_DRAWS_LIMIT: u32 = 150;
/// 依序嘗試的開獎期數欄位
pub const CONTEST_FIELDS: [&str; 2] = ["conteudo.concurso", "metadados.concurso"];

/// 開獎結果的讀取入口
pub struct ResultsService<S: DocumentStore> {
    store: S,
}

static SHARED: OnceLock<ResultsService<FirestoreStore>> = OnceLock::new();

impl ResultsService<FirestoreStore> {
    /// 行程內共用的實例；第一次呼叫建立，之後回傳同一個
    pub fn shared(config: &FirebaseConfig) -> &'static Self {
        SHARED.get_or_init(|| Self::new(connection::initialize(config).clone()))
    }
}

impl<S: DocumentStore> ResultsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn recent_draws_query() -> CollectionQuery {
        CollectionQuery::new(DRAWS_COLLECTION)
            .order_by(DRAW_DATE_FIELD, Direction::Descending)
            .limit(RECENT_DRAWS_LIMIT)
    }

    /// 最新的開獎紀錄（最多 150 筆，日期由新到舊）
    pub async fn fetch_recent_draws(&self) -> Result<Vec<DrawRecord>> {
        let query = Self::recent_draws_query();

        match self.store.run_query(&query).await {
            Ok(mut draws) => {
                draws.truncate(RECENT_DRAWS_LIMIT as usize);
                tracing::info!("📥 Fetched {} draws from '{}'", draws.len(), DRAWS_COLLECTION);
                Ok(draws)
            }
            Err(e) => {
                tracing::error!("❌ Failed to fetch draw history from Firestore: {}", e);
                Err(e)
            }
        }
    }

    /// 失敗時只記錄錯誤並回傳空陣列
    pub async fn fetch_recent_draws_or_empty(&self) -> Vec<DrawRecord> {
        self.fetch_recent_draws().await.unwrap_or_default()
    }

    pub async fn get_draw(&self, id: &str) -> Result<Option<DrawRecord>> {
        self.store
            .get_document(DRAWS_COLLECTION, id)
            .await
            .inspect_err(|e| tracing::error!("❌ Failed to fetch draw '{}': {}", id, e))
    }

    /// 依開獎期數查詢，先找 `conteudo.concurso`，找不到再找 `metadados.concurso`
    pub async fn get_draw_by_contest(&self, contest: u64) -> Result<Option<DrawRecord>> {
        for field in CONTEST_FIELDS {
            let query = CollectionQuery::new(DRAWS_COLLECTION)
                .where_eq(field, contest)
                .limit(1);

            let found = self.store.run_query(&query).await.inspect_err(|e| {
                tracing::error!("❌ Failed to look up contest {} by {}: {}", contest, field, e)
            })?;

            if let Some(draw) = found.into_iter().next() {
                tracing::debug!("Contest {} found by {} (document {})", contest, field, draw.id);
                return Ok(Some(draw));
            }
        }

        tracing::info!("Contest {} not found in '{}'", contest, DRAWS_COLLECTION);
        Ok(None)
    }

    pub fn compute_matches(
        &self,
        drawn: Option<&NumberSet>,
        tickets: Option<&[NumberSet]>,
    ) -> Vec<TicketMatchResult> {
        matching::compute_matches(drawn, tickets)
    }

    /// `last` 只統計最新的 N 期
    pub async fn statistics(&self, top: usize, last: Option<usize>) -> Result<DrawStatistics> {
        let mut draws = self.fetch_recent_draws().await?;
        if let Some(last) = last {
            draws.truncate(last);
        }
        Ok(statistics::summarize(&draws, top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ResultsError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        draws: Vec<DrawRecord>,
        queries: Arc<Mutex<Vec<CollectionQuery>>>,
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn run_query(&self, query: &CollectionQuery) -> Result<Vec<DrawRecord>> {
            self.queries.lock().await.push(query.clone());
            Ok(self
                .draws
                .iter()
                .filter(|draw| {
                    query.filters.iter().all(|(path, expected)| {
                        let mut parts = path.split('.');
                        let first = parts.next().and_then(|p| draw.data.get(p));
                        parts.fold(first, |value, part| value.and_then(|v| v.get(part)))
                            == Some(expected)
                    })
                })
                .cloned()
                .collect())
        }

        async fn get_document(&self, _collection: &str, id: &str) -> Result<Option<DrawRecord>> {
            Ok(self.draws.iter().find(|d| d.id == id).cloned())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn run_query(&self, _query: &CollectionQuery) -> Result<Vec<DrawRecord>> {
            Err(ResultsError::StoreError {
                status: 503,
                message: "The service is currently unavailable.".to_string(),
            })
        }

        async fn get_document(&self, _collection: &str, _id: &str) -> Result<Option<DrawRecord>> {
            Err(ResultsError::StoreError {
                status: 403,
                message: "Missing or insufficient permissions.".to_string(),
            })
        }
    }

    fn draw(id: &str, date: &str, numbers: &[&str]) -> DrawRecord {
        let data = json!({ "conteudo": { "data_sorteio": date, "dezenas": numbers } });
        DrawRecord::new(id, data.as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn test_fetch_issues_recent_draws_query() {
        let store = MockStore {
            draws: vec![draw("b", "2024-03-20", &["01"]), draw("a", "2024-03-16", &["02"])],
            ..MockStore::default()
        };
        let service = ResultsService::new(store.clone());

        let draws = service.fetch_recent_draws().await.unwrap();

        assert_eq!(draws.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);
        let queries = store.queries.lock().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].collection, "scraping_results");
        assert_eq!(
            queries[0].order_by,
            vec![("conteudo.data_sorteio".to_string(), Direction::Descending)]
        );
        assert_eq!(queries[0].limit, Some(150));
    }

    #[tokio::test]
    async fn test_fetch_never_exceeds_limit() {
        let draws = (0..200)
            .map(|i| draw(&format!("d{}", i), "2024-01-01", &["01"]))
            .collect();
        let service = ResultsService::new(MockStore {
            draws,
            ..MockStore::default()
        });

        assert_eq!(service.fetch_recent_draws().await.unwrap().len(), 150);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let service = ResultsService::new(FailingStore);

        assert!(matches!(
            service.fetch_recent_draws().await,
            Err(ResultsError::StoreError { status: 503, .. })
        ));
        assert!(service.fetch_recent_draws_or_empty().await.is_empty());
        assert!(service.get_draw("abc").await.is_err());
        assert!(service.statistics(5, None).await.is_err());
        assert!(service.get_draw_by_contest(2701).await.is_err());
    }

    #[test]
    fn test_get_draw_by_id() {
        let service = ResultsService::new(MockStore {
            draws: vec![draw("xyz", "2024-03-20", &["01"])],
            ..MockStore::default()
        });

        let found = tokio_test::block_on(service.get_draw("xyz")).unwrap();
        let missing = tokio_test::block_on(service.get_draw("nope")).unwrap();

        assert_eq!(found.map(|d| d.id), Some("xyz".to_string()));
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_statistics_over_recent_draws() {
        let service = ResultsService::new(MockStore {
            draws: vec![
                draw("b", "2024-03-20", &["05", "10"]),
                draw("a", "2024-03-16", &["10", "20"]),
            ],
            ..MockStore::default()
        });

        let stats = service.statistics(1, None).await.unwrap();

        assert_eq!(stats.draws_analyzed, 2);
        assert_eq!(stats.most_drawn[0].number, "10");
        assert_eq!(stats.most_drawn[0].frequency, 2);
        assert_eq!(stats.least_drawn[0].number, "1");
        assert_eq!(stats.least_drawn[0].frequency, 0);

        let newest = service.statistics(3, Some(1)).await.unwrap();

        assert_eq!(newest.draws_analyzed, 1);
        assert_eq!(
            newest.most_drawn.iter().map(|f| f.number.as_str()).collect::<Vec<_>>(),
            vec!["5", "10", "1"]
        );
    }

    #[tokio::test]
    async fn test_get_draw_by_contest_falls_back_to_metadata() {
        let mut by_content = draw("content-doc", "2024-03-20", &["01"]);
        by_content.data["conteudo"]["concurso"] = json!(2701);

        let mut by_metadata = draw("metadata-doc", "2024-03-16", &["02"]);
        by_metadata
            .data
            .insert("metadados".to_string(), json!({ "concurso": 2700 }));

        let store = MockStore {
            draws: vec![by_content, by_metadata],
            ..MockStore::default()
        };
        let service = ResultsService::new(store.clone());

        let found = service.get_draw_by_contest(2701).await.unwrap();
        assert_eq!(found.map(|d| d.id), Some("content-doc".to_string()));

        let fallback = service.get_draw_by_contest(2700).await.unwrap();
        assert_eq!(fallback.map(|d| d.id), Some("metadata-doc".to_string()));

        assert!(service.get_draw_by_contest(1).await.unwrap().is_none());

        let queries = store.queries.lock().await;
        // 2701 一次命中，2700 與 1 都查了兩個欄位
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[0].filters, vec![("conteudo.concurso".to_string(), json!(2701))]);
        assert_eq!(queries[2].filters, vec![("metadados.concurso".to_string(), json!(2700))]);
        assert_eq!(queries[2].limit, Some(1));
    }

    #[test]
    fn test_compute_matches_delegates() {
        let service = ResultsService::new(MockStore::default());
        let drawn = NumberSet::from("1,2,3");
        let tickets = vec![NumberSet::from(vec![1u64, 1, 4])];

        let results = service.compute_matches(Some(&drawn), Some(&tickets));
        assert_eq!(results[0].hits, 2);
    }

    #[test]
    fn test_shared_instance_is_reused() {
        let config = FirebaseConfig {
            project_id: "shared-project".to_string(),
            ..FirebaseConfig::default()
        };

        let first = ResultsService::shared(&config);
        let second = ResultsService::shared(&config);

        assert!(std::ptr::eq(first, second));
    }
}
