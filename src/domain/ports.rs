use crate::domain::model::DrawRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// 單一集合上的等值篩選、排序與筆數限制查詢；多個篩選條件以 AND 組合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub collection: String,
    pub filters: Vec<(String, Value)>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<u32>,
}

impl CollectionQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn where_eq(mut self, field_path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field_path.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field_path: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field_path.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn run_query(&self, query: &CollectionQuery) -> Result<Vec<DrawRecord>>;

    /// 找不到文件時回傳 `Ok(None)`
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<DrawRecord>>;
}
