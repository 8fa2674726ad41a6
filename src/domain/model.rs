use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// 一筆開獎文件，欄位結構由遠端資料庫決定
///
/// 序列化時 `id` 一律是文件 id；`data` 內同名的欄位不會輸出。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DrawRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl DrawRecord {
    pub fn new(id: impl Into<String>, mut data: Map<String, Value>) -> Self {
        let id = id.into();
        if let Some(inner) = data.remove("id") {
            tracing::debug!("Document '{}' carries its own id field {}, dropped", id, inner);
        }
        Self { id, data }
    }

    /// `conteudo` 子文件
    pub fn content(&self) -> Option<&Map<String, Value>> {
        self.data.get("conteudo").and_then(Value::as_object)
    }

    pub fn contest(&self) -> Option<u64> {
        let value = self.content()?.get("concurso")?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    /// 開獎日期，接受 `YYYY-MM-DD` 或 RFC 3339 時間戳
    pub fn draw_date(&self) -> Option<NaiveDate> {
        let raw = self.content()?.get("data_sorteio")?.as_str()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn drawn_set(&self) -> Option<NumberSet> {
        let dezenas = self.content()?.get("dezenas")?;
        match serde_json::from_value(dezenas.clone()) {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::warn!(
                    "⚠️ Draw '{}' has unreadable dezenas {}: {}",
                    self.id,
                    dezenas,
                    e
                );
                None
            }
        }
    }

    pub fn numbers(&self) -> Vec<String> {
        self.drawn_set()
            .map(|set| set.normalized())
            .unwrap_or_default()
    }
}

/// 一組號碼：數字陣列、文字陣列或以逗號分隔的字串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberSet {
    Text(String),
    List(Vec<NumberToken>),
}

impl Serialize for DrawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.data.iter().filter(|(name, _)| name.as_str() != "id");
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 任何 JSON 數字（含 `4.0`、負數）或文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberToken {
    Number(Number),
    Text(String),
}

impl NumberSet {
    /// 轉成可比較的文字形式，順序與重複值保持不變
    pub fn normalized(&self) -> Vec<String> {
        match self {
            NumberSet::Text(text) => text
                .split(',')
                .map(normalize_token)
                .filter(|token| !token.is_empty())
                .collect(),
            NumberSet::List(tokens) => tokens
                .iter()
                .map(|token| match token {
                    NumberToken::Number(n) => normalize_number(n),
                    NumberToken::Text(s) => normalize_token(s),
                })
                .collect(),
        }
    }
}

/// 純數字去掉前導零（"04" 與 4 視為相同），其餘只去空白
pub fn normalize_token(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<u64>() {
            return n.to_string();
        }
    }
    trimmed.to_string()
}

// 整數值的浮點數（4.0）視同整數
fn normalize_number(n: &Number) -> String {
    if n.is_u64() || n.is_i64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

impl From<&str> for NumberSet {
    fn from(text: &str) -> Self {
        NumberSet::Text(text.to_string())
    }
}

impl From<String> for NumberSet {
    fn from(text: String) -> Self {
        NumberSet::Text(text)
    }
}

impl From<Vec<u64>> for NumberSet {
    fn from(numbers: Vec<u64>) -> Self {
        NumberSet::List(numbers.into_iter().map(NumberToken::from).collect())
    }
}

impl From<&[u64]> for NumberSet {
    fn from(numbers: &[u64]) -> Self {
        NumberSet::List(numbers.iter().copied().map(NumberToken::from).collect())
    }
}

impl<const N: usize> From<[u64; N]> for NumberSet {
    fn from(numbers: [u64; N]) -> Self {
        NumberSet::List(numbers.into_iter().map(NumberToken::from).collect())
    }
}

impl From<u64> for NumberToken {
    fn from(n: u64) -> Self {
        NumberToken::Number(Number::from(n))
    }
}

impl From<Vec<String>> for NumberSet {
    fn from(texts: Vec<String>) -> Self {
        NumberSet::List(texts.into_iter().map(NumberToken::Text).collect())
    }
}

impl From<Vec<&str>> for NumberSet {
    fn from(texts: Vec<&str>) -> Self {
        NumberSet::List(
            texts
                .into_iter()
                .map(|s| NumberToken::Text(s.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMatchResult {
    #[serde(rename = "jogo")]
    pub numbers: Vec<String>,
    #[serde(rename = "acertos")]
    pub hits: usize,
    #[serde(rename = "dezenasAcertadas")]
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFrequency {
    #[serde(rename = "dezena")]
    pub number: String,
    #[serde(rename = "frequencia")]
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPeriod {
    #[serde(rename = "inicio")]
    pub start: NaiveDate,
    #[serde(rename = "fim")]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStatistics {
    #[serde(rename = "concursos_analisados")]
    pub draws_analyzed: usize,
    #[serde(rename = "periodo")]
    pub period: Option<DrawPeriod>,
    #[serde(rename = "dezenas_mais_sorteadas")]
    pub most_drawn: Vec<NumberFrequency>,
    #[serde(rename = "dezenas_menos_sorteadas")]
    pub least_drawn: Vec<NumberFrequency>,
}
