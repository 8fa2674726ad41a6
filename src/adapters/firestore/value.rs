// Firestore REST typed values <-> plain JSON.
//
// The REST API wraps every field as `{ "<kind>Value": ... }`; draw records are
// handed to callers as ordinary JSON maps.

use crate::utils::error::{Result, ResultsError};
use serde_json::{json, Map, Value};

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(name, value)| Ok::<_, ResultsError>((name.clone(), decode_value(value)?)))
        .collect()
}

pub fn decode_value(value: &Value) -> Result<Value> {
    let obj = value.as_object().ok_or_else(|| decode_error(format!(
        "expected a typed value object, got {}",
        value
    )))?;

    let (kind, inner) = match obj.iter().next() {
        Some(entry) if obj.len() == 1 => entry,
        _ => {
            return Err(decode_error(format!(
                "typed value must have exactly one field, got {}",
                obj.len()
            )))
        }
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        // int64 以十進位字串傳送
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| decode_error(format!("invalid integerValue '{}': {}", s, e))),
            Value::Number(_) => Ok(inner.clone()),
            other => Err(decode_error(format!("invalid integerValue {}", other))),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => {
            let coordinate = |name: &str| inner.get(name).cloned().unwrap_or(Value::from(0.0));
            let mut point = Map::new();
            point.insert("latitude".to_string(), coordinate("latitude"));
            point.insert("longitude".to_string(), coordinate("longitude"));
            Ok(Value::Object(point))
        }
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Some(other) => Err(decode_error(format!("invalid arrayValue.values {}", other))),
            None => Ok(Value::Array(Vec::new())),
        },
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(other) => Err(decode_error(format!("invalid mapValue.fields {}", other))),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(decode_error(format!("unknown value kind '{}'", other))),
    }
}

/// 把一般 JSON 包成 Firestore 的 typed value，用於查詢條件
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({
            "mapValue": {
                "fields": fields
                    .iter()
                    .map(|(name, v)| (name.clone(), encode_value(v)))
                    .collect::<Map<String, Value>>()
            }
        }),
    }
}

/// `projects/p/databases/d/documents/col/ID` 的最後一段
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn decode_error(message: String) -> ResultsError {
    ResultsError::DecodeError { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({"nullValue": null})).unwrap(), Value::Null);
        assert_eq!(decode_value(&json!({"booleanValue": true})).unwrap(), json!(true));
        assert_eq!(decode_value(&json!({"integerValue": "2701"})).unwrap(), json!(2701));
        assert_eq!(decode_value(&json!({"doubleValue": 1.5})).unwrap(), json!(1.5));
        assert_eq!(
            decode_value(&json!({"timestampValue": "2024-03-20T23:00:00Z"})).unwrap(),
            json!("2024-03-20T23:00:00Z")
        );
    }

    #[test]
    fn test_decode_nested_draw_document() {
        let fields = json!({
            "url": {"stringValue": "https://loterias.caixa.gov.br/Paginas/Mega-Sena.aspx"},
            "conteudo": {"mapValue": {"fields": {
                "concurso": {"integerValue": "2701"},
                "data_sorteio": {"stringValue": "2024-03-20"},
                "dezenas": {"arrayValue": {"values": [
                    {"stringValue": "04"},
                    {"stringValue": "15"}
                ]}},
                "acumulado": {"booleanValue": false},
                "premiacao": {"mapValue": {}}
            }}},
            "local": {"geoPointValue": {"latitude": -23.55}}
        });

        let decoded = decode_fields(fields.as_object().unwrap()).unwrap();

        assert_eq!(
            Value::Object(decoded),
            json!({
                "url": "https://loterias.caixa.gov.br/Paginas/Mega-Sena.aspx",
                "conteudo": {
                    "concurso": 2701,
                    "data_sorteio": "2024-03-20",
                    "dezenas": ["04", "15"],
                    "acumulado": false,
                    "premiacao": {}
                },
                "local": {"latitude": -23.55, "longitude": 0.0}
            })
        );
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        assert!(decode_value(&json!({"vectorValue": {}})).is_err());
        assert!(decode_value(&json!({"integerValue": "twelve"})).is_err());
        assert!(decode_value(&json!("plain")).is_err());
    }

    #[test]
    fn test_encode_filter_values() {
        assert_eq!(encode_value(&json!(2701)), json!({"integerValue": "2701"}));
        assert_eq!(encode_value(&json!("04")), json!({"stringValue": "04"}));
        assert_eq!(encode_value(&json!(1.5)), json!({"doubleValue": 1.5}));

        let nested = json!({"concurso": 2701, "dezenas": ["04"]});
        assert_eq!(decode_value(&encode_value(&nested)).unwrap(), nested);
    }

    #[test]
    fn test_document_id() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/scraping_results/Xy12"),
            "Xy12"
        );
        assert_eq!(document_id("Xy12"), "Xy12");
    }
}
