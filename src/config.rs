//! 配置模块，负责从JSON描述加载查询

use crate::error::BuildError;
use crate::fragment::{Fragment, Literal};
use crate::functions::{func, time};
use crate::select::{Fill, Order, SelectBuilder};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 查询配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析JSON查询: {0}")]
    Json(#[from] serde_json::Error),

    #[error("无效的时间间隔 {0:?}")]
    InvalidDuration(String),

    #[error("不支持的JSON值: {0}")]
    UnsupportedValue(String),

    #[error("未知的fill策略 {0:?}")]
    UnknownFill(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// SELECT 字段：裸字段名或函数调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Name(String),
    Function {
        function: String,
        field: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        params: Vec<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
}

/// 条件之间的连接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    #[default]
    And,
    Or,
}

/// WHERE 条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    #[serde(default)]
    pub join: Join,
    pub expr: String,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// GROUP BY 项：标签名或时间桶，例如 `{"time": "10m"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupSpec {
    Tag(String),
    Time { time: String },
}

/// ORDER BY 项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub field: String,
    #[serde(default)]
    pub desc: bool,
}

/// fill 策略：数字或 `null` / `none` / `previous` / `linear`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillSpec {
    Int(i64),
    Float(f64),
    Policy(String),
}

/// 完整的查询描述
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub group_by: Vec<GroupSpec>,
    #[serde(default)]
    pub fill: Option<FillSpec>,
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub slimit: Option<u64>,
    #[serde(default)]
    pub soffset: Option<u64>,
}

impl QuerySpec {
    /// 从JSON文件加载查询描述
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析查询描述
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 转换为 SelectBuilder；第一个条件开启 WHERE，其余按 join 连接
    pub fn to_select(&self) -> Result<SelectBuilder, ConfigError> {
        let mut builder = SelectBuilder::new();

        for field in &self.fields {
            builder.field(field_literal(field)?);
        }
        if let Some(from) = &self.from {
            builder.from(from.as_str());
        }

        for (i, condition) in self.conditions.iter().enumerate() {
            let values = condition
                .values
                .iter()
                .map(json_to_value)
                .collect::<Result<Vec<_>, _>>()?;
            match (i, condition.join) {
                (0, _) => builder.filter(condition.expr.as_str(), values),
                (_, Join::And) => builder.and(condition.expr.as_str(), values),
                (_, Join::Or) => builder.or(condition.expr.as_str(), values),
            };
        }

        for group in &self.group_by {
            match group {
                GroupSpec::Tag(tag) => builder.group_by(tag.as_str()),
                GroupSpec::Time { time: interval } => builder.group_by(time(parse_duration(interval)?)),
            };
        }

        if let Some(fill) = &self.fill {
            builder.fill(parse_fill(fill)?);
        }

        for order in &self.order_by {
            let direction = if order.desc { Order::Desc } else { Order::Asc };
            builder.order_by(order.field.as_str(), direction);
        }

        if let Some(n) = self.limit {
            builder.limit(n);
        }
        if let Some(n) = self.offset {
            builder.offset(n);
        }
        if let Some(n) = self.slimit {
            builder.slimit(n);
        }
        if let Some(n) = self.soffset {
            builder.soffset(n);
        }

        Ok(builder)
    }

    /// 加载并直接编译为 InfluxQL
    pub fn compile(&self) -> Result<String, ConfigError> {
        Ok(self.to_select()?.build()?)
    }
}

fn field_literal(field: &FieldSpec) -> Result<Literal, ConfigError> {
    match field {
        FieldSpec::Name(name) => Ok(Literal::from(name.as_str())),
        FieldSpec::Function {
            function,
            field,
            params,
            alias,
        } => {
            let mut args: Vec<Fragment> = vec![Box::new(Literal::from(field.as_str()))];
            for param in params {
                args.push(Box::new(json_to_value(param)?));
            }
            let mut call = func(function.to_ascii_uppercase(), args);
            if let Some(alias) = alias {
                call = call.alias(alias.as_str());
            }
            Ok(Literal::from(call))
        }
    }
}

/// JSON标量转换为绑定值；null、数组和对象不支持
pub fn json_to_value(value: &serde_json::Value) -> Result<Value, ConfigError> {
    use serde_json::Value as Json;

    match value {
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::UInt(u))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(ConfigError::UnsupportedValue(n.to_string()))
            }
        }
        other => Err(ConfigError::UnsupportedValue(other.to_string())),
    }
}

fn parse_fill(fill: &FillSpec) -> Result<Fill, ConfigError> {
    match fill {
        FillSpec::Int(n) => Ok(Fill::Int(*n)),
        FillSpec::Float(x) => Ok(Fill::Float(*x)),
        FillSpec::Policy(p) => match p.to_ascii_lowercase().as_str() {
            "null" => Ok(Fill::Null),
            "none" => Ok(Fill::None),
            "previous" => Ok(Fill::Previous),
            "linear" => Ok(Fill::Linear),
            _ => Err(ConfigError::UnknownFill(p.clone())),
        },
    }
}

/// 解析 `<整数><单位>` 形式的时间间隔，单位支持 ns, us/µs, ms, s, m, h, d, w
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(s.to_string());
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (digits, unit) = trimmed.split_at(split);
    let n: u64 = digits.parse().map_err(|_| invalid())?;

    let nanos_per_unit: u64 = match unit {
        "ns" => 1,
        "us" | "µs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        "d" => 86_400 * 1_000_000_000,
        "w" => 7 * 86_400 * 1_000_000_000,
        _ => return Err(invalid()),
    };

    n.checked_mul(nanos_per_unit)
        .map(Duration::from_nanos)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "fields": [{"function": "mean", "field": "value", "alias": "avg"}, "host"],
        "from": "cpu",
        "conditions": [
            {"expr": "region", "values": ["uswest"]},
            {"join": "or", "expr": "altitude >=", "values": [500]}
        ],
        "group_by": [{"time": "10m"}, "host"],
        "fill": 0,
        "limit": 100
    }"#;

    #[test]
    fn test_load_valid_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let spec = QuerySpec::from_json_file(file.path()).unwrap();
        assert_eq!(spec.from.as_deref(), Some("cpu"));
        assert_eq!(spec.conditions.len(), 2);
        assert_eq!(spec.conditions[1].join, Join::Or);
        assert_eq!(
            spec.compile().unwrap(),
            r#"SELECT MEAN("value") AS "avg", "host" FROM "cpu" WHERE "region" = 'uswest' OR "altitude" >= 500 GROUP BY time(10m), "host" fill(0) LIMIT 100"#
        );
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "invalid json").unwrap();
        assert!(matches!(
            QuerySpec::from_json_file(file.path()),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = QuerySpec::from_json_file(dir.path().join("non_existent_file.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_function_params_and_fill_policy() {
        let spec = QuerySpec::from_json_str(
            r#"{
                "fields": [{"function": "TOP", "field": "water_level", "params": [3]},
                           {"function": "percentile", "field": "x", "params": [99.5]}],
                "from": "h2o_feet",
                "group_by": [{"time": "1h"}],
                "fill": "none",
                "order_by": [{"field": "time", "desc": true}]
            }"#,
        )
        .unwrap();
        assert_eq!(
            spec.compile().unwrap(),
            r#"SELECT TOP("water_level", 3), PERCENTILE("x", 99.5) FROM "h2o_feet" GROUP BY time(1h) fill(none) ORDER BY "time" DESC"#
        );
    }

    #[test]
    fn test_build_errors_surface() {
        let spec = QuerySpec::from_json_str(
            r#"{"fields": ["foo"], "from": "bar", "conditions": [{"expr": "altitude >= x", "values": [1]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            spec.compile(),
            Err(ConfigError::Build(BuildError::UnsupportedShorthandExpression(_)))
        ));
    }

    #[test]
    fn test_unknown_fill_and_bad_values() {
        let spec = QuerySpec::from_json_str(r#"{"fields": ["a"], "fill": "sideways"}"#).unwrap();
        assert!(matches!(spec.to_select(), Err(ConfigError::UnknownFill(_))));

        let spec = QuerySpec::from_json_str(
            r#"{"fields": ["a"], "conditions": [{"expr": "a", "values": [null]}]}"#,
        )
        .unwrap();
        assert!(matches!(spec.to_select(), Err(ConfigError::UnsupportedValue(_))));
    }

    #[test]
    fn test_json_to_value() {
        assert!(matches!(json_to_value(&serde_json::json!("x")).unwrap(), Value::String(s) if s == "x"));
        assert!(matches!(json_to_value(&serde_json::json!(-3)).unwrap(), Value::Int(-3)));
        assert!(matches!(json_to_value(&serde_json::json!(u64::MAX)).unwrap(), Value::UInt(u64::MAX)));
        assert!(matches!(json_to_value(&serde_json::json!(true)).unwrap(), Value::Bool(true)));
        assert!(json_to_value(&serde_json::json!([1, 2])).is_err());
        assert!(json_to_value(&serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("4h").unwrap(), Duration::from_secs(4 * 3600));
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(14 * 86_400));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("10 parsecs").is_err());
    }
}
