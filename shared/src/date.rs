//! 时间类型模块
//!
//! 后端返回的时间字段有两种形态：
//! - 带时区的 RFC 3339 字符串（新数据）
//! - 不带时区的 ISO 8601 字符串（从数据库读出的旧数据，语义上为 UTC）
//!
//! `Timestamp` 统一接受这两种格式，并提供巴西利亚时间（UTC-3）的展示格式。

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 巴西利亚时区偏移（秒）
const BRASILIA_OFFSET_SECS: i32 = 3 * 3600;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// UTC 时间戳，序列化为 RFC 3339 字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// 解析 RFC 3339 或无时区的 ISO 8601 字符串
    ///
    /// 无时区的字符串按 UTC 处理。
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    #[inline]
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// 转换为巴西利亚时间
    pub fn to_brasilia(&self) -> DateTime<FixedOffset> {
        // west_opt 仅在偏移超过 ±24h 时返回 None
        let offset = FixedOffset::west_opt(BRASILIA_OFFSET_SECS).unwrap_or(Utc.fix());
        self.0.with_timezone(&offset)
    }

    /// 展示格式：`dd/mm/yyyy HH:MM`（巴西利亚时间）
    pub fn display_brasilia(&self) -> String {
        self.to_brasilia().format("%d/%m/%Y %H:%M").to_string()
    }

    /// 仅日期：`dd/mm/yyyy`（巴西利亚时间）
    pub fn display_date(&self) -> String {
        self.to_brasilia().format("%d/%m/%Y").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_brasilia())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_naive_forms() {
        let aware = Timestamp::parse("2024-03-10T15:30:00+00:00").unwrap();
        let naive = Timestamp::parse("2024-03-10T15:30:00.123000").unwrap();
        assert_eq!(aware.as_utc().timestamp(), naive.as_utc().timestamp());
        assert!(Timestamp::parse("ontem").is_none());
    }

    #[test]
    fn brasilia_display_is_three_hours_behind() {
        let ts = Timestamp::parse("2024-03-10T02:15:00Z").unwrap();
        assert_eq!(ts.display_brasilia(), "09/03/2024 23:15");
        assert_eq!(ts.display_date(), "09/03/2024");
    }

    #[test]
    fn deserializes_from_json_string() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-01T00:00:00\"").unwrap();
        assert_eq!(ts.as_utc().timestamp(), 1_704_067_200);
    }
}
