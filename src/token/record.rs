use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The stored form of an access token: the token plus the instant it stops being valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    #[serde(with = "flexible_timestamp")]
    pub expire: Timestamp,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, expire: Timestamp) -> Self {
        Self {
            token: token.into(),
            expire,
        }
    }

    /// A record is live only while `expire` is strictly after `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expire <= now
    }
}

/// Accepts an RFC 3339 string or integer epoch milliseconds; always writes RFC 3339.
pub(crate) mod flexible_timestamp {
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Timestamp::from_millisecond(ms).map_err(de::Error::custom),
            Raw::Text(text) => text.parse::<Timestamp>().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_java_style_offset_timestamp() {
        let record: TokenRecord = serde_json::from_str(
            r#"{"token":"abc","expire":"2025-03-28T15:21:00.000+00:00"}"#,
        )
        .unwrap();
        assert_eq!(record.token, "abc");
        assert_eq!(record.expire, "2025-03-28T15:21:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn parses_epoch_millis() {
        let record: TokenRecord =
            serde_json::from_str(r#"{"token":"abc","expire":1743175260000}"#).unwrap();
        assert_eq!(record.expire, Timestamp::from_millisecond(1_743_175_260_000).unwrap());
    }

    #[test]
    fn serializes_token_and_expire_only() {
        let expire: Timestamp = "2025-03-28T15:21:00Z".parse().unwrap();
        let value = serde_json::to_value(TokenRecord::new("abc", expire)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"token": "abc", "expire": "2025-03-28T15:21:00Z"})
        );
    }

    #[test]
    fn partial_record_is_rejected() {
        assert!(serde_json::from_str::<TokenRecord>(r#"{"token":"abc"}"#).is_err());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let expire: Timestamp = "2025-03-28T15:21:00Z".parse().unwrap();
        let record = TokenRecord::new("abc", expire);
        assert!(record.is_expired(expire));
        assert!(!record.is_expired(expire - jiff::SignedDuration::from_secs(1)));
    }
}
