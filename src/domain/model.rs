use crate::utils::error::{Result, ScoutError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roster category the upstream page splits its players into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    U21,
    Nt,
}

impl Group {
    /// Exact wire name only; `"NT"` or `" nt"` are rejected like any other value.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "u21" => Ok(Group::U21),
            "nt" => Ok(Group::Nt),
            _ => Err(ScoutError::InvalidGroup {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::U21 => "u21",
            Group::Nt => "nt",
        }
    }

    pub fn other(&self) -> Group {
        match self {
            Group::U21 => Group::Nt,
            Group::Nt => Group::U21,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transfer-market candidate parsed from the upstream page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub ht_id: u64,
    pub name: String,
    pub country: String,
    pub age_years: Option<u8>,
    pub age_days: Option<u16>,
    pub deadline: Option<String>,
    pub asking_price: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub team: Group,
    pub source: String,
    pub count: usize,
    pub players: Vec<Listing>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub u21: usize,
    pub nt: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub source: String,
    pub updated_at: DateTime<Utc>,
    pub counts: Counts,
    pub u21: Vec<Listing>,
    pub nt: Vec<Listing>,
}

impl TransferReport {
    pub fn new(source: String, u21: Vec<Listing>, nt: Vec<Listing>) -> Self {
        let counts = Counts {
            u21: u21.len(),
            nt: nt.len(),
            total: u21.len() + nt.len(),
        };
        Self {
            source,
            updated_at: Utc::now(),
            counts,
            u21,
            nt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_parse() {
        assert_eq!(Group::parse("u21").unwrap(), Group::U21);
        assert_eq!(Group::parse("nt").unwrap(), Group::Nt);
        assert!(matches!(
            Group::parse("xyz"),
            Err(ScoutError::InvalidGroup { .. })
        ));
        assert!(Group::parse("").is_err());
        assert!(Group::parse("NT").is_err());
        assert!(Group::parse(" nt").is_err());
    }

    #[test]
    fn test_listing_serializes_nulls_in_camel_case() {
        let listing = Listing {
            ht_id: 123456789,
            name: "Andreas Georgiou".to_string(),
            country: "Cyprus".to_string(),
            age_years: None,
            age_days: None,
            deadline: None,
            asking_price: Some("250 000".to_string()),
            url: "https://example.com/p/123456789".to_string(),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["htId"], 123456789);
        assert!(value["ageYears"].is_null());
        assert!(value["deadline"].is_null());
        assert_eq!(value["askingPrice"], "250 000");
    }

    #[test]
    fn test_report_counts() {
        let report = TransferReport::new("https://example.com".to_string(), vec![], vec![]);
        assert_eq!(
            report.counts,
            Counts {
                u21: 0,
                nt: 0,
                total: 0
            }
        );
    }
}
