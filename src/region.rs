//! Regions are the selectable geographic entities: the aggregate region, its provinces and their
//! municipalities.
use crate::id::define_id_type;
use anyhow::{Result, bail, ensure};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::EnumIter;

define_id_type! {ProvinceID}
define_id_type! {MunicipalityID}

/// The encoding of the aggregate region's key
const AGGREGATE_ENCODING: &str = "agg";

/// Prefix used when encoding a province key
const PROVINCE_PREFIX: &str = "prov";

/// Prefix used when encoding a municipality key
const MUNICIPALITY_PREFIX: &str = "mun";

/// The kind of a selectable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum RegionCategory {
    /// The single top-level region
    #[display("aggregate")]
    Aggregate,
    /// A province
    #[display("province")]
    Province,
    /// A municipality
    #[display("municipality")]
    Municipality,
}

/// Identifies a selectable region.
///
/// The string form (`"agg"`, `"prov:<name>"`, `"mun:<name>"`) doubles as an identifier for UI
/// elements, so distinct keys always have distinct encodings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum RegionKey {
    /// The top-level region
    #[display("agg")]
    Aggregate,
    /// A province, identified by name
    #[display("prov:{_0}")]
    Province(ProvinceID),
    /// A municipality, identified by name
    #[display("mun:{_0}")]
    Municipality(MunicipalityID),
}

impl RegionKey {
    /// Create a key for the named province
    pub fn province(name: &str) -> Self {
        Self::Province(name.into())
    }

    /// Create a key for the named municipality
    pub fn municipality(name: &str) -> Self {
        Self::Municipality(name.into())
    }

    /// The category this key belongs to
    pub fn category(&self) -> RegionCategory {
        match self {
            Self::Aggregate => RegionCategory::Aggregate,
            Self::Province(_) => RegionCategory::Province,
            Self::Municipality(_) => RegionCategory::Municipality,
        }
    }

    /// The region's own name, if it has one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Aggregate => None,
            Self::Province(id) => Some(id.as_str()),
            Self::Municipality(id) => Some(id.as_str()),
        }
    }
}

impl FromStr for RegionKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == AGGREGATE_ENCODING {
            return Ok(Self::Aggregate);
        }

        let Some((prefix, name)) = s.split_once(':') else {
            bail!("Invalid region key: {s}");
        };
        ensure!(!name.is_empty(), "Region key has an empty name: {s}");

        match prefix {
            PROVINCE_PREFIX => Ok(Self::province(name)),
            MUNICIPALITY_PREFIX => Ok(Self::municipality(name)),
            _ => bail!("Unknown region key prefix '{prefix}' in {s}"),
        }
    }
}

impl Serialize for RegionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case(RegionKey::Aggregate, "agg")]
    #[case(RegionKey::province("Antwerpen"), "prov:Antwerpen")]
    #[case(RegionKey::municipality("Sint-Niklaas"), "mun:Sint-Niklaas")]
    fn test_region_key_encoding(#[case] key: RegionKey, #[case] encoded: &str) {
        assert_eq!(key.to_string(), encoded);
        assert_eq!(encoded.parse::<RegionKey>().unwrap(), key);
    }

    #[test]
    fn test_region_key_same_name_different_category() {
        let prov = RegionKey::province("Antwerpen");
        let mun = RegionKey::municipality("Antwerpen");
        assert_ne!(prov, mun);
        assert_ne!(prov.to_string(), mun.to_string());
    }

    #[test]
    fn test_region_key_name_with_colon() {
        let key: RegionKey = "mun:a:b".parse().unwrap();
        assert_eq!(key, RegionKey::municipality("a:b"));
    }

    #[rstest]
    #[case("", "Invalid region key: ")]
    #[case("aggregate", "Invalid region key: aggregate")]
    #[case("prov:", "Region key has an empty name: prov:")]
    #[case("gem:Gent", "Unknown region key prefix 'gem' in gem:Gent")]
    fn test_region_key_parse_invalid(#[case] input: &str, #[case] msg: &str) {
        assert_error!(input.parse::<RegionKey>(), msg);
    }

    #[test]
    fn test_region_key_category() {
        assert_eq!(RegionKey::Aggregate.category(), RegionCategory::Aggregate);
        assert_eq!(
            RegionKey::province("Limburg").category(),
            RegionCategory::Province
        );
        assert_eq!(
            RegionKey::municipality("Hasselt").category(),
            RegionCategory::Municipality
        );
    }

    #[test]
    fn test_region_key_serde() {
        let key = RegionKey::province("Limburg");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"prov:Limburg\"");
        assert_eq!(serde_json::from_str::<RegionKey>(&json).unwrap(), key);
    }
}
