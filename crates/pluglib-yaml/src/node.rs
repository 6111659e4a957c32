//! Node access helpers with location-carrying errors.
//!
//! The reader walks the YAML tree by hand (the two-pass parse/link
//! protocol does not fit a derive-based deserializer). These helpers keep
//! the walking code flat: every accessor names the node it was looking at,
//! so a structural error reports `channels[3].rxFrequency` instead of a
//! bare type mismatch.

use pluglib_core::{Error, Result};
use saphyr::Yaml;

/// The node under `key`, as a map entry; `None` when absent.
pub(crate) fn get<'a>(node: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    let value = &node[key];
    if value.is_badvalue() {
        None
    } else {
        Some(value)
    }
}

/// Require `node` to be a map.
pub(crate) fn expect_map<'a>(node: &'a Yaml, location: &str) -> Result<&'a saphyr::Hash> {
    node.as_hash()
        .ok_or_else(|| Error::parse(location, "element is not a map"))
}

/// Require `node` to be a sequence.
pub(crate) fn expect_seq<'a>(node: &'a Yaml, location: &str) -> Result<&'a Vec<Yaml>> {
    node.as_vec()
        .ok_or_else(|| Error::parse(location, "element is not a sequence"))
}

/// Required string field.
pub(crate) fn req_str(node: &Yaml, key: &str, location: &str) -> Result<String> {
    match get(node, key) {
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected a string")),
        None => Err(Error::parse(
            format!("{location}.{key}"),
            "missing required key",
        )),
    }
}

/// Optional string field.
pub(crate) fn opt_str(node: &Yaml, key: &str, location: &str) -> Result<Option<String>> {
    match get(node, key) {
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected a string")),
        None => Ok(None),
    }
}

/// A scalar number, integer or float.
pub(crate) fn as_f64(node: &Yaml) -> Option<f64> {
    node.as_f64().or_else(|| node.as_i64().map(|i| i as f64))
}

/// Required float field (accepts integers).
pub(crate) fn req_f64(node: &Yaml, key: &str, location: &str) -> Result<f64> {
    match get(node, key) {
        Some(v) => {
            as_f64(v).ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected a number"))
        }
        None => Err(Error::parse(
            format!("{location}.{key}"),
            "missing required key",
        )),
    }
}

/// Required integer field.
pub(crate) fn req_i64(node: &Yaml, key: &str, location: &str) -> Result<i64> {
    match get(node, key) {
        Some(v) => v
            .as_i64()
            .ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected an integer")),
        None => Err(Error::parse(
            format!("{location}.{key}"),
            "missing required key",
        )),
    }
}

/// Optional integer field with a default.
pub(crate) fn opt_i64(node: &Yaml, key: &str, location: &str, default: i64) -> Result<i64> {
    match get(node, key) {
        Some(v) => v
            .as_i64()
            .ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected an integer")),
        None => Ok(default),
    }
}

/// Optional boolean field with a default.
pub(crate) fn opt_bool(node: &Yaml, key: &str, location: &str, default: bool) -> Result<bool> {
    match get(node, key) {
        Some(v) => v
            .as_bool()
            .ok_or_else(|| Error::parse(format!("{location}.{key}"), "expected a boolean")),
        None => Ok(default),
    }
}

/// Bounded small unsigned integer (levels, color codes, SSIDs).
pub(crate) fn opt_u8(node: &Yaml, key: &str, location: &str, default: u8, max: u8) -> Result<u8> {
    let value = opt_i64(node, key, location, default as i64)?;
    if value < 0 || value > max as i64 {
        return Err(Error::parse(
            format!("{location}.{key}"),
            format!("{value} is outside 0..={max}"),
        ));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Yaml {
        Yaml::load_from_str(text).unwrap().remove(0)
    }

    #[test]
    fn req_str_present_and_missing() {
        let node = load("name: DB0SP");
        assert_eq!(req_str(&node, "name", "x").unwrap(), "DB0SP");
        let err = req_str(&node, "id", "channels[0]").unwrap_err();
        assert!(err.to_string().contains("channels[0].id"));
        assert!(err.to_string().contains("missing required key"));
    }

    #[test]
    fn req_f64_accepts_integers() {
        let node = load("a: 430\nb: 439.5625");
        assert_eq!(req_f64(&node, "a", "x").unwrap(), 430.0);
        assert_eq!(req_f64(&node, "b", "x").unwrap(), 439.5625);
    }

    #[test]
    fn wrong_type_reports_location() {
        let node = load("rxFrequency: [1, 2]");
        let err = req_f64(&node, "rxFrequency", "channels[2]").unwrap_err();
        assert!(err.to_string().contains("channels[2].rxFrequency"));
    }

    #[test]
    fn opt_u8_bounds() {
        let node = load("colorCode: 16");
        assert!(opt_u8(&node, "colorCode", "x", 0, 15).is_err());
        let node = load("colorCode: 15");
        assert_eq!(opt_u8(&node, "colorCode", "x", 0, 15).unwrap(), 15);
        let node = load("{}");
        assert_eq!(opt_u8(&node, "colorCode", "x", 1, 15).unwrap(), 1);
    }

    #[test]
    fn expect_map_and_seq() {
        let node = load("- 1\n- 2");
        assert!(expect_seq(&node, "x").is_ok());
        assert!(expect_map(&node, "x").is_err());
    }
}
