//! Vendor extension dispatch.
//!
//! Extension blocks attach to the document root under a vendor key (e.g.
//! `tyt`). The reader looks each unknown-but-registered key up in an
//! [`ExtensionRegistry`] and hands the sub-node to the registered codec;
//! the writer asks every codec whether it can serialize the attached
//! extension. Unregistered keys are ignored with a warning, so documents
//! from newer tools stay readable.

use pluglib_core::{ButtonAction, ConfigExtension, Error, Result, TytExtension};
use saphyr::{Hash, Yaml};
use tracing::warn;

use crate::node;

/// Codec for one vendor extension key.
pub struct ExtensionCodec {
    /// The document key this codec owns.
    pub key: &'static str,
    /// Parse the sub-node into a fresh extension object.
    pub parse: fn(&Yaml, &str) -> Result<Box<dyn ConfigExtension>>,
    /// Serialize the extension, or `None` when it is not this codec's
    /// type.
    pub serialize: fn(&dyn ConfigExtension) -> Option<Yaml>,
}

impl std::fmt::Debug for ExtensionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionCodec").field("key", &self.key).finish()
    }
}

/// The set of registered vendor extension codecs.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    codecs: Vec<ExtensionCodec>,
}

impl ExtensionRegistry {
    /// An empty registry (extensions are dropped with a warning).
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    /// The registry with every codec this library ships.
    pub fn with_defaults() -> Self {
        let mut registry = ExtensionRegistry::new();
        registry.register(tyt_codec());
        registry
    }

    /// Register a codec. Later registrations win for a duplicate key.
    pub fn register(&mut self, codec: ExtensionCodec) {
        self.codecs.retain(|c| c.key != codec.key);
        self.codecs.push(codec);
    }

    /// The codec owning `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ExtensionCodec> {
        self.codecs.iter().find(|c| c.key == key)
    }

    /// Parse an extension sub-node; `None` for unregistered keys (after
    /// logging).
    pub fn parse(&self, key: &str, node: &Yaml) -> Result<Option<Box<dyn ConfigExtension>>> {
        match self.get(key) {
            Some(codec) => (codec.parse)(node, key).map(Some),
            None => {
                warn!("ignoring unknown extension key '{key}'");
                Ok(None)
            }
        }
    }

    /// Serialize `ext` through whichever codec accepts it.
    pub fn serialize(&self, ext: &dyn ConfigExtension) -> Option<(&'static str, Yaml)> {
        self.codecs
            .iter()
            .find_map(|c| (c.serialize)(ext).map(|node| (c.key, node)))
    }
}

/// The TyT/Retevis button-settings codec (key `tyt`).
pub fn tyt_codec() -> ExtensionCodec {
    ExtensionCodec {
        key: "tyt",
        parse: parse_tyt,
        serialize: serialize_tyt,
    }
}

fn parse_button(node: &Yaml, key: &str, location: &str) -> Result<ButtonAction> {
    match node::opt_str(node, key, location)? {
        Some(s) => s
            .parse()
            .map_err(|e| Error::parse(format!("{location}.{key}"), format!("{e}"))),
        None => Ok(ButtonAction::Disabled),
    }
}

fn parse_tyt(node: &Yaml, location: &str) -> Result<Box<dyn ConfigExtension>> {
    node::expect_map(node, location)?;
    let buttons = node::get(node, "buttonSettings").unwrap_or(node);
    let ext = TytExtension {
        long_press_duration: node::opt_i64(buttons, "longPressDuration", location, 1000)? as u32,
        side_button1_short: parse_button(buttons, "sideButton1Short", location)?,
        side_button1_long: parse_button(buttons, "sideButton1Long", location)?,
        side_button2_short: parse_button(buttons, "sideButton2Short", location)?,
        side_button2_long: parse_button(buttons, "sideButton2Long", location)?,
    };
    Ok(Box::new(ext))
}

fn serialize_tyt(ext: &dyn ConfigExtension) -> Option<Yaml> {
    let tyt = ext.as_any().downcast_ref::<TytExtension>()?;
    let mut hash = Hash::new();
    hash.insert(
        Yaml::String("longPressDuration".into()),
        Yaml::Integer(tyt.long_press_duration as i64),
    );
    for (key, action) in [
        ("sideButton1Short", tyt.side_button1_short),
        ("sideButton1Long", tyt.side_button1_long),
        ("sideButton2Short", tyt.side_button2_short),
        ("sideButton2Long", tyt.side_button2_long),
    ] {
        hash.insert(Yaml::String(key.into()), Yaml::String(action.to_string()));
    }
    Some(Yaml::Hash(hash))
}
