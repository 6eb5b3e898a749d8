//! Name-value pairs attached to objects and avatars.
//!
//! Each line reads `Name TYPE CLASS SENDTO value`; the short form
//! `Name TYPE value` is accepted too. The value runs to the end of the line.

use wire::{DecodeLimits, LimitKind};

use crate::error::{check_limit, CodecResult};

/// Name that marks an object as worn by an avatar.
pub const ATTACH_ITEM_ID: &str = "AttachItemID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameValueType {
    Unknown,
    String,
    F32,
    S32,
    Vec3,
    U32,
    Camera,
    Asset,
    U64,
}

impl NameValueType {
    fn parse(token: &str) -> Self {
        match token {
            "STRING" => Self::String,
            "F32" => Self::F32,
            "S32" => Self::S32,
            "VEC3" => Self::Vec3,
            "U32" => Self::U32,
            "CAMERA" => Self::Camera,
            "ASSET" => Self::Asset,
            "U64" => Self::U64,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameValueClass {
    #[default]
    ReadWrite,
    ReadOnly,
    Callback,
}

impl NameValueClass {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "R" | "READ_ONLY" => Some(Self::ReadOnly),
            "RW" | "READ_WRITE" => Some(Self::ReadWrite),
            "CB" | "CALLBACK" => Some(Self::Callback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameValueSendTo {
    #[default]
    Sim,
    DataSim,
    SimViewer,
    DataSimViewer,
}

impl NameValueSendTo {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "S" | "SIM" => Some(Self::Sim),
            "DS" | "DATA_SIM" => Some(Self::DataSim),
            "SV" | "SIM_VIEWER" => Some(Self::SimViewer),
            "DSV" | "DATA_SIM_VIEWER" => Some(Self::DataSimViewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValue {
    pub name: String,
    pub value_type: NameValueType,
    pub class: NameValueClass,
    pub send_to: NameValueSendTo,
    pub value: String,
}

impl NameValue {
    /// Parses one line. Returns `None` for blank lines.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (name, rest) = split_token(line);
        if name.is_empty() {
            return None;
        }
        let (type_token, mut rest) = split_token(rest);
        let value_type = NameValueType::parse(type_token);

        let mut class = NameValueClass::default();
        let mut send_to = NameValueSendTo::default();
        let (token, after) = split_token(rest);
        if let Some(parsed) = NameValueClass::parse(token) {
            class = parsed;
            rest = after;
            let (token, after) = split_token(rest);
            if let Some(parsed) = NameValueSendTo::parse(token) {
                send_to = parsed;
                rest = after;
            }
        }

        Some(Self {
            name: name.to_owned(),
            value_type,
            class,
            send_to,
            value: rest.to_owned(),
        })
    }
}

fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

/// All name-value pairs of one object, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameValues(Vec<NameValue>);

impl NameValues {
    /// Parses a name-value block, ignoring a trailing NUL.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LimitsExceeded`](crate::CodecError::LimitsExceeded)
    /// when the block has more lines than `limits` allows.
    pub fn parse(raw: &[u8], limits: &DecodeLimits) -> CodecResult<Self> {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim_end_matches('\0');
        let pairs: Vec<NameValue> = text.lines().filter_map(NameValue::parse).collect();
        check_limit(LimitKind::NameValueLines, limits.max_name_values, pairs.len())?;
        Ok(Self(pairs))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NameValue> {
        self.0.iter().find(|nv| nv.name == name)
    }

    /// `true` when the object is worn as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.get(ATTACH_ITEM_ID).is_some()
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.get("FirstName").map(|nv| nv.value.as_str())
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.get("LastName").map(|nv| nv.value.as_str())
    }

    /// `"First Last"` when both names are present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        Some(format!("{} {}", self.first_name()?, self.last_name()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameValue> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_form() {
        let nv = NameValue::parse("FirstName STRING RW SV Ada").unwrap();
        assert_eq!(nv.name, "FirstName");
        assert_eq!(nv.value_type, NameValueType::String);
        assert_eq!(nv.class, NameValueClass::ReadWrite);
        assert_eq!(nv.send_to, NameValueSendTo::SimViewer);
        assert_eq!(nv.value, "Ada");
    }

    #[test]
    fn parse_short_form() {
        let nv = NameValue::parse("Title STRING Hello there").unwrap();
        assert_eq!(nv.value_type, NameValueType::String);
        assert_eq!(nv.class, NameValueClass::ReadWrite);
        assert_eq!(nv.value, "Hello there");
    }

    #[test]
    fn parse_class_without_send_to() {
        let nv = NameValue::parse("Speed F32 R 2.5").unwrap();
        assert_eq!(nv.class, NameValueClass::ReadOnly);
        assert_eq!(nv.send_to, NameValueSendTo::Sim);
        assert_eq!(nv.value, "2.5");
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(NameValue::parse("   ").is_none());
    }

    #[test]
    fn attachment_and_names() {
        let raw = b"AttachItemID STRING RW SV 1234\nFirstName STRING RW DS Ada\nLastName STRING RW DS Lovelace\0";
        let values = NameValues::parse(raw, &DecodeLimits::default()).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.is_attachment());
        assert_eq!(values.full_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn too_many_lines() {
        let raw = "A STRING x\n".repeat(9);
        assert!(NameValues::parse(raw.as_bytes(), &DecodeLimits::for_testing()).is_err());
    }

    #[test]
    fn empty_block() {
        let values = NameValues::parse(b"", &DecodeLimits::default()).unwrap();
        assert!(values.is_empty());
        assert!(!values.is_attachment());
    }
}
