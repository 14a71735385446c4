//! Speed dial presets and their XML form.
//!
//! A preset is stored as one element of a project document:
//!
//! ```xml
//! <Preset ID="3">
//!  <Name>Slow</Name>
//!  <Value>2000</Value>
//!  <Input Universe="2" Channel="5" LowerValue="10"/>
//!  <Key>Shift+A</Key>
//! </Preset>
//! ```
//!
//! `Name` and `Value` are always written. `Input` is written only for a valid input source, and
//! its bound attributes only when they differ from `0` and `255`. `Key` is written only when a
//! shortcut is assigned.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Write;
use std::str::FromStr;
use strum::EnumString;
use tracing::{trace, warn};

use super::*;
use crate::data::input::InputSource;
use crate::data::key::KeySequence;
use crate::xml::{XmlElement, XmlError, XmlReader, XmlWriter};

id_type!(
    /// Identity of a preset within its speed dial. Also the sort key.
    PresetId(u8)
);

/// Element names used in the preset schema.
#[derive(EnumString, strum::Display, strum::IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetTag {
    Preset,
    Name,
    Value,
    Input,
    Key,
}

impl PresetTag {
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Attribute names used in the preset schema.
pub mod attr {
    pub const ID: &str = "ID";
    pub const UNIVERSE: &str = "Universe";
    pub const CHANNEL: &str = "Channel";
    pub const LOWER_VALUE: &str = "LowerValue";
    pub const UPPER_VALUE: &str = "UpperValue";
}

/// Errors that can occur when loading a [Preset] from XML.
#[derive(thiserror::Error, Debug)]
pub enum PresetError {
    /// The element handed to the loader is not a preset element.
    #[error("Expected <{expected}> element, found <{found}>")]
    UnexpectedTag {
        expected: &'static str,
        found: String,
    },
    /// The preset element has no `ID` attribute.
    #[error("Speed dial preset ID not found")]
    MissingId,
    /// Numeric text could not be parsed. Only reported with [LoadOptions::strict_numbers].
    #[error("Invalid number for {field}: '{text}'")]
    InvalidNumber {
        field: &'static str,
        text: String,
    },
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

/// Options controlling how presets are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject numeric text that does not parse or does not fit its field.
    ///
    /// When unset (the default), such text silently reads as `0`, and numbers wider than an
    /// 8-bit field are truncated to their low byte. Files written by older consoles rely on this.
    pub strict_numbers: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            strict_numbers: true,
        }
    }

    fn parse_number<N>(&self, field: &'static str, text: &str) -> Result<N, PresetError>
    where
        N: FromStr + Default,
    {
        match text.trim().parse() {
            Ok(number) => Ok(number),
            Err(_) if !self.strict_numbers => {
                trace!(field, text, "Non-numeric text read as 0");
                Ok(N::default())
            },
            Err(_) => Err(PresetError::InvalidNumber {
                field,
                text: text.to_owned(),
            }),
        }
    }

    fn parse_byte(&self, field: &'static str, text: &str) -> Result<u8, PresetError> {
        if self.strict_numbers {
            self.parse_number(field, text)
        } else {
            Ok(self.parse_number::<u32>(field, text)? as u8)
        }
    }
}

/// One speed dial preset.
///
/// Equality compares every field, while ordering (see [cmp_by_id](Self::cmp_by_id)) only looks
/// at the identity, which is why there is no `Ord` impl.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_source: Option<InputSource>,
    #[serde(default, skip_serializing_if = "KeySequence::is_empty")]
    pub key_sequence: KeySequence,
}

impl Preset {
    pub const DEFAULT_VALUE: i32 = 1000;

    /// Create a preset with no name, the default value, no input and no shortcut.
    pub fn new(id: PresetId) -> Self {
        Self {
            id,
            name: String::new(),
            value: Self::DEFAULT_VALUE,
            input_source: None,
            key_sequence: KeySequence::default(),
        }
    }

    /// Order by identity only. Suitable for [`slice::sort_by`].
    #[inline]
    pub fn cmp_by_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }

    /// Whether this preset sorts strictly before `other`.
    #[inline]
    pub fn is_before(&self, other: &Self) -> bool {
        self.id < other.id
    }

    /// Read a preset from the first element of `xml`, with default [LoadOptions].
    ///
    /// ```
    /// use speeddial::data::preset::Preset;
    ///
    /// let preset = Preset::from_xml_str(r#"
    ///     <Preset ID="4">
    ///      <Name>Half time</Name>
    ///      <Value>2000</Value>
    ///      <Input Universe="2" Channel="5" LowerValue="10"/>
    ///     </Preset>
    /// "#)?;
    ///
    /// assert_eq!(*preset.id, 4);
    /// assert_eq!(preset.value, 2000);
    /// let input = preset.input_source.unwrap();
    /// assert_eq!((input.lower_value(), input.upper_value()), (10, 255));
    /// # Ok::<(), speeddial::data::preset::PresetError>(())
    /// ```
    pub fn from_xml_str(xml: &str) -> Result<Self, PresetError> {
        Self::from_xml_str_with(xml, &LoadOptions::default())
    }

    pub fn from_xml_str_with(xml: &str, options: &LoadOptions) -> Result<Self, PresetError> {
        let mut reader = XmlReader::new(xml);
        let element = reader.read_next_start_element()?
            .ok_or(XmlError::EmptyDocument)?;
        let mut preset = Self::new(PresetId::default());
        preset.load_xml_with(&mut reader, &element, options)?;
        Ok(preset)
    }

    /// Load this preset from `element`, which `reader` has just returned, using default
    /// [LoadOptions].
    ///
    /// See [load_xml_with](Self::load_xml_with).
    #[inline]
    pub fn load_xml(
        &mut self,
        reader: &mut XmlReader<'_>,
        element: &XmlElement,
    ) -> Result<(), PresetError> {
        self.load_xml_with(reader, element, &LoadOptions::default())
    }

    /// Load this preset from `element`, which `reader` has just returned.
    ///
    /// Fields present in the element overwrite the current ones; absent fields are left alone.
    /// When a child appears more than once, the last one wins. Unknown children are logged and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Errors with [PresetError::UnexpectedTag] or [PresetError::MissingId] before consuming
    /// anything from `reader`, so the caller can still skip the element. Any other error leaves
    /// the reader in the middle of the element, and the preset should be discarded.
    pub fn load_xml_with(
        &mut self,
        reader: &mut XmlReader<'_>,
        element: &XmlElement,
        options: &LoadOptions,
    ) -> Result<(), PresetError> {
        let expected = PresetTag::Preset.as_str();
        if element.name() != expected {
            warn!(tag = %element.name(), "Speed dial preset node not found");
            return Err(PresetError::UnexpectedTag {
                expected,
                found: element.name().to_owned(),
            });
        }

        let Some(id) = element.attribute(attr::ID) else {
            warn!("Speed dial preset ID not found");
            return Err(PresetError::MissingId);
        };
        self.id = PresetId(options.parse_byte(attr::ID, id)?);

        if element.is_empty() {
            return Ok(());
        }

        while let Some(child) = reader.read_next_start_element()? {
            match child.name().parse::<PresetTag>() {
                Ok(PresetTag::Name) => {
                    self.name = reader.read_element_text(&child)?;
                },
                Ok(PresetTag::Value) => {
                    let text = reader.read_element_text(&child)?;
                    self.value = options.parse_number(PresetTag::Value.as_str(), &text)?;
                },
                Ok(PresetTag::Input) => {
                    self.load_input(&child, options)?;
                    reader.skip_current_element(&child)?;
                },
                Ok(PresetTag::Key) => {
                    let text = reader.read_element_text(&child)?;
                    self.key_sequence = KeySequence::parse_stripped(&text);
                },
                Ok(PresetTag::Preset) | Err(_) => {
                    warn!(tag = %child.name(), "Unknown speed dial preset tag");
                    reader.skip_current_element(&child)?;
                },
            }
        }

        Ok(())
    }

    fn load_input(&mut self, element: &XmlElement, options: &LoadOptions) -> Result<(), PresetError> {
        let (Some(universe), Some(channel)) = (
            element.attribute(attr::UNIVERSE),
            element.attribute(attr::CHANNEL),
        ) else {
            trace!("Input without both universe and channel, ignoring");
            return Ok(());
        };

        let mut input = InputSource::new(
            options.parse_number(attr::UNIVERSE, universe)?,
            options.parse_number(attr::CHANNEL, channel)?,
        );

        let lower_value = match element.attribute(attr::LOWER_VALUE) {
            Some(text) => options.parse_byte(attr::LOWER_VALUE, text)?,
            None => InputSource::DEFAULT_LOWER_VALUE,
        };
        let upper_value = match element.attribute(attr::UPPER_VALUE) {
            Some(text) => options.parse_byte(attr::UPPER_VALUE, text)?,
            None => InputSource::DEFAULT_UPPER_VALUE,
        };
        input.set_range(lower_value, upper_value);

        self.input_source = Some(input);
        Ok(())
    }

    /// Write this preset as one `<Preset>` element.
    ///
    /// The only possible failure is an error from the writer's sink.
    pub fn save_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<(), XmlError> {
        writer.write_start_element(PresetTag::Preset.as_str(), [(attr::ID, self.id.to_string())])?;

        writer.write_text_element(PresetTag::Name.as_str(), &self.name)?;
        writer.write_text_element(PresetTag::Value.as_str(), &self.value.to_string())?;

        if let Some(input) = self.input_source.as_ref().filter(|input| input.is_valid()) {
            let mut attributes = vec![
                (attr::UNIVERSE, input.universe().to_string()),
                (attr::CHANNEL, input.channel().to_string()),
            ];
            if input.lower_value() != InputSource::DEFAULT_LOWER_VALUE {
                attributes.push((attr::LOWER_VALUE, input.lower_value().to_string()));
            }
            if input.upper_value() != InputSource::DEFAULT_UPPER_VALUE {
                attributes.push((attr::UPPER_VALUE, input.upper_value().to_string()));
            }
            writer.write_empty_element(PresetTag::Input.as_str(), attributes)?;
        }

        if !self.key_sequence.is_empty() {
            writer.write_text_element(PresetTag::Key.as_str(), &self.key_sequence.to_string())?;
        }

        writer.write_end_element()
    }

    /// Write this preset into a standalone, indented string.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = XmlWriter::indented(Vec::new());
        self.save_xml(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Free-standing form of [Preset::is_before], for APIs that take a "less than" predicate.
#[inline]
pub fn less_than(left: &Preset, right: &Preset) -> bool {
    left.is_before(right)
}
