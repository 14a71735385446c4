//! Ordered collections of presets.
//!
//! A speed dial owns a list of presets, kept sorted by [PresetId] and saved inside the dial's own
//! element. [PresetBank] is that list: it guarantees unique identities, hands out fresh ones, and
//! reads and writes all of its presets at once.
//!
//! ```
//! use speeddial::bank::PresetBank;
//! use speeddial::data::preset::LoadOptions;
//!
//! let bank = PresetBank::from_xml_str(r#"
//!     <SpeedDial>
//!      <Preset ID="7"><Name>Fast</Name><Value>250</Value></Preset>
//!      <Preset ID="2"><Name>Slow</Name><Value>4000</Value></Preset>
//!     </SpeedDial>
//! "#, &LoadOptions::default())?;
//!
//! let names: Vec<_> = bank.iter().map(|preset| preset.name.as_str()).collect();
//! assert_eq!(names, ["Slow", "Fast"]);
//! assert_eq!(bank.next_free_id().map(|id| *id), Some(8));
//! # Ok::<(), speeddial::bank::BankError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, warn};

use crate::data::preset::{LoadOptions, Preset, PresetError, PresetId, PresetTag};
use crate::xml::{XmlElement, XmlError, XmlReader, XmlWriter};

/// Element name used by [PresetBank::to_xml_string] unless told otherwise.
pub const DEFAULT_CONTAINER_TAG: &str = "SpeedDial";

#[derive(thiserror::Error, Debug)]
pub enum BankError {
    #[error("Preset error: {0}")]
    Preset(#[from] PresetError),
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

/// Presets with unique identities, sorted by identity.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(into = "Vec<Preset>", from = "Vec<Preset>")]
pub struct PresetBank {
    presets: Vec<Preset>,
}

impl PresetBank {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Iterate presets in ascending identity order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Preset> {
        self.presets.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Preset] {
        &self.presets
    }

    fn position(&self, id: PresetId) -> Result<usize, usize> {
        self.presets.binary_search_by(|preset| preset.id.cmp(&id))
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        let index = self.position(id).ok()?;
        self.presets.get(index)
    }

    /// Edit the preset with identity `id` in place, returning its identity afterwards.
    ///
    /// `edit` may change the identity; the preset is then moved to its new sorted position and
    /// replaces any preset already holding that identity. `None` if no preset has identity `id`.
    pub fn update(&mut self, id: PresetId, edit: impl FnOnce(&mut Preset)) -> Option<PresetId> {
        let index = self.position(id).ok()?;
        edit(&mut self.presets[index]);

        let new_id = self.presets[index].id;
        if new_id != id {
            let preset = self.presets.remove(index);
            if let Some(replaced) = self.insert(preset) {
                warn!(from = %id, to = %new_id, name = %replaced.name, "Re-keyed speed dial preset replaced an existing one");
            }
        }
        Some(new_id)
    }

    /// Insert `preset` at its sorted position, returning the preset it replaced if one with the
    /// same identity was already present.
    pub fn insert(&mut self, preset: Preset) -> Option<Preset> {
        match self.position(preset.id) {
            Ok(index) => Some(std::mem::replace(&mut self.presets[index], preset)),
            Err(index) => {
                self.presets.insert(index, preset);
                None
            },
        }
    }

    pub fn remove(&mut self, id: PresetId) -> Option<Preset> {
        let index = self.position(id).ok()?;
        Some(self.presets.remove(index))
    }

    /// Identity for a new preset: one past the highest in use, or the lowest unused identity once
    /// the highest possible one is taken. `None` if every identity is in use.
    pub fn next_free_id(&self) -> Option<PresetId> {
        match self.presets.last() {
            None => Some(PresetId::default()),
            Some(last) if last.id.0 < u8::MAX => Some(PresetId(last.id.0 + 1)),
            Some(_) => (u8::MIN..=u8::MAX)
                .map(PresetId)
                .find(|id| self.position(*id).is_err()),
        }
    }

    /// Create a default preset under the [next free identity](Self::next_free_id) and return that
    /// identity. Use [update](Self::update) to fill it in.
    pub fn add_preset(&mut self) -> Option<PresetId> {
        let id = self.next_free_id()?;
        self.insert(Preset::new(id));
        Some(id)
    }

    /// Load every `<Preset>` child of `element`, which `reader` has just returned.
    ///
    /// Loaded presets are added to this bank, replacing existing ones with the same identity.
    /// Presets without an identity are skipped, as are children that are not presets at all.
    pub fn load_xml(
        &mut self,
        reader: &mut XmlReader<'_>,
        element: &XmlElement,
        options: &LoadOptions,
    ) -> Result<(), BankError> {
        if element.is_empty() {
            return Ok(());
        }

        while let Some(child) = reader.read_next_start_element()? {
            if child.name() != PresetTag::Preset.as_str() {
                debug!(tag = %child.name(), "Skipping non-preset element");
                reader.skip_current_element(&child)?;
                continue;
            }

            let mut preset = Preset::new(PresetId::default());
            match preset.load_xml_with(reader, &child, options) {
                Ok(()) => {
                    if let Some(replaced) = self.insert(preset) {
                        warn!(id = %replaced.id, "Duplicate speed dial preset ID, keeping the later one");
                    }
                },
                Err(PresetError::MissingId) => reader.skip_current_element(&child)?,
                Err(error) => return Err(error.into()),
            }
        }

        Ok(())
    }

    /// Write all presets, in identity order, inside a `<container_tag>` element.
    pub fn save_xml<W: Write>(
        &self,
        writer: &mut XmlWriter<W>,
        container_tag: &str,
    ) -> Result<(), XmlError> {
        writer.write_start_element(container_tag, std::iter::empty::<(&str, &str)>())?;
        for preset in &self.presets {
            preset.save_xml(writer)?;
        }
        writer.write_end_element()
    }

    /// Read a bank from the root element of `xml`, whatever its name.
    pub fn from_xml_str(xml: &str, options: &LoadOptions) -> Result<Self, BankError> {
        let mut reader = XmlReader::new(xml);
        let root = reader.read_next_start_element()?
            .ok_or(XmlError::EmptyDocument)?;
        let mut bank = Self::new();
        bank.load_xml(&mut reader, &root, options)?;
        Ok(bank)
    }

    /// Write this bank as a standalone, indented document with an XML declaration.
    pub fn to_xml_string(&self, container_tag: &str) -> Result<String, XmlError> {
        let mut writer = XmlWriter::indented(Vec::new());
        writer.write_declaration()?;
        self.save_xml(&mut writer, container_tag)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

impl From<Vec<Preset>> for PresetBank {
    /// Later presets replace earlier ones with the same identity.
    fn from(presets: Vec<Preset>) -> Self {
        let mut bank = Self::new();
        bank.extend(presets);
        bank
    }
}

impl From<PresetBank> for Vec<Preset> {
    #[inline]
    fn from(bank: PresetBank) -> Self {
        bank.presets
    }
}

impl Extend<Preset> for PresetBank {
    fn extend<T: IntoIterator<Item=Preset>>(&mut self, iter: T) {
        for preset in iter {
            self.insert(preset);
        }
    }
}

impl FromIterator<Preset> for PresetBank {
    fn from_iter<T: IntoIterator<Item=Preset>>(iter: T) -> Self {
        let mut bank = Self::new();
        bank.extend(iter);
        bank
    }
}

impl<'a> IntoIterator for &'a PresetBank {
    type Item = &'a Preset;
    type IntoIter = std::slice::Iter<'a, Preset>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.presets.iter()
    }
}

impl IntoIterator for PresetBank {
    type Item = Preset;
    type IntoIter = std::vec::IntoIter<Preset>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.presets.into_iter()
    }
}
