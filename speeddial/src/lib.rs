//! Speed dial presets for lighting consoles.
//!
//! A speed dial sets a tempo (or any other time value) for the console. Its presets are named
//! values the operator can recall with one click, with an external input such as a MIDI or DMX
//! channel, or with a keyboard shortcut. This crate holds those presets and reads and writes them
//! in the console's XML project format.
//!
//! # Presets
//!
//! ```
//! use speeddial::data::input::InputSource;
//! use speeddial::data::preset::{Preset, PresetId};
//!
//! let mut preset = Preset::new(PresetId(1));
//! preset.name = "Slow".to_owned();
//! preset.value = 2000;
//! preset.input_source = Some(InputSource::new(0, 12));
//! preset.key_sequence = "Shift+S".parse()?;
//!
//! let xml = preset.to_xml_string()?;
//! assert_eq!(xml, r#"<Preset ID="1">
//!  <Name>Slow</Name>
//!  <Value>2000</Value>
//!  <Input Universe="0" Channel="12"/>
//!  <Key>Shift+S</Key>
//! </Preset>"#);
//!
//! assert_eq!(Preset::from_xml_str(&xml)?, preset);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Loading inside a larger document
//!
//! Presets are usually embedded in another widget's element. The [xml::XmlReader] walks such a
//! document one element at a time, and [Preset::load_xml](data::preset::Preset::load_xml) takes
//! over once a `<Preset>` element is reached:
//!
//! ```
//! use speeddial::data::preset::{Preset, PresetId};
//! use speeddial::xml::XmlReader;
//!
//! let mut reader = XmlReader::new(r#"<SpeedDial><Preset ID="3"><Value>500</Value></Preset></SpeedDial>"#);
//! let _dial = reader.read_next_start_element()?.unwrap();
//! let element = reader.read_next_start_element()?.unwrap();
//!
//! let mut preset = Preset::new(PresetId::default());
//! preset.load_xml(&mut reader, &element)?;
//! assert_eq!((*preset.id, preset.value), (3, 500));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Whole lists of presets are handled by [bank::PresetBank].

pub mod bank;
pub mod data;
pub mod xml;

pub use bank::{BankError, PresetBank};
pub use data::input::InputSource;
pub use data::key::KeySequence;
pub use data::preset::{LoadOptions, Preset, PresetError, PresetId};
pub use xml::XmlError;
