use assert_matches::assert_matches;
use speeddial::bank::{BankError, PresetBank};
use speeddial::data::preset::{LoadOptions, Preset, PresetError, PresetId};
use speeddial::xml::XmlReader;
use speeddial::InputSource;

fn named(id: u8, name: &str) -> Preset {
    let mut preset = Preset::new(PresetId(id));
    preset.name = name.to_owned();
    preset
}

fn ids(bank: &PresetBank) -> Vec<u8> {
    bank.iter().map(|preset| *preset.id).collect()
}

#[test]
fn insert_keeps_presets_sorted() {
    let mut bank = PresetBank::new();
    assert!(bank.is_empty());

    for id in [9, 3, 12, 0, 5] {
        assert_eq!(bank.insert(named(id, "")), None);
    }

    assert_eq!(bank.len(), 5);
    assert_eq!(ids(&bank), [0, 3, 5, 9, 12]);
}

#[test]
fn insert_replaces_same_id() {
    let mut bank: PresetBank = vec![named(1, "Old"), named(2, "Other")].into();

    let replaced = bank.insert(named(1, "New"));
    assert_eq!(replaced.map(|preset| preset.name), Some("Old".to_owned()));
    assert_eq!(bank.len(), 2);
    assert_eq!(bank.get(PresetId(1)).unwrap().name, "New");
}

#[test]
fn get_and_remove() {
    let mut bank: PresetBank = [named(4, "Four"), named(8, "Eight")].into_iter().collect();

    assert_eq!(bank.get(PresetId(8)).unwrap().name, "Eight");
    assert!(bank.get(PresetId(5)).is_none());

    assert_eq!(bank.update(PresetId(4), |preset| preset.value = 60), Some(PresetId(4)));
    assert_eq!(bank.get(PresetId(4)).unwrap().value, 60);
    assert_eq!(bank.update(PresetId(5), |preset| preset.value = 1), None);

    assert_eq!(bank.remove(PresetId(4)).map(|preset| preset.name), Some("Four".to_owned()));
    assert!(bank.remove(PresetId(4)).is_none());
    assert_eq!(ids(&bank), [8]);
}

#[test]
fn next_free_id() {
    let mut bank = PresetBank::new();
    assert_eq!(bank.next_free_id(), Some(PresetId(0)));

    bank.insert(named(0, ""));
    bank.insert(named(6, ""));
    assert_eq!(bank.next_free_id(), Some(PresetId(7)));

    bank.insert(named(255, ""));
    assert_eq!(bank.next_free_id(), Some(PresetId(1)));

    let full: PresetBank = (0..=u8::MAX).map(|id| named(id, "")).collect();
    assert_eq!(full.len(), 256);
    assert_eq!(full.next_free_id(), None);
}

#[test]
fn add_preset_uses_next_free_id() {
    let mut bank: PresetBank = vec![named(2, "")].into();

    let added = bank.add_preset().unwrap();
    assert_eq!(added, PresetId(3));
    assert_eq!(bank.get(added).unwrap().value, Preset::DEFAULT_VALUE);
    bank.update(added, |preset| preset.name = "Added".to_owned());

    assert_eq!(bank.get(PresetId(3)).unwrap().name, "Added");
}

#[test]
fn update_can_change_identity() {
    let mut bank: PresetBank = vec![named(1, "One"), named(5, "Five")].into();

    let moved = bank.update(PresetId(1), |preset| preset.id = PresetId(9));
    assert_eq!(moved, Some(PresetId(9)));
    assert_eq!(ids(&bank), [5, 9]);
    assert!(bank.get(PresetId(1)).is_none());
    assert_eq!(bank.get(PresetId(9)).unwrap().name, "One");

    assert_eq!(bank.insert(named(9, "Nine")).map(|preset| preset.name), Some("One".to_owned()));
    assert_eq!(ids(&bank), [5, 9]);

    bank.update(PresetId(5), |preset| preset.id = PresetId(9));
    assert_eq!(ids(&bank), [9]);
    assert_eq!(bank.get(PresetId(9)).unwrap().name, "Five");
}

#[test]
fn load_skips_broken_and_foreign_children() {
    let bank = PresetBank::from_xml_str(r#"<?xml version="1.0" encoding="UTF-8"?>
        <SpeedDial Caption="Tempo">
         <Time>500</Time>
         <Preset ID="4"><Name>Four</Name></Preset>
         <Preset><Name>No identity</Name><Value>1</Value></Preset>
         <Preset ID="1"><Name>One</Name><Input Universe="0" Channel="3"/></Preset>
         <Infinite/>
        </SpeedDial>
    "#, &LoadOptions::default()).unwrap();

    assert_eq!(ids(&bank), [1, 4]);
    assert_eq!(bank.get(PresetId(1)).unwrap().input_source, Some(InputSource::new(0, 3)));
}

#[test]
fn load_duplicate_ids_keep_later_preset() {
    let bank = PresetBank::from_xml_str(r#"
        <SpeedDial>
         <Preset ID="2"><Name>Earlier</Name></Preset>
         <Preset ID="2"><Name>Later</Name></Preset>
        </SpeedDial>
    "#, &LoadOptions::default()).unwrap();

    assert_eq!(bank.len(), 1);
    assert_eq!(bank.get(PresetId(2)).unwrap().name, "Later");
}

#[test]
fn load_strict_number_error_is_fatal() {
    let result = PresetBank::from_xml_str(
        r#"<SpeedDial><Preset ID="1"><Value>soon</Value></Preset></SpeedDial>"#,
        &LoadOptions::strict(),
    );
    assert_matches!(result, Err(BankError::Preset(PresetError::InvalidNumber { .. })));
}

#[test]
fn load_from_nested_container() {
    let mut reader = XmlReader::new(r#"
        <VirtualConsole>
         <SpeedDial><Preset ID="3"/></SpeedDial>
         <Button/>
        </VirtualConsole>
    "#);
    let _console = reader.read_next_start_element().unwrap().unwrap();
    let dial = reader.read_next_start_element().unwrap().unwrap();

    let mut bank = PresetBank::new();
    bank.load_xml(&mut reader, &dial, &LoadOptions::default()).unwrap();
    assert_eq!(ids(&bank), [3]);

    let next = reader.read_next_start_element().unwrap().unwrap();
    assert_eq!(next.name(), "Button");
}

#[test]
fn save_round_trip() {
    let mut slow = named(2, "Slow");
    slow.value = 4000;
    slow.key_sequence = "S".parse().unwrap();
    let mut fast = named(1, "Fast");
    fast.value = 125;
    fast.input_source = Some(InputSource::new(1, 64).with_range(0, 100));
    let bank: PresetBank = vec![slow, fast].into();

    let xml = bank.to_xml_string("Dial").unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains("<Dial>"));
    assert!(xml.find(r#"ID="1""#).unwrap() < xml.find(r#"ID="2""#).unwrap());

    let loaded = PresetBank::from_xml_str(&xml, &LoadOptions::default()).unwrap();
    assert_eq!(loaded, bank);
}

#[test]
fn serde_json_is_a_sorted_list() {
    let bank: PresetBank = vec![named(5, "b"), named(1, "a")].into();
    let json = serde_json::to_value(&bank).unwrap();
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[1]["id"], 5);

    let unsorted = serde_json::json!([
        { "id": 9, "name": "z", "value": 1 },
        { "id": 3, "name": "y", "value": 2 },
    ]);
    let parsed: PresetBank = serde_json::from_value(unsorted).unwrap();
    assert_eq!(ids(&parsed), [3, 9]);
}
