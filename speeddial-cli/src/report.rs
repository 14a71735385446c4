use speeddial::{InputSource, Preset, PresetBank};

fn describe_input(input: Option<&InputSource>) -> String {
    match input {
        Some(input) if input.is_valid() => {
            let mut text = format!("{}:{}", input.universe(), input.channel());
            if !input.has_default_range() {
                text.push_str(&format!(" [{}..{}]", input.lower_value(), input.upper_value()));
            }
            text
        },
        Some(_) => "invalid".to_owned(),
        None => "-".to_owned(),
    }
}

fn row(preset: &Preset) -> String {
    let key = if preset.key_sequence.is_empty() {
        "-".to_owned()
    } else {
        preset.key_sequence.to_string()
    };
    format!(
        "{:>3}  {:<20}  {:>8}  {:<16}  {}\n",
        preset.id,
        preset.name,
        preset.value,
        describe_input(preset.input_source.as_ref()),
        key,
    )
}

/// One line per preset, in identity order, under a header.
pub fn table(bank: &PresetBank) -> String {
    let mut table = format!("{:>3}  {:<20}  {:>8}  {:<16}  {}\n", "ID", "Name", "Value", "Input", "Key");
    for preset in bank {
        table.push_str(&row(preset));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use speeddial::PresetId;

    #[test]
    fn test_describe_input() {
        assert_eq!(describe_input(None), "-");
        assert_eq!(describe_input(Some(&InputSource::new(1, 7))), "1:7");
        assert_eq!(describe_input(Some(&InputSource::new(1, 7).with_range(10, 200))), "1:7 [10..200]");
        assert_eq!(describe_input(Some(&InputSource::new(InputSource::INVALID_UNIVERSE, 7))), "invalid");
    }

    #[test]
    fn test_table_lists_presets_in_order() {
        let mut second = Preset::new(PresetId(9));
        second.name = "Fast".to_owned();
        let mut first = Preset::new(PresetId(2));
        first.name = "Slow".to_owned();
        let bank: PresetBank = vec![second, first].into();

        let table = table(&bank);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Slow"));
        assert!(lines[2].contains("Fast"));
    }
}
