use super::*;

#[test]
fn default_palette_has_twelve_valid_entries() {
    let palette = default_palette();
    assert_eq!(palette.len(), 12);
    validate_palette(&palette).unwrap();
    assert_eq!(palette[0].primary, "#6366f1");
    assert_eq!(palette[11].accent, "#bfdbfe");
}

#[test]
fn validation_rejects_empty_and_malformed_palettes() {
    let err = validate_palette(&[]).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));

    let mut palette = default_palette();
    palette[3].primary_dark = "#12".to_string();
    let err = validate_palette(&palette).unwrap_err().to_string();
    assert!(err.contains("palette[3]"), "{err}");
    assert!(err.contains("primaryDark"), "{err}");
}

#[test]
fn theme_colors_serialize_with_camel_case_keys() {
    let json = serde_json::to_value(&default_palette()[0]).unwrap();
    assert_eq!(json["primaryLight"], "#818cf8");
    assert_eq!(json["primaryDark"], "#4f46e5");
}

#[test]
fn css_variable_names() {
    let names: Vec<_> = ThemeProperty::ALL.iter().map(|p| p.css_var()).collect();
    assert_eq!(
        names,
        [
            "--theme-primary",
            "--theme-primary-light",
            "--theme-primary-dark",
            "--theme-accent"
        ]
    );
}

#[test]
fn hue_ordering_starts_at_first_and_keeps_every_entry() {
    let palette = default_palette();
    let sorted = sort_by_hue_similarity(&palette);
    assert_eq!(sorted.len(), palette.len());
    assert_eq!(sorted[0], palette[0]);
    for theme in &palette {
        assert!(sorted.contains(theme));
    }
    // Indigo's nearest neighbour by hue is violet.
    assert_eq!(sorted[1].primary, "#8b5cf6");
}

#[test]
fn blend_models_agree_on_endpoints() {
    for model in [BlendModel::LinearRgb, BlendModel::Hsl] {
        assert_eq!(model.blend("#6366f1", "#8b5cf6", 0.0), "#6366f1");
        assert_eq!(model.blend("#6366f1", "#8b5cf6", 1.0), "#8b5cf6");
    }
    assert_eq!(BlendModel::default(), BlendModel::LinearRgb);
}
