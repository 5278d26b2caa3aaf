//! Popup content for click interactions.

use preview_common::LngLat;
use serde::Serialize;
use serde_json::Value;

use crate::interaction::RenderedFeature;

pub const POPUP_MAX_WIDTH: &str = "300px";
pub const POPUP_CLASS_NAME: &str = "mappreview-mapboxgl-popup";

/// A popup anchored at a geographic coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub lng_lat: LngLat,
    pub html: String,
    pub max_width: String,
    pub class_name: String,
}

impl Popup {
    pub fn new(lng_lat: LngLat, html: String) -> Self {
        Self {
            lng_lat,
            html,
            max_width: POPUP_MAX_WIDTH.to_string(),
            class_name: POPUP_CLASS_NAME.to_string(),
        }
    }
}

/// One section per feature: the layer id and its attributes in order.
pub fn features_html<'a>(features: impl IntoIterator<Item = &'a RenderedFeature>) -> String {
    let mut html = String::new();

    for feature in features {
        html.push_str(&format!("<h3>{}</h3><ul>", escape_html(&feature.layer_id)));
        for (key, value) in &feature.properties {
            html.push_str(&format!(
                "<li>{}: {}</li>",
                escape_html(key),
                escape_html(&display_value(value))
            ));
        }
        html.push_str("</ul>");
    }

    html
}

/// Layer name and sampled band value.
pub fn point_value_html(layer_name: &str, value: f64) -> String {
    format!("<h3>{}</h3><p>Value: {}</p>", escape_html(layer_name), value)
}

/// Strings print bare; everything else prints as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn feature(layer: &str, props: &[(&str, Value)]) -> RenderedFeature {
        RenderedFeature {
            layer_id: layer.to_string(),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn test_features_html_keeps_attribute_order() {
        let f = feature(
            "parcels",
            &[("zeta", json!(1)), ("alpha", json!("x")), ("mid", json!(null))],
        );
        assert_eq!(
            features_html([&f]),
            "<h3>parcels</h3><ul><li>zeta: 1</li><li>alpha: x</li><li>mid: null</li></ul>"
        );
    }

    #[test]
    fn test_features_html_multiple_sections() {
        let a = feature("a", &[("k", json!(true))]);
        let b = feature("b", &[]);
        assert_eq!(
            features_html([&a, &b]),
            "<h3>a</h3><ul><li>k: true</li></ul><h3>b</h3><ul></ul>"
        );
    }

    #[test]
    fn test_values_are_escaped() {
        let f = feature("<x>", &[("name", json!("<script>alert('hi')</script>"))]);
        let html = features_html([&f]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"));
        assert!(html.starts_with("<h3>&lt;x&gt;</h3>"));
    }

    #[test]
    fn test_point_value_html() {
        assert_eq!(point_value_html("dem", 412.5), "<h3>dem</h3><p>Value: 412.5</p>");
    }

    #[test]
    fn test_popup_defaults() {
        let popup = Popup::new(LngLat::new(1.0, 2.0), String::new());
        assert_eq!(popup.max_width, "300px");
        assert_eq!(popup.class_name, "mappreview-mapboxgl-popup");
    }
}
