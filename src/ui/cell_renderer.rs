use anyhow::{Context, Result};
use regex::Regex;

use crate::config::config::{DisplayConfig, IconConfig};
use crate::data::datatable::DataValue;

/// Fraction digits kept when grouping floats
const MAX_FRACTION_DIGITS: usize = 3;

/// How a single cell is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedCell {
    /// String value naming an image file
    Image(String),
    /// Numeric value with digit grouping applied
    Number(String),
    /// Anything else, as raw text
    Text(String),
    /// Row has no value for this column
    Empty,
}

impl RenderedCell {
    /// Plain text used on the terminal surface
    pub fn display_text(&self, icons: &IconConfig) -> String {
        match self {
            RenderedCell::Image(reference) => format!("{} {}", icons.image, reference),
            RenderedCell::Number(text) | RenderedCell::Text(text) => text.clone(),
            RenderedCell::Empty => String::new(),
        }
    }
}

/// Insert `separator` between every group of three digits of an unsigned digit string
pub fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Applies the cell presentation policy: image suffix, then number, then text
pub struct CellRenderer {
    image_pattern: Option<Regex>,
    thousands_separator: String,
    decimal_separator: String,
    icons: IconConfig,
}

impl CellRenderer {
    pub fn new(display: &DisplayConfig) -> Result<Self> {
        let suffixes: Vec<String> = display
            .image_suffixes
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(s))
            .collect();

        let image_pattern = if suffixes.is_empty() {
            None
        } else {
            let pattern = format!("(?i)(?:{})$", suffixes.join("|"));
            Some(Regex::new(&pattern).context("Invalid image suffix pattern")?)
        };

        Ok(Self {
            image_pattern,
            thousands_separator: display.thousands_separator.clone(),
            decimal_separator: display.decimal_separator.clone(),
            icons: display.icons.clone(),
        })
    }

    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    pub fn is_image_reference(&self, text: &str) -> bool {
        self.image_pattern
            .as_ref()
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    }

    /// Render the value a row holds for a column; `None` means the key is missing
    pub fn render(&self, value: Option<&DataValue>) -> RenderedCell {
        let Some(value) = value else {
            return RenderedCell::Empty;
        };

        match value {
            DataValue::String(s) if self.is_image_reference(s) => RenderedCell::Image(s.clone()),
            DataValue::Integer(i) => RenderedCell::Number(self.format_integer(*i)),
            DataValue::Float(f) => RenderedCell::Number(self.format_float(*f)),
            other => RenderedCell::Text(other.to_string()),
        }
    }

    pub fn format_integer(&self, value: i64) -> String {
        let digits = group_digits(&value.unsigned_abs().to_string(), &self.thousands_separator);
        if value < 0 {
            format!("-{}", digits)
        } else {
            digits
        }
    }

    /// Group the integer part and keep at most three fraction digits, trailing
    /// zeros dropped
    pub fn format_float(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let text = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let frac_part = frac_part.trim_end_matches('0');
        let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();

        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, &self.thousands_separator));
        if !frac_part.is_empty() {
            out.push_str(&self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> CellRenderer {
        CellRenderer::new(&DisplayConfig::default()).unwrap()
    }

    #[test]
    fn test_image_reference() {
        let r = renderer();
        assert_eq!(
            r.render(Some(&DataValue::from("flag.png"))),
            RenderedCell::Image("flag.png".to_string())
        );
        assert_eq!(
            r.render(Some(&DataValue::from("FLAG.PNG"))),
            RenderedCell::Image("FLAG.PNG".to_string())
        );
        assert_eq!(
            r.render(Some(&DataValue::from("png"))),
            RenderedCell::Text("png".to_string())
        );
    }

    #[test]
    fn test_number_grouping() {
        let r = renderer();
        assert_eq!(
            r.render(Some(&DataValue::Integer(1234567))),
            RenderedCell::Number("1,234,567".to_string())
        );
        assert_eq!(r.format_integer(999), "999");
        assert_eq!(r.format_integer(-1000), "-1,000");
        assert_eq!(r.format_integer(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_float_grouping() {
        let r = renderer();
        assert_eq!(r.format_float(-1234.5), "-1,234.5");
        assert_eq!(r.format_float(1234.56789), "1,234.568");
        assert_eq!(r.format_float(3.0), "3");
        assert_eq!(r.format_float(-0.0001), "0");
        assert_eq!(r.format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_custom_separators() {
        let display = DisplayConfig {
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            ..DisplayConfig::default()
        };
        let r = CellRenderer::new(&display).unwrap();
        assert_eq!(r.format_float(1234567.25), "1.234.567,25");
    }

    #[test]
    fn test_text_and_missing() {
        let r = renderer();
        assert_eq!(
            r.render(Some(&DataValue::from("Texas"))),
            RenderedCell::Text("Texas".to_string())
        );
        assert_eq!(
            r.render(Some(&DataValue::Boolean(true))),
            RenderedCell::Text("true".to_string())
        );
        assert_eq!(r.render(Some(&DataValue::Null)), RenderedCell::Text(String::new()));
        assert_eq!(r.render(None), RenderedCell::Empty);
    }

    #[test]
    fn test_no_image_suffixes() {
        let display = DisplayConfig {
            image_suffixes: Vec::new(),
            ..DisplayConfig::default()
        };
        let r = CellRenderer::new(&display).unwrap();
        assert_eq!(
            r.render(Some(&DataValue::from("flag.png"))),
            RenderedCell::Text("flag.png".to_string())
        );
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", ","), "1");
        assert_eq!(group_digits("1000", ","), "1,000");
        assert_eq!(group_digits("123456", " "), "123 456");
    }
}
