//! Display/canonical transforms for masked inputs.
//!
//! The engine runs on every keystroke, so it never fails: malformed partial
//! input canonicalizes to `null` and an empty display string. Numeric
//! profiles store a plain number (dot radix) and display with comma radix
//! and dot thousands grouping; pattern profiles store the bare digit string.

use crate::metadata::FormatMask;
use serde_json::Value;

/// Result of feeding one display-edit through the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedValue {
    /// What goes into the form draft / payload.
    pub canonical: Value,
    /// What the input shows.
    pub display: String,
}

impl MaskedValue {
    fn empty() -> Self {
        Self {
            canonical: Value::Null,
            display: String::new(),
        }
    }
}

/// Canonicalize + reformat the raw text currently in the input.
pub fn process(mask: &FormatMask, raw: &str) -> MaskedValue {
    if mask.is_numeric() {
        numeric_process(mask, raw)
    } else {
        let digits = digit_string(raw, pattern_capacity(mask));
        if digits.is_empty() {
            return MaskedValue::empty();
        }
        let display = apply_profile(mask, &digits);
        MaskedValue {
            canonical: Value::String(digits),
            display,
        }
    }
}

/// Format an already-canonical stored value for initial display.
pub fn display_stored(mask: &FormatMask, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(n) => {
            if mask.is_numeric() {
                n.as_f64()
                    .map(|v| decorate(mask, &format_grouped(v, scale_of(mask))))
                    .unwrap_or_default()
            } else {
                apply_profile(mask, &digit_string(&n.to_string(), pattern_capacity(mask)))
            }
        }
        Value::String(s) => {
            if mask.is_numeric() {
                s.parse::<f64>()
                    .ok()
                    .or_else(|| parse_locale_number(s))
                    .map(|v| decorate(mask, &format_grouped(v, scale_of(mask))))
                    .unwrap_or_default()
            } else {
                apply_profile(mask, &digit_string(s, pattern_capacity(mask)))
            }
        }
        _ => String::new(),
    }
}

// ============================================================================
// Numeric profiles
// ============================================================================

fn scale_of(mask: &FormatMask) -> u32 {
    match mask {
        FormatMask::Decimal3 => 3,
        _ => 2,
    }
}

/// Per-keystroke numeric formatting. The integer digits regroup on every
/// edit but the typed radix and fraction digits stay exactly as typed, so
/// appending a character to the displayed text always extends the number.
/// Zero-padded fractions only appear in [`display_stored`].
fn numeric_process(mask: &FormatMask, raw: &str) -> MaskedValue {
    let scale = scale_of(mask) as usize;
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let negative = cleaned.starts_with('-');

    let (int_raw, frac_raw) = match radix_position(&cleaned) {
        Some(pos) => (&cleaned[..pos], Some(&cleaned[pos + 1..])),
        None => (cleaned.as_str(), None),
    };
    let int_digits: String = int_raw.chars().filter(char::is_ascii_digit).collect();
    let frac_digits: Option<String> =
        frac_raw.map(|f| f.chars().filter(char::is_ascii_digit).take(scale).collect());

    if int_digits.is_empty() && frac_digits.as_deref().is_none_or(str::is_empty) {
        return MaskedValue::empty();
    }

    let int_digits = if int_digits.is_empty() {
        "0".to_string()
    } else {
        int_digits
    };
    let magnitude: f64 = format!(
        "{}.{}",
        int_digits,
        frac_digits.as_deref().filter(|f| !f.is_empty()).unwrap_or("0")
    )
    .parse()
    .unwrap_or(0.0);
    let value = if negative { -magnitude } else { magnitude };

    if matches!(mask, FormatMask::Percent2) && !(0.0..=999.99).contains(&value) {
        return numeric_value(mask, value);
    }

    let mut body = String::new();
    if negative {
        body.push('-');
    }
    body.push_str(&group_digits(&int_digits));
    if let Some(frac) = &frac_digits {
        body.push(',');
        body.push_str(frac);
    }
    let canonical = serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    MaskedValue {
        display: decorate(mask, &body),
        canonical,
    }
}

/// A comma always reads as the typed radix. A dot does too, unless three or
/// more digits follow it: then it is grouping, either the engine's own
/// output fed back in or a pasted thousands separator.
fn radix_position(cleaned: &str) -> Option<usize> {
    if let Some(pos) = cleaned.rfind(',') {
        return Some(pos);
    }
    cleaned
        .rfind('.')
        .filter(|&pos| cleaned[pos + 1..].chars().filter(char::is_ascii_digit).count() < 3)
}

fn numeric_value(mask: &FormatMask, v: f64) -> MaskedValue {
    let scale = scale_of(mask);
    let mut v = round_to(v, scale);
    if matches!(mask, FormatMask::Percent2) {
        v = v.clamp(0.0, 999.99);
    }
    let canonical = serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    MaskedValue {
        display: decorate(mask, &format_grouped(v, scale)),
        canonical,
    }
}

fn decorate(mask: &FormatMask, grouped: &str) -> String {
    match mask {
        FormatMask::Currency => format!("R$ {grouped}"),
        FormatMask::Percent2 => format!("{grouped} %"),
        _ => grouped.to_string(),
    }
}

fn round_to(v: f64, scale: u32) -> f64 {
    let factor = 10f64.powi(scale as i32);
    (v * factor).round() / factor
}

/// Parse a locale-formatted amount. When both separators appear, the last
/// one wins as the radix and the rest are grouping; a lone dot is treated as
/// a typed radix, matching how the masked input maps keystrokes.
fn parse_locale_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    let radix_pos = cleaned.rfind(|c| c == ',' || c == '.');
    let mut normalized = String::with_capacity(cleaned.len());
    for (i, c) in cleaned.char_indices() {
        match c {
            ',' | '.' => {
                if Some(i) == radix_pos {
                    normalized.push('.');
                }
            }
            _ => normalized.push(c),
        }
    }
    normalized.parse::<f64>().ok()
}

fn format_grouped(v: f64, scale: u32) -> String {
    let negative = v < 0.0;
    let fixed = format!("{:.*}", scale as usize, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::new();
    for (i, d) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*d);
    }
    out
}

// ============================================================================
// Pattern profiles
// ============================================================================

fn pattern_capacity(mask: &FormatMask) -> usize {
    match mask {
        FormatMask::Cep | FormatMask::Ncm => 8,
        FormatMask::CnpjCpf => 14,
        FormatMask::Phone => 11,
        _ => usize::MAX,
    }
}

fn digit_string(raw: &str, cap: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(cap).collect()
}

fn apply_profile(mask: &FormatMask, digits: &str) -> String {
    let pattern = match mask {
        FormatMask::Cep => "00000-000",
        FormatMask::Ncm => "0000.00.00",
        // Person vs organization document, switched on digit count.
        FormatMask::CnpjCpf => {
            if digits.len() > 11 {
                "00.000.000/0000-00"
            } else {
                "000.000.000-00"
            }
        }
        // Landline vs mobile, switched on digit count.
        FormatMask::Phone => {
            if digits.len() > 10 {
                "(00) 0 0000-0000"
            } else {
                "(00) 0000-0000"
            }
        }
        _ => return digits.to_string(),
    };
    apply_pattern(digits, pattern)
}

fn apply_pattern(digits: &str, pattern: &str) -> String {
    let mut out = String::new();
    let mut source = digits.chars().peekable();
    for slot in pattern.chars() {
        if source.peek().is_none() {
            break;
        }
        if slot == '0' {
            if let Some(d) = source.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_canonicalizes_to_null() {
        for mask in [
            FormatMask::Currency,
            FormatMask::Percent2,
            FormatMask::Decimal2,
            FormatMask::Decimal3,
            FormatMask::Cep,
            FormatMask::Phone,
        ] {
            let out = process(&mask, "");
            assert_eq!(out.canonical, Value::Null, "mask {mask:?}");
            assert_eq!(out.display, "");
        }
    }

    #[test]
    fn unparseable_numeric_input_is_null_not_error() {
        assert_eq!(process(&FormatMask::Decimal2, "abc").canonical, Value::Null);
        assert_eq!(process(&FormatMask::Currency, "-").canonical, Value::Null);
    }

    #[test]
    fn currency_round_trips() {
        let out = process(&FormatMask::Currency, "R$ 1.234,56");
        assert_eq!(out.canonical, json!(1234.56));
        assert_eq!(out.display, "R$ 1.234,56");

        // display(canonical(x)) == x
        let again = display_stored(&FormatMask::Currency, &out.canonical);
        assert_eq!(again, "R$ 1.234,56");
    }

    #[test]
    fn decimal_round_trips() {
        let out = process(&FormatMask::Decimal3, "0,125");
        assert_eq!(out.canonical, json!(0.125));
        assert_eq!(out.display, "0,125");
        assert_eq!(display_stored(&FormatMask::Decimal3, &json!(0.125)), "0,125");
    }

    #[test]
    fn typed_dot_maps_to_radix() {
        let out = process(&FormatMask::Decimal2, "12.5");
        assert_eq!(out.canonical, json!(12.5));
        assert_eq!(out.display, "12,5");
    }

    #[test]
    fn display_grows_with_each_typed_digit() {
        let mut out = process(&FormatMask::Currency, "1");
        assert_eq!(out.display, "R$ 1");
        assert_eq!(out.canonical, json!(1.0));

        for (next, display, value) in [
            ('2', "R$ 12", 12.0),
            ('3', "R$ 123", 123.0),
            ('4', "R$ 1.234", 1234.0),
            (',', "R$ 1.234,", 1234.0),
            ('5', "R$ 1.234,5", 1234.5),
            ('6', "R$ 1.234,56", 1234.56),
        ] {
            out = process(&FormatMask::Currency, &format!("{}{}", out.display, next));
            assert_eq!(out.display, display);
            assert_eq!(out.canonical, json!(value));
        }
    }

    #[test]
    fn fraction_digits_are_not_padded_while_typing() {
        let out = process(&FormatMask::Currency, "R$ 7,5");
        assert_eq!(out.display, "R$ 7,5");
        assert_eq!(out.canonical, json!(7.5));
    }

    #[test]
    fn grouping_dot_is_not_mistaken_for_radix() {
        // engine output fed back in
        assert_eq!(process(&FormatMask::Decimal2, "1.234").canonical, json!(1234.0));
        // pasted value with a short fraction keeps the dot as radix
        assert_eq!(process(&FormatMask::Decimal2, "12.34").canonical, json!(12.34));
    }

    #[test]
    fn percent_is_clamped() {
        let out = process(&FormatMask::Percent2, "1500,00");
        assert_eq!(out.canonical, json!(999.99));
        assert_eq!(out.display, "999,99 %");

        let neg = process(&FormatMask::Percent2, "-5");
        assert_eq!(neg.canonical, json!(0.0));
    }

    #[test]
    fn document_mask_switches_on_length() {
        let cpf = process(&FormatMask::CnpjCpf, "12345678901");
        assert_eq!(cpf.display, "123.456.789-01");
        assert_eq!(cpf.canonical, json!("12345678901"));

        let cnpj = process(&FormatMask::CnpjCpf, "12345678000195");
        assert_eq!(cnpj.display, "12.345.678/0001-95");
        assert_eq!(cnpj.canonical, json!("12345678000195"));
    }

    #[test]
    fn phone_mask_switches_on_length() {
        assert_eq!(process(&FormatMask::Phone, "1133334444").display, "(11) 3333-4444");
        assert_eq!(
            process(&FormatMask::Phone, "11933334444").display,
            "(11) 9 3333-4444"
        );
    }

    #[test]
    fn pattern_formats_partial_input() {
        assert_eq!(process(&FormatMask::Cep, "013").display, "013");
        assert_eq!(process(&FormatMask::Cep, "013101").display, "01310-1");
        assert_eq!(process(&FormatMask::Cep, "01310-100").canonical, json!("01310100"));
    }

    #[test]
    fn stored_number_displays_with_grouping() {
        assert_eq!(
            display_stored(&FormatMask::Currency, &json!(1234.5)),
            "R$ 1.234,50"
        );
        assert_eq!(display_stored(&FormatMask::Decimal2, &json!(1000000)), "1.000.000,00");
        assert_eq!(display_stored(&FormatMask::Currency, &Value::Null), "");
    }
}
