use serde_json::{Map, Number, Value};

/// Substitute `{{ key }}` placeholders with values from `context`.
///
/// Strings are inserted as-is and numbers in their shortest decimal form.
/// Any other value, or a missing key, leaves the placeholder untouched so
/// partially filled templates can be composed. Inserted text is not
/// re-scanned.
pub fn supplant(template: &str, context: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match match_placeholder(candidate) {
            Some((len, key)) => {
                match context.get(key).and_then(scalar_text) {
                    Some(text) => out.push_str(&text),
                    None => out.push_str(&candidate[..len]),
                }
                rest = &candidate[len..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Match `{{`, spaces, key, spaces, `}}` at the start of `s`.
/// Returns the matched length and the key.
fn match_placeholder(s: &str) -> Option<(usize, &str)> {
    let body = s.strip_prefix("{{")?;
    let after_lead = body.trim_start_matches(' ');
    let lead = body.len() - after_lead.len();

    let key_len = after_lead
        .find(|c| matches!(c, '{' | '}' | ' '))
        .unwrap_or(after_lead.len());
    let key = &after_lead[..key_len];

    let tail = &after_lead[key_len..];
    let after_trail = tail.trim_start_matches(' ');
    let trail = tail.len() - after_trail.len();

    after_trail
        .starts_with("}}")
        .then_some((2 + lead + key_len + trail + 2, key))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Shortest round-trip form, as JavaScript prints numbers: `5.0` renders as
/// `5`, `-0.0` as `0`, and magnitudes below `1e-6` or from `1e21` up in
/// exponent form (`1e-7`, `1.5e+21`).
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.abs() < 1e-6 || f.abs() >= 1e21 => exponent_text(f),
        Some(f) if f.fract() == 0.0 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn exponent_text(f: f64) -> String {
    let text = format!("{:e}", f);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}
