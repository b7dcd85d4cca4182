//! Live tax calculator behind the `#/calculator` view.

use crate::app::tax::Tax;
use crate::view::ViewController;

pub const FIELD_PROVINCE: &str = "province";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_GST: &str = "gst";
pub const FIELD_PST: &str = "pst";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_TAXES: &str = "taxes";
pub const FIELD_TOTAL: &str = "total";

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub taxes: String,
    pub total: String,
}

/// Rate as displayed in the form, e.g. `5.00%`.
pub fn format_rate(rate: f64) -> String {
    format!("{}%", to_fixed_2(rate))
}

/// Two-decimal rendering that rounds exact ties away from zero, where
/// `{:.2}` would round them to even. `-0` renders as `0.00`.
///
/// A value sits exactly on a `.xx5` tie only when it is an odd number of
/// eighths, so the tie check is exact in binary.
pub fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let cents = (magnitude * 100.0).ceil() as u64;
        return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
    }
    format!("{}{:.2}", sign, magnitude)
}

/// Parse a form number. Blank counts as zero.
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"7.00%"` or `"7"` to `0.07`.
fn parse_percent(value: &str) -> Option<f64> {
    let value = value.trim();
    parse_number(value.strip_suffix('%').unwrap_or(value)).map(|v| v / 100.0)
}

/// Taxes and total for `amount` at the displayed rates, two decimals each.
/// `None` when any input is not a number.
pub fn compute_totals(amount: &str, gst: &str, pst: &str) -> Option<Totals> {
    let amount = parse_number(amount)?;
    let rate = parse_percent(gst)? + parse_percent(pst)?;
    Some(Totals {
        taxes: to_fixed_2(amount * rate),
        total: to_fixed_2(amount * (rate + 1.0)),
    })
}

/// Calculator state: the records the dropdown was built from.
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    taxes: Vec<Tax>,
}

impl CalculatorForm {
    pub fn new(taxes: Vec<Tax>) -> Self {
        Self { taxes }
    }

    /// Select `code` in the dropdown. Unknown codes change nothing.
    pub fn change_province(&self, view: &mut ViewController, code: &str) -> bool {
        let Some(tax) = self.taxes.iter().find(|t| t.code == code) else {
            return false;
        };

        view.set_field(FIELD_PROVINCE, &tax.code);
        view.set_field(FIELD_TYPE, &tax.kind);
        view.set_field(FIELD_GST, &format_rate(tax.gst));
        view.set_field(FIELD_PST, &format_rate(tax.pst));
        self.update_totals(view);
        true
    }

    /// Type into the amount field.
    pub fn change_amount(&self, view: &mut ViewController, amount: &str) {
        view.set_field(FIELD_AMOUNT, amount);
        self.update_totals(view);
    }

    /// Recompute the output fields. Does nothing until a province is chosen.
    pub fn update_totals(&self, view: &mut ViewController) {
        let field = |view: &ViewController, id: &str| view.field(id).unwrap_or_default();
        if field(view, FIELD_PROVINCE).is_empty() {
            return;
        }

        let totals = compute_totals(
            &field(view, FIELD_AMOUNT),
            &field(view, FIELD_GST),
            &field(view, FIELD_PST),
        );
        match totals {
            Some(totals) => {
                view.set_field(FIELD_TAXES, &totals.taxes);
                view.set_field(FIELD_TOTAL, &totals.total);
            }
            None => {
                view.set_field(FIELD_TAXES, "");
                view.set_field(FIELD_TOTAL, "");
            }
        }
    }
}
