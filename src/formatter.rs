// ============================================================================
// Quantity Formatter
// Human-readable renderings of quantities in several styles
// ============================================================================

use crate::domain::quantity::Quantity;
use crate::domain::unit::{render_terms, Unit};
use crate::engine::UnitCatalog;
use crate::numeric::Rational;

/// Default number of significant figures
pub const DEFAULT_PRECISION: usize = 6;

/// Output style of a [`QuantityFormatter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatStyle {
    /// `9.80665 meter / second^2`
    #[default]
    Default,
    /// Symbols and no spaces: `9.80665m/s^2`
    Compact,
    /// Superscript exponents: `9.80665 meter/second²`
    Unicode,
    /// Fixed mantissa digits: `9.806650e0 meter / second^2`
    Scientific,
    /// LaTeX math: `9.80665 \frac{\mathrm{m}}{\mathrm{s}^{2}}`
    Latex,
    /// HTML markup: `9.80665 m/s<sup>2</sup>`
    Html,
}

impl FormatStyle {
    /// Parse a style name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(FormatStyle::Default),
            "compact" => Some(FormatStyle::Compact),
            "unicode" => Some(FormatStyle::Unicode),
            "scientific" => Some(FormatStyle::Scientific),
            "latex" => Some(FormatStyle::Latex),
            "html" => Some(FormatStyle::Html),
            _ => None,
        }
    }
}

/// Formats quantities for display.
///
/// `precision` counts significant figures, except in
/// [`FormatStyle::Scientific`] where it counts mantissa decimals.
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
/// use unit_engine::formatter::{FormatStyle, QuantityFormatter};
///
/// let catalog = UnitCatalog::new();
/// let speed = catalog.quantity(27.777777, "m/s").unwrap();
///
/// let formatter = QuantityFormatter::new(FormatStyle::Compact)
///     .with_precision(4)
///     .with_catalog(&catalog);
/// assert_eq!(formatter.format(&speed), "27.78m/s");
/// ```
#[derive(Clone, Copy)]
pub struct QuantityFormatter<'a> {
    style: FormatStyle,
    precision: usize,
    catalog: Option<&'a UnitCatalog>,
}

impl<'a> QuantityFormatter<'a> {
    pub fn new(style: FormatStyle) -> Self {
        Self {
            style,
            precision: DEFAULT_PRECISION,
            catalog: None,
        }
    }

    /// Builder method: Set precision (at least one digit is kept)
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.max(1);
        self
    }

    /// Builder method: Look up unit symbols in `catalog` for the compact,
    /// LaTeX and HTML styles
    pub fn with_catalog(mut self, catalog: &'a UnitCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn style(&self) -> FormatStyle {
        self.style
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn format(&self, quantity: &Quantity) -> String {
        let values: Vec<String> = quantity
            .magnitude()
            .iter()
            .map(|v| self.format_value(v))
            .collect();
        let value = if quantity.magnitude().is_scalar() {
            values.concat()
        } else {
            format!("[{}]", values.join(", "))
        };

        let unit = self.format_unit(quantity.unit());
        match self.style {
            FormatStyle::Compact => format!("{}{}", value, unit),
            _ if unit.is_empty() => value,
            _ => format!("{} {}", value, unit),
        }
    }

    fn format_value(&self, value: f64) -> String {
        match self.style {
            FormatStyle::Scientific => format!("{:.*e}", self.precision, value),
            FormatStyle::Latex => match significant(value, self.precision).split_once('e') {
                Some((mantissa, exp)) => format!("{} \\times 10^{{{}}}", mantissa, exp),
                None => significant(value, self.precision),
            },
            FormatStyle::Html => match significant(value, self.precision).split_once('e') {
                Some((mantissa, exp)) => format!("{}&times;10<sup>{}</sup>", mantissa, exp),
                None => significant(value, self.precision),
            },
            _ => significant(value, self.precision),
        }
    }

    fn format_unit(&self, unit: &Unit) -> String {
        // pure numbers print bare
        if unit.terms().is_empty() {
            return String::new();
        }
        match self.style {
            FormatStyle::Default | FormatStyle::Scientific => unit.name().to_string(),
            FormatStyle::Unicode => superscripts(&unit.name().replace(" * ", "·").replace(" / ", "/")),
            FormatStyle::Compact => render_terms(&self.labelled_terms(unit)).replace(' ', ""),
            FormatStyle::Latex => latex_unit(&self.labelled_terms(unit)),
            FormatStyle::Html => html_unit(&self.labelled_terms(unit)),
        }
    }

    /// Terms labelled by catalog symbol where one is known
    fn labelled_terms(&self, unit: &Unit) -> Vec<(String, Rational)> {
        unit.terms()
            .iter()
            .map(|t| {
                let symbol = self.catalog.and_then(|c| c.symbol_for(&t.name));
                (symbol.unwrap_or_else(|| t.name.to_string()), t.exponent)
            })
            .collect()
    }
}

impl Default for QuantityFormatter<'_> {
    fn default() -> Self {
        Self::new(FormatStyle::Default)
    }
}

/// Format with the given style and precision.
pub fn format_quantity(quantity: &Quantity, style: FormatStyle, precision: usize) -> String {
    QuantityFormatter::new(style)
        .with_precision(precision)
        .format(quantity)
}

/// `value` rounded to `digits` significant figures, trailing zeros dropped;
/// very large or small values switch to exponent form.
fn significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits - 1, value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
            None => formatted,
        };
    }
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

/// Render numerator and denominator terms apart, exponents unsigned.
fn split_by_sign(
    terms: &[(String, Rational)],
    render: impl Fn(&str, &str) -> String,
) -> (Vec<String>, Vec<String>) {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for (name, exp) in terms.iter().filter(|(_, e)| !e.is_zero()) {
        let text = exp.to_string();
        let magnitude = text.trim_start_matches('-');
        if exp.is_negative() {
            denominator.push(render(name, magnitude));
        } else {
            numerator.push(render(name, magnitude));
        }
    }
    (numerator, denominator)
}

fn latex_unit(terms: &[(String, Rational)]) -> String {
    let (numerator, denominator) = split_by_sign(terms, |name, exp| {
        let mut out = format!("\\mathrm{{{}}}", name.replace('_', "\\_"));
        if exp != "1" {
            out.push_str(&format!("^{{{}}}", exp));
        }
        out
    });
    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("\\,")
    };
    if denominator.is_empty() {
        numerator
    } else {
        format!("\\frac{{{}}}{{{}}}", numerator, denominator.join("\\,"))
    }
}

fn html_unit(terms: &[(String, Rational)]) -> String {
    let (numerator, denominator) = split_by_sign(terms, |name, exp| {
        if exp == "1" {
            name.to_string()
        } else {
            format!("{}<sup>{}</sup>", name, exp)
        }
    });
    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("&middot;")
    };
    match denominator.as_slice() {
        [] => numerator,
        [single] => format!("{}/{}", numerator, single),
        _ => format!("{}/({})", numerator, denominator.join("&middot;")),
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Rewrite `^<digits>` and `^-<digits>` as superscripts; parenthesized
/// fractional exponents are left alone.
fn superscripts(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        let starts_exponent = matches!(chars.peek(), Some(d) if d.is_ascii_digit() || *d == '-');
        if c != '^' || !starts_exponent {
            out.push(c);
            continue;
        }
        while let Some(&d) = chars.peek() {
            let sup = match d {
                '-' => '⁻',
                '0' => '⁰',
                '1' => '¹',
                '2' => '²',
                '3' => '³',
                '4' => '⁴',
                '5' => '⁵',
                '6' => '⁶',
                '7' => '⁷',
                '8' => '⁸',
                '9' => '⁹',
                _ => break,
            };
            out.push(sup);
            chars.next();
        }
    }
    out
}
