//! Line-oriented LAS tokenizer.
//!
//! Section header lines start with `~`; the first letter after the tilde
//! identifies the section (`V`, `W`, `C`, `P`, `O`, `A`). Metadata lines in
//! `~W` and `~C` follow the `MNEM.UNIT  VALUE : DESCRIPTION` layout. Lines
//! starting with `#` are comments.

use super::{CurveSpec, LasDocument};
use crate::errors::{LasError, LasResult};

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Version,
    Well,
    Curve,
    Param,
    Other,
    Data,
}

pub fn parse(content: &str) -> LasResult<LasDocument> {
    let mut section = Section::None;
    let mut saw_any_section = false;
    let mut saw_curve_section = false;
    let mut saw_data_section = false;

    let mut well_info: Vec<(String, String)> = Vec::new();
    let mut curves: Vec<CurveSpec> = Vec::new();
    let mut null_value: Option<f64> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('~') {
            saw_any_section = true;
            section = match rest.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some('V') => Section::Version,
                Some('W') => Section::Well,
                Some('C') => Section::Curve,
                Some('P') => Section::Param,
                Some('A') => Section::Data,
                _ => Section::Other,
            };
            match section {
                Section::Curve => saw_curve_section = true,
                Section::Data => saw_data_section = true,
                _ => {}
            }
            continue;
        }

        match section {
            Section::Well => {
                // Tolerant: a well-info line that does not parse is skipped,
                // the caller falls back to the literal well name.
                if let Some((mnemonic, value)) = parse_metadata_line(line) {
                    if mnemonic == "NULL" {
                        null_value = value.trim().parse::<f64>().ok();
                    }
                    well_info.push((mnemonic, value));
                }
            }
            Section::Curve => {
                let (mnemonic, unit) =
                    parse_curve_line(line).ok_or_else(|| LasError::MalformedCurveLine {
                        line: line_no,
                        content: line.to_string(),
                    })?;
                curves.push(CurveSpec { mnemonic, unit });
            }
            Section::Data => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != curves.len() {
                    return Err(LasError::RowWidth {
                        line: line_no,
                        expected: curves.len(),
                        got: tokens.len(),
                    });
                }
                rows.push(
                    tokens
                        .iter()
                        .map(|t| t.parse::<f64>().unwrap_or(f64::NAN))
                        .collect(),
                );
            }
            _ => {}
        }
    }

    if !saw_any_section {
        return Err(LasError::NotLas);
    }
    if !saw_curve_section {
        return Err(LasError::MissingSection("C"));
    }
    if !saw_data_section {
        return Err(LasError::MissingSection("A"));
    }

    Ok(LasDocument {
        well_info,
        curves,
        null_value,
        rows,
    })
}

/// Split a `MNEM.UNIT  VALUE : DESCRIPTION` line into (mnemonic, value).
///
/// The mnemonic runs up to the first dot; the unit (if any) runs from the
/// dot to the first whitespace; the value is everything up to the last colon.
fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    let dot = line.find('.')?;
    let mnemonic = line[..dot].trim().to_uppercase();
    if mnemonic.is_empty() {
        return None;
    }
    let rest = &line[dot + 1..];
    let after_unit = match rest.find(char::is_whitespace) {
        Some(pos) => &rest[pos..],
        None => "",
    };
    let value = match after_unit.rfind(':') {
        Some(colon) => &after_unit[..colon],
        None => after_unit,
    };
    Some((mnemonic, value.trim().to_string()))
}

/// Split a curve definition line into (mnemonic, unit).
fn parse_curve_line(line: &str) -> Option<(String, Option<String>)> {
    let dot = line.find('.')?;
    let mnemonic = line[..dot].trim().to_string();
    if mnemonic.is_empty() {
        return None;
    }
    let rest = &line[dot + 1..];
    let unit_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let unit = rest[..unit_end].trim();
    let unit = if unit.is_empty() {
        None
    } else {
        Some(unit.to_string())
    };
    Some((mnemonic, unit))
}
