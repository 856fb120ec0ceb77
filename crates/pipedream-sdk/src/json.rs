//! JSON encoding that matches the host's export parser byte for byte.
//!
//! The host's export parser expects `", "` and `": "` separators, everything
//! outside printable ASCII escaped as `\uXXXX`, and floats in shortest
//! round-trip form with a two-digit signed exponent (`1.0`, `1e-05`, `1e+16`).

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

/// Encode `value` the way the host expects in export lines.
pub fn to_export_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, ExportFormatter);
    value.serialize(&mut ser)?;
    // Only ASCII is ever written.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `serde_json` formatter for export-line values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportFormatter;

impl Formatter for ExportFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(shortest_float_repr(value).as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(shortest_float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Shortest round-trip float text; scientific below 1e-4 and from 1e16.
fn shortest_float_repr<F: std::fmt::LowerExp>(value: F) -> String {
    let sci = format!("{value:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci.clone();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci.clone();
    };
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if !(-4..16).contains(&exp) {
        let (head, tail) = digits.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if tail.is_empty() {
            format!("{sign}{head}e{exp_sign}{:02}", exp.abs())
        } else {
            format!("{sign}{head}.{tail}e{exp_sign}{:02}", exp.abs())
        }
    } else if exp >= 0 {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{sign}{digits:0<int_len$}.0")
        } else {
            let (int_part, frac) = digits.split_at(int_len);
            format!("{sign}{int_part}.{frac}")
        }
    } else {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    }
}
