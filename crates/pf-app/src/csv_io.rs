//! CSV import and export.
//!
//! Input: a header naming `InputType`, `Value1`, `Value2` and `Altitude`
//! (matched case-insensitively, ignoring spaces and underscores, with a few
//! alternate spellings), then one row per resolution. Fields may be quoted
//! with `"`; a doubled quote inside a quoted field is a literal quote. Blank
//! lines are skipped and do not consume a row number.
//!
//! Output: [`EXPORT_HEADER`] followed by one line per successful row, every
//! value quoted.

use std::fmt::Write as _;

use pf_air::{InputKind, InputSpec};

use crate::batch::{BatchOutcome, BatchRow};
use crate::error::{AppError, AppResult};
use crate::limits::InputLimits;

pub const EXPORT_HEADER: &str = "RowNumber,InputType,Value1,Value2,Altitude,DBT,WBT,RH,DPT,\
HumidityRatio,Enthalpy,SpecificVolume,VaporPressure";

/// Input column with its accepted (normalized) header spellings.
struct Column {
    name: &'static str,
    aliases: &'static [&'static str],
}

const INPUT_TYPE: Column = Column {
    name: "InputType",
    aliases: &["inputtype", "type", "kind", "input"],
};
const VALUE1: Column = Column {
    name: "Value1",
    aliases: &["value1", "v1"],
};
const VALUE2: Column = Column {
    name: "Value2",
    aliases: &["value2", "v2"],
};
const ALTITUDE: Column = Column {
    name: "Altitude",
    aliases: &["altitude", "alt", "elevation", "altitudem"],
};

fn normalize_header(cell: &str) -> String {
    cell.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn find_column(headers: &[String], column: &Column) -> AppResult<usize> {
    headers
        .iter()
        .position(|h| column.aliases.contains(&h.as_str()))
        .ok_or(AppError::MissingColumn(column.name))
}

/// Split one CSV line into trimmed fields.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

fn parse_number(row: usize, column: &'static str, raw: &str) -> AppResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidRow {
            row,
            message: format!("{column} {raw:?} is not a number"),
        })
}

struct Layout {
    kind: usize,
    value1: usize,
    value2: usize,
    altitude: usize,
}

impl Layout {
    fn width(&self) -> usize {
        1 + self.kind.max(self.value1).max(self.value2).max(self.altitude)
    }

    fn parse(&self, row: usize, fields: &[String]) -> AppResult<InputSpec> {
        if fields.len() < self.width() {
            return Err(AppError::InvalidRow {
                row,
                message: format!("expected {} fields, found {}", self.width(), fields.len()),
            });
        }

        let kind: InputKind = fields[self.kind].parse()?;
        let value1 = parse_number(row, VALUE1.name, &fields[self.value1])?;
        let value2 = parse_number(row, VALUE2.name, &fields[self.value2])?;
        // Blank altitude means sea level
        let altitude = match fields[self.altitude].as_str() {
            "" => 0.0,
            raw => parse_number(row, ALTITUDE.name, raw)?,
        };
        Ok(InputSpec::new(kind, value1, value2, altitude))
    }
}

/// Parse CSV text into numbered batch rows.
///
/// Only header problems fail the whole import. Every data row comes back as a
/// [`BatchRow`], carrying its error if it could not be parsed or is outside
/// `limits`. Rows are numbered from 1 in file order.
pub fn parse_rows(text: &str, limits: &InputLimits) -> AppResult<Vec<BatchRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(AppError::MissingHeader)?;
    let headers: Vec<String> = split_line(header_line)
        .iter()
        .map(|h| normalize_header(h))
        .collect();
    let layout = Layout {
        kind: find_column(&headers, &INPUT_TYPE)?,
        value1: find_column(&headers, &VALUE1)?,
        value2: find_column(&headers, &VALUE2)?,
        altitude: find_column(&headers, &ALTITUDE)?,
    };

    Ok(lines
        .enumerate()
        .map(|(i, line)| {
            let row = i + 1;
            let input = layout
                .parse(row, &split_line(line))
                .and_then(|spec| limits.check(&spec).map(|()| spec));
            BatchRow::new(row, input)
        })
        .collect())
}

/// Render successful rows as CSV, rounded to output precision.
pub fn export_results(outcome: &BatchOutcome) -> String {
    let mut csv = String::with_capacity(EXPORT_HEADER.len() + 96 * outcome.successes.len());
    csv.push_str(EXPORT_HEADER);
    csv.push('\n');

    for row in &outcome.successes {
        let s = row.state.rounded();
        let _ = writeln!(
            csv,
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{:.1}\",\"{:.1}\",\"{:.1}\",\"{:.1}\",\"{:.4}\",\"{:.1}\",\"{:.3}\",\"{:.2}\"",
            row.row_number,
            row.input.kind,
            row.input.value1,
            row.input.value2,
            row.input.altitude_m,
            s.dry_bulb_c,
            s.wet_bulb_c,
            s.relative_humidity_pct,
            s.dew_point_c,
            s.humidity_ratio,
            s.enthalpy_kj_per_kg,
            s.specific_volume_m3_per_kg,
            s.vapor_pressure_kpa,
        );
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_quotes() {
        assert_eq!(
            split_line(r#""dbt_wbt", 25 ,"20","say ""hi"", ok""#),
            vec!["dbt_wbt", "25", "20", r#"say "hi", ok"#]
        );
    }

    #[test]
    fn header_spellings() {
        let limits = InputLimits::default();
        let rows = parse_rows("Input Type,value_1,V2,ALTITUDE\ndbt_rh,30,65,500\n", &limits).unwrap();
        assert_eq!(rows.len(), 1);
        let spec = rows[0].input.as_ref().unwrap();
        assert_eq!(spec.kind, InputKind::DbtRh);
        assert_eq!(spec.altitude_m, 500.0);

        let rows = parse_rows("kind,v1,v2,elevation\nwbt_rh,18,70,0\n", &limits).unwrap();
        assert!(rows[0].input.is_ok());
    }

    #[test]
    fn columns_may_be_reordered() {
        let rows = parse_rows(
            "Altitude,Value2,Value1,InputType\n100,15,22,dbt_dpt\n",
            &InputLimits::default(),
        )
        .unwrap();
        let spec = rows[0].input.as_ref().unwrap();
        assert_eq!((spec.value1, spec.value2, spec.altitude_m), (22.0, 15.0, 100.0));
    }

    #[test]
    fn missing_column_fails_import() {
        let err = parse_rows("InputType,Value1,Value2\n", &InputLimits::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn("Altitude")));
        assert!(matches!(
            parse_rows("\n\n", &InputLimits::default()),
            Err(AppError::MissingHeader)
        ));
    }

    #[test]
    fn bad_rows_are_isolated() {
        let text = "InputType,Value1,Value2,Altitude\n\
                    dbt_wbt,25,20,0\n\
                    \n\
                    dbt_xx,25,20,0\n\
                    dbt_rh,abc,50,0\n\
                    dbt_rh,25,150,0\n\
                    dbt_rh,25\n\
                    dbt_dpt,22,15,\n";
        let rows = parse_rows(text, &InputLimits::default()).unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows[0].input.is_ok());
        assert!(matches!(rows[1].input, Err(AppError::Air(_))));
        assert!(matches!(rows[2].input, Err(AppError::InvalidRow { row: 3, .. })));
        assert!(matches!(rows[3].input, Err(AppError::OutOfLimits { .. })));
        assert!(matches!(rows[4].input, Err(AppError::InvalidRow { row: 5, .. })));
        assert_eq!(rows[5].input.as_ref().unwrap().altitude_m, 0.0);
        assert_eq!(rows[5].row_number, 6);
    }

    #[test]
    fn export_quotes_every_value() {
        use crate::batch::RowSuccess;
        use pf_air::{SolverSettings, compute_air_state};

        let spec = InputSpec::new(InputKind::DbtWbt, 25.0, 20.0, 0.0);
        let res = compute_air_state(&spec, &SolverSettings::default()).unwrap();
        let outcome = BatchOutcome {
            successes: vec![RowSuccess {
                row_number: 1,
                input: spec,
                state: res.state,
                report: res.report,
            }],
            rows_total: 1,
            ..BatchOutcome::default()
        };

        let csv = export_results(&outcome);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(EXPORT_HEADER));
        let line = lines.next().unwrap();
        assert!(line.starts_with("\"1\",\"dbt_wbt\",\"25\",\"20\",\"0\",\"25.0\",\"20.0\","));
        assert_eq!(split_line(line).len(), 13);
        assert_eq!(line.matches('"').count(), 26);
    }
}
