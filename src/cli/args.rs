use std::collections::HashMap;

use chrono::NaiveDate;

use crate::errors::{FinanceError, Result};

/// `--flag value` pairs plus the remaining positional words.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedArgs {
    flags: HashMap<String, String>,
    pub positional: Vec<String>,
}

impl ParsedArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.strip_prefix("--") {
                Some(name) if !name.is_empty() => {
                    let value = iter.next().ok_or_else(|| {
                        FinanceError::InvalidInput(format!("flag `--{name}` needs a value"))
                    })?;
                    parsed.flags.insert(name.to_string(), value.clone());
                }
                _ => parsed.positional.push(arg.clone()),
            }
        }
        Ok(parsed)
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    /// Rejects flags the command does not understand.
    pub fn expect_flags(&self, known: &[&str]) -> Result<()> {
        match self.flags.keys().find(|name| !known.contains(&name.as_str())) {
            Some(unknown) => Err(FinanceError::InvalidInput(format!(
                "unknown flag `--{unknown}`"
            ))),
            None => Ok(()),
        }
    }
}

/// `YYYY-MM` to the first day of that month.
pub fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| FinanceError::InvalidInput(format!("expected YYYY-MM, got `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn splits_flags_and_positionals() {
        let parsed = ParsedArgs::parse(&words("gasto Gas --file a.json 10")).unwrap();
        assert_eq!(parsed.flag("file"), Some("a.json"));
        assert_eq!(parsed.positional, words("gasto Gas 10"));
        assert!(parsed.expect_flags(&["file"]).is_ok());
        assert!(parsed.expect_flags(&["month"]).is_err());
    }

    #[test]
    fn dangling_flag_is_rejected() {
        assert!(ParsedArgs::parse(&words("--range")).is_err());
    }

    #[test]
    fn month_parses_to_first_day() {
        assert_eq!(
            parse_month("2024-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("02/2024").is_err());
    }
}
