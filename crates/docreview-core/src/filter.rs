use regex::Regex;

/// Case number folder names: three uppercase letters, a year and a six digit sequence,
/// e.g. `GEO-2024-123456`.
pub const CASE_NUMBER_PATTERN: &str = r"^[A-Z]{3}-\d{4}-\d{6}$";

/// Predicate over a folder's simple name.
///
/// The filter only gates spreadsheet inspection; folders that fail it are still descended into.
#[derive(Clone, Debug)]
pub struct NameFilter {
    regex: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn case_number() -> Self {
        Self::new(CASE_NUMBER_PATTERN).expect("case number pattern is valid")
    }

    pub fn matches(&self, folder_name: &str) -> bool {
        self.regex.is_match(folder_name)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}
