use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::CountryCategory;

pub const DEFAULT_HOME_COUNTRY: &str = "Canada";

/// Countries with a bilateral social security agreement in force.
pub const DEFAULT_AGREEMENT_COUNTRIES: &[&str] = &[
    "Australia",
    "Austria",
    "Barbados",
    "Belgium",
    "Brazil",
    "Chile",
    "Croatia",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "India",
    "Ireland",
    "Israel",
    "Italy",
    "Jamaica",
    "Japan",
    "Korea",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Mexico",
    "Morocco",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Philippines",
    "Poland",
    "Portugal",
    "Romania",
    "Serbia",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "Trinidad and Tobago",
    "Turkey",
    "United Kingdom",
    "United States",
    "Uruguay",
];

/// Classifies a declared country of residence for the pension residency rules.
pub trait CountryClassifier: Send + Sync {
    fn classify(&self, country: &str) -> CountryCategory;
}

impl<F> CountryClassifier for F
where
    F: Fn(&str) -> CountryCategory + Send + Sync,
{
    fn classify(&self, country: &str) -> CountryCategory {
        self(country)
    }
}

/// Lookup table of the home country and the agreement countries.
///
/// Names match case-insensitively. The category names `home`, `agreement`, and `other`
/// classify as themselves so callers that already know the category can pass it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementRegistry {
    home: String,
    agreements: BTreeSet<String>,
}

impl AgreementRegistry {
    pub fn new<I, S>(home: &str, agreements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let home = normalize(home);
        let agreements = agreements
            .into_iter()
            .map(|name| normalize(name.as_ref()))
            .filter(|name| !name.is_empty() && *name != home)
            .collect();
        Self { home, agreements }
    }

    pub fn with_home(home: &str) -> Self {
        Self::new(home, DEFAULT_AGREEMENT_COUNTRIES)
    }

    /// Load agreement countries from a CSV with a `country` column.
    pub fn from_csv_reader<R: Read>(home: &str, reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut names = Vec::new();
        for record in csv_reader.deserialize::<AgreementRow>() {
            names.push(record?.country);
        }
        Ok(Self::new(home, names))
    }

    pub fn from_csv_path<P: AsRef<Path>>(home: &str, path: P) -> Result<Self, csv::Error> {
        let file = File::open(path).map_err(csv::Error::from)?;
        Self::from_csv_reader(home, file)
    }

    pub fn agreement_count(&self) -> usize {
        self.agreements.len()
    }
}

impl Default for AgreementRegistry {
    fn default() -> Self {
        Self::with_home(DEFAULT_HOME_COUNTRY)
    }
}

impl CountryClassifier for AgreementRegistry {
    fn classify(&self, country: &str) -> CountryCategory {
        let name = normalize(country);
        match name.as_str() {
            "home" => CountryCategory::Home,
            "agreement" => CountryCategory::Agreement,
            "other" => CountryCategory::Other,
            _ if name == self.home => CountryCategory::Home,
            _ if self.agreements.contains(&name) => CountryCategory::Agreement,
            _ => CountryCategory::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgreementRow {
    country: String,
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
