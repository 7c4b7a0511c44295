//! Engine configuration: remediation policy, duplicate key and field rules.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MalformedTable, Result, SieveError};
use crate::input::DataTable;
use crate::transform::RemediationPolicy;

/// Built-in wilaya name → code table.
const WILAYAS: &[(&str, &str)] = &[
    ("Adrar", "01"),
    ("Chlef", "02"),
    ("Laghouat", "03"),
    ("Oum El Bouaghi", "04"),
    ("Batna", "05"),
    ("Bejaia", "06"),
    ("Biskra", "07"),
    ("Bechar", "08"),
    ("Blida", "09"),
    ("Bouira", "10"),
    ("Tamanrasset", "11"),
    ("Tebessa", "12"),
    ("Tlemcen", "13"),
    ("Tiaret", "14"),
    ("Tizi Ouzou", "15"),
    ("Algiers", "16"),
    ("Djelfa", "17"),
    ("Jijel", "18"),
    ("Setif", "19"),
    ("Saida", "20"),
    ("Skikda", "21"),
    ("Sidi Bel Abbes", "22"),
    ("Annaba", "23"),
    ("Guelma", "24"),
    ("Constantine", "25"),
    ("Medea", "26"),
    ("Mostaganem", "27"),
    ("M'Sila", "28"),
    ("Mascara", "29"),
    ("Ouargla", "30"),
    ("Oran", "31"),
    ("El Bayadh", "32"),
    ("Illizi", "33"),
    ("Bordj Bou Arreridj", "34"),
    ("Boumerdes", "35"),
    ("El Tarf", "36"),
    ("Tindouf", "37"),
    ("Tissemsilt", "38"),
    ("El Oued", "39"),
    ("Khenchela", "40"),
    ("Souk Ahras", "41"),
    ("Tipaza", "42"),
    ("Mila", "43"),
    ("Ain Defla", "44"),
    ("Naama", "45"),
    ("Ain Temouchent", "46"),
    ("Ghardaia", "47"),
    ("Relizane", "48"),
    ("Timimoun", "49"),
    ("Bordj Badji Mokhtar", "50"),
    ("Ouled Djellal", "51"),
    ("Beni Abbes", "52"),
    ("In Salah", "53"),
    ("In Guezzam", "54"),
    ("Touggourt", "55"),
    ("Djanet", "56"),
    ("El M'Ghair", "57"),
    ("El Meniaa", "58"),
];

/// Columns checked by the email and date format rules.
///
/// A binding whose column is absent from the table is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBindings {
    /// Column holding email addresses.
    pub email: Option<String>,
    /// Column holding `DD/MM/YYYY` dates.
    pub date: Option<String>,
}

impl Default for FieldBindings {
    fn default() -> Self {
        Self {
            email: Some("email".to_string()),
            date: Some("Date_of_birth".to_string()),
        }
    }
}

/// Region name → expected code consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRule {
    /// Column holding the region name.
    pub name_column: String,
    /// Column holding the region code.
    pub code_column: String,
    /// Expected code for each known region name.
    pub codes: IndexMap<String, String>,
}

impl RegionRule {
    /// Create a rule over the given columns with an empty code table.
    pub fn new(name_column: impl Into<String>, code_column: impl Into<String>) -> Self {
        Self {
            name_column: name_column.into(),
            code_column: code_column.into(),
            codes: IndexMap::new(),
        }
    }

    /// Add an expected code for a region.
    pub fn with_code(mut self, region: impl Into<String>, code: impl Into<String>) -> Self {
        self.codes.insert(region.into(), code.into());
        self
    }

    /// The built-in Algerian wilaya table over `state` / `num_state`.
    pub fn wilayas() -> Self {
        WILAYAS
            .iter()
            .fold(Self::new("state", "num_state"), |rule, (name, code)| {
                rule.with_code(*name, *code)
            })
    }

    /// Expected code for a region name, if known.
    pub fn expected_code(&self, region: &str) -> Option<&str> {
        self.codes.get(region.trim()).map(|c| c.as_str())
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    /// Duplicate and missing-value handling.
    #[serde(flatten)]
    pub policy: RemediationPolicy,
    /// Columns that identify a duplicate row (None = all columns).
    pub duplicate_key: Option<Vec<String>>,
    /// Columns checked by the email/date rules.
    pub fields: FieldBindings,
    /// Region code consistency rule, if enabled.
    pub region: Option<RegionRule>,
}

impl SieveConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remediation policy.
    pub fn with_policy(mut self, policy: RemediationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set an explicit duplicate key.
    pub fn with_duplicate_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duplicate_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enable the region consistency rule.
    pub fn with_region(mut self, region: RegionRule) -> Self {
        self.region = Some(region);
        self
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SieveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SieveConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration on its own.
    pub fn validate(&self) -> Result<()> {
        if self.duplicate_key.as_ref().is_some_and(|k| k.is_empty()) {
            return Err(SieveError::Config(
                "duplicate_key must name at least one column".to_string(),
            ));
        }
        if let Some(region) = &self.region {
            if region.name_column == region.code_column {
                return Err(SieveError::Config(
                    "region name and code columns must differ".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Check that every column the configuration names exists in `table`.
    pub fn check_columns(&self, table: &DataTable) -> Result<()> {
        self.validate()?;

        let require = |column: &str, context: &str| -> Result<()> {
            if table.column_index(column).is_none() {
                return Err(MalformedTable::UnknownColumn {
                    column: column.to_string(),
                    context: context.to_string(),
                }
                .into());
            }
            Ok(())
        };

        for column in self.duplicate_key.iter().flatten() {
            require(column, "duplicate_key")?;
        }
        if let Some(region) = &self.region {
            require(&region.name_column, "region_code_map")?;
            require(&region.code_column, "region_code_map")?;
        }
        Ok(())
    }
}
