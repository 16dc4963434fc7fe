use crate::error::DashboardError;
use crate::types::station::StationRecord;
use std::fmt;
use std::str::FromStr;

/// The region stations are listed for: a country code, optionally narrowed to one
/// state (canton) with `"CH-BE"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionCode {
    pub country: String,
    pub state: Option<String>,
}

impl RegionCode {
    pub fn country(country: &str) -> Self {
        Self {
            country: country.trim().to_uppercase(),
            state: None,
        }
    }

    /// Whether a station record belongs to this region.
    pub fn contains(&self, record: &StationRecord) -> bool {
        if !record.country.eq_ignore_ascii_case(&self.country) {
            return false;
        }
        match &self.state {
            None => true,
            Some(state) => record
                .region
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(state)),
        }
    }
}

impl Default for RegionCode {
    fn default() -> Self {
        Self::country("CH")
    }
}

impl FromStr for RegionCode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        let (country, state) = match normalized.split_once('-') {
            Some((country, state)) => (country.trim(), Some(state.trim())),
            None => (normalized.as_str(), None),
        };
        if country.is_empty() || state.is_some_and(str::is_empty) {
            return Err(DashboardError::InvalidRegion(s.to_string()));
        }
        Ok(Self {
            country: country.to_string(),
            state: state.map(str::to_string),
        })
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}-{}", self.country, state),
            None => write!(f, "{}", self.country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::tests::record;

    #[test]
    fn parses_country_and_state() {
        let region: RegionCode = " ch-be ".parse().unwrap();
        assert_eq!(region.country, "CH");
        assert_eq!(region.state.as_deref(), Some("BE"));
        assert_eq!(region.to_string(), "CH-BE");
        assert_eq!("CH".parse::<RegionCode>().unwrap(), RegionCode::default());
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(matches!(
            "".parse::<RegionCode>(),
            Err(DashboardError::InvalidRegion(_))
        ));
        assert!("CH-".parse::<RegionCode>().is_err());
    }

    #[test]
    fn matches_records_by_country_and_state() {
        let mut bern = record("06631", &[("en", "Bern / Zollikofen")], 46.99, 7.46);
        bern.region = Some("BE".to_string());
        let mut munich = record("10865", &[("en", "Munich")], 48.13, 11.7);
        munich.country = "DE".to_string();

        assert!(RegionCode::country("CH").contains(&bern));
        assert!(!RegionCode::country("CH").contains(&munich));
        assert!("CH-BE".parse::<RegionCode>().unwrap().contains(&bern));
        assert!(!"CH-ZH".parse::<RegionCode>().unwrap().contains(&bern));
    }
}
