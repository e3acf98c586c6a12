use serde::Serialize;
use std::fmt;

/// Two-letter US state or territory code, or the [`StateCode::ALL`] sentinel.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize)]
pub struct StateCode(&'static str);

impl StateCode {
    /// Whole-country aggregate. Not a real state.
    pub const ALL: StateCode = StateCode("ALL");

    pub const fn new(code: &'static str) -> Self {
        StateCode(code)
    }

    /// Look a code up among the known states, e.g. from user input.
    pub fn parse(code: &str) -> Option<StateCode> {
        let upper = code.trim().to_ascii_uppercase();
        if upper == Self::ALL.0 {
            return Some(Self::ALL);
        }
        STATE_NAMES
            .iter()
            .find(|(known, _)| *known == upper)
            .map(|(known, _)| StateCode(*known))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }

    /// Display name used by map features, e.g. `CA` -> "California".
    pub fn name(&self) -> Option<&'static str> {
        STATE_NAMES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }

    /// Reverse of [`StateCode::name`].
    pub fn from_name(name: &str) -> Option<StateCode> {
        STATE_NAMES
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name.trim()))
            .map(|(code, _)| StateCode(*code))
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

const fn st(code: &'static str) -> StateCode {
    StateCode::new(code)
}

/// A region label and the states it covers.
pub type RegionEntry = (&'static str, &'static [StateCode]);

/// Canonical region label -> covered states table.
///
/// Metro areas map to their single state, marketing regions to every state
/// they span, and `TotalUS` to the [`StateCode::ALL`] sentinel. No entry lists
/// a state twice.
pub static REGION_STATES: &[RegionEntry] = &[
    ("Albany", &[st("NY")]),
    ("Atlanta", &[st("GA")]),
    ("BaltimoreWashington", &[st("MD"), st("DC"), st("VA")]),
    ("Boise", &[st("ID")]),
    ("Boston", &[st("MA")]),
    ("BuffaloRochester", &[st("NY")]),
    ("California", &[st("CA")]),
    ("Charlotte", &[st("NC")]),
    ("Chicago", &[st("IL")]),
    ("CincinnatiDayton", &[st("OH")]),
    ("Columbus", &[st("OH")]),
    ("DallasFtWorth", &[st("TX")]),
    ("Denver", &[st("CO")]),
    ("Detroit", &[st("MI")]),
    ("GrandRapids", &[st("MI")]),
    ("GreatLakes", &[st("MI"), st("WI"), st("IL"), st("IN"), st("OH")]),
    ("HarrisburgScranton", &[st("PA")]),
    ("HartfordSpringfield", &[st("CT"), st("MA")]),
    ("Houston", &[st("TX")]),
    ("Indianapolis", &[st("IN")]),
    ("Jacksonville", &[st("FL")]),
    ("LasVegas", &[st("NV")]),
    ("LosAngeles", &[st("CA")]),
    ("Louisville", &[st("KY")]),
    ("MiamiFtLauderdale", &[st("FL")]),
    ("Midsouth", &[st("TN"), st("KY"), st("MS"), st("AL")]),
    ("Nashville", &[st("TN")]),
    ("NewOrleansMobile", &[st("LA"), st("AL")]),
    ("NewYork", &[st("NY")]),
    (
        "Northeast",
        &[
            st("NY"),
            st("NJ"),
            st("PA"),
            st("CT"),
            st("RI"),
            st("MA"),
            st("VT"),
            st("NH"),
            st("ME"),
        ],
    ),
    ("NorthernNewEngland", &[st("ME"), st("NH"), st("VT")]),
    ("Orlando", &[st("FL")]),
    ("Philadelphia", &[st("PA")]),
    ("PhoenixTucson", &[st("AZ")]),
    ("Pittsburgh", &[st("PA")]),
    ("Plains", &[st("KS"), st("NE"), st("SD"), st("ND")]),
    ("Portland", &[st("OR")]),
    ("RaleighGreensboro", &[st("NC")]),
    ("RichmondNorfolk", &[st("VA")]),
    ("Roanoke", &[st("VA")]),
    ("Sacramento", &[st("CA")]),
    ("SanDiego", &[st("CA")]),
    ("SanFrancisco", &[st("CA")]),
    ("Seattle", &[st("WA")]),
    ("SouthCarolina", &[st("SC")]),
    ("SouthCentral", &[st("TX"), st("OK"), st("AR"), st("LA")]),
    (
        "Southeast",
        &[st("GA"), st("FL"), st("AL"), st("SC"), st("NC"), st("TN")],
    ),
    ("Spokane", &[st("WA")]),
    ("StLouis", &[st("MO")]),
    ("Syracuse", &[st("NY")]),
    ("Tampa", &[st("FL")]),
    ("TotalUS", &[StateCode::ALL]),
    (
        "West",
        &[
            st("CA"),
            st("OR"),
            st("WA"),
            st("NV"),
            st("ID"),
            st("MT"),
            st("WY"),
            st("UT"),
            st("CO"),
            st("AZ"),
            st("NM"),
        ],
    ),
    ("WestTexNewMexico", &[st("TX"), st("NM")]),
];

/// State code -> display name for the 50 states and DC.
pub static STATE_NAMES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_every_dataset_region() {
        assert_eq!(REGION_STATES.len(), 54);
        let labels: HashSet<&str> = REGION_STATES.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels.len(), REGION_STATES.len(), "labels must be unique");
    }

    #[test]
    fn test_no_region_lists_a_state_twice() {
        for (label, states) in REGION_STATES {
            let unique: HashSet<&StateCode> = states.iter().collect();
            assert_eq!(unique.len(), states.len(), "{} repeats a state", label);
            assert!(!states.is_empty(), "{} maps to nothing", label);
        }
    }

    #[test]
    fn test_every_state_in_table_has_a_name() {
        for (label, states) in REGION_STATES {
            for state in states.iter().filter(|s| !s.is_all()) {
                assert!(state.name().is_some(), "{} in {} has no name", state, label);
            }
        }
    }

    #[test]
    fn test_state_names() {
        let ca = StateCode::parse("ca").unwrap();
        assert_eq!(ca.as_str(), "CA");
        assert_eq!(ca.name(), Some("California"));
        assert_eq!(StateCode::from_name("district of columbia"), StateCode::parse("DC"));
        assert_eq!(StateCode::parse("ALL"), Some(StateCode::ALL));
        assert_eq!(StateCode::ALL.name(), None);
        assert!(StateCode::parse("XX").is_none());
    }
}
