//! Entry status codes published alongside each location.

/// Two-letter status of a code list entry.
///
/// # Examples
/// ```
/// use unlocode_core::Status;
///
/// let status = Status::from_code("AI");
/// assert_eq!(status, Status::AdoptedByInternationalOrganisation);
/// assert_eq!(status.code(), "AI");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// `AA`
    ApprovedByNationalGovernment,
    /// `AC`
    ApprovedByCustoms,
    /// `AF`
    ApprovedByFacilitationBody,
    /// `AI`
    AdoptedByInternationalOrganisation,
    /// `AM`
    ApprovedByMaintenanceAgency,
    /// `AQ`
    FunctionsNotVerified,
    /// `AS`
    ApprovedByStandardisationBody,
    /// `QQ`
    NotVerifiedSinceDate,
    /// `RL`
    RecognisedLocation,
    /// `RN`
    NationalRequest,
    /// `RQ`
    RequestUnderConsideration,
    /// `RR`
    RequestRejected,
    /// `UR`
    UserRequest,
    /// `XX`
    ScheduledForRemoval,
    /// Any code outside the published table, kept verbatim.
    Other(String),
}

impl Status {
    /// Decode a status code. Unknown codes become [`Status::Other`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "AA" => Self::ApprovedByNationalGovernment,
            "AC" => Self::ApprovedByCustoms,
            "AF" => Self::ApprovedByFacilitationBody,
            "AI" => Self::AdoptedByInternationalOrganisation,
            "AM" => Self::ApprovedByMaintenanceAgency,
            "AQ" => Self::FunctionsNotVerified,
            "AS" => Self::ApprovedByStandardisationBody,
            "QQ" => Self::NotVerifiedSinceDate,
            "RL" => Self::RecognisedLocation,
            "RN" => Self::NationalRequest,
            "RQ" => Self::RequestUnderConsideration,
            "RR" => Self::RequestRejected,
            "UR" => Self::UserRequest,
            "XX" => Self::ScheduledForRemoval,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The two-letter code.
    pub fn code(&self) -> &str {
        match self {
            Self::ApprovedByNationalGovernment => "AA",
            Self::ApprovedByCustoms => "AC",
            Self::ApprovedByFacilitationBody => "AF",
            Self::AdoptedByInternationalOrganisation => "AI",
            Self::ApprovedByMaintenanceAgency => "AM",
            Self::FunctionsNotVerified => "AQ",
            Self::ApprovedByStandardisationBody => "AS",
            Self::NotVerifiedSinceDate => "QQ",
            Self::RecognisedLocation => "RL",
            Self::NationalRequest => "RN",
            Self::RequestUnderConsideration => "RQ",
            Self::RequestRejected => "RR",
            Self::UserRequest => "UR",
            Self::ScheduledForRemoval => "XX",
            Self::Other(code) => code,
        }
    }

    /// Published description, or `None` for unknown codes.
    pub fn description(&self) -> Option<&'static str> {
        let text = match self {
            Self::ApprovedByNationalGovernment => {
                "Approved by competent national government agency"
            }
            Self::ApprovedByCustoms => "Approved by Customs Authority",
            Self::ApprovedByFacilitationBody => "Approved by national facilitation body",
            Self::AdoptedByInternationalOrganisation => {
                "Code adopted by international organisation (IATA, ECLAC, EUROSTAT, etc.)"
            }
            Self::ApprovedByMaintenanceAgency => "Approved by the UN/LOCODE Maintenance Agency",
            Self::FunctionsNotVerified => "Entry approved, functions not verified",
            Self::ApprovedByStandardisationBody => "Approved by national standardisation body",
            Self::NotVerifiedSinceDate => "Original entry not verified since date indicated",
            Self::RecognisedLocation => {
                "Recognised location - Existence and representation of location name \
                 confirmed by check against nominated gazetteer or other reference work"
            }
            Self::NationalRequest => {
                "Request from credible national sources for locations in their own country"
            }
            Self::RequestUnderConsideration => "Request under consideration",
            Self::RequestRejected => "Request rejected",
            Self::UserRequest => "Entry included on user's request; not officially approved",
            Self::ScheduledForRemoval => {
                "Entry that will be removed from the next issue of UN/LOCODE"
            }
            Self::Other(_) => return None,
        };
        Some(text)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AA")]
    #[case("AI")]
    #[case("RL")]
    #[case("XX")]
    fn known_codes_round_trip(#[case] code: &str) {
        let status = Status::from_code(code);
        assert_eq!(status.code(), code);
        assert!(status.description().is_some());
    }

    #[rstest]
    fn unknown_codes_are_kept() {
        let status = Status::from_code("ZZ");
        assert_eq!(status, Status::Other("ZZ".into()));
        assert_eq!(status.to_string(), "ZZ");
        assert!(status.description().is_none());
    }
}
