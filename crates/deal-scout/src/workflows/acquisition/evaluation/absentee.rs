use super::config::AbsenteeSignals;
use super::ListingText;
use crate::workflows::acquisition::domain::AbsenteeLikelihood;

/// The structured field wins when it says "yes"; otherwise the first phrase hit decides.
pub(crate) fn detect_absentee(
    text: &ListingText,
    structured_field: Option<&str>,
    signals: &AbsenteeSignals,
) -> AbsenteeLikelihood {
    if structured_field
        .map(|value| value.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
    {
        return AbsenteeLikelihood::Likely;
    }

    if text.first_match(&signals.likely).is_some() {
        return AbsenteeLikelihood::Likely;
    }
    if text.first_match(&signals.possible).is_some() {
        return AbsenteeLikelihood::Possible;
    }

    AbsenteeLikelihood::No
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> AbsenteeSignals {
        AbsenteeSignals {
            likely: vec!["manager in place".to_string()],
            possible: vec!["semi-absentee".to_string()],
        }
    }

    fn text(description: &str) -> ListingText {
        ListingText::new("Lawn Service", description, "Service", "Edina, Minnesota")
    }

    #[test]
    fn structured_yes_is_authoritative() {
        let detected = detect_absentee(&text("owner works 60 hours"), Some(" Yes "), &signals());
        assert_eq!(detected, AbsenteeLikelihood::Likely);
    }

    #[test]
    fn likely_phrases_are_checked_before_possible() {
        let detected = detect_absentee(
            &text("Semi-absentee today with a General Manager in place"),
            Some("No"),
            &signals(),
        );
        assert_eq!(detected, AbsenteeLikelihood::Likely);

        let detected = detect_absentee(&text("Run SEMI-ABSENTEE"), None, &signals());
        assert_eq!(detected, AbsenteeLikelihood::Possible);
    }

    #[test]
    fn no_signal_means_no() {
        let detected = detect_absentee(&text("owner operated"), Some(""), &signals());
        assert_eq!(detected, AbsenteeLikelihood::No);
    }
}
