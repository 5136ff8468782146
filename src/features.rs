//! Engineered-feature derivation.
//!
//! The pipeline was trained on the raw form fields plus three indicator
//! features. They are recomputed here for every request; the formulas must
//! stay in lockstep with the training-time feature engineering or the
//! artifact's expected input distribution desynchronizes.

use crate::models::{ClientProfile, ClientRecord, Poutcome, PDAYS_NEVER_CONTACTED};

/// Assembles the scoring record for one prediction request.
///
/// Total and pure: inputs are already bounds-checked, so there is no error
/// path. Derivations:
///
/// * `was_previously_contacted`: 1 when `pdays` is a real day count rather
///   than the 999 "never contacted" sentinel.
/// * `campaign_successful`: 1 when fewer than 5 contacts were made this
///   campaign. The name overstates what it measures (low contact count, not
///   outcome success) but is fixed by the trained artifact.
/// * `poutcome_success`: 1 when the previous campaign ended in success.
pub fn build(profile: ClientProfile) -> ClientRecord {
    let was_previously_contacted = u8::from(profile.pdays != PDAYS_NEVER_CONTACTED);
    let campaign_successful = u8::from(profile.campaign < 5);
    let poutcome_success = u8::from(profile.poutcome == Poutcome::Success);

    ClientRecord {
        profile,
        was_previously_contacted,
        campaign_successful,
        poutcome_success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, DayOfWeek, Education, Job, Marital, Month, YesNoUnknown};

    fn profile() -> ClientProfile {
        ClientProfile {
            age: 35,
            job: Job::Admin,
            marital: Marital::Married,
            education: Education::UniversityDegree,
            default: YesNoUnknown::No,
            housing: YesNoUnknown::Yes,
            loan: YesNoUnknown::No,
            contact: Contact::Cellular,
            month: Month::May,
            day_of_week: DayOfWeek::Thu,
            campaign: 2,
            pdays: 999,
            previous: 0,
            poutcome: Poutcome::Nonexistent,
            emp_var_rate: 1.1,
            cons_price_idx: 93.994,
            cons_conf_idx: -36.4,
            euribor3m: 4.857,
            nr_employed: 5191.0,
        }
    }

    #[test]
    fn never_contacted_sentinel_clears_flag() {
        let record = build(ClientProfile {
            pdays: 999,
            ..profile()
        });
        assert_eq!(record.was_previously_contacted, 0);
    }

    #[test]
    fn any_real_pdays_sets_flag() {
        for pdays in [0, 1, 5, 30, 998] {
            let record = build(ClientProfile { pdays, ..profile() });
            assert_eq!(record.was_previously_contacted, 1, "pdays={}", pdays);
        }
    }

    #[test]
    fn low_contact_count_sets_campaign_flag() {
        for campaign in 1..5 {
            let record = build(ClientProfile {
                campaign,
                ..profile()
            });
            assert_eq!(record.campaign_successful, 1, "campaign={}", campaign);
        }
    }

    #[test]
    fn five_or_more_contacts_clears_campaign_flag() {
        for campaign in [5, 6, 7, 50] {
            let record = build(ClientProfile {
                campaign,
                ..profile()
            });
            assert_eq!(record.campaign_successful, 0, "campaign={}", campaign);
        }
    }

    #[test]
    fn poutcome_success_only_for_success() {
        for (poutcome, expected) in [
            (Poutcome::Nonexistent, 0),
            (Poutcome::Failure, 0),
            (Poutcome::Success, 1),
        ] {
            let record = build(ClientProfile {
                poutcome,
                ..profile()
            });
            assert_eq!(record.poutcome_success, expected, "poutcome={:?}", poutcome);
        }
    }

    #[test]
    fn fresh_prospect_scenario() {
        // pdays=999, campaign=2, poutcome=nonexistent -> (0, 1, 0)
        let record = build(ClientProfile {
            pdays: 999,
            campaign: 2,
            poutcome: Poutcome::Nonexistent,
            ..profile()
        });
        assert_eq!(
            (
                record.was_previously_contacted,
                record.campaign_successful,
                record.poutcome_success
            ),
            (0, 1, 0)
        );
    }

    #[test]
    fn returning_client_scenario() {
        // pdays=5, campaign=7, poutcome=success -> (1, 0, 1)
        let record = build(ClientProfile {
            pdays: 5,
            campaign: 7,
            poutcome: Poutcome::Success,
            ..profile()
        });
        assert_eq!(
            (
                record.was_previously_contacted,
                record.campaign_successful,
                record.poutcome_success
            ),
            (1, 0, 1)
        );
    }
}
