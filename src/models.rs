use crate::errors::AppError;
use crate::recommendation::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Categorical Field Enums ============
//
// Variant spellings must stay byte-identical to the category strings the
// pipeline was trained on; the artifact's indicator columns bind against
// them by value.

/// Client occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Job {
    #[serde(rename = "admin.")]
    Admin,
    #[serde(rename = "blue-collar")]
    BlueCollar,
    #[serde(rename = "entrepreneur")]
    Entrepreneur,
    #[serde(rename = "housemaid")]
    Housemaid,
    #[serde(rename = "management")]
    Management,
    #[serde(rename = "retired")]
    Retired,
    #[serde(rename = "self-employed")]
    SelfEmployed,
    #[serde(rename = "services")]
    Services,
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "technician")]
    Technician,
    #[serde(rename = "unemployed")]
    Unemployed,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Job {
    pub fn as_str(&self) -> &'static str {
        match self {
            Job::Admin => "admin.",
            Job::BlueCollar => "blue-collar",
            Job::Entrepreneur => "entrepreneur",
            Job::Housemaid => "housemaid",
            Job::Management => "management",
            Job::Retired => "retired",
            Job::SelfEmployed => "self-employed",
            Job::Services => "services",
            Job::Student => "student",
            Job::Technician => "technician",
            Job::Unemployed => "unemployed",
            Job::Unknown => "unknown",
        }
    }
}

/// Marital status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marital {
    Married,
    Single,
    Divorced,
    Unknown,
}

impl Marital {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marital::Married => "married",
            Marital::Single => "single",
            Marital::Divorced => "divorced",
            Marital::Unknown => "unknown",
        }
    }
}

/// Highest education level reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    #[serde(rename = "basic.4y")]
    Basic4y,
    #[serde(rename = "basic.6y")]
    Basic6y,
    #[serde(rename = "basic.9y")]
    Basic9y,
    #[serde(rename = "high.school")]
    HighSchool,
    #[serde(rename = "illiterate")]
    Illiterate,
    #[serde(rename = "professional.course")]
    ProfessionalCourse,
    #[serde(rename = "university.degree")]
    UniversityDegree,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Education {
    pub fn as_str(&self) -> &'static str {
        match self {
            Education::Basic4y => "basic.4y",
            Education::Basic6y => "basic.6y",
            Education::Basic9y => "basic.9y",
            Education::HighSchool => "high.school",
            Education::Illiterate => "illiterate",
            Education::ProfessionalCourse => "professional.course",
            Education::UniversityDegree => "university.degree",
            Education::Unknown => "unknown",
        }
    }
}

/// Tri-state flag used for credit default, housing loan and personal loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNoUnknown {
    No,
    Yes,
    Unknown,
}

impl YesNoUnknown {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNoUnknown::No => "no",
            YesNoUnknown::Yes => "yes",
            YesNoUnknown::Unknown => "unknown",
        }
    }
}

/// Channel of the last campaign contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contact {
    Cellular,
    Telephone,
}

impl Contact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Contact::Cellular => "cellular",
            Contact::Telephone => "telephone",
        }
    }
}

/// Month of the last contact, three-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }
}

/// Weekday of the last contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
        }
    }
}

/// Outcome of the previous marketing campaign for this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Poutcome {
    Nonexistent,
    Failure,
    Success,
}

impl Poutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Poutcome::Nonexistent => "nonexistent",
            Poutcome::Failure => "failure",
            Poutcome::Success => "success",
        }
    }
}

// ============ Client Profile (raw form fields) ============

/// `pdays` value meaning "never previously contacted".
pub const PDAYS_NEVER_CONTACTED: u32 = 999;

/// Raw client attributes as collected by the form.
///
/// The served form constrains every field with bounded widgets, but the JSON
/// endpoint is reachable directly, so `validate` re-checks the same bounds
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Client age in years (18-95).
    pub age: u32,
    /// Occupation.
    pub job: Job,
    /// Marital status.
    pub marital: Marital,
    /// Education level.
    pub education: Education,
    /// Has credit in default?
    pub default: YesNoUnknown,
    /// Has a housing loan?
    pub housing: YesNoUnknown,
    /// Has a personal loan?
    pub loan: YesNoUnknown,
    /// Channel of the last contact.
    pub contact: Contact,
    /// Month of the last contact.
    pub month: Month,
    /// Weekday of the last contact.
    pub day_of_week: DayOfWeek,
    /// Number of contacts performed during this campaign (>= 1).
    pub campaign: u32,
    /// Days since the client was last contacted in a previous campaign
    /// (0-999, 999 = never contacted).
    pub pdays: u32,
    /// Number of contacts performed before this campaign (>= 0).
    pub previous: u32,
    /// Outcome of the previous campaign.
    pub poutcome: Poutcome,
    /// Employment variation rate, quarterly indicator.
    #[serde(alias = "emp.var.rate")]
    pub emp_var_rate: f64,
    /// Consumer price index, monthly indicator.
    #[serde(alias = "cons.price.idx")]
    pub cons_price_idx: f64,
    /// Consumer confidence index, monthly indicator.
    #[serde(alias = "cons.conf.idx")]
    pub cons_conf_idx: f64,
    /// Euribor 3-month rate, daily indicator.
    pub euribor3m: f64,
    /// Number of employees, quarterly indicator.
    #[serde(alias = "nr.employed")]
    pub nr_employed: f64,
}

impl ClientProfile {
    /// Checks every field against the bounds the form widgets enforce.
    pub fn validate(&self) -> Result<(), AppError> {
        fn check(ok: bool, msg: &str) -> Result<(), AppError> {
            if ok {
                Ok(())
            } else {
                Err(AppError::BadRequest(msg.to_string()))
            }
        }

        check(
            (18..=95).contains(&self.age),
            "age must be between 18 and 95",
        )?;
        check(
            (1..=50).contains(&self.campaign),
            "campaign must be between 1 and 50",
        )?;
        check(self.pdays <= 999, "pdays must be between 0 and 999")?;
        check(self.previous <= 10, "previous must be between 0 and 10")?;
        check(
            (-5.0..=5.0).contains(&self.emp_var_rate),
            "emp_var_rate must be between -5.0 and 5.0",
        )?;
        check(
            (90.0..=100.0).contains(&self.cons_price_idx),
            "cons_price_idx must be between 90.0 and 100.0",
        )?;
        check(
            (-60.0..=0.0).contains(&self.cons_conf_idx),
            "cons_conf_idx must be between -60.0 and 0.0",
        )?;
        check(
            (0.0..=10.0).contains(&self.euribor3m),
            "euribor3m must be between 0.0 and 10.0",
        )?;
        check(
            (4900.0..=5300.0).contains(&self.nr_employed),
            "nr_employed must be between 4900.0 and 5300.0",
        )?;

        Ok(())
    }
}

// ============ Client Record (profile + engineered features) ============

/// A single scoring record: the raw profile plus the three engineered
/// indicator features the pipeline was trained with.
///
/// Constructed only by [`crate::features::build`]; the derived fields are
/// never user-supplied. A record lives for exactly one prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(flatten)]
    pub profile: ClientProfile,
    /// 1 when `pdays` is not the 999 sentinel.
    pub was_previously_contacted: u8,
    /// 1 when `campaign` < 5. The name is a misnomer inherited from the
    /// trained artifact (it flags a low contact count, not outcome success)
    /// and must not change while that artifact is in use.
    pub campaign_successful: u8,
    /// 1 when `poutcome` is "success".
    pub poutcome_success: u8,
}

impl ClientRecord {
    /// Resolves a numeric column of the model's input vocabulary.
    ///
    /// Accepts both the trained column spellings (`emp.var.rate`) and their
    /// snake_case equivalents.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let value = match column {
            "age" => f64::from(self.profile.age),
            "campaign" => f64::from(self.profile.campaign),
            "pdays" => f64::from(self.profile.pdays),
            "previous" => f64::from(self.profile.previous),
            "emp.var.rate" | "emp_var_rate" => self.profile.emp_var_rate,
            "cons.price.idx" | "cons_price_idx" => self.profile.cons_price_idx,
            "cons.conf.idx" | "cons_conf_idx" => self.profile.cons_conf_idx,
            "euribor3m" => self.profile.euribor3m,
            "nr.employed" | "nr_employed" => self.profile.nr_employed,
            "was_previously_contacted" => f64::from(self.was_previously_contacted),
            "campaign_successful" => f64::from(self.campaign_successful),
            "poutcome_success" => f64::from(self.poutcome_success),
            _ => return None,
        };
        Some(value)
    }

    /// Resolves a categorical column of the model's input vocabulary to its
    /// category string.
    pub fn categorical(&self, column: &str) -> Option<&'static str> {
        let value = match column {
            "job" => self.profile.job.as_str(),
            "marital" => self.profile.marital.as_str(),
            "education" => self.profile.education.as_str(),
            "default" => self.profile.default.as_str(),
            "housing" => self.profile.housing.as_str(),
            "loan" => self.profile.loan.as_str(),
            "contact" => self.profile.contact.as_str(),
            "month" => self.profile.month.as_str(),
            "day_of_week" => self.profile.day_of_week.as_str(),
            "poutcome" => self.profile.poutcome.as_str(),
            _ => return None,
        };
        Some(value)
    }
}

// ============ API Response Models ============

/// Response payload for a scoring request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Correlation id for this prediction.
    pub request_id: Uuid,
    /// Predicted class: 1 = subscribes, 0 = does not.
    pub label: u8,
    /// Human-readable verdict for the result panel.
    pub verdict: String,
    /// Probability assigned to the subscription class, in [0, 1].
    pub probability: f64,
    /// Priority tier derived from the probability.
    pub tier: Tier,
    /// Tier-specific action lines.
    pub recommendation: Vec<String>,
    /// Version of the artifact that produced the score.
    pub model_version: String,
    /// Whether the score was served from the short-TTL cache.
    pub cached: bool,
    /// When the score was computed.
    pub timestamp: DateTime<Utc>,
}

/// Metadata about the loaded scoring artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    /// Artifact name.
    pub name: String,
    /// Artifact version.
    pub version: String,
    /// When the pipeline was trained.
    pub trained_at: DateTime<Utc>,
    /// Number of encoded input columns.
    pub columns: usize,
    /// Decision threshold for the positive class.
    pub threshold: f64,
}
