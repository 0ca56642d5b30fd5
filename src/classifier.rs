//! Keyword classification of free-form business questions.
//!
//! Single-word keywords match at the start of a word ("price" hits "prices"
//! but "member" does not hit "remember"); multi-word phrases are plain
//! substring tests on the lower-cased text. Month names must match a whole word.

use crate::schema::{
    InputField, ResponseType, ScenarioClassification, ScenarioType, SeasonalPattern,
    SeasonalityFactors, UserProvidedInputs,
};
use crate::seasonality::peak_and_low_months;
use crate::utils::{month_name, MONTHS_PER_YEAR};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

pub const HELP_PROMPT: &str = "I can model price changes, memberships, hiring, marketing campaigns, cost cutting, or taking on more sales. Which decision are you weighing?";

/// One row of the classification table: the first rule whose keywords hit wins.
struct ScenarioRule {
    scenario: ScenarioType,
    keywords: &'static [&'static str],
}

const SCENARIO_RULES: [ScenarioRule; 6] = [
    ScenarioRule {
        scenario: ScenarioType::Pricing,
        keywords: &[
            "price",
            "pricing",
            "charge more",
            "raise my rates",
            "raise rates",
            "rate increase",
            "discount",
        ],
    },
    ScenarioRule {
        scenario: ScenarioType::Membership,
        keywords: &[
            "membership",
            "member",
            "subscription",
            "subscribe",
            "recurring",
            "retainer",
            "monthly plan",
        ],
    },
    ScenarioRule {
        scenario: ScenarioType::Hiring,
        keywords: &[
            "hire",
            "hiring",
            "employee",
            "staff",
            "technician",
            "assistant",
            "headcount",
            "new person",
        ],
    },
    ScenarioRule {
        scenario: ScenarioType::Marketing,
        keywords: &[
            "marketing",
            "advertis",
            "campaign",
            "promotion",
            "social media",
            "google ads",
            "facebook ads",
            "lead generation",
        ],
    },
    ScenarioRule {
        scenario: ScenarioType::CostCutting,
        keywords: &[
            "cut cost",
            "cutting cost",
            "cost cutting",
            "reduce cost",
            "reduce expenses",
            "lower expenses",
            "save money",
            "overhead",
            "cheaper supplier",
        ],
    },
    ScenarioRule {
        scenario: ScenarioType::SalesVolume,
        keywords: &[
            "more jobs",
            "more customers",
            "more sales",
            "sales volume",
            "additional jobs",
            "increase sales",
            "grow sales",
            "volume",
            "capacity",
        ],
    },
];

const MONTH_ALIASES: [&[&str]; MONTHS_PER_YEAR] = [
    &["january", "jan"],
    &["february", "feb"],
    &["march", "mar"],
    &["april", "apr"],
    &["may"],
    &["june", "jun"],
    &["july", "jul"],
    &["august", "aug"],
    &["september", "sept", "sep"],
    &["october", "oct"],
    &["november", "nov"],
    &["december", "dec"],
];

const SEASONAL_KEYWORDS: &[&str] = &[
    "summer",
    "winter",
    "spring",
    "fall",
    "autumn",
    "season",
    "holiday",
    "christmas",
    "thanksgiving",
    "black friday",
    "easter",
    "back to school",
    "new year",
    "quarter",
    "next month",
    "next year",
    "this year",
    "rest of the year",
    "remainder of the year",
    "end of the year",
];

const EXPLORATORY_PHRASES: &[&str] = &[
    "what if",
    "should i",
    "thinking about",
    "considering",
    "wondering",
    "would it",
    "is it worth",
    "how about",
    "what would happen",
];

lazy_static! {
    /// Currency amounts, percentages, or a number followed by a unit of time.
    static ref NUMBER_TOKEN: Regex = Regex::new(
        r"\$\s?\d|\d+(?:\.\d+)?\s?(?:%|percent)|\b\d+(?:[.,]\d+)?\s*(?:hours?|hrs?|days?|weeks?|wks?|months?|mos?|years?|yrs?)\b"
    )
    .expect("number token pattern is valid");

    static ref SIX_MONTHS: Regex =
        Regex::new(r"\b(?:6|six)[\s-]?months?\b").expect("six month pattern is valid");
}

/// Lower-cased text plus its word list, computed once per call.
struct Question {
    text: String,
    words: Vec<String>,
}

impl Question {
    fn new(raw: &str) -> Self {
        let text = raw.to_lowercase();
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.text.contains(keyword)
        } else {
            self.words.iter().any(|w| w.starts_with(keyword))
        }
    }

    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has_keyword(k))
    }

    fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.text.contains(p))
    }
}

pub struct ScenarioClassifier {
    reference_month: u32,
}

impl Default for ScenarioClassifier {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ScenarioClassifier {
    /// `reference_month` is the 0-based month treated as "now".
    pub fn new(reference_month: u32) -> Self {
        Self {
            reference_month: reference_month.min(MONTHS_PER_YEAR as u32 - 1),
        }
    }

    pub fn classify(&self, text: &str, inputs: &UserProvidedInputs) -> ScenarioClassification {
        let question = Question::new(text);

        let scenario_type = match_scenario(&question);
        let has_seasonal_context = question.has_any(SEASONAL_KEYWORDS) || mentions_month(&question);
        let seasonality =
            has_seasonal_context.then(|| seasonality_from(&question, self.reference_month));
        let response_type = response_type_for(&question, inputs);

        let required_inputs: Vec<InputField> = match response_type {
            ResponseType::DetailedCalculation => required_inputs(scenario_type).to_vec(),
            ResponseType::QuickRidr => Vec::new(),
        };
        let missing_inputs: Vec<InputField> = required_inputs
            .iter()
            .copied()
            .filter(|field| !inputs.contains(*field))
            .collect();

        let ask_user = if scenario_type == ScenarioType::Unknown {
            HELP_PROMPT.to_string()
        } else {
            next_question(scenario_type, &required_inputs, &missing_inputs)
        };

        if let Some(factors) = &seasonality {
            debug!(
                "Extracted seasonality: start {} ({}), {} pattern, {} month ramp-up",
                factors.start_month,
                month_name(factors.start_month),
                factors.seasonal_pattern,
                factors.ramp_up_months
            );
        }
        info!(
            "Classified question as {} ({:?}, {} of {} inputs missing)",
            scenario_type,
            response_type,
            missing_inputs.len(),
            required_inputs.len()
        );

        ScenarioClassification {
            scenario_type,
            required_inputs,
            missing_inputs,
            ask_user,
            confidence: confidence(scenario_type),
            seasonality,
            has_seasonal_context,
            response_type,
        }
    }
}

fn match_scenario(question: &Question) -> ScenarioType {
    SCENARIO_RULES
        .iter()
        .find(|rule| question.has_any(rule.keywords))
        .map(|rule| {
            debug!("Question matched {} rule", rule.scenario);
            rule.scenario
        })
        .unwrap_or(ScenarioType::Unknown)
}

/// First scenario rule the text satisfies, in priority order.
pub fn detect_scenario_type(text: &str) -> ScenarioType {
    match_scenario(&Question::new(text))
}

fn mentions_month(question: &Question) -> bool {
    MONTH_ALIASES
        .iter()
        .any(|aliases| aliases.iter().any(|a| question.has_word(a)))
}

pub fn has_seasonal_context(text: &str) -> bool {
    let question = Question::new(text);
    question.has_any(SEASONAL_KEYWORDS) || mentions_month(&question)
}

/// Scans months in calendar order, so the latest month named wins.
fn named_start_month(question: &Question) -> Option<u32> {
    let mut start = None;
    for (idx, aliases) in MONTH_ALIASES.iter().enumerate() {
        if aliases.iter().any(|a| question.has_word(a)) {
            start = Some(idx as u32);
        }
    }
    start
}

fn seasonality_from(question: &Question, reference_month: u32) -> SeasonalityFactors {
    let start_month = named_start_month(question).unwrap_or_else(|| {
        if question.text.contains("next month") {
            (reference_month + 1) % MONTHS_PER_YEAR as u32
        } else {
            reference_month
        }
    });

    let seasonal_pattern = if question.has_any(&["holiday", "christmas"]) {
        SeasonalPattern::Holiday
    } else if question.has_keyword("summer") {
        SeasonalPattern::Summer
    } else if question.has_any(&["winter", "heating", "snow"]) {
        SeasonalPattern::Winter
    } else if question.has_any(&["seasonal", "spring", "fall"]) {
        SeasonalPattern::Seasonal
    } else {
        SeasonalPattern::Steady
    };

    let duration = if question.contains_any(&["remainder of the year", "rest of the year"]) {
        MONTHS_PER_YEAR as u32 - start_month
    } else if question.has_keyword("quarter") {
        3
    } else if SIX_MONTHS.is_match(&question.text)
        || question.contains_any(&["half year", "half a year"])
    {
        6
    } else {
        MONTHS_PER_YEAR as u32
    };

    let ramp_up_months = if question.has_keyword("immediately")
        || question.text.contains("right away")
    {
        0
    } else if question.has_any(&["gradually", "slowly"]) {
        4
    } else {
        2
    };

    let (peak_months, low_months) = peak_and_low_months(seasonal_pattern);

    SeasonalityFactors {
        start_month,
        duration,
        seasonal_pattern,
        ramp_up_months,
        peak_months: peak_months.to_vec(),
        low_months: low_months.to_vec(),
    }
}

/// Extracts seasonality from text regardless of whether seasonal keywords are present.
pub fn extract_seasonality(text: &str, reference_month: u32) -> SeasonalityFactors {
    seasonality_from(&Question::new(text), reference_month.min(MONTHS_PER_YEAR as u32 - 1))
}

fn response_type_for(question: &Question, inputs: &UserProvidedInputs) -> ResponseType {
    if NUMBER_TOKEN.is_match(&question.text) || !inputs.is_empty() {
        ResponseType::DetailedCalculation
    } else if question.contains_any(EXPLORATORY_PHRASES) {
        ResponseType::QuickRidr
    } else {
        ResponseType::DetailedCalculation
    }
}

/// Numbers in the text win over exploratory phrasing.
pub fn determine_response_type(text: &str, inputs: &UserProvidedInputs) -> ResponseType {
    response_type_for(&Question::new(text), inputs)
}

pub fn required_inputs(scenario: ScenarioType) -> &'static [InputField] {
    match scenario {
        ScenarioType::Pricing => &[
            InputField::CurrentPrice,
            InputField::NewPrice,
            InputField::AvgMonthlySales,
        ],
        ScenarioType::Membership => &[InputField::MonthlyFee, InputField::TargetMembers],
        ScenarioType::Hiring => &[
            InputField::HourlyRate,
            InputField::HoursPerWeek,
            InputField::ProductivityIncrease,
        ],
        ScenarioType::Marketing => &[
            InputField::CampaignCost,
            InputField::ExpectedNewCustomers,
            InputField::AvgCustomerValue,
        ],
        ScenarioType::CostCutting => &[InputField::CurrentCosts, InputField::CostReduction],
        ScenarioType::SalesVolume => &[InputField::AdditionalJobs, InputField::AvgJobValue],
        ScenarioType::Unknown => &[],
    }
}

pub fn confidence(scenario: ScenarioType) -> f64 {
    match scenario {
        ScenarioType::Pricing => 0.9,
        ScenarioType::Membership => 0.85,
        ScenarioType::Hiring => 0.8,
        ScenarioType::Marketing => 0.8,
        ScenarioType::CostCutting => 0.75,
        ScenarioType::SalesVolume => 0.8,
        ScenarioType::Unknown => 0.0,
    }
}

fn combined_prompt(scenario: ScenarioType) -> &'static str {
    match scenario {
        ScenarioType::Pricing => {
            "What do you charge today, and what new price are you considering?"
        }
        ScenarioType::Membership => {
            "What monthly fee would members pay, and how many members do you expect?"
        }
        ScenarioType::Hiring => {
            "What hourly rate would you pay, and how many hours per week would they work?"
        }
        ScenarioType::Marketing => {
            "What would the campaign cost per month, and how many new customers do you expect from it?"
        }
        ScenarioType::CostCutting => {
            "What are your current monthly costs, and by what percentage do you plan to cut them?"
        }
        ScenarioType::SalesVolume => {
            "How many additional jobs per month are you aiming for, and what is your average job value?"
        }
        ScenarioType::Unknown => HELP_PROMPT,
    }
}

fn field_prompt(field: InputField) -> &'static str {
    match field {
        InputField::CurrentPrice => "What do you charge today?",
        InputField::NewPrice => "What new price are you considering?",
        InputField::AvgMonthlySales => "How many sales do you make in a typical month?",
        InputField::CustomerRetention => "What percentage of customers do you expect to keep?",
        InputField::MonthlyFee => "What monthly fee would members pay?",
        InputField::TargetMembers => "How many members do you expect to sign up?",
        InputField::SetupCost => "What would it cost to set the program up?",
        InputField::HourlyRate => "What hourly rate would you pay the new hire?",
        InputField::HoursPerWeek => "How many hours per week would they work?",
        InputField::ProductivityIncrease => {
            "By what percentage would this hire increase your output?"
        }
        InputField::TrainingCost => "What would recruiting and training cost?",
        InputField::CampaignCost => "How much would the campaign cost per month?",
        InputField::ExpectedNewCustomers => "How many new customers per month do you expect?",
        InputField::AvgCustomerValue => "What is a new customer worth to you on average?",
        InputField::CurrentCosts => "What are your current monthly operating costs?",
        InputField::CostReduction => "By what percentage do you plan to cut them?",
        InputField::ImplementationCost => "What would it cost to make the change?",
        InputField::AdditionalJobs => "How many additional jobs per month are you aiming for?",
        InputField::AvgJobValue => "What is your average job value?",
    }
}

fn next_question(
    scenario: ScenarioType,
    required: &[InputField],
    missing: &[InputField],
) -> String {
    if missing.is_empty() {
        return String::new();
    }
    if required.len() >= 2 && missing.contains(&required[0]) && missing.contains(&required[1]) {
        return combined_prompt(scenario).to_string();
    }
    required
        .iter()
        .find(|field| missing.contains(*field))
        .map(|field| field_prompt(*field).to_string())
        .unwrap_or_default()
}
