use crate::record::{MetricValue, SurveyRecord};

pub(crate) fn record(
    year: i32,
    university: &str,
    school: &str,
    degree: &str,
    rate: impl Into<MetricValue>,
    salary: i64,
) -> SurveyRecord {
    SurveyRecord {
        year,
        university: university.to_string(),
        school: school.to_string(),
        degree: degree.to_string(),
        employment_rate_overall: rate.into(),
        employment_rate_ft_perm: MetricValue::Integer(80),
        basic_monthly_mean: MetricValue::Integer(salary),
        basic_monthly_median: MetricValue::Integer(salary),
        gross_monthly_mean: MetricValue::Integer(salary + 100),
        gross_monthly_median: MetricValue::Integer(salary + 100),
        gross_monthly_25_percentile: MetricValue::Integer(salary - 500),
        gross_monthly_75_percentile: MetricValue::Integer(salary + 500),
    }
}

pub(crate) fn survey() -> Vec<SurveyRecord> {
    vec![
        record(2019, "NUS", "Computing", "Computer Science", 95, 4500),
        record(2018, "NTU", "Engineering", "Civil Engineering", 88, 3500),
        record(2020, "NUS", "Business", "Accountancy", "91.5%", 3800),
        record(2018, "SMU", "School of Law", "Bachelor of Laws", 97, 5000),
        record(2020, "NTU", "Engineering", "Civil Engineering", 85, 3600),
        record(2019, "NTU", "Engineering", "Computer Science", 93, 4300),
        record(2018, "NUS", "Computing", "Computer Science", 92, 4200),
    ]
}
