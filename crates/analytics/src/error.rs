use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The metric divides by total sales and total sales is zero.
    #[error("Metric '{0}' is undefined: total sales is zero")]
    UndefinedMetric(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
