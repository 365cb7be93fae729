/// One stored mapping entry: an exact normalized description or a wildcard
/// pattern, pointing at a `GROUP.Category` path.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub id: Option<i64>,
    pub key: String,
    pub group_key: String,
    pub category: String,
    pub is_pattern: bool,
}

/// Intermediate representation from the OFX parser before DB insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub fitid: String,
    pub date: String,
    pub amount: f64,
    pub description: String,
}
