use crate::constants::DEFAULT_CUSTOMER_NAME;

/// Placeholder spellings accepted in templates. Double-brace forms first so
/// the single-brace pass never sees them.
const PLACEHOLDERS: [&str; 4] = [
    "{{customer_name}}",
    "{{Customer_Name}}",
    "{customer_name}",
    "{Customer_Name}",
];

/// Substitutes the customer's display name, or `고객` when there is none.
pub fn personalize(template: &str, name: Option<&str>) -> String {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_CUSTOMER_NAME);

    PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |message, placeholder| {
            message.replace(placeholder, name)
        })
}
