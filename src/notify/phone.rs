/// Country prefix added to local mobile numbers
pub const COUNTRY_CODE: &str = "966";

/// Reduce a phone number to digits in international form.
///
/// Local mobile numbers (`05…`) drop the trunk zero and gain the country
/// prefix; bare `5…` numbers gain the prefix. Anything else is left as digits.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        if rest.starts_with('5') {
            return format!("{}{}", COUNTRY_CODE, rest);
        }
    } else if digits.starts_with('5') {
        return format!("{}{}", COUNTRY_CODE, digits);
    }

    digits
}
