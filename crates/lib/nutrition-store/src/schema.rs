pub const TABLE_FOOD: &str = "food";

pub const FOOD_ID_PREFIX: &str = "fd_";
pub const EAN13_LEN: usize = 13;

/// Joins searchable names inside `search_text`. Query terms are split on
/// whitespace, so no term can match across two names.
pub const SEARCH_TEXT_SEPARATOR: char = '\n';

/// Builds the lowercased name index stored alongside each row.
#[must_use]
pub fn build_search_text(name: &str, alternate_names: &[String]) -> String {
    let mut text = name.to_lowercase();
    for alias in alternate_names {
        text.push(SEARCH_TEXT_SEPARATOR);
        text.push_str(&alias.to_lowercase());
    }
    text
}

#[must_use]
pub fn is_food_id(value: &str) -> bool {
    value.starts_with(FOOD_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_text_lowercases_and_separates_names() {
        let text = build_search_text(
            "Banana, Raw",
            &["Cavendish BANANA".to_string(), "plátano".to_string()],
        );
        assert_eq!(text, "banana, raw\ncavendish banana\nplátano");
    }

    #[test]
    fn search_text_without_aliases_is_just_the_name() {
        assert_eq!(build_search_text("Oats", &[]), "oats");
    }
}
