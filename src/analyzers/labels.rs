/// Case-insensitive substring match. A blank query matches everything.
pub fn matches_query(label: &str, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty() || label.to_lowercase().contains(&q)
}

/// Keeps the items whose label matches `query`.
pub fn filter_by_label<'a, T, F>(items: &'a [T], query: &str, label: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    items
        .iter()
        .filter(|item| matches_query(label(item), query))
        .collect()
}

/// Turns an identifier slug into a display title:
/// `"wonder-of-the-seas"` becomes `"Wonder Of The Seas"`.
pub fn titleize_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_query() {
        assert!(matches_query("Cozumel", "  coz "));
        assert!(matches_query("Cozumel", ""));
        assert!(!matches_query("Nassau", "roatan"));
    }

    #[test]
    fn test_filter_by_label() {
        let themes = ["Lost Luggage", "Food", "Luggage delays"];
        let hits = filter_by_label(&themes, "LUGGAGE", |t| *t);
        assert_eq!(hits, [&"Lost Luggage", &"Luggage delays"]);
    }

    #[test]
    fn test_titleize_slug() {
        assert_eq!(titleize_slug("wonder-of-the-seas"), "Wonder Of The Seas");
        assert_eq!(titleize_slug("carnival"), "Carnival");
        assert_eq!(titleize_slug("a--b"), "A  B");
        assert_eq!(titleize_slug(""), "");
    }
}
