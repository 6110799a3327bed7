//! Simple quality proxies for asserting on generated responses.

/// Fraction of `keywords` that appear in `response`, case-insensitive,
/// rounded to two decimal places. An empty keyword list scores `1.0`.
#[must_use]
pub fn keyword_coverage(response: &str, keywords: &[&str]) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }

    let lowered = response.to_lowercase();
    let hits = keywords
        .iter()
        .filter(|kw| lowered.contains(&kw.to_lowercase()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let fraction = hits as f64 / keywords.len() as f64;
    (fraction * 100.0).round() / 100.0
}

/// Number of whitespace-separated tokens in `response`.
#[must_use]
pub fn response_tokens(response: &str) -> usize {
    response.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_counts_case_insensitive_hits() {
        let coverage = keyword_coverage("Agentic AI uses a Controller.", &["agentic", "controller"]);
        assert!((coverage - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coverage_rounds_to_two_places() {
        let coverage = keyword_coverage("only agentic here", &["agentic", "memory", "tools"]);
        assert!((coverage - 0.33).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_keyword_list_is_full_coverage() {
        assert!((keyword_coverage("anything", &[]) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_tokens() {
        assert_eq!(response_tokens("three small words"), 3);
        assert_eq!(response_tokens("  spaced\tout\nwords  "), 3);
        assert_eq!(response_tokens(""), 0);
    }
}
