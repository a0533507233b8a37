use super::*;

/// Count the matches of `re` in `haystack`
pub fn regex_matches<S>(case_sensitive: bool, haystack: &str, re: S) -> usize
where
    S: AsRef<str> + Display,
{
    let regex_pattern = if case_sensitive {
        re.to_string()
    } else {
        format!("(?i){re}")
    };
    let re = fancy_regex::Regex::new(&regex_pattern).expect("Failed to compile regex");
    re.find_iter(haystack).count()
}

/// Assert that `re` matches `haystack` exactly `expect_match` times
pub fn match_count<S>(case_sensitive: bool, haystack: &str, re: S, expect_match: usize) -> TestResult
where
    S: AsRef<str> + Display,
{
    let match_count = regex_matches(case_sensitive, haystack, &re);
    pretty_assert_eq!(
        match_count, expect_match,
        "regex: {re} - expected match count: {expect_match}, got {match_count}\nFailed to match on:\n{haystack}"
    );
    Ok(())
}

/// Assert stderr holds no errors, warnings or panics
pub fn assert_no_errors_or_warn(stderr: &str) -> TestResult {
    match_count(true, stderr, "ERROR", 0)?;
    match_count(true, stderr, "WARN", 0)?;
    match_count(false, stderr, "thread.*panicked", 0)?;
    Ok(())
}
