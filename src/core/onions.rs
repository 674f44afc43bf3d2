//! Headlines for the `onion` command, in the style of satirical tech news.

pub const ONIONS: &[&str] = &[
    "Startup Pivots From Solving Problem To Describing Problem In Newsletter",
    "Developer Spends Entire Weekend Automating Task That Takes Four Seconds",
    "Local Man Rewrites Perfectly Functional Tool In Rust, Reports Feeling Safer",
    "Tech Company Announces Bold New Initiative To Do What It Already Does, But With AI",
    "Area Programmer Confident Bug Will Not Reproduce In Production",
    "New JavaScript Framework Released During Time It Took To Read This Headline",
    "Engineer Closes 400 Browser Tabs, Loses Will To Live",
    "Report: Every Side Project Now Contains Its Own Half-Finished Static Site Generator",
    "Man Who Read Half Of A Thread Now Expert On Distributed Consensus",
    "Code Review Consists Entirely Of Debate Over Trailing Commas",
    "Startup Raises $40 Million To Disrupt Spreadsheets With Slightly Different Spreadsheet",
    "Senior Developer Deletes Thousand Lines Of Code, Promoted Immediately",
    "Study Finds 90% Of Technical Debt Was Described As Temporary",
    "Dev Team Celebrates Successful Migration Back To The Thing They Migrated Away From",
    "Programmer Nods Knowingly At Regex He Wrote Yesterday, Has No Idea What It Does",
];

/// The first `limit` headlines, or all of them.
pub fn headlines(limit: Option<usize>) -> &'static [&'static str] {
    match limit {
        Some(n) => &ONIONS[..n.min(ONIONS.len())],
        None => ONIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlines_limit() {
        assert_eq!(headlines(Some(3)).len(), 3);
        assert_eq!(headlines(None).len(), ONIONS.len());
        assert_eq!(headlines(Some(1_000)).len(), ONIONS.len());
        assert!(headlines(Some(0)).is_empty());
    }
}
