//! Title-based deduplication of sweep output.

use std::collections::HashSet;

use crate::models::PaperRecord;

/// Keep the first record for each lowercased title.
///
/// Relative order of the kept records is unchanged.
pub fn dedup_by_title(papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(papers.len());

    papers
        .into_iter()
        .filter(|paper| seen.insert(paper.title_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use chrono::Utc;

    fn paper(title: &str, year: &str) -> PaperRecord {
        PaperRecord::from_raw(RawRecord::new(title).pub_year(year), "mock", Utc::now())
    }

    #[test]
    fn test_case_insensitive_titles_collapse() {
        let papers = vec![paper("Voice Agents", "2024"), paper("voice agents", "2025")];
        let unique = dedup_by_title(papers);

        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].title, "Voice Agents");
        assert_eq!(unique[0].year, "2024");
    }

    #[test]
    fn test_first_occurrence_wins_and_order_kept() {
        let papers = vec![
            paper("B", "2024"),
            paper("A", "2024"),
            paper("b", "2025"),
            paper("C", "2024"),
            paper("a", "2025"),
        ];
        let titles: Vec<String> = dedup_by_title(papers).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_by_title(Vec::new()).is_empty());
    }
}
