use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::analysis::filters::{FilterSet, FilterValue};
use crate::error::{Error, Result};
use crate::models::{Column, PostingSkillRow, SkillCount, SkillTable};

/// Counts skills in the filtered table and returns the `top_n` most frequent.
///
/// `filters` maps column names (`location`, `companyName`) to filter values. Results are
/// sorted by count descending; equal counts keep the order in which the skill first
/// appears in the table. No matching rows yields an empty list.
pub fn rank_skills<K, V>(
    table: &SkillTable,
    filters: impl IntoIterator<Item = (K, V)>,
    top_n: i64,
) -> Result<Vec<SkillCount>>
where
    K: AsRef<str>,
    V: Into<FilterValue>,
{
    let top_n = positive_top_n(top_n)?;
    let filters = FilterSet::from_pairs(filters)?;
    rank_filtered(table, &filters, top_n)
}

pub fn rank_filtered(
    table: &SkillTable,
    filters: &FilterSet,
    top_n: NonZeroUsize,
) -> Result<Vec<SkillCount>> {
    if !table.has_column(Column::Skill) {
        return Err(Error::invalid_input(format!(
            "table has no '{}' column",
            Column::Skill
        )));
    }

    let mut counts = count_skills(filters.apply(table.rows()));
    counts.truncate(top_n.get());
    Ok(counts)
}

pub fn positive_top_n(top_n: i64) -> Result<NonZeroUsize> {
    usize::try_from(top_n)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            Error::invalid_input(format!("top_n must be a positive integer, got {}", top_n))
        })
}

/// Full frequency list in ranked order.
pub fn count_skills<'a>(rows: impl Iterator<Item = &'a PostingSkillRow>) -> Vec<SkillCount> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<SkillCount> = Vec::new();

    for row in rows {
        match index.get(row.skill.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(row.skill.as_str(), counts.len());
                counts.push(SkillCount::new(row.skill.as_str(), 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-occurrence order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_table() -> SkillTable {
        SkillTable::from_rows(vec![
            PostingSkillRow::new("Python", Some("Remote"), Some("A")),
            PostingSkillRow::new("SQL", Some("Remote"), Some("A")),
            PostingSkillRow::new("Python", Some("Remote"), Some("B")),
            PostingSkillRow::new("Python", Some("NYC"), Some("A")),
        ])
    }

    fn larger_table() -> SkillTable {
        let data = [
            ("SQL", "Remote", "A"),
            ("Python", "NYC", "B"),
            ("Excel", "Remote", "A"),
            ("Python", "Remote", "C"),
            ("SQL", "NYC", "A"),
            ("Tableau", "Remote", "B"),
            ("Excel", "NYC", "C"),
            ("Python", "Remote", "A"),
            ("Spark", "Boston", "B"),
            ("Tableau", "Boston", "A"),
        ];
        SkillTable::from_rows(
            data.iter()
                .map(|(s, l, c)| PostingSkillRow::new(*s, Some(*l), Some(*c)))
                .collect(),
        )
    }

    #[test]
    fn test_location_filter_scenario() {
        let result = rank_skills(&sample_table(), [("location", "Remote")], 5).unwrap();
        assert_eq!(
            result,
            vec![SkillCount::new("Python", 2), SkillCount::new("SQL", 1)]
        );
    }

    #[test]
    fn test_no_filter_truncates_to_top_n() {
        let filters = [("location", "All"), ("companyName", "All")];
        let result = rank_skills(&sample_table(), filters, 2).unwrap();
        assert_eq!(
            result,
            vec![SkillCount::new("Python", 3), SkillCount::new("SQL", 1)]
        );
    }

    #[test]
    fn test_accepts_hash_map_filters() {
        let mut filters = HashMap::new();
        filters.insert("companyName".to_string(), FilterValue::exact("A"));
        let result = rank_skills(&sample_table(), &filters, 10).unwrap();
        assert_eq!(
            result,
            vec![SkillCount::new("Python", 2), SkillCount::new("SQL", 1)]
        );
    }

    #[test]
    fn test_non_positive_top_n_is_invalid() {
        let no_filters: [(&str, &str); 0] = [];
        for top_n in [0, -1, i64::MIN] {
            let err = rank_skills(&sample_table(), no_filters, top_n).unwrap_err();
            assert!(err.is_invalid_input(), "top_n = {}", top_n);
        }
    }

    #[test]
    fn test_accepts_top_n_beyond_dashboard_range() {
        let no_filters: [(&str, &str); 0] = [];
        let result = rank_skills(&larger_table(), no_filters, 1_000).unwrap();
        assert_eq!(result.len(), 5);
        let result = rank_skills(&larger_table(), no_filters, 1).unwrap();
        assert_eq!(result, vec![SkillCount::new("Python", 3)]);
    }

    #[test]
    fn test_unknown_filter_column_is_invalid() {
        let err = rank_skills(&sample_table(), [("title", "Data Scientist")], 5).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_missing_skill_column_is_invalid() {
        let table = SkillTable::new([Column::Location, Column::CompanyName], Vec::new());
        let err = rank_filtered(&table, &FilterSet::new(), NonZeroUsize::MIN).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_unmatched_filter_yields_empty_result() {
        let result = rank_skills(&sample_table(), [("location", "Mars")], 5).unwrap();
        assert!(result.is_empty());

        let result = rank_skills(&sample_table(), [("location", "remote")], 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_table_yields_empty_result() {
        let table = SkillTable::from_rows(Vec::new());
        let result = rank_skills(&table, [("companyName", "A")], 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        // SQL, Excel and Tableau all appear twice; SQL shows up first, Tableau last
        let no_filters: [(&str, &str); 0] = [];
        let result = rank_skills(&larger_table(), no_filters, 50).unwrap();
        let names: Vec<_> = result.iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(names, vec!["Python", "SQL", "Excel", "Tableau", "Spark"]);
    }

    #[test]
    fn test_counts_match_recomputation_for_every_filter() {
        let table = larger_table();
        let mut selections = vec![FilterValue::Any];
        selections.extend(
            table
                .distinct_values(Column::Location)
                .into_iter()
                .map(FilterValue::Exact),
        );
        let companies: Vec<FilterValue> = std::iter::once(FilterValue::Any)
            .chain(
                table
                    .distinct_values(Column::CompanyName)
                    .into_iter()
                    .map(FilterValue::Exact),
            )
            .collect();

        for location in &selections {
            for company in &companies {
                let filters = FilterSet::new()
                    .with_location(location)
                    .with_company(company);
                let filtered: Vec<_> = filters.apply(table.rows()).collect();
                let distinct: std::collections::HashSet<_> =
                    filtered.iter().map(|r| r.skill.as_str()).collect();

                for top_n in 1..=6 {
                    let result =
                        rank_filtered(&table, &filters, NonZeroUsize::new(top_n).unwrap())
                            .unwrap();

                    assert_eq!(result.len(), top_n.min(distinct.len()));
                    for entry in &result {
                        let expected =
                            filtered.iter().filter(|r| r.skill == entry.skill).count() as u64;
                        assert_eq!(entry.count, expected);
                        assert!(entry.count >= 1);
                    }
                    for pair in result.windows(2) {
                        assert!(pair[0].count >= pair[1].count);
                    }
                }

                let total: u64 = count_skills(filters.apply(table.rows()))
                    .iter()
                    .map(|s| s.count)
                    .sum();
                assert_eq!(total as usize, filtered.len());
            }
        }
    }
}
