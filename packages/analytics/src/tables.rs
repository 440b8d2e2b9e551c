//! Frequency tables.
//!
//! Rows are created in first-seen order and then stable-sorted by
//! descending count, so ties keep the order in which their key first
//! appeared in the input.

use std::collections::BTreeMap;

use qrtrack_analytics_models::{CategoryCount, CategoryKey, CountryCount};
use qrtrack_scan_models::ScanRecord;

/// Counts occurrences of each value. Missing or blank values are counted
/// under [`CategoryKey::Unknown`].
#[must_use]
pub fn frequency_table<'a, I>(values: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut index: BTreeMap<CategoryKey, usize> = BTreeMap::new();
    let mut table: Vec<CategoryCount> = Vec::new();

    for value in values {
        let key = CategoryKey::from_field(value);
        if let Some(&idx) = index.get(&key) {
            table[idx].count += 1;
        } else {
            index.insert(key.clone(), table.len());
            table.push(CategoryCount {
                name: key,
                count: 1,
            });
        }
    }

    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// Country table where each row carries a city table over the scans from
/// that country.
#[must_use]
pub fn country_table(scans: &[ScanRecord]) -> Vec<CountryCount> {
    let mut index: BTreeMap<CategoryKey, usize> = BTreeMap::new();
    let mut groups: Vec<(CategoryKey, Vec<Option<&str>>)> = Vec::new();

    for scan in scans {
        let key = CategoryKey::from_field(scan.country.as_deref());
        let city = scan.city.as_deref();
        if let Some(&idx) = index.get(&key) {
            groups[idx].1.push(city);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push((key, vec![city]));
        }
    }

    let mut table: Vec<CountryCount> = groups
        .into_iter()
        .map(|(name, cities)| CountryCount {
            name,
            count: cities.len() as u64,
            top_cities: frequency_table(cities),
        })
        .collect();

    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn known(name: &str) -> CategoryKey {
        CategoryKey::Known(name.to_string())
    }

    #[test]
    fn counts_with_unknown_bucket() {
        let table = frequency_table([Some("Chrome"), None, Some("Chrome")]);
        assert_eq!(
            table,
            vec![
                CategoryCount {
                    name: known("Chrome"),
                    count: 2
                },
                CategoryCount {
                    name: CategoryKey::Unknown,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let table = frequency_table([Some("b"), Some("a"), None, Some("c"), Some("a"), Some("b")]);
        let names: Vec<String> = table.iter().map(|r| r.name.to_string()).collect();
        assert_eq!(names, vec!["b", "a", "unknown", "c"]);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(frequency_table(std::iter::empty()).is_empty());
        assert!(country_table(&[]).is_empty());
    }

    #[test]
    fn countries_carry_their_own_cities() {
        let scan = |country: Option<&str>, city: Option<&str>| {
            let mut s = ScanRecord::new(0, "1.1.1.1", Utc::now());
            s.country = country.map(str::to_string);
            s.city = city.map(str::to_string);
            s
        };
        let scans = vec![
            scan(Some("Brazil"), Some("Recife")),
            scan(Some("Portugal"), Some("Lisbon")),
            scan(Some("Brazil"), Some("Olinda")),
            scan(Some("Brazil"), None),
            scan(None, Some("Nowhere")),
            scan(Some("Brazil"), Some("Recife")),
        ];

        let table = country_table(&scans);
        assert_eq!(table.len(), 3);

        assert_eq!(table[0].name, known("Brazil"));
        assert_eq!(table[0].count, 4);
        let cities: Vec<(String, u64)> = table[0]
            .top_cities
            .iter()
            .map(|c| (c.name.to_string(), c.count))
            .collect();
        assert_eq!(
            cities,
            vec![
                ("Recife".to_string(), 2),
                ("Olinda".to_string(), 1),
                ("unknown".to_string(), 1),
            ]
        );

        assert_eq!(table[1].name, known("Portugal"));
        assert_eq!(table[2].name, CategoryKey::Unknown);
        assert_eq!(table[2].top_cities[0].name, known("Nowhere"));

        let city_total: u64 = table
            .iter()
            .flat_map(|c| &c.top_cities)
            .map(|c| c.count)
            .sum();
        assert_eq!(city_total, scans.len() as u64);
    }
}
