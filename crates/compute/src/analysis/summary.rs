use catalog::{CloudRegion, ExchangeServer, Provider, ServerStatus};

/// Servers per provider in `Provider::ALL` order; providers with none are left out.
pub fn provider_counts<'a, I>(servers: I) -> Vec<(Provider, usize)>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    let mut counts = [0usize; Provider::ALL.len()];
    for s in servers {
        if let Some(i) = Provider::ALL.iter().position(|p| *p == s.provider) {
            counts[i] += 1;
        }
    }
    Provider::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Servers per status in `ServerStatus::ALL` order; statuses with none are left out.
pub fn status_counts<'a, I>(servers: I) -> Vec<(ServerStatus, usize)>
where
    I: IntoIterator<Item = &'a ExchangeServer>,
{
    let mut counts = [0usize; ServerStatus::ALL.len()];
    for s in servers {
        if let Some(i) = ServerStatus::ALL.iter().position(|st| *st == s.status) {
            counts[i] += 1;
        }
    }
    ServerStatus::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShowingSummary {
    pub shown: usize,
    pub total: usize,
}

impl std::fmt::Display for ShowingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} of {} servers", self.shown, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinentGroup<'a> {
    pub continent: String,
    pub regions: Vec<&'a CloudRegion>,
}

/// Groups regions by the first segment of their id. Groups appear in order of
/// first occurrence; regions keep their input order within a group.
pub fn regions_by_continent(regions: &[CloudRegion]) -> Vec<ContinentGroup<'_>> {
    let mut groups: Vec<ContinentGroup<'_>> = Vec::new();
    for region in regions {
        let continent = region.continent();
        match groups.iter_mut().find(|g| g.continent == continent) {
            Some(group) => group.regions.push(region),
            None => groups.push(ContinentGroup {
                continent,
                regions: vec![region],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::{ShowingSummary, provider_counts, regions_by_continent, status_counts};
    use catalog::{Dataset, Provider, ServerStatus};
    use pretty_assertions::assert_eq;

    fn fixture() -> Dataset {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer/assets/exchanges.json");
        Dataset::load(path).expect("load dataset")
    }

    #[test]
    fn counts_follow_enum_order() {
        let dataset = fixture();
        assert_eq!(
            provider_counts(&dataset.servers),
            vec![(Provider::Aws, 3), (Provider::Gcp, 3), (Provider::Azure, 3)]
        );
        assert_eq!(
            status_counts(&dataset.servers),
            vec![
                (ServerStatus::Online, 6),
                (ServerStatus::Degraded, 2),
                (ServerStatus::Offline, 1),
            ]
        );
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let dataset = fixture();
        let aws: Vec<_> = dataset
            .servers
            .iter()
            .filter(|s| s.provider == Provider::Aws)
            .collect();
        assert_eq!(provider_counts(aws.iter().copied()), vec![(Provider::Aws, 3)]);
        assert!(provider_counts(Vec::<&catalog::ExchangeServer>::new()).is_empty());
    }

    #[test]
    fn showing_summary_text() {
        let s = ShowingSummary { shown: 4, total: 9 };
        assert_eq!(s.to_string(), "Showing 4 of 9 servers");
    }

    #[test]
    fn continents_in_first_seen_order() {
        let dataset = fixture();
        let groups = regions_by_continent(&dataset.regions);
        let summary: Vec<(String, Vec<String>)> = groups
            .iter()
            .map(|g| (g.continent.clone(), g.regions.iter().map(|r| r.id.clone()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "ASIA".to_string(),
                    vec![
                        "asia-southeast-sg".to_string(),
                        "asia-northeast-jp".to_string(),
                        "asia-south-in".to_string(),
                    ]
                ),
                (
                    "EUROPE".to_string(),
                    vec!["europe-west-nl".to_string(), "europe-central-de".to_string()]
                ),
                ("US".to_string(), vec!["us-east-us".to_string()]),
            ]
        );
    }
}
