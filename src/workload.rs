//! Per-iteration browse workload: draw listing parameters, issue one GET to
//! the product listing, and evaluate the `status is 200` check.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Candidate, Catalog};
use crate::check::CheckResult;
use crate::transport::Transport;

pub const PRODUCTS_PATH: &str = "/api/v1/products";
pub const PAGE_COUNT: u32 = 10;
pub const PAGE_SIZE: u32 = 10;

/// Immutable inputs of the workload, built once and shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub catalog: Catalog,
    /// Pages are drawn from `0..page_count`.
    pub page_count: u32,
    pub page_size: u32,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            page_count: PAGE_COUNT,
            page_size: PAGE_SIZE,
        }
    }
}

impl Workload {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BrowseRequest {
        let category = pick(self.catalog.categories, rng);
        let keyword = pick(self.catalog.keywords, rng);
        let page = rng.gen_range(0..self.page_count.max(1));

        BrowseRequest {
            page,
            size: self.page_size,
            category,
            keyword,
        }
    }
}

fn pick<R: Rng + ?Sized>(candidates: &[Candidate], rng: &mut R) -> Candidate {
    if candidates.is_empty() {
        return None;
    }
    candidates[rng.gen_range(0..candidates.len())]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrowseRequest {
    pub page: u32,
    pub size: u32,
    pub category: Option<&'static str>,
    pub keyword: Option<&'static str>,
}

impl BrowseRequest {
    pub fn query_string(&self) -> String {
        let mut params = vec![format!("page={}", self.page), format!("size={}", self.size)];

        if let Some(category) = self.category {
            params.push(format!("category={}", category));
        }

        if let Some(keyword) = self.keyword {
            params.push(format!("search={}", keyword));
        }

        params.join("&")
    }

    /// Path and query, relative to the target host.
    pub fn target(&self) -> String {
        format!("{}?{}", PRODUCTS_PATH, self.query_string())
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.target())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationOutcome {
    pub request: BrowseRequest,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub check: CheckResult,
}

/// Issues `request` and records the check. Transport failures become a
/// failed check; nothing is returned as an error.
pub async fn execute<T>(request: BrowseRequest, transport: &mut T) -> IterationOutcome
where
    T: Transport + ?Sized,
{
    let path = request.target();
    let (status, error) = match transport.get(&path).await {
        Ok(status) => (Some(status), None),
        Err(err) => {
            debug!(%path, error = %err, "browse request failed");
            (None, Some(err.to_string()))
        }
    };

    IterationOutcome {
        request,
        status,
        error,
        check: CheckResult::status_is_200(status),
    }
}

pub async fn run_iteration<R, T>(
    workload: &Workload,
    rng: &mut R,
    transport: &mut T,
) -> IterationOutcome
where
    R: Rng + ?Sized,
    T: Transport + ?Sized,
{
    let request = workload.sample(rng);
    execute(request, transport).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixed {
        status: u16,
        targets: Vec<String>,
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn get(&mut self, target: &str) -> Result<u16, TransportError> {
            self.targets.push(target.to_owned());
            Ok(self.status)
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn get(&mut self, _target: &str) -> Result<u16, TransportError> {
            Err(TransportError::Request("connection refused".into()))
        }
    }

    const ITERATIONS: usize = 10_000;

    #[test]
    fn page_and_size_stay_in_range() {
        let workload = Workload::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..ITERATIONS {
            let request = workload.sample(&mut rng);
            assert!(request.page <= 9);
            assert_eq!(request.size, 10);
            assert!(request.query_string().contains("&size=10"));
        }
    }

    #[test]
    fn sentinels_never_reach_the_query() {
        let workload = Workload::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..ITERATIONS {
            let request = workload.sample(&mut rng);
            let query = request.query_string();
            match request.category {
                Some(category) => {
                    assert!(query.contains(&format!("category={}", category)));
                    assert_eq!(query.matches("category=").count(), 1);
                }
                None => assert!(!query.contains("category=")),
            }
            match request.keyword {
                Some(keyword) => {
                    assert!(query.contains(&format!("search={}", keyword)));
                    assert_eq!(query.matches("search=").count(), 1);
                }
                None => assert!(!query.contains("search=")),
            }
        }
    }

    #[test]
    fn draws_cover_every_candidate_uniformly() {
        let workload = Workload::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut categories = [0usize; 6];
        let mut keywords = [0usize; 8];
        let mut pages = [0usize; 10];

        for _ in 0..ITERATIONS {
            let request = workload.sample(&mut rng);
            let c = workload
                .catalog
                .categories
                .iter()
                .position(|candidate| *candidate == request.category)
                .unwrap();
            let k = workload
                .catalog
                .keywords
                .iter()
                .position(|candidate| *candidate == request.keyword)
                .unwrap();
            categories[c] += 1;
            keywords[k] += 1;
            pages[request.page as usize] += 1;
        }

        let within = |count: usize, options: usize| {
            let expected = ITERATIONS as f64 / options as f64;
            (count as f64 - expected).abs() < expected * 0.2
        };
        assert!(categories.iter().all(|&n| within(n, 6)), "{categories:?}");
        assert!(keywords.iter().all(|&n| within(n, 8)), "{keywords:?}");
        assert!(pages.iter().all(|&n| within(n, 10)), "{pages:?}");
    }

    #[test]
    fn parameters_keep_their_order() {
        let request = BrowseRequest {
            page: 7,
            size: 10,
            category: Some("books"),
            keyword: Some("retro"),
        };
        assert_eq!(request.query_string(), "page=7&size=10&category=books&search=retro");
    }

    #[test]
    fn category_without_keyword() {
        let request = BrowseRequest {
            page: 3,
            size: 10,
            category: Some("games"),
            keyword: None,
        };
        assert_eq!(
            request.url("http://x.test"),
            "http://x.test/api/v1/products?page=3&size=10&category=games"
        );
    }

    #[test]
    fn all_sentinels_on_first_page() {
        let request = BrowseRequest {
            page: 0,
            size: 10,
            category: None,
            keyword: None,
        };
        assert_eq!(
            request.url("http://localhost:8080"),
            "http://localhost:8080/api/v1/products?page=0&size=10"
        );
    }

    #[test]
    fn forced_draws_follow_the_catalog() {
        static ONLY_GAMES: [Candidate; 1] = [Some("games")];
        static NO_KEYWORD: [Candidate; 1] = [None];
        let workload = Workload {
            catalog: Catalog::new(&ONLY_GAMES, &NO_KEYWORD),
            page_count: 1,
            page_size: PAGE_SIZE,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let request = workload.sample(&mut rng);
        assert_eq!(request.target(), "/api/v1/products?page=0&size=10&category=games");
    }

    #[tokio::test]
    async fn status_200_passes_the_check() {
        let workload = Workload::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut transport = Fixed {
            status: 200,
            targets: Vec::new(),
        };

        for _ in 0..100 {
            let outcome = run_iteration(&workload, &mut rng, &mut transport).await;
            assert!(outcome.check.passed);
            assert_eq!(outcome.status, Some(200));
            assert_eq!(outcome.error, None);
        }
        assert_eq!(transport.targets.len(), 100);
        assert!(transport.targets.iter().all(|t| t.starts_with("/api/v1/products?page=")));
    }

    #[tokio::test]
    async fn status_500_fails_the_check_without_raising() {
        let workload = Workload::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut transport = Fixed {
            status: 500,
            targets: Vec::new(),
        };

        for _ in 0..100 {
            let outcome = run_iteration(&workload, &mut rng, &mut transport).await;
            assert!(!outcome.check.passed);
            assert_eq!(outcome.check.name, "status is 200");
            assert_eq!(outcome.status, Some(500));
        }
    }

    #[tokio::test]
    async fn transport_error_is_a_failed_check() {
        let request = BrowseRequest {
            page: 1,
            size: 10,
            category: None,
            keyword: Some("sale"),
        };
        let outcome = execute(request, &mut Unreachable).await;
        assert!(!outcome.check.passed);
        assert_eq!(outcome.status, None);
        assert!(outcome.error.unwrap().contains("connection refused"));
    }
}
