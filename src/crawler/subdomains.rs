//! Subdomain expansion
//!
//! Derives the set of candidate seed URLs for a crawl: the root URL
//! itself plus one `https` URL per individual subdomain label grafted
//! directly onto the registrable domain.

use url::Url;

/// Expand a root URL into crawl seed URLs.
///
/// For host `a.b.example.com` this yields the original URL plus
/// `https://a.example.com` and `https://b.example.com` — each label is
/// taken on its own, not as a cumulative prefix chain. URLs without a
/// subdomain portion, with an IP host, or that fail to parse are passed
/// through unchanged as the only seed.
///
/// The registrable domain is taken as the final two host labels. Hosts
/// under multi-part public suffixes (e.g. `.co.uk`) will therefore
/// expand against the suffix rather than the true registrable domain.
pub fn expand_subdomains(url: &str) -> Vec<String> {
    let mut seeds = vec![url.to_string()];

    let Ok(parsed) = Url::parse(url) else {
        return seeds;
    };
    let Some(host) = parsed.host_str() else {
        return seeds;
    };
    if host.parse::<std::net::IpAddr>().is_ok() {
        return seeds;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 || labels.iter().any(|l| l.is_empty()) {
        return seeds;
    }

    let registrable = labels[labels.len() - 2..].join(".");
    for label in &labels[..labels.len() - 2] {
        seeds.push(format!("https://{}.{}", label, registrable));
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_without_subdomain_is_identity() {
        assert_eq!(
            expand_subdomains("https://example.com"),
            vec!["https://example.com"]
        );
    }

    #[test]
    fn test_expand_single_label() {
        assert_eq!(
            expand_subdomains("https://www.example.com/page"),
            vec!["https://www.example.com/page", "https://www.example.com"]
        );
    }

    #[test]
    fn test_expand_individual_labels_not_cumulative() {
        assert_eq!(
            expand_subdomains("https://a.b.example.com"),
            vec![
                "https://a.b.example.com",
                "https://a.example.com",
                "https://b.example.com",
            ]
        );
    }

    #[test]
    fn test_expand_ip_host_is_identity() {
        assert_eq!(
            expand_subdomains("https://192.168.1.10/admin"),
            vec!["https://192.168.1.10/admin"]
        );
    }

    #[test]
    fn test_expand_malformed_input_is_identity() {
        assert_eq!(expand_subdomains("not a url"), vec!["not a url"]);
    }
}
