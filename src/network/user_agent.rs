//! Browser-like header values

use rand::seq::SliceRandom;
use rand::Rng;

const CHROME_VERSIONS: &[&str] = &["120.0.0.0", "122.0.0.0", "124.0.0.0", "125.0.0.0"];
const FIREFOX_VERSIONS: &[&str] = &["122.0", "124.0", "125.0"];

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

/// Generate a random desktop Chrome or Firefox user agent
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS
        .choose(&mut rng)
        .copied()
        .unwrap_or("Windows NT 10.0; Win64; x64");

    // Chrome 3 out of 4
    if rng.gen_ratio(3, 4) {
        let version = CHROME_VERSIONS.choose(&mut rng).copied().unwrap_or("125.0.0.0");
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            platform, version
        )
    } else {
        let version = FIREFOX_VERSIONS.choose(&mut rng).copied().unwrap_or("125.0");
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            platform, version, version
        )
    }
}

/// Accept header sent by the direct transport
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
}

/// Accept header for script/JSON responses
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_agent() {
        for _ in 0..20 {
            let ua = generate_user_agent();
            assert!(ua.starts_with("Mozilla/5.0"));
            assert!(ua.contains("Chrome/") || ua.contains("Firefox/"));
        }
    }

    #[test]
    fn test_accept_headers() {
        assert!(accept_html().starts_with("text/html"));
        assert!(accept_json().contains("text/javascript"));
    }
}
