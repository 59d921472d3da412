use serde::{Deserialize, Serialize};

/// Fixed identity presented to the target site.
///
/// The advisories page serves its full markup to a desktop Chrome user
/// agent; the viewport matches so media queries resolve the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
        }
    }
}

/// Chrome command-line arguments for a profile.
pub fn browser_arguments(profile: &BrowserProfile, headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        format!("--user-agent={}", profile.user_agent),
        format!(
            "--window-size={},{}",
            profile.viewport.0, profile.viewport.1
        ),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_adds_headless_flags() {
        let profile = BrowserProfile::default();
        let headed = browser_arguments(&profile, false);
        let headless = browser_arguments(&profile, true);

        assert!(!headed.iter().any(|a| a.starts_with("--headless")));
        assert!(headless.iter().any(|a| a == "--headless=new"));
        assert!(headless.iter().any(|a| a == "--disable-gpu"));
    }

    #[test]
    fn profile_is_rendered_into_arguments() {
        let profile = BrowserProfile {
            user_agent: "test-agent".into(),
            viewport: (800, 600),
        };
        let args = browser_arguments(&profile, true);
        assert!(args.contains(&"--user-agent=test-agent".to_string()));
        assert!(args.contains(&"--window-size=800,600".to_string()));
    }
}
