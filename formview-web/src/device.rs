use formview::FormError;
use regex::Regex;

const MOBILE_AGENTS: &str =
    r"(?i)android|webos|iphone|ipad|ipod|blackberry|iemobile|opera mini|mobile";

/// User agent matcher for handheld devices.
pub struct MobileAgents(Regex);

impl MobileAgents {
    pub fn new() -> Result<Self, FormError> {
        Regex::new(MOBILE_AGENTS).map(Self).map_err(|err| {
            FormError::Config(format!("Invalid user agent pattern: {}", err))
        })
    }

    pub fn matches(&self, agent: &str) -> bool {
        self.0.is_match(agent)
    }

    /// Judge the browser this page runs in.
    pub fn current(&self) -> bool {
        let agent = web_sys::window()
            .and_then(|window| window.navigator().user_agent().ok())
            .unwrap_or_default();
        self.matches(&agent)
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_user_agents() {
        let agents = MobileAgents::new().unwrap();
        assert!(agents.matches(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(agents.matches("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
        assert!(!agents.matches(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
        ));
        assert!(!agents.matches(""));
    }
}
