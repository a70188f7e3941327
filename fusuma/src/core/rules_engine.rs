/// How rule patterns are compared with window properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Pattern occurs anywhere in the property.
    #[default]
    Substring,
    Exact,
    /// `*` matches any run of characters, `?` a single one.
    Glob,
}

impl MatchPolicy {
    pub fn matches(self, pattern: &str, value: &str) -> bool {
        match self {
            MatchPolicy::Substring => value.contains(pattern),
            MatchPolicy::Exact => value == pattern,
            MatchPolicy::Glob => glob_match(pattern, value),
        }
    }
}

fn glob_match(pattern: &str, value: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let v: Vec<char> = value.chars().collect();
    let (mut pi, mut vi) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while vi < v.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == v[vi]) {
            pi += 1;
            vi += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, vi));
            pi += 1;
        } else if let Some((star_pi, star_vi)) = star {
            // let the last star swallow one more character
            pi = star_pi + 1;
            vi = star_vi + 1;
            star = Some((star_pi, star_vi + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

/// A classification rule. `None` patterns match anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    pub tags: u32,
    pub is_floating: bool,
    pub monitor: Option<usize>,
}

impl Rule {
    pub fn new(class: Option<&str>, instance: Option<&str>, title: Option<&str>) -> Self {
        Self {
            class: class.map(str::to_string),
            instance: instance.map(str::to_string),
            title: title.map(str::to_string),
            tags: 0,
            is_floating: false,
            monitor: None,
        }
    }

    pub fn tags(mut self, tags: u32) -> Self {
        self.tags = tags;
        self
    }

    pub fn floating(mut self, is_floating: bool) -> Self {
        self.is_floating = is_floating;
        self
    }

    pub fn monitor(mut self, monitor: usize) -> Self {
        self.monitor = Some(monitor);
        self
    }

    fn matches(&self, policy: MatchPolicy, class: &str, instance: &str, title: &str) -> bool {
        let field = |pattern: &Option<String>, value: &str| {
            pattern
                .as_deref()
                .map_or(true, |p| policy.matches(p, value))
        };
        field(&self.class, class) && field(&self.instance, instance) && field(&self.title, title)
    }
}

/// Classification of a newly managed window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    /// `None` means "use the monitor's visible tags".
    pub tags: Option<u32>,
    pub is_floating: bool,
    /// `None` means "the monitor the window appeared on".
    pub monitor: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    rules: Vec<Rule>,
    policy: MatchPolicy,
}

impl RulesEngine {
    pub fn new(rules: Vec<Rule>, policy: MatchPolicy) -> Self {
        Self { rules, policy }
    }

    /// Scans the rules in declaration order; the first match wins.
    pub fn classify(&self, class: &str, instance: &str, title: &str) -> RuleOutcome {
        let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.matches(self.policy, class, instance, title))
        else {
            tracing::trace!(
                "No rule for class={:?} instance={:?} title={:?}",
                class,
                instance,
                title
            );
            return RuleOutcome::default();
        };

        tracing::debug!(
            "Rule {:?}/{:?}/{:?} matched class={:?} instance={:?} title={:?}",
            rule.class,
            rule.instance,
            rule.title,
            class,
            instance,
            title
        );
        RuleOutcome {
            tags: (rule.tags != 0).then_some(rule.tags),
            is_floating: rule.is_floating,
            monitor: rule.monitor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> Vec<Rule> {
        vec![
            Rule::new(Some("Chromium"), None, None).tags(1 << 1),
            Rule::new(Some("Wfica"), None, None).tags(1 << 2),
            Rule::new(Some("St"), Some("st"), Some("ranger")).tags(1 << 4),
        ]
    }

    #[test]
    fn test_classify_no_match_returns_defaults() {
        let engine = RulesEngine::new(default_rules(), MatchPolicy::Substring);
        let outcome = engine.classify("XTerm", "xterm", "bash");
        assert_eq!(outcome, RuleOutcome::default());
    }

    #[test]
    fn test_classify_by_class() {
        let engine = RulesEngine::new(default_rules(), MatchPolicy::Substring);
        let outcome = engine.classify("Chromium", "chromium", "New Tab");
        assert_eq!(outcome.tags, Some(0b10));
        assert!(!outcome.is_floating);
        assert_eq!(outcome.monitor, None);
    }

    #[test]
    fn test_classify_requires_every_present_pattern() {
        let engine = RulesEngine::new(default_rules(), MatchPolicy::Substring);
        assert_eq!(engine.classify("St", "st", "ranger").tags, Some(1 << 4));
        assert_eq!(engine.classify("St", "st", "zsh").tags, None);
    }

    #[test]
    fn test_classify_substring_is_default() {
        let engine = RulesEngine::new(default_rules(), MatchPolicy::default());
        // "St" occurs inside "Steam"
        assert_eq!(engine.classify("Steam", "st", "ranger").tags, Some(1 << 4));
    }

    #[test]
    fn test_classify_exact_policy() {
        let engine = RulesEngine::new(default_rules(), MatchPolicy::Exact);
        assert_eq!(engine.classify("Steam", "st", "ranger").tags, None);
        assert_eq!(engine.classify("St", "st", "ranger").tags, Some(1 << 4));
    }

    #[test]
    fn test_classify_first_match_wins() {
        let rules = vec![
            Rule::new(Some("Gimp"), None, None).floating(true),
            Rule::new(Some("Gimp"), None, None).tags(1 << 3).monitor(1),
        ];
        let engine = RulesEngine::new(rules, MatchPolicy::Substring);
        let outcome = engine.classify("Gimp", "gimp", "GNU Image Manipulation Program");
        assert!(outcome.is_floating);
        assert_eq!(outcome.tags, None);
        assert_eq!(outcome.monitor, None);
    }

    #[test]
    fn test_classify_monitor_and_floating() {
        let rules = vec![Rule::new(None, None, Some("Picture-in-Picture"))
            .floating(true)
            .monitor(1)];
        let engine = RulesEngine::new(rules, MatchPolicy::Substring);
        let outcome = engine.classify("firefox", "Navigator", "Picture-in-Picture");
        assert!(outcome.is_floating);
        assert_eq!(outcome.monitor, Some(1));
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*", ""));
        assert!(glob_match("Chrom*", "Chromium"));
        assert!(glob_match("*ium", "Chromium"));
        assert!(glob_match("Ch?omium", "Chromium"));
        assert!(glob_match("*o*i*", "Chromium"));
        assert!(!glob_match("Chrom", "Chromium"));
        assert!(!glob_match("Ch?mium", "Chromium"));
        assert!(!glob_match("a*b", "acbx"));
    }

    #[test]
    fn test_classify_glob_policy() {
        let rules = vec![Rule::new(Some("Firefox*"), None, None).tags(1 << 8)];
        let engine = RulesEngine::new(rules, MatchPolicy::Glob);
        assert_eq!(engine.classify("Firefox-esr", "", "").tags, Some(1 << 8));
        assert_eq!(engine.classify("firefox", "", "").tags, None);
    }
}
