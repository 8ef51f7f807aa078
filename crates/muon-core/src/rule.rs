//! Name-matched window rules.

/// What a rule forces on a matching window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAttribute {
    Floating,
    Fullscreen,
}

impl std::str::FromStr for RuleAttribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floating" => Ok(Self::Floating),
            "fullscreen" => Ok(Self::Fullscreen),
            _ => Err(()),
        }
    }
}

/// A rule matches windows whose class name equals `name` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub attribute: RuleAttribute,
}

impl Rule {
    pub fn new(name: impl Into<String>, attribute: RuleAttribute) -> Self {
        Self {
            name: name.into(),
            attribute,
        }
    }

    pub fn matches(&self, class: &str) -> bool {
        self.name == class
    }
}

/// What the rule list says about one class name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleMatch {
    pub floating: bool,
    pub fullscreen: bool,
}

/// Fold every rule matching `class` into one verdict. Rules accumulate;
/// they never cancel each other.
pub fn evaluate(rules: &[Rule], class: &str) -> RuleMatch {
    rules
        .iter()
        .filter(|rule| rule.matches(class))
        .fold(RuleMatch::default(), |mut verdict, rule| {
            match rule.attribute {
                RuleAttribute::Floating => verdict.floating = true,
                RuleAttribute::Fullscreen => verdict.fullscreen = true,
            }
            verdict
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let rule = Rule::new("firefox", RuleAttribute::Floating);
        assert!(rule.matches("firefox"));
        assert!(!rule.matches("Firefox"));
        assert!(!rule.matches("firefox-esr"));
    }

    #[test]
    fn test_evaluate_accumulates() {
        let rules = vec![
            Rule::new("mpv", RuleAttribute::Fullscreen),
            Rule::new("gimp", RuleAttribute::Floating),
            Rule::new("mpv", RuleAttribute::Floating),
        ];
        assert_eq!(
            evaluate(&rules, "mpv"),
            RuleMatch {
                floating: true,
                fullscreen: true
            }
        );
        assert_eq!(evaluate(&rules, "xterm"), RuleMatch::default());
    }
}
