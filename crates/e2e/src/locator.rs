//! Typed element locators.
//!
//! Page objects build these once and hand them to the [`Driver`] seam;
//! the session layer serializes them onto the wire for the browser side
//! to resolve. `Display` renders a compact form used in interaction
//! error messages and log lines.
//!
//! [`Driver`]: crate::driver::Driver

use std::fmt;

use serde::{Deserialize, Serialize};

/// How to select candidate elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Selector {
    /// ARIA role, optionally filtered by accessible name.
    Role {
        role: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        exact: bool,
        /// Treat `name` as a case-insensitive regular expression.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        regex: bool,
    },
    Css { css: String },
    Text { text: String },
    Placeholder { placeholder: String },
    Label { label: String },
}

/// Which element to pick when a selector matches several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pick {
    First,
    Last,
    Index(usize),
}

/// A selector plus optional scoping, text filter and disambiguation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Resolve within this locator's match instead of the page root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Locator>>,
    #[serde(flatten)]
    pub selector: Selector,
    /// Keep only matches whose text contains this substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick: Option<Pick>,
}

impl Locator {
    fn new(selector: Selector) -> Self {
        Self {
            parent: None,
            selector,
            has_text: None,
            pick: None,
        }
    }

    /// Role locator with an accessible name.
    pub fn role(role: &str, name: &str) -> Self {
        Self::new(Selector::Role {
            role: role.to_string(),
            name: Some(name.to_string()),
            exact: false,
            regex: false,
        })
    }

    /// Role locator matching any accessible name.
    pub fn role_any(role: &str) -> Self {
        Self::new(Selector::Role {
            role: role.to_string(),
            name: None,
            exact: false,
            regex: false,
        })
    }

    /// Role locator whose name matches a case-insensitive pattern.
    pub fn role_matching(role: &str, pattern: &str) -> Self {
        Self::new(Selector::Role {
            role: role.to_string(),
            name: Some(pattern.to_string()),
            exact: false,
            regex: true,
        })
    }

    pub fn css(css: &str) -> Self {
        Self::new(Selector::Css {
            css: css.to_string(),
        })
    }

    pub fn text(text: &str) -> Self {
        Self::new(Selector::Text {
            text: text.to_string(),
        })
    }

    pub fn placeholder(placeholder: &str) -> Self {
        Self::new(Selector::Placeholder {
            placeholder: placeholder.to_string(),
        })
    }

    pub fn label(label: &str) -> Self {
        Self::new(Selector::Label {
            label: label.to_string(),
        })
    }

    pub fn exact(mut self) -> Self {
        if let Selector::Role { exact, .. } = &mut self.selector {
            *exact = true;
        }
        self
    }

    pub fn has_text(mut self, text: &str) -> Self {
        self.has_text = Some(text.to_string());
        self
    }

    pub fn first(mut self) -> Self {
        self.pick = Some(Pick::First);
        self
    }

    pub fn last(mut self) -> Self {
        self.pick = Some(Pick::Last);
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.pick = Some(Pick::Index(index));
        self
    }

    /// Scope `child` to elements matched by `self`.
    pub fn within(self, mut child: Locator) -> Locator {
        child.parent = Some(Box::new(self));
        child
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent} >> ")?;
        }
        match &self.selector {
            Selector::Role {
                role,
                name,
                exact,
                regex,
            } => {
                write!(f, "role={role}")?;
                if let Some(name) = name {
                    if *regex {
                        write!(f, "[name~=/{name}/]")?;
                    } else {
                        write!(f, "[name={name:?}]")?;
                    }
                }
                if *exact {
                    write!(f, "[exact]")?;
                }
            }
            Selector::Css { css } => write!(f, "css={css}")?,
            Selector::Text { text } => write!(f, "text={text:?}")?,
            Selector::Placeholder { placeholder } => {
                write!(f, "placeholder={placeholder:?}")?
            }
            Selector::Label { label } => write!(f, "label={label:?}")?,
        }
        if let Some(text) = &self.has_text {
            write!(f, "[has-text={text:?}]")?;
        }
        match self.pick {
            Some(Pick::First) => write!(f, ".first")?,
            Some(Pick::Last) => write!(f, ".last")?,
            Some(Pick::Index(i)) => write!(f, ".nth({i})")?,
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_chained_lookup() {
        let row = Locator::role("row", "Sweden-24").first();
        let button = row.within(Locator::role_any("button").nth(2));
        assert_eq!(
            button.to_string(),
            "role=row[name=\"Sweden-24\"].first >> role=button.nth(2)"
        );
    }

    #[test]
    fn serializes_with_tagged_selector() {
        let l = Locator::css("input[type='file']").first();
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v["by"], "css");
        assert_eq!(v["css"], "input[type='file']");
        assert_eq!(v["pick"], "first");
        assert!(v.get("parent").is_none());
    }

    #[test]
    fn regex_name_serializes_only_when_set() {
        let plain = serde_json::to_value(Locator::role("button", "Next")).unwrap();
        assert!(plain.get("regex").is_none());

        let matching = serde_json::to_value(Locator::role_matching("button", "^Active")).unwrap();
        assert_eq!(matching["regex"], true);
        assert_eq!(
            Locator::role_matching("button", "^Active").to_string(),
            "role=button[name~=/^Active/]"
        );
    }

    #[test]
    fn nth_pick_round_trips() {
        let l = Locator::role_any("combobox").nth(3);
        let json = serde_json::to_string(&l).unwrap();
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, l);
        assert_eq!(back.pick, Some(Pick::Index(3)));
    }
}
