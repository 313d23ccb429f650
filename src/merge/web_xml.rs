// ABOUTME: web.xml descriptor model and the element-level merge rules.
// ABOUTME: The base descriptor wins on singleton and same-key elements; new ones are inserted in schema order.

use xmltree::{Element, EmitterConfig, XMLNode};

use super::error::Result;

/// How elements of one name combine when merging.
enum Rule {
    /// At most one per descriptor; the base copy wins.
    Singleton,
    /// Identified by the text of these children.
    Keyed(&'static [&'static str]),
    /// Children named like this are unioned into the base element.
    Union(&'static str),
    /// Added unless an identical element is already present.
    Distinct,
}

fn rule(name: &str) -> Rule {
    match name {
        "icon"
        | "display-name"
        | "description"
        | "distributable"
        | "session-config"
        | "jsp-config"
        | "login-config"
        | "absolute-ordering"
        | "locale-encoding-mapping-list" => Rule::Singleton,
        "context-param" => Rule::Keyed(&["param-name"]),
        "filter" => Rule::Keyed(&["filter-name"]),
        "filter-mapping" => Rule::Keyed(&["filter-name", "url-pattern", "servlet-name"]),
        "listener" => Rule::Keyed(&["listener-class"]),
        "servlet" => Rule::Keyed(&["servlet-name"]),
        "servlet-mapping" => Rule::Keyed(&["servlet-name", "url-pattern"]),
        "mime-mapping" => Rule::Keyed(&["extension"]),
        "error-page" => Rule::Keyed(&["error-code", "exception-type"]),
        "taglib" => Rule::Keyed(&["taglib-uri"]),
        "resource-ref" => Rule::Keyed(&["res-ref-name"]),
        "resource-env-ref" => Rule::Keyed(&["resource-env-ref-name"]),
        "env-entry" => Rule::Keyed(&["env-entry-name"]),
        "ejb-ref" | "ejb-local-ref" => Rule::Keyed(&["ejb-ref-name"]),
        "security-role" => Rule::Keyed(&["role-name"]),
        "welcome-file-list" => Rule::Union("welcome-file"),
        _ => Rule::Distinct,
    }
}

/// Canonical order of top-level `web-app` children.
const ELEMENT_ORDER: &[&str] = &[
    "icon",
    "display-name",
    "description",
    "distributable",
    "context-param",
    "filter",
    "filter-mapping",
    "listener",
    "servlet",
    "servlet-mapping",
    "session-config",
    "mime-mapping",
    "welcome-file-list",
    "error-page",
    "taglib",
    "jsp-config",
    "security-constraint",
    "login-config",
    "security-role",
    "env-entry",
    "ejb-ref",
    "ejb-local-ref",
    "resource-env-ref",
    "resource-ref",
    "locale-encoding-mapping-list",
];

fn order_of(name: &str) -> Option<usize> {
    ELEMENT_ORDER.iter().position(|n| *n == name)
}

fn child_text(element: &Element, name: &str) -> Option<String> {
    element
        .get_child(name)
        .and_then(|child| child.get_text())
        .map(|text| text.trim().to_string())
}

fn key_of(element: &Element, keys: &[&str]) -> Vec<Option<String>> {
    keys.iter().map(|k| child_text(element, k)).collect()
}

/// A parsed `WEB-INF/web.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebXml {
    root: Element,
}

impl WebXml {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            root: Element::parse(bytes)?,
        })
    }

    /// Serialize with indentation; equal descriptors give identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let config = EmitterConfig::new().perform_indent(true);
        self.root.write_with_config(&mut out, config)?;
        out.push(b'\n');
        Ok(out)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Servlet API version declared on `web-app`, if any.
    pub fn version(&self) -> Option<&str> {
        self.root.attributes.get("version").map(String::as_str)
    }

    /// Top-level elements named `name`, in document order.
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .filter(move |e| e.name == name)
    }

    /// Names of all servlets declared in this descriptor.
    pub fn servlet_names(&self) -> Vec<String> {
        self.elements("servlet")
            .filter_map(|s| child_text(s, "servlet-name"))
            .collect()
    }

    /// Merge `other` into this descriptor.
    pub fn merge(&mut self, other: &WebXml) {
        for element in other.root.children.iter().filter_map(XMLNode::as_element) {
            match rule(&element.name) {
                Rule::Singleton => {
                    if self.position_of(|e| e.name == element.name).is_none() {
                        self.insert(element.clone());
                    }
                }
                Rule::Keyed(keys) => {
                    let key = key_of(element, keys);
                    let exists = self
                        .position_of(|e| e.name == element.name && key_of(e, keys) == key)
                        .is_some();
                    if !exists {
                        self.insert(element.clone());
                    }
                }
                Rule::Union(item) => self.union(element, item),
                Rule::Distinct => {
                    if self.position_of(|e| e == element).is_none() {
                        self.insert(element.clone());
                    }
                }
            }
        }
    }

    fn position_of(&self, predicate: impl Fn(&Element) -> bool) -> Option<usize> {
        self.root
            .children
            .iter()
            .position(|node| node.as_element().is_some_and(&predicate))
    }

    fn union(&mut self, element: &Element, item: &str) {
        let Some(index) = self.position_of(|e| e.name == element.name) else {
            self.insert(element.clone());
            return;
        };
        let Some(XMLNode::Element(base)) = self.root.children.get_mut(index) else {
            return;
        };

        for entry in element.children.iter().filter_map(XMLNode::as_element) {
            if entry.name != item {
                continue;
            }
            let text = entry.get_text().map(|t| t.trim().to_string());
            let present = base
                .children
                .iter()
                .filter_map(XMLNode::as_element)
                .any(|e| e.name == item && e.get_text().map(|t| t.trim().to_string()) == text);
            if !present {
                base.children.push(XMLNode::Element(entry.clone()));
            }
        }
    }

    /// Insert after the last sibling of the same name, else before the first
    /// element that comes later in the canonical order, else at the end.
    fn insert(&mut self, element: Element) {
        let children = &self.root.children;
        let last_same = children
            .iter()
            .rposition(|n| n.as_element().is_some_and(|e| e.name == element.name));

        let index = match last_same {
            Some(i) => i + 1,
            None => match order_of(&element.name) {
                Some(rank) => children
                    .iter()
                    .position(|n| {
                        n.as_element()
                            .and_then(|e| order_of(&e.name))
                            .is_some_and(|r| r > rank)
                    })
                    .unwrap_or(children.len()),
                None => children.len(),
            },
        };
        self.root.children.insert(index, XMLNode::Element(element));
    }
}
