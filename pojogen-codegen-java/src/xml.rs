//! Minimal XML tag formatting.

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// An element name with its attributes in insertion order.
#[derive(Debug, Clone)]
pub struct Tag {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
}

impl Tag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        self.attributes.push((key, escape(value.as_ref())));
        self
    }

    /// Add the attribute only when a value is present.
    pub fn attr_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    pub fn attr_if(self, condition: bool, key: &'static str, value: &str) -> Self {
        if condition { self.attr(key, value) } else { self }
    }

    fn head(&self) -> String {
        let mut head = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            head.push_str(&format!(" {}=\"{}\"", key, value));
        }
        head
    }

    pub fn open(&self) -> String {
        format!("{}>", self.head())
    }

    pub fn empty(&self) -> String {
        format!("{}/>", self.head())
    }

    pub fn close(&self) -> String {
        format!("</{}>", self.name)
    }

    /// The element on one line with escaped text content.
    pub fn with_text(&self, text: &str) -> String {
        format!("{}{}{}", self.open(), escape(text), self.close())
    }
}
